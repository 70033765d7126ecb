//! Integration tests for the public validation API.

use std::io::Cursor;

use astrolabe::{
    AstrolabeError, ErrorCode, Validator,
    compat::validated_renderer_version,
    config::AppConfig,
    diagram_type, is_valid,
    kind::DiagramKind,
};

#[test]
fn test_spec_examples() {
    assert!(is_valid("flowchart TD\nA --> B"));
    assert!(!is_valid("flowchart TD\nA B"));
    assert!(is_valid("sequenceDiagram\nparticipant A\nA->>B: hi"));
    assert!(!is_valid("xychart-beta"));
    assert!(!is_valid("flowchart TD\nA[Start] --> B[End]\nlinkStyle 5 stroke:#f00"));
    assert!(!is_valid("flowchart TD\nA --> B\nend"));
}

#[test]
fn test_diagram_type_is_reported_for_invalid_input() {
    assert_eq!(diagram_type("flowchart TD\nA B"), DiagramKind::Flowchart);
    assert_eq!(diagram_type("xychart-beta"), DiagramKind::XyChart);
    assert_eq!(diagram_type(""), DiagramKind::Unknown);
}

#[test]
fn test_default_validator_has_no_version_check() {
    let validator = Validator::default();
    let result = validator.validate("flowchart TD\nA --> B");
    assert!(result.is_valid());
}

#[test]
fn test_matching_target_version() {
    let version = validated_renderer_version().expect("this release is in the table");
    let validator = Validator::new(AppConfig::default().with_target_version(version));

    assert!(validator.validate("flowchart TD\nA --> B").is_valid());
}

#[test]
fn test_mismatched_target_version_is_appended() {
    let validator = Validator::new(AppConfig::default().with_target_version("9.9.9"));
    let result = validator.validate("flowchart TD\nA B");

    let codes: Vec<_> = result.diagnostics().iter().map(|d| d.code()).collect();
    assert_eq!(codes, vec![ErrorCode::MissingArrow, ErrorCode::VersionMismatch]);
    assert_eq!(result.diagram_type(), DiagramKind::Flowchart);
    assert!(result.ast().is_some());
}

#[test]
fn test_validate_reader() {
    let validator = Validator::default();

    let result = validator
        .validate_reader(Cursor::new("sequenceDiagram\nA->>B: hi"))
        .expect("reading from memory succeeds");
    assert!(result.is_valid());

    let result = validator
        .validate_reader(Cursor::new(vec![0xff, 0xfe]))
        .expect("reading from memory succeeds");
    assert_eq!(result.diagnostics()[0].code(), ErrorCode::InvalidInputType);
}

#[test]
fn test_validate_missing_file() {
    let validator = Validator::default();
    let err = validator
        .validate_file("does/not/exist.mmd")
        .expect_err("missing file must fail");

    assert!(matches!(err, AstrolabeError::ReadFile { .. }));
    assert!(err.to_string().contains("does/not/exist.mmd"));
}

#[test]
fn test_result_serializes_to_json_shape() {
    let result = astrolabe::validate("xychart-beta\nbar [1, 2]");
    let json = serde_json::to_value(&result).expect("result serializes");

    assert_eq!(json["isValid"], true);
    assert_eq!(json["diagramType"], "xychart");
    assert_eq!(json["ast"]["series"][0]["type"], "bar");
    assert_eq!(json["ast"]["xAxis"], serde_json::json!([]));
}
