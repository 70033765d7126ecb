//! Renderer version compatibility.
//!
//! Each release of this crate is checked against one renderer release. The
//! table below records the pairs; a validation run configured with a target
//! renderer version gets a `VERSION_MISMATCH` diagnostic when the target is
//! not the version this release was checked against.

use log::{debug, warn};

use astrolabe_parser::{
    ValidationResult,
    error::{Diagnostic, ErrorCode},
};

/// A validator release and the renderer release it was verified against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Compatibility {
    pub validator_version: &'static str,
    pub renderer_version: &'static str,
}

pub static COMPATIBILITY_TABLE: &[Compatibility] = &[Compatibility {
    validator_version: "0.1.0",
    renderer_version: "11.4.1",
}];

/// The renderer version this build was verified against.
pub fn validated_renderer_version() -> Option<&'static str> {
    renderer_version_for(env!("CARGO_PKG_VERSION"))
}

fn renderer_version_for(validator_version: &str) -> Option<&'static str> {
    COMPATIBILITY_TABLE
        .iter()
        .find(|entry| entry.validator_version == validator_version)
        .map(|entry| entry.renderer_version)
}

/// Compare `target` with the validated renderer version.
///
/// Versions are compared as plain strings. Returns the diagnostic to report
/// on mismatch.
pub fn check_version(target: &str) -> Option<Diagnostic> {
    check_against(target, validated_renderer_version())
}

fn check_against(target: &str, validated: Option<&str>) -> Option<Diagnostic> {
    if validated == Some(target) {
        debug!(target_version = target; "Renderer version matches");
        return None;
    }

    let validated = validated.unwrap_or("no renderer version");
    warn!(target_version = target, validated; "Renderer version mismatch");
    Some(
        Diagnostic::new(
            ErrorCode::VersionMismatch,
            format!("target renderer version {target} differs from the validated version {validated}"),
        )
        .with_suggestion(format!("set the target version to {validated} or upgrade astrolabe")),
    )
}

/// Append a version mismatch diagnostic to `result` when needed.
///
/// The diagram type and tree are left untouched.
pub fn apply(result: &mut ValidationResult, target: &str) {
    if let Some(diagnostic) = check_version(target) {
        result.push_diagnostic(diagnostic);
    }
}

#[cfg(test)]
mod tests {
    use astrolabe_parser::validate;

    use super::*;

    #[test]
    fn test_table_covers_this_release() {
        assert!(validated_renderer_version().is_some());
    }

    #[test]
    fn test_matching_version_passes() {
        assert!(check_against("11.4.1", Some("11.4.1")).is_none());
    }

    #[test]
    fn test_versions_compare_as_strings() {
        let diagnostic = check_against("11.4", Some("11.4.1")).unwrap();
        assert_eq!(diagnostic.code(), ErrorCode::VersionMismatch);
        assert!(diagnostic.message().contains("11.4.1"));
    }

    #[test]
    fn test_unknown_release_always_mismatches() {
        assert!(check_against("11.4.1", None).is_some());
        assert_eq!(renderer_version_for("0.0.0-dev"), None);
    }

    #[test]
    fn test_apply_keeps_diagram_type_and_tree() {
        let mut result = validate("flowchart TD\nA --> B");
        apply(&mut result, "0.0.1");

        assert!(!result.is_valid());
        assert_eq!(result.diagnostics().len(), 1);
        assert_eq!(result.diagnostics()[0].code(), ErrorCode::VersionMismatch);
        assert_eq!(result.diagram_type().as_str(), "flowchart");
        assert!(result.ast().is_some());
    }
}
