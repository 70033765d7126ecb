//! # Astrolabe Parser
//!
//! Tokenizer, grammars and structural rules for Mermaid-style diagram
//! sources. The crate decides whether a renderer would accept a source and,
//! when it would not, reports every problem with a line, column and stable
//! error code.
//!
//! ## Usage
//!
//! ```
//! use astrolabe_parser::validate;
//!
//! let result = validate("flowchart TD\nA B");
//!
//! assert!(!result.is_valid());
//! assert_eq!(result.diagram_type().as_str(), "flowchart");
//! assert_eq!(result.diagnostics()[0].code().as_str(), "MISSING_ARROW");
//! ```

pub mod error;
pub mod lexer;
mod parser;
mod span;
pub mod tokens;
mod validate;

pub use span::Span;

use std::panic::{self, AssertUnwindSafe};

use log::{debug, error};
use serde::Serialize;

use astrolabe_core::{ast::Diagram, kind::DiagramKind};

use crate::error::{Diagnostic, ErrorCode};
use crate::parser::Parser;

/// Outcome of validating one diagram source.
///
/// `is_valid` is true exactly when there are no diagnostics. The diagram type
/// is always set; it is [`DiagramKind::Unknown`] when no header was
/// recognized.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    is_valid: bool,
    diagram_type: DiagramKind,
    diagnostics: Vec<Diagnostic>,
    #[serde(skip_serializing_if = "Option::is_none")]
    ast: Option<Diagram>,
}

impl ValidationResult {
    fn new(diagram_type: DiagramKind, diagnostics: Vec<Diagnostic>, ast: Option<Diagram>) -> Self {
        Self {
            is_valid: diagnostics.is_empty(),
            diagram_type,
            diagnostics,
            ast,
        }
    }

    /// A result for input that never reached the tokenizer.
    fn rejected(diagnostic: Diagnostic) -> Self {
        Self::new(DiagramKind::Unknown, vec![diagnostic], None)
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid
    }

    pub fn diagram_type(&self) -> DiagramKind {
        self.diagram_type
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// The parsed tree of the first diagram in the source, if parsing ran.
    pub fn ast(&self) -> Option<&Diagram> {
        self.ast.as_ref()
    }

    /// Append a diagnostic produced after parsing, such as a compatibility
    /// check. The result becomes invalid; the diagram type and tree are kept.
    pub fn push_diagnostic(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
        self.is_valid = false;
    }
}

/// Validate diagram source text.
///
/// This never fails: every problem, including an internal failure of the
/// parser, is reported as a diagnostic in the returned result.
///
/// # Example
///
/// ```
/// # use astrolabe_parser::validate;
/// let result = validate("sequenceDiagram\nparticipant A\nA->>B: hi");
/// assert!(result.is_valid());
/// assert!(result.ast().is_some());
/// ```
pub fn validate(source: &str) -> ValidationResult {
    if source.trim().is_empty() {
        return ValidationResult::rejected(
            Diagnostic::new(ErrorCode::EmptyInput, "input is empty")
                .with_suggestion("start with a diagram header such as `flowchart TD`"),
        );
    }

    match panic::catch_unwind(AssertUnwindSafe(|| Parser::new(source).parse())) {
        Ok((diagram, diagnostics)) => {
            debug!(
                kind = diagram.kind().as_str(),
                diagnostics = diagnostics.len();
                "Validated source"
            );
            ValidationResult::new(diagram.kind(), diagnostics, Some(diagram))
        }
        Err(payload) => {
            let reason = payload
                .downcast_ref::<&str>()
                .map(|reason| reason.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown failure".to_string());
            error!(reason = reason.as_str(); "Parser failed unexpectedly");
            ValidationResult::rejected(Diagnostic::new(
                ErrorCode::ValidationError,
                format!("internal validator failure: {reason}"),
            ))
        }
    }
}

/// Validate raw input bytes.
///
/// `None` is reported as empty input and bytes that are not UTF-8 as an
/// invalid input type. Anything else goes through [`validate`].
pub fn validate_bytes(input: Option<&[u8]>) -> ValidationResult {
    let Some(bytes) = input else {
        return ValidationResult::rejected(Diagnostic::new(ErrorCode::EmptyInput, "no input given"));
    };

    match std::str::from_utf8(bytes) {
        Ok(source) => validate(source),
        Err(err) => ValidationResult::rejected(
            Diagnostic::new(
                ErrorCode::InvalidInputType,
                format!("input is not valid UTF-8 text: {err}"),
            )
            .with_suggestion("save the diagram as UTF-8"),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_input_is_empty() {
        for source in ["", "   ", "\n\t\n"] {
            let result = validate(source);
            assert!(!result.is_valid());
            assert_eq!(result.diagram_type(), DiagramKind::Unknown);
            assert_eq!(result.diagnostics().len(), 1);
            assert_eq!(result.diagnostics()[0].code(), ErrorCode::EmptyInput);
            assert!(result.ast().is_none());
        }
    }

    #[test]
    fn test_validate_bytes() {
        assert_eq!(
            validate_bytes(None).diagnostics()[0].code(),
            ErrorCode::EmptyInput
        );

        let invalid = validate_bytes(Some(&[0x66, 0xff, 0xfe][..]));
        assert_eq!(invalid.diagnostics()[0].code(), ErrorCode::InvalidInputType);
        assert_eq!(invalid.diagram_type(), DiagramKind::Unknown);
        assert!(invalid.ast().is_none());

        let valid = validate_bytes(Some(&b"flowchart TD\nA --> B"[..]));
        assert!(valid.is_valid());
        assert_eq!(valid.diagram_type(), DiagramKind::Flowchart);
    }

    #[test]
    fn test_push_diagnostic_invalidates() {
        let mut result = validate("flowchart TD\nA --> B");
        assert!(result.is_valid());

        result.push_diagnostic(Diagnostic::new(ErrorCode::VersionMismatch, "mismatch"));
        assert!(!result.is_valid());
        assert_eq!(result.diagram_type(), DiagramKind::Flowchart);
        assert!(result.ast().is_some());
    }

    #[test]
    fn test_serialized_shape() {
        let result = validate("flowchart TD\nA B");
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["isValid"], false);
        assert_eq!(json["diagramType"], "flowchart");
        assert_eq!(json["diagnostics"][0]["code"], "MISSING_ARROW");
        assert_eq!(json["diagnostics"][0]["line"], 2);
        assert_eq!(json["ast"]["type"], "flowchart");

        let empty = serde_json::to_value(validate("")).unwrap();
        assert!(empty.get("ast").is_none());
    }
}
