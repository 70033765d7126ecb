//! The core diagnostic type for the Astrolabe error system.
//!
//! A [`Diagnostic`] represents a single validation error with its code,
//! message, source position and an optional suggested fix.

use std::fmt;

use serde::Serialize;

use crate::{error::error_code::ErrorCode, span::Span};

/// A validation error anchored to a position in the source.
///
/// Diagnostics serialize as `{line, column, message, code, suggestion?}`,
/// the shape consumed by editors and CI annotations.
///
/// # Example
///
/// ```text
/// 3:5: error[INCOMPLETE_ARROW]: arrow has no destination node
///   = help: add a target node after the arrow, e.g. `A --> B`
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    line: usize,
    column: usize,
    message: String,
    code: ErrorCode,
    #[serde(skip_serializing_if = "Option::is_none")]
    suggestion: Option<String>,
    #[serde(skip)]
    span: Span,
}

impl Diagnostic {
    /// Create a diagnostic located at the start of the input (1:1).
    ///
    /// # Example
    ///
    /// ```
    /// # use astrolabe_parser::error::{Diagnostic, ErrorCode};
    /// let diag = Diagnostic::new(ErrorCode::EmptyInput, "input is empty");
    /// assert_eq!((diag.line(), diag.column()), (1, 1));
    /// ```
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            line: 1,
            column: 1,
            message: message.into(),
            code,
            suggestion: None,
            span: Span::default(),
        }
    }

    /// Get the error code.
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Get the primary message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the 1-based line.
    pub fn line(&self) -> usize {
        self.line
    }

    /// Get the 1-based column, counted in codepoints.
    pub fn column(&self) -> usize {
        self.column
    }

    /// Get the byte span of the offending text.
    pub fn span(&self) -> Span {
        self.span
    }

    /// Get the suggested fix, if any.
    pub fn suggestion(&self) -> Option<&str> {
        self.suggestion.as_deref()
    }

    /// Set the source location.
    pub fn with_location(mut self, line: usize, column: usize, span: Span) -> Self {
        self.line = line;
        self.column = column;
        self.span = span;
        self
    }

    /// Set the suggested fix.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Format: "3:5: error[INCOMPLETE_ARROW]: message"
        write!(
            f,
            "{}:{}: error[{}]: {}",
            self.line, self.column, self.code, self.message
        )
    }
}

impl std::error::Error for Diagnostic {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_new() {
        let diag = Diagnostic::new(ErrorCode::ParseError, "test error");

        assert_eq!(diag.code(), ErrorCode::ParseError);
        assert_eq!(diag.message(), "test error");
        assert_eq!(diag.line(), 1);
        assert_eq!(diag.column(), 1);
        assert!(diag.span().is_empty());
        assert!(diag.suggestion().is_none());
    }

    #[test]
    fn test_diagnostic_builder_chain() {
        let diag = Diagnostic::new(ErrorCode::IncompleteArrow, "arrow has no destination node")
            .with_location(3, 5, Span::new(20..23))
            .with_suggestion("add a target node");

        assert_eq!(diag.line(), 3);
        assert_eq!(diag.column(), 5);
        assert_eq!(diag.span(), Span::new(20..23));
        assert_eq!(diag.suggestion(), Some("add a target node"));
    }

    #[test]
    fn test_diagnostic_display() {
        let diag = Diagnostic::new(ErrorCode::UnmatchedEnd, "`end` without an open subgraph")
            .with_location(4, 1, Span::new(30..33));

        assert_eq!(
            diag.to_string(),
            "4:1: error[UNMATCHED_END]: `end` without an open subgraph"
        );
    }

    #[test]
    fn test_diagnostic_serialization_shape() {
        let diag = Diagnostic::new(ErrorCode::MissingArrow, "not connected")
            .with_location(2, 3, Span::new(10..11));
        let json = serde_json::to_value(&diag).unwrap();

        assert_eq!(json["line"], 2);
        assert_eq!(json["column"], 3);
        assert_eq!(json["code"], "MISSING_ARROW");
        assert!(json.get("suggestion").is_none());
        assert!(json.get("span").is_none());
    }
}
