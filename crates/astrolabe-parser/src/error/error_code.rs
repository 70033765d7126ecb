//! Error codes for the Astrolabe diagnostic system.
//!
//! Codes are stable identifiers that external tooling matches on, so their
//! string forms never change once published.

use std::fmt;

use serde::{Serialize, Serializer};

/// Error codes for categorizing diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // =========================================================================
    // Input
    // =========================================================================
    /// The input was not text.
    InvalidInputType,

    /// The input was missing, empty, or whitespace only.
    EmptyInput,

    // =========================================================================
    // Flowchart structure
    // =========================================================================
    /// Two nodes on one line with nothing linking them.
    MissingArrow,

    /// An arrow with no destination node.
    IncompleteArrow,

    /// A `subgraph` block that is never closed with `end`.
    MissingSubgraphEnd,

    /// An `end` with no open `subgraph`.
    UnmatchedEnd,

    /// A flowchart header or `direction` statement naming an unknown direction.
    InvalidDirection,

    // =========================================================================
    // Sequence structure
    // =========================================================================
    /// A `participant` or `actor` declaration without a name.
    MissingParticipantName,

    /// A message arrow missing its sender or receiver.
    IncompleteMessage,

    // =========================================================================
    // Dispatch and directives
    // =========================================================================
    /// The first significant token is not a recognized diagram header.
    UnsupportedDiagramType,

    /// A styling statement in a diagram type that does not accept it.
    UnsupportedStylingDirective,

    /// A `classDef` using `key=value` instead of `key:value`.
    UnsupportedClassdefEqualsSyntax,

    /// A `linkStyle` index that refers to no link defined so far.
    InvalidLinkstyleIndex,

    /// A `title` statement in a diagram type that does not accept it.
    UnsupportedTitleDirective,

    /// A `note` without a placement (`left of`, `right of`, `over`).
    InvalidNoteSyntax,

    /// A `%%` comment following other content on the same line.
    InlineCommentNotSupported,

    // =========================================================================
    // XY chart
    // =========================================================================
    /// A chart with no data series.
    MissingData,

    /// A series kind the renderer does not draw (`area`, `scatter`).
    UnsupportedChartType,

    /// The generic `series` statement.
    UnsupportedSeriesSyntax,

    /// An `x-axis` without a bracketed category list.
    InvalidXAxisSyntax,

    /// A `y-axis` with a malformed range.
    InvalidYAxisSyntax,

    /// A category label that must be quoted.
    InvalidIdentifier,

    // =========================================================================
    // General
    // =========================================================================
    /// The declared renderer version is not supported.
    VersionMismatch,

    /// Any other syntax error.
    ParseError,

    /// An internal failure while validating.
    ValidationError,
}

impl ErrorCode {
    /// Returns the stable string form of the code (e.g. `"MISSING_ARROW"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::InvalidInputType => "INVALID_INPUT_TYPE",
            ErrorCode::EmptyInput => "EMPTY_INPUT",
            ErrorCode::MissingArrow => "MISSING_ARROW",
            ErrorCode::IncompleteArrow => "INCOMPLETE_ARROW",
            ErrorCode::MissingSubgraphEnd => "MISSING_SUBGRAPH_END",
            ErrorCode::UnmatchedEnd => "UNMATCHED_END",
            ErrorCode::InvalidDirection => "INVALID_DIRECTION",
            ErrorCode::MissingParticipantName => "MISSING_PARTICIPANT_NAME",
            ErrorCode::IncompleteMessage => "INCOMPLETE_MESSAGE",
            ErrorCode::UnsupportedDiagramType => "UNSUPPORTED_DIAGRAM_TYPE",
            ErrorCode::UnsupportedStylingDirective => "UNSUPPORTED_STYLING_DIRECTIVE",
            ErrorCode::UnsupportedClassdefEqualsSyntax => "UNSUPPORTED_CLASSDEF_EQUALS_SYNTAX",
            ErrorCode::InvalidLinkstyleIndex => "INVALID_LINKSTYLE_INDEX",
            ErrorCode::UnsupportedTitleDirective => "UNSUPPORTED_TITLE_DIRECTIVE",
            ErrorCode::InvalidNoteSyntax => "INVALID_NOTE_SYNTAX",
            ErrorCode::InlineCommentNotSupported => "INLINE_COMMENT_NOT_SUPPORTED",
            ErrorCode::MissingData => "MISSING_DATA",
            ErrorCode::UnsupportedChartType => "UNSUPPORTED_CHART_TYPE",
            ErrorCode::UnsupportedSeriesSyntax => "UNSUPPORTED_SERIES_SYNTAX",
            ErrorCode::InvalidXAxisSyntax => "INVALID_X_AXIS_SYNTAX",
            ErrorCode::InvalidYAxisSyntax => "INVALID_Y_AXIS_SYNTAX",
            ErrorCode::InvalidIdentifier => "INVALID_IDENTIFIER",
            ErrorCode::VersionMismatch => "VERSION_MISMATCH",
            ErrorCode::ParseError => "PARSE_ERROR",
            ErrorCode::ValidationError => "VALIDATION_ERROR",
        }
    }

    /// Returns a short description of what this error code means.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::InvalidInputType => "input is not text",
            ErrorCode::EmptyInput => "empty input",
            ErrorCode::MissingArrow => "unconnected nodes",
            ErrorCode::IncompleteArrow => "arrow without destination",
            ErrorCode::MissingSubgraphEnd => "unclosed subgraph",
            ErrorCode::UnmatchedEnd => "unmatched end",
            ErrorCode::InvalidDirection => "invalid direction",
            ErrorCode::MissingParticipantName => "missing participant name",
            ErrorCode::IncompleteMessage => "incomplete message",
            ErrorCode::UnsupportedDiagramType => "unsupported diagram type",
            ErrorCode::UnsupportedStylingDirective => "unsupported styling directive",
            ErrorCode::UnsupportedClassdefEqualsSyntax => "unsupported classDef syntax",
            ErrorCode::InvalidLinkstyleIndex => "invalid linkStyle index",
            ErrorCode::UnsupportedTitleDirective => "unsupported title",
            ErrorCode::InvalidNoteSyntax => "invalid note",
            ErrorCode::InlineCommentNotSupported => "inline comment",
            ErrorCode::MissingData => "missing chart data",
            ErrorCode::UnsupportedChartType => "unsupported chart type",
            ErrorCode::UnsupportedSeriesSyntax => "unsupported series syntax",
            ErrorCode::InvalidXAxisSyntax => "invalid x-axis",
            ErrorCode::InvalidYAxisSyntax => "invalid y-axis",
            ErrorCode::InvalidIdentifier => "label must be quoted",
            ErrorCode::VersionMismatch => "unsupported renderer version",
            ErrorCode::ParseError => "syntax error",
            ErrorCode::ValidationError => "internal validation failure",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for ErrorCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_display() {
        assert_eq!(ErrorCode::MissingArrow.to_string(), "MISSING_ARROW");
        assert_eq!(ErrorCode::InvalidXAxisSyntax.to_string(), "INVALID_X_AXIS_SYNTAX");
        assert_eq!(
            ErrorCode::UnsupportedClassdefEqualsSyntax.to_string(),
            "UNSUPPORTED_CLASSDEF_EQUALS_SYNTAX"
        );
    }

    #[test]
    fn test_error_code_description() {
        assert_eq!(ErrorCode::EmptyInput.description(), "empty input");
        assert_eq!(ErrorCode::UnmatchedEnd.description(), "unmatched end");
    }

    #[test]
    fn test_error_code_serializes_as_string() {
        let json = serde_json::to_string(&ErrorCode::InvalidLinkstyleIndex).unwrap();
        assert_eq!(json, "\"INVALID_LINKSTYLE_INDEX\"");
    }
}
