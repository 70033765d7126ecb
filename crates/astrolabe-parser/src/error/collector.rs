//! Collector for accumulating diagnostics while a source is validated.
//!
//! Grammars report every problem they find and continue; the
//! [`DiagnosticCollector`] keeps them until the pass finishes.

use crate::error::Diagnostic;

/// A collector for accumulating diagnostics during validation.
#[derive(Debug, Default)]
pub struct DiagnosticCollector {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticCollector {
    /// Create a new empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit a diagnostic to this collector.
    pub fn emit(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Finish collection, returning diagnostics in source order.
    ///
    /// The sort is stable: diagnostics at the same position keep the order in
    /// which they were emitted.
    pub fn finish(mut self) -> Vec<Diagnostic> {
        self.diagnostics
            .sort_by_key(|diagnostic| (diagnostic.line(), diagnostic.column()));
        self.diagnostics
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::ErrorCode, span::Span};

    fn at(code: ErrorCode, line: usize, column: usize) -> Diagnostic {
        Diagnostic::new(code, code.description()).with_location(line, column, Span::default())
    }

    #[test]
    fn test_new_collector_finishes_empty() {
        let collector = DiagnosticCollector::new();
        assert!(collector.finish().is_empty());
    }

    #[test]
    fn test_collector_sorts_by_position() {
        let mut collector = DiagnosticCollector::new();

        collector.emit(at(ErrorCode::MissingSubgraphEnd, 2, 1));
        collector.emit(at(ErrorCode::IncompleteArrow, 1, 9));
        collector.emit(at(ErrorCode::MissingArrow, 1, 3));

        let codes: Vec<_> = collector.finish().iter().map(Diagnostic::code).collect();
        assert_eq!(
            codes,
            vec![
                ErrorCode::MissingArrow,
                ErrorCode::IncompleteArrow,
                ErrorCode::MissingSubgraphEnd
            ]
        );
    }

    #[test]
    fn test_collector_keeps_emission_order_on_ties() {
        let mut collector = DiagnosticCollector::new();

        collector.emit(at(ErrorCode::ParseError, 1, 1));
        collector.emit(at(ErrorCode::InlineCommentNotSupported, 1, 1));

        let diagnostics = collector.finish();
        assert_eq!(diagnostics[0].code(), ErrorCode::ParseError);
        assert_eq!(diagnostics[1].code(), ErrorCode::InlineCommentNotSupported);
    }
}
