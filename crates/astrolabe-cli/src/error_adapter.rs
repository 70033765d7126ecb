//! Adapters from Astrolabe diagnostics and errors to miette reports.
//!
//! Every diagnostic of a [`ValidationResult`] is rendered as its own report,
//! with the offending source text underlined. Failures that happen before
//! validation, such as an unreadable file, are rendered without a snippet.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan, SourceSpan};

use astrolabe::{AstrolabeError, Diagnostic, Span, ValidationResult};

/// Adapter for a single validation diagnostic.
pub struct DiagnosticAdapter<'a> {
    diag: &'a Diagnostic,
    /// Source text the diagnostic points into
    src: &'a str,
}

impl<'a> DiagnosticAdapter<'a> {
    /// Create a new diagnostic adapter.
    pub fn new(diag: &'a Diagnostic, src: &'a str) -> Self {
        Self { diag, src }
    }
}

impl fmt::Debug for DiagnosticAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiagnosticAdapter")
            .field("diag", &self.diag)
            .finish()
    }
}

impl fmt::Display for DiagnosticAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}: {}",
            self.diag.line(),
            self.diag.column(),
            self.diag.message()
        )
    }
}

impl std::error::Error for DiagnosticAdapter<'_> {}

impl MietteDiagnostic for DiagnosticAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(self.diag.code()))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.diag
            .suggestion()
            .map(|s| Box::new(s) as Box<dyn fmt::Display>)
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        if self.src.is_empty() {
            return None;
        }
        Some(&self.src as &dyn miette::SourceCode)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        if self.src.is_empty() {
            return None;
        }

        let label = LabeledSpan::new_primary_with_span(
            Some(self.diag.code().description().to_string()),
            span_to_miette(self.diag.span(), self.src.len()),
        );
        Some(Box::new(std::iter::once(label)))
    }
}

/// Adapter for [`AstrolabeError`], which carries no source location.
pub struct ErrorAdapter<'a>(pub &'a AstrolabeError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match &self.0 {
            AstrolabeError::Io(_) => "astrolabe::io",
            AstrolabeError::ReadFile { .. } => "astrolabe::read",
        };
        Some(Box::new(code))
    }
}

/// A report that can be rendered by miette.
#[derive(Debug)]
pub enum Reportable<'a> {
    /// A validation diagnostic with a source location.
    Diagnostic(DiagnosticAdapter<'a>),
    /// An error without a source location.
    Error(ErrorAdapter<'a>),
}

impl fmt::Display for Reportable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reportable::Diagnostic(d) => fmt::Display::fmt(d, f),
            Reportable::Error(e) => fmt::Display::fmt(e, f),
        }
    }
}

impl std::error::Error for Reportable<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Reportable::Diagnostic(_) => None,
            Reportable::Error(e) => e.source(),
        }
    }
}

impl MietteDiagnostic for Reportable<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Diagnostic(d) => d.code(),
            Reportable::Error(e) => e.code(),
        }
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Diagnostic(d) => d.help(),
            Reportable::Error(e) => e.help(),
        }
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        match self {
            Reportable::Diagnostic(d) => d.source_code(),
            Reportable::Error(e) => e.source_code(),
        }
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        match self {
            Reportable::Diagnostic(d) => d.labels(),
            Reportable::Error(e) => e.labels(),
        }
    }
}

/// Convert an Astrolabe [`Span`] to a miette [`SourceSpan`], clamped to
/// the source length.
fn span_to_miette(span: Span, src_len: usize) -> SourceSpan {
    let start = span.start().min(src_len);
    let end = span.end().min(src_len);
    SourceSpan::new(start.into(), end - start)
}

/// One reportable per diagnostic of `result`, in diagnostic order.
pub fn diagnostics_to_reportables<'a>(
    result: &'a ValidationResult,
    src: &'a str,
) -> Vec<Reportable<'a>> {
    result
        .diagnostics()
        .iter()
        .map(|d| Reportable::Diagnostic(DiagnosticAdapter::new(d, src)))
        .collect()
}

/// Wrap an [`AstrolabeError`] for rendering.
pub fn error_to_reportable(err: &AstrolabeError) -> Reportable<'_> {
    Reportable::Error(ErrorAdapter(err))
}

#[cfg(test)]
mod tests {
    use std::io;

    use astrolabe::{ErrorCode, validate};

    use super::*;

    #[test]
    fn test_one_reportable_per_diagnostic() {
        let src = "flowchart TD\nA B\nend";
        let result = validate(src);

        let reportables = diagnostics_to_reportables(&result, src);
        assert_eq!(reportables.len(), 2);
        let first = reportables[0].to_string();
        assert!(first.starts_with("2:"));
        assert!(first.ends_with(result.diagnostics()[0].message()));
        assert!(reportables[1].to_string().starts_with("3:"));
    }

    #[test]
    fn test_code_and_help() {
        let diag = Diagnostic::new(ErrorCode::MissingArrow, "missing arrow")
            .with_location(2, 1, Span::new(13..14))
            .with_suggestion("write `A --> B`");
        let adapter = DiagnosticAdapter::new(&diag, "flowchart TD\nA B");

        assert_eq!(adapter.code().unwrap().to_string(), "MISSING_ARROW");
        assert_eq!(adapter.help().unwrap().to_string(), "write `A --> B`");
    }

    #[test]
    fn test_label_uses_code_description() {
        let diag = Diagnostic::new(ErrorCode::MissingArrow, "missing arrow")
            .with_location(2, 1, Span::new(13..14));
        let adapter = DiagnosticAdapter::new(&diag, "flowchart TD\nA B");

        let labels: Vec<_> = adapter.labels().unwrap().collect();
        assert_eq!(labels.len(), 1);
        assert_eq!(labels[0].label(), Some(ErrorCode::MissingArrow.description()));
        assert_eq!(labels[0].offset(), 13);
        assert_eq!(labels[0].len(), 1);
        assert!(labels[0].primary());
    }

    #[test]
    fn test_empty_source_has_no_snippet() {
        let diag = Diagnostic::new(ErrorCode::EmptyInput, "input is empty");
        let adapter = DiagnosticAdapter::new(&diag, "");

        assert!(adapter.source_code().is_none());
        assert!(adapter.labels().is_none());
    }

    #[test]
    fn test_span_is_clamped() {
        let span = span_to_miette(Span::new(3..40), 10);
        assert_eq!(span.offset(), 3);
        assert_eq!(span.len(), 7);
    }

    #[test]
    fn test_error_reportable() {
        let err = AstrolabeError::read_file(
            "missing.mmd",
            io::Error::new(io::ErrorKind::NotFound, "not found"),
        );

        let reportable = error_to_reportable(&err);
        assert_eq!(reportable.code().unwrap().to_string(), "astrolabe::read");
        assert!(reportable.to_string().contains("missing.mmd"));
        assert!(reportable.labels().is_none());
    }
}
