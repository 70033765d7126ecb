//! Diagnostics reported by the validator.
//!
//! Every problem found in a diagram source is a [`Diagnostic`]: a stable
//! [`ErrorCode`], a human-readable message, the 1-based line and column of the
//! offending token, and optionally a suggested fix. Grammars never abort on
//! the first problem; they push diagnostics into a [`DiagnosticCollector`] and
//! keep going.
//!
//! # Example
//!
//! ```
//! # use astrolabe_parser::error::{Diagnostic, ErrorCode};
//! # use astrolabe_parser::Span;
//!
//! let diag = Diagnostic::new(ErrorCode::MissingArrow, "nodes `A` and `B` are not connected")
//!     .with_location(2, 7, Span::new(19..20))
//!     .with_suggestion("connect them with an arrow, e.g. `A --> B`");
//!
//! assert_eq!(diag.code().as_str(), "MISSING_ARROW");
//! assert_eq!(diag.line(), 2);
//! ```

mod collector;
mod diagnostic;
mod error_code;

pub(crate) use collector::DiagnosticCollector;

pub use diagnostic::Diagnostic;
pub use error_code::ErrorCode;
