//! Astrolabe - a structural validator for Mermaid-style diagram sources.
//!
//! Decides whether a renderer would accept a diagram without invoking it, and
//! reports every problem with its line, column and a stable error code.
//!
//! The free functions [`validate`], [`is_valid`] and [`diagram_type`] cover
//! the common cases. A [`Validator`] adds configuration, such as the renderer
//! version the sources must be compatible with.

pub mod compat;
pub mod config;

mod error;

pub use astrolabe_core::{ast, kind};
pub use astrolabe_parser::{
    Span, ValidationResult,
    error::{Diagnostic, ErrorCode},
    validate, validate_bytes,
};

pub use error::AstrolabeError;

use std::{fs, io::Read, path::Path};

use log::{debug, info};

use astrolabe_core::kind::DiagramKind;

use config::AppConfig;

/// Returns true if `source` is a valid diagram.
///
/// # Examples
///
/// ```
/// assert!(astrolabe::is_valid("flowchart TD\nA --> B"));
/// assert!(!astrolabe::is_valid("flowchart TD\nA B"));
/// ```
pub fn is_valid(source: &str) -> bool {
    validate(source).is_valid()
}

/// Returns the diagram type of `source`, valid or not.
///
/// # Examples
///
/// ```
/// use astrolabe::kind::DiagramKind;
///
/// assert_eq!(astrolabe::diagram_type("sequenceDiagram"), DiagramKind::Sequence);
/// assert_eq!(astrolabe::diagram_type("nonsense"), DiagramKind::Unknown);
/// ```
pub fn diagram_type(source: &str) -> DiagramKind {
    validate(source).diagram_type()
}

/// Configured validation of diagram sources.
///
/// # Examples
///
/// ```
/// use astrolabe::{Validator, config::AppConfig};
///
/// let validator = Validator::new(AppConfig::default().with_target_version("1.0.0"));
/// let result = validator.validate("flowchart TD\nA --> B");
///
/// // The diagram is fine, but the renderer version is not the validated one.
/// assert!(!result.is_valid());
/// assert_eq!(result.diagnostics()[0].code().as_str(), "VERSION_MISMATCH");
/// ```
#[derive(Debug, Default)]
pub struct Validator {
    config: AppConfig,
}

impl Validator {
    /// Create a new validator with the given configuration.
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Validate source text, then apply the configured compatibility check.
    pub fn validate(&self, source: &str) -> ValidationResult {
        self.finish(validate(source))
    }

    /// Validate raw bytes; see [`validate_bytes`].
    pub fn validate_bytes(&self, input: Option<&[u8]>) -> ValidationResult {
        self.finish(validate_bytes(input))
    }

    /// Read and validate a file.
    ///
    /// # Errors
    ///
    /// Returns [`AstrolabeError::ReadFile`] if the file cannot be read. A file
    /// that is not UTF-8 text is not an error; it yields an
    /// `INVALID_INPUT_TYPE` diagnostic.
    pub fn validate_file(&self, path: impl AsRef<Path>) -> Result<ValidationResult, AstrolabeError> {
        let path = path.as_ref();
        info!(path:? = path; "Validating file");

        let bytes = fs::read(path).map_err(|err| AstrolabeError::read_file(path, err))?;
        Ok(self.validate_bytes(Some(bytes.as_slice())))
    }

    /// Read `reader` to the end and validate its content.
    ///
    /// # Errors
    ///
    /// Returns [`AstrolabeError::Io`] if reading fails.
    pub fn validate_reader(&self, mut reader: impl Read) -> Result<ValidationResult, AstrolabeError> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        Ok(self.validate_bytes(Some(bytes.as_slice())))
    }

    fn finish(&self, mut result: ValidationResult) -> ValidationResult {
        if let Some(target) = self.config.compatibility().target_version() {
            compat::apply(&mut result, target);
        }
        debug!(
            kind = result.diagram_type().as_str(),
            valid = result.is_valid(),
            diagnostics = result.diagnostics().len();
            "Validation finished"
        );
        result
    }
}
