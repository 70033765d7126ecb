//! Configuration types for Astrolabe validation.
//!
//! All types implement [`serde::Deserialize`] so they can be loaded from a
//! TOML file. Every section is optional and falls back to its default.
//!
//! # Example
//!
//! ```
//! # use astrolabe::config::AppConfig;
//! let config = AppConfig::default();
//! assert_eq!(config.compatibility().target_version(), None);
//! ```

use serde::Deserialize;

/// Top-level application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AppConfig {
    /// Renderer compatibility section.
    #[serde(default)]
    compatibility: CompatibilityConfig,
}

impl AppConfig {
    pub fn new(compatibility: CompatibilityConfig) -> Self {
        Self { compatibility }
    }

    /// Returns the compatibility configuration.
    pub fn compatibility(&self) -> &CompatibilityConfig {
        &self.compatibility
    }

    /// Replace the target renderer version, keeping everything else.
    pub fn with_target_version(mut self, version: impl Into<String>) -> Self {
        self.compatibility.target_version = Some(version.into());
        self
    }
}

/// Which renderer version validated sources must be compatible with.
///
/// When `target_version` is set, every validation is followed by a version
/// check against the renderer version this validator was verified with.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
pub struct CompatibilityConfig {
    #[serde(default)]
    target_version: Option<String>,
}

impl CompatibilityConfig {
    pub fn new(target_version: Option<String>) -> Self {
        Self { target_version }
    }

    /// Returns the configured renderer version, if any.
    pub fn target_version(&self) -> Option<&str> {
        self.target_version.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_target_version_from_toml() {
        let config: AppConfig = toml::from_str(
            r#"
            [compatibility]
            target_version = "11.4.1"
            "#,
        )
        .unwrap();
        assert_eq!(config.compatibility().target_version(), Some("11.4.1"));
    }

    #[test]
    fn test_with_target_version_overrides() {
        let config = AppConfig::new(CompatibilityConfig::new(Some("10.0.0".to_string())))
            .with_target_version("11.4.1");
        assert_eq!(config.compatibility().target_version(), Some("11.4.1"));
    }
}
