//! Configuration file loading for the CLI
//!
//! Configuration is read from the first TOML file found among a list of
//! candidate locations. Without one the defaults apply.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use log::{debug, info};
use thiserror::Error;

use astrolabe::{AstrolabeError, config::AppConfig};

/// Configuration-related errors for CLI
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse TOML configuration: {0}")]
    Parse(String),

    #[error("Missing configuration file: {0}")]
    MissingFile(PathBuf),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<ConfigError> for AstrolabeError {
    fn from(err: ConfigError) -> Self {
        AstrolabeError::Io(io::Error::other(err.to_string()))
    }
}

/// Where a configuration file was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfigSource {
    /// Given with `--config`.
    Explicit,
    /// `astrolabe/config.toml` under the working directory.
    Local,
    /// The platform configuration directory.
    System,
}

impl ConfigSource {
    fn as_str(self) -> &'static str {
        match self {
            ConfigSource::Explicit => "explicit",
            ConfigSource::Local => "local",
            ConfigSource::System => "system",
        }
    }
}

/// Candidate configuration files, most specific first.
///
/// An explicit path is the only candidate when given, so a missing file is
/// reported instead of silently falling back.
fn candidates(explicit_path: Option<&Path>) -> Vec<(ConfigSource, PathBuf)> {
    if let Some(path) = explicit_path {
        return vec![(ConfigSource::Explicit, path.to_path_buf())];
    }

    let mut candidates = vec![(ConfigSource::Local, PathBuf::from("astrolabe/config.toml"))];
    match ProjectDirs::from("com", "astrolabe", "astrolabe") {
        Some(dirs) => candidates.push((ConfigSource::System, dirs.config_dir().join("config.toml"))),
        None => debug!("Could not determine platform-specific config directory"),
    }
    candidates
}

/// Find and load configuration, falling back to the defaults.
///
/// # Errors
///
/// Returns error if an explicit path does not exist, or if the selected file
/// cannot be read, parsed, or holds invalid values.
pub fn load_config(explicit_path: Option<impl AsRef<Path>>) -> Result<AppConfig, AstrolabeError> {
    let explicit_path: Option<&Path> = explicit_path.as_ref().map(|path| path.as_ref());

    for (source, path) in candidates(explicit_path) {
        if !path.exists() {
            if source == ConfigSource::Explicit {
                return Err(ConfigError::MissingFile(path).into());
            }
            debug!(source = source.as_str(), path = path.display().to_string(); "Configuration file not found");
            continue;
        }

        info!(source = source.as_str(), path = path.display().to_string(); "Loading configuration");
        let content = fs::read_to_string(&path)?;
        return Ok(parse_config(&content)?);
    }

    debug!("No configuration file found, using default configuration");
    Ok(AppConfig::default())
}

fn parse_config(content: &str) -> Result<AppConfig, ConfigError> {
    let config: AppConfig = toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;

    if config
        .compatibility()
        .target_version()
        .is_some_and(|version| version.trim().is_empty())
    {
        return Err(ConfigError::Validation(
            "compatibility.target_version must not be empty".to_string(),
        ));
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let config = parse_config("[compatibility]\ntarget_version = \"11.4.1\"\n").unwrap();
        assert_eq!(config.compatibility().target_version(), Some("11.4.1"));
    }

    #[test]
    fn test_invalid_toml() {
        let err = parse_config("[compatibility\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_empty_target_version() {
        let err = parse_config("[compatibility]\ntarget_version = \"  \"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_explicit_path_is_the_only_candidate() {
        let found = candidates(Some(Path::new("custom.toml")));
        assert_eq!(found, vec![(ConfigSource::Explicit, PathBuf::from("custom.toml"))]);
    }

    #[test]
    fn test_local_candidate_comes_first() {
        let found = candidates(None);
        assert_eq!(found[0], (ConfigSource::Local, PathBuf::from("astrolabe/config.toml")));
        assert!(found[1..].iter().all(|(source, _)| *source == ConfigSource::System));
    }

    #[test]
    fn test_load_explicit_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut file, b"[compatibility]\ntarget_version = \"10.9.0\"\n").unwrap();

        let config = load_config(Some(file.path())).unwrap();
        assert_eq!(config.compatibility().target_version(), Some("10.9.0"));
    }

    #[test]
    fn test_missing_explicit_file() {
        let err = load_config(Some("does/not/exist.toml")).unwrap_err();
        assert!(err.to_string().contains("does/not/exist.toml"));
    }
}
