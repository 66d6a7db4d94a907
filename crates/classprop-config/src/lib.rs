//! Engine configuration for ClassProp, read from `classprop.toml`.

use serde::Deserialize;
use std::{fs, path::Path};
use thiserror::Error as ThisError;

/// File name looked up by callers that load configuration from disk.
pub const CONFIG_FILE_NAME: &str = "classprop.toml";

/// Marker that routes a property declaration to the persistence extension.
pub const DEFAULT_EXTENSION_MARKER: &str = "database-column";

///
/// ConfigError
///

#[derive(Debug, ThisError)]
pub enum ConfigError {
    #[error("failed to read config '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

///
/// EngineConfig
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    pub catalog: CatalogConfig,
}

impl EngineConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(raw)?;
        config.check()?;

        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "loading engine config");

        Self::from_toml_str(&raw)
    }

    fn check(&self) -> Result<(), ConfigError> {
        let marker = self.catalog.extension_marker.as_str();
        if marker.is_empty() || marker.chars().any(char::is_whitespace) || marker.starts_with('@')
        {
            return Err(ConfigError::Invalid(format!(
                "catalog.extension_marker '{marker}' must be a bare tag name"
            )));
        }

        Ok(())
    }
}

///
/// CatalogConfig
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct CatalogConfig {
    /// Populate every per-type cache when the catalog is built.
    pub warm_on_build: bool,

    /// While warming, a concrete entity without an identifier is an error.
    pub require_identifiers: bool,

    pub extension_marker: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            warm_on_build: false,
            require_identifiers: false,
            extension_marker: DEFAULT_EXTENSION_MARKER.to_string(),
        }
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let config = EngineConfig::from_toml_str("").unwrap();

        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.catalog.extension_marker, "database-column");
        assert!(!config.catalog.warm_on_build);
    }

    #[test]
    fn catalog_table_overrides_fields() {
        let config = EngineConfig::from_toml_str(
            r#"
            [catalog]
            warm_on_build = true
            require_identifiers = true
            extension_marker = "column"
            "#,
        )
        .unwrap();

        assert!(config.catalog.warm_on_build);
        assert!(config.catalog.require_identifiers);
        assert_eq!(config.catalog.extension_marker, "column");
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = EngineConfig::from_toml_str("[catalog]\nwarm = true\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));

        let err = EngineConfig::from_toml_str("[cache]\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn marker_must_be_a_bare_tag() {
        let err = EngineConfig::from_toml_str("[catalog]\nextension_marker = \"@col\"\n")
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = EngineConfig::from_path("/nonexistent/classprop.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
