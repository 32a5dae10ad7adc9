//! Generator configuration.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Template directory shipped with this crate.
pub const DEFAULT_TEMPLATE_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/templates");

/// Error type for incomplete configurations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A required setting was not provided.
    #[error("missing required setting '{0}'")]
    Missing(&'static str),
}

/// Settings for one generator run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    schema_path: PathBuf,
    output_dir: PathBuf,
    template_dir: PathBuf,
}

impl GeneratorConfig {
    /// Returns a builder.
    #[must_use]
    pub fn builder() -> GeneratorConfigBuilder {
        GeneratorConfigBuilder::new()
    }

    /// Returns the protocol schema path.
    #[must_use]
    pub fn schema_path(&self) -> &Path {
        &self.schema_path
    }

    /// Returns the output directory.
    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Returns the template directory.
    #[must_use]
    pub fn template_dir(&self) -> &Path {
        &self.template_dir
    }
}

/// Builder for [`GeneratorConfig`].
#[derive(Debug, Clone)]
pub struct GeneratorConfigBuilder {
    schema_path: Option<PathBuf>,
    output_dir: Option<PathBuf>,
    template_dir: PathBuf,
}

impl GeneratorConfigBuilder {
    /// Creates a builder using the shipped templates.
    #[must_use]
    pub fn new() -> Self {
        Self {
            schema_path: None,
            output_dir: None,
            template_dir: PathBuf::from(DEFAULT_TEMPLATE_DIR),
        }
    }

    /// Sets the protocol schema path.
    #[must_use]
    pub fn schema_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.schema_path = Some(path.into());
        self
    }

    /// Sets the output directory.
    #[must_use]
    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    /// Sets the template directory.
    #[must_use]
    pub fn template_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.template_dir = dir.into();
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    /// Returns `ConfigError::Missing` if the schema path or output directory
    /// was not set.
    pub fn build(self) -> Result<GeneratorConfig, ConfigError> {
        Ok(GeneratorConfig {
            schema_path: self.schema_path.ok_or(ConfigError::Missing("schema_path"))?,
            output_dir: self.output_dir.ok_or(ConfigError::Missing("output_dir"))?,
            template_dir: self.template_dir,
        })
    }
}

impl Default for GeneratorConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults_template_dir() {
        let config = GeneratorConfig::builder()
            .schema_path("protocol.json")
            .output_dir("out")
            .build()
            .expect("Failed to build config");

        assert_eq!(config.schema_path(), Path::new("protocol.json"));
        assert_eq!(config.output_dir(), Path::new("out"));
        assert_eq!(config.template_dir(), Path::new(DEFAULT_TEMPLATE_DIR));
        assert!(config.template_dir().ends_with("templates"));
    }

    #[test]
    fn test_builder_template_override() {
        let config = GeneratorConfigBuilder::default()
            .schema_path("protocol.json")
            .output_dir("out")
            .template_dir("/opt/templates")
            .build()
            .expect("Failed to build config");

        assert_eq!(config.template_dir(), Path::new("/opt/templates"));
    }

    #[test]
    fn test_builder_missing_settings() {
        assert_eq!(
            GeneratorConfig::builder().output_dir("out").build(),
            Err(ConfigError::Missing("schema_path"))
        );
        assert_eq!(
            GeneratorConfig::builder().schema_path("protocol.json").build(),
            Err(ConfigError::Missing("output_dir"))
        );
    }
}
