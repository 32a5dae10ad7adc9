//! Error types for code emission.

use std::path::PathBuf;
use thiserror::Error;

/// Error type for code emission operations.
#[derive(Debug, Error)]
pub enum CodegenError {
    /// Schema parsing error.
    #[error("schema parse error: {0}")]
    Parse(#[from] protocolgen_schema::ParseError),

    /// Schema validation or type resolution error.
    #[error("schema error: {0}")]
    Schema(#[from] protocolgen_schema::SchemaError),

    /// IO error on a specific path.
    #[error("IO error on '{}': {source}", path.display())]
    Io {
        /// Path being read or written.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Template could not be loaded or compiled.
    #[error("template error: {0}")]
    Template(#[from] Box<handlebars::TemplateError>),

    /// Template rendering failed.
    #[error("render error: {0}")]
    Render(#[from] Box<handlebars::RenderError>),

    /// Template file does not exist.
    #[error("template '{template}' not found at '{}'", path.display())]
    TemplateNotFound {
        /// Template identifier.
        template: String,
        /// Expected file path.
        path: PathBuf,
    },
}

impl CodegenError {
    /// Creates an IO error for `path`.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<handlebars::TemplateError> for CodegenError {
    fn from(err: handlebars::TemplateError) -> Self {
        Self::Template(Box::new(err))
    }
}

impl From<handlebars::RenderError> for CodegenError {
    fn from(err: handlebars::RenderError) -> Self {
        Self::Render(Box::new(err))
    }
}
