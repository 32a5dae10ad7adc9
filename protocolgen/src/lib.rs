//! # protocolgen
//!
//! Schema-driven generator for protocol dispatcher, frontend and type
//! builder sources.
//!
//! A protocol schema (JSON, top-level `domains`) is loaded into typed
//! records, its type references are qualified, a registry of C++ type
//! descriptors is bootstrapped from it, and three artifacts are rendered
//! from templates as `.h`/`.cpp` pairs.
//!
//! ## Quick Start
//!
//! ```ignore
//! use protocolgen::{GeneratorConfig, run};
//!
//! let config = GeneratorConfig::builder()
//!     .schema_path("protocol.json")
//!     .output_dir("gen")
//!     .build()?;
//! let written = run(&config)?;
//! ```
//!
//! ## Crate Organization
//!
//! - [`schema`] - Schema loading, reference qualification and type resolution
//! - [`codegen`] - Template rendering and artifact emission
//! - [`config`] - Generator settings

pub mod config;

/// Schema loading and type resolution.
pub mod schema {
    pub use protocolgen_schema::*;
}

/// Template rendering and artifact emission.
pub mod codegen {
    pub use protocolgen_codegen::*;
}

pub use config::{ConfigError, GeneratorConfig, GeneratorConfigBuilder};

use protocolgen_codegen::{CodeEmitter, CodegenError, HandlebarsRenderer};
use std::path::PathBuf;

/// Runs the generator described by `config`.
///
/// # Returns
/// Paths of the written files.
///
/// # Errors
/// Returns `CodegenError` if the schema cannot be read or loaded, a template
/// fails, or an output file cannot be written. No artifact file is written
/// unless every artifact rendered successfully.
pub fn run(config: &GeneratorConfig) -> Result<Vec<PathBuf>, CodegenError> {
    let schema_path = config.schema_path();
    tracing::info!("Loading protocol from {}", schema_path.display());
    let json = std::fs::read_to_string(schema_path)
        .map_err(|e| CodegenError::io(schema_path, e))?;

    let loaded = protocolgen_schema::load_protocol(&json)?;
    tracing::info!(
        "Loaded {} domains, {} type descriptors",
        loaded.protocol.domains.len(),
        loaded.registry.len()
    );

    tracing::info!("Rendering templates from {}", config.template_dir().display());
    let renderer = HandlebarsRenderer::new(config.template_dir());
    CodeEmitter::new(
        &loaded.protocol,
        &loaded.registry,
        renderer,
        config.output_dir(),
    )
    .emit_all()
}
