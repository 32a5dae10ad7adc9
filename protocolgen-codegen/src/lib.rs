//! # protocolgen Codegen
//!
//! Template-driven emission of protocol sources.
//!
//! This crate provides:
//! - The artifact set (`Dispatcher`, `Frontend`, `TypeBuilder`) and naming rules
//! - The emission context and template helpers
//! - A Handlebars renderer behind the [`Renderer`] trait
//! - Atomic writing of rendered `.h`/`.cpp` pairs

pub mod artifact;
pub mod context;
pub mod emitter;
pub mod error;
pub mod renderer;
pub mod writer;

pub use artifact::{Artifact, RenderedArtifact};
pub use context::{EmissionContext, TemplateData};
pub use emitter::CodeEmitter;
pub use error::CodegenError;
pub use renderer::{HandlebarsRenderer, Renderer};
pub use writer::write_atomic;

use std::path::{Path, PathBuf};

/// Generates every artifact from a protocol JSON string.
///
/// # Arguments
/// * `json` - Protocol schema content
/// * `renderer` - Template renderer
/// * `output_dir` - Directory receiving the generated files
///
/// # Returns
/// Paths of the written files, headers before bodies, in artifact order.
///
/// # Errors
/// Returns `CodegenError` if loading, rendering or writing fails. Nothing is
/// written when loading or rendering fails.
pub fn generate_from_json<R: Renderer>(
    json: &str,
    renderer: R,
    output_dir: &Path,
) -> Result<Vec<PathBuf>, CodegenError> {
    let loaded = protocolgen_schema::load_protocol(json)?;
    CodeEmitter::new(&loaded.protocol, &loaded.registry, renderer, output_dir).emit_all()
}

/// Generates every artifact from a protocol JSON file.
///
/// # Errors
/// Returns `CodegenError` if reading, loading, rendering or writing fails.
pub fn generate_from_file<R: Renderer>(
    path: &Path,
    renderer: R,
    output_dir: &Path,
) -> Result<Vec<PathBuf>, CodegenError> {
    let json = std::fs::read_to_string(path).map_err(|e| CodegenError::io(path, e))?;
    generate_from_json(&json, renderer, output_dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn template_dir() -> tempfile::TempDir {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        for artifact in Artifact::ALL {
            for id in [artifact.header_template(), artifact.body_template()] {
                std::fs::write(
                    dir.path().join(format!("{id}{}", renderer::TEMPLATE_SUFFIX)),
                    "{{class_name}}",
                )
                .expect("Failed to write template");
            }
        }
        dir
    }

    #[test]
    fn test_generate_from_json() {
        let templates = template_dir();
        let output = tempfile::tempdir().expect("Failed to create temp dir");

        let written = generate_from_json(
            r#"{"domains": [{"domain": "Page"}]}"#,
            HandlebarsRenderer::new(templates.path()),
            output.path(),
        )
        .expect("Failed to generate");

        assert_eq!(written.len(), 6);
        assert_eq!(
            std::fs::read_to_string(output.path().join("Frontend.cpp")).expect("Failed to read"),
            "Frontend"
        );
    }

    #[test]
    fn test_generate_from_json_invalid_schema() {
        let templates = template_dir();
        let output = tempfile::tempdir().expect("Failed to create temp dir");

        let result = generate_from_json(
            r#"{"version": "1.1"}"#,
            HandlebarsRenderer::new(templates.path()),
            output.path(),
        );
        assert!(matches!(result, Err(CodegenError::Schema(_))));
        assert_eq!(
            std::fs::read_dir(output.path()).expect("Failed to list").count(),
            0
        );
    }
}
