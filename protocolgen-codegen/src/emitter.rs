//! Artifact emission.

use crate::artifact::{Artifact, RenderedArtifact};
use crate::context::EmissionContext;
use crate::error::CodegenError;
use crate::renderer::Renderer;
use crate::writer::write_atomic;
use protocolgen_schema::{Protocol, TypeDescriptorRegistry};
use std::path::{Path, PathBuf};

/// Renders artifacts through a [`Renderer`] and writes them to a directory.
pub struct CodeEmitter<'a, R> {
    protocol: &'a Protocol,
    registry: &'a TypeDescriptorRegistry,
    renderer: R,
    output_dir: PathBuf,
}

impl<'a, R: Renderer> CodeEmitter<'a, R> {
    /// Creates a new emitter.
    #[must_use]
    pub fn new(
        protocol: &'a Protocol,
        registry: &'a TypeDescriptorRegistry,
        renderer: R,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            protocol,
            registry,
            renderer,
            output_dir: output_dir.into(),
        }
    }

    /// Returns the output directory.
    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Returns the emission context for `artifact`.
    #[must_use]
    pub fn context(&self, artifact: Artifact) -> EmissionContext<'a> {
        EmissionContext::new(artifact, self.protocol, self.registry)
    }

    /// Renders the header and body of `artifact` without writing them.
    ///
    /// # Errors
    /// Returns `CodegenError` if either render fails.
    pub fn render(&self, artifact: Artifact) -> Result<RenderedArtifact, CodegenError> {
        let context = self.context(artifact);
        let header = self
            .renderer
            .render(&artifact.header_template(), &context)?;
        let body = self.renderer.render(&artifact.body_template(), &context)?;
        Ok(RenderedArtifact {
            artifact,
            header,
            body,
        })
    }

    /// Writes a rendered artifact and returns the written paths.
    ///
    /// # Errors
    /// Returns `CodegenError::Io` if a file cannot be written.
    pub fn write(&self, rendered: &RenderedArtifact) -> Result<Vec<PathBuf>, CodegenError> {
        let header_path = self.output_dir.join(rendered.artifact.header_file());
        let body_path = self.output_dir.join(rendered.artifact.body_file());
        write_atomic(&header_path, &rendered.header)?;
        write_atomic(&body_path, &rendered.body)?;
        Ok(vec![header_path, body_path])
    }

    /// Renders and writes one artifact.
    ///
    /// Nothing is written unless both renders succeed.
    ///
    /// # Errors
    /// Returns `CodegenError` if rendering or writing fails.
    pub fn emit(&self, artifact: Artifact) -> Result<Vec<PathBuf>, CodegenError> {
        let rendered = self.render(artifact)?;
        self.write(&rendered)
    }

    /// Renders every artifact, then writes them all.
    ///
    /// A render failure in any artifact aborts the run before the first
    /// file is written.
    ///
    /// # Errors
    /// Returns `CodegenError` if rendering or writing fails.
    pub fn emit_all(&self) -> Result<Vec<PathBuf>, CodegenError> {
        let rendered = Artifact::ALL
            .into_iter()
            .map(|artifact| self.render(artifact))
            .collect::<Result<Vec<_>, _>>()?;

        let mut written = Vec::with_capacity(rendered.len() * 2);
        for artifact in &rendered {
            written.extend(self.write(artifact)?);
        }
        tracing::info!(
            "Emitted {} files into {}",
            written.len(),
            self.output_dir.display()
        );
        Ok(written)
    }
}
