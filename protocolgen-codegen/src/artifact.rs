//! Generated artifacts and their naming conventions.

use std::fmt;

/// One of the generated header/body pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Artifact {
    /// Command dispatcher.
    Dispatcher,
    /// Event frontend.
    Frontend,
    /// Protocol type builders.
    TypeBuilder,
}

impl Artifact {
    /// All artifacts, in emission order.
    pub const ALL: [Self; 3] = [Self::Dispatcher, Self::Frontend, Self::TypeBuilder];

    /// Returns the artifact base name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Dispatcher => "Dispatcher",
            Self::Frontend => "Frontend",
            Self::TypeBuilder => "TypeBuilder",
        }
    }

    /// Returns the header template identifier (`<name>_h`).
    #[must_use]
    pub fn header_template(&self) -> String {
        format!("{}_h", self.name())
    }

    /// Returns the body template identifier (`<name>_cpp`).
    #[must_use]
    pub fn body_template(&self) -> String {
        format!("{}_cpp", self.name())
    }

    /// Returns the header output file name (`<name>.h`).
    #[must_use]
    pub fn header_file(&self) -> String {
        format!("{}.h", self.name())
    }

    /// Returns the body output file name (`<name>.cpp`).
    #[must_use]
    pub fn body_file(&self) -> String {
        format!("{}.cpp", self.name())
    }
}

impl fmt::Display for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Rendered sources of one artifact, not yet written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedArtifact {
    /// Artifact the sources belong to.
    pub artifact: Artifact,
    /// Header source.
    pub header: String,
    /// Body source.
    pub body: String,
}
