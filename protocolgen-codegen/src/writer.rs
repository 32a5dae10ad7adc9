//! Atomic output file writes.

use crate::error::CodegenError;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Writes `contents` to `path` atomically.
///
/// The data goes to a temporary file next to `path`, which then replaces
/// the target. On any failure the temporary file is closed and removed and
/// the target is left untouched.
///
/// # Errors
/// Returns `CodegenError::Io` if the temporary file cannot be created,
/// written or moved into place.
pub fn write_atomic(path: &Path, contents: &str) -> Result<(), CodegenError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file = NamedTempFile::new_in(dir).map_err(|e| CodegenError::io(dir, e))?;
    file.write_all(contents.as_bytes())
        .map_err(|e| CodegenError::io(path, e))?;
    file.flush().map_err(|e| CodegenError::io(path, e))?;
    file.persist(path)
        .map_err(|e| CodegenError::io(path, e.error))?;

    tracing::info!("Wrote {}", path.display());
    Ok(())
}
