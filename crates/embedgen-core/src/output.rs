//! Writing the generated header.
//!
//! The document is staged in a temporary file next to its destination and
//! renamed into place once fully written, so a failed run leaves any
//! previous header untouched.

use crate::error::{Error, Result};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

/// Conventional name of the generated header
pub const DEFAULT_HEADER_FILE_NAME: &str = "embedded.hpp";

/// Writes `contents` to `output_dir/file_name`, creating the directory if needed
pub fn write_header(output_dir: &Path, file_name: &str, contents: &str) -> Result<PathBuf> {
    std::fs::create_dir_all(output_dir).map_err(|e| Error::directory_create(output_dir, e))?;
    let path = output_dir.join(file_name);
    write_atomic(&path, contents)?;
    Ok(path)
}

/// Replaces `path` with `contents` in a single rename
pub fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut staged = NamedTempFile::new_in(dir).map_err(|e| Error::file_write(path, e))?;
    staged
        .write_all(contents.as_bytes())
        .and_then(|()| staged.as_file().sync_all())
        .map_err(|e| Error::file_write(path, e))?;

    debug!("Persisting {} ({} bytes)", path.display(), contents.len());
    staged
        .persist(path)
        .map_err(|e| Error::file_write(path, e.error))?;
    Ok(())
}
