//! Source files and the resources built from them.

use crate::chunk::{ChunkLayout, ChunkPlanner};
use crate::encode::{BinaryEncoder, TextLines};
use crate::error::{Error, Result};
use crate::ident::{EmbedMode, SanitizedName};
use std::path::{Path, PathBuf};
use tracing::warn;

/// A file read from the embedding root
#[derive(Debug, Clone)]
pub struct SourceFile {
    /// Path the content was read from
    pub path: PathBuf,
    /// Path relative to the embedding root, `/` separated
    pub relative_path: String,
    /// Raw content
    pub content: Vec<u8>,
}

impl SourceFile {
    /// Reads `path`, which must lie under `root`
    pub fn read(root: &Path, path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let content = std::fs::read(&path).map_err(|e| Error::file_read(&path, e))?;
        let relative = path.strip_prefix(root).unwrap_or(path.as_path());
        Ok(Self {
            relative_path: relative_path_string(relative),
            path,
            content,
        })
    }

    /// Creates an in-memory source file
    pub fn new(relative_path: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        let relative_path = relative_path.into();
        Self {
            path: PathBuf::from(&relative_path),
            relative_path,
            content: content.into(),
        }
    }
}

/// Joins path components with `/` regardless of platform
pub(crate) fn relative_path_string(path: &Path) -> String {
    path.iter()
        .map(|c| c.to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Everything needed to render one file's declarations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddedResource {
    /// Unique C++ identifier
    pub identifier: String,
    /// Value of the `_name` constant
    pub display_name: String,
    /// Text or binary rendering
    pub mode: EmbedMode,
    /// Escaped content
    pub layout: ChunkLayout,
}

impl EmbeddedResource {
    /// Encodes `content` in the mode chosen for `name`
    pub fn build(name: SanitizedName, content: &[u8], planner: &ChunkPlanner) -> Self {
        let layout = match name.mode {
            EmbedMode::Text => {
                let text = TextLines::decode(content);
                if text.replaced > 0 {
                    warn!(
                        "{}: replaced {} byte(s) outside the 7-bit range with '?'",
                        name.display_name, text.replaced
                    );
                }
                planner.plan_text(&text.lines)
            }
            EmbedMode::Binary => planner.plan_binary(BinaryEncoder::new(content)),
        };

        Self {
            identifier: name.identifier,
            display_name: name.display_name,
            mode: name.mode,
            layout,
        }
    }

    /// Logical content length across all chunks
    pub fn content_len(&self) -> usize {
        self.layout.total_len()
    }
}
