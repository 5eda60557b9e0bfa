//! Extensible document writing traits.
//!
//! [`ResourceWriter`] receives the document in order: the preamble, each
//! resource, then the closing lines. The C++ header renderer implements it,
//! and so does [`StatsWriter`] for reporting.

use crate::ident::EmbedMode;
use crate::resource::EmbeddedResource;
use std::fmt::Result;

/// Trait for visiting the parts of a generated document.
///
/// All methods default to doing nothing.
pub trait ResourceWriter {
    /// Write everything that precedes the first resource
    fn write_preamble(&mut self) -> Result {
        Ok(())
    }

    /// Write the declarations of one resource
    fn write_resource(&mut self, resource: &EmbeddedResource) -> Result {
        let _ = resource;
        Ok(())
    }

    /// Write everything that follows the last resource
    fn write_postamble(&mut self) -> Result {
        Ok(())
    }

    /// Drive the writer over a complete resource list
    fn write_document(&mut self, resources: &[EmbeddedResource]) -> Result {
        self.write_preamble()?;
        for resource in resources {
            self.write_resource(resource)?;
        }
        self.write_postamble()
    }
}

/// A writer that collects statistics about the embedded resources
#[derive(Debug, Default)]
pub struct StatsWriter {
    /// Number of text-mode resources
    pub text_count: usize,
    /// Number of binary-mode resources
    pub binary_count: usize,
    /// Total literal chunks across all resources
    pub chunk_count: usize,
    /// Resources that needed more than one chunk
    pub chunked_count: usize,
    /// Total logical content length
    pub content_len: usize,
}

impl ResourceWriter for StatsWriter {
    fn write_resource(&mut self, resource: &EmbeddedResource) -> Result {
        match resource.mode {
            EmbedMode::Text => self.text_count += 1,
            EmbedMode::Binary => self.binary_count += 1,
        }
        let chunks = resource.layout.chunk_count();
        self.chunk_count += chunks;
        if chunks > 1 {
            self.chunked_count += 1;
        }
        self.content_len += resource.content_len();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunk::{ChunkLayout, LiteralChunk};

    fn resource(mode: EmbedMode, chunks: usize) -> EmbeddedResource {
        let chunk = LiteralChunk {
            text: "ab".to_string(),
            len: 2,
        };
        let layout = if chunks == 1 {
            ChunkLayout::Single(chunk)
        } else {
            ChunkLayout::Chunked(vec![chunk; chunks])
        };
        EmbeddedResource {
            identifier: "r".to_string(),
            display_name: "r".to_string(),
            mode,
            layout,
        }
    }

    #[test]
    fn test_stats_writer() {
        let mut writer = StatsWriter::default();
        writer
            .write_document(&[resource(EmbedMode::Text, 1), resource(EmbedMode::Binary, 3)])
            .unwrap();

        assert_eq!(writer.text_count, 1);
        assert_eq!(writer.binary_count, 1);
        assert_eq!(writer.chunk_count, 4);
        assert_eq!(writer.chunked_count, 1);
        assert_eq!(writer.content_len, 8);
    }
}
