//! Splitting escaped content into bounded literals.
//!
//! Compilers cap the length of a single string literal, so content longer
//! than the configured maximum is emitted as a numbered series of chunks.
//! Lengths are logical: characters for text, decoded bytes for binary.

use crate::encode::{escape_text, EscapedByte};
use crate::error::{Error, Result};
use tracing::trace;

/// Default maximum logical length of one literal
pub const DEFAULT_MAX_LITERAL_LEN: usize = 16_300;

/// One escaped literal body and its logical length
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LiteralChunk {
    /// Escaped text placed between the quotes
    pub text: String,
    /// Characters (text mode) or decoded bytes (binary mode)
    pub len: usize,
}

impl LiteralChunk {
    /// Builds a chunk from decoded text, escaping it
    pub fn from_text(decoded: &str) -> Self {
        Self {
            text: escape_text(decoded),
            len: decoded.chars().count(),
        }
    }
}

/// Shape of a resource's content
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChunkLayout {
    /// Content fits one constant
    Single(LiteralChunk),
    /// Two or more numbered constants
    Chunked(Vec<LiteralChunk>),
}

impl ChunkLayout {
    /// Wraps planned chunks; no chunks at all is an empty single constant
    fn from_chunks(mut chunks: Vec<LiteralChunk>) -> Self {
        match chunks.len() {
            0 => ChunkLayout::Single(LiteralChunk::default()),
            1 => ChunkLayout::Single(chunks.remove(0)),
            _ => ChunkLayout::Chunked(chunks),
        }
    }

    /// All chunks in order
    pub fn chunks(&self) -> &[LiteralChunk] {
        match self {
            ChunkLayout::Single(chunk) => std::slice::from_ref(chunk),
            ChunkLayout::Chunked(chunks) => chunks,
        }
    }

    /// Number of chunks
    pub fn chunk_count(&self) -> usize {
        self.chunks().len()
    }

    /// Sum of the logical lengths of all chunks
    pub fn total_len(&self) -> usize {
        self.chunks().iter().map(|c| c.len).sum()
    }
}

/// Partitions encoder output into chunks no longer than `max_len`
#[derive(Debug, Clone, Copy)]
pub struct ChunkPlanner {
    max_len: usize,
}

impl Default for ChunkPlanner {
    fn default() -> Self {
        Self {
            max_len: DEFAULT_MAX_LITERAL_LEN,
        }
    }
}

impl ChunkPlanner {
    /// Creates a planner; `max_len` must be at least 1
    pub fn new(max_len: usize) -> Result<Self> {
        if max_len == 0 {
            return Err(Error::InvalidMaxLiteralLength(max_len));
        }
        Ok(Self { max_len })
    }

    /// The configured bound
    pub fn max_len(&self) -> usize {
        self.max_len
    }

    /// Packs whole lines into chunks.
    ///
    /// Every line but the last carries a separator that counts as one
    /// character. A line that cannot fit any chunk is cut into standalone
    /// pieces of `max_len` characters.
    pub fn plan_text(&self, lines: &[String]) -> ChunkLayout {
        let mut chunks = Vec::new();
        let mut current = String::new();
        let mut current_len = 0;
        let last = lines.len().saturating_sub(1);

        for (i, line) in lines.iter().enumerate() {
            let separated = i != last;
            let segment_len = line.chars().count() + usize::from(separated);

            if current_len + segment_len > self.max_len && current_len != 0 {
                chunks.push(LiteralChunk::from_text(&current));
                current.clear();
                current_len = 0;
            }

            if segment_len <= self.max_len {
                current.push_str(line);
                if separated {
                    current.push('\n');
                }
                current_len += segment_len;
                continue;
            }

            trace!("splitting line {} of {} characters", i, segment_len);
            let chars: Vec<char> = line.chars().chain(separated.then_some('\n')).collect();
            for piece in chars.chunks(self.max_len) {
                let piece: String = piece.iter().collect();
                chunks.push(LiteralChunk::from_text(&piece));
            }
        }

        if current_len != 0 {
            chunks.push(LiteralChunk::from_text(&current));
        }
        ChunkLayout::from_chunks(chunks)
    }

    /// Packs escaped bytes, counting decoded bytes toward the bound
    pub fn plan_binary<I>(&self, units: I) -> ChunkLayout
    where
        I: IntoIterator<Item = EscapedByte>,
    {
        let mut chunks = Vec::new();
        let mut current = LiteralChunk::default();

        for unit in units {
            if current.len == self.max_len {
                chunks.push(std::mem::take(&mut current));
            }
            unit.rendering.write_to(&mut current.text);
            current.len += 1;
        }

        if current.len != 0 {
            chunks.push(current);
        }
        trace!("planned {} binary chunk(s)", chunks.len().max(1));
        ChunkLayout::from_chunks(chunks)
    }
}
