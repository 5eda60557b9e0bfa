//! Content escaping for C++ string literals.
//!
//! ## Binary mode
//!
//! Every byte is rendered as one [`Rendering`]: itself, a two character
//! escape for `"` and `\`, or a `\xHH` escape. A hex escape in C++ keeps
//! consuming hex digits, so `"\x001"` is a single (overflowing) character
//! rather than NUL followed by `1`. [`EscapeState`] tracks whether the last
//! thing written was a hex escape; while it is, bytes that would print as a
//! hex digit are escaped as well.
//!
//! ## Text mode
//!
//! Content is read as 7-bit ASCII lines. Only `\` and `"` are escaped and
//! lines are joined with the `\n` escape, which never starts a longer
//! escape sequence.

use std::fmt::Write as _;

/// Escape token placed between consecutive text lines
pub const LINE_SEPARATOR: &str = "\\n";

/// Character substituted for bytes outside the 7-bit range in text mode
pub const REPLACEMENT_CHAR: char = '?';

/// Whether the previous rendering can be extended by a following hex digit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EscapeState {
    /// Next byte may be written literally
    #[default]
    Clear,
    /// A `\x` escape was just written; hex digits must not follow literally
    HexPending,
}

/// How a single byte is spelled inside the literal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rendering {
    /// The printable character itself
    Literal(u8),
    /// Backslash followed by the character (`\"` or `\\`)
    Simple(u8),
    /// `\xHH`
    Hex(u8),
}

impl Rendering {
    /// Appends the escaped spelling to `out`
    pub fn write_to(&self, out: &mut String) {
        match *self {
            Rendering::Literal(b) => out.push(b as char),
            Rendering::Simple(b) => {
                out.push('\\');
                out.push(b as char);
            }
            Rendering::Hex(b) => {
                // writing to a String cannot fail
                let _ = write!(out, "\\x{b:02X}");
            }
        }
    }

    /// Number of source characters the spelling occupies
    pub fn escaped_len(&self) -> usize {
        match self {
            Rendering::Literal(_) => 1,
            Rendering::Simple(_) => 2,
            Rendering::Hex(_) => 4,
        }
    }
}

impl EscapeState {
    /// Decides how `byte` is rendered and the state that follows it
    pub fn render(self, byte: u8) -> (Rendering, EscapeState) {
        match byte {
            b'"' | b'\\' => (Rendering::Simple(byte), EscapeState::Clear),
            0x20..=0x7E if !(self == EscapeState::HexPending && byte.is_ascii_hexdigit()) => {
                (Rendering::Literal(byte), EscapeState::Clear)
            }
            // NUL, controls, non-ASCII and hex digits right after an escape
            _ => (Rendering::Hex(byte), EscapeState::HexPending),
        }
    }
}

/// One source byte paired with its spelling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EscapedByte {
    /// The original byte
    pub byte: u8,
    /// How it is written in the literal
    pub rendering: Rendering,
}

/// Iterator rendering raw bytes for a `char` array literal
#[derive(Debug, Clone)]
pub struct BinaryEncoder<'a> {
    bytes: std::slice::Iter<'a, u8>,
    state: EscapeState,
}

impl<'a> BinaryEncoder<'a> {
    /// Starts encoding `bytes` in the [`EscapeState::Clear`] state
    pub fn new(bytes: &'a [u8]) -> Self {
        Self {
            bytes: bytes.iter(),
            state: EscapeState::Clear,
        }
    }

    /// Current hazard state
    pub fn state(&self) -> EscapeState {
        self.state
    }
}

impl Iterator for BinaryEncoder<'_> {
    type Item = EscapedByte;

    fn next(&mut self) -> Option<EscapedByte> {
        let byte = *self.bytes.next()?;
        let (rendering, next) = self.state.render(byte);
        self.state = next;
        Some(EscapedByte { byte, rendering })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.bytes.size_hint()
    }
}

impl ExactSizeIterator for BinaryEncoder<'_> {}

/// Renders a whole byte slice as one literal body
pub fn escape_binary(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    for escaped in BinaryEncoder::new(bytes) {
        escaped.rendering.write_to(&mut out);
    }
    out
}

/// Escapes decoded text for a string literal.
///
/// `\` and `"` gain a backslash and each `\n` becomes [`LINE_SEPARATOR`].
pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str(LINE_SEPARATOR),
            _ => out.push(c),
        }
    }
    out
}

/// Text-mode view of a file
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TextLines {
    /// Lines without their terminators
    pub lines: Vec<String>,
    /// Number of bytes outside the 7-bit range replaced by [`REPLACEMENT_CHAR`]
    pub replaced: usize,
}

impl TextLines {
    /// Splits `content` on `\r\n`, `\n` or `\r`.
    ///
    /// A terminator at the very end does not start another line.
    pub fn decode(content: &[u8]) -> Self {
        let mut lines = Vec::new();
        let mut replaced = 0;
        let mut current = String::new();
        let mut iter = content.iter().peekable();

        while let Some(&byte) = iter.next() {
            match byte {
                b'\n' => lines.push(std::mem::take(&mut current)),
                b'\r' => {
                    if iter.peek() == Some(&&b'\n') {
                        iter.next();
                    }
                    lines.push(std::mem::take(&mut current));
                }
                0x00..=0x7F => current.push(byte as char),
                _ => {
                    current.push(REPLACEMENT_CHAR);
                    replaced += 1;
                }
            }
        }
        if !current.is_empty() {
            lines.push(current);
        }

        Self { lines, replaced }
    }
}
