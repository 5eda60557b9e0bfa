//! Resource naming.
//!
//! Maps a path relative to the embedding root onto a C++ identifier that is
//! unique within one generation run, and decides the embedding mode from the
//! leaf name.

use std::collections::HashSet;
use tracing::trace;

/// Leaf prefix that selects text mode unless configured otherwise
pub const DEFAULT_TEXT_PREFIX: &str = "ascii_";

/// How a file's content is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbedMode {
    /// Escaped `std::string_view` constant, content read line by line
    Text,
    /// Escaped `char` array plus explicit byte length
    Binary,
}

impl EmbedMode {
    /// Human readable kind used in status output
    pub fn describe(&self) -> &'static str {
        match self {
            EmbedMode::Text => "string",
            EmbedMode::Binary => "byte array",
        }
    }
}

/// Identifiers already handed out during the current run.
///
/// Owned by a single generation call and dropped with it.
#[derive(Debug, Default)]
pub struct IdentifierRegistry {
    assigned: HashSet<String>,
}

impl IdentifierRegistry {
    /// Creates an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if `identifier` has already been assigned
    pub fn contains(&self, identifier: &str) -> bool {
        self.assigned.contains(identifier)
    }

    /// Number of identifiers assigned so far
    pub fn len(&self) -> usize {
        self.assigned.len()
    }

    /// Returns true if nothing has been assigned yet
    pub fn is_empty(&self) -> bool {
        self.assigned.is_empty()
    }

    /// Reserves the first free spelling of `candidate`, appending `_` until unused
    fn reserve(&mut self, mut candidate: String) -> String {
        while self.contains(&candidate) {
            candidate.push('_');
        }
        self.assigned.insert(candidate.clone());
        candidate
    }
}

/// Outcome of naming one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SanitizedName {
    /// Unique identifier matching `[A-Za-z_][A-Za-z0-9_]*`
    pub identifier: String,
    /// Relative path with `/` separators and the text prefix removed
    pub display_name: String,
    /// Selected embedding mode
    pub mode: EmbedMode,
}

/// Derives identifiers, display names and modes from relative paths
#[derive(Debug, Clone)]
pub struct IdentifierSanitizer {
    text_prefix: String,
}

impl Default for IdentifierSanitizer {
    fn default() -> Self {
        Self::new(DEFAULT_TEXT_PREFIX)
    }
}

impl IdentifierSanitizer {
    /// Creates a sanitizer using `text_prefix` as the text-mode marker.
    ///
    /// An empty prefix disables text mode.
    pub fn new(text_prefix: impl Into<String>) -> Self {
        Self {
            text_prefix: text_prefix.into(),
        }
    }

    /// Names the file at `relative_path`, reserving its identifier in `registry`.
    ///
    /// The identifier is built from the display name, i.e. with the text
    /// prefix already removed: `ascii_notes.txt` yields `notes_txt`. A
    /// sibling `notes.txt` is kept apart by the registry, which hands the
    /// later of the two `notes_txt_`.
    pub fn sanitize(&self, registry: &mut IdentifierRegistry, relative_path: &str) -> SanitizedName {
        let normalized = relative_path.replace('\\', "/");
        let (dir, leaf) = match normalized.rfind('/') {
            Some(idx) => normalized.split_at(idx + 1),
            None => ("", normalized.as_str()),
        };

        let (display_name, mode) = match leaf.strip_prefix(self.text_prefix.as_str()) {
            Some(stripped) if !self.text_prefix.is_empty() => {
                (format!("{dir}{stripped}"), EmbedMode::Text)
            }
            _ => (normalized.clone(), EmbedMode::Binary),
        };

        let identifier = registry.reserve(candidate_identifier(&display_name));
        trace!("{} -> {} ({:?})", relative_path, identifier, mode);

        SanitizedName {
            identifier,
            display_name,
            mode,
        }
    }
}

/// Replaces every character outside `[A-Za-z0-9_]` and guards a leading digit
fn candidate_identifier(name: &str) -> String {
    let mut candidate: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();

    match candidate.chars().next() {
        None => candidate.push('_'),
        Some(c) if c.is_ascii_digit() => candidate.insert(0, '_'),
        Some(_) => {}
    }
    candidate
}
