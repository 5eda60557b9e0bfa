//! Accept/reject decisions for discovered files.
//!
//! The generator consults a [`PathFilter`] with paths relative to the
//! embedding root. [`IgnoreFilter`] applies gitignore rules from an ignore
//! file (`.embedignore` by default).

use crate::error::{Error, Result};
use ignore::gitignore::{Gitignore, GitignoreBuilder};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Name of the ignore file looked up in the embedding root
pub const DEFAULT_IGNORE_FILE: &str = ".embedignore";

/// Predicate deciding which files get embedded
pub trait PathFilter {
    /// Returns true if the file at `relative` (relative to the root) should be embedded
    fn accepts(&self, relative: &Path) -> bool;
}

/// Filter that accepts every file
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAll;

impl PathFilter for AcceptAll {
    fn accepts(&self, _relative: &Path) -> bool {
        true
    }
}

/// Gitignore-style filter rooted at the embedding directory
#[derive(Debug, Clone)]
pub struct IgnoreFilter {
    root: PathBuf,
    matcher: Gitignore,
}

impl IgnoreFilter {
    /// Loads patterns from `ignore_file`
    pub fn from_file(root: &Path, ignore_file: &Path) -> Result<Self> {
        let patterns =
            std::fs::read_to_string(ignore_file).map_err(|e| Error::file_read(ignore_file, e))?;
        Self::from_patterns(root, ignore_file, &patterns)
    }

    /// Compiles `patterns`, reporting errors against `source`
    pub fn from_patterns(root: &Path, source: &Path, patterns: &str) -> Result<Self> {
        let mut builder = GitignoreBuilder::new(root);
        for line in patterns.lines() {
            builder
                .add_line(Some(PathBuf::from(source)), line)
                .map_err(|e| Error::ignore_pattern(source, e))?;
        }
        let matcher = builder
            .build()
            .map_err(|e| Error::ignore_pattern(source, e))?;
        debug!(
            "Loaded {} ignore pattern(s) from {}",
            matcher.num_ignores() + matcher.num_whitelists(),
            source.display()
        );
        Ok(Self {
            root: root.to_path_buf(),
            matcher,
        })
    }
}

impl PathFilter for IgnoreFilter {
    fn accepts(&self, relative: &Path) -> bool {
        // the matcher strips its own root, so hand it the path as walked
        let walked = self.root.join(relative);
        !self
            .matcher
            .matched_path_or_any_parents(&walked, false)
            .is_ignore()
    }
}
