//! Error types for the embedgen-core library.
//!
//! Every variant aborts a generation run. Identifier collisions and
//! oversized lines are resolved mechanically and never show up here.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for embedgen operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for all embedgen operations
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// The directory to embed does not exist or is not a directory
    #[error("embedding root '{path}' does not exist or is not a directory")]
    RootNotFound {
        /// The missing root
        path: PathBuf,
    },

    /// Directory traversal failed part way through
    #[error("failed to walk directory '{path}': {source}")]
    DirectoryWalk {
        /// Root of the traversal
        path: PathBuf,
        /// Underlying traversal error
        #[source]
        source: walkdir::Error,
    },

    /// Failed to read input file
    #[error("failed to read file '{path}': {source}")]
    FileRead {
        /// Path to the file that failed to read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Failed to write output file
    #[error("failed to write file '{path}': {source}")]
    FileWrite {
        /// Path to the file that failed to write
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Failed to create output directory
    #[error("failed to create directory '{path}': {source}")]
    DirectoryCreate {
        /// Path to the directory that failed to create
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// An ignore file contained a pattern that could not be compiled
    #[error("invalid ignore pattern in '{path}': {source}")]
    IgnorePattern {
        /// Path to the ignore file
        path: PathBuf,
        /// Underlying pattern error
        #[source]
        source: ignore::Error,
    },

    /// Maximum literal length must allow at least one unit per chunk
    #[error("invalid maximum literal length {0}: must be at least 1")]
    InvalidMaxLiteralLength(usize),
}

impl Error {
    /// Creates a new file read error
    pub fn file_read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileRead {
            path: path.into(),
            source,
        }
    }

    /// Creates a new file write error
    pub fn file_write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileWrite {
            path: path.into(),
            source,
        }
    }

    /// Creates a new directory creation error
    pub fn directory_create(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::DirectoryCreate {
            path: path.into(),
            source,
        }
    }

    /// Creates a new directory walk error
    pub fn directory_walk(path: impl Into<PathBuf>, source: walkdir::Error) -> Self {
        Self::DirectoryWalk {
            path: path.into(),
            source,
        }
    }

    /// Creates a new ignore pattern error
    pub fn ignore_pattern(path: impl Into<PathBuf>, source: ignore::Error) -> Self {
        Self::IgnorePattern {
            path: path.into(),
            source,
        }
    }

    /// Creates a new missing root error
    pub fn root_not_found(path: impl Into<PathBuf>) -> Self {
        Self::RootNotFound { path: path.into() }
    }

    /// Returns true if this error came from the filesystem rather than from configuration
    pub fn is_filesystem(&self) -> bool {
        matches!(
            self,
            Self::RootNotFound { .. }
                | Self::DirectoryWalk { .. }
                | Self::FileRead { .. }
                | Self::FileWrite { .. }
                | Self::DirectoryCreate { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::root_not_found("/no/such/dir");
        assert!(err.to_string().contains("does not exist"));
        assert!(err.to_string().contains("/no/such/dir"));
    }

    #[test]
    fn test_is_filesystem() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        assert!(Error::file_read("a.bin", io).is_filesystem());
        assert!(!Error::InvalidMaxLiteralLength(0).is_filesystem());
    }
}
