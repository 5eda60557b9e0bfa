//! # embedgen-core
//!
//! A library for embedding a directory of files into a single generated
//! C++ header, so a program can reach their contents without touching the
//! filesystem at runtime.
//!
//! This crate provides the core functionality for:
//! - Naming each file with a unique, valid C++ identifier
//! - Escaping arbitrary bytes (or ASCII text) into string literals that
//!   decode back to exactly the original content
//! - Splitting long content into literals of bounded length
//! - Rendering the declarations into a self-contained header
//!
//! ## Architecture
//!
//! - [`ident`]: Identifier derivation and the per-run registry
//! - [`encode`]: Text and binary escaping, including hex-escape safety
//! - [`chunk`]: Literal length bounding
//! - [`header`]: Header rendering
//! - [`filter`]: Ignore-file handling
//! - [`generate`]: Traversal and the end-to-end pipeline
//! - [`output`]: Atomic writing of the result
//! - [`error`]: Error types and handling
//!
//! ## Example
//!
//! ```no_run
//! use embedgen_core::{generate, write_header, GeneratorConfig};
//! use std::path::Path;
//!
//! let config = GeneratorConfig::new("./assets").max_literal_len(16_300);
//! let header = generate(config)?;
//! write_header(Path::new("./include"), "embedded.hpp", &header.contents)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Extensibility
//!
//! - [`PathFilter`]: Decide which files are embedded
//! - [`ResourceWriter`]: Visit the generated document

#![deny(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unreachable_pub)]

pub mod chunk;
pub mod encode;
pub mod error;
pub mod filter;
pub mod generate;
pub mod header;
pub mod ident;
pub mod output;
pub mod resource;

// Re-export primary types for convenience
pub use chunk::{ChunkLayout, ChunkPlanner, LiteralChunk, DEFAULT_MAX_LITERAL_LEN};
pub use encode::{BinaryEncoder, EscapeState, Rendering};
pub use error::{Error, Result};
pub use filter::{AcceptAll, IgnoreFilter, PathFilter, DEFAULT_IGNORE_FILE};
pub use generate::{generate, GeneratedHeader, Generator, GeneratorConfig};
pub use header::{HeaderAssembler, HeaderConfig, Linkage, ResourceWriter, StatsWriter};
pub use ident::{EmbedMode, IdentifierRegistry, IdentifierSanitizer, SanitizedName};
pub use output::{write_atomic, write_header, DEFAULT_HEADER_FILE_NAME};
pub use resource::{EmbeddedResource, SourceFile};

/// Crate version for programmatic access
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
