//! The generation pipeline.
//!
//! 1. Walk the root depth-first, files before subdirectories, names sorted
//! 2. Drop paths rejected by the ignore file, the ignore file itself and
//!    any excluded path such as the header being regenerated
//! 3. Name every accepted file through one run-scoped [`IdentifierRegistry`]
//! 4. Encode and chunk its content
//! 5. Assemble the header
//!
//! A read failure anywhere aborts the run before anything is rendered.

use crate::chunk::{ChunkPlanner, DEFAULT_MAX_LITERAL_LEN};
use crate::error::{Error, Result};
use crate::filter::{AcceptAll, IgnoreFilter, PathFilter, DEFAULT_IGNORE_FILE};
use crate::header::{HeaderAssembler, HeaderConfig};
use crate::ident::{IdentifierRegistry, IdentifierSanitizer, DEFAULT_TEXT_PREFIX};
use crate::resource::{EmbeddedResource, SourceFile};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Configuration for one generation run
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Directory whose files are embedded
    pub root: PathBuf,
    /// Ignore file; `<root>/.embedignore` when unset
    pub ignore_file: Option<PathBuf>,
    /// Maximum logical length of one literal
    pub max_literal_len: usize,
    /// Leaf prefix selecting text mode
    pub text_prefix: String,
    /// Header rendering options
    pub header: HeaderConfig,
    /// Files never embedded even when they lie under the root
    pub exclude: Vec<PathBuf>,
}

impl GeneratorConfig {
    /// Creates a config embedding `root` with default values
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ignore_file: None,
            max_literal_len: DEFAULT_MAX_LITERAL_LEN,
            text_prefix: DEFAULT_TEXT_PREFIX.to_string(),
            header: HeaderConfig::default(),
            exclude: Vec::new(),
        }
    }

    /// Sets an explicit ignore file
    pub fn ignore_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.ignore_file = Some(path.into());
        self
    }

    /// Sets the maximum literal length
    pub fn max_literal_len(mut self, len: usize) -> Self {
        self.max_literal_len = len;
        self
    }

    /// Sets the text-mode prefix
    pub fn text_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.text_prefix = prefix.into();
        self
    }

    /// Sets the header options
    pub fn header(mut self, header: HeaderConfig) -> Self {
        self.header = header;
        self
    }

    /// Adds a file that must not be embedded, typically the output header
    pub fn exclude(mut self, path: impl Into<PathBuf>) -> Self {
        self.exclude.push(path.into());
        self
    }

    /// The ignore file that will be consulted
    pub fn ignore_file_path(&self) -> PathBuf {
        self.ignore_file
            .clone()
            .unwrap_or_else(|| self.root.join(DEFAULT_IGNORE_FILE))
    }
}

/// Output of a successful run
#[derive(Debug, Clone)]
pub struct GeneratedHeader {
    /// Complete header text
    pub contents: String,
    /// Resources in emission order
    pub resources: Vec<EmbeddedResource>,
}

/// Runs the pipeline for one [`GeneratorConfig`]
#[derive(Debug, Clone)]
pub struct Generator {
    config: GeneratorConfig,
}

impl Generator {
    /// Creates a generator
    pub fn new(config: GeneratorConfig) -> Self {
        Self { config }
    }

    /// The active configuration
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Lists every regular file under the root in traversal order
    pub fn discover(&self) -> Result<Vec<PathBuf>> {
        let root = &self.config.root;
        if !root.is_dir() {
            return Err(Error::root_not_found(root));
        }

        let walker = WalkDir::new(root)
            .min_depth(1)
            .follow_links(false)
            .sort_by(|a, b| {
                let a_dir = a.file_type().is_dir();
                let b_dir = b.file_type().is_dir();
                a_dir.cmp(&b_dir).then_with(|| a.file_name().cmp(b.file_name()))
            });

        let mut files = Vec::new();
        for entry in walker {
            let entry = entry.map_err(|e| Error::directory_walk(root, e))?;
            if entry.file_type().is_file() {
                files.push(entry.into_path());
            }
        }
        debug!("Discovered {} file(s) under {}", files.len(), root.display());
        Ok(files)
    }

    /// Lists the files that pass the ignore rules, in traversal order
    pub fn accepted_files(&self) -> Result<Vec<PathBuf>> {
        let root = &self.config.root;
        let files = self.discover()?;
        let ignore_path = self.config.ignore_file_path();

        let filter: Box<dyn PathFilter> = if ignore_path.is_file() {
            Box::new(IgnoreFilter::from_file(root, &ignore_path)?)
        } else {
            if self.config.ignore_file.is_some() {
                warn!(
                    "Ignore file {} not found, embedding every file",
                    ignore_path.display()
                );
            }
            Box::new(AcceptAll)
        };
        let excluded: Vec<Exclusion> = std::iter::once(ignore_path)
            .chain(self.config.exclude.iter().cloned())
            .map(Exclusion::new)
            .collect();

        let accepted: Vec<PathBuf> = files
            .into_iter()
            .filter(|path| {
                let skip = excluded.iter().any(|e| e.matches(path));
                if skip {
                    debug!("Excluding {}", path.display());
                }
                !skip
            })
            .filter(|path| {
                let relative = path.strip_prefix(root).unwrap_or(path.as_path());
                let keep = filter.accepts(relative);
                if !keep {
                    debug!("Ignoring {}", relative.display());
                }
                keep
            })
            .collect();

        info!("Files to embed:");
        for path in &accepted {
            info!("  {}", path.display());
        }
        Ok(accepted)
    }

    /// Reads, names, encodes and assembles every accepted file
    pub fn run(&self) -> Result<GeneratedHeader> {
        let planner = ChunkPlanner::new(self.config.max_literal_len)?;
        let sanitizer = IdentifierSanitizer::new(self.config.text_prefix.clone());
        let mut registry = IdentifierRegistry::new();

        let mut resources = Vec::new();
        for path in self.accepted_files()? {
            let source = SourceFile::read(&self.config.root, path)?;
            let resource = embed(&sanitizer, &mut registry, &planner, &source);
            resources.push(resource);
        }
        if registry.is_empty() {
            warn!(
                "No files accepted under {}, the header will be empty",
                self.config.root.display()
            );
        }
        debug!("Assigned {} identifier(s)", registry.len());

        let contents = HeaderAssembler::new(self.config.header.clone()).assemble(&resources);
        Ok(GeneratedHeader {
            contents,
            resources,
        })
    }
}

/// Names and encodes one source file
pub fn embed(
    sanitizer: &IdentifierSanitizer,
    registry: &mut IdentifierRegistry,
    planner: &ChunkPlanner,
    source: &SourceFile,
) -> EmbeddedResource {
    let name = sanitizer.sanitize(registry, &source.relative_path);
    info!(
        "Creating a {} resource with name \"{}\"",
        name.mode.describe(),
        name.identifier
    );
    EmbeddedResource::build(name, &source.content, planner)
}

/// Convenience wrapper running a [`Generator`] for `config`
pub fn generate(config: GeneratorConfig) -> Result<GeneratedHeader> {
    Generator::new(config).run()
}

/// A path kept out of the run, compared by spelling or by canonical location
struct Exclusion {
    path: PathBuf,
    canonical: Option<PathBuf>,
}

impl Exclusion {
    fn new(path: PathBuf) -> Self {
        let canonical = std::fs::canonicalize(&path).ok();
        Self { path, canonical }
    }

    fn matches(&self, candidate: &Path) -> bool {
        if candidate == self.path {
            return true;
        }
        if candidate.file_name() != self.path.file_name() {
            return false;
        }
        match &self.canonical {
            Some(canonical) => std::fs::canonicalize(candidate).ok().as_ref() == Some(canonical),
            None => false,
        }
    }
}
