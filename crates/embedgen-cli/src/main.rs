//! embedgen - Embed a directory of files into a generated C++ header
//!
//! Every accepted file under ROOT becomes a set of constexpr declarations in
//! `embedded.hpp`. Files whose name starts with `ascii_` are embedded as
//! text, everything else as a byte array.

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use embedgen_core::{
    generate, write_header, GeneratedHeader, GeneratorConfig, HeaderConfig, Linkage,
    ResourceWriter, StatsWriter, DEFAULT_HEADER_FILE_NAME, DEFAULT_MAX_LITERAL_LEN,
};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, Level};
use tracing_subscriber::EnvFilter;

/// Embed a directory of files into a generated C++ header
#[derive(Parser, Debug)]
#[command(name = "embedgen")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Directory whose files are embedded
    root: PathBuf,

    /// Ignore file with gitignore syntax [default: ROOT/.embedignore]
    #[arg(short, long)]
    ignore_file: Option<PathBuf>,

    /// Output directory for the generated header
    #[arg(short, long, default_value = ".")]
    output: PathBuf,

    /// File name of the generated header
    #[arg(long, default_value = DEFAULT_HEADER_FILE_NAME)]
    file_name: String,

    /// Maximum length of a single literal before content is chunked
    #[arg(long, default_value_t = DEFAULT_MAX_LITERAL_LEN, env = "EMBEDGEN_MAX_LITERAL_LEN")]
    max_literal_len: usize,

    /// File name prefix selecting text mode (empty disables text mode)
    #[arg(long, default_value = embedgen_core::ident::DEFAULT_TEXT_PREFIX)]
    text_prefix: String,

    /// Namespace wrapping the declarations
    #[arg(long, default_value = embedgen_core::header::DEFAULT_NAMESPACE)]
    namespace: String,

    /// Include-guard macro
    #[arg(long, default_value = embedgen_core::header::DEFAULT_GUARD)]
    guard: String,

    /// Declaration linkage
    #[arg(long, value_enum, default_value = "selectany")]
    linkage: LinkageArg,

    /// Print the header to stdout instead of writing it
    #[arg(long, conflicts_with = "check")]
    dry_run: bool,

    /// Fail if the header on disk is missing or out of date, without writing
    #[arg(long)]
    check: bool,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only report warnings and errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

/// Declaration style for generated constants
#[derive(Debug, Clone, Copy, ValueEnum)]
enum LinkageArg {
    /// extern __declspec(selectany) constexpr (MSVC)
    Selectany,
    /// inline constexpr (C++17)
    Inline,
}

impl From<LinkageArg> for Linkage {
    fn from(arg: LinkageArg) -> Self {
        match arg {
            LinkageArg::Selectany => Linkage::Selectany,
            LinkageArg::Inline => Linkage::Inline,
        }
    }
}

/// State of the header already on disk relative to a fresh run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HeaderStatus {
    Missing,
    Stale,
    UpToDate,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let level = match (cli.quiet, cli.verbose) {
        (true, _) => Level::WARN,
        (false, 0) => Level::INFO,
        (false, 1) => Level::DEBUG,
        _ => Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run(&cli) {
        error!("Aborted by {} error", failure_kind(&err));
        return Err(err);
    }
    Ok(())
}

/// Classifies a failure by the core error at the bottom of its chain
fn failure_kind(err: &anyhow::Error) -> &'static str {
    match err.chain().find_map(|cause| cause.downcast_ref::<embedgen_core::Error>()) {
        Some(core) if core.is_filesystem() => "filesystem",
        Some(_) => "configuration",
        None => "usage",
    }
}

fn run(cli: &Cli) -> Result<()> {
    if !cli.root.is_dir() {
        bail!("Directory does not exist: {}", cli.root.display());
    }

    let header = generate(build_config(cli))
        .with_context(|| format!("Failed to embed directory: {}", cli.root.display()))?;
    print_summary(&header);

    if cli.dry_run {
        std::io::stdout()
            .write_all(header.contents.as_bytes())
            .context("Failed to write header to stdout")?;
        return Ok(());
    }

    let target = cli.output.join(&cli.file_name);
    let status = header_status(&target, &header.contents)?;

    if cli.check {
        if status != HeaderStatus::UpToDate {
            bail!("{} is {:?}, regenerate it", target.display(), status);
        }
        info!("{} is up to date", target.display());
        return Ok(());
    }

    if status == HeaderStatus::UpToDate {
        info!("{} is up to date, leaving it untouched", target.display());
        return Ok(());
    }

    let path = write_header(&cli.output, &cli.file_name, &header.contents)
        .with_context(|| format!("Failed to write header: {}", target.display()))?;
    println!("Wrote {}", path.display());
    Ok(())
}

fn build_config(cli: &Cli) -> GeneratorConfig {
    let header = HeaderConfig::new()
        .guard(&cli.guard)
        .namespace(&cli.namespace)
        .linkage(cli.linkage.into());

    let mut config = GeneratorConfig::new(&cli.root)
        .max_literal_len(cli.max_literal_len)
        .text_prefix(&cli.text_prefix)
        .exclude(cli.output.join(&cli.file_name))
        .header(header);
    if let Some(ignore_file) = &cli.ignore_file {
        config = config.ignore_file(ignore_file);
    }
    config
}

/// Compares the existing header against freshly generated contents
fn header_status(path: &Path, contents: &str) -> Result<HeaderStatus> {
    if !path.exists() {
        return Ok(HeaderStatus::Missing);
    }
    let existing =
        fs::read(path).with_context(|| format!("Failed to read file: {}", path.display()))?;

    let old = blake3::hash(&existing);
    let new = blake3::hash(contents.as_bytes());
    debug!("Existing header {} vs generated {}", &old.to_hex()[..8], &new.to_hex()[..8]);

    Ok(if old == new {
        HeaderStatus::UpToDate
    } else {
        HeaderStatus::Stale
    })
}

fn print_summary(header: &GeneratedHeader) {
    let mut stats = StatsWriter::default();
    stats
        .write_document(&header.resources)
        .expect("StatsWriter never fails");
    info!(
        "Summary: {} text, {} binary, {} chunk(s), {} chunked, {} bytes embedded",
        stats.text_count,
        stats.binary_count,
        stats.chunk_count,
        stats.chunked_count,
        stats.content_len
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("embedgen").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_header_status() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("embedded.hpp");

        assert_eq!(header_status(&path, "a").unwrap(), HeaderStatus::Missing);
        fs::write(&path, "a").unwrap();
        assert_eq!(header_status(&path, "a").unwrap(), HeaderStatus::UpToDate);
        assert_eq!(header_status(&path, "b").unwrap(), HeaderStatus::Stale);
    }

    #[test]
    fn test_defaults() {
        let cli = cli(&["assets"]);
        let config = build_config(&cli);
        assert_eq!(config.max_literal_len, 16_300);
        assert_eq!(config.text_prefix, "ascii_");
        assert_eq!(config.ignore_file_path(), Path::new("assets").join(".embedignore"));
        assert_eq!(config.header.linkage, Linkage::Selectany);
        assert_eq!(cli.file_name, "embedded.hpp");
        assert_eq!(config.exclude, [Path::new(".").join("embedded.hpp")]);
    }

    #[test]
    fn test_overrides() {
        let cli = cli(&[
            "assets",
            "-i",
            "rules.ignore",
            "--max-literal-len",
            "100",
            "--linkage",
            "inline",
            "--namespace",
            "res",
        ]);
        let config = build_config(&cli);
        assert_eq!(config.max_literal_len, 100);
        assert_eq!(config.ignore_file_path(), PathBuf::from("rules.ignore"));
        assert_eq!(config.header.linkage, Linkage::Inline);
        assert_eq!(config.header.namespace, "res");
    }

    #[test]
    fn test_run_writes_then_skips() {
        let root = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        fs::write(root.path().join("ascii_notes.txt"), "Hi\nBye").unwrap();

        let root_arg = root.path().to_str().unwrap();
        let out_arg = out.path().to_str().unwrap();
        let cli = cli(&[root_arg, "-o", out_arg]);

        run(&cli).unwrap();
        let written = fs::read_to_string(out.path().join("embedded.hpp")).unwrap();
        assert!(written.contains("notes_txt = std::string_view(\"Hi\\nBye\");"));

        let check = Cli {
            check: true,
            ..cli
        };
        run(&check).unwrap();
    }

    #[test]
    fn test_header_inside_root_stays_up_to_date() {
        let root = TempDir::new().unwrap();
        fs::write(root.path().join("logo.bin"), [0x89u8, b'P', b'N', b'G']).unwrap();

        let root_arg = root.path().to_str().unwrap();
        let cli = cli(&[root_arg, "-o", root_arg]);
        run(&cli).unwrap();

        let written = fs::read_to_string(root.path().join("embedded.hpp")).unwrap();
        assert!(written.contains("logo_bin"));
        assert!(!written.contains("embedded_hpp"));

        let check = Cli {
            check: true,
            ..cli
        };
        run(&check).unwrap();
    }

    #[test]
    fn test_failure_kind() {
        let missing = anyhow::Error::new(embedgen_core::Error::root_not_found("gone"))
            .context("Failed to embed directory: gone");
        assert_eq!(failure_kind(&missing), "filesystem");

        let limit = anyhow::Error::new(embedgen_core::Error::InvalidMaxLiteralLength(0));
        assert_eq!(failure_kind(&limit), "configuration");

        assert_eq!(failure_kind(&anyhow::anyhow!("Directory does not exist: x")), "usage");
    }

    #[test]
    fn test_check_fails_when_missing() {
        let root = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        fs::write(root.path().join("a.bin"), [0u8, 1]).unwrap();

        let cli = cli(&[
            root.path().to_str().unwrap(),
            "-o",
            out.path().to_str().unwrap(),
            "--check",
        ]);
        assert!(run(&cli).is_err());
        assert!(!out.path().join("embedded.hpp").exists());
    }

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
