//! uncloak — grep for strings hidden behind encoding layers

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use uncloak::{FileConfig, SearchConfig, Searcher, StreamPrinter};

/// Search files for a pattern through bounded compositions of textual
/// decodings (Base64, hex, ROT13, XOR brute force, Morse, Base85, ...).
#[derive(Parser, Debug)]
#[command(name = "uncloak")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Pattern to search for
    pattern: String,

    /// Files or directories to search; `-` or no paths reads stdin
    paths: Vec<PathBuf>,

    /// Recursively search directories
    #[arg(short = 'r', long)]
    recursive: bool,

    /// Case-insensitive matching
    #[arg(short = 'i', long = "ignore-case")]
    ignore_case: bool,

    /// Treat the pattern as a regular expression
    #[arg(short = 'e', long = "regex")]
    regex: bool,

    /// Number of worker threads
    #[arg(long, value_name = "N")]
    workers: Option<usize>,

    /// Maximum decoder combination depth
    #[arg(long, value_name = "D")]
    depth: Option<usize>,

    /// Bytes of trailing context around a match
    #[arg(short = 'A', long = "after-context", value_name = "NUM")]
    after_context: Option<usize>,

    /// Bytes of leading context around a match
    #[arg(short = 'B', long = "before-context", value_name = "NUM")]
    before_context: Option<usize>,

    /// Bytes of context on both sides, where -A/-B are unset
    #[arg(short = 'C', long = "context", value_name = "NUM")]
    context: Option<usize>,

    /// Comma-separated directory names to exclude
    #[arg(long = "exclude-dir", value_name = "CSV")]
    exclude_dir: Option<String>,

    /// Only search files with Shannon entropy >= this threshold (0 disables)
    #[arg(long = "entropy-threshold", value_name = "F")]
    entropy_threshold: Option<f64>,

    /// Comma-separated magic types to include (e.g. ELF,MZ,PDF)
    #[arg(long = "magic", value_name = "CSV")]
    magic: Option<String>,

    /// Emit one JSON object per match instead of plain lines
    #[arg(long)]
    json: bool,

    /// Verbose output (per-file skip diagnostics)
    #[arg(short = 'v', long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let file_config = FileConfig::load();
    init_logging(cli.verbose || file_config.verbose);

    let config = merge(&cli, &file_config);

    tracing::debug!(
        "searching for {:?} (recursive: {}, depth: {})",
        config.pattern,
        config.recursive,
        config.depth
    );

    let searcher = Searcher::new(config).context("failed to start search")?;

    if !cli.json {
        println!("*Expect false positives");
    }

    let printer = StreamPrinter::new(cli.json);
    searcher.run(&printer).context("search failed")?;
    Ok(())
}

fn init_logging(verbose: bool) {
    let default_directive = if verbose { "uncloak=debug" } else { "uncloak=info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

/// CLI flags win over the config file; the config file wins over built-in
/// defaults. `-C` seeds both context sides when they are unset.
fn merge(cli: &Cli, file: &FileConfig) -> SearchConfig {
    SearchConfig {
        pattern: cli.pattern.clone(),
        paths: cli.paths.clone(),
        recursive: cli.recursive || file.recursive,
        case_sensitive: !(cli.ignore_case || file.ignore_case),
        use_regex: cli.regex || file.use_regex,
        workers: cli.workers.unwrap_or(file.workers).max(1),
        depth: cli.depth.unwrap_or(file.depth),
        context_before: cli
            .before_context
            .or(cli.context)
            .unwrap_or(file.before_context),
        context_after: cli
            .after_context
            .or(cli.context)
            .unwrap_or(file.after_context),
        exclude_dirs: match &cli.exclude_dir {
            Some(csv) => split_csv(csv),
            None => file.exclude_dirs.clone(),
        },
        entropy_threshold: cli.entropy_threshold.unwrap_or(file.entropy_threshold),
        magic_filter: match &cli.magic {
            Some(csv) => split_csv(csv).into_iter().map(|s| s.to_uppercase()).collect(),
            None => file.magic_filter.clone(),
        },
    }
}

fn split_csv(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
