//! # uncloak — pattern search through layered encodings
//!
//! Finds a pattern not only in the literal bytes of input files but in any
//! string reachable from those bytes by a bounded composition of textual
//! decodings (Base64, hex, ROT13, XOR brute force, Morse, Base85, ...).
//! Built for CTF flag hunting, malware triage, and forensic inspection
//! where the interesting string hides behind one or more encoding layers.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                        Searcher                            │
//! │  ┌─────────┐  ┌────────────┐  ┌─────────┐  ┌───────────┐  │
//! │  │ Walker  │→ │ Worker pool│→ │  Gates  │→ │ BFS search│  │
//! │  │(walkdir)│  │ (channel)  │  │ magic   │  │  decoders │  │
//! │  └─────────┘  └────────────┘  │ entropy │  └─────┬─────┘  │
//! │                               └─────────┘        │        │
//! │  ┌───────────────────────────────────────────────▼─────┐  │
//! │  │ MatchSink — streaming printer / in-memory collector │  │
//! │  └─────────────────────────────────────────────────────┘  │
//! └────────────────────────────────────────────────────────────┘
//! ```
//!
//! Content is carried as raw bytes end to end: matching runs on
//! `regex::bytes` and decoders transform `&[u8]`, so non-UTF-8 input is
//! never mangled through replacement characters.

pub mod analysis;
pub mod config;
pub mod decode;
pub mod engine;
pub mod ingest;
pub mod report;

// Re-exports for convenience
pub use analysis::{detect_magic, matches_magic_filter, shannon_entropy};
pub use config::FileConfig;
pub use decode::DecoderRegistry;
pub use engine::{PatternMatcher, RunStats, SearchConfig, Searcher};
pub use report::{MatchCollector, MatchRecord, MatchSink, StreamPrinter};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum UncloakError {
    #[error("invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("cannot access {path}: {source}")]
    Path {
        path: std::path::PathBuf,
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type UncloakResult<T> = Result<T, UncloakError>;
