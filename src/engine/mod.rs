//! Search orchestration — configuration, worker dispatch, and the run loop
//!
//! `Searcher` composes the walker, the worker pool, the gates, the decoder
//! registry, and the BFS into one run. The registry and matcher are built
//! once and shared immutably; the sink is the only shared mutable object
//! and serialises internally.

mod bfs;
mod matcher;
mod pool;

pub use matcher::PatternMatcher;

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::analysis::{detect_magic, matches_magic_filter, shannon_entropy};
use crate::config;
use crate::decode::DecoderRegistry;
use crate::ingest::{self, Walker};
use crate::report::MatchSink;
use crate::UncloakResult;

/// Worker threads draining the file channel when not overridden.
pub const DEFAULT_WORKERS: usize = 10;

/// Decoder composition depth when not overridden.
pub const DEFAULT_DEPTH: usize = 2;

// ─── Configuration ─────────────────────────────────────────────────

/// Everything one run needs. Built by the CLI from flags and the config
/// file, or directly by embedders and tests.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    pub pattern: String,
    pub paths: Vec<PathBuf>,
    pub recursive: bool,
    pub case_sensitive: bool,
    pub use_regex: bool,
    pub workers: usize,
    /// Maximum decoder chain length; the only bound on exploration.
    pub depth: usize,
    pub context_before: usize,
    pub context_after: usize,
    pub exclude_dirs: Vec<String>,
    /// Shannon entropy lower bound; 0 disables the gate.
    pub entropy_threshold: f64,
    /// Admitted magic signature names; empty admits everything.
    pub magic_filter: Vec<String>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            pattern: String::new(),
            paths: Vec::new(),
            recursive: false,
            case_sensitive: true,
            use_regex: false,
            workers: DEFAULT_WORKERS,
            depth: DEFAULT_DEPTH,
            context_before: 10,
            context_after: 30,
            exclude_dirs: config::default_exclude_dirs(),
            entropy_threshold: 0.0,
            magic_filter: Vec::new(),
        }
    }
}

// ─── Run Statistics ────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default)]
pub struct RunStats {
    pub files_scanned: usize,
    pub files_skipped: usize,
    /// 1 when standard input was searched as a unit.
    pub stdin_units: usize,
}

// ─── Searcher ──────────────────────────────────────────────────────

pub struct Searcher {
    config: SearchConfig,
    registry: DecoderRegistry,
    matcher: PatternMatcher,
}

impl Searcher {
    /// Build the immutable parts of a run. Fails on an invalid user
    /// regex — the only compile-time input.
    pub fn new(config: SearchConfig) -> UncloakResult<Self> {
        let matcher =
            PatternMatcher::compile(&config.pattern, config.case_sensitive, config.use_regex)?;
        Ok(Self {
            config,
            registry: DecoderRegistry::standard(),
            matcher,
        })
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Enumerate input units and search each to the configured depth.
    ///
    /// Explicitly named paths that cannot be stat'ed fail the run before
    /// any unit is searched; everything after that point degrades to
    /// per-file skips.
    pub fn run(&self, sink: &dyn MatchSink) -> UncloakResult<RunStats> {
        let cfg = &self.config;

        let mut read_stdin = cfg.paths.is_empty();
        let mut roots: Vec<&Path> = Vec::new();
        for path in &cfg.paths {
            if path.as_os_str() == "-" {
                read_stdin = true;
            } else {
                roots.push(path);
            }
        }

        let walker = Walker::new(cfg.recursive, cfg.exclude_dirs.clone());
        for root in &roots {
            walker.check_root(root)?;
        }

        // stdin is consumed once, fully, before its BFS starts
        let mut stats = RunStats::default();
        if read_stdin {
            let content = ingest::read_stdin()?;
            bfs::explore(&self.bfs_context(sink), content, ingest::STDIN_TAG);
            stats.stdin_units = 1;
        }

        let scanned = AtomicUsize::new(0);
        let skipped = AtomicUsize::new(0);
        if !roots.is_empty() {
            let (tx, rx) = crossbeam_channel::unbounded::<PathBuf>();
            std::thread::scope(|scope| {
                scope.spawn(move || {
                    for root in roots {
                        if let Err(err) = walker.walk(root, |path| {
                            let _ = tx.send(path);
                        }) {
                            tracing::warn!("walking {}: {err}", root.display());
                        }
                    }
                    // tx drops here; workers exit on drain
                });
                pool::drain(cfg.workers, rx, |path| {
                    self.process_file(&path, sink, &scanned, &skipped);
                });
            });
        }

        stats.files_scanned = scanned.load(Ordering::Relaxed);
        stats.files_skipped = skipped.load(Ordering::Relaxed);
        tracing::info!(
            files_scanned = stats.files_scanned,
            files_skipped = stats.files_skipped,
            "search complete"
        );
        Ok(stats)
    }

    /// Read, gate, and search one file. Called from worker threads.
    fn process_file(
        &self,
        path: &Path,
        sink: &dyn MatchSink,
        scanned: &AtomicUsize,
        skipped: &AtomicUsize,
    ) {
        let cfg = &self.config;

        let content = match std::fs::read(path) {
            Ok(content) => content,
            Err(err) => {
                tracing::debug!("skipping {}: {err}", path.display());
                skipped.fetch_add(1, Ordering::Relaxed);
                return;
            }
        };

        if !matches_magic_filter(&content, &cfg.magic_filter) {
            tracing::debug!(
                "skipping {} (magic: {}, filter: {:?})",
                path.display(),
                detect_magic(&content),
                cfg.magic_filter
            );
            skipped.fetch_add(1, Ordering::Relaxed);
            return;
        }

        if cfg.entropy_threshold > 0.0 {
            let entropy = shannon_entropy(&content);
            if entropy < cfg.entropy_threshold {
                tracing::debug!(
                    "skipping {} (entropy {entropy:.2} < threshold {:.2})",
                    path.display(),
                    cfg.entropy_threshold
                );
                skipped.fetch_add(1, Ordering::Relaxed);
                return;
            }
        }

        scanned.fetch_add(1, Ordering::Relaxed);
        let tag = path.display().to_string();
        bfs::explore(&self.bfs_context(sink), content, &tag);
    }

    fn bfs_context<'a>(&'a self, sink: &'a dyn MatchSink) -> bfs::BfsContext<'a> {
        bfs::BfsContext {
            registry: &self.registry,
            matcher: &self.matcher,
            max_depth: self.config.depth,
            context_before: self.config.context_before,
            context_after: self.config.context_after,
            sink,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::MatchCollector;
    use std::fs;
    use tempfile::TempDir;

    fn run_with(config: SearchConfig) -> (RunStats, Vec<crate::report::MatchRecord>) {
        let searcher = Searcher::new(config).unwrap();
        let sink = MatchCollector::new();
        let stats = searcher.run(&sink).unwrap();
        (stats, sink.take())
    }

    #[test]
    fn invalid_regex_is_startup_fatal() {
        let config = SearchConfig {
            pattern: "f[".into(),
            use_regex: true,
            ..SearchConfig::default()
        };
        assert!(Searcher::new(config).is_err());
    }

    #[test]
    fn missing_named_path_is_startup_fatal() {
        let config = SearchConfig {
            pattern: "x".into(),
            paths: vec![PathBuf::from("/definitely/not/here")],
            ..SearchConfig::default()
        };
        let searcher = Searcher::new(config).unwrap();
        let sink = MatchCollector::new();
        assert!(searcher.run(&sink).is_err());
    }

    #[test]
    fn entropy_gate_skips_low_entropy_files() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("flat.bin"), vec![b'A'; 4096]).unwrap();

        let config = SearchConfig {
            pattern: "A".into(),
            paths: vec![dir.path().join("flat.bin")],
            entropy_threshold: 4.0,
            ..SearchConfig::default()
        };
        let (stats, records) = run_with(config);
        assert_eq!(stats.files_skipped, 1);
        assert_eq!(stats.files_scanned, 0);
        assert!(records.is_empty());
    }

    #[test]
    fn magic_filter_admits_and_skips() {
        let dir = TempDir::new().unwrap();
        let mut elf = vec![0x7F, b'E', b'L', b'F'];
        elf.extend_from_slice(b" secret inside");
        fs::write(dir.path().join("a.bin"), &elf).unwrap();
        fs::write(dir.path().join("b.bin"), [0u8, 0, 0, 0]).unwrap();

        let config = SearchConfig {
            pattern: "secret".into(),
            paths: vec![dir.path().join("a.bin"), dir.path().join("b.bin")],
            magic_filter: vec!["ELF".into()],
            ..SearchConfig::default()
        };
        let (stats, records) = run_with(config);
        assert_eq!(stats.files_scanned, 1);
        assert_eq!(stats.files_skipped, 1);
        assert!(records.iter().all(|r| r.file.ends_with("a.bin")));
        assert!(!records.is_empty());
    }

    #[test]
    fn gates_disabled_by_default() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("plain.txt"), "This is a secret message").unwrap();

        let config = SearchConfig {
            pattern: "secret".into(),
            paths: vec![dir.path().join("plain.txt")],
            ..SearchConfig::default()
        };
        let (stats, records) = run_with(config);
        assert_eq!(stats.files_scanned, 1);
        assert_eq!(records[0].offset, 10);
    }
}
