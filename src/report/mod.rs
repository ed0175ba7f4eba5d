//! Match reporting — record type and the two sink implementations
//!
//! The search hands every positive node to a `MatchSink`. Two sinks exist
//! behind the same contract: a streaming printer that writes one line per
//! record to stdout (plain or JSON), and an in-memory collector for
//! consumption by an external viewer. Both are safe to call from multiple
//! worker threads; individual emissions are atomic.

mod printer;

pub use printer::StreamPrinter;

use serde::{Serialize, Serializer};
use std::sync::Mutex;

/// Matches reported per matching node before the remainder is summarised
/// as "and more matches".
pub const MAX_MATCHES_PER_NODE: usize = 5;

// ─── Match Record ──────────────────────────────────────────────────

/// A single pattern hit inside decoded content.
///
/// `offset` indexes the decoded content, not the original file bytes.
/// `context_match_start` locates the hit inside `context` so renderers can
/// highlight it without re-running the matcher.
#[derive(Debug, Clone, Serialize)]
pub struct MatchRecord {
    pub file: String,
    pub decoders: Vec<&'static str>,
    #[serde(rename = "match", serialize_with = "lossy_bytes")]
    pub matched: Vec<u8>,
    #[serde(serialize_with = "lossy_bytes")]
    pub context: Vec<u8>,
    pub offset: usize,
    #[serde(skip)]
    pub context_match_start: usize,
}

impl MatchRecord {
    /// The decoder chain as reported to the user: `"a -> b"` or `"None"`.
    pub fn chain(&self) -> String {
        if self.decoders.is_empty() {
            "None".to_string()
        } else {
            self.decoders.join(" -> ")
        }
    }
}

/// Byte strings render as lossy UTF-8 in JSON output; raw bytes stay
/// intact everywhere else in the pipeline.
fn lossy_bytes<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&String::from_utf8_lossy(bytes))
}

// ─── Sink Contract ─────────────────────────────────────────────────

/// Receives match records from concurrently running searches.
pub trait MatchSink: Send + Sync {
    fn emit(&self, record: &MatchRecord);

    /// Called once per node whose hit count exceeded
    /// [`MAX_MATCHES_PER_NODE`].
    fn emit_overflow(&self, _file: &str, _decoders: &[&'static str]) {}
}

// ─── In-memory Collector ───────────────────────────────────────────

/// Appends every record to a growable list for later consumption.
#[derive(Debug, Default)]
pub struct MatchCollector {
    records: Mutex<Vec<MatchRecord>>,
}

impl MatchCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drain the collected records.
    pub fn take(&self) -> Vec<MatchRecord> {
        std::mem::take(&mut self.records.lock().unwrap())
    }

    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl MatchSink for MatchCollector {
    fn emit(&self, record: &MatchRecord) {
        self.records.lock().unwrap().push(record.clone());
    }
}
