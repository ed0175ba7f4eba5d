//! Streaming printer — one line per match on stdout

use std::io::Write;

use super::{MatchRecord, MatchSink};

const RED: &str = "\x1b[31m";
const RESET: &str = "\x1b[0m";

/// Thread-safe line printer. Plain mode highlights the hit inside its
/// context window; JSON mode emits one object per line. Write failures are
/// reported to stderr and never abort the run.
#[derive(Debug, Clone, Copy)]
pub struct StreamPrinter {
    json: bool,
}

impl StreamPrinter {
    pub fn new(json: bool) -> Self {
        Self { json }
    }

    fn render_plain(&self, record: &MatchRecord) -> String {
        let prefix = escape_for_display(&record.context[..record.context_match_start]);
        let matched = escape_for_display(&record.matched);
        let suffix_start = record.context_match_start + record.matched.len();
        let suffix = escape_for_display(&record.context[suffix_start..]);

        format!(
            "[MATCH] File: {} | Decoders: {} | Content: ...{prefix}{RED}{matched}{RESET}{suffix}...",
            record.file,
            record.chain(),
        )
    }
}

impl MatchSink for StreamPrinter {
    fn emit(&self, record: &MatchRecord) {
        let line = if self.json {
            match serde_json::to_string(record) {
                Ok(line) => line,
                Err(err) => {
                    eprintln!("uncloak: failed to serialize match: {err}");
                    return;
                }
            }
        } else {
            self.render_plain(record)
        };

        // the stdout lock keeps concurrent emissions atomic
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        if let Err(err) = writeln!(out, "{line}") {
            eprintln!("uncloak: failed to write match: {err}");
        }
    }

    fn emit_overflow(&self, file: &str, decoders: &[&'static str]) {
        if self.json {
            return;
        }
        let chain = if decoders.is_empty() {
            "None".to_string()
        } else {
            decoders.join(" -> ")
        };
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        if let Err(err) = writeln!(
            out,
            "[MATCH] File: {file} | Decoders: {chain} | ... and more matches ..."
        ) {
            eprintln!("uncloak: failed to write match: {err}");
        }
    }
}

/// Lossy display form with newlines and carriage returns escaped so a
/// record stays on one terminal line.
fn escape_for_display(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes)
        .replace('\n', "\\n")
        .replace('\r', "\\r")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_rendering_escapes_and_highlights() {
        let printer = StreamPrinter::new(false);
        let record = MatchRecord {
            file: "x.bin".into(),
            decoders: vec!["base64"],
            matched: b"secret".to_vec(),
            context: b"a\nsecret\rz".to_vec(),
            offset: 2,
            context_match_start: 2,
        };
        let line = printer.render_plain(&record);
        assert!(line.contains("File: x.bin"));
        assert!(line.contains("Decoders: base64"));
        assert!(line.contains("a\\n"));
        assert!(line.contains("\\rz"));
        assert!(line.contains(&format!("{RED}secret{RESET}")));
    }
}
