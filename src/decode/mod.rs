//! Decoder catalogue — named, pure, fallible byte-string transforms
//!
//! Every decoder takes the current content as raw bytes and either produces
//! a transformed byte string or declines. Failures are benign: the search
//! treats them as "no edge" and never surfaces them to the user, so a
//! decoder must never panic on malformed input.
//!
//! Substitution-style decoders (the hex family, `binary`, embedded base-N
//! runs) scan for plausible encoded runs and replace them in place,
//! gated by a printability ratio that separates accidental decodings from
//! plausible ones. The thresholds are part of the contract: 70% for
//! embedded base64/base32 and binary runs, 80% for bare hex runs and XOR
//! brute force, 50% for Ascii85.

mod basex;
mod radix;
mod rotate;
mod text;
mod xor;

use std::fmt;

// ─── Decoder Type ──────────────────────────────────────────────────

/// Why a decoder declined to produce an edge.
///
/// Never shown to the user; carried only so decoders read as ordinary
/// fallible functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeError(pub(crate) &'static str);

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

impl std::error::Error for DecodeError {}

pub type DecodeResult = Result<Vec<u8>, DecodeError>;

/// A single decoding step: content in, transformed content or failure out.
pub type DecoderFn = fn(&[u8]) -> DecodeResult;

// ─── Registry ──────────────────────────────────────────────────────

/// Ordered table of every decoder the search may apply.
///
/// Iteration order is fixed at construction so reported decoder chains are
/// reproducible across runs for the same input.
pub struct DecoderRegistry {
    entries: Vec<(&'static str, DecoderFn)>,
}

impl DecoderRegistry {
    /// The standard catalogue. Names are frozen identifiers.
    pub fn standard() -> Self {
        let entries: Vec<(&'static str, DecoderFn)> = vec![
            ("reverse", text::reverse),
            ("space_removal", text::space_removal),
            ("base64", basex::base64),
            ("base64_url", basex::base64_url),
            ("base32", basex::base32),
            ("hex_with_spaces", radix::hex_with_spaces),
            ("hex_without_spaces", radix::hex_without_spaces),
            ("hex_with_prefix", radix::hex_with_prefix),
            ("rot13", rotate::rot13),
            ("rot47", rotate::rot47),
            ("binary", radix::binary),
            ("octal", radix::octal),
            ("url", text::url),
            ("html", text::html),
            ("xor_bruteforce", xor::xor_bruteforce),
            ("atbash", rotate::atbash),
            ("morse", text::morse),
            ("unicode_escape", text::unicode_escape),
            ("base85", basex::base85),
            ("caesar", rotate::caesar),
        ];
        Self { entries }
    }

    pub fn lookup(&self, name: &str) -> Option<DecoderFn> {
        self.entries
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, f)| *f)
    }

    /// Deterministic iteration over `(name, decoder)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, DecoderFn)> + '_ {
        self.entries.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for DecoderRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

// ─── Shared Helpers ────────────────────────────────────────────────

/// Printable for gating purposes: byte in 32..=126 or tab/CR/LF.
pub(crate) fn is_printable(b: u8) -> bool {
    (32..=126).contains(&b) || b == b'\t' || b == b'\r' || b == b'\n'
}

pub(crate) fn printable_ratio(data: &[u8]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    let printable = data.iter().filter(|&&b| is_printable(b)).count();
    printable as f64 / data.len() as f64
}

/// Replace every run matched by `re` with the bytes produced by `replace`,
/// leaving the run untouched when `replace` declines. Returns the rewritten
/// buffer and the number of substitutions made.
pub(crate) fn substitute_runs(
    re: &regex::bytes::Regex,
    input: &[u8],
    mut replace: impl FnMut(&[u8]) -> Option<Vec<u8>>,
) -> (Vec<u8>, usize) {
    let mut out = Vec::with_capacity(input.len());
    let mut last = 0;
    let mut count = 0;
    for m in re.find_iter(input) {
        out.extend_from_slice(&input[last..m.start()]);
        match replace(m.as_bytes()) {
            Some(rep) => {
                out.extend_from_slice(&rep);
                count += 1;
            }
            None => out.extend_from_slice(m.as_bytes()),
        }
        last = m.end();
    }
    out.extend_from_slice(&input[last..]);
    (out, count)
}

// ─── Tests ──────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    /// One expected decoding per registry entry, mirroring the frozen
    /// name set.
    #[test]
    fn decoder_table() {
        let registry = DecoderRegistry::standard();

        let cases: &[(&str, &[u8], &[u8])] = &[
            ("reverse", b"olleH", b"Hello"),
            ("space_removal", b"H e l l o", b"Hello"),
            ("base64", b"SGVsbG8=", b"Hello"),
            ("base64_url", b"SGVsbG8=", b"Hello"),
            ("base32", b"JBSWY3DP", b"Hello"),
            ("hex_with_spaces", b"48 65 6c 6c 6f", b"Hello"),
            ("hex_without_spaces", b"48656c6c6f", b"Hello"),
            ("hex_with_prefix", b"0x48 0x65 0x6c 0x6c 0x6f", b"Hello"),
            ("rot13", b"Uryyb", b"Hello"),
            ("rot47", b"w6==@", b"Hello"),
            ("binary", b"01001000", b"H"),
            ("octal", b"110 145 154 154 157", b"Hello"),
            ("url", b"%48%65%6c%6c%6f", b"Hello"),
            ("html", b"&lt;", b"<"),
            ("atbash", b"Svool", b"Hello"),
            ("morse", b".... . .-.. .-.. ---", b"HELLO"),
            (
                "unicode_escape",
                b"\\u0048\\u0065\\u006c\\u006c\\u006f",
                b"Hello",
            ),
        ];

        for (name, input, want) in cases {
            let decoder = registry
                .lookup(name)
                .unwrap_or_else(|| panic!("decoder {name} not registered"));
            let got = decoder(input).unwrap_or_else(|e| panic!("{name} failed: {e}"));
            assert_eq!(&got, want, "decoder {name}");
        }
    }

    #[test]
    fn decoder_table_failures() {
        let registry = DecoderRegistry::standard();

        // no embedded run and not whole-string decodable
        assert!(registry.lookup("base64").unwrap()(b"Invalid!").is_err());
        // not a multiple of eight bits, no 16+ digit run
        assert!(registry.lookup("binary").unwrap()(b"12345678").is_err());
        // 9 is not an octal digit
        assert!(registry.lookup("octal").unwrap()(b"999").is_err());
        // nothing rotated
        assert!(registry.lookup("caesar").unwrap()(b"12345").is_err());
    }

    #[test]
    fn registry_has_all_twenty() {
        let registry = DecoderRegistry::standard();
        assert_eq!(registry.len(), 20);
        for name in [
            "reverse",
            "space_removal",
            "base64",
            "base64_url",
            "base32",
            "hex_with_spaces",
            "hex_without_spaces",
            "hex_with_prefix",
            "rot13",
            "rot47",
            "binary",
            "octal",
            "url",
            "html",
            "xor_bruteforce",
            "atbash",
            "morse",
            "unicode_escape",
            "base85",
            "caesar",
        ] {
            assert!(registry.lookup(name).is_some(), "missing decoder {name}");
        }
    }

    #[test]
    fn iteration_order_is_stable() {
        let a: Vec<&str> = DecoderRegistry::standard().iter().map(|(n, _)| n).collect();
        let b: Vec<&str> = DecoderRegistry::standard().iter().map(|(n, _)| n).collect();
        assert_eq!(a, b);
    }

    #[test]
    fn printable_ratio_bounds() {
        assert_eq!(printable_ratio(b""), 0.0);
        assert_eq!(printable_ratio(b"Hello\n"), 1.0);
        assert!(printable_ratio(&[0u8, 1, 2, b'a']) < 0.5);
    }
}
