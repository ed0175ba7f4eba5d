//! Radix decoders: hex (spaced, bare, 0x-prefixed), binary, octal

use once_cell::sync::Lazy;
use regex::bytes::Regex;

use super::{printable_ratio, substitute_runs, DecodeError, DecodeResult};

static HEX_SPACED_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[0-9a-fA-F]{2}(?:\s+[0-9a-fA-F]{2})+\b").unwrap());

static HEX_BARE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b[0-9a-fA-F]{6,}\b").unwrap());

static HEX_PREFIXED_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:0x[0-9a-fA-F]{2}(?:\s+|$))+").unwrap());

static BINARY_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[01]{16,}").unwrap());

/// `"48 65 6c 6c 6f"` → `"Hello"`
pub(super) fn hex_with_spaces(input: &[u8]) -> DecodeResult {
    let (out, count) = substitute_runs(&HEX_SPACED_RUN, input, |run| {
        let digits: Vec<u8> = run
            .iter()
            .copied()
            .filter(|b| !b.is_ascii_whitespace())
            .collect();
        hex::decode(&digits).ok()
    });
    if count == 0 {
        return Err(DecodeError("no spaced hex runs decoded"));
    }
    Ok(out)
}

/// `"48656c6c6f"` → `"Hello"`
///
/// A bare hex run is only substituted when the decoded bytes are mostly
/// printable; otherwise six-plus hex digits show up in far too many
/// hashes and identifiers to be worth an edge.
pub(super) fn hex_without_spaces(input: &[u8]) -> DecodeResult {
    let (out, count) = substitute_runs(&HEX_BARE_RUN, input, |run| {
        if run.len() % 2 != 0 {
            return None;
        }
        let decoded = hex::decode(run).ok()?;
        if printable_ratio(&decoded) > 0.8 {
            Some(decoded)
        } else {
            None
        }
    });
    if count == 0 {
        return Err(DecodeError("no bare hex runs decoded"));
    }
    Ok(out)
}

/// `"0x48 0x65 0x6c 0x6c 0x6f"` → `"Hello"`
pub(super) fn hex_with_prefix(input: &[u8]) -> DecodeResult {
    let (out, count) = substitute_runs(&HEX_PREFIXED_RUN, input, |run| {
        let mut digits = Vec::with_capacity(run.len() / 2);
        let mut i = 0;
        while i < run.len() {
            if run[i] == b'0' && run.get(i + 1) == Some(&b'x') {
                i += 2;
            } else if run[i].is_ascii_whitespace() {
                i += 1;
            } else {
                digits.push(run[i]);
                i += 1;
            }
        }
        hex::decode(&digits).ok()
    });
    if count == 0 {
        return Err(DecodeError("no 0x-prefixed runs decoded"));
    }
    Ok(out)
}

/// `"01001000"` → `"H"`
///
/// Whole-string form: after stripping whitespace the input must be purely
/// 0/1 with a length divisible by eight and decode to mostly printable
/// bytes. Failing that, embedded runs of sixteen-plus bits are substituted
/// under the same rule.
pub(super) fn binary(input: &[u8]) -> DecodeResult {
    let clean: Vec<u8> = input
        .iter()
        .copied()
        .filter(|b| !b.is_ascii_whitespace())
        .collect();
    if !clean.is_empty() && clean.iter().all(|&b| b == b'0' || b == b'1') {
        if let Some(decoded) = decode_bits(&clean) {
            return Ok(decoded);
        }
    }

    let (out, count) = substitute_runs(&BINARY_RUN, input, |run| decode_bits(run));
    if count == 0 {
        return Err(DecodeError("no binary runs decoded"));
    }
    Ok(out)
}

fn decode_bits(bits: &[u8]) -> Option<Vec<u8>> {
    if bits.is_empty() || bits.len() % 8 != 0 {
        return None;
    }
    let mut out = Vec::with_capacity(bits.len() / 8);
    for octet in bits.chunks(8) {
        let mut value = 0u8;
        for &bit in octet {
            value = (value << 1) | (bit - b'0');
        }
        out.push(value);
    }
    if printable_ratio(&out) >= 0.7 {
        Some(out)
    } else {
        None
    }
}

/// `"110 145 154 154 157"` → `"Hello"`
///
/// Whitespace-separated octal words, one to three digits, each at most
/// 0o377. A word outside that range fails the whole decode rather than
/// silently truncating into bytes no inverse encoding would produce.
pub(super) fn octal(input: &[u8]) -> DecodeResult {
    let mut out = Vec::new();
    for word in input
        .split(|b| b.is_ascii_whitespace())
        .filter(|w| !w.is_empty())
    {
        if word.len() > 3 {
            return Err(DecodeError("octal word too long"));
        }
        let mut value: u16 = 0;
        for &b in word {
            if !(b'0'..=b'7').contains(&b) {
                return Err(DecodeError("invalid octal digit"));
            }
            value = value * 8 + u16::from(b - b'0');
        }
        if value > 0o377 {
            return Err(DecodeError("octal word exceeds one byte"));
        }
        out.push(value as u8);
    }
    if out.is_empty() {
        return Err(DecodeError("no octal words"));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spaced_hex_run_inside_text() {
        let got = hex_with_spaces(b"flag: 73 65 63 72 65 74 end").unwrap();
        assert_eq!(got, b"flag: secret end");
    }

    #[test]
    fn bare_hex_respects_printability_gate() {
        assert_eq!(hex_without_spaces(b"736563726574").unwrap(), b"secret");
        // decodes to unprintable garbage, kept verbatim -> no edge
        assert!(hex_without_spaces(b"000102030405").is_err());
        // odd-length run
        assert!(hex_without_spaces(b"73656372657").is_err());
    }

    #[test]
    fn prefixed_hex_tokens() {
        assert_eq!(hex_with_prefix(b"0x73 0x65 0x63").unwrap(), b"sec");
        assert!(hex_with_prefix(b"no tokens here").is_err());
    }

    #[test]
    fn binary_whole_string_with_whitespace() {
        assert_eq!(binary(b"01001000 01101001").unwrap(), b"Hi");
    }

    #[test]
    fn binary_embedded_run() {
        let got = binary(b"bits=0100100001101001;").unwrap();
        assert_eq!(got, b"bits=Hi;");
    }

    #[test]
    fn binary_rejects_ragged_length() {
        assert!(binary(b"0100100").is_err());
    }

    #[test]
    fn octal_words() {
        assert_eq!(octal(b"110 145 154 154 157").unwrap(), b"Hello");
        assert!(octal(b"999").is_err());
        // 777 parses as octal but overflows a byte
        assert!(octal(b"777").is_err());
        assert!(octal(b"").is_err());
    }
}
