//! Textual decoders: reverse, space removal, percent-encoding, HTML
//! entities, unicode escapes, and Morse code

use once_cell::sync::Lazy;
use regex::bytes::Regex;

use super::{substitute_runs, DecodeError, DecodeResult};

/// `"olleH"` → `"Hello"`
///
/// Code-point reversal when the buffer is valid UTF-8, byte reversal
/// otherwise; either way every input byte is preserved.
pub(super) fn reverse(input: &[u8]) -> DecodeResult {
    match std::str::from_utf8(input) {
        Ok(s) => Ok(s.chars().rev().collect::<String>().into_bytes()),
        Err(_) => Ok(input.iter().rev().copied().collect()),
    }
}

/// `"H e l l o"` → `"Hello"`
pub(super) fn space_removal(input: &[u8]) -> DecodeResult {
    Ok(input.iter().copied().filter(|&b| b != b' ').collect())
}

/// Percent-decoding in query-string form: `+` means space and every `%`
/// must introduce exactly two hex digits.
pub(super) fn url(input: &[u8]) -> DecodeResult {
    let mut i = 0;
    while i < input.len() {
        if input[i] == b'%' {
            if i + 2 >= input.len()
                || !input[i + 1].is_ascii_hexdigit()
                || !input[i + 2].is_ascii_hexdigit()
            {
                return Err(DecodeError("malformed percent escape"));
            }
            i += 3;
        } else {
            i += 1;
        }
    }
    let plussed: Vec<u8> = input
        .iter()
        .map(|&b| if b == b'+' { b' ' } else { b })
        .collect();
    Ok(urlencoding::decode_binary(&plussed).into_owned())
}

/// HTML entity unescape: the common named entities plus decimal and hex
/// numeric references. Unknown entities pass through untouched.
pub(super) fn html(input: &[u8]) -> DecodeResult {
    let mut out = Vec::with_capacity(input.len());
    let mut i = 0;
    while i < input.len() {
        if input[i] == b'&' {
            if let Some((replacement, consumed)) = parse_entity(&input[i..]) {
                out.extend_from_slice(&replacement);
                i += consumed;
                continue;
            }
        }
        out.push(input[i]);
        i += 1;
    }
    Ok(out)
}

fn parse_entity(s: &[u8]) -> Option<(Vec<u8>, usize)> {
    // s starts at '&'; the reference must close with ';' within 12 bytes
    let end = s.iter().take(12).position(|&b| b == b';')?;
    let body = &s[1..end];
    let ch = match body {
        b"lt" => '<',
        b"gt" => '>',
        b"amp" => '&',
        b"quot" => '"',
        b"apos" => '\'',
        b"nbsp" => '\u{a0}',
        _ => {
            let body = std::str::from_utf8(body).ok()?;
            let code = if let Some(hex) = body.strip_prefix("#x").or_else(|| body.strip_prefix("#X"))
            {
                u32::from_str_radix(hex, 16).ok()?
            } else if let Some(dec) = body.strip_prefix('#') {
                dec.parse().ok()?
            } else {
                return None;
            };
            char::from_u32(code)?
        }
    };
    let mut buf = [0u8; 4];
    Some((ch.encode_utf8(&mut buf).as_bytes().to_vec(), end + 1))
}

// ─── Unicode escapes ───────────────────────────────────────────────

static UNICODE_ESCAPE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\\u([0-9a-fA-F]{4})").unwrap());
static HEX_ESCAPE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\\x([0-9a-fA-F]{2})").unwrap());

/// `"H\x65llo"` → `"Hello"`. Fails when no escape was replaced.
pub(super) fn unicode_escape(input: &[u8]) -> DecodeResult {
    let (pass1, count1) = substitute_runs(&UNICODE_ESCAPE, input, |m| escape_to_utf8(&m[2..]));
    let (pass2, count2) = substitute_runs(&HEX_ESCAPE, &pass1, |m| escape_to_utf8(&m[2..]));
    if count1 + count2 == 0 {
        return Err(DecodeError("no unicode escapes found"));
    }
    Ok(pass2)
}

fn escape_to_utf8(digits: &[u8]) -> Option<Vec<u8>> {
    let digits = std::str::from_utf8(digits).ok()?;
    let code = u32::from_str_radix(digits, 16).ok()?;
    let ch = char::from_u32(code)?;
    let mut buf = [0u8; 4];
    Some(ch.encode_utf8(&mut buf).as_bytes().to_vec())
}

// ─── Morse ─────────────────────────────────────────────────────────

static MORSE_WORD_SEP: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s{3,}|/").unwrap());

/// Words separated by three-plus whitespace or `/`, letters within a word
/// by single whitespace. Unknown tokens are dropped; fails on empty
/// output.
pub(super) fn morse(input: &[u8]) -> DecodeResult {
    let mut out = Vec::new();
    for (i, word) in MORSE_WORD_SEP.split(input).enumerate() {
        if i > 0 {
            out.push(b' ');
        }
        for token in word
            .split(|b: &u8| b.is_ascii_whitespace())
            .filter(|t| !t.is_empty())
        {
            if let Some(ch) = morse_letter(token) {
                out.push(ch);
            }
        }
    }
    if out.is_empty() {
        return Err(DecodeError("no morse code found"));
    }
    Ok(out)
}

fn morse_letter(token: &[u8]) -> Option<u8> {
    Some(match token {
        b".-" => b'A',
        b"-..." => b'B',
        b"-.-." => b'C',
        b"-.." => b'D',
        b"." => b'E',
        b"..-." => b'F',
        b"--." => b'G',
        b"...." => b'H',
        b".." => b'I',
        b".---" => b'J',
        b"-.-" => b'K',
        b".-.." => b'L',
        b"--" => b'M',
        b"-." => b'N',
        b"---" => b'O',
        b".--." => b'P',
        b"--.-" => b'Q',
        b".-." => b'R',
        b"..." => b'S',
        b"-" => b'T',
        b"..-" => b'U',
        b"...-" => b'V',
        b".--" => b'W',
        b"-..-" => b'X',
        b"-.--" => b'Y',
        b"--.." => b'Z',
        b"-----" => b'0',
        b".----" => b'1',
        b"..---" => b'2',
        b"...--" => b'3',
        b"....-" => b'4',
        b"....." => b'5',
        b"-...." => b'6',
        b"--..." => b'7',
        b"---.." => b'8',
        b"----." => b'9',
        b".-.-.-" => b'.',
        b"--..--" => b',',
        b"..--.." => b'?',
        _ => return None,
    })
}
