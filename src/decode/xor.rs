//! Single-byte XOR brute force

use super::{is_printable, DecodeError, DecodeResult};

/// Try every key 1..=255 in ascending order and return the first result
/// where at least 80% of the bytes are printable.
pub(super) fn xor_bruteforce(input: &[u8]) -> DecodeResult {
    if input.is_empty() {
        return Err(DecodeError("empty input"));
    }

    let threshold = (input.len() as f64 * 0.8).ceil() as usize;
    for key in 1u8..=255 {
        let decoded: Vec<u8> = input.iter().map(|&b| b ^ key).collect();
        let printable = decoded.iter().filter(|&&b| is_printable(b)).count();
        if printable >= threshold {
            return Ok(decoded);
        }
    }

    Err(DecodeError("no plausible XOR key"))
}
