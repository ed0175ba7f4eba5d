//! Input enumeration — file tree walking and the stdin unit

mod walker;

pub use walker::Walker;

use std::io::Read;

/// Tag used for the standard-input unit in match records.
pub const STDIN_TAG: &str = "(stdin)";

/// Read all of standard input as one input unit.
pub fn read_stdin() -> std::io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    std::io::stdin().lock().read_to_end(&mut buf)?;
    Ok(buf)
}
