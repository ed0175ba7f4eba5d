//! Pre-search gates over raw file bytes
//!
//! Both gates are pure predicates applied by the worker pool before a file
//! reaches the search: a magic-signature inclusion filter and a Shannon
//! entropy threshold. Neither allocates; both are disabled by default.

pub mod entropy;
pub mod magic;

pub use entropy::shannon_entropy;
pub use magic::{detect_magic, matches_magic_filter};
