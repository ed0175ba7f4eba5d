//! Compiled literal-or-regex pattern matcher
//!
//! Matching runs on `regex::bytes` so decoded content that is not valid
//! UTF-8 is still searchable byte for byte.

use crate::UncloakResult;

pub struct PatternMatcher {
    re: regex::bytes::Regex,
}

impl PatternMatcher {
    /// Compile the user pattern. Non-regex patterns are quoted so regex
    /// metacharacters match literally; case-insensitive matching applies
    /// `(?i)` across the whole pattern. A bad user regex is a startup
    /// error, not a per-file one.
    pub fn compile(pattern: &str, case_sensitive: bool, is_regex: bool) -> UncloakResult<Self> {
        let mut source = if is_regex {
            pattern.to_string()
        } else {
            regex::escape(pattern)
        };
        if !case_sensitive {
            source = format!("(?i){source}");
        }
        Ok(Self {
            re: regex::bytes::Regex::new(&source)?,
        })
    }

    pub fn is_hit(&self, content: &[u8]) -> bool {
        self.re.is_match(content)
    }

    /// Byte spans of up to `cap` hits, in order of occurrence.
    pub fn find_all(&self, content: &[u8], cap: usize) -> Vec<(usize, usize)> {
        self.re
            .find_iter(content)
            .take(cap)
            .map(|m| (m.start(), m.end()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_patterns_are_quoted() {
        let m = PatternMatcher::compile("f.o", true, false).unwrap();
        assert!(m.is_hit(b"a f.o b"));
        assert!(!m.is_hit(b"a foo b"));
    }

    #[test]
    fn regex_mode_compiles_verbatim() {
        let m = PatternMatcher::compile(r"flag\{[a-z]+\}", true, true).unwrap();
        assert!(m.is_hit(b"xx flag{ctf} xx"));
        assert!(PatternMatcher::compile("f[", true, true).is_err());
    }

    #[test]
    fn case_insensitive_prefix() {
        let m = PatternMatcher::compile("Secret", false, false).unwrap();
        assert!(m.is_hit(b"SECRET"));
        assert!(m.is_hit(b"secret"));
    }

    #[test]
    fn find_all_respects_cap_and_spans() {
        let m = PatternMatcher::compile("ab", true, false).unwrap();
        let spans = m.find_all(b"ab ab ab ab", 3);
        assert_eq!(spans, vec![(0, 2), (3, 5), (6, 8)]);
    }

    #[test]
    fn matches_arbitrary_bytes() {
        let m = PatternMatcher::compile("secret", true, false).unwrap();
        let mut haystack = vec![0xff, 0x00, 0xfe];
        haystack.extend_from_slice(b"secret");
        haystack.push(0x80);
        assert!(m.is_hit(&haystack));
        assert_eq!(m.find_all(&haystack, 10), vec![(3, 9)]);
    }
}
