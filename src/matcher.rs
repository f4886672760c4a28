//! Pluggable phrase matching
//!
//! The login and command flows decide when to stop reading by matching
//! caller-supplied phrases against each received chunk. The matching
//! capability is a trait so protocol variants are not hard-coded into the
//! session engine: byte-substring containment is the default, with prefix
//! and regex matchers available.

use regex::bytes::Regex;

/// Decides whether a phrase matches a chunk of received data
pub trait PhraseMatcher {
    fn matches(&self, phrase: &[u8], data: &[u8]) -> bool;
}

/// Byte-substring containment, the default matching behavior
#[derive(Debug, Default, Clone, Copy)]
pub struct SubstringMatcher;

impl PhraseMatcher for SubstringMatcher {
    fn matches(&self, phrase: &[u8], data: &[u8]) -> bool {
        if phrase.is_empty() {
            return true;
        }
        data.windows(phrase.len()).any(|window| window == phrase)
    }
}

/// Matches only when the chunk starts with the phrase
#[derive(Debug, Default, Clone, Copy)]
pub struct PrefixMatcher;

impl PhraseMatcher for PrefixMatcher {
    fn matches(&self, phrase: &[u8], data: &[u8]) -> bool {
        data.starts_with(phrase)
    }
}

/// Applies a compiled regular expression to the chunk. The phrase argument
/// is ignored; the pattern supplied at construction decides the match.
#[derive(Debug, Clone)]
pub struct RegexMatcher {
    pattern: Regex,
}

impl RegexMatcher {
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
        })
    }
}

impl PhraseMatcher for RegexMatcher {
    fn matches(&self, _phrase: &[u8], data: &[u8]) -> bool {
        self.pattern.is_match(data)
    }
}

/// Finds the first phrase in `phrases` that matches `data`, in list order.
/// Returns the phrase index and the phrase itself, or `None` when nothing
/// matches.
pub fn match_phrase<'a>(
    matcher: &dyn PhraseMatcher,
    phrases: &'a [Vec<u8>],
    data: &[u8],
) -> Option<(usize, &'a [u8])> {
    phrases
        .iter()
        .enumerate()
        .find(|(_, phrase)| matcher.matches(phrase, data))
        .map(|(i, phrase)| (i, phrase.as_slice()))
}
