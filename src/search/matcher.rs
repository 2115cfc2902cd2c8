//! Per-cell match decision shared by find and replace.
//!
//! An exact (substring) hit always wins with score 1.0. Only when there is none
//! do we slide windows of `60%..=150%` of the query length over the cell and
//! keep the most similar one.

use regex::{NoExpand, Regex, RegexBuilder};
use std::borrow::Cow;

use super::similarity::similarity_chars;
use crate::error::{GridError, Result};

/// A window score above this ends the fuzzy scan early.
const NEAR_PERFECT: f64 = 0.95;

/// Outcome of matching one cell.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult {
    pub score: f64,
    /// Character offset of the match
    pub match_index: usize,
    pub matched_text: String,
    pub exact: bool,
}

/// Literal substring pattern, optionally case-insensitive.
///
/// Case-insensitive patterns are compiled from the escaped query, so regex
/// metacharacters in the query are matched literally.
#[derive(Debug, Clone)]
pub enum ExactPattern {
    Sensitive(String),
    Insensitive(Regex),
}

impl ExactPattern {
    pub fn new(query: &str, case_sensitive: bool) -> Result<Self> {
        if case_sensitive {
            return Ok(Self::Sensitive(query.to_string()));
        }
        let regex = RegexBuilder::new(&regex::escape(query))
            .case_insensitive(true)
            .build()?;
        Ok(Self::Insensitive(regex))
    }

    /// First occurrence as `(char offset, matched text)`.
    pub fn find<'t>(&self, text: &'t str) -> Option<(usize, &'t str)> {
        let (start, end) = match self {
            Self::Sensitive(query) => {
                let start = text.find(query.as_str())?;
                (start, start + query.len())
            }
            Self::Insensitive(regex) => {
                let m = regex.find(text)?;
                (m.start(), m.end())
            }
        };
        let offset = text.get(..start).map_or(0, |prefix| prefix.chars().count());
        Some((offset, text.get(start..end).unwrap_or_default()))
    }

    pub fn is_match(&self, text: &str) -> bool {
        match self {
            Self::Sensitive(query) => text.contains(query.as_str()),
            Self::Insensitive(regex) => regex.is_match(text),
        }
    }

    /// Replace every occurrence with `replacement`, taken literally.
    pub fn replace_all<'t>(&self, text: &'t str, replacement: &str) -> Cow<'t, str> {
        match self {
            Self::Sensitive(query) if text.contains(query.as_str()) => {
                Cow::Owned(text.replace(query.as_str(), replacement))
            }
            Self::Sensitive(_) => Cow::Borrowed(text),
            Self::Insensitive(regex) => regex.replace_all(text, NoExpand(replacement)),
        }
    }
}

/// A compiled query, reused across every cell of a scan.
#[derive(Debug, Clone)]
pub struct Matcher {
    pattern: ExactPattern,
    query: Vec<char>,
    threshold: f64,
    case_sensitive: bool,
}

impl Matcher {
    pub fn new(query: &str, threshold: f64, case_sensitive: bool) -> Result<Self> {
        if query.is_empty() {
            return Err(GridError::EmptyQuery);
        }
        Ok(Self {
            pattern: ExactPattern::new(query, case_sensitive)?,
            query: query.chars().map(|c| fold(c, case_sensitive)).collect(),
            threshold,
            case_sensitive,
        })
    }

    pub fn pattern(&self) -> &ExactPattern {
        &self.pattern
    }

    /// Substring containment only.
    pub fn exact(&self, text: &str) -> Option<MatchResult> {
        if text.is_empty() {
            return None;
        }
        let (match_index, matched) = self.pattern.find(text)?;
        Some(MatchResult {
            score: 1.0,
            match_index,
            matched_text: matched.to_string(),
            exact: true,
        })
    }

    /// Exact hit if there is one, otherwise the best window scoring at least
    /// the threshold.
    pub fn fuzzy(&self, text: &str) -> Option<MatchResult> {
        if text.is_empty() {
            return None;
        }
        if let Some(hit) = self.exact(text) {
            return Some(hit);
        }
        self.best_window(text)
    }

    fn best_window(&self, text: &str) -> Option<MatchResult> {
        let original: Vec<char> = text.chars().collect();
        let folded: Vec<char> = original
            .iter()
            .map(|&c| fold(c, self.case_sensitive))
            .collect();

        let query_len = self.query.len();
        let min_len = (query_len * 3 / 5).max(1);
        let max_len = ((query_len * 3).div_ceil(2)).min(folded.len());

        // (score, start, len); strictly better scores replace earlier ones
        let mut best: Option<(f64, usize, usize)> = None;
        'lengths: for len in min_len..=max_len {
            for (start, window) in folded.windows(len).enumerate() {
                let score = similarity_chars(&self.query, window);
                if best.map_or(true, |(s, _, _)| score > s) {
                    best = Some((score, start, len));
                    if score > NEAR_PERFECT {
                        break 'lengths;
                    }
                }
            }
        }

        let (score, start, len) = best?;
        if score < self.threshold {
            return None;
        }
        let matched_text = original.iter().skip(start).take(len).collect();
        Some(MatchResult {
            score,
            match_index: start,
            matched_text,
            exact: false,
        })
    }
}

/// Match one cell against a query. Empty text or query never match.
pub fn fuzzy_match(
    text: &str,
    query: &str,
    threshold: f64,
    case_sensitive: bool,
) -> Option<MatchResult> {
    Matcher::new(query, threshold, case_sensitive)
        .ok()?
        .fuzzy(text)
}

/// One-to-one case fold so character offsets line up with the original text.
fn fold(c: char, case_sensitive: bool) -> char {
    if case_sensitive {
        return c;
    }
    let mut lower = c.to_lowercase();
    match (lower.next(), lower.next()) {
        (Some(l), None) => l,
        _ => c,
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp
)]
mod tests {
    use super::*;
    use crate::search::similarity::similarity;

    #[test]
    fn test_exact_short_circuit() {
        let hit = fuzzy_match("Hello World", "world", 0.99, false).unwrap();
        assert!(hit.exact);
        assert_eq!(hit.score, 1.0);
        assert_eq!(hit.match_index, 6);
        assert_eq!(hit.matched_text, "World");
    }

    #[test]
    fn test_exact_respects_case() {
        assert!(fuzzy_match("Hello", "hello", 0.9, true)
            .map_or(true, |m| !m.exact));
        assert!(fuzzy_match("Hello", "Hello", 0.9, true).unwrap().exact);
    }

    #[test]
    fn test_char_offset_after_multibyte() {
        let hit = fuzzy_match("café au lait", "au", 0.6, false).unwrap();
        assert_eq!(hit.match_index, 5);
    }

    #[test]
    fn test_regex_metacharacters_are_literal() {
        let hit = fuzzy_match("cost (USD) $5.00", "(usd)", 0.6, false).unwrap();
        assert!(hit.exact);
        assert_eq!(hit.matched_text, "(USD)");
        assert!(fuzzy_match("a.c", "a.c", 1.0, false).unwrap().exact);
        assert!(fuzzy_match("abc", "a.c", 1.0, false).is_none());
    }

    #[test]
    fn test_fuzzy_best_window() {
        let hit = fuzzy_match("John", "Jon", 0.6, false).unwrap();
        assert!(!hit.exact);
        assert_eq!(hit.matched_text, "John");
        assert_eq!(hit.score, similarity("jon", "john"));
    }

    #[test]
    fn test_threshold_inclusive() {
        let score = similarity("jon", "john");
        assert!(fuzzy_match("John", "Jon", score, false).is_some());
        assert!(fuzzy_match("John", "Jon", score + 1e-9, false).is_none());
    }

    #[test]
    fn test_empty_inputs() {
        assert!(fuzzy_match("", "abc", 0.0, false).is_none());
        assert!(fuzzy_match("abc", "", 0.0, false).is_none());
        assert!(matches!(Matcher::new("", 0.5, false), Err(GridError::EmptyQuery)));
    }

    #[test]
    fn test_short_cell_clamps_window() {
        // Cell shorter than the minimum window length: no windows, no match
        let hit = fuzzy_match("ab", "abcdefghij", 0.1, false);
        assert!(hit.is_none());
    }

    #[test]
    fn test_replace_all_insensitive_is_literal() {
        let pattern = ExactPattern::new("jon", false).unwrap();
        assert_eq!(pattern.replace_all("Jon and JON", "$1"), "$1 and $1");
        let pattern = ExactPattern::new("Jon", true).unwrap();
        assert_eq!(pattern.replace_all("Jon and JON", "X"), "X and JON");
    }
}
