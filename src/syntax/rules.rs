//! Classification rules
//!
//! A rule pairs a category and colour with a matcher. Exact-set matchers
//! compare whole lexemes; pattern matchers run a regex anchored at the scan
//! cursor.

use std::collections::HashSet;

use regex::{Regex, RegexBuilder};

use super::style::Color;
use super::tokens::Category;
use crate::error::{EditorError, Result};

/// Longest pattern source accepted from configuration
pub const MAX_PATTERN_LEN: usize = 1024;

/// Upper bound on the compiled size of a pattern
const PATTERN_SIZE_LIMIT: usize = 1 << 20;

/// How a rule recognises its lexemes
#[derive(Debug, Clone)]
pub enum Matcher {
    /// Whole-lexeme equality against a fixed set
    ExactSet(HashSet<String>),
    /// Regex anchored at the scan cursor
    Pattern {
        regex: Regex,
        /// Whether a match may run past the end of the current line
        multiline: bool,
    },
}

/// A single classification rule
#[derive(Debug, Clone)]
pub struct Rule {
    pub category: Category,
    pub matcher: Matcher,
    pub color: Color,
}

impl Rule {
    /// Create an exact-set rule
    ///
    /// Entries are trimmed and empty entries are skipped, so a stray
    /// separator in configuration never produces a rule matching "".
    pub fn exact<I, S>(category: Category, words: I, color: Color) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let set = words
            .into_iter()
            .map(|w| w.as_ref().trim().to_string())
            .filter(|w| !w.is_empty())
            .collect();
        Self {
            category,
            matcher: Matcher::ExactSet(set),
            color,
        }
    }

    /// Compile a pattern rule
    ///
    /// `language` is only used to label errors.
    pub fn pattern(
        language: &str,
        category: Category,
        pattern: &str,
        multiline: bool,
        color: Color,
    ) -> Result<Self> {
        if pattern.len() > MAX_PATTERN_LEN {
            return Err(EditorError::PatternTooComplex {
                language: language.to_string(),
                category: category.name().to_string(),
                len: pattern.len(),
            });
        }

        let regex = RegexBuilder::new(&format!("^(?:{})", pattern))
            .dot_matches_new_line(multiline)
            .size_limit(PATTERN_SIZE_LIMIT)
            .dfa_size_limit(PATTERN_SIZE_LIMIT)
            .build()
            .map_err(|e| match e {
                regex::Error::CompiledTooBig(_) => EditorError::PatternTooComplex {
                    language: language.to_string(),
                    category: category.name().to_string(),
                    len: pattern.len(),
                },
                other => EditorError::InvalidPattern {
                    language: language.to_string(),
                    category: category.name().to_string(),
                    reason: other.to_string(),
                },
            })?;

        Ok(Self {
            category,
            matcher: Matcher::Pattern { regex, multiline },
            color,
        })
    }

    /// Whether this is a pattern rule
    pub fn is_pattern(&self) -> bool {
        matches!(self.matcher, Matcher::Pattern { .. })
    }

    /// Whether this pattern rule may match across line breaks
    pub fn is_multiline(&self) -> bool {
        matches!(self.matcher, Matcher::Pattern { multiline: true, .. })
    }

    /// Check a whole lexeme against an exact-set rule
    pub fn matches_lexeme(&self, lexeme: &str) -> bool {
        match &self.matcher {
            Matcher::ExactSet(set) => set.contains(lexeme),
            Matcher::Pattern { .. } => false,
        }
    }

    /// Try a pattern rule at `pos`, returning the end of a non-empty match
    ///
    /// `line_end` is the offset of the next newline (or the end of text);
    /// single-line patterns never see text past it.
    pub fn match_at(&self, text: &str, pos: usize, line_end: usize) -> Option<usize> {
        let Matcher::Pattern { regex, multiline } = &self.matcher else {
            return None;
        };
        let limit = if *multiline { text.len() } else { line_end };
        if pos >= limit {
            return None;
        }
        regex
            .find(&text[pos..limit])
            .filter(|m| m.end() > 0)
            .map(|m| pos + m.end())
    }

    /// Number of entries in an exact-set rule
    pub fn word_count(&self) -> usize {
        match &self.matcher {
            Matcher::ExactSet(set) => set.len(),
            Matcher::Pattern { .. } => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ORANGE: Color = Color::from_hex(0xf0a400);

    #[test]
    fn test_exact_rule() {
        let rule = Rule::exact(Category::Keyword, ["func", "if"], ORANGE);
        assert!(rule.matches_lexeme("func"));
        assert!(!rule.matches_lexeme("fun"));
        assert!(!rule.matches_lexeme("Func"));
        assert!(!rule.is_pattern());
    }

    #[test]
    fn test_exact_rule_skips_empty_entries() {
        let rule = Rule::exact(Category::Keyword, ["const", "", "  ", " typedef "], ORANGE);
        assert_eq!(rule.word_count(), 2);
        assert!(!rule.matches_lexeme(""));
        assert!(rule.matches_lexeme("typedef"));
    }

    #[test]
    fn test_pattern_anchored_at_cursor() {
        let rule = Rule::pattern("go", Category::Comment, r"[\/]+.*", false, ORANGE).unwrap();
        let text = "x := 1 // note";
        assert_eq!(rule.match_at(text, 0, text.len()), None);
        assert_eq!(rule.match_at(text, 7, text.len()), Some(text.len()));
    }

    #[test]
    fn test_single_line_pattern_stops_at_newline() {
        let rule = Rule::pattern("go", Category::Comment, r"//.*", false, ORANGE).unwrap();
        let text = "// one\nnext";
        assert_eq!(rule.match_at(text, 0, 6), Some(6));
    }

    #[test]
    fn test_multiline_pattern_crosses_newline() {
        let rule = Rule::pattern("c", Category::Comment, r"/\*.*?\*/", true, ORANGE).unwrap();
        let text = "/* a\nb */ int";
        assert_eq!(rule.match_at(text, 0, 4), Some(9));

        let single = Rule::pattern("c", Category::Comment, r"/\*.*?\*/", false, ORANGE).unwrap();
        assert_eq!(single.match_at(text, 0, 4), None);
    }

    #[test]
    fn test_empty_match_ignored() {
        let rule = Rule::pattern("go", Category::Comment, r"a*", false, ORANGE).unwrap();
        assert_eq!(rule.match_at("bbb", 0, 3), None);
        assert_eq!(rule.match_at("aab", 0, 3), Some(2));
    }

    #[test]
    fn test_invalid_pattern() {
        let err = Rule::pattern("go", Category::Comment, r"([unclosed", false, ORANGE).unwrap_err();
        assert!(matches!(err, EditorError::InvalidPattern { .. }));
    }

    #[test]
    fn test_overlong_pattern_rejected() {
        let pattern = "a".repeat(MAX_PATTERN_LEN + 1);
        let err = Rule::pattern("go", Category::Comment, &pattern, false, ORANGE).unwrap_err();
        assert!(matches!(err, EditorError::PatternTooComplex { .. }));
    }

    #[test]
    fn test_huge_program_rejected() {
        let err = Rule::pattern("go", Category::Comment, r"(?:\w{100}){100}", false, ORANGE).unwrap_err();
        assert!(matches!(err, EditorError::PatternTooComplex { .. }));
    }
}
