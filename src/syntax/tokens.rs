//! Token categories and classified tokens
//!
//! The category set is fixed; which lexemes fall into each category is
//! entirely up to the language configuration.

use std::ops::Range;

use super::style::Color;

/// Lexical category assigned to a lexeme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// Language keywords (func, if, for, ...)
    Keyword,
    /// Type names (int, string, ...)
    Type,
    /// Comments, usually pattern-matched
    Comment,
    /// Operators and punctuation
    Symbol,
    /// Anything no rule claimed
    Plain,
}

impl Category {
    /// Colour used when a rule omits `colouring`
    pub fn default_color(&self) -> Option<Color> {
        match self {
            Category::Keyword => Some(Color::from_hex(0xf0a400)),
            Category::Type => Some(Color::from_hex(0xf8f273)),
            Category::Comment => Some(Color::from_hex(0x4b79fc)),
            Category::Symbol => Some(Color::from_hex(0xf0a400)),
            Category::Plain => None,
        }
    }

    /// Configuration name of this category
    pub fn name(&self) -> &'static str {
        match self {
            Category::Keyword => "keyword",
            Category::Type => "type",
            Category::Comment => "comment",
            Category::Symbol => "symbol",
            Category::Plain => "plain",
        }
    }

    /// Parse a category from its configuration section name
    ///
    /// `plain` is not accepted: plain text is what is left when no rule matches.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "keyword" | "keywords" => Some(Category::Keyword),
            "type" | "types" => Some(Category::Type),
            "comment" | "comments" => Some(Category::Comment),
            "symbol" | "symbols" => Some(Category::Symbol),
            _ => None,
        }
    }
}

/// A classified lexeme
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Byte range within the scanned text (half-open)
    pub span: Range<usize>,
    /// Category of the rule that matched, or `Plain`
    pub category: Category,
    /// Rule colour; `None` means the theme foreground
    pub color: Option<Color>,
}

impl Token {
    /// Create a new token
    pub fn new(span: Range<usize>, category: Category, color: Option<Color>) -> Self {
        Self {
            span,
            category,
            color,
        }
    }

    /// Create an uncoloured plain token
    pub fn plain(span: Range<usize>) -> Self {
        Self::new(span, Category::Plain, None)
    }

    /// The slice of `text` this token covers
    pub fn text<'a>(&self, text: &'a str) -> &'a str {
        &text[self.span.clone()]
    }

    /// Length in bytes
    pub fn len(&self) -> usize {
        self.span.len()
    }

    pub fn is_empty(&self) -> bool {
        self.span.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name() {
        assert_eq!(Category::from_name("keyword"), Some(Category::Keyword));
        assert_eq!(Category::from_name("Type"), Some(Category::Type));
        assert_eq!(Category::from_name(" comment "), Some(Category::Comment));
        assert_eq!(Category::from_name("symbols"), Some(Category::Symbol));
        assert_eq!(Category::from_name("plain"), None);
        assert_eq!(Category::from_name("string"), None);
        assert_eq!(Category::from_name(""), None);
    }

    #[test]
    fn test_name_roundtrip() {
        for category in [Category::Keyword, Category::Type, Category::Comment, Category::Symbol] {
            assert_eq!(Category::from_name(category.name()), Some(category));
        }
    }

    #[test]
    fn test_plain_has_no_default_color() {
        assert!(Category::Plain.default_color().is_none());
        assert!(Category::Keyword.default_color().is_some());
    }

    #[test]
    fn test_token_text() {
        let token = Token::plain(5..9);
        assert_eq!(token.text("func main()"), "main");
        assert_eq!(token.len(), 4);
        assert!(!token.is_empty());
    }
}
