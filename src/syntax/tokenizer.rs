//! Lexical scanner
//!
//! Scanning is a single left-to-right pass over the text. At each offset the
//! pattern rules get the first chance; failing that the scanner takes a word,
//! a whitespace run or a single delimiter. Words are classified against the
//! exact-set rules, delimiters against the symbol rules only.

use super::language::LanguageSpec;
use super::tokens::Token;

/// Lazy token stream over a text slice
///
/// Holds no state beyond the cursor, so scanning the same text twice yields
/// the same tokens.
pub struct Tokenizer<'a> {
    spec: &'a LanguageSpec,
    text: &'a str,
    pos: usize,
}

/// Scan `text` with the rules of `spec`
pub fn scan<'a>(text: &'a str, spec: &'a LanguageSpec) -> Tokenizer<'a> {
    Tokenizer { spec, text, pos: 0 }
}

impl<'a> Tokenizer<'a> {
    fn next_pattern(&self, line_end: usize) -> Option<Token> {
        self.spec.pattern_rules().find_map(|rule| {
            rule.match_at(self.text, self.pos, line_end)
                .map(|end| Token::new(self.pos..end, rule.category, Some(rule.color)))
        })
    }

    fn next_lexeme(&self, first: char) -> Token {
        let rest = &self.text[self.pos..];

        if is_word_char(first) {
            let len = rest.find(|c: char| !is_word_char(c)).unwrap_or(rest.len());
            let span = self.pos..self.pos + len;
            let (category, color) = self.spec.classify(&self.text[span.clone()]);
            return Token::new(span, category, color);
        }

        if first.is_whitespace() {
            let len = rest.find(|c: char| !c.is_whitespace()).unwrap_or(rest.len());
            return Token::plain(self.pos..self.pos + len);
        }

        let span = self.pos..self.pos + first.len_utf8();
        let (category, color) = self.spec.classify_symbol(&self.text[span.clone()]);
        Token::new(span, category, color)
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        let rest = self.text.get(self.pos..)?;
        let first = rest.chars().next()?;
        let line_end = rest.find('\n').map_or(self.text.len(), |i| self.pos + i);

        let token = self
            .next_pattern(line_end)
            .unwrap_or_else(|| self.next_lexeme(first));
        self.pos = token.span.end;
        Some(token)
    }
}

/// Characters that make up words; everything else delimits
pub fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}
