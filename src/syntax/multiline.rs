//! Tokens that run across line breaks
//!
//! The editor highlights one line at a time. When a language has multiline
//! pattern rules, the joined text is scanned once per edit and every token
//! that crosses a line break is cut into per-line pieces. A line's pieces are
//! part of its cache key, so the line is rescanned when a block opens or
//! closes around it even though its own text did not change.

use super::language::LanguageSpec;
use super::style::Color;
use super::tokenizer::scan;
use super::tokens::{Category, Token};

/// Classification of a multi-line token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    pub category: Category,
    pub color: Option<Color>,
}

/// How multi-line tokens cover one line
///
/// The default state means no multi-line token touches the line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LineState {
    /// A token from an earlier line covers bytes `0..end`
    pub head: Option<(usize, Piece)>,
    /// A token covers bytes `start..` and continues on the next line
    pub tail: Option<(usize, Piece)>,
}

/// Per-line states for `lines`, scanned as one newline-joined text
///
/// Languages without multiline rules skip the scan and get default states.
pub fn line_states<'a, I>(lines: I, spec: &LanguageSpec) -> Vec<LineState>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut text = String::new();
    let mut starts = Vec::new();
    for line in lines {
        if !starts.is_empty() {
            text.push('\n');
        }
        starts.push(text.len());
        text.push_str(line);
    }

    let mut states = vec![LineState::default(); starts.len()];
    if !spec.has_multiline_rules() {
        return states;
    }

    let line_of = |pos: usize| starts.partition_point(|&s| s <= pos) - 1;
    let line_len = |idx: usize| match starts.get(idx + 1) {
        Some(next) => next - 1 - starts[idx],
        None => text.len() - starts[idx],
    };

    for token in scan(&text, spec) {
        if token.category == Category::Plain || !token.text(&text).contains('\n') {
            continue;
        }
        let piece = Piece {
            category: token.category,
            color: token.color,
        };
        let first = line_of(token.span.start);
        let last = line_of(token.span.end - 1);

        states[first].tail = Some((token.span.start - starts[first], piece));
        for idx in first + 1..=last {
            let end = (token.span.end - starts[idx]).min(line_len(idx));
            states[idx].head = Some((end, piece));
        }
    }

    states
}

/// Scan one line, taking the pieces in `state` as already classified
pub fn scan_line(text: &str, spec: &LanguageSpec, state: &LineState) -> Vec<Token> {
    let mut tokens = Vec::new();

    let mut start = 0;
    if let Some((end, piece)) = state.head {
        start = end.min(text.len());
        if start > 0 {
            tokens.push(Token::new(0..start, piece.category, piece.color));
        }
    }

    let stop = state
        .tail
        .map_or(text.len(), |(begin, _)| begin.clamp(start, text.len()));
    tokens.extend(scan(&text[start..stop], spec).map(|t| {
        Token::new(t.span.start + start..t.span.end + start, t.category, t.color)
    }));

    if let Some((_, piece)) = state.tail {
        if stop < text.len() {
            tokens.push(Token::new(stop..text.len(), piece.category, piece.color));
        }
    }

    tokens
}
