//! Syntax classification
//!
//! This module turns per-language configuration into classified tokens:
//! - `LanguageSpec`: compiled, immutable rules of one language
//! - `scan`: the tokenizer
//! - `HighlightCache`: per-buffer, revision-tagged token cache
//! - `line_states`: where multi-line tokens cover each line
//! - `LanguageRegistry`: extension to language resolution

mod cache;
mod language;
mod multiline;
mod registry;
mod rules;
mod style;
mod tokenizer;
mod tokens;

pub use cache::{HighlightCache, RegionId};
pub use language::{normalize_extension, LanguageSpec};
pub use multiline::{line_states, scan_line, LineState, Piece};
pub use registry::LanguageRegistry;
pub use rules::{Matcher, Rule, MAX_PATTERN_LEN};
pub use style::{Color, Style};
pub use tokenizer::{is_word_char, scan, Tokenizer};
pub use tokens::{Category, Token};
