//! Language definitions for syntax highlighting
//!
//! A LanguageSpec is the compiled form of one `[syntax.<lang>]` block plus its
//! `[file_associations.<lang>]` extensions. It is built once at configuration
//! load and never mutated afterwards.

use log::warn;

use super::rules::Rule;
use super::style::Color;
use super::tokens::Category;
use crate::config::{RuleConfig, RuleMatch};
use crate::error::{EditorError, Result};

/// A complete language definition for syntax highlighting
#[derive(Debug, Clone)]
pub struct LanguageSpec {
    /// Language name (e.g. "go", "c")
    pub name: String,
    /// Normalized file extensions, without the leading dot
    pub extensions: Vec<String>,
    /// Classification rules in precedence order
    pub rules: Vec<Rule>,
}

impl LanguageSpec {
    /// Create a new empty language definition
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            extensions: Vec::new(),
            rules: Vec::new(),
        }
    }

    /// The fallback spec: no rules, every lexeme is plain
    pub fn plain_text() -> Self {
        Self::new("text")
    }

    /// Add a file extension
    pub fn add_extension(&mut self, ext: &str) {
        let ext = normalize_extension(ext);
        if !ext.is_empty() && !self.extensions.contains(&ext) {
            self.extensions.push(ext);
        }
    }

    /// Append a rule; earlier rules win over later ones
    pub fn add_rule(&mut self, rule: Rule) {
        self.rules.push(rule);
    }

    /// Compile a language from its configured rules
    ///
    /// Broken rules are dropped and returned as warnings; the rest of the
    /// language still loads.
    pub fn compile(name: &str, extensions: &[String], rules: &[RuleConfig]) -> (Self, Vec<EditorError>) {
        let mut spec = Self::new(name);
        let mut warnings = Vec::new();

        for ext in extensions {
            spec.add_extension(ext);
        }

        for rule in rules {
            match compile_rule(name, rule) {
                Ok(compiled) => spec.add_rule(compiled),
                Err(err) => {
                    warn!("dropping syntax rule: {}", err);
                    warnings.push(err);
                }
            }
        }

        (spec, warnings)
    }

    /// Pattern rules, in precedence order
    pub fn pattern_rules(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter().filter(|r| r.is_pattern())
    }

    /// Classify a lexeme against the exact-set rules
    ///
    /// Returns the first matching rule's category and colour, or plain.
    pub fn classify(&self, lexeme: &str) -> (Category, Option<Color>) {
        self.rules
            .iter()
            .find(|r| r.matches_lexeme(lexeme))
            .map(|r| (r.category, Some(r.color)))
            .unwrap_or((Category::Plain, None))
    }

    /// Classify a single delimiter against the symbol rules only
    pub fn classify_symbol(&self, delimiter: &str) -> (Category, Option<Color>) {
        self.rules
            .iter()
            .filter(|r| r.category == Category::Symbol)
            .find(|r| r.matches_lexeme(delimiter))
            .map(|r| (r.category, Some(r.color)))
            .unwrap_or((Category::Plain, None))
    }

    /// Whether any pattern rule may match across line breaks
    pub fn has_multiline_rules(&self) -> bool {
        self.rules.iter().any(|r| r.is_multiline())
    }

    /// Whether any rules are defined
    pub fn is_plain(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Lowercase an extension and strip any leading dot
pub fn normalize_extension(ext: &str) -> String {
    ext.trim().trim_start_matches('.').to_lowercase()
}

fn compile_rule(language: &str, rule: &RuleConfig) -> Result<Rule> {
    let category = Category::from_name(&rule.category).ok_or_else(|| EditorError::UnknownCategory {
        language: language.to_string(),
        category: rule.category.clone(),
    })?;

    let color = match rule.colouring {
        Some(hex) => Color::from_hex(hex),
        None => category.default_color().unwrap_or_default(),
    };

    match &rule.matcher {
        RuleMatch::Words(words) => Ok(Rule::exact(category, words, color)),
        RuleMatch::Pattern { source, multiline } => {
            Rule::pattern(language, category, source, *multiline, color)
        }
        RuleMatch::Invalid(reason) => Err(EditorError::InvalidRule {
            language: language.to_string(),
            category: rule.category.clone(),
            reason: reason.clone(),
        }),
    }
}
