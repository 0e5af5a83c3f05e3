//! Error types for phi

use thiserror::Error;

/// Result type alias for phi operations
pub type Result<T> = std::result::Result<T, EditorError>;

/// Editor error types
#[derive(Error, Debug)]
pub enum EditorError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed configuration: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid [{section}] section: {reason}")]
    ConfigSection { section: String, reason: String },

    #[error("Invalid pattern for {language}.{category}: {reason}")]
    InvalidPattern {
        language: String,
        category: String,
        reason: String,
    },

    #[error("Pattern for {language}.{category} is too complex ({len} bytes)")]
    PatternTooComplex {
        language: String,
        category: String,
        len: usize,
    },

    #[error("Unknown syntax category {language}.{category}")]
    UnknownCategory { language: String, category: String },

    #[error("Invalid rule {language}.{category}: {reason}")]
    InvalidRule {
        language: String,
        category: String,
        reason: String,
    },

    #[error("Extension {extension} claimed by both {previous} and {language}")]
    DuplicateExtension {
        extension: String,
        previous: String,
        language: String,
    },

    #[error("Invalid shortcut {shortcut:?}: {reason}")]
    InvalidShortcut { shortcut: String, reason: String },

    #[error("Rendering context unavailable: {0}")]
    RenderContext(String),

    #[error("{0}")]
    Message(String),
}
