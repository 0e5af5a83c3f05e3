//! Configuration file support
//!
//! Loads settings from ~/.phi-editor/config.toml (or
//! %USERPROFILE%\.phi-editor\config.toml on Windows). A missing file is
//! created from the built-in default.
//!
//! Example:
//! ```text
//! [file_associations.go]
//! extensions = [".go"]
//!
//! [syntax.go.keyword]
//! colouring = 0xf0a400
//! match = ["func", "package"]
//!
//! [syntax.go.comment]
//! colouring = 0x4b79fc
//! pattern = "//.*"
//!
//! [commands.save]
//! shortcut = "super+s"
//! ```
//!
//! Every problem short of an unreadable document is recovered from: the
//! offending section or entry falls back to its default and a warning is
//! recorded.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{info, warn};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::{EditorError, Result};
use crate::syntax::Color;

/// Built-in configuration, written out when no config file exists
pub const DEFAULT_CONFIG: &str = include_str!("../config/default.toml");

/// `[editor]` settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EditorSettings {
    pub tab_size: usize,
    pub hungry_backspace: bool,
    pub tabs_are_spaces: bool,
    pub match_braces: bool,
    pub maintain_indentation: bool,
    pub highlight_line: bool,
    pub font_face: String,
    pub font_size: u32,
    pub show_line_numbers: bool,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            tab_size: 4,
            hungry_backspace: true,
            tabs_are_spaces: true,
            match_braces: false,
            maintain_indentation: true,
            highlight_line: true,
            font_face: "Courier New Bold".to_string(),
            font_size: 20,
            show_line_numbers: true,
        }
    }
}

/// `[render]` settings
///
/// `aliased` and `accelerated` only mean something to GPU backends.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    pub aliased: bool,
    pub accelerated: bool,
    pub throttle_cpu_usage: bool,
    pub always_render: bool,
    pub print_fps: bool,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            aliased: true,
            accelerated: true,
            throttle_cpu_usage: true,
            always_render: false,
            print_fps: false,
        }
    }
}

/// `[theme]` colours
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Theme {
    pub background: Color,
    pub foreground: Color,
    pub cursor: Color,
    pub cursor_invert: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            background: Color::from_hex(0x002649),
            foreground: Color::from_hex(0xf2f4f6),
            cursor: Color::from_hex(0xf2f4f6),
            cursor_invert: Color::from_hex(0x000000),
        }
    }
}

/// `[cursor]` settings, times in milliseconds
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CursorSettings {
    pub flash_rate: u64,
    pub reset_delay: u64,
    pub draw: bool,
    pub flash: bool,
}

impl Default for CursorSettings {
    fn default() -> Self {
        Self {
            flash_rate: 400,
            reset_delay: 400,
            draw: true,
            flash: true,
        }
    }
}

/// One `[file_associations.<lang>]` block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileAssociation {
    pub language: String,
    pub extensions: Vec<String>,
}

/// How a configured rule matches
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleMatch {
    /// `match = [...]`
    Words(Vec<String>),
    /// `pattern = "..."`, optionally `multiline = true`
    Pattern { source: String, multiline: bool },
    /// Neither or both were given; the reason is reported when compiling
    Invalid(String),
}

/// One `[syntax.<lang>.<category>]` block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleConfig {
    pub category: String,
    pub colouring: Option<u32>,
    pub matcher: RuleMatch,
}

/// All rule blocks of one `[syntax.<lang>]`, in declaration order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxConfig {
    pub language: String,
    pub rules: Vec<RuleConfig>,
}

/// One `[commands.<name>]` block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandConfig {
    pub name: String,
    pub shortcut: String,
}

#[derive(Deserialize)]
struct RawAssociation {
    #[serde(default)]
    extensions: Vec<String>,
}

#[derive(Deserialize)]
struct RawRule {
    colouring: Option<u32>,
    #[serde(rename = "match")]
    words: Option<Vec<String>>,
    pattern: Option<String>,
    #[serde(default)]
    multiline: bool,
}

#[derive(Deserialize)]
struct RawCommand {
    shortcut: String,
}

/// Loaded configuration, read-only after load
#[derive(Debug, Default)]
pub struct Config {
    pub editor: EditorSettings,
    pub render: RenderSettings,
    pub theme: Theme,
    pub cursor: CursorSettings,
    pub file_associations: Vec<FileAssociation>,
    pub syntax: Vec<SyntaxConfig>,
    pub commands: Vec<CommandConfig>,
    /// Problems recovered from while loading
    warnings: Vec<EditorError>,
}

impl Config {
    /// Get the default config file path
    pub fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join("config.toml"))
    }

    /// Directory holding the config file and the log
    pub fn config_dir() -> Option<PathBuf> {
        #[cfg(windows)]
        {
            std::env::var("USERPROFILE")
                .ok()
                .map(|home| PathBuf::from(home).join(".phi-editor"))
        }

        #[cfg(not(windows))]
        {
            std::env::var("HOME")
                .ok()
                .map(|home| PathBuf::from(home).join(".phi-editor"))
        }
    }

    /// The built-in configuration
    pub fn builtin() -> Self {
        match Self::parse(DEFAULT_CONFIG) {
            Ok(config) => config,
            Err(err) => {
                warn!("built-in configuration is malformed: {}", err);
                let mut config = Self::default();
                config.warnings.push(err);
                config
            }
        }
    }

    /// Load configuration from `path`
    ///
    /// Never fails: a missing file is created from the built-in default, and
    /// an unreadable or malformed one is replaced by the built-in default
    /// with a warning.
    pub fn load(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => match Self::parse(&contents) {
                Ok(config) => {
                    info!("loaded configuration from {}", path.display());
                    config
                }
                Err(err) => {
                    warn!("{}: {}; using built-in configuration", path.display(), err);
                    let mut config = Self::builtin();
                    config.warnings.push(err);
                    config
                }
            },
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                if let Err(err) = Self::write_default(path) {
                    warn!("could not write default configuration to {}: {}", path.display(), err);
                } else {
                    info!("wrote default configuration to {}", path.display());
                }
                Self::builtin()
            }
            Err(err) => {
                warn!("could not read {}: {}; using built-in configuration", path.display(), err);
                let mut config = Self::builtin();
                config.warnings.push(err.into());
                config
            }
        }
    }

    /// Write the built-in configuration to `path`, creating parent directories
    pub fn write_default(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, DEFAULT_CONFIG)?;
        Ok(())
    }

    /// Parse a configuration document
    ///
    /// Only a document that is not valid TOML is an error; problems inside
    /// sections become warnings.
    pub fn parse(contents: &str) -> Result<Self> {
        let table: toml::Table = toml::from_str(contents)?;
        Ok(Self::from_table(&table))
    }

    /// Build configuration from an already-parsed document
    pub fn from_table(table: &toml::Table) -> Self {
        let mut warnings = Vec::new();

        let editor = section(table, "editor", &mut warnings);
        let render = section(table, "render", &mut warnings);
        let theme = section(table, "theme", &mut warnings);
        let cursor = section(table, "cursor", &mut warnings);

        let file_associations = named_blocks(table, "file_associations", &mut warnings)
            .into_iter()
            .filter_map(|(language, value)| {
                match value.try_into::<RawAssociation>() {
                    Ok(raw) => Some(FileAssociation {
                        language,
                        extensions: raw.extensions,
                    }),
                    Err(err) => {
                        push_warning(
                            &mut warnings,
                            EditorError::ConfigSection {
                                section: format!("file_associations.{}", language),
                                reason: err.to_string(),
                            },
                        );
                        None
                    }
                }
            })
            .collect();

        let syntax = named_blocks(table, "syntax", &mut warnings)
            .into_iter()
            .map(|(language, value)| parse_syntax(language, value, &mut warnings))
            .collect();

        let commands = named_blocks(table, "commands", &mut warnings)
            .into_iter()
            .filter_map(|(name, value)| match value.try_into::<RawCommand>() {
                Ok(raw) => Some(CommandConfig {
                    name,
                    shortcut: raw.shortcut,
                }),
                Err(err) => {
                    push_warning(
                        &mut warnings,
                        EditorError::ConfigSection {
                            section: format!("commands.{}", name),
                            reason: err.to_string(),
                        },
                    );
                    None
                }
            })
            .collect();

        Self {
            editor,
            render,
            theme,
            cursor,
            file_associations,
            syntax,
            commands,
            warnings,
        }
    }

    /// Problems recovered from while loading
    pub fn warnings(&self) -> &[EditorError] {
        &self.warnings
    }

    /// Rules configured for `language`, if any
    pub fn syntax_for(&self, language: &str) -> Option<&SyntaxConfig> {
        self.syntax.iter().find(|s| s.language == language)
    }
}

fn push_warning(warnings: &mut Vec<EditorError>, err: EditorError) {
    warn!("{}", err);
    warnings.push(err);
}

/// Deserialize a typed section, falling back to its defaults
fn section<T>(table: &toml::Table, name: &str, warnings: &mut Vec<EditorError>) -> T
where
    T: DeserializeOwned + Default,
{
    let Some(value) = table.get(name) else {
        return T::default();
    };
    match value.clone().try_into::<T>() {
        Ok(parsed) => parsed,
        Err(err) => {
            push_warning(
                warnings,
                EditorError::ConfigSection {
                    section: name.to_string(),
                    reason: err.to_string(),
                },
            );
            T::default()
        }
    }
}

/// The sub-tables of a section, in declaration order
fn named_blocks(
    table: &toml::Table,
    name: &str,
    warnings: &mut Vec<EditorError>,
) -> Vec<(String, toml::Value)> {
    match table.get(name) {
        None => Vec::new(),
        Some(toml::Value::Table(blocks)) => blocks
            .iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect(),
        Some(other) => {
            push_warning(
                warnings,
                EditorError::ConfigSection {
                    section: name.to_string(),
                    reason: format!("expected a table, found {}", other.type_str()),
                },
            );
            Vec::new()
        }
    }
}

fn parse_syntax(language: String, value: toml::Value, warnings: &mut Vec<EditorError>) -> SyntaxConfig {
    let toml::Value::Table(blocks) = value else {
        push_warning(
            warnings,
            EditorError::ConfigSection {
                section: format!("syntax.{}", language),
                reason: "expected a table of rule blocks".to_string(),
            },
        );
        return SyntaxConfig {
            language,
            rules: Vec::new(),
        };
    };

    let mut rules = Vec::new();
    for (category, block) in blocks {
        match block.try_into::<RawRule>() {
            Ok(raw) => rules.push(RuleConfig {
                category,
                colouring: raw.colouring,
                matcher: match (raw.words, raw.pattern) {
                    (Some(words), None) => RuleMatch::Words(words),
                    (None, Some(source)) => RuleMatch::Pattern {
                        source,
                        multiline: raw.multiline,
                    },
                    (Some(_), Some(_)) => {
                        RuleMatch::Invalid("has both `match` and `pattern`".to_string())
                    }
                    (None, None) => RuleMatch::Invalid("needs either `match` or `pattern`".to_string()),
                },
            }),
            Err(err) => push_warning(
                warnings,
                EditorError::InvalidRule {
                    language: language.clone(),
                    category,
                    reason: err.to_string(),
                },
            ),
        }
    }

    SyntaxConfig { language, rules }
}
