//! Command dispatch system
//!
//! Commands are bound to chords from the `[commands]` configuration section.
//! Lookup normalizes the incoming key, so a binding written as "S+Super"
//! answers to the same press as one written "super+s".

use std::collections::HashMap;
use std::fmt;

use log::{debug, warn};

use crate::config::Config;
use crate::error::{EditorError, Result};
use crate::input::{Chord, KeyPress};

/// An action a shortcut can trigger
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Action {
    /// Persist the focused buffer
    Save,
    /// Close the focused buffer
    CloseBuffer,
    /// Delete the caret's line
    DeleteLine,
    /// A command the editor has no built-in behaviour for
    Named(String),
}

impl Action {
    /// Map a configured command name to an action
    pub fn from_name(name: &str) -> Action {
        match name {
            "save" => Action::Save,
            "close_buffer" => Action::CloseBuffer,
            "delete_line" => Action::DeleteLine,
            other => Action::Named(other.to_string()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Action::Save => "save",
            Action::CloseBuffer => "close_buffer",
            Action::DeleteLine => "delete_line",
            Action::Named(name) => name,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Chord to action table
#[derive(Debug, Default)]
pub struct CommandRegistry {
    bindings: HashMap<Chord, Action>,
}

impl CommandRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            bindings: HashMap::new(),
        }
    }

    /// Build the registry from the `[commands]` section
    ///
    /// Shortcuts that fail to parse are skipped and returned as warnings.
    pub fn from_config(config: &Config) -> (Self, Vec<EditorError>) {
        let mut registry = Self::new();
        let mut warnings = Vec::new();

        for command in &config.commands {
            if let Err(err) = registry.register(&command.shortcut, Action::from_name(&command.name)) {
                warn!("skipping command {}: {}", command.name, err);
                warnings.push(err);
            }
        }

        (registry, warnings)
    }

    /// Bind a shortcut string to an action
    ///
    /// Re-registering a chord replaces the previous action.
    pub fn register(&mut self, shortcut: &str, action: Action) -> Result<()> {
        let chord: Chord = shortcut.parse()?;
        if let Some(previous) = self.bindings.insert(chord, action.clone()) {
            if previous != action {
                debug!("{} rebound from {} to {}", chord, previous, action);
            }
        }
        Ok(())
    }

    /// Look up the action for a key press
    pub fn resolve(&self, key: &KeyPress) -> Option<&Action> {
        self.bindings.get(&key.chord())
    }

    /// All bindings as (canonical shortcut, action), sorted by action name
    pub fn bindings(&self) -> Vec<(String, &Action)> {
        let mut bindings: Vec<_> = self
            .bindings
            .iter()
            .map(|(chord, action)| (chord.to_string(), action))
            .collect();
        bindings.sort_by(|a, b| a.1.name().cmp(b.1.name()).then_with(|| a.0.cmp(&b.0)));
        bindings
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}
