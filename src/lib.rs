//! phi - a configuration-driven editor core
//!
//! Syntax rules, file associations, theme and shortcuts all come from one
//! TOML file. The editor is a tree of components driven by a single-threaded
//! main loop that only redraws when something changed.

pub mod app;
pub mod buffer;
pub mod caret;
pub mod command;
pub mod component;
pub mod config;
pub mod editor;
pub mod error;
pub mod input;
pub mod line;
pub mod main_loop;
pub mod syntax;
pub mod terminal;
pub mod view;
pub mod window;

pub use app::{App, Panel};
pub use command::{Action, CommandRegistry};
pub use component::{Component, Font, Lifecycle, Rect, RenderContext};
pub use config::Config;
pub use error::{EditorError, Result};
pub use input::{Chord, Key, KeyPress, Modifiers};
pub use main_loop::{EventSource, FrameCounter, MainLoop, WindowEvent};
