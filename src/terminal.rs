//! Terminal backend using crossterm
//!
//! `Terminal` is the rendering context and `TerminalEvents` the event source.
//! Ctrl+Q stands in for the window close button.

use std::io::{self, Stdout, Write};
use std::time::Duration;

use crossterm::{
    cursor,
    event::{
        self, Event, KeyboardEnhancementFlags, PopKeyboardEnhancementFlags,
        PushKeyboardEnhancementFlags,
    },
    execute, queue,
    style::{self, Attribute, Print, SetAttribute, SetBackgroundColor, SetForegroundColor},
    terminal::{self, ClearType},
};
use log::{debug, trace};
use unicode_width::UnicodeWidthChar;

use crate::component::{Font, Rect, RenderContext};
use crate::error::Result;
use crate::input::{translate_key, Key, KeyPress, Modifiers};
use crate::main_loop::{EventSource, WindowEvent};
use crate::syntax::{Color, Style};

/// Terminal wrapper for cross-platform terminal I/O
pub struct Terminal {
    out: Stdout,
    /// Terminal width in columns
    cols: u16,
    /// Terminal height in rows
    rows: u16,
    /// Colour the screen was last cleared to
    background: Color,
    /// Keyboard enhancement was pushed and must be popped
    enhanced_keys: bool,
}

impl Terminal {
    /// Create a new terminal instance and enter raw mode
    ///
    /// Raw mode is switched off again if the rest of the setup fails.
    pub fn new() -> Result<Self> {
        terminal::enable_raw_mode()?;
        or_cleanup(Self::enter(), || leave_screen(&mut io::stdout()))
    }

    fn enter() -> Result<Self> {
        let (cols, rows) = terminal::size()?;

        let mut out = io::stdout();
        execute!(out, terminal::EnterAlternateScreen, cursor::Hide)?;

        // Needed for the super modifier to be reported at all
        let enhanced_keys = terminal::supports_keyboard_enhancement().unwrap_or(false);
        if enhanced_keys {
            execute!(
                out,
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES)
            )?;
        }
        debug!("terminal {}x{}, keyboard enhancement {}", cols, rows, enhanced_keys);

        Ok(Self {
            out,
            cols,
            rows,
            background: Color::BLACK,
            enhanced_keys,
        })
    }

    fn set_style(&mut self, style: Style) -> Result<()> {
        let bg = style.bg.unwrap_or(self.background);
        queue!(
            self.out,
            SetForegroundColor(to_crossterm(style.fg)),
            SetBackgroundColor(to_crossterm(bg)),
            SetAttribute(if style.bold {
                Attribute::Bold
            } else {
                Attribute::NormalIntensity
            })
        )?;
        Ok(())
    }
}

impl RenderContext for Terminal {
    fn size(&self) -> (u16, u16) {
        (self.cols, self.rows)
    }

    fn clear(&mut self, color: Color) -> Result<()> {
        let (cols, rows) = terminal::size()?;
        self.cols = cols;
        self.rows = rows;
        self.background = color;
        queue!(
            self.out,
            SetBackgroundColor(to_crossterm(color)),
            terminal::Clear(ClearType::All)
        )?;
        Ok(())
    }

    fn set_font(&mut self, font: &Font) -> Result<()> {
        // The terminal owns its font
        trace!("ignoring font {} {}", font.face, font.size);
        Ok(())
    }

    fn draw_text(&mut self, col: u16, row: u16, text: &str, style: Style) -> Result<()> {
        if row >= self.rows || col >= self.cols {
            return Ok(());
        }
        let visible = truncate_to_width(text, (self.cols - col) as usize);
        if visible.is_empty() {
            return Ok(());
        }
        self.set_style(style)?;
        queue!(self.out, cursor::MoveTo(col, row), Print(visible))?;
        Ok(())
    }

    fn fill(&mut self, area: Rect, color: Color) -> Result<()> {
        if area.x >= self.cols {
            return Ok(());
        }
        let width = area.width.min(self.cols - area.x) as usize;
        let blank = " ".repeat(width);
        queue!(self.out, SetBackgroundColor(to_crossterm(color)))?;
        for row in area.y..area.y.saturating_add(area.height).min(self.rows) {
            queue!(self.out, cursor::MoveTo(area.x, row), Print(&blank))?;
        }
        Ok(())
    }

    fn display(&mut self) -> Result<()> {
        queue!(self.out, style::ResetColor, SetAttribute(Attribute::Reset))?;
        self.out.flush()?;
        Ok(())
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        if self.enhanced_keys {
            let _ = execute!(self.out, PopKeyboardEnhancementFlags);
        }
        leave_screen(&mut self.out);
    }
}

/// Restore terminal state
fn leave_screen(out: &mut Stdout) {
    let _ = execute!(
        out,
        style::ResetColor,
        cursor::Show,
        terminal::LeaveAlternateScreen
    );
    let _ = terminal::disable_raw_mode();
}

/// Run `cleanup` when `result` is an error, passing the result through
fn or_cleanup<T>(result: Result<T>, cleanup: impl FnOnce()) -> Result<T> {
    if result.is_err() {
        cleanup();
    }
    result
}

/// Keyboard and resize events from the terminal
#[derive(Debug, Default)]
pub struct TerminalEvents;

impl TerminalEvents {
    pub fn new() -> Self {
        Self
    }
}

impl EventSource for TerminalEvents {
    fn poll(&mut self, timeout: Duration) -> Result<Vec<WindowEvent>> {
        let mut events = Vec::new();
        if !event::poll(timeout)? {
            return Ok(events);
        }

        loop {
            match event::read()? {
                Event::Key(key_event) => {
                    if let Some(key) = translate_key(key_event) {
                        events.push(window_event(key));
                    }
                }
                Event::Resize(cols, rows) => events.push(WindowEvent::Resize(cols, rows)),
                _ => {
                    // Ignore other events (mouse, focus, paste)
                }
            }
            if !event::poll(Duration::ZERO)? {
                break;
            }
        }

        Ok(events)
    }
}

/// Map a key press to a window event; Ctrl+Q closes
fn window_event(key: KeyPress) -> WindowEvent {
    if key.modifiers == Modifiers::CTRL && key.key.normalized() == Key::Char('q') {
        WindowEvent::Close
    } else {
        WindowEvent::Key(key)
    }
}

fn to_crossterm(color: Color) -> style::Color {
    style::Color::Rgb {
        r: color.r,
        g: color.g,
        b: color.b,
    }
}

/// Truncate a string to fit within a display width
fn truncate_to_width(s: &str, max_width: usize) -> String {
    let mut result = String::new();
    let mut width = 0;

    for ch in s.chars() {
        let ch_width = ch.width().unwrap_or(1);
        if width + ch_width > max_width {
            break;
        }
        result.push(if ch.is_control() { ' ' } else { ch });
        width += ch_width;
    }

    result
}
