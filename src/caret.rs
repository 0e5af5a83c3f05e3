//! Caret blinking

use std::time::{Duration, Instant};

use crate::config::CursorSettings;

/// Caret visibility over time
///
/// The caret blinks every `flash_rate` ms, and stays solid for `reset_delay`
/// ms after any input.
#[derive(Debug)]
pub struct Caret {
    flash_rate: Duration,
    reset_delay: Duration,
    flash: bool,
    draw: bool,
    visible: bool,
    last_toggle: Instant,
    last_input: Instant,
}

impl Caret {
    pub fn new(settings: &CursorSettings, now: Instant) -> Self {
        Self {
            flash_rate: Duration::from_millis(settings.flash_rate),
            reset_delay: Duration::from_millis(settings.reset_delay),
            flash: settings.flash,
            draw: settings.draw,
            visible: true,
            last_toggle: now,
            last_input: now,
        }
    }

    /// Whether the caret should be drawn right now
    pub fn is_visible(&self) -> bool {
        self.draw && self.visible
    }

    /// Advance the blink; true when visibility changed
    pub fn tick(&mut self, now: Instant) -> bool {
        if !self.draw || !self.flash || self.flash_rate.is_zero() {
            return false;
        }
        if now.duration_since(self.last_input) < self.reset_delay {
            return false;
        }
        if now.duration_since(self.last_toggle) < self.flash_rate {
            return false;
        }
        self.visible = !self.visible;
        self.last_toggle = now;
        true
    }

    /// Show the caret solid after input; true when visibility changed
    pub fn reset(&mut self, now: Instant) -> bool {
        let changed = !self.visible;
        self.visible = true;
        self.last_input = now;
        self.last_toggle = now;
        changed
    }
}
