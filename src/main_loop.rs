//! Main loop - poll, dispatch, update, render
//!
//! One thread runs every phase in sequence. A frame is drawn only when the
//! root reports a change, unless `render.always_render` is set.

use std::time::{Duration, Instant};

use log::{debug, info, trace};

use crate::command::CommandRegistry;
use crate::component::{Component, Rect, RenderContext};
use crate::config::RenderSettings;
use crate::error::Result;
use crate::input::KeyPress;

/// How long a throttled poll waits for input
pub const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Events delivered by the windowing collaborator
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WindowEvent {
    Key(KeyPress),
    /// New surface size as (columns, rows)
    Resize(u16, u16),
    /// The user asked to close the window
    Close,
}

/// Source of window events
pub trait EventSource {
    /// Collect pending events, waiting at most `timeout` for the first one
    fn poll(&mut self, timeout: Duration) -> Result<Vec<WindowEvent>>;
}

/// One-second rolling frame counter
#[derive(Debug)]
pub struct FrameCounter {
    frames: u32,
    window_start: Instant,
}

impl FrameCounter {
    pub fn new(now: Instant) -> Self {
        Self {
            frames: 0,
            window_start: now,
        }
    }

    /// Count a frame; once a second has passed, return the count and restart
    pub fn tick(&mut self, now: Instant) -> Option<u32> {
        self.frames += 1;
        if now.duration_since(self.window_start) < Duration::from_secs(1) {
            return None;
        }
        let frames = self.frames;
        self.frames = 0;
        self.window_start = now;
        Some(frames)
    }
}

/// Drives a component tree until the window closes
pub struct MainLoop {
    commands: CommandRegistry,
    settings: RenderSettings,
}

impl MainLoop {
    pub fn new(commands: CommandRegistry, settings: RenderSettings) -> Self {
        Self { commands, settings }
    }

    /// Run until a close request, then dispose `root`
    ///
    /// Returns the number of frames drawn, the initial one included. The root
    /// is disposed exactly once, also when a frame fails.
    pub fn run<C: Component>(
        &mut self,
        root: &mut C,
        events: &mut dyn EventSource,
        ctx: &mut dyn RenderContext,
    ) -> Result<u64> {
        let result = self.run_frames(root, events, ctx);
        root.dispose();
        result
    }

    fn run_frames<C: Component>(
        &mut self,
        root: &mut C,
        events: &mut dyn EventSource,
        ctx: &mut dyn RenderContext,
    ) -> Result<u64> {
        let (cols, rows) = ctx.size();
        root.layout(Rect::new(0, 0, cols, rows));
        root.update();
        root.render(ctx)?;
        let mut drawn: u64 = 1;

        let timeout = if self.settings.throttle_cpu_usage {
            FRAME_INTERVAL
        } else {
            Duration::ZERO
        };
        let mut counter = FrameCounter::new(Instant::now());

        loop {
            let mut resized = false;
            for event in events.poll(timeout)? {
                match event {
                    WindowEvent::Close => {
                        info!("close requested after {} frames", drawn);
                        return Ok(drawn);
                    }
                    WindowEvent::Resize(cols, rows) => {
                        debug!("resized to {}x{}", cols, rows);
                        root.layout(Rect::new(0, 0, cols, rows));
                        resized = true;
                    }
                    WindowEvent::Key(key) => self.dispatch(root, &key),
                }
            }

            let dirty = root.update();
            if dirty || resized || self.settings.always_render {
                root.render(ctx)?;
                drawn += 1;
            }

            if let Some(frames) = counter.tick(Instant::now()) {
                if self.settings.print_fps {
                    info!("{} frames", frames);
                } else {
                    trace!("{} frames", frames);
                }
            }
        }
    }

    /// Send a key to the root as a bound action or as raw input
    fn dispatch<C: Component>(&self, root: &mut C, key: &KeyPress) {
        match self.commands.resolve(key) {
            Some(action) => {
                if !root.handle_action(action) {
                    debug!("{} ({}) was not handled", action, key.chord());
                }
            }
            None => {
                if !root.handle_key(key) {
                    trace!("unhandled key {}", key.chord());
                }
            }
        }
    }
}
