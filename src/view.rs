//! View - editor panels laid out side by side

use log::{debug, info};

use crate::command::Action;
use crate::component::{update_all, Component, Lifecycle, Rect, RenderContext};
use crate::editor::EditorPanel;
use crate::error::Result;
use crate::input::KeyPress;

/// A row of editor panels with one focused
pub struct View {
    panels: Vec<EditorPanel>,
    focused: usize,
    area: Rect,
    /// Panels were added or removed since the last update
    dirty: bool,
    state: Lifecycle,
}

impl View {
    pub fn new() -> Self {
        Self {
            panels: Vec::new(),
            focused: 0,
            area: Rect::default(),
            dirty: true,
            state: Lifecycle::Created,
        }
    }

    /// Add a panel to the right and focus it
    pub fn add_panel(&mut self, panel: EditorPanel) {
        self.panels.push(panel);
        self.focus(self.panels.len() - 1);
        self.relayout();
    }

    pub fn panels(&self) -> &[EditorPanel] {
        &self.panels
    }

    pub fn len(&self) -> usize {
        self.panels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.panels.is_empty()
    }

    pub fn focused_index(&self) -> Option<usize> {
        (!self.panels.is_empty()).then_some(self.focused)
    }

    pub fn focused_panel(&self) -> Option<&EditorPanel> {
        self.panels.get(self.focused)
    }

    fn focused_panel_mut(&mut self) -> Option<&mut EditorPanel> {
        self.panels.get_mut(self.focused)
    }

    /// Move focus to panel `idx`
    pub fn focus(&mut self, idx: usize) {
        if idx >= self.panels.len() {
            return;
        }
        self.focused = idx;
        for (i, panel) in self.panels.iter_mut().enumerate() {
            panel.set_focused(i == idx);
        }
    }

    /// Dispose and remove the focused panel
    pub fn close_focused(&mut self) -> bool {
        if self.panels.is_empty() {
            return false;
        }
        let mut panel = self.panels.remove(self.focused);
        info!("closing {}", panel.buffer().name());
        panel.dispose();

        if !self.panels.is_empty() {
            self.focus(self.focused.min(self.panels.len() - 1));
        } else {
            self.focused = 0;
        }
        self.relayout();
        true
    }

    fn relayout(&mut self) {
        self.dirty = true;
        let columns = self.area.split_columns(self.panels.len());
        for (panel, column) in self.panels.iter_mut().zip(columns) {
            panel.layout(column);
        }
    }
}

impl Default for View {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for View {
    fn update(&mut self) -> bool {
        if self.state.is_disposed() {
            return false;
        }
        self.state.activate();
        let own = std::mem::take(&mut self.dirty);
        update_all(&mut self.panels) | own
    }

    fn render(&mut self, ctx: &mut dyn RenderContext) -> Result<()> {
        if self.state.is_disposed() {
            return Ok(());
        }
        for panel in &mut self.panels {
            panel.render(ctx)?;
        }
        Ok(())
    }

    fn dispose(&mut self) {
        if self.state.is_disposed() {
            return;
        }
        for panel in &mut self.panels {
            panel.dispose();
        }
        self.panels.clear();
        self.state.dispose();
        debug!("view disposed");
    }

    fn handle_action(&mut self, action: &Action) -> bool {
        if self.state.is_disposed() {
            return false;
        }
        match action {
            Action::CloseBuffer => self.close_focused(),
            _ => self
                .focused_panel_mut()
                .map(|panel| panel.handle_action(action))
                .unwrap_or(false),
        }
    }

    fn handle_key(&mut self, key: &KeyPress) -> bool {
        if self.state.is_disposed() {
            return false;
        }
        self.focused_panel_mut()
            .map(|panel| panel.handle_key(key))
            .unwrap_or(false)
    }

    fn layout(&mut self, area: Rect) {
        if self.area != area {
            self.area = area;
            self.relayout();
        }
    }
}
