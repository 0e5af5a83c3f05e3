//! Application root
//!
//! The root owns the font and theme background. Rendering clears the whole
//! surface, selects the font, draws every child and presents the frame.

use std::path::Path;

use log::{debug, warn};

use crate::command::Action;
use crate::component::{update_all, Component, Font, Lifecycle, Rect, RenderContext};
use crate::config::Config;
use crate::editor::EditorPanel;
use crate::error::Result;
use crate::input::KeyPress;
use crate::syntax::{Color, LanguageRegistry};
use crate::view::View;

/// Every kind of child the root can own
pub enum Panel {
    View(View),
    Editor(EditorPanel),
}

impl Component for Panel {
    fn update(&mut self) -> bool {
        match self {
            Panel::View(view) => view.update(),
            Panel::Editor(editor) => editor.update(),
        }
    }

    fn render(&mut self, ctx: &mut dyn RenderContext) -> Result<()> {
        match self {
            Panel::View(view) => view.render(ctx),
            Panel::Editor(editor) => editor.render(ctx),
        }
    }

    fn dispose(&mut self) {
        match self {
            Panel::View(view) => view.dispose(),
            Panel::Editor(editor) => editor.dispose(),
        }
    }

    fn handle_action(&mut self, action: &Action) -> bool {
        match self {
            Panel::View(view) => view.handle_action(action),
            Panel::Editor(editor) => editor.handle_action(action),
        }
    }

    fn handle_key(&mut self, key: &KeyPress) -> bool {
        match self {
            Panel::View(view) => view.handle_key(key),
            Panel::Editor(editor) => editor.handle_key(key),
        }
    }

    fn layout(&mut self, area: Rect) {
        match self {
            Panel::View(view) => view.layout(area),
            Panel::Editor(editor) => editor.layout(area),
        }
    }
}

/// Root of the component tree
pub struct App {
    font: Font,
    background: Color,
    children: Vec<Panel>,
    area: Rect,
    state: Lifecycle,
}

impl App {
    /// An empty root using the configured font and background
    pub fn new(config: &Config) -> Self {
        Self {
            font: Font::new(config.editor.font_face.clone(), config.editor.font_size),
            background: config.theme.background,
            children: Vec::new(),
            area: Rect::default(),
            state: Lifecycle::Created,
        }
    }

    /// A root holding one view with a panel per file
    ///
    /// Files that cannot be read are skipped with a warning; with no
    /// readable file the view gets an empty scratch panel.
    pub fn with_files<P: AsRef<Path>>(files: &[P], registry: &LanguageRegistry, config: &Config) -> Self {
        let mut view = View::new();
        for path in files {
            let path = path.as_ref();
            match EditorPanel::open(path, registry, config) {
                Ok(panel) => view.add_panel(panel),
                Err(err) => warn!("could not open {}: {}", path.display(), err),
            }
        }
        if view.is_empty() {
            view.add_panel(EditorPanel::scratch(registry, config));
        }

        let mut app = Self::new(config);
        app.add_child(Panel::View(view));
        app
    }

    /// Add a child; it is laid out over the whole root area
    pub fn add_child(&mut self, mut child: Panel) {
        child.layout(self.area);
        self.children.push(child);
    }

    pub fn children(&self) -> &[Panel] {
        &self.children
    }

    /// The first view child
    pub fn view(&self) -> Option<&View> {
        self.children.iter().find_map(|child| match child {
            Panel::View(view) => Some(view),
            Panel::Editor(_) => None,
        })
    }

    pub fn is_disposed(&self) -> bool {
        self.state.is_disposed()
    }
}

impl Component for App {
    fn update(&mut self) -> bool {
        if self.state.is_disposed() {
            return false;
        }
        self.state.activate();
        update_all(&mut self.children)
    }

    fn render(&mut self, ctx: &mut dyn RenderContext) -> Result<()> {
        if self.state.is_disposed() {
            return Ok(());
        }
        ctx.clear(self.background)?;
        ctx.set_font(&self.font)?;
        for child in &mut self.children {
            child.render(ctx)?;
        }
        ctx.display()
    }

    fn dispose(&mut self) {
        if self.state.is_disposed() {
            return;
        }
        for child in &mut self.children {
            child.dispose();
        }
        self.children.clear();
        self.state.dispose();
        debug!("application disposed");
    }

    fn handle_action(&mut self, action: &Action) -> bool {
        if self.state.is_disposed() {
            return false;
        }
        self.children.iter_mut().any(|child| child.handle_action(action))
    }

    fn handle_key(&mut self, key: &KeyPress) -> bool {
        if self.state.is_disposed() {
            return false;
        }
        self.children.iter_mut().any(|child| child.handle_key(key))
    }

    fn layout(&mut self, area: Rect) {
        self.area = area;
        for child in &mut self.children {
            child.layout(area);
        }
    }
}
