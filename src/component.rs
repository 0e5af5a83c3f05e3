//! Component tree - update, render and dispose
//!
//! Every visible piece of the editor is a component. Owners drive their
//! children through `update()`, render them only when that reported a change,
//! and dispose them children-first.

use crate::command::Action;
use crate::error::Result;
use crate::input::KeyPress;
use crate::syntax::{Color, Style};

/// Where a component is in its life
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lifecycle {
    #[default]
    Created,
    Active,
    Disposed,
}

impl Lifecycle {
    /// Move to Active; Disposed stays Disposed
    pub fn activate(&mut self) {
        if *self == Lifecycle::Created {
            *self = Lifecycle::Active;
        }
    }

    /// Move to Disposed, returning false if already there
    pub fn dispose(&mut self) -> bool {
        if *self == Lifecycle::Disposed {
            return false;
        }
        *self = Lifecycle::Disposed;
        true
    }

    pub fn is_disposed(&self) -> bool {
        *self == Lifecycle::Disposed
    }
}

/// Screen area in character cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl Rect {
    pub fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self { x, y, width, height }
    }

    /// Split into `n` side-by-side columns; the last one takes the remainder
    pub fn split_columns(&self, n: usize) -> Vec<Rect> {
        if n == 0 {
            return Vec::new();
        }
        let n16 = u16::try_from(n).unwrap_or(u16::MAX);
        let each = self.width / n16;
        (0..n16)
            .map(|i| {
                let x = self.x + i * each;
                let width = if i + 1 == n16 { self.width - i * each } else { each };
                Rect::new(x, self.y, width, self.height)
            })
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Font selection passed to the rendering context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Font {
    pub face: String,
    pub size: u32,
}

impl Font {
    pub fn new(face: impl Into<String>, size: u32) -> Self {
        Self {
            face: face.into(),
            size,
        }
    }
}

/// Drawing surface handed to `render`
///
/// Coordinates are character cells; text past the right edge is clipped by
/// the implementation.
pub trait RenderContext {
    /// Surface size as (columns, rows)
    fn size(&self) -> (u16, u16);

    /// Clear the whole surface to `color`
    fn clear(&mut self, color: Color) -> Result<()>;

    fn set_font(&mut self, font: &Font) -> Result<()>;

    /// Draw `text` starting at cell (col, row)
    fn draw_text(&mut self, col: u16, row: u16, text: &str, style: Style) -> Result<()>;

    /// Fill an area with a solid colour
    fn fill(&mut self, area: Rect, color: Color) -> Result<()>;

    /// Present everything drawn since the last clear
    fn display(&mut self) -> Result<()>;
}

/// A node of the component tree
pub trait Component {
    /// Advance internal state; true when a redraw is needed
    fn update(&mut self) -> bool;

    /// Draw the whole subtree
    fn render(&mut self, ctx: &mut dyn RenderContext) -> Result<()>;

    /// Release resources, children first; a second call does nothing
    fn dispose(&mut self);

    /// Handle a bound action; true if consumed
    fn handle_action(&mut self, _action: &Action) -> bool {
        false
    }

    /// Handle a key no shortcut claimed; true if consumed
    fn handle_key(&mut self, _key: &KeyPress) -> bool {
        false
    }

    /// Assign the component its screen area
    fn layout(&mut self, _area: Rect) {}
}

/// Update every child in order and report whether any was dirty
///
/// Each child is updated even after one has already reported a change.
pub fn update_all<'a, C, I>(children: I) -> bool
where
    C: Component + 'a,
    I: IntoIterator<Item = &'a mut C>,
{
    children
        .into_iter()
        .fold(false, |dirty, child| child.update() | dirty)
}


#[cfg(test)]
mod tests {
    use super::testing::RecordingContext;
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Component that reports a scripted dirty flag and logs its calls
    struct TestNode {
        name: &'static str,
        dirty: bool,
        state: Lifecycle,
        log: Rc<RefCell<Vec<String>>>,
    }

    impl TestNode {
        fn new(name: &'static str, dirty: bool, log: &Rc<RefCell<Vec<String>>>) -> Self {
            Self {
                name,
                dirty,
                state: Lifecycle::Created,
                log: Rc::clone(log),
            }
        }
    }

    impl Component for TestNode {
        fn update(&mut self) -> bool {
            self.log.borrow_mut().push(format!("update {}", self.name));
            !self.state.is_disposed() && self.dirty
        }

        fn render(&mut self, _ctx: &mut dyn RenderContext) -> Result<()> {
            self.log.borrow_mut().push(format!("render {}", self.name));
            Ok(())
        }

        fn dispose(&mut self) {
            if self.state.dispose() {
                self.log.borrow_mut().push(format!("dispose {}", self.name));
            }
        }
    }

    #[test]
    fn test_update_all_no_short_circuit() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut children = vec![
            TestNode::new("a", true, &log),
            TestNode::new("b", false, &log),
            TestNode::new("c", true, &log),
        ];
        assert!(update_all(&mut children));
        assert_eq!(*log.borrow(), vec!["update a", "update b", "update c"]);
    }

    #[test]
    fn test_update_all_clean() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut children = vec![TestNode::new("a", false, &log), TestNode::new("b", false, &log)];
        assert!(!update_all(&mut children));
        assert!(!update_all(&mut Vec::<TestNode>::new()));
    }

    #[test]
    fn test_dispose_idempotent() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut node = TestNode::new("a", true, &log);
        node.dispose();
        node.dispose();
        assert_eq!(*log.borrow(), vec!["dispose a"]);
        assert!(!node.update());
    }

    #[test]
    fn test_node_renders_into_context() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut node = TestNode::new("a", true, &log);
        let mut ctx = RecordingContext::new(10, 2);
        node.render(&mut ctx).unwrap();
        assert_eq!(*log.borrow(), vec!["render a"]);
    }

    #[test]
    fn test_lifecycle_transitions() {
        let mut state = Lifecycle::default();
        assert_eq!(state, Lifecycle::Created);
        state.activate();
        assert_eq!(state, Lifecycle::Active);
        assert!(state.dispose());
        state.activate();
        assert_eq!(state, Lifecycle::Disposed);
        assert!(!state.dispose());
    }

    #[test]
    fn test_split_columns() {
        let area = Rect::new(0, 0, 80, 24);
        let cols = area.split_columns(3);
        assert_eq!(cols.len(), 3);
        assert_eq!(cols[0], Rect::new(0, 0, 26, 24));
        assert_eq!(cols[2], Rect::new(52, 0, 28, 24));
        assert!(area.split_columns(0).is_empty());
        assert!(Rect::default().is_empty());
    }
}
