//! Window representation - a viewport into a buffer

use crate::component::Rect;

/// Cursor position and scroll state of one editor panel
#[derive(Debug, Default)]
pub struct Window {
    /// Screen area the text is drawn in
    area: Rect,
    /// First visible line
    top_line: usize,
    /// First visible display column
    left_col: usize,
    /// Cursor line position (0-indexed)
    cursor_line: usize,
    /// Cursor column position (byte offset within line)
    cursor_col: usize,
    /// Goal column for vertical movement
    goal_col: usize,
}

impl Window {
    pub fn new(area: Rect) -> Self {
        Self {
            area,
            ..Self::default()
        }
    }

    pub fn area(&self) -> Rect {
        self.area
    }

    pub fn set_area(&mut self, area: Rect) {
        self.area = area;
    }

    /// Number of text rows
    pub fn height(&self) -> usize {
        self.area.height as usize
    }

    /// Get the top visible line
    pub fn top_line(&self) -> usize {
        self.top_line
    }

    pub fn left_col(&self) -> usize {
        self.left_col
    }

    /// Get cursor line
    pub fn cursor_line(&self) -> usize {
        self.cursor_line
    }

    /// Get cursor column (byte offset)
    pub fn cursor_col(&self) -> usize {
        self.cursor_col
    }

    /// Set cursor position
    pub fn set_cursor(&mut self, line: usize, col: usize) {
        self.cursor_line = line;
        self.cursor_col = col;
    }

    /// Get the goal column for vertical movement
    pub fn goal_col(&self) -> usize {
        self.goal_col
    }

    /// Set the goal column
    pub fn set_goal_col(&mut self, col: usize) {
        self.goal_col = col;
    }

    /// Check if a line is visible in the window
    pub fn is_line_visible(&self, line: usize) -> bool {
        line >= self.top_line && line < self.top_line + self.height()
    }

    /// Scroll so the cursor line and display column are on screen
    pub fn ensure_cursor_visible(&mut self, cursor_display_col: usize, text_width: usize) {
        let height = self.height().max(1);
        if self.cursor_line < self.top_line {
            self.top_line = self.cursor_line;
        } else if self.cursor_line >= self.top_line + height {
            self.top_line = self.cursor_line + 1 - height;
        }

        let width = text_width.max(1);
        if cursor_display_col < self.left_col {
            self.left_col = cursor_display_col;
        } else if cursor_display_col >= self.left_col + width {
            self.left_col = cursor_display_col + 1 - width;
        }
    }

    /// Scroll down by n lines
    pub fn scroll_down(&mut self, n: usize, line_count: usize) {
        let new_top = self.top_line.saturating_add(n);
        self.top_line = new_top.min(line_count.saturating_sub(1));
    }

    /// Scroll up by n lines
    pub fn scroll_up(&mut self, n: usize) {
        self.top_line = self.top_line.saturating_sub(n);
    }
}
