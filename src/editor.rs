//! Editor panel - one buffer, its viewport and its highlighting
//!
//! Keys no shortcut claimed arrive here as text entry. Each visible line is
//! highlighted through the panel's HighlightCache, keyed by the line's stable
//! id and revision, so unchanged lines are never rescanned. Languages with
//! multiline rules also key each line by the block tokens covering it, which
//! are recomputed once per edit.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use log::{debug, info};

use crate::buffer::Buffer;
use crate::caret::Caret;
use crate::command::Action;
use crate::component::{Component, Lifecycle, Rect, RenderContext};
use crate::config::{Config, EditorSettings, Theme};
use crate::error::Result;
use crate::input::{Key, KeyPress};
use crate::line::char_width;
use crate::syntax::{line_states, HighlightCache, LanguageRegistry, LanguageSpec, LineState, Style};
use crate::window::Window;

/// How far the cursor line background is lifted from the theme background
const LINE_HIGHLIGHT_LIFT: u8 = 0x18;
/// How far line numbers are dimmed from the theme foreground
const GUTTER_DIM: u8 = 0x60;

/// A text editing panel
pub struct EditorPanel {
    buffer: Buffer,
    window: Window,
    language: Arc<LanguageSpec>,
    cache: HighlightCache,
    /// Multi-line token coverage per line, and the buffer generation it is for
    line_states: Vec<LineState>,
    states_generation: Option<u64>,
    settings: EditorSettings,
    theme: Theme,
    caret: Caret,
    focused: bool,
    /// Set by input handling, cleared by `update`
    dirty: bool,
    state: Lifecycle,
}

impl EditorPanel {
    /// Create a panel for `buffer`, highlighted as `language`
    pub fn new(buffer: Buffer, language: Arc<LanguageSpec>, config: &Config) -> Self {
        Self {
            buffer,
            window: Window::default(),
            language,
            cache: HighlightCache::new(),
            line_states: Vec::new(),
            states_generation: None,
            settings: config.editor.clone(),
            theme: config.theme.clone(),
            caret: Caret::new(&config.cursor, Instant::now()),
            focused: false,
            dirty: true,
            state: Lifecycle::Created,
        }
    }

    /// Open a file, resolving its language from the extension
    pub fn open(path: &Path, registry: &LanguageRegistry, config: &Config) -> Result<Self> {
        let buffer = Buffer::from_file(path)?;
        let language = registry.resolve_path_or_plain(path);
        info!("opened {} as {}", path.display(), language.name);
        Ok(Self::new(buffer, language, config))
    }

    /// An empty plain-text panel
    pub fn scratch(registry: &LanguageRegistry, config: &Config) -> Self {
        Self::new(Buffer::default(), registry.plain_text(), config)
    }

    pub fn buffer(&self) -> &Buffer {
        &self.buffer
    }

    pub fn language(&self) -> &LanguageSpec {
        &self.language
    }

    /// Switch highlighting to another language; every cached line is stale
    pub fn set_language(&mut self, language: Arc<LanguageSpec>) {
        debug!("{} is now {}", self.buffer.name(), language.name);
        self.language = language;
        self.cache.clear();
        self.states_generation = None;
        self.dirty = true;
    }

    pub fn cache(&self) -> &HighlightCache {
        &self.cache
    }

    /// Cursor as (line, byte offset)
    pub fn cursor(&self) -> (usize, usize) {
        (self.window.cursor_line(), self.window.cursor_col())
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn set_focused(&mut self, focused: bool) {
        if self.focused != focused {
            self.focused = focused;
            self.dirty = true;
        }
    }

    pub fn is_disposed(&self) -> bool {
        self.state.is_disposed()
    }

    /// Width of the line number gutter, including its trailing space
    fn gutter_width(&self) -> usize {
        if !self.settings.show_line_numbers {
            return 0;
        }
        let digits = self.buffer.line_count().to_string().len();
        digits.max(3) + 1
    }

    fn text_width(&self) -> usize {
        (self.window.area().width as usize).saturating_sub(self.gutter_width())
    }

    /// Record that the text or cursor changed
    fn touched(&mut self) {
        self.dirty = true;
        self.caret.reset(Instant::now());
        let (line, col) = self.cursor();
        let display_col = self.buffer.line(line).map(|l| l.byte_to_col(col)).unwrap_or(0);
        let width = self.text_width();
        self.window.ensure_cursor_visible(display_col, width);
    }

    fn sync_goal_col(&mut self) {
        let (line, col) = self.cursor();
        let display_col = self.buffer.line(line).map(|l| l.byte_to_col(col)).unwrap_or(0);
        self.window.set_goal_col(display_col);
    }

    fn line_len(&self, line: usize) -> usize {
        self.buffer.line(line).map(|l| l.len()).unwrap_or(0)
    }

    /// Byte offset on `line` closest to the goal column
    fn goal_byte(&self, line: usize) -> usize {
        let goal = self.window.goal_col();
        self.buffer
            .line(line)
            .map(|l| l.col_to_byte(goal).unwrap_or(l.len()))
            .unwrap_or(0)
    }

    fn char_after_cursor(&self) -> Option<char> {
        let (line, col) = self.cursor();
        self.buffer.line(line)?.text().get(col..)?.chars().next()
    }

    /// Insert a typed character
    pub fn insert_char(&mut self, ch: char) {
        let (line, col) = self.cursor();

        if self.settings.match_braces && is_closing_brace(ch) && self.char_after_cursor() == Some(ch) {
            self.window.set_cursor(line, col + ch.len_utf8());
            self.sync_goal_col();
            return;
        }

        self.buffer.insert_char(line, col, ch);
        let new_col = col + ch.len_utf8();
        if self.settings.match_braces {
            if let Some(close) = closing_partner(ch) {
                self.buffer.insert_char(line, new_col, close);
            }
        }
        self.window.set_cursor(line, new_col);
        self.sync_goal_col();
    }

    /// Split the line at the cursor, carrying indentation if enabled
    pub fn newline(&mut self) {
        let (line, col) = self.cursor();
        let indent = match self.buffer.line(line) {
            Some(current) if self.settings.maintain_indentation => {
                let indent = current.indentation();
                indent[..indent.len().min(col)].to_string()
            }
            _ => String::new(),
        };

        self.buffer.insert_newline(line, col);
        if !indent.is_empty() {
            self.buffer.insert_str(line + 1, 0, &indent);
        }
        self.window.set_cursor(line + 1, indent.len());
        self.sync_goal_col();
    }

    /// Insert a tab, or spaces to the next tab stop
    pub fn insert_tab(&mut self) {
        if !self.settings.tabs_are_spaces {
            self.insert_char('\t');
            return;
        }
        let (line, col) = self.cursor();
        let tab_size = self.settings.tab_size.max(1);
        let display_col = self.buffer.line(line).map(|l| l.byte_to_col(col)).unwrap_or(0);
        let spaces = " ".repeat(tab_size - display_col % tab_size);
        self.buffer.insert_str(line, col, &spaces);
        self.window.set_cursor(line, col + spaces.len());
        self.sync_goal_col();
    }

    /// Delete backwards; in leading spaces a hungry backspace removes a tab stop
    pub fn backspace(&mut self) {
        let (line, col) = self.cursor();

        if col == 0 {
            if let Some((join_pos, removed)) = self.buffer.join_with_previous(line) {
                self.cache.invalidate(removed);
                self.window.set_cursor(line - 1, join_pos);
                self.sync_goal_col();
            }
            return;
        }

        let Some(current) = self.buffer.line(line) else {
            return;
        };
        let before = &current.text()[..col];
        let start = if self.settings.hungry_backspace && before.bytes().all(|b| b == b' ') {
            let tab_size = self.settings.tab_size.max(1);
            col - ((col - 1) % tab_size + 1)
        } else {
            current.prev_boundary(col).unwrap_or(0)
        };

        self.buffer.delete_range(line, start, col);
        self.window.set_cursor(line, start);
        self.sync_goal_col();
    }

    /// Delete the character under the cursor, joining lines at line end
    pub fn delete_forward(&mut self) {
        let (line, col) = self.cursor();
        if col < self.line_len(line) {
            self.buffer.delete_char(line, col);
        } else if let Some(removed) = self.buffer.join_line(line) {
            self.cache.invalidate(removed);
        }
    }

    /// Delete the cursor line
    pub fn delete_line(&mut self) {
        let line = self.window.cursor_line();
        if let Some(removed) = self.buffer.delete_line(line) {
            self.cache.invalidate(removed);
        }
        let line = line.min(self.buffer.line_count() - 1);
        self.window.set_cursor(line, 0);
        self.window.set_goal_col(0);
    }

    pub fn move_left(&mut self) {
        let (line, col) = self.cursor();
        if let Some(prev) = self.buffer.line(line).and_then(|l| l.prev_boundary(col)) {
            self.window.set_cursor(line, prev);
        } else if line > 0 {
            self.window.set_cursor(line - 1, self.line_len(line - 1));
        }
        self.sync_goal_col();
    }

    pub fn move_right(&mut self) {
        let (line, col) = self.cursor();
        if let Some(next) = self.buffer.line(line).and_then(|l| l.next_boundary(col)) {
            self.window.set_cursor(line, next);
        } else if line + 1 < self.buffer.line_count() {
            self.window.set_cursor(line + 1, 0);
        }
        self.sync_goal_col();
    }

    pub fn move_up(&mut self) {
        let line = self.window.cursor_line();
        if line > 0 {
            let col = self.goal_byte(line - 1);
            self.window.set_cursor(line - 1, col);
        }
    }

    pub fn move_down(&mut self) {
        let line = self.window.cursor_line();
        if line + 1 < self.buffer.line_count() {
            let col = self.goal_byte(line + 1);
            self.window.set_cursor(line + 1, col);
        }
    }

    pub fn move_to_bol(&mut self) {
        let line = self.window.cursor_line();
        self.window.set_cursor(line, 0);
        self.window.set_goal_col(0);
    }

    pub fn move_to_eol(&mut self) {
        let line = self.window.cursor_line();
        self.window.set_cursor(line, self.line_len(line));
        self.sync_goal_col();
    }

    pub fn page_up(&mut self) {
        let step = self.window.height().saturating_sub(1).max(1);
        let line = self.window.cursor_line().saturating_sub(step);
        self.window.scroll_up(step);
        let col = self.goal_byte(line);
        self.window.set_cursor(line, col);
    }

    pub fn page_down(&mut self) {
        let step = self.window.height().saturating_sub(1).max(1);
        let last = self.buffer.line_count() - 1;
        let line = (self.window.cursor_line() + step).min(last);
        self.window.scroll_down(step, self.buffer.line_count());
        let col = self.goal_byte(line);
        self.window.set_cursor(line, col);
    }

    fn refresh_line_states(&mut self) {
        if !self.language.has_multiline_rules() {
            self.line_states.clear();
            return;
        }
        let generation = self.buffer.generation();
        if self.states_generation != Some(generation) {
            self.line_states = line_states(self.buffer.lines().iter().map(|l| l.text()), &self.language);
            self.states_generation = Some(generation);
        }
    }

    fn render_lines(&mut self, ctx: &mut dyn RenderContext) -> Result<()> {
        self.refresh_line_states();
        let area = self.window.area();
        let gutter = self.gutter_width().min(area.width as usize);
        let text_x = area.x + gutter as u16;
        let text_width = self.text_width();
        let top = self.window.top_line();
        let left = self.window.left_col();
        let cursor_line = self.window.cursor_line();
        let line_bg = self.theme.background.lift(LINE_HIGHLIGHT_LIFT);
        let gutter_fg = self.theme.foreground.lift(GUTTER_DIM);

        for row in 0..area.height {
            let idx = top + row as usize;
            let Some(line) = self.buffer.line(idx) else {
                break;
            };
            let y = area.y + row;
            let bg = (self.settings.highlight_line && idx == cursor_line).then_some(line_bg);
            let with_bg = |style: Style| match bg {
                Some(color) => style.with_bg(color),
                None => style,
            };

            if let Some(color) = bg {
                ctx.fill(Rect::new(area.x, y, area.width, 1), color)?;
            }

            if gutter > 0 {
                let label = format!("{:>width$} ", idx + 1, width = gutter - 1);
                let style = if idx == cursor_line {
                    Style::fg(self.theme.foreground).with_bold()
                } else {
                    Style::fg(gutter_fg)
                };
                ctx.draw_text(area.x, y, &label, with_bg(style))?;
            }

            let text = line.text();
            let state = self.line_states.get(idx).copied().unwrap_or_default();
            let tokens = self
                .cache
                .get_or_compute_in(line.id(), line.revision(), state, text, &self.language);
            for token in tokens {
                let start_col = line.byte_to_col(token.span.start);
                let Some((offset, visible)) = clip(token.text(text), start_col, left, text_width) else {
                    continue;
                };
                let style = Style::fg(token.color.unwrap_or(self.theme.foreground));
                ctx.draw_text(text_x + offset as u16, y, &visible, with_bg(style))?;
            }
        }

        Ok(())
    }

    fn render_caret(&self, ctx: &mut dyn RenderContext) -> Result<()> {
        let (line_idx, col) = self.cursor();
        if !self.focused || !self.caret.is_visible() || !self.window.is_line_visible(line_idx) {
            return Ok(());
        }
        let Some(line) = self.buffer.line(line_idx) else {
            return Ok(());
        };

        let area = self.window.area();
        let left = self.window.left_col();
        let display_col = line.byte_to_col(col);
        if display_col < left || display_col >= left + self.text_width() {
            return Ok(());
        }

        let x = area.x + (self.gutter_width() + display_col - left) as u16;
        let y = area.y + (line_idx - self.window.top_line()) as u16;
        let under = line.text()[col..]
            .chars()
            .next()
            .filter(|ch| !ch.is_control())
            .unwrap_or(' ');

        ctx.fill(Rect::new(x, y, 1, 1), self.theme.cursor)?;
        let style = Style::fg(self.theme.cursor_invert).with_bg(self.theme.cursor);
        ctx.draw_text(x, y, &under.to_string(), style)
    }
}

impl Component for EditorPanel {
    fn update(&mut self) -> bool {
        if self.state.is_disposed() {
            return false;
        }
        self.state.activate();
        let blinked = self.focused && self.caret.tick(Instant::now());
        std::mem::take(&mut self.dirty) | blinked
    }

    fn render(&mut self, ctx: &mut dyn RenderContext) -> Result<()> {
        if self.state.is_disposed() || self.window.area().is_empty() {
            return Ok(());
        }
        self.render_lines(ctx)?;
        self.render_caret(ctx)
    }

    fn dispose(&mut self) {
        if self.state.dispose() {
            debug!("disposing editor for {}", self.buffer.name());
            self.cache.clear();
            self.line_states.clear();
            self.states_generation = None;
        }
    }

    fn handle_action(&mut self, action: &Action) -> bool {
        if self.state.is_disposed() {
            return false;
        }
        match action {
            Action::DeleteLine => {
                self.delete_line();
                self.touched();
                true
            }
            Action::Save => {
                info!("save requested for {}", self.buffer.name());
                true
            }
            _ => false,
        }
    }

    fn handle_key(&mut self, key: &KeyPress) -> bool {
        if self.state.is_disposed() {
            return false;
        }
        if let Some(ch) = key.text() {
            self.insert_char(ch);
            self.touched();
            return true;
        }
        if !key.modifiers.is_plain() {
            return false;
        }

        match key.key {
            Key::Enter => self.newline(),
            Key::Tab => self.insert_tab(),
            Key::Backspace => self.backspace(),
            Key::Delete => self.delete_forward(),
            Key::Left => self.move_left(),
            Key::Right => self.move_right(),
            Key::Up => self.move_up(),
            Key::Down => self.move_down(),
            Key::Home => self.move_to_bol(),
            Key::End => self.move_to_eol(),
            Key::PageUp => self.page_up(),
            Key::PageDown => self.page_down(),
            _ => return false,
        }
        self.touched();
        true
    }

    fn layout(&mut self, area: Rect) {
        if self.window.area() != area {
            self.window.set_area(area);
            self.touched();
        }
    }
}

fn closing_partner(ch: char) -> Option<char> {
    match ch {
        '(' => Some(')'),
        '[' => Some(']'),
        '{' => Some('}'),
        _ => None,
    }
}

fn is_closing_brace(ch: char) -> bool {
    matches!(ch, ')' | ']' | '}')
}

/// The part of `text`, which starts at display column `start`, inside the
/// columns `left..left + width`
///
/// Returns the screen offset of the first visible character and the visible
/// text, with tabs shown as spaces.
fn clip(text: &str, start: usize, left: usize, width: usize) -> Option<(usize, String)> {
    let right = left + width;
    let mut col = start;
    let mut first = None;
    let mut visible = String::new();

    for ch in text.chars() {
        if col >= right {
            break;
        }
        let w = char_width(ch);
        if col >= left && col + w <= right {
            first.get_or_insert(col - left);
            visible.push(if ch == '\t' { ' ' } else { ch });
        }
        col += w;
    }

    first.map(|offset| (offset, visible))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::testing::RecordingContext;
    use crate::input::Modifiers;
    use crate::syntax::Color;

    fn config() -> Config {
        let mut config = Config::builtin();
        config.cursor.flash = false;
        config
    }

    fn go_panel(text: &str) -> EditorPanel {
        let config = config();
        let registry = LanguageRegistry::from_config(&config);
        let go = registry.resolve("go").unwrap();
        let mut panel = EditorPanel::new(Buffer::from_text("main.go", text), go, &config);
        panel.set_focused(true);
        panel.layout(Rect::new(0, 0, 40, 10));
        panel
    }

    fn plain_panel(text: &str, edit: impl FnOnce(&mut Config)) -> EditorPanel {
        let mut config = config();
        edit(&mut config);
        let registry = LanguageRegistry::from_config(&config);
        let mut panel = EditorPanel::new(Buffer::from_text("notes", text), registry.plain_text(), &config);
        panel.layout(Rect::new(0, 0, 40, 10));
        panel
    }

    fn press(panel: &mut EditorPanel, key: Key) -> bool {
        panel.handle_key(&KeyPress::plain(key))
    }

    fn type_str(panel: &mut EditorPanel, text: &str) {
        for ch in text.chars() {
            assert!(press(panel, Key::Char(ch)));
        }
    }

    #[test]
    fn test_typing_inserts_text() {
        let mut panel = plain_panel("", |_| {});
        type_str(&mut panel, "Hi!");
        assert_eq!(panel.buffer().text(), "Hi!");
        assert_eq!(panel.cursor(), (0, 3));
        assert!(panel.buffer().is_modified());
    }

    #[test]
    fn test_shifted_char_inserts_uppercase() {
        let mut panel = plain_panel("", |_| {});
        assert!(panel.handle_key(&KeyPress::new(Key::Char('Q'), Modifiers::SHIFT)));
        assert!(!panel.handle_key(&KeyPress::new(Key::Char('q'), Modifiers::CTRL)));
        assert_eq!(panel.buffer().text(), "Q");
    }

    #[test]
    fn test_enter_maintains_indentation() {
        let mut panel = plain_panel("    foo", |_| {});
        press(&mut panel, Key::End);
        press(&mut panel, Key::Enter);
        assert_eq!(panel.buffer().text(), "    foo\n    ");
        assert_eq!(panel.cursor(), (1, 4));

        let mut flat = plain_panel("    foo", |c| c.editor.maintain_indentation = false);
        press(&mut flat, Key::End);
        press(&mut flat, Key::Enter);
        assert_eq!(flat.buffer().text(), "    foo\n");
    }

    #[test]
    fn test_tab_inserts_spaces_to_tab_stop() {
        let mut panel = plain_panel("ab", |_| {});
        press(&mut panel, Key::End);
        press(&mut panel, Key::Tab);
        assert_eq!(panel.buffer().text(), "ab  ");

        let mut tabs = plain_panel("", |c| c.editor.tabs_are_spaces = false);
        press(&mut tabs, Key::Tab);
        assert_eq!(tabs.buffer().text(), "\t");
    }

    #[test]
    fn test_hungry_backspace() {
        let mut panel = plain_panel("", |_| {});
        press(&mut panel, Key::Tab);
        press(&mut panel, Key::Tab);
        assert_eq!(panel.buffer().text(), "        ");
        press(&mut panel, Key::Backspace);
        assert_eq!(panel.buffer().text(), "    ");
        assert_eq!(panel.cursor(), (0, 4));

        let mut plain = plain_panel("", |c| c.editor.hungry_backspace = false);
        press(&mut plain, Key::Tab);
        press(&mut plain, Key::Backspace);
        assert_eq!(plain.buffer().text(), "   ");
    }

    #[test]
    fn test_backspace_joins_lines() {
        let mut panel = plain_panel("ab\ncd", |_| {});
        press(&mut panel, Key::Down);
        press(&mut panel, Key::Home);
        press(&mut panel, Key::Backspace);
        assert_eq!(panel.buffer().text(), "abcd");
        assert_eq!(panel.cursor(), (0, 2));

        press(&mut panel, Key::Backspace);
        assert_eq!(panel.buffer().text(), "acd");
    }

    #[test]
    fn test_delete_forward() {
        let mut panel = plain_panel("ab\ncd", |_| {});
        press(&mut panel, Key::Delete);
        assert_eq!(panel.buffer().text(), "b\ncd");
        press(&mut panel, Key::End);
        press(&mut panel, Key::Delete);
        assert_eq!(panel.buffer().text(), "bcd");
    }

    #[test]
    fn test_match_braces() {
        let mut panel = plain_panel("", |c| c.editor.match_braces = true);
        type_str(&mut panel, "f(");
        assert_eq!(panel.buffer().text(), "f()");
        assert_eq!(panel.cursor(), (0, 2));
        type_str(&mut panel, "x)");
        assert_eq!(panel.buffer().text(), "f(x)");
        assert_eq!(panel.cursor(), (0, 4));

        let mut off = plain_panel("", |_| {});
        type_str(&mut off, "(");
        assert_eq!(off.buffer().text(), "(");
    }

    #[test]
    fn test_cursor_movement() {
        let mut panel = plain_panel("long line\nab\nanother", |_| {});
        press(&mut panel, Key::End);
        press(&mut panel, Key::Down);
        assert_eq!(panel.cursor(), (1, 2));
        press(&mut panel, Key::Down);
        assert_eq!(panel.cursor(), (2, 7));
        press(&mut panel, Key::Right);
        assert_eq!(panel.cursor(), (2, 7));
        press(&mut panel, Key::Home);
        press(&mut panel, Key::Left);
        assert_eq!(panel.cursor(), (1, 2));
        press(&mut panel, Key::PageUp);
        assert_eq!(panel.cursor().0, 0);
        press(&mut panel, Key::PageDown);
        assert_eq!(panel.cursor().0, 2);
    }

    #[test]
    fn test_unhandled_keys_not_consumed() {
        let mut panel = plain_panel("", |_| {});
        assert!(!press(&mut panel, Key::Escape));
        assert!(!press(&mut panel, Key::F(3)));
    }

    #[test]
    fn test_delete_line_action() {
        let mut panel = go_panel("package main\n\nfunc main() {}");
        let mut ctx = RecordingContext::new(40, 10);
        panel.render(&mut ctx).unwrap();
        assert_eq!(panel.cache().len(), 3);

        assert!(panel.handle_action(&Action::DeleteLine));
        assert_eq!(panel.buffer().text(), "\nfunc main() {}");
        assert_eq!(panel.cache().len(), 2);
        assert!(panel.handle_action(&Action::Save));
        assert!(!panel.handle_action(&Action::CloseBuffer));
    }

    #[test]
    fn test_update_reports_input() {
        let mut panel = plain_panel("", |_| {});
        assert!(panel.update());
        assert!(!panel.update());
        press(&mut panel, Key::Char('x'));
        assert!(panel.update());
        assert!(!panel.update());
    }

    #[test]
    fn test_render_highlights_keywords() {
        let mut panel = go_panel("func main() {}");
        let mut ctx = RecordingContext::new(40, 10);
        panel.render(&mut ctx).unwrap();

        let row = ctx.texts_on_row(0);
        assert_eq!(row[0], "  1 ");
        assert!(row.contains(&"main"));
        let func = ctx.style_of("func").unwrap();
        assert_eq!(func.fg, Color::from_hex(0xf0a400));
        assert_eq!(func.bg, Some(Color::from_hex(0x002649).lift(LINE_HIGHLIGHT_LIFT)));
        assert_eq!(ctx.style_of("main").unwrap().fg, Color::from_hex(0xf2f4f6));
    }

    #[test]
    fn test_render_reuses_cache() {
        let mut panel = go_panel("package main\nfunc main() {}\n// done");
        let mut ctx = RecordingContext::new(40, 10);
        panel.render(&mut ctx).unwrap();
        assert_eq!(panel.cache().scan_count(), 3);

        panel.render(&mut ctx).unwrap();
        assert_eq!(panel.cache().scan_count(), 3);

        press(&mut panel, Key::Char('x'));
        panel.render(&mut ctx).unwrap();
        assert_eq!(panel.cache().scan_count(), 4);
    }

    #[test]
    fn test_language_change_clears_cache() {
        let mut panel = go_panel("func main() {}");
        let mut ctx = RecordingContext::new(40, 10);
        panel.render(&mut ctx).unwrap();
        assert_eq!(panel.cache().len(), 1);

        panel.set_language(Arc::new(LanguageSpec::plain_text()));
        assert!(panel.cache().is_empty());
        assert!(panel.update());

        let mut ctx = RecordingContext::new(40, 10);
        panel.render(&mut ctx).unwrap();
        assert_eq!(ctx.style_of("func").unwrap().fg, Color::from_hex(0xf2f4f6));
    }

    fn block_comment_panel(text: &str) -> EditorPanel {
        let mut config = Config::parse(
            r#"
[file_associations.c]
extensions = [".c"]

[syntax.c.comment]
colouring = 0x4b79fc
pattern = '/\*.*?\*/'
multiline = true

[syntax.c.keyword]
colouring = 0xff00ff
match = ["int"]
"#,
        )
        .unwrap();
        config.cursor.flash = false;
        config.editor.highlight_line = false;
        let registry = LanguageRegistry::from_config(&config);
        let c = registry.resolve("c").unwrap();
        let mut panel = EditorPanel::new(Buffer::from_text("main.c", text), c, &config);
        panel.set_focused(true);
        panel.layout(Rect::new(0, 0, 40, 10));
        panel
    }

    #[test]
    fn test_block_comment_spans_lines() {
        let comment = Color::from_hex(0x4b79fc);
        let mut panel = block_comment_panel("int x;\n/* a\nb */ int");
        let mut ctx = RecordingContext::new(40, 10);
        panel.render(&mut ctx).unwrap();

        assert_eq!(ctx.texts_on_row(1), vec!["  2 ", "/* a"]);
        assert_eq!(ctx.style_of("/* a").unwrap().fg, comment);
        assert_eq!(ctx.texts_on_row(2), vec!["  3 ", "b */", " ", "int"]);
        assert_eq!(ctx.style_of("b */").unwrap().fg, comment);
        assert_eq!(ctx.style_of("int").unwrap().fg, Color::from_hex(0xff00ff));
        assert_eq!(panel.cache().scan_count(), 3);

        // Removing the opener uncomments the next line without editing it
        press(&mut panel, Key::Down);
        press(&mut panel, Key::Delete);
        press(&mut panel, Key::Delete);
        let mut ctx = RecordingContext::new(40, 10);
        panel.render(&mut ctx).unwrap();
        assert_eq!(ctx.texts_on_row(2), vec!["  3 ", "b", " ", "*", "/", " ", "int"]);
        assert_eq!(ctx.style_of("b").unwrap().fg, Color::from_hex(0xf2f4f6));
        assert_eq!(panel.cache().scan_count(), 5);
    }

    #[test]
    fn test_cursor_line_number_is_bold() {
        let mut panel = go_panel("a\nb");
        let mut ctx = RecordingContext::new(40, 10);
        panel.render(&mut ctx).unwrap();
        assert!(ctx.style_of("  1 ").unwrap().bold);
        assert!(!ctx.style_of("  2 ").unwrap().bold);
    }

    #[test]
    fn test_render_caret_when_focused() {
        let mut panel = go_panel("func");
        let mut ctx = RecordingContext::new(40, 10);
        panel.render(&mut ctx).unwrap();
        let caret = ctx.style_of("f").unwrap();
        assert_eq!(caret.bg, Some(Color::from_hex(0xf2f4f6)));

        panel.set_focused(false);
        let mut ctx = RecordingContext::new(40, 10);
        panel.render(&mut ctx).unwrap();
        assert!(ctx.style_of("f").is_none());
    }

    #[test]
    fn test_render_without_gutter() {
        let mut panel = plain_panel("abc", |c| {
            c.editor.show_line_numbers = false;
            c.editor.highlight_line = false;
        });
        let mut ctx = RecordingContext::new(40, 10);
        panel.render(&mut ctx).unwrap();
        assert_eq!(ctx.texts_on_row(0), vec!["abc"]);
        assert_eq!(ctx.style_of("abc").unwrap().bg, None);
    }

    #[test]
    fn test_dispose() {
        let mut panel = go_panel("func");
        let mut ctx = RecordingContext::new(40, 10);
        panel.render(&mut ctx).unwrap();
        panel.dispose();
        panel.dispose();
        assert!(panel.is_disposed());
        assert!(panel.cache().is_empty());
        assert!(!panel.update());
        assert!(!press(&mut panel, Key::Char('x')));

        let mut ctx = RecordingContext::new(40, 10);
        panel.render(&mut ctx).unwrap();
        assert!(ctx.ops.is_empty());
    }

    #[test]
    fn test_clip() {
        assert_eq!(clip("hello", 0, 0, 10), Some((0, "hello".to_string())));
        assert_eq!(clip("hello", 8, 0, 10), Some((8, "he".to_string())));
        assert_eq!(clip("hello", 0, 3, 10), Some((0, "lo".to_string())));
        assert_eq!(clip("hello", 20, 0, 10), None);
        assert_eq!(clip("a\tb", 0, 0, 10), Some((0, "a b".to_string())));
    }
}
