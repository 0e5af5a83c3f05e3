//! Buffer representation - a collection of lines with associated metadata

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::line::Line;
use crate::syntax::RegionId;

/// A buffer containing text and metadata
#[derive(Debug)]
pub struct Buffer {
    /// Lines of text, never empty
    lines: Vec<Line>,
    /// Buffer name (e.g., "main.go", "*scratch*")
    name: String,
    /// Associated file path (None for unnamed buffers)
    filename: Option<PathBuf>,
    /// Whether buffer has unsaved changes
    modified: bool,
    /// Bumped on every edit
    generation: u64,
    /// Next line id to hand out
    next_id: RegionId,
}

impl Buffer {
    /// Create a new empty buffer with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self::from_text(name, "")
    }

    /// Create a buffer holding `text`
    pub fn from_text(name: impl Into<String>, text: &str) -> Self {
        let mut buffer = Self {
            lines: Vec::new(),
            name: name.into(),
            filename: None,
            modified: false,
            generation: 0,
            next_id: 0,
        };
        for line in text.lines() {
            let line = buffer.make_line(line.to_string());
            buffer.lines.push(line);
        }
        if buffer.lines.is_empty() {
            let line = buffer.make_line(String::new());
            buffer.lines.push(line);
        }
        buffer
    }

    /// Create a buffer from file contents
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let name = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "unnamed".to_string());

        let mut buffer = Self::from_text(name, &content);
        buffer.filename = Some(path.to_path_buf());
        Ok(buffer)
    }

    fn make_line(&mut self, text: String) -> Line {
        let id = self.next_id;
        self.next_id += 1;
        Line::from_string(id, text)
    }

    /// Get buffer name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get filename if set
    pub fn filename(&self) -> Option<&Path> {
        self.filename.as_deref()
    }

    /// Check if buffer is modified
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// Edit counter; changes whenever any line does
    pub fn generation(&self) -> u64 {
        self.generation
    }

    fn changed(&mut self) {
        self.modified = true;
        self.generation += 1;
    }

    /// Get number of lines
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Get a line by index
    pub fn line(&self, idx: usize) -> Option<&Line> {
        self.lines.get(idx)
    }

    /// Get all lines
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// Whole buffer as text
    pub fn text(&self) -> String {
        self.lines.iter().map(Line::text).collect::<Vec<_>>().join("\n")
    }

    /// Insert a character at position
    pub fn insert_char(&mut self, line_idx: usize, byte_pos: usize, ch: char) {
        if let Some(line) = self.lines.get_mut(line_idx) {
            line.insert_char(byte_pos, ch);
            self.changed();
        }
    }

    /// Insert a string at position
    pub fn insert_str(&mut self, line_idx: usize, byte_pos: usize, s: &str) {
        if let Some(line) = self.lines.get_mut(line_idx) {
            line.insert_str(byte_pos, s);
            self.changed();
        }
    }

    /// Insert a newline, splitting the current line
    pub fn insert_newline(&mut self, line_idx: usize, byte_pos: usize) {
        let Some(line) = self.lines.get_mut(line_idx) else {
            return;
        };
        let remainder = line.split_off(byte_pos);
        let new_line = self.make_line(remainder);
        self.lines.insert(line_idx + 1, new_line);
        self.changed();
    }

    /// Delete a character at position, returns the deleted char
    pub fn delete_char(&mut self, line_idx: usize, byte_pos: usize) -> Option<char> {
        let line = self.lines.get_mut(line_idx)?;
        let ch = line.text().get(byte_pos..)?.chars().next()?;
        line.delete_range(byte_pos, byte_pos + ch.len_utf8());
        self.changed();
        Some(ch)
    }

    /// Delete a byte range within one line
    pub fn delete_range(&mut self, line_idx: usize, start: usize, end: usize) -> Option<String> {
        let line = self.lines.get_mut(line_idx)?;
        if start >= end || end > line.len() {
            return None;
        }
        let removed = line.delete_range(start, end);
        self.changed();
        Some(removed)
    }

    /// Join line with the next line, returning the removed line's id
    pub fn join_line(&mut self, line_idx: usize) -> Option<RegionId> {
        if line_idx + 1 >= self.lines.len() {
            return None;
        }
        let next_line = self.lines.remove(line_idx + 1);
        self.lines[line_idx].append_str(next_line.text());
        self.changed();
        Some(next_line.id())
    }

    /// Join with previous line (when backspacing at start of line)
    ///
    /// Returns the byte position of the join and the removed line's id.
    pub fn join_with_previous(&mut self, line_idx: usize) -> Option<(usize, RegionId)> {
        if line_idx == 0 || line_idx >= self.lines.len() {
            return None;
        }
        let join_pos = self.lines[line_idx - 1].len();
        let removed = self.join_line(line_idx - 1)?;
        Some((join_pos, removed))
    }

    /// Delete a line by index, returning the removed line's id
    ///
    /// The last remaining line is cleared instead of removed.
    pub fn delete_line(&mut self, line_idx: usize) -> Option<RegionId> {
        if line_idx >= self.lines.len() {
            return None;
        }
        self.changed();
        if self.lines.len() == 1 {
            self.lines[0].clear();
            return None;
        }
        Some(self.lines.remove(line_idx).id())
    }
}

impl Default for Buffer {
    fn default() -> Self {
        Self::new("*scratch*")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_from_text() {
        let buffer = Buffer::from_text("a.go", "package main\n\nfunc main() {}\n");
        assert_eq!(buffer.line_count(), 3);
        assert_eq!(buffer.line(2).unwrap().text(), "func main() {}");
        assert!(!buffer.is_modified());
        assert_eq!(Buffer::default().line_count(), 1);
    }

    #[test]
    fn test_line_ids_unique_and_stable() {
        let mut buffer = Buffer::from_text("t", "a\nb\nc");
        let id_b = buffer.line(1).unwrap().id();

        buffer.insert_newline(0, 1);
        buffer.insert_char(2, 0, 'x');
        assert_eq!(buffer.line(2).unwrap().id(), id_b);
        assert_eq!(buffer.line(2).unwrap().text(), "xb");
        assert_eq!(buffer.line(2).unwrap().revision(), 1);

        let ids: HashSet<_> = buffer.lines().iter().map(Line::id).collect();
        assert_eq!(ids.len(), buffer.line_count());
    }

    #[test]
    fn test_newline_and_join() {
        let mut buffer = Buffer::from_text("t", "hello world");
        buffer.insert_newline(0, 5);
        assert_eq!(buffer.text(), "hello\n world");

        let second = buffer.line(1).unwrap().id();
        assert_eq!(buffer.join_with_previous(1), Some((5, second)));
        assert_eq!(buffer.text(), "hello world");
        assert_eq!(buffer.join_with_previous(0), None);
    }

    #[test]
    fn test_delete_char() {
        let mut buffer = Buffer::from_text("t", "héllo");
        assert_eq!(buffer.delete_char(0, 1), Some('é'));
        assert_eq!(buffer.text(), "hllo");
        assert_eq!(buffer.delete_char(0, 4), None);
        assert!(buffer.is_modified());
    }

    #[test]
    fn test_generation_counts_edits() {
        let mut buffer = Buffer::from_text("t", "ab
cd");
        assert_eq!(buffer.generation(), 0);
        buffer.insert_char(0, 0, 'x');
        buffer.insert_newline(1, 1);
        buffer.join_line(0);
        assert_eq!(buffer.generation(), 3);

        // Failed edits change nothing
        buffer.delete_char(5, 0);
        buffer.delete_range(0, 2, 1);
        assert_eq!(buffer.generation(), 3);
    }

    #[test]
    fn test_delete_line() {
        let mut buffer = Buffer::from_text("t", "one\ntwo");
        let first = buffer.line(0).unwrap().id();
        assert_eq!(buffer.delete_line(0), Some(first));
        assert_eq!(buffer.text(), "two");

        assert_eq!(buffer.delete_line(0), None);
        assert_eq!(buffer.line_count(), 1);
        assert_eq!(buffer.text(), "");
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("main.go");
        fs::write(&path, "package main\n").unwrap();

        let buffer = Buffer::from_file(&path).unwrap();
        assert_eq!(buffer.name(), "main.go");
        assert_eq!(buffer.filename(), Some(path.as_path()));
        assert!(Buffer::from_file(&dir.path().join("missing")).is_err());
    }
}
