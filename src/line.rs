//! Line representation and text operations
//!
//! Every line carries a stable id, assigned by its buffer, and a revision
//! that moves forward on each edit. The pair is the highlight cache key.

use unicode_width::UnicodeWidthChar;

use crate::syntax::RegionId;

/// A single line of text in a buffer
#[derive(Debug, Clone)]
pub struct Line {
    /// Stable identity, unchanged by edits
    id: RegionId,
    /// Bumped on every edit of `text`
    revision: u64,
    /// The text content (without trailing newline)
    text: String,
}

impl Line {
    /// Create a new empty line
    pub fn new(id: RegionId) -> Self {
        Self::from_string(id, String::new())
    }

    /// Create a line from a string
    pub fn from_string(id: RegionId, text: String) -> Self {
        Self { id, revision: 0, text }
    }

    pub fn id(&self) -> RegionId {
        self.id
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Get the text content
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Get the length in bytes
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Check if the line is empty
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Get the display width of the line
    pub fn display_width(&self) -> usize {
        self.text.chars().map(char_width).sum()
    }

    fn touch(&mut self) {
        self.revision += 1;
    }

    /// Insert a character at byte position
    pub fn insert_char(&mut self, byte_pos: usize, ch: char) {
        self.text.insert(byte_pos, ch);
        self.touch();
    }

    /// Insert a string at byte position
    pub fn insert_str(&mut self, byte_pos: usize, s: &str) {
        self.text.insert_str(byte_pos, s);
        self.touch();
    }

    /// Delete a range of bytes and return the deleted text
    pub fn delete_range(&mut self, start: usize, end: usize) -> String {
        let deleted: String = self.text[start..end].to_string();
        self.text.replace_range(start..end, "");
        self.touch();
        deleted
    }

    /// Split the line at byte position, returning the remainder
    pub fn split_off(&mut self, byte_pos: usize) -> String {
        let remainder = self.text.split_off(byte_pos);
        self.touch();
        remainder
    }

    /// Append a string to this line
    pub fn append_str(&mut self, s: &str) {
        self.text.push_str(s);
        self.touch();
    }

    /// Clear the line content
    pub fn clear(&mut self) {
        self.text.clear();
        self.touch();
    }

    /// Leading whitespace
    pub fn indentation(&self) -> &str {
        let end = self.text.len() - self.text.trim_start_matches([' ', '\t']).len();
        &self.text[..end]
    }

    /// Get byte position for a given column (display position)
    /// Returns None if column is beyond line end
    pub fn col_to_byte(&self, col: usize) -> Option<usize> {
        let mut current_col = 0;
        for (byte_idx, ch) in self.text.char_indices() {
            if current_col >= col {
                return Some(byte_idx);
            }
            current_col += char_width(ch);
        }
        if current_col >= col {
            Some(self.text.len())
        } else {
            None
        }
    }

    /// Get column (display position) for a given byte position
    pub fn byte_to_col(&self, byte_pos: usize) -> usize {
        self.text[..byte_pos.min(self.text.len())]
            .chars()
            .map(char_width)
            .sum()
    }

    /// Byte position of the character before `byte_pos`
    pub fn prev_boundary(&self, byte_pos: usize) -> Option<usize> {
        self.text[..byte_pos.min(self.text.len())]
            .char_indices()
            .next_back()
            .map(|(pos, _)| pos)
    }

    /// Byte position of the character after `byte_pos`
    pub fn next_boundary(&self, byte_pos: usize) -> Option<usize> {
        self.text[byte_pos..].chars().next().map(|ch| byte_pos + ch.len_utf8())
    }
}

/// Display width of one character; control characters such as tab take one cell
pub fn char_width(ch: char) -> usize {
    ch.width().unwrap_or(1)
}
