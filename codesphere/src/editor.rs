//! Embedded text-editing widget: a line-based buffer with a cursor.
//!
//! The buffer is the editing collaborator the rest of the application treats
//! as a black box: it consumes the active file's text, produces a replaced
//! wholesale snapshot via [`EditorBuffer::to_text`] after every mutation,
//! and knows nothing about files, reviews, or persistence. Column positions
//! are char indices, not byte offsets, so multi-byte input behaves.

/// Line-based editable buffer. Always holds at least one (possibly empty)
/// line.
#[derive(Debug, Clone)]
pub struct EditorBuffer {
    lines: Vec<String>,
    cursor_row: usize,
    cursor_col: usize,
    /// Vertical scroll offset of the viewport, maintained by
    /// [`EditorBuffer::ensure_cursor_visible`].
    pub scroll: u16,
}

/// Byte offset of char index `col` within `line` (end of line if past it).
fn byte_index(line: &str, col: usize) -> usize {
    line.char_indices()
        .nth(col)
        .map(|(i, _)| i)
        .unwrap_or(line.len())
}

impl EditorBuffer {
    /// Builds a buffer from a text snapshot, cursor at the origin.
    pub fn from_text(text: &str) -> Self {
        let lines: Vec<String> = if text.is_empty() {
            vec![String::new()]
        } else {
            text.split('\n').map(str::to_owned).collect()
        };
        Self { lines, cursor_row: 0, cursor_col: 0, scroll: 0 }
    }

    /// The buffer contents as a single newline-joined snapshot.
    pub fn to_text(&self) -> String {
        self.lines.join("\n")
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Cursor as (row, char-column).
    pub fn cursor(&self) -> (usize, usize) {
        (self.cursor_row, self.cursor_col)
    }

    fn current_line(&self) -> &str {
        &self.lines[self.cursor_row]
    }

    fn current_line_chars(&self) -> usize {
        self.current_line().chars().count()
    }

    /// Inserts `c` at the cursor and advances one column.
    pub fn insert_char(&mut self, c: char) {
        let at = byte_index(self.current_line(), self.cursor_col);
        self.lines[self.cursor_row].insert(at, c);
        self.cursor_col += 1;
    }

    /// Inserts `width` spaces (the Tab key).
    pub fn insert_tab(&mut self, width: u8) {
        for _ in 0..width.max(1) {
            self.insert_char(' ');
        }
    }

    /// Splits the current line at the cursor.
    pub fn insert_newline(&mut self) {
        let at = byte_index(self.current_line(), self.cursor_col);
        let rest = self.lines[self.cursor_row].split_off(at);
        self.lines.insert(self.cursor_row + 1, rest);
        self.cursor_row += 1;
        self.cursor_col = 0;
    }

    /// Removes the char before the cursor, joining lines at column zero.
    pub fn backspace(&mut self) {
        if self.cursor_col > 0 {
            let at = byte_index(self.current_line(), self.cursor_col - 1);
            self.lines[self.cursor_row].remove(at);
            self.cursor_col -= 1;
        } else if self.cursor_row > 0 {
            let tail = self.lines.remove(self.cursor_row);
            self.cursor_row -= 1;
            self.cursor_col = self.current_line_chars();
            self.lines[self.cursor_row].push_str(&tail);
        }
    }

    /// Removes the char under the cursor, joining lines at line end.
    pub fn delete_forward(&mut self) {
        if self.cursor_col < self.current_line_chars() {
            let at = byte_index(self.current_line(), self.cursor_col);
            self.lines[self.cursor_row].remove(at);
        } else if self.cursor_row + 1 < self.lines.len() {
            let tail = self.lines.remove(self.cursor_row + 1);
            self.lines[self.cursor_row].push_str(&tail);
        }
    }

    pub fn move_left(&mut self) {
        if self.cursor_col > 0 {
            self.cursor_col -= 1;
        } else if self.cursor_row > 0 {
            self.cursor_row -= 1;
            self.cursor_col = self.current_line_chars();
        }
    }

    pub fn move_right(&mut self) {
        if self.cursor_col < self.current_line_chars() {
            self.cursor_col += 1;
        } else if self.cursor_row + 1 < self.lines.len() {
            self.cursor_row += 1;
            self.cursor_col = 0;
        }
    }

    pub fn move_up(&mut self) {
        if self.cursor_row > 0 {
            self.cursor_row -= 1;
            self.cursor_col = self.cursor_col.min(self.current_line_chars());
        }
    }

    pub fn move_down(&mut self) {
        if self.cursor_row + 1 < self.lines.len() {
            self.cursor_row += 1;
            self.cursor_col = self.cursor_col.min(self.current_line_chars());
        }
    }

    pub fn move_line_start(&mut self) {
        self.cursor_col = 0;
    }

    pub fn move_line_end(&mut self) {
        self.cursor_col = self.current_line_chars();
    }

    /// Adjusts `scroll` so the cursor row stays inside the viewport with
    /// `margin` rows of context, where the viewport height allows it.
    pub fn ensure_cursor_visible(&mut self, viewport_height: u16, margin: u8) {
        if viewport_height == 0 {
            return;
        }
        let height = viewport_height as usize;
        let margin = (margin as usize).min(height.saturating_sub(1) / 2);
        let top = self.scroll as usize;
        let bottom = top + height;

        if self.cursor_row < top + margin {
            self.scroll = self.cursor_row.saturating_sub(margin) as u16;
        } else if self.cursor_row + margin >= bottom {
            self.scroll = (self.cursor_row + margin + 1 - height) as u16;
        }
    }
}

impl Default for EditorBuffer {
    fn default() -> Self {
        Self::from_text("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_text() {
        let text = "fn main() {\n    println!(\"hi\");\n}";
        assert_eq!(EditorBuffer::from_text(text).to_text(), text);
        assert_eq!(EditorBuffer::from_text("").to_text(), "");
    }

    #[test]
    fn typing_builds_lines() {
        let mut buf = EditorBuffer::from_text("");
        for c in "ab".chars() {
            buf.insert_char(c);
        }
        buf.insert_newline();
        buf.insert_char('c');
        assert_eq!(buf.to_text(), "ab\nc");
        assert_eq!(buf.cursor(), (1, 1));
    }

    #[test]
    fn backspace_joins_lines_at_column_zero() {
        let mut buf = EditorBuffer::from_text("ab\ncd");
        buf.move_down();
        buf.backspace();
        assert_eq!(buf.to_text(), "abcd");
        assert_eq!(buf.cursor(), (0, 2));
    }

    #[test]
    fn delete_forward_joins_lines_at_line_end() {
        let mut buf = EditorBuffer::from_text("ab\ncd");
        buf.move_line_end();
        buf.delete_forward();
        assert_eq!(buf.to_text(), "abcd");
    }

    #[test]
    fn newline_splits_mid_line() {
        let mut buf = EditorBuffer::from_text("abcd");
        buf.move_right();
        buf.move_right();
        buf.insert_newline();
        assert_eq!(buf.to_text(), "ab\ncd");
        assert_eq!(buf.cursor(), (1, 0));
    }

    #[test]
    fn multibyte_chars_edit_by_char_not_byte() {
        let mut buf = EditorBuffer::from_text("héllo");
        buf.move_right();
        buf.move_right();
        buf.backspace();
        assert_eq!(buf.to_text(), "hllo");
        buf.insert_char('ø');
        assert_eq!(buf.to_text(), "høllo");
    }

    #[test]
    fn vertical_moves_clamp_the_column() {
        let mut buf = EditorBuffer::from_text("abcdef\nxy");
        buf.move_line_end();
        buf.move_down();
        assert_eq!(buf.cursor(), (1, 2));
    }

    #[test]
    fn scroll_follows_the_cursor() {
        let text = vec!["x"; 50].join("\n");
        let mut buf = EditorBuffer::from_text(&text);
        for _ in 0..30 {
            buf.move_down();
        }
        buf.ensure_cursor_visible(10, 2);
        let top = buf.scroll as usize;
        assert!(top <= 30 && 30 < top + 10);

        for _ in 0..25 {
            buf.move_up();
        }
        buf.ensure_cursor_visible(10, 2);
        assert!(buf.scroll as usize <= 5);
    }
}
