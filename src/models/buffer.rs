use unicode_width::UnicodeWidthStr;

/// Editable code text with a cursor. Columns are counted in chars.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeBuffer {
    lines: Vec<String>,
    row: usize,
    col: usize,
    pub scroll: usize,
}

impl Default for CodeBuffer {
    fn default() -> Self {
        Self::from_text("")
    }
}

impl CodeBuffer {
    pub fn from_text(text: &str) -> Self {
        let mut lines: Vec<String> = text.split('\n').map(str::to_string).collect();
        if lines.is_empty() {
            lines.push(String::new());
        }

        Self {
            lines,
            row: 0,
            col: 0,
            scroll: 0,
        }
    }

    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    /// Swaps in new text, keeping the cursor where it still fits
    pub fn replace(&mut self, text: &str) {
        let (row, col) = (self.row, self.col);
        *self = Self::from_text(text);
        self.row = row.min(self.lines.len() - 1);
        self.col = col.min(self.line_len(self.row));
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn cursor(&self) -> (usize, usize) {
        (self.row, self.col)
    }

    /// Display column of the cursor, accounting for wide characters
    pub fn cursor_display_col(&self) -> usize {
        let prefix: String = self.lines[self.row].chars().take(self.col).collect();
        prefix.width()
    }

    fn line_len(&self, row: usize) -> usize {
        self.lines[row].chars().count()
    }

    fn byte_index(&self, row: usize, col: usize) -> usize {
        self.lines[row]
            .char_indices()
            .nth(col)
            .map(|(i, _)| i)
            .unwrap_or(self.lines[row].len())
    }

    pub fn insert_char(&mut self, c: char) {
        let at = self.byte_index(self.row, self.col);
        self.lines[self.row].insert(at, c);
        self.col += 1;
    }

    pub fn insert_str(&mut self, text: &str) {
        for c in text.chars() {
            if c == '\n' {
                self.split_line();
            } else {
                self.insert_char(c);
            }
        }
    }

    /// Inserts spaces up to the next multiple of `tab_size`
    pub fn insert_tab(&mut self, tab_size: usize) {
        let tab_size = tab_size.max(1);
        let spaces = tab_size - self.col % tab_size;
        self.insert_str(&" ".repeat(spaces));
    }

    fn split_line(&mut self) {
        let at = self.byte_index(self.row, self.col);
        let rest = self.lines[self.row].split_off(at);
        self.lines.insert(self.row + 1, rest);
        self.row += 1;
        self.col = 0;
    }

    /// Breaks the line at the cursor and carries the indentation over
    pub fn newline(&mut self) {
        let indent: String = self.lines[self.row]
            .chars()
            .take_while(|c| *c == ' ' || *c == '\t')
            .take(self.col)
            .collect();
        self.split_line();
        self.insert_str(&indent);
    }

    pub fn backspace(&mut self) {
        if self.col > 0 {
            let start = self.byte_index(self.row, self.col - 1);
            let end = self.byte_index(self.row, self.col);
            self.lines[self.row].replace_range(start..end, "");
            self.col -= 1;
        } else if self.row > 0 {
            let line = self.lines.remove(self.row);
            self.row -= 1;
            self.col = self.line_len(self.row);
            self.lines[self.row].push_str(&line);
        }
    }

    pub fn delete(&mut self) {
        if self.col < self.line_len(self.row) {
            let start = self.byte_index(self.row, self.col);
            let end = self.byte_index(self.row, self.col + 1);
            self.lines[self.row].replace_range(start..end, "");
        } else if self.row + 1 < self.lines.len() {
            let next = self.lines.remove(self.row + 1);
            self.lines[self.row].push_str(&next);
        }
    }

    pub fn move_left(&mut self) {
        if self.col > 0 {
            self.col -= 1;
        } else if self.row > 0 {
            self.row -= 1;
            self.col = self.line_len(self.row);
        }
    }

    pub fn move_right(&mut self) {
        if self.col < self.line_len(self.row) {
            self.col += 1;
        } else if self.row + 1 < self.lines.len() {
            self.row += 1;
            self.col = 0;
        }
    }

    pub fn move_up(&mut self, count: usize) {
        self.row = self.row.saturating_sub(count);
        self.col = self.col.min(self.line_len(self.row));
    }

    pub fn move_down(&mut self, count: usize) {
        self.row = (self.row + count).min(self.lines.len() - 1);
        self.col = self.col.min(self.line_len(self.row));
    }

    pub fn move_home(&mut self) {
        self.col = 0;
    }

    pub fn move_end(&mut self) {
        self.col = self.line_len(self.row);
    }

    /// Keeps the cursor row inside a viewport of `height` rows
    pub fn scroll_to_cursor(&mut self, height: usize) {
        if height == 0 {
            return;
        }
        if self.row < self.scroll {
            self.scroll = self.row;
        } else if self.row >= self.scroll + height {
            self.scroll = self.row + 1 - height;
        }
    }
}
