//! Multi-line drawing/message editor (spec §4.6): a cursor (line,
//! column), a line-count limit, a per-line length limit, and a
//! protected prefix per line for header text the user cannot touch.
//! Grounded on `examples/original_source/util/editor/*` and
//! `client/dialogs/messageeditor.hpp` for the protected-prefix and
//! line-limit interaction spec.md only summarizes.

/// One editable line. `protected_prefix` is the count of leading
/// characters the cursor/delete commands may never cross into.
/// `continuation` marks a line as a soft-wrap continuation of the
/// previous line (same paragraph), as opposed to a hard newline break.
#[derive(Debug, Clone)]
struct Line {
    text: String,
    protected_prefix: usize,
    continuation: bool,
}

impl Line {
    fn new(text: impl Into<String>) -> Self {
        Self { text: text.into(), protected_prefix: 0, continuation: false }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    MoveLineUp,
    MoveLineDown,
    MoveCharacterLeft,
    MoveCharacterRight,
    MoveWordLeft,
    MoveWordRight,
    MoveBeginningOfLine,
    MoveEndOfLine,
    MoveBeginningOfDocument,
    MoveEndOfDocument,
    DeleteCharacter,
    DeleteCharacterBackward,
    DeleteLine,
    DeleteEndOfLine,
    DeleteWordBackward,
    DeleteWordForward,
    TransposeCharacters,
    InsertTab,
    InsertNewline,
    InsertNewlineAbove,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertMode {
    Plain,
    WordWrap,
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Greedy word wrap: packs words into lines of at most `limit`
/// characters, breaking at the last space/hyphen/slash at or before
/// the limit. Spaces are consumed at the break; hyphens and slashes
/// stay attached to the word on their left.
fn word_wrap(text: &str, limit: usize) -> Vec<String> {
    let limit = limit.max(1);
    let chars: Vec<char> = text.chars().collect();
    let mut lines = Vec::new();
    let mut start = 0;
    while start < chars.len() {
        let remaining = chars.len() - start;
        if remaining <= limit {
            lines.push(chars[start..].iter().collect::<String>().trim_end().to_string());
            break;
        }
        let mut break_at = None;
        let mut i = (start + limit).min(chars.len());
        while i > start {
            match chars[i - 1] {
                ' ' => {
                    break_at = Some((i - 1, i));
                    break;
                }
                '-' | '/' => {
                    break_at = Some((i, i));
                    break;
                }
                _ => {}
            }
            i -= 1;
        }
        match break_at {
            Some((end, mut next_start)) => {
                lines.push(chars[start..end].iter().collect());
                while next_start < chars.len() && chars[next_start] == ' ' {
                    next_start += 1;
                }
                start = next_start;
            }
            None => {
                let end = (start + limit).min(chars.len());
                lines.push(chars[start..end].iter().collect());
                start = end;
            }
        }
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

pub struct LineEditor {
    lines: Vec<Line>,
    line_limit: usize,
    length_limit: usize,
    cursor: (usize, usize),
}

impl LineEditor {
    pub fn new(line_limit: usize, length_limit: usize) -> Self {
        Self { lines: vec![Line::new("")], line_limit, length_limit, cursor: (0, 0) }
    }

    pub fn cursor(&self) -> (usize, usize) {
        self.cursor
    }

    pub fn set_cursor(&mut self, row: usize, col: usize) {
        let row = row.min(self.lines.len().saturating_sub(1));
        let col = col.min(self.line_len(row));
        self.cursor = (row, col);
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn line_text(&self, row: usize) -> &str {
        &self.lines[row].text
    }

    /// Test/seeding hook: replaces a line's text and protected-prefix
    /// length directly, bypassing the command surface.
    pub fn set_line(&mut self, row: usize, text: impl Into<String>, protected_prefix: usize) {
        while self.lines.len() <= row {
            self.lines.push(Line::new(""));
        }
        self.lines[row] = Line { text: text.into(), protected_prefix, continuation: false };
    }

    fn line_len(&self, row: usize) -> usize {
        self.lines[row].text.chars().count()
    }

    fn editable_start(&self, row: usize) -> usize {
        self.lines[row].protected_prefix
    }

    fn splice_chars(text: &str, start: usize, end: usize, with: &str) -> String {
        let chars: Vec<char> = text.chars().collect();
        let mut out: String = chars[..start.min(chars.len())].iter().collect();
        out.push_str(with);
        out.push_str(&chars[end.min(chars.len())..].iter().collect::<String>());
        out
    }

    pub fn execute(&mut self, cmd: Command) {
        match cmd {
            Command::MoveLineUp => self.move_line(-1),
            Command::MoveLineDown => self.move_line(1),
            Command::MoveCharacterLeft => {
                let (row, col) = self.cursor;
                if col > self.editable_start(row) {
                    self.cursor = (row, col - 1);
                }
            }
            Command::MoveCharacterRight => {
                let (row, col) = self.cursor;
                if col < self.line_len(row) {
                    self.cursor = (row, col + 1);
                }
            }
            Command::MoveWordLeft => self.move_word(-1),
            Command::MoveWordRight => self.move_word(1),
            Command::MoveBeginningOfLine => {
                let (row, col) = self.cursor;
                let start = self.editable_start(row);
                self.cursor = (row, if col > start { start } else { 0 });
            }
            Command::MoveEndOfLine => {
                let row = self.cursor.0;
                self.cursor = (row, self.line_len(row));
            }
            Command::MoveBeginningOfDocument => {
                self.cursor = (0, self.editable_start(0));
            }
            Command::MoveEndOfDocument => {
                let row = self.lines.iter().rposition(|l| !l.text.is_empty()).unwrap_or(0);
                self.cursor = (row, self.line_len(row));
            }
            Command::DeleteCharacter => self.delete_character(),
            Command::DeleteCharacterBackward => self.delete_character_backward(),
            Command::DeleteLine => self.delete_line(),
            Command::DeleteEndOfLine => self.delete_end_of_line(),
            Command::DeleteWordBackward => self.delete_word_backward(),
            Command::DeleteWordForward => self.delete_word_forward(),
            Command::TransposeCharacters => self.transpose_characters(),
            Command::InsertTab => self.insert_tab(),
            Command::InsertNewline => self.insert_newline(),
            Command::InsertNewlineAbove => self.insert_newline_above(),
        }
    }

    fn move_line(&mut self, delta: i32) {
        let (row, col) = self.cursor;
        let new_row = row as i32 + delta;
        if new_row < 0 || new_row as usize >= self.lines.len() {
            return;
        }
        let new_row = new_row as usize;
        self.cursor = (new_row, col.min(self.line_len(new_row)).max(self.editable_start(new_row)));
    }

    fn move_word(&mut self, delta: i32) {
        if delta > 0 {
            let (mut row, mut col) = self.cursor;
            loop {
                let chars: Vec<char> = self.lines[row].text.chars().collect();
                while col < chars.len() && !is_word_char(chars[col]) {
                    col += 1;
                }
                while col < chars.len() && is_word_char(chars[col]) {
                    col += 1;
                }
                if col < chars.len() || row + 1 >= self.lines.len() {
                    break;
                }
                row += 1;
                col = self.editable_start(row);
                if !self.lines[row].text.is_empty() {
                    break;
                }
            }
            self.cursor = (row, col);
        } else {
            let (mut row, mut col) = self.cursor;
            loop {
                if col == self.editable_start(row) {
                    if row == 0 {
                        break;
                    }
                    row -= 1;
                    col = self.line_len(row);
                    continue;
                }
                let chars: Vec<char> = self.lines[row].text.chars().collect();
                while col > self.editable_start(row) && !is_word_char(chars[col - 1]) {
                    col -= 1;
                }
                while col > self.editable_start(row) && is_word_char(chars[col - 1]) {
                    col -= 1;
                }
                break;
            }
            self.cursor = (row, col);
        }
    }

    fn delete_character(&mut self) {
        let (row, col) = self.cursor;
        if col < self.line_len(row) {
            self.lines[row].text = Self::splice_chars(&self.lines[row].text, col, col + 1, "");
        } else if row + 1 < self.lines.len() && self.lines[row + 1].protected_prefix == 0 {
            let joined_len = self.line_len(row) + self.line_len(row + 1);
            if joined_len <= self.length_limit {
                let next = self.lines.remove(row + 1);
                self.lines[row].text.push_str(&next.text);
            }
        }
    }

    fn delete_character_backward(&mut self) {
        let (row, col) = self.cursor;
        let start = self.editable_start(row);
        if col > start {
            self.lines[row].text = Self::splice_chars(&self.lines[row].text, col - 1, col, "");
            self.cursor = (row, col - 1);
        } else if row > 0 && start == 0 {
            let prev_len = self.line_len(row - 1);
            let joined_len = prev_len + self.line_len(row);
            if joined_len <= self.length_limit {
                let current = self.lines.remove(row);
                self.lines[row - 1].text.push_str(&current.text);
                self.cursor = (row - 1, prev_len);
            }
        }
    }

    fn delete_line(&mut self) {
        let row = self.cursor.0;
        let prefix = self.editable_start(row);
        if prefix == 0 {
            if self.lines.len() > 1 {
                self.lines.remove(row);
                let row = row.min(self.lines.len() - 1);
                self.cursor = (row, self.editable_start(row));
            } else {
                self.lines[0].text.clear();
                self.cursor = (0, 0);
            }
        } else {
            self.lines[row].text = Self::splice_chars(&self.lines[row].text, prefix, self.line_len(row), "");
            self.cursor = (row, prefix);
        }
    }

    fn delete_end_of_line(&mut self) {
        let (row, col) = self.cursor;
        if col < self.line_len(row) {
            self.lines[row].text = Self::splice_chars(&self.lines[row].text, col, self.line_len(row), "");
        } else if row + 1 < self.lines.len() && self.lines[row + 1].protected_prefix == 0 {
            let next = self.lines.remove(row + 1);
            self.lines[row].text.push_str(&next.text);
        }
    }

    fn delete_word_backward(&mut self) {
        let before = self.cursor;
        self.move_word(-1);
        let (row, col) = self.cursor;
        if row == before.0 {
            self.lines[row].text = Self::splice_chars(&self.lines[row].text, col, before.1, "");
        } else {
            // crossed a line boundary joining backward: delete from the
            // landing column to the end of that line, then join forward.
            self.lines[row].text = Self::splice_chars(&self.lines[row].text, col, self.line_len(row), "");
            self.delete_character();
        }
        self.rewrap_paragraph(row);
    }

    fn delete_word_forward(&mut self) {
        let before = self.cursor;
        let saved = self.cursor;
        self.move_word(1);
        let (end_row, end_col) = self.cursor;
        self.cursor = saved;
        if end_row == before.0 {
            self.lines[before.0].text = Self::splice_chars(&self.lines[before.0].text, before.1, end_col, "");
        } else {
            self.lines[before.0].text = Self::splice_chars(&self.lines[before.0].text, before.1, self.line_len(before.0), "");
            self.delete_character();
        }
        self.rewrap_paragraph(before.0);
    }

    /// Re-flows a paragraph (the given row plus any following
    /// continuation lines) through word-wrap after a word deletion.
    fn rewrap_paragraph(&mut self, row: usize) {
        if row >= self.lines.len() {
            return;
        }
        let mut end_row = row;
        while end_row + 1 < self.lines.len() && self.lines[end_row + 1].continuation {
            end_row += 1;
        }
        let prefix_len = self.lines[row].protected_prefix;
        let mut pool = String::new();
        for (i, line) in self.lines[row..=end_row].iter().enumerate() {
            if i > 0 {
                pool.push(' ');
            }
            pool.push_str(&line.text);
        }
        let wrapped = word_wrap(&pool, self.length_limit);
        let (cursor_row, cursor_col) = self.cursor;
        let new_lines: Vec<Line> = wrapped
            .into_iter()
            .enumerate()
            .map(|(i, text)| Line { text, protected_prefix: if i == 0 { prefix_len } else { 0 }, continuation: i > 0 })
            .collect();
        self.lines.splice(row..=end_row, new_lines);
        if cursor_row >= row && cursor_row <= end_row {
            self.cursor = (row, cursor_col.min(self.line_len(row)));
        }
    }

    fn transpose_characters(&mut self) {
        let (row, col) = self.cursor;
        let len = self.line_len(row);
        let (a, b) = if col < len && col > 0 { (col - 1, col) } else if len >= 2 { (len - 2, len - 1) } else { return };
        let chars: Vec<char> = self.lines[row].text.chars().collect();
        if a >= chars.len() || b >= chars.len() {
            return;
        }
        let mut swapped = chars.clone();
        swapped.swap(a, b);
        self.lines[row].text = swapped.into_iter().collect();
        self.cursor = (row, (b + 1).min(len));
    }

    /// Aligns to the next tab stop inferred from the start columns of
    /// whitespace-separated fields on the previous line, falling back to
    /// the next multiple of 8.
    fn insert_tab(&mut self) {
        let (row, col) = self.cursor;
        let target = if row > 0 {
            let prev: Vec<char> = self.lines[row - 1].text.chars().collect();
            let mut field_starts = Vec::new();
            let mut in_field = false;
            for (i, c) in prev.iter().enumerate() {
                let is_space = c.is_whitespace();
                if !is_space && !in_field {
                    field_starts.push(i);
                    in_field = true;
                } else if is_space {
                    in_field = false;
                }
            }
            field_starts.into_iter().find(|&c| c > col)
        } else {
            None
        };
        let target = target.unwrap_or_else(|| (col / 8 + 1) * 8);
        if target > col {
            let pad = " ".repeat(target - col);
            self.lines[row].text = Self::splice_chars(&self.lines[row].text, col, col, &pad);
            self.cursor = (row, target);
        }
    }

    fn insert_newline(&mut self) {
        let (row, col) = self.cursor;
        if self.lines.len() >= self.line_limit {
            return;
        }
        let tail: String = self.lines[row].text.chars().skip(col).collect();
        self.lines[row].text = Self::splice_chars(&self.lines[row].text, col, self.line_len(row), "");
        self.lines.insert(row + 1, Line::new(tail));
        self.cursor = (row + 1, 0);
    }

    fn insert_newline_above(&mut self) {
        let row = self.cursor.0;
        if self.lines.len() >= self.line_limit {
            return;
        }
        self.lines.insert(row, Line::new(""));
        self.cursor = (row + 1, self.cursor.1);
    }

    pub fn handle_insert(&mut self, mode: InsertMode, text: &str) {
        match mode {
            InsertMode::Plain => self.handle_insert_plain(text),
            InsertMode::WordWrap => self.handle_insert_word_wrap(text),
        }
    }

    fn handle_insert_plain(&mut self, text: &str) {
        let (row, col) = self.cursor;
        self.lines[row].text = Self::splice_chars(&self.lines[row].text, col, col, text);
        self.cursor = (row, col + text.chars().count());
    }

    fn handle_insert_word_wrap(&mut self, text: &str) {
        let (row, col) = self.cursor;
        let chars: Vec<char> = self.lines[row].text.chars().collect();
        let prefix: String = chars[..col.min(chars.len())].iter().collect();
        let suffix: String = chars[col.min(chars.len())..].iter().collect();

        let mut pool = prefix;
        pool.push_str(text);
        let boundary = pool.chars().count();
        pool.push_str(&suffix);

        let mut end_row = row;
        while end_row + 1 < self.lines.len() && self.lines[end_row + 1].continuation {
            end_row += 1;
            pool.push(' ');
            pool.push_str(&self.lines[end_row].text);
        }

        let wrapped = word_wrap(&pool, self.length_limit);

        let mut remaining = boundary;
        let mut cursor_row = 0;
        let mut cursor_col = 0;
        for (i, wline) in wrapped.iter().enumerate() {
            let consumed = wline.chars().count();
            if remaining <= consumed {
                cursor_row = i;
                cursor_col = remaining;
                break;
            }
            remaining = remaining.saturating_sub(consumed + 1);
            cursor_row = i + 1;
            cursor_col = 0;
        }

        let prefix_len = self.lines[row].protected_prefix;
        let new_lines: Vec<Line> = wrapped
            .into_iter()
            .enumerate()
            .map(|(i, text)| Line { text, protected_prefix: if i == 0 { prefix_len } else { 0 }, continuation: i > 0 })
            .collect();
        self.lines.splice(row..=end_row, new_lines);
        self.cursor = (row + cursor_row, cursor_col);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn s4_word_wrap_splits_at_the_last_break_before_the_limit() {
        let mut ed = LineEditor::new(20, 12);
        ed.set_line(0, "some text", 0);
        ed.set_cursor(0, 5);
        ed.handle_insert(InsertMode::WordWrap, "more ");
        assert_eq!(ed.line_text(0), "some more");
        assert_eq!(ed.line_text(1), "text");
        assert_eq!(ed.cursor(), (1, 0));
    }

    #[test]
    fn s4_word_wrap_produces_a_four_line_paragraph() {
        let mut ed = LineEditor::new(20, 12);
        ed.set_line(0, "some text", 0);
        ed.set_cursor(0, 5);
        ed.handle_insert(InsertMode::WordWrap, "more new exciting really long new ");
        assert_eq!(ed.line_text(0), "some more");
        assert_eq!(ed.line_text(1), "new exciting");
        assert_eq!(ed.line_text(2), "really long");
        assert_eq!(ed.line_text(3), "new text");
        assert_eq!(ed.cursor(), (3, 4));
    }

    #[test]
    fn move_beginning_of_line_stops_at_protected_prefix_then_column_zero() {
        let mut ed = LineEditor::new(10, 40);
        ed.set_line(0, "TO: Fred hello there", 9);
        ed.set_cursor(0, 15);
        ed.execute(Command::MoveBeginningOfLine);
        assert_eq!(ed.cursor(), (0, 9));
        ed.execute(Command::MoveBeginningOfLine);
        assert_eq!(ed.cursor(), (0, 0));
    }

    #[test]
    fn delete_character_backward_joins_lines_at_the_boundary() {
        let mut ed = LineEditor::new(10, 40);
        ed.set_line(0, "hello", 0);
        ed.set_line(1, "world", 0);
        ed.set_cursor(1, 0);
        ed.execute(Command::DeleteCharacterBackward);
        assert_eq!(ed.line_count(), 1);
        assert_eq!(ed.line_text(0), "helloworld");
        assert_eq!(ed.cursor(), (0, 5));
    }

    #[test]
    fn delete_character_backward_refuses_to_cross_a_protected_prefix() {
        let mut ed = LineEditor::new(10, 40);
        ed.set_line(0, "TO: x", 4);
        ed.set_cursor(0, 4);
        ed.execute(Command::DeleteCharacterBackward);
        assert_eq!(ed.cursor(), (0, 4));
        assert_eq!(ed.line_text(0), "TO: x");
    }

    #[test]
    fn transpose_characters_swaps_across_the_cursor() {
        let mut ed = LineEditor::new(10, 40);
        ed.set_line(0, "hlelo", 0);
        ed.set_cursor(0, 2);
        ed.execute(Command::TransposeCharacters);
        assert_eq!(ed.line_text(0), "hello");
    }

    #[test]
    fn insert_newline_splits_the_line_at_cursor() {
        let mut ed = LineEditor::new(10, 40);
        ed.set_line(0, "hello world", 0);
        ed.set_cursor(0, 5);
        ed.execute(Command::InsertNewline);
        assert_eq!(ed.line_text(0), "hello");
        assert_eq!(ed.line_text(1), " world");
        assert_eq!(ed.cursor(), (1, 0));
    }

    #[test]
    fn move_word_right_advances_past_the_current_word() {
        let mut ed = LineEditor::new(10, 40);
        ed.set_line(0, "foo, bar", 0);
        ed.set_cursor(0, 0);
        ed.execute(Command::MoveWordRight);
        assert_eq!(ed.cursor(), (0, 3));
    }
}
