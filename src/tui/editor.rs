use std::cmp::min;

use crate::card::Section;

const QUESTION_ROW: usize = 2;

/// Multi-line text buffer pre-filled with the three flashcard sections.
pub struct Editor {
    lines: Vec<String>,
    cursor_row: usize,
    cursor_col: usize,
    scroll_top: usize,
}

impl Editor {
    pub fn new() -> Self {
        let lines = Self::template_lines("");
        let cursor_col = lines[0].chars().count();
        Self {
            lines,
            cursor_row: 0,
            cursor_col,
            scroll_top: 0,
        }
    }

    fn template_lines(topic: &str) -> Vec<String> {
        vec![
            format!("{} {}", Section::Topic.marker(), topic),
            String::new(),
            Section::Question.marker().to_string(),
            String::new(),
            String::new(),
            Section::Answer.marker().to_string(),
            String::new(),
        ]
    }

    pub fn content(&self) -> String {
        self.lines.join("\n")
    }

    pub fn clear(&mut self) {
        *self = Self::new();
    }

    /// Starts a fresh card under the same topic, cursor on the question.
    pub fn next_card(&mut self, topic: &str) {
        self.lines = Self::template_lines(topic.trim());
        self.cursor_row = QUESTION_ROW + 1;
        self.cursor_col = 0;
        self.scroll_top = 0;
    }

    pub fn cursor(&self) -> (usize, usize) {
        (self.cursor_row, self.cursor_col)
    }

    pub fn scroll_top(&self) -> usize {
        self.scroll_top
    }

    pub fn ensure_cursor_visible(&mut self, view_height: usize) {
        if view_height == 0 {
            self.scroll_top = 0;
            return;
        }

        if self.cursor_row < self.scroll_top {
            self.scroll_top = self.cursor_row;
        } else {
            let bottom = self.scroll_top + view_height - 1;
            if self.cursor_row > bottom {
                self.scroll_top = self.cursor_row + 1 - view_height;
            }
        }
    }

    pub fn insert_char(&mut self, ch: char) {
        let column = self.cursor_col;
        let line = self.current_line_mut();
        let idx = Self::char_to_byte_index(line, column);
        line.insert(idx, ch);
        self.cursor_col += 1;
    }

    pub fn insert_newline(&mut self) {
        let column = self.cursor_col;
        let line = self.current_line_mut();
        let idx = Self::char_to_byte_index(line, column);
        let remainder = line.split_off(idx);
        self.lines.insert(self.cursor_row + 1, remainder);
        self.cursor_row += 1;
        self.cursor_col = 0;
    }

    pub fn insert_tab(&mut self) {
        self.insert_char('\t');
    }

    pub fn backspace(&mut self) {
        if self.cursor_col > 0 {
            let column = self.cursor_col;
            let line = self.current_line_mut();
            let end = Self::char_to_byte_index(line, column);
            let start = Self::char_to_byte_index(line, column - 1);
            line.drain(start..end);
            self.cursor_col -= 1;
            return;
        }

        if self.cursor_row == 0 {
            return;
        }

        let current_line = self.lines.remove(self.cursor_row);
        self.cursor_row -= 1;
        let new_col = self.line_len(self.cursor_row);
        self.cursor_col = new_col;
        let prev_line = self.current_line_mut();
        prev_line.push_str(&current_line);
    }

    pub fn delete(&mut self) {
        let line_len = self.line_len(self.cursor_row);
        if self.cursor_col < line_len {
            let column = self.cursor_col;
            let line = self.current_line_mut();
            let start = Self::char_to_byte_index(line, column);
            let end = Self::char_to_byte_index(line, column + 1);
            line.drain(start..end);
            return;
        }

        if self.cursor_row + 1 >= self.lines.len() {
            return;
        }

        let next_line = self.lines.remove(self.cursor_row + 1);
        let line = self.current_line_mut();
        line.push_str(&next_line);
    }

    pub fn move_left(&mut self) {
        if self.cursor_col > 0 {
            self.cursor_col -= 1;
        } else if self.cursor_row > 0 {
            self.cursor_row -= 1;
            self.cursor_col = self.line_len(self.cursor_row);
        }
    }

    pub fn move_right(&mut self) {
        let line_len = self.line_len(self.cursor_row);
        if self.cursor_col < line_len {
            self.cursor_col += 1;
        } else if self.cursor_row + 1 < self.lines.len() {
            self.cursor_row += 1;
            self.cursor_col = 0;
        }
    }

    pub fn move_up(&mut self) {
        if self.cursor_row == 0 {
            return;
        }
        self.cursor_row -= 1;
        self.cursor_col = min(self.cursor_col, self.line_len(self.cursor_row));
    }

    pub fn move_down(&mut self) {
        if self.cursor_row + 1 >= self.lines.len() {
            return;
        }
        self.cursor_row += 1;
        self.cursor_col = min(self.cursor_col, self.line_len(self.cursor_row));
    }

    pub fn move_home(&mut self) {
        self.cursor_col = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor_col = self.line_len(self.cursor_row);
    }

    fn current_line_mut(&mut self) -> &mut String {
        if self.lines.is_empty() {
            self.lines.push(String::new());
        }
        &mut self.lines[self.cursor_row]
    }

    fn line_len(&self, row: usize) -> usize {
        self.lines
            .get(row)
            .map(|line| line.chars().count())
            .unwrap_or(0)
    }

    fn char_to_byte_index(line: &str, column: usize) -> usize {
        line.char_indices()
            .nth(column)
            .map(|(idx, _)| idx)
            .unwrap_or_else(|| line.len())
    }
}

impl Default for Editor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn type_str(editor: &mut Editor, text: &str) {
        for c in text.chars() {
            if c == '\n' {
                editor.insert_newline();
            } else {
                editor.insert_char(c);
            }
        }
    }

    #[test]
    fn template_parses_once_filled_in() {
        let mut editor = Editor::new();
        type_str(&mut editor, "Math");
        editor.move_down();
        editor.move_down();
        editor.move_down();
        type_str(&mut editor, "What is 2+2?");
        for _ in 0..3 {
            editor.move_down();
        }
        editor.move_home();
        type_str(&mut editor, "4");

        let card = parse(&editor.content()).unwrap();
        assert_eq!(card.topic, "Math");
        assert_eq!(card.question, "What is 2+2?");
        assert_eq!(card.answer, "4");
    }

    #[test]
    fn next_card_keeps_topic() {
        let mut editor = Editor::new();
        type_str(&mut editor, "History");
        editor.next_card("History");
        assert_eq!(editor.cursor(), (3, 0));
        type_str(&mut editor, "Who?");
        let card = parse(&editor.content()).unwrap();
        assert_eq!(card.topic, "History");
        assert_eq!(card.question, "Who?");
    }

    #[test]
    fn backspace_joins_lines() {
        let mut editor = Editor::new();
        editor.move_down();
        editor.backspace();
        assert_eq!(editor.cursor(), (0, 7));
        assert!(editor.content().starts_with("Topic: \nQuestion:"));
    }

    #[test]
    fn cursor_scrolls_into_view() {
        let mut editor = Editor::new();
        for _ in 0..6 {
            editor.move_down();
        }
        editor.ensure_cursor_visible(3);
        assert_eq!(editor.scroll_top(), 4);
        editor.ensure_cursor_visible(0);
        assert_eq!(editor.scroll_top(), 0);
    }
}
