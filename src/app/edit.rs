use chrono::Local;
use tracing::debug;

use super::calc;
use super::editor::{Editor, Overlay};
use super::snippet;
use super::types::{Cursor, ExitSignal};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Editor {
    pub(crate) fn move_cursor(&mut self, direction: Direction) {
        let Cursor { row, col } = self.cursor;
        self.cursor = match direction {
            Direction::Up => Cursor::new(row.saturating_sub(1), col),
            Direction::Down => Cursor::new(row + 1, col),
            Direction::Left => Cursor::new(row, col.saturating_sub(1)),
            Direction::Right => Cursor::new(row, col + 1),
        };
        self.clamp_cursor();
    }

    pub(crate) fn move_line_start(&mut self) {
        self.cursor.col = 0;
    }

    pub(crate) fn move_line_end(&mut self) {
        self.cursor.col = self.buffer.line_len(self.cursor.row);
    }

    pub(crate) fn move_page(&mut self, down: bool) {
        let rows = self.layout().text_rows;
        self.cursor.row = if down {
            self.cursor.row + rows
        } else {
            self.cursor.row.saturating_sub(rows)
        };
        self.clamp_cursor();
    }

    pub(crate) fn insert_char(&mut self, ch: char) {
        if self.read_only {
            return;
        }
        let mut utf8 = [0u8; 4];
        self.cursor = self.buffer.insert_text(self.cursor, ch.encode_utf8(&mut utf8));
        self.record_edit();
    }

    pub(crate) fn split_at_cursor(&mut self) {
        if self.read_only {
            return;
        }
        self.cursor = self.buffer.split_line(self.cursor);
        self.record_edit();
    }

    /// Enter with a selection: a one-line selection is removed and the line broken
    /// where it started; a multi-line selection is only dropped.
    pub(crate) fn split_selection(&mut self) {
        if let Some((start, end)) = self.selection.normalize(self.cursor) {
            if start.row == end.row && !self.read_only {
                self.cursor = self.buffer.delete_range(start, end);
            }
        }
        self.selection.clear();
        self.split_at_cursor();
    }

    pub(crate) fn backspace(&mut self) {
        if self.read_only {
            return;
        }
        if let Some(at) = self.buffer.delete_char_before(self.cursor) {
            self.cursor = at;
            self.record_edit();
        }
    }

    pub(crate) fn delete_forward(&mut self) {
        if self.read_only {
            return;
        }
        if self.buffer.delete_char_at(self.cursor) {
            self.record_edit();
        }
    }

    pub(crate) fn delete_selection(&mut self) {
        if self.read_only {
            self.selection.clear();
            return;
        }
        if let Some(at) = self.selection.delete(&mut self.buffer, self.cursor) {
            self.cursor = at;
            self.record_edit();
        }
    }

    pub(crate) fn replace_selection_with(&mut self, ch: char) {
        self.delete_selection();
        self.insert_char(ch);
    }

    fn shift_selected_rows(&mut self, unindent: bool) {
        let Some((start, end)) = self.selection.normalize(self.cursor) else {
            return;
        };
        self.selection.clear();
        if self.read_only {
            return;
        }
        let width = self.settings.tab_size.max(1);
        let rows = start.row..=end.row;
        let before = self.buffer.line_len(self.cursor.row);
        let changed = if unindent {
            self.buffer.unindent_rows(rows, width)
        } else {
            self.buffer.indent_rows(rows, width);
            true
        };
        let after = self.buffer.line_len(self.cursor.row);
        self.cursor.col = (self.cursor.col + after).saturating_sub(before);
        if changed {
            self.record_edit();
        }
    }

    pub(crate) fn indent_selection(&mut self) {
        self.shift_selected_rows(false);
    }

    pub(crate) fn unindent_selection(&mut self) {
        self.shift_selected_rows(true);
    }

    fn try_snippet(&mut self) -> bool {
        let row = self.cursor.row;
        let Some(exp) = snippet::expand(self.buffer.line(row), self.cursor.col, Local::now()) else {
            return false;
        };
        let start = Cursor::new(row, exp.start_col);
        self.buffer.delete_range(start, Cursor::new(row, exp.end_col));
        self.buffer.insert_text(start, &exp.text);
        self.cursor = Cursor::new(row, exp.cursor_col);
        debug!(text = %exp.text, "snippet expanded");
        self.record_edit();
        true
    }

    /// Consumes the Tab whenever the line asks for a result, even if evaluation fails.
    fn try_arithmetic(&mut self) -> bool {
        let row = self.cursor.row;
        let line = self.buffer.line(row).to_string();
        let Some(expr) = calc::pending_expression(&line) else {
            return false;
        };
        match calc::evaluate(expr) {
            Ok(value) => {
                let end = Cursor::new(row, self.buffer.line_len(row));
                let result = format!(" {}", calc::format_result(value));
                self.cursor = self.buffer.insert_text(end, &result);
                debug!(%expr, %result, "arithmetic");
                self.record_edit();
            }
            Err(err) => self.set_status(format!("Calculation error: {err}")),
        }
        true
    }

    /// Snippet, then arithmetic, then indenting the selection, then the palette.
    pub(crate) fn handle_tab(&mut self) -> Option<ExitSignal> {
        if !self.read_only && (self.try_snippet() || self.try_arithmetic()) {
            self.selection.clear();
            return None;
        }
        if self.selection.is_active() {
            self.indent_selection();
            return None;
        }
        self.overlay = Overlay::Palette { page: 0 };
        None
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyCode;

    use super::super::editor::tests::{chars, editor, key, shift};
    use super::super::editor::Mode;
    use super::*;

    fn lines(ed: &Editor) -> Vec<&str> {
        ed.lines().iter().map(String::as_str).collect()
    }

    fn type_str(ed: &mut Editor, s: &str) {
        for k in chars(s) {
            ed.handle_key(k);
        }
    }

    #[test]
    fn arithmetic_appends_result() {
        let (mut ed, _) = editor(&[""]);
        type_str(&mut ed, "2*(3+4)=");
        ed.handle_key(key(KeyCode::Tab));
        assert_eq!(lines(&ed), vec!["2*(3+4)= 14"]);
        assert_eq!(ed.cursor(), Cursor::new(0, 11));
        assert_eq!(ed.mode(), Mode::Normal);
    }

    #[test]
    fn arithmetic_error_keeps_line_and_reports() {
        let (mut ed, _) = editor(&["1/0="]);
        ed.handle_key(key(KeyCode::End));
        ed.handle_key(key(KeyCode::Tab));
        assert_eq!(lines(&ed), vec!["1/0="]);
        assert_eq!(ed.status_text(), Some("Calculation error: division by zero"));
        assert_eq!(ed.mode(), Mode::Normal);
    }

    #[test]
    fn snippet_wins_over_palette() {
        let (mut ed, _) = editor(&[""]);
        type_str(&mut ed, "see link");
        ed.handle_key(key(KeyCode::Tab));
        assert_eq!(lines(&ed), vec!["see [](url)"]);
        assert_eq!(ed.cursor(), Cursor::new(0, 5));
    }

    #[test]
    fn plain_tab_opens_palette() {
        let (mut ed, _) = editor(&["hello "]);
        ed.handle_key(key(KeyCode::End));
        ed.handle_key(key(KeyCode::Tab));
        assert_eq!(ed.mode(), Mode::CommandPalette(0));
        assert_eq!(lines(&ed), vec!["hello "]);
    }

    #[test]
    fn tab_and_shift_tab_indent_selected_rows() {
        let (mut ed, _) = editor(&["a", "b", "c"]);
        ed.handle_key(shift(KeyCode::Down));
        ed.handle_key(key(KeyCode::Tab));
        assert_eq!(lines(&ed), vec!["    a", "    b", "c"]);
        assert_eq!(ed.mode(), Mode::Normal);
        ed.handle_key(shift(KeyCode::Up));
        ed.handle_key(key(KeyCode::BackTab));
        assert_eq!(lines(&ed), vec!["a", "b", "c"]);
    }

    #[test]
    fn enter_on_single_line_selection_breaks_at_start() {
        let (mut ed, _) = editor(&["hello world"]);
        for _ in 0..5 {
            ed.handle_key(key(KeyCode::Right));
        }
        for _ in 0..3 {
            ed.handle_key(shift(KeyCode::Right));
        }
        ed.handle_key(key(KeyCode::Enter));
        assert_eq!(lines(&ed), vec!["hello", "rld"]);
        assert_eq!(ed.cursor(), Cursor::new(1, 0));
    }

    #[test]
    fn enter_on_multi_line_selection_splits_at_cursor() {
        let (mut ed, _) = editor(&["abc", "def"]);
        ed.handle_key(shift(KeyCode::Down));
        ed.handle_key(shift(KeyCode::Right));
        ed.handle_key(key(KeyCode::Enter));
        assert_eq!(lines(&ed), vec!["abc", "d", "ef"]);
    }

    #[test]
    fn backspace_at_line_start_joins_previous() {
        let (mut ed, _) = editor(&["ab", "cd"]);
        ed.handle_key(key(KeyCode::Down));
        ed.handle_key(key(KeyCode::Backspace));
        assert_eq!(lines(&ed), vec!["abcd"]);
        assert_eq!(ed.cursor(), Cursor::new(0, 2));
        assert!(ed.is_modified());
    }

    #[test]
    fn typing_replaces_selection() {
        let (mut ed, _) = editor(&["abcdef"]);
        ed.handle_key(key(KeyCode::Right));
        ed.handle_key(shift(KeyCode::Right));
        ed.handle_key(shift(KeyCode::Right));
        assert_eq!(ed.mode(), Mode::Selecting);
        ed.handle_key(key(KeyCode::Char('X')));
        assert_eq!(lines(&ed), vec!["aXdef"]);
        assert_eq!(ed.mode(), Mode::Normal);
    }

    #[test]
    fn delete_key_removes_selection_or_char() {
        let (mut ed, _) = editor(&["abc", "def"]);
        ed.handle_key(key(KeyCode::End));
        ed.handle_key(key(KeyCode::Delete));
        assert_eq!(lines(&ed), vec!["abcdef"]);
        ed.handle_key(shift(KeyCode::Left));
        ed.handle_key(shift(KeyCode::Left));
        ed.handle_key(key(KeyCode::Delete));
        assert_eq!(lines(&ed), vec!["adef"]);
    }

    #[test]
    fn vertical_moves_clamp_column() {
        let (mut ed, _) = editor(&["long line", "ab"]);
        ed.handle_key(key(KeyCode::End));
        ed.handle_key(key(KeyCode::Down));
        assert_eq!(ed.cursor(), Cursor::new(1, 2));
        ed.handle_key(key(KeyCode::Down));
        assert_eq!(ed.cursor(), Cursor::new(1, 2));
        ed.handle_key(key(KeyCode::Home));
        ed.handle_key(key(KeyCode::Left));
        assert_eq!(ed.cursor(), Cursor::new(1, 0));
    }

    #[test]
    fn page_keys_move_by_text_rows() {
        let rows: Vec<String> = (0..60).map(|i| format!("{i}")).collect();
        let refs: Vec<&str> = rows.iter().map(String::as_str).collect();
        let (mut ed, _) = editor(&refs);
        ed.handle_key(key(KeyCode::PageDown));
        assert_eq!(ed.cursor().row, 22);
        ed.handle_key(key(KeyCode::PageDown));
        ed.handle_key(key(KeyCode::PageDown));
        assert_eq!(ed.cursor().row, 59);
        ed.handle_key(key(KeyCode::PageUp));
        assert_eq!(ed.cursor().row, 37);
    }
}
