use tracing::debug;

use super::editor::Editor;

impl Editor {
    /// Jumps to the next occurrence of the last search term, wrapping at the end.
    pub(crate) fn find_next(&mut self) {
        if self.search_term.is_empty() {
            self.set_status("No search term");
            return;
        }
        match self.buffer.find_from(self.cursor, &self.search_term) {
            Some(at) => {
                debug!(term = %self.search_term, row = at.row, col = at.col, "found");
                self.selection.clear();
                self.cursor = at;
            }
            None => {
                let msg = format!("'{}' not found", self.search_term);
                self.set_status(msg);
            }
        }
    }

    /// Literal replacement: first match on the cursor line, or every match everywhere.
    pub(crate) fn replace(&mut self, find: &str, with: &str, all: bool) {
        if !self.ensure_writable() {
            return;
        }
        let count = if all {
            self.buffer.replace_all(find, with)
        } else {
            usize::from(self.buffer.replace_first_in_row(self.cursor.row, find, with))
        };
        if count == 0 {
            self.set_status("Not found");
            return;
        }
        self.record_edit();
        self.set_status(format!("{count} replacement(s)"));
    }
}
