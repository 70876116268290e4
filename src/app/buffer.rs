//! Line storage and every structural edit the editor performs.
//!
//! The buffer never holds zero lines: operations that would drop the last
//! line leave a single empty one behind. Cursor arguments are expected to be
//! clamped by the caller (see [`TextBuffer::clamp`]).

use std::ops::RangeInclusive;

use super::error::ValidationError;
use super::types::{Cursor, byte_to_char_idx, char_len, char_to_byte_idx, normalize_range};

/// Width of one table cell, borders excluded.
const TABLE_COLUMN_WIDTH: usize = 15;
/// Upper bound for both table rows and columns.
pub const MAX_TABLE_DIMENSION: usize = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortMode {
    /// Sort the words of one line.
    CurrentLine(usize),
    Document,
    /// 1-based inclusive line range.
    Range { start: usize, end: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextBuffer {
    lines: Vec<String>,
}

impl Default for TextBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl TextBuffer {
    pub fn new() -> Self {
        Self {
            lines: vec![String::new()],
        }
    }

    pub fn from_lines(lines: Vec<String>) -> Self {
        let mut buffer = Self { lines };
        buffer.ensure_not_empty();
        buffer
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn line(&self, row: usize) -> &str {
        self.lines.get(row).map(String::as_str).unwrap_or("")
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn line_len(&self, row: usize) -> usize {
        self.lines.get(row).map(|l| char_len(l)).unwrap_or(0)
    }

    pub fn clamp(&self, cursor: Cursor) -> Cursor {
        let row = cursor.row.min(self.lines.len() - 1);
        Cursor::new(row, cursor.col.min(self.line_len(row)))
    }

    fn ensure_not_empty(&mut self) {
        if self.lines.is_empty() {
            self.lines.push(String::new());
        }
    }

    /// Inserts `text` at `at`; `\n` in the text starts new lines.
    /// Returns the position just after the inserted text.
    pub fn insert_text(&mut self, at: Cursor, text: &str) -> Cursor {
        let fragments: Vec<String> = text.split('\n').map(str::to_string).collect();
        self.insert_lines(at, &fragments)
    }

    /// Inserts a block of line fragments at `at`. A single fragment is spliced
    /// into the line; several fragments split the line around them.
    pub fn insert_lines(&mut self, at: Cursor, fragments: &[String]) -> Cursor {
        let at = self.clamp(at);
        let Some((first, rest)) = fragments.split_first() else {
            return at;
        };
        let line = &mut self.lines[at.row];
        let byte_idx = char_to_byte_idx(line, at.col);
        if rest.is_empty() {
            line.insert_str(byte_idx, first);
            return Cursor::new(at.row, at.col + char_len(first));
        }
        let suffix = line.split_off(byte_idx);
        line.push_str(first);
        let last_row = at.row + rest.len();
        let mut tail: Vec<String> = rest.to_vec();
        let end_col = tail.last().map(|l| char_len(l)).unwrap_or(0);
        if let Some(last) = tail.last_mut() {
            last.push_str(&suffix);
        }
        self.lines.splice(at.row + 1..at.row + 1, tail);
        Cursor::new(last_row, end_col)
    }

    pub fn split_line(&mut self, at: Cursor) -> Cursor {
        let at = self.clamp(at);
        let line = &mut self.lines[at.row];
        let byte_idx = char_to_byte_idx(line, at.col);
        let right = line.split_off(byte_idx);
        self.lines.insert(at.row + 1, right);
        Cursor::new(at.row + 1, 0)
    }

    /// Joins `row` with the following line, separated by a single space.
    /// Returns false on the last line.
    pub fn join_with_next(&mut self, row: usize) -> bool {
        if row + 1 >= self.lines.len() {
            return false;
        }
        let next = self.lines.remove(row + 1);
        let current = &mut self.lines[row];
        let trimmed_len = current.trim_end().len();
        current.truncate(trimmed_len);
        current.push(' ');
        current.push_str(next.trim_start());
        true
    }

    /// Appends `row` to the previous line verbatim. Returns the join point.
    pub fn join_with_previous(&mut self, row: usize) -> Option<Cursor> {
        if row == 0 || row >= self.lines.len() {
            return None;
        }
        let current = self.lines.remove(row);
        let prev = &mut self.lines[row - 1];
        let join_col = char_len(prev);
        prev.push_str(&current);
        Some(Cursor::new(row - 1, join_col))
    }

    /// Backspace semantics: removes the char before `at`, joining lines at column 0.
    pub fn delete_char_before(&mut self, at: Cursor) -> Option<Cursor> {
        let at = self.clamp(at);
        if at.col > 0 {
            let line = &mut self.lines[at.row];
            let start = char_to_byte_idx(line, at.col - 1);
            let end = char_to_byte_idx(line, at.col);
            line.replace_range(start..end, "");
            return Some(Cursor::new(at.row, at.col - 1));
        }
        self.join_with_previous(at.row)
    }

    /// Delete-key semantics: removes the char under `at`, pulling the next line
    /// up at end of line.
    pub fn delete_char_at(&mut self, at: Cursor) -> bool {
        let at = self.clamp(at);
        if at.col < self.line_len(at.row) {
            let line = &mut self.lines[at.row];
            let start = char_to_byte_idx(line, at.col);
            let end = char_to_byte_idx(line, at.col + 1);
            line.replace_range(start..end, "");
            return true;
        }
        if at.row + 1 >= self.lines.len() {
            return false;
        }
        let next = self.lines.remove(at.row + 1);
        self.lines[at.row].push_str(&next);
        true
    }

    /// Removes the half-open span `[start, end)`, merging the surviving ends.
    pub fn delete_range(&mut self, start: Cursor, end: Cursor) -> Cursor {
        let (start, end) = normalize_range(self.clamp(start), self.clamp(end));
        let suffix = {
            let end_line = &self.lines[end.row];
            end_line[char_to_byte_idx(end_line, end.col)..].to_string()
        };
        let start_line = &mut self.lines[start.row];
        start_line.truncate(char_to_byte_idx(start_line, start.col));
        start_line.push_str(&suffix);
        if end.row > start.row {
            self.lines.drain(start.row + 1..=end.row);
        }
        self.ensure_not_empty();
        start
    }

    /// The text of the half-open span `[start, end)`, one entry per touched row.
    pub fn text_in_range(&self, start: Cursor, end: Cursor) -> Vec<String> {
        let (start, end) = normalize_range(self.clamp(start), self.clamp(end));
        let slice = |row: usize, from: usize, to: Option<usize>| -> String {
            let line = &self.lines[row];
            let a = char_to_byte_idx(line, from);
            let b = to.map(|c| char_to_byte_idx(line, c)).unwrap_or(line.len());
            line[a..b].to_string()
        };
        if start.row == end.row {
            return vec![slice(start.row, start.col, Some(end.col))];
        }
        let mut out = Vec::with_capacity(end.row - start.row + 1);
        out.push(slice(start.row, start.col, None));
        out.extend(self.lines[start.row + 1..end.row].iter().cloned());
        out.push(slice(end.row, 0, Some(end.col)));
        out
    }

    pub fn sort_lines(&mut self, mode: SortMode) -> Result<(), ValidationError> {
        match mode {
            SortMode::CurrentLine(row) => {
                let line = self.lines.get_mut(row).ok_or(ValidationError::InvalidLine)?;
                let mut words: Vec<&str> = line.split_whitespace().collect();
                words.sort_by_cached_key(|w| w.to_lowercase());
                *line = words.join(" ");
            }
            SortMode::Document => {
                self.lines.sort_by_cached_key(|l| l.to_lowercase());
            }
            SortMode::Range { start, end } => {
                if start == 0 || start >= end || end > self.lines.len() {
                    return Err(ValidationError::InvalidRange);
                }
                self.lines[start - 1..end].sort_by_cached_key(|l| l.to_lowercase());
            }
        }
        Ok(())
    }

    pub fn duplicate_line(&mut self, row: usize) {
        let row = row.min(self.lines.len() - 1);
        let copy = self.lines[row].clone();
        self.lines.insert(row + 1, copy);
    }

    /// Inserts an ASCII table below `row`. Returns the number of lines added.
    pub fn insert_table(
        &mut self,
        row: usize,
        rows: usize,
        cols: usize,
    ) -> Result<usize, ValidationError> {
        let valid = 1..=MAX_TABLE_DIMENSION;
        if !valid.contains(&rows) || !valid.contains(&cols) {
            return Err(ValidationError::InvalidInput);
        }
        let cell = "-".repeat(TABLE_COLUMN_WIDTH);
        let blank = " ".repeat(TABLE_COLUMN_WIDTH);
        let separator = format!("+{}", format!("{cell}+").repeat(cols));
        let content = format!("|{}", format!("{blank}|").repeat(cols));
        let mut table = Vec::with_capacity(rows * 2 + 1);
        table.push(separator.clone());
        for _ in 0..rows {
            table.push(content.clone());
            table.push(separator.clone());
        }
        let added = table.len();
        let at = (row + 1).min(self.lines.len());
        self.lines.splice(at..at, table);
        Ok(added)
    }

    pub fn indent_rows(&mut self, rows: RangeInclusive<usize>, width: usize) {
        let pad = " ".repeat(width);
        for row in rows {
            if let Some(line) = self.lines.get_mut(row) {
                line.insert_str(0, &pad);
            }
        }
    }

    /// Strips one indent level from each row that starts with one.
    /// Returns whether anything changed.
    pub fn unindent_rows(&mut self, rows: RangeInclusive<usize>, width: usize) -> bool {
        let pad = " ".repeat(width);
        let mut changed = false;
        for row in rows {
            if let Some(line) = self.lines.get_mut(row) {
                if line.starts_with(&pad) {
                    line.replace_range(..pad.len(), "");
                    changed = true;
                }
            }
        }
        changed
    }

    pub fn replace_first_in_row(&mut self, row: usize, find: &str, with: &str) -> bool {
        if find.is_empty() {
            return false;
        }
        let Some(line) = self.lines.get_mut(row) else {
            return false;
        };
        if !line.contains(find) {
            return false;
        }
        *line = line.replacen(find, with, 1);
        true
    }

    /// Replaces every occurrence in every line. Returns the substitution count.
    pub fn replace_all(&mut self, find: &str, with: &str) -> usize {
        if find.is_empty() {
            return 0;
        }
        let mut count = 0;
        for line in &mut self.lines {
            let hits = line.matches(find).count();
            if hits > 0 {
                *line = line.replace(find, with);
                count += hits;
            }
        }
        count
    }

    /// Finds `needle` after `from`, wrapping around to the top of the buffer and
    /// back up to `from` itself.
    pub fn find_from(&self, from: Cursor, needle: &str) -> Option<Cursor> {
        if needle.is_empty() {
            return None;
        }
        let from = self.clamp(from);
        let first = self.line(from.row);
        let start_byte = char_to_byte_idx(first, from.col + 1);
        if let Some(idx) = first[start_byte..].find(needle) {
            return Some(Cursor::new(from.row, byte_to_char_idx(first, start_byte + idx)));
        }
        let after = (from.row + 1..self.lines.len()).chain(0..=from.row);
        for row in after {
            let line = &self.lines[row];
            if let Some(idx) = line.find(needle) {
                return Some(Cursor::new(row, byte_to_char_idx(line, idx)));
            }
        }
        None
    }
}
