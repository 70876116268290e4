use tracing::debug;

use super::buffer::SortMode;
use super::editor::Editor;
use super::error::ValidationError;
use super::palette::Command;
use super::prompt::{PromptKind, is_yes, parse_number};
use super::types::{Cursor, ExitSignal};

impl Editor {
    pub(crate) fn run_command(&mut self, command: Command) -> Option<ExitSignal> {
        debug!(?command, "command");
        match command {
            Command::Save => self.save(),
            Command::Quit => return self.request_quit(),
            Command::Help => return Some(ExitSignal::Help),
            Command::Preferences => return Some(ExitSignal::Settings),
            Command::Find => self.open_prompt(PromptKind::Find),
            Command::FindNext => self.find_next(),
            Command::Replace => {
                if self.ensure_writable() {
                    self.open_prompt(PromptKind::ReplaceFind);
                }
            }
            Command::GotoLine => self.open_prompt(PromptKind::GotoLine),
            Command::Cut => self.cut(),
            Command::Copy => {
                self.copy();
            }
            Command::Paste => self.paste(),
            Command::Duplicate => self.duplicate(),
            Command::Join => self.join(),
            Command::Sort => {
                if self.ensure_writable() {
                    self.open_prompt(PromptKind::SortMode);
                }
            }
            Command::Table => {
                if self.ensure_writable() {
                    self.open_prompt(PromptKind::TableColumns);
                }
            }
        }
        None
    }

    pub(crate) fn submit_prompt(&mut self, kind: PromptKind, input: String) -> Option<ExitSignal> {
        debug!(?kind, %input, "prompt submitted");
        match kind {
            PromptKind::Find => {
                if !input.is_empty() {
                    self.search_term = input;
                    self.find_next();
                }
            }
            PromptKind::ReplaceFind => {
                if !input.is_empty() {
                    self.open_prompt(PromptKind::ReplaceWith { find: input });
                }
            }
            PromptKind::ReplaceWith { find } => {
                self.open_prompt(PromptKind::ReplaceConfirm { find, with: input });
            }
            PromptKind::ReplaceConfirm { find, with } => {
                self.replace(&find, &with, is_yes(&input));
            }
            PromptKind::SortMode => match input.trim() {
                "" => {}
                "c" => self.sort(SortMode::CurrentLine(self.cursor.row), "Current line sorted"),
                "a" => self.sort(SortMode::Document, "Document sorted"),
                "r" => self.open_prompt(PromptKind::SortRangeStart),
                _ => self.set_status(ValidationError::InvalidInput.to_string()),
            },
            PromptKind::SortRangeStart => {
                self.open_prompt(PromptKind::SortRangeEnd { start: input });
            }
            PromptKind::SortRangeEnd { start } => {
                match (parse_number(&start), parse_number(&input)) {
                    (Some(start), Some(end)) => self.sort(
                        SortMode::Range { start, end },
                        &format!("Lines {start} to {end} sorted"),
                    ),
                    _ => self.set_status(ValidationError::InvalidInput.to_string()),
                }
            }
            PromptKind::GotoLine => match parse_number(&input) {
                Some(line) if (1..=self.buffer.line_count()).contains(&line) => {
                    self.selection.clear();
                    self.cursor = Cursor::new(line - 1, 0);
                }
                Some(_) => self.set_status(ValidationError::InvalidLine.to_string()),
                None => self.set_status(ValidationError::InvalidInput.to_string()),
            },
            PromptKind::TableColumns => {
                self.open_prompt(PromptKind::TableRows { columns: input });
            }
            PromptKind::TableRows { columns } => {
                let dims = parse_number(&columns).zip(parse_number(&input));
                let result = match dims {
                    Some((cols, rows)) => self.buffer.insert_table(self.cursor.row, rows, cols),
                    None => Err(ValidationError::InvalidInput),
                };
                match result {
                    Ok(_) => self.record_edit(),
                    Err(err) => self.set_status(err.to_string()),
                }
            }
            PromptKind::ConfirmQuit => {
                if is_yes(&input) {
                    return Some(ExitSignal::Quit);
                }
            }
        }
        None
    }

    fn sort(&mut self, mode: SortMode, done: &str) {
        if !self.ensure_writable() {
            return;
        }
        match self.buffer.sort_lines(mode) {
            Ok(()) => {
                self.record_edit();
                self.set_status(done);
            }
            Err(err) => self.set_status(err.to_string()),
        }
    }

    /// Copies the selection into the clipboard. Returns false when nothing is selected.
    fn copy(&mut self) -> bool {
        match self.selection.extract(&self.buffer, self.cursor) {
            Some(text) => {
                debug!(lines = text.len(), "copied");
                self.clipboard = text;
                true
            }
            None => {
                self.set_status("No selection");
                false
            }
        }
    }

    fn cut(&mut self) {
        if self.copy() {
            self.delete_selection();
        }
    }

    fn paste(&mut self) {
        if self.read_only || self.clipboard.is_empty() {
            return;
        }
        if self.selection.is_active() {
            self.delete_selection();
        }
        self.cursor = self.buffer.insert_lines(self.cursor, &self.clipboard);
        self.record_edit();
    }

    /// Copies the current line below itself, or the selected text right after the selection.
    fn duplicate(&mut self) {
        if !self.ensure_writable() {
            return;
        }
        match self.selection.normalize(self.cursor) {
            Some((start, end)) => {
                let text = self.buffer.text_in_range(start, end);
                self.buffer.insert_lines(end, &text);
                self.selection.clear();
            }
            None => self.buffer.duplicate_line(self.cursor.row),
        }
        self.record_edit();
        self.set_status("Duplicated");
    }

    fn join(&mut self) {
        if !self.ensure_writable() {
            return;
        }
        if self.buffer.join_with_next(self.cursor.row) {
            self.record_edit();
        }
    }
}
