use std::path::{Path, PathBuf};

use anyhow::Result;
use crossterm::event::KeyEvent;
use ratatui::prelude::Color;
use tracing::{debug, info, warn};

use super::autosave::ModifiedState;
use super::buffer::TextBuffer;
use super::config::Settings;
use super::error::{LoadError, SaveError};
use super::highlight::{PlainTokenizer, Token, Tokenizer, tokenizer_for_path};
use super::persist::{PersistenceAdapter, diagnostic_lines};
use super::prompt::{Prompt, PromptKind};
use super::selection::Selection;
use super::theme::{Theme, hex_color_at};
use super::types::{Cursor, ExitSignal, StatusMessage};
use super::viewport::{Layout, Viewport, is_too_small};

/// Terminal capability the session loop talks to.
pub trait Screen {
    fn size(&self) -> Result<(u16, u16)>;
    fn draw(&mut self, editor: &Editor) -> Result<()>;
    /// `None` when no key arrived before the poll timeout.
    fn read_key(&mut self) -> Result<Option<KeyEvent>>;
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Overlay {
    #[default]
    None,
    Palette {
        page: usize,
    },
    Prompt(Prompt),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Normal,
    Selecting,
    CommandPalette(usize),
    Prompt,
}

pub struct Editor {
    pub(crate) path: PathBuf,
    pub(crate) buffer: TextBuffer,
    pub(crate) cursor: Cursor,
    pub(crate) selection: Selection,
    pub(crate) clipboard: Vec<String>,
    pub(crate) viewport: Viewport,
    pub(crate) modified: ModifiedState,
    pub(crate) read_only: bool,
    pub(crate) status: Option<StatusMessage>,
    pub(crate) search_term: String,
    pub(crate) overlay: Overlay,
    pub(crate) settings: Settings,
    pub(crate) theme: Theme,
    pub(crate) screen_size: (u16, u16),
    persistence: Box<dyn PersistenceAdapter>,
    tokenizer: Box<dyn Tokenizer>,
}

impl Editor {
    /// Loads `path` through `persistence`. A missing file starts an empty buffer;
    /// an unreadable one opens read-only with a description of the failure.
    pub fn open(
        path: impl Into<PathBuf>,
        settings: Settings,
        persistence: Box<dyn PersistenceAdapter>,
    ) -> Self {
        let path = path.into();
        let mut status = None;
        let mut read_only = false;
        let buffer = match persistence.load(&path) {
            Ok(lines) => TextBuffer::from_lines(lines),
            Err(LoadError::NotFound) => {
                info!(path = %path.display(), "new file");
                status = Some(StatusMessage::new(format!("New file: {}", display_name(&path))));
                TextBuffer::new()
            }
            Err(err) => {
                warn!(path = %path.display(), %err, "load failed, opening read-only");
                read_only = true;
                TextBuffer::from_lines(diagnostic_lines(&path, &err))
            }
        };
        let mut editor = Self {
            theme: settings.resolved_theme(),
            tokenizer: Box::new(PlainTokenizer),
            path,
            buffer,
            cursor: Cursor::default(),
            selection: Selection::default(),
            clipboard: Vec::new(),
            viewport: Viewport::default(),
            modified: ModifiedState::default(),
            read_only,
            status,
            search_term: String::new(),
            overlay: Overlay::None,
            settings,
            screen_size: (80, 24),
            persistence,
        };
        editor.apply_settings();
        editor
    }

    /// Re-derives everything that depends on settings: theme and tokenizer.
    pub fn apply_settings(&mut self) {
        self.theme = self.settings.resolved_theme();
        self.tokenizer = if self.read_only || !self.settings.show_syntax_highlighting {
            Box::new(PlainTokenizer)
        } else {
            tokenizer_for_path(&self.path)
        };
        debug!(tokenizer = self.tokenizer.name(), theme = self.theme.name, "settings applied");
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    pub fn lines(&self) -> &[String] {
        self.buffer.lines()
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn is_modified(&self) -> bool {
        self.modified.is_modified()
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    pub fn file_name(&self) -> String {
        display_name(&self.path)
    }

    pub fn mode(&self) -> Mode {
        match &self.overlay {
            Overlay::Prompt(_) => Mode::Prompt,
            Overlay::Palette { page } => Mode::CommandPalette(*page),
            Overlay::None if self.selection.is_active() => Mode::Selecting,
            Overlay::None => Mode::Normal,
        }
    }

    pub fn tokenize(&self, line: &str) -> Vec<Token> {
        self.tokenizer.tokenize(line)
    }

    pub fn is_selected(&self, row: usize, col: usize) -> bool {
        self.selection.contains_cell(self.cursor, row, col)
    }

    /// The fresh status message, if one is still within its display window.
    pub fn status_text(&self) -> Option<&str> {
        self.status
            .as_ref()
            .filter(|s| s.is_fresh())
            .map(|s| s.text.as_str())
    }

    pub(crate) fn set_status(&mut self, msg: impl Into<String>) {
        let msg = msg.into();
        debug!(status = %msg, "status");
        self.status = Some(StatusMessage::new(msg));
    }

    pub fn layout(&self) -> Layout {
        Layout::compute(self.screen_size.0, self.screen_size.1, self.buffer.line_count())
    }

    pub fn color_under_cursor(&self) -> Option<Color> {
        hex_color_at(self.buffer.line(self.cursor.row), self.cursor.col)
    }

    pub(crate) fn clamp_cursor(&mut self) {
        self.cursor = self.buffer.clamp(self.cursor);
    }

    /// Bookkeeping after every successful mutation. Fires the autosave when the
    /// edit count reaches the configured threshold.
    pub(crate) fn record_edit(&mut self) {
        self.clamp_cursor();
        if self.read_only {
            return;
        }
        let outcome = self.modified.apply_edit(self.settings.autosave_threshold);
        if outcome.became_modified {
            debug!("buffer modified");
        }
        if outcome.autosave_triggered {
            self.autosave();
        }
    }

    fn autosave(&mut self) {
        match self.persistence.save(&self.path, self.buffer.lines()) {
            Ok(()) => {
                info!(edits = self.modified.edit_count(), "autosaved");
                self.modified.mark_clean();
                self.set_status("Autosaved");
            }
            Err(err) => warn!(%err, "autosave failed"),
        }
    }

    pub(crate) fn save(&mut self) {
        let result = if self.read_only {
            Err(SaveError::ReadOnly)
        } else {
            self.persistence.save(&self.path, self.buffer.lines())
        };
        match result {
            Ok(()) => {
                self.modified.mark_clean();
                self.set_status("File saved");
            }
            Err(err) => self.set_status(format!("Save failed: {err}")),
        }
    }

    /// Returns false (and says why) when the buffer cannot be changed.
    pub(crate) fn ensure_writable(&mut self) -> bool {
        if self.read_only {
            self.set_status("File is read-only");
        }
        !self.read_only
    }

    /// Quitting with unsaved changes asks first.
    pub(crate) fn request_quit(&mut self) -> Option<ExitSignal> {
        if self.modified.is_modified() {
            self.open_prompt(PromptKind::ConfirmQuit);
            return None;
        }
        Some(ExitSignal::Quit)
    }

    pub(crate) fn open_prompt(&mut self, kind: PromptKind) {
        debug!(?kind, "prompt opened");
        self.overlay = Overlay::Prompt(Prompt::new(kind));
    }

    pub(crate) fn scroll_to_cursor(&mut self) {
        let layout = self.layout();
        self.viewport
            .follow(self.cursor, self.buffer.line(self.cursor.row), &layout);
    }

    /// Runs the input loop until a key produces an exit signal.
    pub fn run(&mut self, screen: &mut dyn Screen) -> Result<ExitSignal> {
        loop {
            self.screen_size = screen.size()?;
            let (width, height) = self.screen_size;
            let too_small = is_too_small(width, height);
            if !too_small {
                self.scroll_to_cursor();
            }
            screen.draw(self)?;
            let Some(key) = screen.read_key()? else {
                continue;
            };
            if too_small {
                continue;
            }
            if let Some(signal) = self.handle_key(key) {
                info!(?signal, "session finished");
                return Ok(signal);
            }
        }
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}
