use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tracing::debug;

use super::edit::Direction;
use super::editor::{Editor, Mode, Overlay};
use super::palette::{self, Command};
use super::types::ExitSignal;

fn is_printable(key: &KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char(_))
        && !key
            .modifiers
            .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
}

fn extend_direction(key: &KeyEvent) -> Option<Direction> {
    if !key.modifiers.contains(KeyModifiers::SHIFT) {
        return None;
    }
    match key.code {
        KeyCode::Up => Some(Direction::Up),
        KeyCode::Down => Some(Direction::Down),
        KeyCode::Left => Some(Direction::Left),
        KeyCode::Right => Some(Direction::Right),
        _ => None,
    }
}

fn shortcut(key: &KeyEvent) -> Option<Command> {
    if key.code == KeyCode::F(3) {
        return Some(Command::FindNext);
    }
    if !key.modifiers.contains(KeyModifiers::CONTROL) {
        return None;
    }
    match key.code {
        KeyCode::Char('s') => Some(Command::Save),
        KeyCode::Char('q') => Some(Command::Quit),
        KeyCode::Char('f') => Some(Command::Find),
        KeyCode::Char('x') => Some(Command::Cut),
        KeyCode::Char('c') => Some(Command::Copy),
        KeyCode::Char('v') => Some(Command::Paste),
        KeyCode::Char('d') => Some(Command::Duplicate),
        _ => None,
    }
}

impl Editor {
    /// Routes one key event. Never fails; unknown keys are ignored.
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<ExitSignal> {
        if key.kind == KeyEventKind::Release {
            return None;
        }
        let mode = self.mode();
        let signal = match mode {
            Mode::Prompt => self.handle_prompt_key(key),
            Mode::CommandPalette(page) => self.handle_palette_key(page, key),
            Mode::Selecting => self.handle_selecting_key(key),
            Mode::Normal => self.handle_normal_key(key),
        };
        self.clamp_cursor();
        let next = self.mode();
        if next != mode {
            debug!(from = ?mode, to = ?next, "mode change");
        }
        signal
    }

    fn handle_normal_key(&mut self, key: KeyEvent) -> Option<ExitSignal> {
        if let Some(direction) = extend_direction(&key) {
            self.selection.begin(self.cursor);
            self.move_cursor(direction);
            return None;
        }
        if let Some(command) = shortcut(&key) {
            return self.run_command(command);
        }
        match key.code {
            KeyCode::Up => self.move_cursor(Direction::Up),
            KeyCode::Down => self.move_cursor(Direction::Down),
            KeyCode::Left => self.move_cursor(Direction::Left),
            KeyCode::Right => self.move_cursor(Direction::Right),
            KeyCode::Home => self.move_line_start(),
            KeyCode::End => self.move_line_end(),
            KeyCode::PageUp => self.move_page(false),
            KeyCode::PageDown => self.move_page(true),
            KeyCode::Enter => self.split_at_cursor(),
            KeyCode::Backspace => self.backspace(),
            KeyCode::Delete => self.delete_forward(),
            KeyCode::Tab => return self.handle_tab(),
            KeyCode::Char(ch) if is_printable(&key) => self.insert_char(ch),
            _ => {}
        }
        None
    }

    fn handle_selecting_key(&mut self, key: KeyEvent) -> Option<ExitSignal> {
        if let Some(direction) = extend_direction(&key) {
            self.move_cursor(direction);
            return None;
        }
        if let Some(command) = shortcut(&key) {
            let signal = self.run_command(command);
            self.selection.clear();
            return signal;
        }
        match key.code {
            KeyCode::Esc => self.selection.clear(),
            KeyCode::Tab => return self.handle_tab(),
            KeyCode::BackTab => self.unindent_selection(),
            KeyCode::Enter => self.split_selection(),
            KeyCode::Backspace | KeyCode::Delete => self.delete_selection(),
            KeyCode::Char(ch) if is_printable(&key) => self.replace_selection_with(ch),
            _ => {
                self.selection.clear();
                return self.handle_normal_key(key);
            }
        }
        None
    }

    fn handle_palette_key(&mut self, page: usize, key: KeyEvent) -> Option<ExitSignal> {
        if key.code == KeyCode::Tab {
            self.overlay = Overlay::Palette {
                page: palette::next_page(page),
            };
            return None;
        }
        self.overlay = Overlay::None;
        match key.code {
            KeyCode::Char(ch) if is_printable(&key) => {
                palette::lookup(ch).and_then(|command| self.run_command(command))
            }
            _ => None,
        }
    }

    fn handle_prompt_key(&mut self, key: KeyEvent) -> Option<ExitSignal> {
        let Overlay::Prompt(prompt) = &mut self.overlay else {
            return None;
        };
        match key.code {
            KeyCode::Char(ch) if is_printable(&key) => prompt.input.push(ch),
            KeyCode::Backspace => {
                prompt.input.pop();
            }
            KeyCode::Esc => {
                debug!(kind = ?prompt.kind, "prompt cancelled");
                self.overlay = Overlay::None;
            }
            KeyCode::Enter => {
                if let Overlay::Prompt(prompt) = std::mem::take(&mut self.overlay) {
                    return self.submit_prompt(prompt.kind, prompt.input);
                }
            }
            _ => {}
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyEvent;

    use super::super::editor::tests::{chars, ctrl, editor, key, shift};
    use super::super::types::Cursor;
    use super::*;

    #[test]
    fn shift_arrow_enters_selecting_and_arrow_leaves() {
        let (mut ed, _) = editor(&["abc"]);
        assert_eq!(ed.mode(), Mode::Normal);
        ed.handle_key(shift(KeyCode::Right));
        assert_eq!(ed.mode(), Mode::Selecting);
        assert!(ed.is_selected(0, 0));
        ed.handle_key(shift(KeyCode::Right));
        assert_eq!(ed.selection.anchor(), Some(Cursor::new(0, 0)));
        ed.handle_key(key(KeyCode::Left));
        assert_eq!(ed.mode(), Mode::Normal);
        assert_eq!(ed.cursor(), Cursor::new(0, 1));
    }

    #[test]
    fn esc_cancels_selection_without_edit() {
        let (mut ed, _) = editor(&["abc"]);
        ed.handle_key(shift(KeyCode::Right));
        ed.handle_key(key(KeyCode::Esc));
        assert_eq!(ed.mode(), Mode::Normal);
        assert!(!ed.is_modified());
    }

    #[test]
    fn palette_tab_cycles_and_other_keys_close() {
        let (mut ed, _) = editor(&["abc"]);
        ed.handle_key(key(KeyCode::Tab));
        assert_eq!(ed.mode(), Mode::CommandPalette(0));
        ed.handle_key(key(KeyCode::Tab));
        ed.handle_key(key(KeyCode::Tab));
        assert_eq!(ed.mode(), Mode::CommandPalette(2));
        ed.handle_key(key(KeyCode::Tab));
        assert_eq!(ed.mode(), Mode::CommandPalette(0));
        ed.handle_key(key(KeyCode::Char('z')));
        assert_eq!(ed.mode(), Mode::Normal);
        ed.handle_key(key(KeyCode::Tab));
        ed.handle_key(key(KeyCode::Esc));
        assert_eq!(ed.mode(), Mode::Normal);
        assert_eq!(ed.lines(), &["abc".to_string()]);
    }

    #[test]
    fn palette_runs_commands_from_any_page() {
        let (mut ed, _) = editor(&["abc"]);
        ed.handle_key(key(KeyCode::Tab));
        ed.handle_key(key(KeyCode::Char('d')));
        assert_eq!(ed.mode(), Mode::Normal);
        assert_eq!(ed.lines(), &["abc".to_string(), "abc".to_string()]);
    }

    #[test]
    fn prompt_editing_keys() {
        let (mut ed, _) = editor(&["abc"]);
        ed.handle_key(ctrl('f'));
        assert_eq!(ed.mode(), Mode::Prompt);
        for k in chars("bx") {
            ed.handle_key(k);
        }
        ed.handle_key(key(KeyCode::Backspace));
        ed.handle_key(key(KeyCode::Enter));
        assert_eq!(ed.mode(), Mode::Normal);
        assert_eq!(ed.search_term, "b");
        assert_eq!(ed.cursor(), Cursor::new(0, 1));
    }

    #[test]
    fn prompt_escape_aborts_only_the_prompt() {
        let (mut ed, _) = editor(&["abc"]);
        ed.handle_key(key(KeyCode::Char('z')));
        ed.handle_key(ctrl('f'));
        ed.handle_key(key(KeyCode::Char('q')));
        ed.handle_key(key(KeyCode::Esc));
        assert_eq!(ed.mode(), Mode::Normal);
        assert_eq!(ed.lines(), &["zabc".to_string()]);
        assert!(ed.is_modified());
    }

    #[test]
    fn key_releases_and_unknown_keys_are_ignored() {
        let (mut ed, _) = editor(&["abc"]);
        let mut release = key(KeyCode::Char('x'));
        release.kind = KeyEventKind::Release;
        assert_eq!(ed.handle_key(release), None);
        assert_eq!(ed.handle_key(key(KeyCode::F(12))), None);
        assert_eq!(ed.handle_key(KeyEvent::new(KeyCode::Char('k'), KeyModifiers::ALT)), None);
        assert_eq!(ed.lines(), &["abc".to_string()]);
    }
}
