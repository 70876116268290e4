//! The in-memory options screen reached through the palette's `p` entry.

use super::config::Settings;
use super::theme::THEME_NAMES;

const AUTOSAVE_CHOICES: [usize; 5] = [0, 10, 25, 50, 100];
const TAB_SIZE_CHOICES: [usize; 3] = [2, 4, 8];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preference {
    Theme,
    Autosave,
    Highlighting,
    TabSize,
}

pub const PREFERENCES: [Preference; 4] = [
    Preference::Theme,
    Preference::Autosave,
    Preference::Highlighting,
    Preference::TabSize,
];

impl Preference {
    pub fn label(self) -> &'static str {
        match self {
            Preference::Theme => "Color theme",
            Preference::Autosave => "Autosave (0=off)",
            Preference::Highlighting => "Syntax highlighting",
            Preference::TabSize => "Tab size",
        }
    }

    pub fn value(self, settings: &Settings) -> String {
        match self {
            Preference::Theme => settings.theme.clone(),
            Preference::Autosave => settings.autosave_threshold.to_string(),
            Preference::Highlighting => settings.show_syntax_highlighting.to_string(),
            Preference::TabSize => settings.tab_size.to_string(),
        }
    }

    /// Steps to the neighbouring choice, wrapping. A value outside the choice
    /// list (set from a config file) is left alone.
    pub fn cycle(self, settings: &mut Settings, forward: bool) {
        match self {
            Preference::Theme => {
                if let Some(next) = step(&THEME_NAMES, &settings.theme.as_str(), forward) {
                    settings.theme = next.to_string();
                }
            }
            Preference::Autosave => {
                if let Some(next) = step(&AUTOSAVE_CHOICES, &settings.autosave_threshold, forward) {
                    settings.autosave_threshold = next;
                }
            }
            Preference::Highlighting => {
                settings.show_syntax_highlighting = !settings.show_syntax_highlighting;
            }
            Preference::TabSize => {
                if let Some(next) = step(&TAB_SIZE_CHOICES, &settings.tab_size, forward) {
                    settings.tab_size = next;
                }
            }
        }
    }
}

fn step<T: PartialEq + Copy>(choices: &[T], current: &T, forward: bool) -> Option<T> {
    let idx = choices.iter().position(|c| c == current)?;
    let len = choices.len();
    let next = if forward { (idx + 1) % len } else { (idx + len - 1) % len };
    Some(choices[next])
}

/// Cursor state of the options screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PreferenceMenu {
    pub selected: usize,
}

impl PreferenceMenu {
    pub fn up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn down(&mut self) {
        self.selected = (self.selected + 1).min(PREFERENCES.len() - 1);
    }

    pub fn current(&self) -> Preference {
        PREFERENCES[self.selected]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn theme_cycles_both_ways() {
        let mut settings = Settings::default();
        Preference::Theme.cycle(&mut settings, true);
        assert_eq!(settings.theme, "light");
        Preference::Theme.cycle(&mut settings, false);
        Preference::Theme.cycle(&mut settings, false);
        assert_eq!(settings.theme, "synthwave");
    }

    #[test]
    fn numeric_choices_wrap() {
        let mut settings = Settings::default();
        Preference::Autosave.cycle(&mut settings, true);
        Preference::Autosave.cycle(&mut settings, true);
        assert_eq!(settings.autosave_threshold, 100);
        Preference::Autosave.cycle(&mut settings, true);
        assert_eq!(settings.autosave_threshold, 0);
        Preference::TabSize.cycle(&mut settings, false);
        assert_eq!(settings.tab_size, 2);
    }

    #[test]
    fn off_list_value_is_kept() {
        let mut settings = Settings {
            tab_size: 3,
            ..Settings::default()
        };
        Preference::TabSize.cycle(&mut settings, true);
        assert_eq!(settings.tab_size, 3);
    }

    #[test]
    fn highlighting_toggles() {
        let mut settings = Settings::default();
        Preference::Highlighting.cycle(&mut settings, false);
        assert!(!settings.show_syntax_highlighting);
        assert_eq!(Preference::Highlighting.value(&settings), "false");
    }

    #[test]
    fn menu_clamps() {
        let mut menu = PreferenceMenu::default();
        menu.up();
        assert_eq!(menu.current(), Preference::Theme);
        for _ in 0..10 {
            menu.down();
        }
        assert_eq!(menu.current(), Preference::TabSize);
    }
}
