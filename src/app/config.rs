use std::fs;
use std::path::{Path, PathBuf};

use ratatui::prelude::Color;
use serde::Deserialize;
use tracing::info;

use super::error::ConfigError;
use super::theme::Theme;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub theme: String,
    pub autosave_threshold: usize,
    pub show_syntax_highlighting: bool,
    pub tab_size: usize,
    pub(crate) theme_overrides: ThemeOverride,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: "dark".to_string(),
            autosave_threshold: 25,
            show_syntax_highlighting: true,
            tab_size: 4,
            theme_overrides: ThemeOverride::default(),
        }
    }
}

impl Settings {
    pub fn parse(path: &str, content: &str) -> Result<Self, ConfigError> {
        let settings: Settings = toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: path.to_string(),
            source,
        })?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.tab_size == 0 {
            return Err(ConfigError::InvalidValue {
                key: "tab_size",
                value: self.tab_size.to_string(),
            });
        }
        if Theme::from_name(&self.theme).is_none() {
            return Err(ConfigError::InvalidValue {
                key: "theme",
                value: self.theme.clone(),
            });
        }
        Ok(())
    }

    /// The named theme with any configured color overrides applied.
    pub fn resolved_theme(&self) -> Theme {
        let mut theme = Theme::from_name(&self.theme).unwrap_or_default();
        apply_theme_overrides(&mut theme, &self.theme_overrides);
        theme
    }
}

/// Loads settings from the first existing candidate file. An explicit path must exist.
pub fn load_settings(explicit: Option<&Path>) -> Result<Settings, ConfigError> {
    let mut candidates: Vec<PathBuf> = Vec::new();
    if let Some(path) = explicit {
        candidates.push(path.to_path_buf());
    } else {
        candidates.push(PathBuf::from("ygreg.toml"));
        candidates.push(PathBuf::from(".ygreg.toml"));
        if let Ok(home) = std::env::var("HOME") {
            candidates.push(PathBuf::from(home).join(".config/ygreg/config.toml"));
        }
    }

    for path in candidates {
        if explicit.is_none() && !path.exists() {
            continue;
        }
        let shown = path.display().to_string();
        let content = fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: shown.clone(),
            source,
        })?;
        let settings = Settings::parse(&shown, &content)?;
        info!(path = %shown, "loaded settings");
        return Ok(settings);
    }
    Ok(Settings::default())
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq)]
pub(crate) struct ThemeOverride {
    pub(crate) text_fg: Option<String>,
    pub(crate) border_fg: Option<String>,
    pub(crate) status_fg: Option<String>,
    pub(crate) status_bg: Option<String>,
    pub(crate) line_number_fg: Option<String>,
    pub(crate) selection_fg: Option<String>,
    pub(crate) selection_bg: Option<String>,
    pub(crate) syntax_keyword: Option<String>,
    pub(crate) syntax_string: Option<String>,
    pub(crate) syntax_comment: Option<String>,
    pub(crate) syntax_number: Option<String>,
    pub(crate) syntax_constant: Option<String>,
    pub(crate) syntax_operator: Option<String>,
    pub(crate) syntax_tag: Option<String>,
    pub(crate) syntax_property: Option<String>,
    pub(crate) syntax_type: Option<String>,
}

pub(crate) fn apply_theme_overrides(theme: &mut Theme, overrides: &ThemeOverride) {
    let pairs: [(&mut Color, &Option<String>); 16] = [
        (&mut theme.text_fg, &overrides.text_fg),
        (&mut theme.border_fg, &overrides.border_fg),
        (&mut theme.status_fg, &overrides.status_fg),
        (&mut theme.status_bg, &overrides.status_bg),
        (&mut theme.line_number_fg, &overrides.line_number_fg),
        (&mut theme.selection_fg, &overrides.selection_fg),
        (&mut theme.selection_bg, &overrides.selection_bg),
        (&mut theme.syntax_keyword, &overrides.syntax_keyword),
        (&mut theme.syntax_string, &overrides.syntax_string),
        (&mut theme.syntax_comment, &overrides.syntax_comment),
        (&mut theme.syntax_number, &overrides.syntax_number),
        (&mut theme.syntax_constant, &overrides.syntax_constant),
        (&mut theme.syntax_operator, &overrides.syntax_operator),
        (&mut theme.syntax_tag, &overrides.syntax_tag),
        (&mut theme.syntax_property, &overrides.syntax_property),
        (&mut theme.syntax_type, &overrides.syntax_type),
    ];
    for (slot, value) in pairs {
        if let Some(color) = value.as_deref().and_then(parse_color) {
            *slot = color;
        }
    }
}

fn parse_color(value: &str) -> Option<Color> {
    let hex = value.trim().trim_start_matches('#');
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color::Rgb(r, g, b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        assert_eq!(Settings::parse("t.toml", "").unwrap(), Settings::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let settings = Settings::parse(
            "t.toml",
            "theme = \"ocean\"\nautosave_threshold = 0\n[theme_overrides]\nsyntax_keyword = \"#ff0000\"\n",
        )
        .unwrap();
        assert_eq!(settings.theme, "ocean");
        assert_eq!(settings.autosave_threshold, 0);
        assert_eq!(settings.tab_size, 4);
        let theme = settings.resolved_theme();
        assert_eq!(theme.name, "ocean");
        assert_eq!(theme.syntax_keyword, Color::Rgb(255, 0, 0));
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            Settings::parse("t.toml", "tab_size = 0"),
            Err(ConfigError::InvalidValue { key: "tab_size", .. })
        ));
        assert!(matches!(
            Settings::parse("t.toml", "theme = \"neon\""),
            Err(ConfigError::InvalidValue { key: "theme", .. })
        ));
        assert!(matches!(
            Settings::parse("t.toml", "tab_size = \"wide\""),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn explicit_path_is_read_or_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        fs::write(&path, "tab_size = 2\nshow_syntax_highlighting = false\n").unwrap();
        let settings = load_settings(Some(&path)).unwrap();
        assert_eq!(settings.tab_size, 2);
        assert!(!settings.show_syntax_highlighting);
        let missing = dir.path().join("missing.toml");
        assert!(matches!(load_settings(Some(&missing)), Err(ConfigError::Read { .. })));
    }

    #[test]
    fn parse_color_accepts_hex_only() {
        assert_eq!(parse_color("#0a0B0c"), Some(Color::Rgb(10, 11, 12)));
        assert_eq!(parse_color("red"), None);
        assert_eq!(parse_color("#12345"), None);
    }
}
