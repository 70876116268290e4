mod autosave;
mod buffer;
mod calc;
mod commands;
mod config;
mod edit;
mod editor;
mod error;
mod highlight;
mod input;
mod palette;
mod persist;
mod preferences;
mod prompt;
mod search;
mod selection;
mod snippet;
mod theme;
mod types;
mod viewport;

pub use config::{Settings, load_settings};
pub use editor::{Editor, Overlay, Screen};
pub use palette::page_prompt;
pub use persist::FsPersistence;
pub use preferences::{PREFERENCES, PreferenceMenu};
pub use theme::Theme;
pub use types::{ExitSignal, char_display_width};
pub use viewport::{Layout, is_too_small, scrollbar_thumb};

#[cfg(test)]
pub(crate) use editor::tests as test_support;
