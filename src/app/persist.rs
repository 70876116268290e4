use std::fs;
use std::path::Path;

use tracing::info;

use super::error::{LoadError, SaveError};

/// Synchronous access to the file backing the session.
pub trait PersistenceAdapter {
    fn load(&self, path: &Path) -> Result<Vec<String>, LoadError>;
    fn save(&self, path: &Path, lines: &[String]) -> Result<(), SaveError>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct FsPersistence;

impl PersistenceAdapter for FsPersistence {
    fn load(&self, path: &Path) -> Result<Vec<String>, LoadError> {
        let bytes = fs::read(path)?;
        let content = String::from_utf8(bytes)?;
        let lines: Vec<String> = content.lines().map(str::to_string).collect();
        info!(path = %path.display(), lines = lines.len(), "loaded file");
        Ok(lines)
    }

    /// Lines are joined with `\n`; no trailing newline is added.
    fn save(&self, path: &Path, lines: &[String]) -> Result<(), SaveError> {
        fs::write(path, lines.join("\n"))?;
        info!(path = %path.display(), lines = lines.len(), "saved file");
        Ok(())
    }
}

/// Placeholder content shown when a file exists but cannot be opened.
pub fn diagnostic_lines(path: &Path, err: &LoadError) -> Vec<String> {
    vec![
        format!("Unable to open {}", path.display()),
        String::new(),
        err.to_string(),
        String::new(),
        "The buffer is read-only.".to_string(),
    ]
}
