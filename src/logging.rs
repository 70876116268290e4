use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "YGREG_LOG";
const LOG_FILE: &str = "ygreg.log";

pub fn clock() -> String {
    Local::now().format("%H:%M:%S").to_string()
}

pub fn default_log_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(|home| PathBuf::from(home).join(".config/ygreg"))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Sends tracing output to `<dir>/ygreg.log`; the terminal belongs to the editor.
/// Keep the returned guard alive for the whole process so buffered lines get flushed.
pub fn init(dir: &Path) -> Result<WorkerGuard> {
    fs::create_dir_all(dir).with_context(|| format!("create log dir {}", dir.display()))?;
    let appender = tracing_appender::rolling::never(dir, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .map_err(|err| anyhow::anyhow!("install tracing subscriber: {err}"))?;
    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_is_hh_mm_ss() {
        let now = clock();
        assert_eq!(now.len(), 8);
        assert_eq!(now.chars().filter(|c| *c == ':').count(), 2);
    }
}
