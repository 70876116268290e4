use chrono::{DateTime, Local};
use uuid::Uuid;

use super::types::char_len;

const LOREM_IPSUM: &str = "Lorem ipsum dolor sit amet, consectetur adipiscing elit, sed do \
eiusmod tempor incididunt ut labore et dolore magna aliqua. Ut enim ad minim veniam, quis \
nostrud exercitation ullamco laboris nisi ut aliquip ex ea commodo consequat. Duis aute irure \
dolor in reprehenderit in voluptate velit esse cillum dolore eu fugiat nulla pariatur. \
Excepteur sint occaecat cupidatat non proident, sunt in culpa qui officia deserunt mollit anim \
id est laborum.";

/// Replace chars `start_col..end_col` of the line with `text`, then put the
/// cursor at `cursor_col`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expansion {
    pub start_col: usize,
    pub end_col: usize,
    pub text: String,
    pub cursor_col: usize,
}

/// The run of non-whitespace chars that ends at `col`, with its starting column.
fn trigger_before(line: &str, col: usize) -> Option<(usize, String)> {
    let before: Vec<char> = line.chars().take(col).collect();
    let start = before
        .iter()
        .rposition(|c| c.is_whitespace())
        .map(|idx| idx + 1)
        .unwrap_or(0);
    if start == before.len() {
        return None;
    }
    Some((start, before[start..].iter().collect()))
}

fn lorem(words: usize) -> String {
    LOREM_IPSUM
        .split_whitespace()
        .take(words)
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn expand(line: &str, col: usize, now: DateTime<Local>) -> Option<Expansion> {
    let (start, word) = trigger_before(line, col)?;
    let end = start + char_len(&word);
    let (text, offset) = match word.as_str() {
        "date" => (now.format("%Y-%m-%d").to_string(), None),
        "heure" => (now.format("%H:%M:%S").to_string(), None),
        "now" => (now.format("%Y-%m-%d %H:%M:%S").to_string(), None),
        "uuid" => (Uuid::new_v4().to_string(), None),
        "link" => ("[](url)".to_string(), Some(1)),
        "img" => ("![]()".to_string(), Some(2)),
        other => {
            let count: usize = other.strip_prefix("lorem")?.parse().ok()?;
            if count == 0 {
                return None;
            }
            (lorem(count), None)
        }
    };
    let cursor_col = start + offset.unwrap_or_else(|| char_len(&text));
    Some(Expansion {
        start_col: start,
        end_col: end,
        text,
        cursor_col,
    })
}
