use std::time::{Duration, Instant};

/// How long a status message stays on screen before the regular status line returns.
pub(crate) const STATUS_TTL: Duration = Duration::from_millis(2500);

/// A position in the buffer. Columns count chars, not bytes.
///
/// Field order gives the derived `Ord` its row-major meaning.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Cursor {
    pub row: usize,
    pub col: usize,
}

impl Cursor {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// What a finished editing session asks the outer loop to do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitSignal {
    Quit,
    Settings,
    Help,
}

#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub(crate) text: String,
    pub(crate) at: Instant,
}

impl StatusMessage {
    pub(crate) fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            at: Instant::now(),
        }
    }

    pub(crate) fn is_fresh(&self) -> bool {
        self.at.elapsed() < STATUS_TTL
    }
}

pub(crate) fn char_to_byte_idx(s: &str, char_idx: usize) -> usize {
    if char_idx == 0 {
        return 0;
    }
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or_else(|| s.len())
}

pub(crate) fn byte_to_char_idx(s: &str, byte_idx: usize) -> usize {
    s[..byte_idx.min(s.len())].chars().count()
}

pub(crate) fn char_len(s: &str) -> usize {
    s.chars().count()
}

pub(crate) fn normalize_range(a: Cursor, b: Cursor) -> (Cursor, Cursor) {
    if a <= b { (a, b) } else { (b, a) }
}

pub fn char_display_width(ch: char) -> usize {
    unicode_width::UnicodeWidthChar::width(ch).unwrap_or(0).max(1)
}

pub fn digit_count(mut n: usize) -> usize {
    let mut digits = 1;
    while n >= 10 {
        n /= 10;
        digits += 1;
    }
    digits
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_order_is_row_major() {
        assert!(Cursor::new(0, 9) < Cursor::new(1, 0));
        assert!(Cursor::new(2, 1) < Cursor::new(2, 3));
        let (s, e) = normalize_range(Cursor::new(3, 0), Cursor::new(1, 5));
        assert_eq!((s, e), (Cursor::new(1, 5), Cursor::new(3, 0)));
    }

    #[test]
    fn byte_and_char_indices_agree_on_multibyte_text() {
        let s = "héllo";
        assert_eq!(char_to_byte_idx(s, 2), 3);
        assert_eq!(byte_to_char_idx(s, 3), 2);
        assert_eq!(char_to_byte_idx(s, 99), s.len());
    }

    #[test]
    fn digit_count_matches_decimal_width() {
        assert_eq!(digit_count(0), 1);
        assert_eq!(digit_count(9), 1);
        assert_eq!(digit_count(10), 2);
        assert_eq!(digit_count(12345), 5);
    }
}
