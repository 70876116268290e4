use super::buffer::TextBuffer;
use super::types::{Cursor, normalize_range};

/// Anchor of a shift-extended selection. The live end is always the editor cursor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selection {
    anchor: Option<Cursor>,
}

impl Selection {
    /// Captures the anchor unless a selection is already running.
    pub fn begin(&mut self, at: Cursor) {
        if self.anchor.is_none() {
            self.anchor = Some(at);
        }
    }

    pub fn clear(&mut self) {
        self.anchor = None;
    }

    pub fn is_active(&self) -> bool {
        self.anchor.is_some()
    }

    #[cfg(test)]
    pub fn anchor(&self) -> Option<Cursor> {
        self.anchor
    }

    /// Ordered `(start, end)` span against the live cursor.
    pub fn normalize(&self, cursor: Cursor) -> Option<(Cursor, Cursor)> {
        self.anchor.map(|anchor| normalize_range(anchor, cursor))
    }

    /// Half-open containment: the cell at `end` is not selected.
    pub fn contains_cell(&self, cursor: Cursor, row: usize, col: usize) -> bool {
        let Some((start, end)) = self.normalize(cursor) else {
            return false;
        };
        if row < start.row || row > end.row {
            return false;
        }
        if row == start.row && col < start.col {
            return false;
        }
        !(row == end.row && col >= end.col)
    }

    pub fn extract(&self, buffer: &TextBuffer, cursor: Cursor) -> Option<Vec<String>> {
        let (start, end) = self.normalize(cursor)?;
        Some(buffer.text_in_range(start, end))
    }

    /// Deletes the selected span, clears the selection and returns the new cursor.
    pub fn delete(&mut self, buffer: &mut TextBuffer, cursor: Cursor) -> Option<Cursor> {
        let (start, end) = self.normalize(cursor)?;
        self.clear();
        Some(buffer.delete_range(start, end))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer() -> TextBuffer {
        TextBuffer::from_lines(vec!["hello".into(), "big".into(), "world".into()])
    }

    #[test]
    fn begin_keeps_the_first_anchor() {
        let mut sel = Selection::default();
        sel.begin(Cursor::new(0, 1));
        sel.begin(Cursor::new(2, 2));
        assert_eq!(sel.anchor(), Some(Cursor::new(0, 1)));
        sel.clear();
        assert!(!sel.is_active());
    }

    #[test]
    fn backward_and_forward_drags_normalize_identically() {
        let a = Cursor::new(0, 3);
        let b = Cursor::new(2, 1);
        let mut forward = Selection::default();
        forward.begin(a);
        let mut backward = Selection::default();
        backward.begin(b);
        assert_eq!(forward.normalize(b), backward.normalize(a));
        assert_eq!(forward.normalize(b), Some((a, b)));
    }

    #[test]
    fn contains_cell_is_half_open() {
        let mut sel = Selection::default();
        sel.begin(Cursor::new(0, 2));
        let cursor = Cursor::new(2, 1);
        assert!(!sel.contains_cell(cursor, 0, 1));
        assert!(sel.contains_cell(cursor, 0, 2));
        assert!(sel.contains_cell(cursor, 1, 0));
        assert!(sel.contains_cell(cursor, 1, 99));
        assert!(sel.contains_cell(cursor, 2, 0));
        assert!(!sel.contains_cell(cursor, 2, 1));
        assert!(!sel.contains_cell(cursor, 3, 0));
    }

    #[test]
    fn extract_single_and_multi_row() {
        let b = buffer();
        let mut sel = Selection::default();
        sel.begin(Cursor::new(0, 1));
        assert_eq!(sel.extract(&b, Cursor::new(0, 4)), Some(vec!["ell".to_string()]));
        assert_eq!(
            sel.extract(&b, Cursor::new(2, 2)),
            Some(vec!["ello".to_string(), "big".to_string(), "wo".to_string()])
        );
    }

    #[test]
    fn delete_clears_and_returns_start() {
        let mut b = buffer();
        let mut sel = Selection::default();
        sel.begin(Cursor::new(2, 2));
        let at = sel.delete(&mut b, Cursor::new(0, 1));
        assert_eq!(at, Some(Cursor::new(0, 1)));
        assert_eq!(b.lines(), &["hrld".to_string()]);
        assert!(!sel.is_active());
    }
}
