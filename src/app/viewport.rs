use super::types::{Cursor, char_display_width, digit_count};

pub const MIN_WIDTH: u16 = 20;
pub const MIN_HEIGHT: u16 = 5;

pub fn is_too_small(width: u16, height: u16) -> bool {
    height < MIN_HEIGHT || width < MIN_WIDTH
}

/// Screen geometry for one frame: one title row, one status row, the line-number
/// gutter on the left and the scrollbar column on the right.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub width: u16,
    pub height: u16,
    pub gutter_width: usize,
    pub text_rows: usize,
    pub text_cols: usize,
}

impl Layout {
    pub fn compute(width: u16, height: u16, line_count: usize) -> Self {
        let gutter_width = digit_count(line_count) + 2;
        let text_rows = (height as usize).saturating_sub(2).max(1);
        let text_cols = (width as usize)
            .saturating_sub(gutter_width + 2)
            .max(1);
        Self {
            width,
            height,
            gutter_width,
            text_rows,
            text_cols,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Viewport {
    pub top_line: usize,
    pub left_col: usize,
}

impl Viewport {
    /// Scrolls just enough to keep `cursor` inside the text area. `line` is the
    /// cursor's line; horizontal scrolling is measured in display cells.
    pub fn follow(&mut self, cursor: Cursor, line: &str, layout: &Layout) {
        if cursor.row < self.top_line {
            self.top_line = cursor.row;
        } else if cursor.row >= self.top_line + layout.text_rows {
            self.top_line = cursor.row + 1 - layout.text_rows;
        }
        if cursor.col <= self.left_col {
            self.left_col = cursor.col;
            return;
        }
        let widths: Vec<usize> = line.chars().map(char_display_width).collect();
        let cell = widths.get(cursor.col).copied().unwrap_or(1);
        let mut used = cell
            + widths
                .get(self.left_col..cursor.col)
                .map_or(0, |w| w.iter().sum::<usize>());
        while used > layout.text_cols && self.left_col < cursor.col {
            used -= widths.get(self.left_col).copied().unwrap_or(1);
            self.left_col += 1;
        }
    }
}

/// Thumb `(position, size)` in rows, or `None` when everything fits.
pub fn scrollbar_thumb(top_line: usize, line_count: usize, rows: usize) -> Option<(usize, usize)> {
    if rows == 0 || line_count <= rows {
        return None;
    }
    let size = (rows * rows / line_count).max(1);
    let scrollable = line_count - rows;
    let pos = top_line.min(scrollable) * (rows - size) / scrollable;
    Some((pos, size))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_reserves_title_status_gutter_and_scrollbar() {
        let layout = Layout::compute(80, 24, 120);
        assert_eq!(layout.gutter_width, 5);
        assert_eq!(layout.text_rows, 22);
        assert_eq!(layout.text_cols, 73);
    }

    #[test]
    fn follow_scrolls_down_and_back_up() {
        let layout = Layout::compute(40, 12, 100);
        let mut vp = Viewport::default();
        vp.follow(Cursor::new(15, 0), "", &layout);
        assert_eq!(vp.top_line, 6);
        vp.follow(Cursor::new(10, 0), "", &layout);
        assert_eq!(vp.top_line, 6);
        vp.follow(Cursor::new(2, 0), "", &layout);
        assert_eq!(vp.top_line, 2);
    }

    #[test]
    fn follow_scrolls_horizontally() {
        let layout = Layout::compute(30, 10, 5);
        let line = "x".repeat(60);
        let mut vp = Viewport::default();
        vp.follow(Cursor::new(0, 40), &line, &layout);
        assert_eq!(vp.left_col, 40 + 1 - layout.text_cols);
        vp.follow(Cursor::new(0, 3), &line, &layout);
        assert_eq!(vp.left_col, 3);
    }

    #[test]
    fn follow_counts_wide_chars_as_two_cells() {
        let layout = Layout::compute(30, 10, 5);
        assert_eq!(layout.text_cols, 25);
        let line = "日".repeat(30);
        let mut vp = Viewport::default();
        vp.follow(Cursor::new(0, 12), &line, &layout);
        assert_eq!(vp.left_col, 1);
        vp.follow(Cursor::new(0, 20), &line, &layout);
        assert_eq!(vp.left_col, 9);
        vp.follow(Cursor::new(0, 30), &line, &layout);
        assert_eq!(vp.left_col, 18);
    }

    #[test]
    fn thumb_only_when_content_overflows() {
        assert_eq!(scrollbar_thumb(0, 10, 20), None);
        assert_eq!(scrollbar_thumb(0, 100, 10), Some((0, 1)));
        assert_eq!(scrollbar_thumb(90, 100, 10), Some((9, 1)));
        let (pos, size) = scrollbar_thumb(20, 40, 20).unwrap();
        assert_eq!(size, 10);
        assert_eq!(pos, 10);
    }

    #[test]
    fn too_small_thresholds() {
        assert!(is_too_small(19, 24));
        assert!(is_too_small(80, 4));
        assert!(!is_too_small(20, 5));
    }
}
