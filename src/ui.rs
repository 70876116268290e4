use ratatui::Frame;
use ratatui::layout::{Position, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Clear, Paragraph};
use unicode_width::UnicodeWidthStr;

use crate::app::{
    Editor, Layout, Overlay, PREFERENCES, PreferenceMenu, Settings, Theme, char_display_width,
    is_too_small, page_prompt, scrollbar_thumb,
};
use crate::logging;

const TOO_SMALL: &str = "Terminal too small. Please resize.";
const COMMANDS_HINT: &str = "Tab > Commands";

pub fn draw(f: &mut Frame<'_>, editor: &Editor) {
    let area = f.area();
    if too_small(f, area) {
        return;
    }
    let theme = &editor.theme;
    let layout = Layout::compute(area.width, area.height, editor.lines().len());

    f.render_widget(Block::bordered().border_style(Style::default().fg(theme.border_fg)), area);

    let text_area = Rect {
        x: 1,
        y: 1,
        width: (layout.gutter_width - 1 + layout.text_cols) as u16,
        height: layout.text_rows as u16,
    };
    f.render_widget(Paragraph::new(text_lines(editor, &layout)), text_area);
    draw_scrollbar(f, editor, &layout);
    draw_title(f, editor, area);
    let prompt_cursor = draw_status(f, editor, area);

    let cursor = match &editor.overlay {
        Overlay::Prompt(_) => prompt_cursor,
        Overlay::Palette { .. } => None,
        Overlay::None => text_cursor(editor, &layout),
    };
    if let Some(position) = cursor {
        f.set_cursor_position(position);
    }
}

fn too_small(f: &mut Frame<'_>, area: Rect) -> bool {
    if !is_too_small(area.width, area.height) {
        return false;
    }
    f.render_widget(Clear, area);
    f.buffer_mut()
        .set_stringn(0, 0, TOO_SMALL, area.width as usize, Style::default());
    true
}

fn text_lines(editor: &Editor, layout: &Layout) -> Vec<Line<'static>> {
    let theme = &editor.theme;
    let top = editor.viewport.top_line;
    let bottom = (top + layout.text_rows).min(editor.lines().len());
    let digits = layout.gutter_width - 2;
    let mut out = Vec::with_capacity(layout.text_rows);
    for row in top..bottom {
        let number_style = if row == editor.cursor().row {
            Style::default().fg(theme.line_number_fg_current)
        } else {
            Style::default()
                .fg(theme.line_number_fg)
                .add_modifier(Modifier::DIM)
        };
        let mut spans = vec![Span::styled(format!("{:>digits$} ", row + 1), number_style)];
        spans.extend(line_spans(editor, row, layout.text_cols));
        out.push(Line::from(spans));
    }
    out
}

/// Styled spans for the visible part of one buffer row, clipped to `max_cols` cells.
fn line_spans(editor: &Editor, row: usize, max_cols: usize) -> Vec<Span<'static>> {
    let theme = &editor.theme;
    let left = editor.viewport.left_col;
    let selected = Style::default()
        .fg(theme.selection_fg)
        .bg(theme.selection_bg);

    let mut spans = Vec::new();
    let mut run = String::new();
    let mut run_style = Style::default();
    let mut col = 0usize;
    let mut used = 0usize;
    'tokens: for token in editor.tokenize(&editor.lines()[row]) {
        let mut style = Style::default().fg(theme.style_color(token.style));
        if token.emphasis {
            style = style.add_modifier(Modifier::BOLD);
        }
        for ch in token.text.chars() {
            if col >= left {
                let width = char_display_width(ch);
                if used + width > max_cols {
                    break 'tokens;
                }
                let cell_style = if editor.is_selected(row, col) {
                    selected
                } else {
                    style
                };
                if cell_style != run_style && !run.is_empty() {
                    spans.push(Span::styled(std::mem::take(&mut run), run_style));
                }
                run_style = cell_style;
                run.push(if ch.is_control() { ' ' } else { ch });
                used += width;
            }
            col += 1;
        }
    }
    if !run.is_empty() {
        spans.push(Span::styled(run, run_style));
    }
    spans
}

fn draw_scrollbar(f: &mut Frame<'_>, editor: &Editor, layout: &Layout) {
    let Some((pos, size)) =
        scrollbar_thumb(editor.viewport.top_line, editor.lines().len(), layout.text_rows)
    else {
        return;
    };
    let x = layout.width - 2;
    let style = Style::default().fg(editor.theme.scrollbar_fg);
    let buf = f.buffer_mut();
    for i in 0..layout.text_rows {
        let (symbol, style) = if (pos..pos + size).contains(&i) {
            ("█", style)
        } else {
            ("░", style.add_modifier(Modifier::DIM))
        };
        buf.set_string(x, 1 + i as u16, symbol, style);
    }
}

fn draw_title(f: &mut Frame<'_>, editor: &Editor, area: Rect) {
    let time = logging::clock();
    let read_only = if editor.is_read_only() { " [READ ONLY]" } else { "" };
    let title = format!(" YGREG - {}{} ", editor.file_name(), read_only);
    let full = format!("{time} {title}");
    let width = area.width as usize;
    let style = Style::default()
        .fg(editor.theme.title_fg)
        .add_modifier(Modifier::BOLD);
    let buf = f.buffer_mut();
    if full.width() < width {
        let x = ((width - title.width()) / 2).saturating_sub(time.width());
        buf.set_string(x as u16, 0, full, style);
    } else {
        buf.set_stringn(2, 0, title, width.saturating_sub(4), style);
    }
    buf.set_stringn(
        3,
        0,
        COMMANDS_HINT,
        width.saturating_sub(4),
        Style::default().add_modifier(Modifier::REVERSED),
    );
}

/// Bottom line. Returns where the terminal cursor goes while a prompt is open.
fn draw_status(f: &mut Frame<'_>, editor: &Editor, area: Rect) -> Option<Position> {
    let theme = &editor.theme;
    let width = area.width.saturating_sub(2) as usize;
    let y = area.height - 1;
    let base = Style::default().fg(theme.status_fg).bg(theme.status_bg);

    let (text, style) = match &editor.overlay {
        Overlay::Prompt(prompt) => (prompt.text(), base),
        Overlay::Palette { page } => (page_prompt(*page), base.add_modifier(Modifier::BOLD)),
        Overlay::None => match editor.status_text() {
            Some(message) => (message.to_string(), base.add_modifier(Modifier::BOLD)),
            None => (regular_status(editor, width), preview_style(editor, base)),
        },
    };
    let padded = format!("{text:<width$}");
    f.buffer_mut().set_stringn(1, y, &padded, width, style);

    match &editor.overlay {
        Overlay::Prompt(_) => {
            let x = 1 + text.width().min(width.saturating_sub(1));
            Some(Position::new(x as u16, y))
        }
        _ => None,
    }
}

fn regular_status(editor: &Editor, width: usize) -> String {
    let marker = if editor.is_modified() { "[+]" } else { "" };
    let left = format!(" {} Lines {}", editor.lines().len(), marker);
    let cursor = editor.cursor();
    let right = format!("L:{}, C:{} ", cursor.row + 1, cursor.col + 1);
    let pad = width.saturating_sub(right.width());
    format!("{left:<pad$}{right}")
}

/// A hex color literal under the cursor tints the status line.
fn preview_style(editor: &Editor, base: Style) -> Style {
    match editor.color_under_cursor() {
        Some(color) => base.bg(color),
        None => base,
    }
}

fn text_cursor(editor: &Editor, layout: &Layout) -> Option<Position> {
    let cursor = editor.cursor();
    let top = editor.viewport.top_line;
    let left = editor.viewport.left_col;
    if cursor.row < top || cursor.row >= top + layout.text_rows || cursor.col < left {
        return None;
    }
    let offset: usize = editor.lines()[cursor.row]
        .chars()
        .skip(left)
        .take(cursor.col - left)
        .map(char_display_width)
        .sum();
    if offset >= layout.text_cols {
        return None;
    }
    Some(Position::new(
        (layout.gutter_width + offset) as u16,
        (1 + cursor.row - top) as u16,
    ))
}

fn screen_frame(f: &mut Frame<'_>, theme: &Theme, title: &str, footer: &str) -> Rect {
    let area = f.area();
    f.render_widget(Clear, area);
    f.render_widget(Block::bordered().border_style(Style::default().fg(theme.border_fg)), area);
    let buf = f.buffer_mut();
    let width = area.width as usize;
    let bold = Style::default()
        .fg(theme.title_fg)
        .add_modifier(Modifier::BOLD);
    buf.set_stringn(centered(width, title), 0, title, width, bold);
    buf.set_stringn(
        centered(width, footer),
        area.height - 1,
        footer,
        width,
        Style::default().fg(theme.status_fg).bg(theme.status_bg),
    );
    area
}

fn centered(width: usize, text: &str) -> u16 {
    (width.saturating_sub(text.width()) / 2) as u16
}

const HELP_SECTIONS: &[(&str, &[(&str, &str)])] = &[
    (
        "--- Commands (Tab > key) ---",
        &[
            ("s: save", "q: quit"),
            ("h: this help", "p: preferences"),
            ("f: find   n: next", "r: replace"),
            ("g: go to line", ""),
        ],
    ),
    (
        "--- Editing & selection ---",
        &[
            ("Shift+Arrows: select", "x/c/v: cut/copy/paste"),
            ("Enter on selection: break line", "Tab/Shift+Tab: indent/unindent"),
            ("d: duplicate line/selection", "j: join with next line"),
            ("o: sort", "Ctrl+S/Q/F: save/quit/find"),
        ],
    ),
    (
        "--- Generators (word + Tab) ---",
        &[
            ("expr= (e.g. 5*sin(pi/2)=)", "evaluates the expression"),
            ("date / heure / now", "current date / time"),
            ("uuid", "random identifier"),
            ("lorem<N>", "N words of Lorem Ipsum"),
            ("link / img", "markdown templates"),
            ("t (Tab > t)", "table template"),
        ],
    ),
];

/// Static key reference shown until `q` or Enter.
pub fn draw_help(f: &mut Frame<'_>, theme: &Theme) {
    let area = f.area();
    if too_small(f, area) {
        return;
    }
    screen_frame(f, theme, " YGREG - Help ", "Press q or Enter to return");
    let buf = f.buffer_mut();
    let half = area.width / 2;
    let text = Style::default().fg(theme.text_fg);
    let heading = text.add_modifier(Modifier::BOLD);
    let last = area.height.saturating_sub(2);
    let mut y = 2u16;
    for (title, rows) in HELP_SECTIONS {
        if y >= last {
            break;
        }
        buf.set_stringn(4, y, *title, area.width.saturating_sub(5) as usize, heading);
        y += 1;
        for (left, right) in rows.iter() {
            if y >= last {
                break;
            }
            buf.set_stringn(4, y, *left, half.saturating_sub(5) as usize, text);
            buf.set_stringn(half, y, *right, (area.width - half).saturating_sub(1) as usize, text);
            y += 1;
        }
        y += 1;
    }
}

pub fn draw_settings(f: &mut Frame<'_>, settings: &Settings, menu: &PreferenceMenu) {
    let area = f.area();
    if too_small(f, area) {
        return;
    }
    let theme = settings.resolved_theme();
    screen_frame(
        f,
        &theme,
        " YGREG - Settings ",
        "q: back | Up/Down: move | Left/Right/Enter: change",
    );
    let buf = f.buffer_mut();
    let width = area.width as usize;
    for (i, preference) in PREFERENCES.iter().enumerate() {
        let y = 4 + i as u16;
        if y >= area.height.saturating_sub(1) {
            break;
        }
        let line = format!("{:<30} < {:^7} >", preference.label(), preference.value(settings));
        let mut style = Style::default().fg(theme.text_fg);
        if i == menu.selected {
            style = style.add_modifier(Modifier::REVERSED);
        }
        buf.set_stringn(centered(width, &line).max(1), y, &line, width.saturating_sub(2), style);
    }
}
