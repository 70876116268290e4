use ratatui::prelude::Color;

use super::highlight::StyleId;

pub const THEME_NAMES: [&str; 4] = ["dark", "light", "ocean", "synthwave"];

#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub(crate) name: &'static str,
    pub(crate) text_fg: Color,
    pub(crate) border_fg: Color,
    pub(crate) title_fg: Color,
    pub(crate) status_fg: Color,
    pub(crate) status_bg: Color,
    pub(crate) line_number_fg: Color,
    pub(crate) line_number_fg_current: Color,
    pub(crate) selection_fg: Color,
    pub(crate) selection_bg: Color,
    pub(crate) scrollbar_fg: Color,
    pub(crate) syntax_keyword: Color,
    pub(crate) syntax_string: Color,
    pub(crate) syntax_comment: Color,
    pub(crate) syntax_number: Color,
    pub(crate) syntax_constant: Color,
    pub(crate) syntax_operator: Color,
    pub(crate) syntax_tag: Color,
    pub(crate) syntax_property: Color,
    pub(crate) syntax_type: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    pub(crate) fn dark() -> Self {
        Self {
            name: "dark",
            text_fg: Color::White,
            border_fg: Color::Cyan,
            title_fg: Color::White,
            status_fg: Color::Black,
            status_bg: Color::Cyan,
            line_number_fg: Color::DarkGray,
            line_number_fg_current: Color::Rgb(255, 165, 0),
            selection_fg: Color::Black,
            selection_bg: Color::Rgb(102, 153, 204),
            scrollbar_fg: Color::Cyan,
            syntax_keyword: Color::Magenta,
            syntax_string: Color::Green,
            syntax_comment: Color::DarkGray,
            syntax_number: Color::Yellow,
            syntax_constant: Color::LightRed,
            syntax_operator: Color::LightBlue,
            syntax_tag: Color::Blue,
            syntax_property: Color::LightCyan,
            syntax_type: Color::LightYellow,
        }
    }

    pub(crate) fn light() -> Self {
        Self {
            name: "light",
            text_fg: Color::Black,
            border_fg: Color::Blue,
            title_fg: Color::Black,
            status_fg: Color::White,
            status_bg: Color::Blue,
            line_number_fg: Color::Gray,
            line_number_fg_current: Color::Rgb(203, 75, 22),
            selection_fg: Color::Black,
            selection_bg: Color::LightCyan,
            scrollbar_fg: Color::Blue,
            syntax_keyword: Color::Rgb(133, 0, 160),
            syntax_string: Color::Rgb(0, 120, 0),
            syntax_comment: Color::Gray,
            syntax_number: Color::Rgb(170, 90, 0),
            syntax_constant: Color::Red,
            syntax_operator: Color::Blue,
            syntax_tag: Color::Rgb(0, 70, 160),
            syntax_property: Color::Rgb(0, 110, 130),
            syntax_type: Color::Rgb(120, 80, 0),
        }
    }

    pub(crate) fn ocean() -> Self {
        Self {
            name: "ocean",
            text_fg: Color::Rgb(192, 216, 232),
            border_fg: Color::Rgb(38, 139, 210),
            title_fg: Color::Rgb(224, 240, 255),
            status_fg: Color::Rgb(0, 30, 50),
            status_bg: Color::Rgb(42, 161, 152),
            line_number_fg: Color::Rgb(70, 110, 140),
            line_number_fg_current: Color::Rgb(133, 220, 255),
            selection_fg: Color::Rgb(0, 30, 50),
            selection_bg: Color::Rgb(108, 180, 220),
            scrollbar_fg: Color::Rgb(42, 161, 152),
            syntax_keyword: Color::Rgb(130, 170, 255),
            syntax_string: Color::Rgb(195, 232, 141),
            syntax_comment: Color::Rgb(84, 110, 122),
            syntax_number: Color::Rgb(247, 140, 108),
            syntax_constant: Color::Rgb(255, 203, 107),
            syntax_operator: Color::Rgb(137, 221, 255),
            syntax_tag: Color::Rgb(240, 113, 120),
            syntax_property: Color::Rgb(128, 203, 196),
            syntax_type: Color::Rgb(255, 203, 107),
        }
    }

    pub(crate) fn synthwave() -> Self {
        Self {
            name: "synthwave",
            text_fg: Color::Rgb(241, 233, 255),
            border_fg: Color::Rgb(255, 126, 219),
            title_fg: Color::Rgb(254, 222, 93),
            status_fg: Color::Rgb(38, 35, 53),
            status_bg: Color::Rgb(255, 126, 219),
            line_number_fg: Color::Rgb(132, 139, 189),
            line_number_fg_current: Color::Rgb(254, 222, 93),
            selection_fg: Color::Rgb(38, 35, 53),
            selection_bg: Color::Rgb(114, 241, 184),
            scrollbar_fg: Color::Rgb(54, 249, 246),
            syntax_keyword: Color::Rgb(254, 222, 93),
            syntax_string: Color::Rgb(255, 139, 57),
            syntax_comment: Color::Rgb(132, 139, 189),
            syntax_number: Color::Rgb(249, 126, 114),
            syntax_constant: Color::Rgb(249, 126, 114),
            syntax_operator: Color::Rgb(54, 249, 246),
            syntax_tag: Color::Rgb(114, 241, 184),
            syntax_property: Color::Rgb(255, 126, 219),
            syntax_type: Color::Rgb(254, 68, 80),
        }
    }

    pub(crate) fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "dark" => Some(Self::dark()),
            "light" => Some(Self::light()),
            "ocean" => Some(Self::ocean()),
            "synthwave" => Some(Self::synthwave()),
            _ => None,
        }
    }

    pub(crate) fn style_color(&self, style: StyleId) -> Color {
        match style {
            StyleId::Plain => self.text_fg,
            StyleId::Keyword => self.syntax_keyword,
            StyleId::String => self.syntax_string,
            StyleId::Comment => self.syntax_comment,
            StyleId::Number => self.syntax_number,
            StyleId::Constant => self.syntax_constant,
            StyleId::Operator => self.syntax_operator,
            StyleId::Tag => self.syntax_tag,
            StyleId::Property => self.syntax_property,
            StyleId::Type => self.syntax_type,
        }
    }
}

/// The `#rgb` / `#rrggbb` literal touching `col`, if any.
pub fn hex_color_at(line: &str, col: usize) -> Option<Color> {
    let chars: Vec<char> = line.chars().collect();
    let is_word = |c: char| c.is_alphanumeric() || c == '_';
    let mut i = 0;
    while i < chars.len() {
        if chars[i] != '#' {
            i += 1;
            continue;
        }
        let start = i;
        let mut end = i + 1;
        while end < chars.len() && is_word(chars[end]) {
            end += 1;
        }
        if start <= col && col <= end {
            let digits: String = chars[start + 1..end].iter().collect();
            return rgb_from_hex(&digits);
        }
        i = end;
    }
    None
}

fn rgb_from_hex(digits: &str) -> Option<Color> {
    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let full = match digits.len() {
        3 => digits.chars().flat_map(|c| [c, c]).collect::<String>(),
        6 => digits.to_string(),
        _ => return None,
    };
    let channel = |i: usize| u8::from_str_radix(&full[i..i + 2], 16).ok();
    Some(Color::Rgb(channel(0)?, channel(2)?, channel(4)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_literal_under_cursor() {
        let line = "color: #ff8800; border: #abc";
        assert_eq!(hex_color_at(line, 9), Some(Color::Rgb(255, 136, 0)));
        assert_eq!(hex_color_at(line, 14), Some(Color::Rgb(255, 136, 0)));
        assert_eq!(hex_color_at(line, 27), Some(Color::Rgb(170, 187, 204)));
        assert_eq!(hex_color_at(line, 2), None);
        assert_eq!(hex_color_at("#zzzzzz", 1), None);
        assert_eq!(hex_color_at("#abcd", 1), None);
    }

    #[test]
    fn every_listed_name_resolves() {
        for name in THEME_NAMES {
            assert_eq!(Theme::from_name(name).map(|t| t.name), Some(name));
        }
        assert_eq!(Theme::from_name("OCEAN").map(|t| t.name), Some("ocean"));
        assert!(Theme::from_name("solarized").is_none());
    }
}
