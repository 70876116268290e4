/// Which question the bottom-line prompt is asking. Multi-step commands carry
/// the earlier answers forward in the variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptKind {
    Find,
    ReplaceFind,
    ReplaceWith { find: String },
    ReplaceConfirm { find: String, with: String },
    SortMode,
    SortRangeStart,
    SortRangeEnd { start: String },
    GotoLine,
    TableColumns,
    TableRows { columns: String },
    ConfirmQuit,
}

impl PromptKind {
    pub fn label(&self) -> String {
        match self {
            PromptKind::Find => "Find: ".to_string(),
            PromptKind::ReplaceFind => "Replace: ".to_string(),
            PromptKind::ReplaceWith { find } => format!("Replace '{find}' with: "),
            PromptKind::ReplaceConfirm { .. } => "Replace all? (y/n): ".to_string(),
            PromptKind::SortMode => {
                "Sort: (c)urrent line, (a)ll lines, (r)ange of lines? ".to_string()
            }
            PromptKind::SortRangeStart => "First line: ".to_string(),
            PromptKind::SortRangeEnd { .. } => "Last line: ".to_string(),
            PromptKind::GotoLine => "Go to line: ".to_string(),
            PromptKind::TableColumns => "Number of columns: ".to_string(),
            PromptKind::TableRows { .. } => "Number of rows: ".to_string(),
            PromptKind::ConfirmQuit => "Quit without saving? (y/n) ".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub kind: PromptKind,
    pub input: String,
}

impl Prompt {
    pub fn new(kind: PromptKind) -> Self {
        Self {
            kind,
            input: String::new(),
        }
    }

    pub fn text(&self) -> String {
        format!("{}{}", self.kind.label(), self.input)
    }
}

/// Parses a strictly decimal answer; signs and blanks are rejected.
pub fn parse_number(input: &str) -> Option<usize> {
    let input = input.trim();
    if input.is_empty() || !input.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    input.parse().ok()
}

/// `y`/`Y` only.
pub fn is_yes(input: &str) -> bool {
    input.trim().eq_ignore_ascii_case("y")
}
