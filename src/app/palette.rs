//! The paged command palette opened with Tab.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Save,
    Quit,
    Help,
    Preferences,
    Find,
    FindNext,
    Replace,
    GotoLine,
    Cut,
    Copy,
    Paste,
    Duplicate,
    Join,
    Sort,
    Table,
}

pub struct PalettePage {
    pub title: &'static str,
    pub entries: &'static [(char, &'static str, Command)],
}

pub const PAGES: [PalettePage; 3] = [
    PalettePage {
        title: "File",
        entries: &[
            ('s', "save", Command::Save),
            ('q', "quit", Command::Quit),
            ('h', "help", Command::Help),
            ('p', "preferences", Command::Preferences),
        ],
    },
    PalettePage {
        title: "Search",
        entries: &[
            ('f', "find", Command::Find),
            ('n', "next", Command::FindNext),
            ('r', "replace", Command::Replace),
            ('g', "goto", Command::GotoLine),
        ],
    },
    PalettePage {
        title: "Edit",
        entries: &[
            ('x', "cut", Command::Cut),
            ('c', "copy", Command::Copy),
            ('v', "paste", Command::Paste),
            ('d', "duplicate", Command::Duplicate),
            ('j', "join", Command::Join),
            ('o', "sort", Command::Sort),
            ('t', "table", Command::Table),
        ],
    },
];

pub fn next_page(page: usize) -> usize {
    (page + 1) % PAGES.len()
}

/// Commands are global: a key from any page runs, whichever page is showing.
pub fn lookup(key: char) -> Option<Command> {
    PAGES
        .iter()
        .flat_map(|page| page.entries.iter())
        .find(|(k, _, _)| *k == key)
        .map(|(_, _, command)| *command)
}

pub fn page_prompt(page: usize) -> String {
    let page = &PAGES[page % PAGES.len()];
    let items: Vec<String> = page
        .entries
        .iter()
        .map(|(key, label, _)| format!("({key}){label}"))
        .collect();
    format!("CMD {}: {} | Tab: more, Esc: cancel", page.title, items.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pages_cycle() {
        assert_eq!(next_page(0), 1);
        assert_eq!(next_page(PAGES.len() - 1), 0);
    }

    #[test]
    fn keys_are_unique_across_pages() {
        let mut keys: Vec<char> = PAGES
            .iter()
            .flat_map(|p| p.entries.iter().map(|(k, _, _)| *k))
            .collect();
        let total = keys.len();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), total);
    }

    #[test]
    fn lookup_ignores_the_visible_page() {
        assert_eq!(lookup('t'), Some(Command::Table));
        assert_eq!(lookup('s'), Some(Command::Save));
        assert_eq!(lookup('z'), None);
    }

    #[test]
    fn prompt_lists_page_entries() {
        assert_eq!(
            page_prompt(1),
            "CMD Search: (f)find (n)next (r)replace (g)goto | Tab: more, Esc: cancel"
        );
    }
}
