//! Per-line syntax tokenizers.
//!
//! Each line is parsed on its own with tree-sitter; there is no state carried
//! between lines. The concatenated token texts always reproduce the line.

use std::path::Path;

use tracing::debug;
use tree_sitter::{Language, Node, Parser};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleId {
    Plain,
    Keyword,
    String,
    Comment,
    Number,
    Constant,
    Operator,
    Tag,
    Property,
    Type,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    pub style: StyleId,
    pub emphasis: bool,
}

impl Token {
    fn new(text: &str, style: StyleId) -> Self {
        Self {
            text: text.to_string(),
            style,
            emphasis: style == StyleId::Keyword,
        }
    }
}

pub trait Tokenizer {
    fn name(&self) -> &'static str;
    fn tokenize(&self, line: &str) -> Vec<Token>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct PlainTokenizer;

impl Tokenizer for PlainTokenizer {
    fn name(&self) -> &'static str {
        "plain"
    }

    fn tokenize(&self, line: &str) -> Vec<Token> {
        if line.is_empty() {
            return Vec::new();
        }
        vec![Token::new(line, StyleId::Plain)]
    }
}

#[derive(Debug, Clone)]
struct LanguageSpec {
    name: &'static str,
    extensions: &'static [&'static str],
    language: Language,
}

fn language_specs() -> Vec<LanguageSpec> {
    vec![
        LanguageSpec {
            name: "rust",
            extensions: &["rs"],
            language: tree_sitter_rust::LANGUAGE.into(),
        },
        LanguageSpec {
            name: "javascript",
            extensions: &["js", "mjs", "cjs", "jsx"],
            language: tree_sitter_javascript::LANGUAGE.into(),
        },
        LanguageSpec {
            name: "typescript",
            extensions: &["ts"],
            language: tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
        },
        LanguageSpec {
            name: "tsx",
            extensions: &["tsx"],
            language: tree_sitter_typescript::LANGUAGE_TSX.into(),
        },
        LanguageSpec {
            name: "json",
            extensions: &["json"],
            language: tree_sitter_json::LANGUAGE.into(),
        },
        LanguageSpec {
            name: "toml",
            extensions: &["toml"],
            language: tree_sitter_toml::LANGUAGE.into(),
        },
        LanguageSpec {
            name: "markdown",
            extensions: &["md", "markdown"],
            language: tree_sitter_md::LANGUAGE.into(),
        },
        LanguageSpec {
            name: "html",
            extensions: &["html", "htm"],
            language: tree_sitter_html::LANGUAGE.into(),
        },
        LanguageSpec {
            name: "css",
            extensions: &["css"],
            language: tree_sitter_css::LANGUAGE.into(),
        },
        LanguageSpec {
            name: "python",
            extensions: &["py"],
            language: tree_sitter_python::LANGUAGE.into(),
        },
        LanguageSpec {
            name: "lua",
            extensions: &["lua"],
            language: tree_sitter_lua::LANGUAGE.into(),
        },
        LanguageSpec {
            name: "go",
            extensions: &["go"],
            language: tree_sitter_go::LANGUAGE.into(),
        },
    ]
}

/// Picks a tokenizer from the file extension, falling back to plain text.
pub fn tokenizer_for_path(path: &Path) -> Box<dyn Tokenizer> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|s| s.to_ascii_lowercase());
    let spec = ext.and_then(|ext| {
        language_specs()
            .into_iter()
            .find(|spec| spec.extensions.contains(&ext.as_str()))
    });
    match spec {
        Some(spec) => {
            debug!(language = spec.name, "syntax: tree-sitter tokenizer");
            Box::new(TreeSitterTokenizer {
                name: spec.name,
                language: spec.language,
            })
        }
        None => Box::new(PlainTokenizer),
    }
}

pub struct TreeSitterTokenizer {
    name: &'static str,
    language: Language,
}

impl Tokenizer for TreeSitterTokenizer {
    fn name(&self) -> &'static str {
        self.name
    }

    fn tokenize(&self, line: &str) -> Vec<Token> {
        if line.is_empty() {
            return Vec::new();
        }
        let mut parser = Parser::new();
        if let Err(err) = parser.set_language(&self.language) {
            debug!(language = self.name, %err, "syntax: set language failed");
            return PlainTokenizer.tokenize(line);
        }
        let Some(tree) = parser.parse(line, None) else {
            return PlainTokenizer.tokenize(line);
        };
        let mut out = Vec::new();
        let mut pos = 0usize;
        let mut stack = vec![tree.root_node()];
        while let Some(node) = stack.pop() {
            let style = classify(&node);
            let atomic = matches!(
                style,
                Some(StyleId::String | StyleId::Comment | StyleId::Number | StyleId::Property)
            );
            if !atomic && node.child_count() > 0 {
                for i in (0..node.child_count()).rev() {
                    if let Some(child) = node.child(i) {
                        stack.push(child);
                    }
                }
                continue;
            }
            let (start, end) = (node.start_byte(), node.end_byte().min(line.len()));
            if start < pos || start >= end {
                continue;
            }
            let (Some(gap), Some(text)) = (line.get(pos..start), line.get(start..end)) else {
                continue;
            };
            if !gap.is_empty() {
                out.push(Token::new(gap, StyleId::Plain));
            }
            out.push(Token::new(text, style.unwrap_or(StyleId::Plain)));
            pos = end;
        }
        if let Some(rest) = line.get(pos..).filter(|r| !r.is_empty()) {
            out.push(Token::new(rest, StyleId::Plain));
        }
        out
    }
}

fn classify(node: &Node) -> Option<StyleId> {
    let kind = node.kind();
    if kind.contains("comment") {
        return Some(StyleId::Comment);
    }
    if kind.contains("string") || kind.ends_with("attribute_value") || kind.ends_with("char_literal")
        || kind == "rune_literal"
        || kind == "fenced_code_block_delimiter"
    {
        let is_key = node.next_sibling().is_some_and(|next| next.kind() == ":");
        return Some(if is_key && kind == "string" {
            StyleId::Property
        } else {
            StyleId::String
        });
    }
    if matches!(kind, "number" | "integer" | "float" | "int_literal" | "imaginary_literal")
        || kind.contains("integer")
        || kind.contains("float")
        || kind.contains("number_literal")
    {
        return Some(StyleId::Number);
    }
    match kind {
        "true" | "false" | "null" | "nil" | "none" | "None" | "True" | "False" | "boolean"
        | "undefined" => return Some(StyleId::Constant),
        "tag_name" => return Some(StyleId::Tag),
        "attribute_name" | "property_name" | "property_identifier" | "field_identifier"
        | "bare_key" | "shorthand_property_identifier" => return Some(StyleId::Property),
        "type_identifier" | "primitive_type" | "predefined_type" => return Some(StyleId::Type),
        _ => {}
    }
    if kind.starts_with("atx_h") && kind.ends_with("_marker") {
        return Some(StyleId::Keyword);
    }
    if node.is_named() || node.child_count() > 0 {
        return None;
    }
    if kind.chars().next().is_some_and(char::is_alphabetic) {
        Some(StyleId::Keyword)
    } else if !kind.is_empty() && kind.chars().all(|c| "+-*/%=<>!&|^~?:".contains(c)) {
        Some(StyleId::Operator)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn joined(tokens: &[Token]) -> String {
        tokens.iter().map(|t| t.text.as_str()).collect()
    }

    fn has(tokens: &[Token], text: &str, style: StyleId) -> bool {
        tokens.iter().any(|t| t.text == text && t.style == style)
    }

    #[test]
    fn every_registered_language_is_lossless() {
        let samples = [
            "let x = \"héllo\"; // done",
            "  if (a >= 10) { return b[0] + 'c'; }",
            "{\"key\": [1, 2.5, true, null]}",
            "name = \"value\" # comment",
            "# Heading with `code` and *emphasis*",
            "<div class=\"x\">text & more</div>",
            "  unterminated \"string ( [ {",
            "\t\tmixed\ttabs   and spaces  ",
        ];
        for spec in language_specs() {
            let path = format!("sample.{}", spec.extensions[0]);
            let tokenizer = tokenizer_for_path(Path::new(&path));
            assert_eq!(tokenizer.name(), spec.name);
            for line in samples {
                let tokens = tokenizer.tokenize(line);
                assert_eq!(joined(&tokens), line, "{} on {:?}", spec.name, line);
                assert!(tokens.iter().all(|t| !t.text.is_empty()));
            }
        }
    }

    #[test]
    fn unknown_extension_is_plain() {
        let tokenizer = tokenizer_for_path(Path::new("notes.txt"));
        assert_eq!(tokenizer.name(), "plain");
        assert_eq!(
            tokenizer.tokenize("fn main() {}"),
            vec![Token::new("fn main() {}", StyleId::Plain)]
        );
        assert!(tokenizer.tokenize("").is_empty());
        assert_eq!(tokenizer_for_path(Path::new("Makefile")).name(), "plain");
    }

    #[test]
    fn rust_keywords_numbers_and_comments() {
        let tokens = tokenizer_for_path(Path::new("main.rs")).tokenize("let x = 42; // hi");
        assert!(has(&tokens, "let", StyleId::Keyword));
        assert!(has(&tokens, "42", StyleId::Number));
        assert!(has(&tokens, "// hi", StyleId::Comment));
        assert!(tokens.iter().find(|t| t.text == "let").is_some_and(|t| t.emphasis));
    }

    #[test]
    fn python_strings_are_single_tokens() {
        let tokens = tokenizer_for_path(Path::new("a.py")).tokenize("x = \"a b c\"  # note");
        assert!(has(&tokens, "\"a b c\"", StyleId::String));
        assert!(has(&tokens, "# note", StyleId::Comment));
    }

    #[test]
    fn json_keys_are_properties() {
        let tokens = tokenizer_for_path(Path::new("a.json")).tokenize("{\"a\": \"b\", \"n\": 1}");
        assert!(has(&tokens, "\"a\"", StyleId::Property));
        assert!(has(&tokens, "\"b\"", StyleId::String));
        assert!(has(&tokens, "1", StyleId::Number));
        assert!(!tokens.iter().any(|t| t.text == "a"));
    }
}
