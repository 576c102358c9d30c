//! Parsed explicit-markup directive blocks.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

/// Field-list option line: `:name: value` or a flag `:name:`.
static OPTION_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^:([^:\s][^:]*):(?:\s+(.*))?$").unwrap());

/// A directive block split into arguments, options and content.
///
/// For the source
///
/// ```text
/// .. digraph:: deps
///    :alt: Dependencies
///
///    a -> b;
/// ```
///
/// `name` is `digraph`, `arguments` is `["deps"]`, `options` maps `alt` to
/// `Dependencies` and `content` is `a -> b;`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectiveBlock {
    /// Directive name as written in the source.
    pub name: String,
    /// Whitespace-separated arguments (first line and its continuation).
    pub arguments: Vec<String>,
    /// Options from the field list following the arguments.
    pub options: BTreeMap<String, String>,
    /// Dedented content after the first blank line, without trailing blank lines.
    pub content: String,
    /// Line of the directive marker (1-indexed).
    pub line: usize,
}

impl DirectiveBlock {
    /// Parse a block from its marker line remainder and indented body lines.
    ///
    /// `body` holds the lines following the marker, up to the last indented
    /// line of the block.
    #[must_use]
    pub fn parse(name: &str, argument: Option<&str>, body: &[&str], line: usize) -> Self {
        let header_len = body
            .iter()
            .position(|l| l.trim().is_empty())
            .unwrap_or(body.len());
        let (header, content) = body.split_at(header_len);

        let mut argument_text = argument.unwrap_or_default().trim().to_owned();
        let mut options: BTreeMap<String, String> = BTreeMap::new();
        let mut current_option: Option<String> = None;

        let option_indent = header.iter().map(|l| indent_width(l)).min().unwrap_or(0);
        for raw in header {
            let text = raw.trim();
            if indent_width(raw) == option_indent
                && let Some(caps) = OPTION_PATTERN.captures(text)
            {
                let key = caps[1].trim().to_owned();
                let value = caps.get(2).map_or("", |m| m.as_str()).trim().to_owned();
                options.insert(key.clone(), value);
                current_option = Some(key);
            } else if let Some(key) = &current_option {
                if let Some(value) = options.get_mut(key) {
                    if !value.is_empty() {
                        value.push(' ');
                    }
                    value.push_str(text);
                }
            } else {
                if !argument_text.is_empty() {
                    argument_text.push(' ');
                }
                argument_text.push_str(text);
            }
        }

        Self {
            name: name.to_owned(),
            arguments: argument_text.split_whitespace().map(str::to_owned).collect(),
            options,
            content: dedent(content),
            line,
        }
    }

    /// Get an option value.
    #[must_use]
    pub fn option(&self, key: &str) -> Option<&str> {
        self.options.get(key).map(String::as_str)
    }

    /// Whether the block has non-blank content.
    #[must_use]
    pub fn has_content(&self) -> bool {
        !self.content.trim().is_empty()
    }
}

/// Display width of leading whitespace, with tab stops every 8 columns.
pub(crate) fn indent_width(line: &str) -> usize {
    let mut width = 0;
    for c in line.chars() {
        match c {
            ' ' => width += 1,
            '\t' => width += 8 - width % 8,
            _ => break,
        }
    }
    width
}

/// Remove the common indentation and surrounding blank lines.
///
/// Indentation is measured like [`indent_width`]; other whitespace is
/// content.
fn dedent(lines: &[&str]) -> String {
    let first = lines.iter().position(|l| !l.trim().is_empty());
    let last = lines.iter().rposition(|l| !l.trim().is_empty());
    let (Some(first), Some(last)) = (first, last) else {
        return String::new();
    };
    let lines = &lines[first..=last];

    let common = lines
        .iter()
        .filter(|l| !l.trim().is_empty())
        .map(|l| indent_width(l))
        .min()
        .unwrap_or(0);

    lines
        .iter()
        .map(|l| {
            if l.trim().is_empty() {
                String::new()
            } else {
                strip_indent(l, common)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Drop `columns` columns of space and tab indentation from `line`.
///
/// Indentation past `columns` is kept as spaces.
fn strip_indent(line: &str, columns: usize) -> String {
    let extra = indent_width(line).saturating_sub(columns);
    let rest = line.trim_start_matches([' ', '\t']).trim_end();
    let mut out = " ".repeat(extra);
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_arguments_options_content() {
        let body = [
            "   :alt: Dependencies",
            "   :align: center",
            "",
            "   a -> b;",
            "     b -> c;",
        ];
        let block = DirectiveBlock::parse("digraph", Some("deps"), &body, 3);

        assert_eq!(block.name, "digraph");
        assert_eq!(block.arguments, vec!["deps".to_owned()]);
        assert_eq!(block.option("alt"), Some("Dependencies"));
        assert_eq!(block.option("align"), Some("center"));
        assert_eq!(block.content, "a -> b;\n  b -> c;");
        assert_eq!(block.line, 3);
    }

    #[test]
    fn test_content_without_header() {
        let body = ["", "   digraph {", "      a -> b", "   }", ""];
        let block = DirectiveBlock::parse("graphviz", None, &body, 1);
        assert!(block.arguments.is_empty());
        assert!(block.options.is_empty());
        assert_eq!(block.content, "digraph {\n   a -> b\n}");
        assert!(block.has_content());
    }

    #[test]
    fn test_flag_option_and_continuation() {
        let body = [
            "   :caption: A long",
            "      caption text",
            "   :nowrap:",
        ];
        let block = DirectiveBlock::parse("graphviz", Some("flow.dot"), &body, 1);
        assert_eq!(block.option("caption"), Some("A long caption text"));
        assert_eq!(block.option("nowrap"), Some(""));
        assert_eq!(block.arguments, vec!["flow.dot".to_owned()]);
        assert!(!block.has_content());
    }

    #[test]
    fn test_argument_continuation() {
        let body = ["   second", "   :alt: x"];
        let block = DirectiveBlock::parse("graph", Some("first"), &body, 1);
        assert_eq!(block.arguments, vec!["first".to_owned(), "second".to_owned()]);
        assert_eq!(block.option("alt"), Some("x"));
    }

    #[test]
    fn test_dedent_tabs_as_columns() {
        assert_eq!(
            dedent(&["\tdigraph {", "\t    a -> b", "        }"]),
            "digraph {\n    a -> b\n}"
        );
        assert_eq!(dedent(&["  \ta", "        b"]), "a\nb");
    }

    #[test]
    fn test_dedent_keeps_non_indent_whitespace() {
        assert_eq!(dedent(&["\u{3000}a", "  b"]), "\u{3000}a\n  b");
        assert_eq!(dedent(&["   x", "   \u{3000}y", "", "   z  "]), "x\n\u{3000}y\n\nz");
    }

    #[test]
    fn test_indent_width_tabs() {
        assert_eq!(indent_width("    x"), 4);
        assert_eq!(indent_width("\tx"), 8);
        assert_eq!(indent_width("  \tx"), 8);
        assert_eq!(indent_width("x"), 0);
    }
}
