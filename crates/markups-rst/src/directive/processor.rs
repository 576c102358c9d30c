//! Two-phase directive processor.
//!
//! Preprocessing replaces registered directive blocks with raw HTML
//! placeholders before the source reaches the renderer; post-processing
//! swaps the placeholders for the rendered nodes.

use std::io;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use super::block::indent_width;
use super::{DirectiveBlock, DirectiveContext, DirectiveRegistry, Node, NodeHandlers, Replacements};
use crate::SourceEnvironment;

/// Explicit markup directive marker: `.. name:: arguments`.
static DIRECTIVE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\s*)\.\.\s+([A-Za-z0-9](?:[-_.+]?[A-Za-z0-9])*)::(?:\s+(.*?))?\s*$").unwrap()
});

/// Directives whose bodies the renderer treats as literal text.
const LITERAL_DIRECTIVES: &[&str] = &["code", "code-block", "sourcecode", "raw", "math"];

/// Type alias for the file reading callback function.
pub type ReadFileFn = dyn Fn(&Path) -> io::Result<String> + Send;

fn default_read_file(path: &Path) -> io::Result<String> {
    std::fs::read_to_string(path)
}

fn placeholder(index: usize) -> String {
    format!("<!-- markups-node:{index} -->")
}

/// Outcome of running one directive.
#[derive(Debug)]
enum Pending {
    Node(Node),
    Error {
        name: String,
        line: usize,
        message: String,
    },
}

/// Source with directive placeholders, plus the nodes awaiting rendering.
#[derive(Debug)]
pub struct Prepared {
    /// Source text to hand to the renderer.
    pub source: String,
    pending: Vec<Pending>,
    warnings: Vec<String>,
}

impl Prepared {
    /// Number of directive blocks replaced by placeholders.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Warnings generated while running directives.
    #[must_use]
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Render pending nodes and replace their placeholders in `html`.
    ///
    /// Nodes without a visitor are dropped with a warning; failed directives
    /// are rendered as a system message paragraph.
    pub fn finish(self, html: &mut String, handlers: &mut NodeHandlers, env: &SourceEnvironment) {
        if self.pending.is_empty() {
            return;
        }

        let mut replacements = Replacements::with_capacity(self.pending.len());
        for (index, pending) in self.pending.into_iter().enumerate() {
            let rendered = match pending {
                Pending::Node(node) => handlers.visit(&node, env).unwrap_or_else(|| {
                    tracing::warn!(kind = %node.kind, line = node.line, "No visitor for node");
                    String::new()
                }),
                Pending::Error {
                    name,
                    line,
                    message,
                } => system_message(&name, line, &message),
            };
            replacements.add(placeholder(index), rendered);
        }
        replacements.apply(html);
    }
}

/// Docutils-style warning box for a failed directive.
pub(crate) fn system_message(name: &str, line: usize, message: &str) -> String {
    format!(
        "<div class=\"system-message\">\n\
         <p class=\"system-message-title\">System Message: WARNING (line {line})</p>\n\
         <p>{name}: {}</p>\n\
         </div>\n",
        escape_html(message)
    )
}

pub(crate) fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// Runs registered directives over reStructuredText source.
pub struct DirectiveProcessor<'a> {
    registry: &'a DirectiveRegistry,
    env: &'a SourceEnvironment,
    source_path: Option<&'a Path>,
    read_file: Option<Box<ReadFileFn>>,
}

impl<'a> DirectiveProcessor<'a> {
    #[must_use]
    pub fn new(registry: &'a DirectiveRegistry, env: &'a SourceEnvironment) -> Self {
        Self {
            registry,
            env,
            source_path: None,
            read_file: None,
        }
    }

    /// Set the source file path reported to directives.
    #[must_use]
    pub fn with_source_path(mut self, source_path: Option<&'a Path>) -> Self {
        self.source_path = source_path;
        self
    }

    /// Set the file reading callback (default: `std::fs::read_to_string`).
    #[must_use]
    pub fn with_read_file<F>(mut self, read_file: F) -> Self
    where
        F: Fn(&Path) -> io::Result<String> + Send + 'static,
    {
        self.read_file = Some(Box::new(read_file));
        self
    }

    fn create_context(&self, line: usize) -> DirectiveContext<'_> {
        let read_file: &dyn Fn(&Path) -> io::Result<String> = match &self.read_file {
            Some(f) => f.as_ref(),
            None => &default_read_file,
        };
        DirectiveContext {
            source_path: self.source_path,
            env: self.env,
            line,
            read_file,
        }
    }

    /// Replace registered directive blocks with raw HTML placeholders.
    #[must_use]
    pub fn process(&self, input: &str) -> Prepared {
        let mut prepared = Prepared {
            source: String::with_capacity(input.len()),
            pending: Vec::new(),
            warnings: Vec::new(),
        };
        if self.registry.is_empty() {
            prepared.source = input.to_owned();
            return prepared;
        }

        let lines: Vec<&str> = input.lines().collect();
        let mut out: Vec<String> = Vec::with_capacity(lines.len());
        let mut literal_indent: Option<usize> = None;
        let mut i = 0;

        while i < lines.len() {
            let line = lines[i];
            if line.trim().is_empty() {
                out.push(line.to_owned());
                i += 1;
                continue;
            }

            let indent = indent_width(line);
            if let Some(base) = literal_indent {
                if indent > base {
                    out.push(line.to_owned());
                    i += 1;
                    continue;
                }
                literal_indent = None;
            }

            if let Some(caps) = DIRECTIVE_PATTERN.captures(line) {
                let name = &caps[2];
                if let Some(handler) = self.registry.get(name) {
                    let end = block_end(&lines, i, indent);
                    let block = DirectiveBlock::parse(
                        name,
                        caps.get(3).map(|m| m.as_str()),
                        &lines[i + 1..end],
                        i + 1,
                    );
                    let ctx = self.create_context(block.line);
                    let pending = match handler.run(&block, &ctx) {
                        Ok(node) => Pending::Node(node),
                        Err(e) => {
                            let message = e.to_string();
                            tracing::warn!(directive = name, line = block.line, error = %message, "Directive failed");
                            prepared
                                .warnings
                                .push(format!("line {}: {name}: {message}", block.line));
                            Pending::Error {
                                name: name.to_owned(),
                                line: block.line,
                                message,
                            }
                        }
                    };

                    let marker_indent = &line[..caps.get(1).map_or(0, |m| m.end())];
                    out.push(format!("{marker_indent}.. raw:: html"));
                    out.push(String::new());
                    out.push(format!(
                        "{marker_indent}   {}",
                        placeholder(prepared.pending.len())
                    ));
                    out.push(String::new());
                    prepared.pending.push(pending);

                    i = end;
                    continue;
                }
                if LITERAL_DIRECTIVES.contains(&name) {
                    literal_indent = Some(indent);
                }
            } else if line.trim_end().ends_with("::") && !line.trim_start().starts_with("..") {
                literal_indent = Some(indent);
            }

            out.push(line.to_owned());
            i += 1;
        }

        prepared.source = out.join("\n");
        if input.ends_with('\n') {
            prepared.source.push('\n');
        }
        prepared
    }
}

/// Index one past the last line belonging to the block starting at `start`.
///
/// The block holds every following line indented deeper than the marker;
/// trailing blank lines are not part of it.
fn block_end(lines: &[&str], start: usize, indent: usize) -> usize {
    let mut end = start + 1;
    for (offset, line) in lines[start + 1..].iter().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        if indent_width(line) <= indent {
            break;
        }
        end = start + 2 + offset;
    }
    end
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::directive::{Directive, DirectiveError, NodeVisitor};
    use pretty_assertions::assert_eq;

    struct Upper;

    impl Directive for Upper {
        fn run(
            &self,
            block: &DirectiveBlock,
            ctx: &DirectiveContext<'_>,
        ) -> Result<Node, DirectiveError> {
            if !block.has_content() {
                return Err(DirectiveError::Invalid(format!(
                    "Ignoring \"{}\" directive without content.",
                    block.name
                )));
            }
            Ok(Node::new("upper", block.content.to_uppercase(), ctx.line))
        }
    }

    struct Include;

    impl Directive for Include {
        fn run(
            &self,
            block: &DirectiveBlock,
            ctx: &DirectiveContext<'_>,
        ) -> Result<Node, DirectiveError> {
            let path = ctx.resolve_path(&block.arguments[0]);
            let content = ctx
                .read(&path)
                .map_err(|source| DirectiveError::Read { path, source })?;
            Ok(Node::new("upper", content, ctx.line))
        }
    }

    struct UpperVisitor;

    impl NodeVisitor for UpperVisitor {
        fn visit(&mut self, node: &Node, _env: &SourceEnvironment) -> String {
            format!("<pre>{}</pre>", node.content)
        }
    }

    fn registry() -> DirectiveRegistry {
        let mut registry = DirectiveRegistry::new();
        registry.register("upper", Arc::new(Upper));
        registry.register("include-upper", Arc::new(Include));
        registry
    }

    fn handlers() -> NodeHandlers {
        let mut handlers = NodeHandlers::new();
        handlers.insert("upper", UpperVisitor);
        handlers
    }

    #[test]
    fn test_registered_directive_replaced() {
        let registry = registry();
        let env = SourceEnvironment::default();
        let input = "Intro.\n\n.. upper::\n\n   hello\n   world\n\nOutro.\n";
        let prepared = DirectiveProcessor::new(&registry, &env).process(input);

        assert_eq!(prepared.len(), 1);
        assert_eq!(
            prepared.source,
            "Intro.\n\n.. raw:: html\n\n   <!-- markups-node:0 -->\n\n\nOutro.\n"
        );

        let mut html = "<p>Intro.</p>\n<!-- markups-node:0 -->\n<p>Outro.</p>\n".to_owned();
        prepared.finish(&mut html, &mut handlers(), &env);
        assert_eq!(html, "<p>Intro.</p>\n<pre>HELLO\nWORLD</pre>\n<p>Outro.</p>\n");
    }

    #[test]
    fn test_unregistered_directive_untouched() {
        let registry = registry();
        let env = SourceEnvironment::default();
        let input = ".. note::\n\n   Some note.\n";
        let prepared = DirectiveProcessor::new(&registry, &env).process(input);
        assert!(prepared.is_empty());
        assert_eq!(prepared.source, input);
    }

    #[test]
    fn test_empty_registry_passes_through() {
        let registry = DirectiveRegistry::new();
        let env = SourceEnvironment::default();
        let input = ".. upper::\n\n   hello\n";
        let prepared = DirectiveProcessor::new(&registry, &env).process(input);
        assert!(prepared.is_empty());
        assert_eq!(prepared.source, input);
    }

    #[test]
    fn test_nested_directive_keeps_indent() {
        let registry = registry();
        let env = SourceEnvironment::default();
        let input = ".. note::\n\n   .. upper::\n\n      x\n\n   After.\n";
        let prepared = DirectiveProcessor::new(&registry, &env).process(input);
        assert_eq!(prepared.len(), 1);
        assert_eq!(
            prepared.source,
            ".. note::\n\n   .. raw:: html\n\n      <!-- markups-node:0 -->\n\n\n   After.\n"
        );
    }

    #[test]
    fn test_literal_block_skipped() {
        let registry = registry();
        let env = SourceEnvironment::default();
        let input = "Example::\n\n   .. upper::\n\n      x\n\nDone.\n";
        let prepared = DirectiveProcessor::new(&registry, &env).process(input);
        assert!(prepared.is_empty());
        assert_eq!(prepared.source, input);
    }

    #[test]
    fn test_code_block_body_skipped() {
        let registry = registry();
        let env = SourceEnvironment::default();
        let input = ".. code-block:: rst\n\n   .. upper::\n\n      x\n";
        let prepared = DirectiveProcessor::new(&registry, &env).process(input);
        assert!(prepared.is_empty());
    }

    #[test]
    fn test_directive_error_becomes_system_message() {
        let registry = registry();
        let env = SourceEnvironment::default();
        let prepared = DirectiveProcessor::new(&registry, &env).process("Text.\n\n.. upper::\n");

        assert_eq!(prepared.len(), 1);
        assert_eq!(prepared.warnings().len(), 1);
        assert!(prepared.warnings()[0].contains("line 3"));

        let mut html = "<!-- markups-node:0 -->".to_owned();
        prepared.finish(&mut html, &mut handlers(), &env);
        assert!(html.contains("class=\"system-message\""));
        assert!(html.contains("Ignoring &quot;upper&quot; directive without content."));
    }

    #[test]
    fn test_read_file_callback() {
        let registry = registry();
        let env = SourceEnvironment::new(Some(Path::new("/docs/index.rst")));
        let prepared = DirectiveProcessor::new(&registry, &env)
            .with_read_file(|path| {
                assert_eq!(path, Path::new("/docs/snippet.txt"));
                Ok("included".to_owned())
            })
            .process(".. include-upper:: snippet.txt\n");

        let mut html = "<!-- markups-node:0 -->".to_owned();
        prepared.finish(&mut html, &mut handlers(), &env);
        assert_eq!(html, "<pre>included</pre>");
    }

    #[test]
    fn test_missing_visitor_renders_nothing() {
        let registry = registry();
        let env = SourceEnvironment::default();
        let prepared = DirectiveProcessor::new(&registry, &env).process(".. upper::\n\n   x\n");

        let mut html = "<div><!-- markups-node:0 --></div>".to_owned();
        prepared.finish(&mut html, &mut NodeHandlers::new(), &env);
        assert_eq!(html, "<div></div>");
    }

    #[test]
    fn test_block_end() {
        let lines = [".. upper::", "", "   a", "", "   b", "", "next"];
        assert_eq!(block_end(&lines, 0, 0), 5);
        let lines = [".. upper::"];
        assert_eq!(block_end(&lines, 0, 0), 1);
    }
}
