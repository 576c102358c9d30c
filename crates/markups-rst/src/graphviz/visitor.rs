//! HTML rendering of Graphviz nodes.

use std::path::Path;

use super::{GraphvizBuilder, OutputFormat};
use crate::SourceEnvironment;
use crate::directive::{Node, NodeVisitor};
use crate::directive::{escape_html, system_message};

/// Lays out `graphviz` nodes through a [`GraphvizBuilder`] and references the
/// image from the HTML.
///
/// `dot` runs in the source document's directory so relative paths inside
/// the graph (images, includes) resolve like they do for the document.
#[derive(Debug)]
pub struct GraphvizVisitor {
    builder: GraphvizBuilder,
}

impl GraphvizVisitor {
    #[must_use]
    pub fn new(builder: GraphvizBuilder) -> Self {
        Self { builder }
    }

    #[must_use]
    pub fn builder(&self) -> &GraphvizBuilder {
        &self.builder
    }
}

impl NodeVisitor for GraphvizVisitor {
    fn visit(&mut self, node: &Node, env: &SourceEnvironment) -> String {
        match self.builder.render_dot(&node.content, &node.attrs, env.dir()) {
            Ok(Some(path)) => render_html(node, &path, self.builder.settings().output_format),
            // dot cannot run; show the source instead.
            Ok(None) => format!(
                "<pre class=\"literal-block\">{}</pre>\n",
                escape_html(&node.content)
            ),
            Err(e) => {
                self.builder
                    .warn(&format!("dot code {:?}: {e}", node.content));
                system_message("graphviz", node.line, &e.to_string())
            }
        }
    }
}

fn render_html(node: &Node, path: &Path, format: OutputFormat) -> String {
    let src = escape_html(&path.display().to_string());
    let alt = escape_html(node.attr("alt").unwrap_or_else(|| node.content.trim()));
    let imgcls = std::iter::once("graphviz")
        .chain(node.classes.iter().map(String::as_str))
        .collect::<Vec<_>>()
        .join(" ");
    let id = node
        .attr("name")
        .map(|name| format!(" id=\"{}\"", make_id(name)))
        .unwrap_or_default();

    if let Some(caption) = node.attr("caption") {
        let image = image_html(&src, &alt, &imgcls, format, "");
        let align = node
            .attr("align")
            .map(|a| format!(" align-{a}"))
            .unwrap_or_default();
        return format!(
            "<div class=\"figure{align}\"{id}>\n{image}<p class=\"caption\">{}</p>\n</div>\n",
            escape_html(caption)
        );
    }

    let image = image_html(&src, &alt, &imgcls, format, &id);
    match node.attr("align") {
        Some(align) => format!("<div align=\"{align}\" class=\"align-{align}\">{image}</div>\n"),
        None => image,
    }
}

fn image_html(src: &str, alt: &str, imgcls: &str, format: OutputFormat, id: &str) -> String {
    match format {
        OutputFormat::Svg => format!(
            "<div class=\"graphviz\"{id}><object data=\"{src}\" type=\"image/svg+xml\" \
             class=\"{imgcls}\">\n<p class=\"warning\">{alt}</p></object></div>\n"
        ),
        OutputFormat::Png => format!(
            "<div class=\"graphviz\"{id}><img src=\"{src}\" alt=\"{alt}\" class=\"{imgcls}\" /></div>\n"
        ),
    }
}

/// Docutils-style identifier: lowercase ASCII alphanumerics joined by `-`.
fn make_id(name: &str) -> String {
    name.to_lowercase()
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}
