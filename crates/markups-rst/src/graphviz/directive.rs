//! `graphviz`, `graph` and `digraph` directive handlers.

use super::NODE_KIND;
use crate::directive::{Directive, DirectiveBlock, DirectiveContext, DirectiveError, Node};

/// Options accepted by every Graphviz directive.
const OPTIONS: &[&str] = &[
    "alt",
    "align",
    "caption",
    "layout",
    "graphviz_dot",
    "name",
    "class",
];

const ALIGN_VALUES: &[&str] = &["left", "center", "right"];

/// `.. graphviz:: [file]`: dot code inline or from an external file.
///
/// ```text
/// .. graphviz:: graphs/flow.dot
///    :alt: Request flow
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct GraphvizDirective;

impl Directive for GraphvizDirective {
    fn run(
        &self,
        block: &DirectiveBlock,
        ctx: &DirectiveContext<'_>,
    ) -> Result<Node, DirectiveError> {
        check_options(block)?;

        let code = if let Some(filename) = block.arguments.first() {
            if block.has_content() {
                return Err(DirectiveError::Invalid(
                    "Graphviz directive cannot have both content and a filename argument"
                        .to_owned(),
                ));
            }
            let path = ctx.env.resolve_for_language(filename);
            ctx.env.note_dependency(&path);
            ctx.read(&path)
                .map_err(|source| DirectiveError::Read { path, source })?
        } else {
            if !block.has_content() {
                return Err(DirectiveError::Invalid(
                    "Ignoring \"graphviz\" directive without content.".to_owned(),
                ));
            }
            block.content.clone()
        };

        Ok(build_node(code, block, ctx.line))
    }
}

/// `.. graph:: name` and `.. digraph:: name`: the body is the graph's
/// statement list.
///
/// ```text
/// .. digraph:: deps
///
///    cli -> rst;
/// ```
///
/// lays out `digraph deps {\ncli -> rst;\n}\n`.
#[derive(Debug, Default, Clone, Copy)]
pub struct GraphvizSimpleDirective;

impl Directive for GraphvizSimpleDirective {
    fn run(
        &self,
        block: &DirectiveBlock,
        ctx: &DirectiveContext<'_>,
    ) -> Result<Node, DirectiveError> {
        check_options(block)?;

        let [name] = block.arguments.as_slice() else {
            return Err(DirectiveError::Invalid(format!(
                "Error in \"{}\" directive:\n1 argument(s) required, {} supplied.",
                block.name,
                block.arguments.len()
            )));
        };
        let code = format!("{} {name} {{\n{}\n}}\n", block.name, block.content);

        Ok(build_node(code, block, ctx.line))
    }
}

fn check_options(block: &DirectiveBlock) -> Result<(), DirectiveError> {
    if let Some(key) = block.options.keys().find(|k| !OPTIONS.contains(&k.as_str())) {
        return Err(DirectiveError::Invalid(format!(
            "Error in \"{}\" directive:\nunknown option: \"{key}\".",
            block.name
        )));
    }
    if let Some(align) = block.option("align")
        && !ALIGN_VALUES.contains(&align)
    {
        return Err(DirectiveError::Invalid(format!(
            "Error in \"{}\" directive:\ninvalid option value: (option: \"align\"; value: '{align}')\n\
             \"{align}\" unknown; choose from \"left\", \"center\", or \"right\".",
            block.name
        )));
    }
    Ok(())
}

/// Node carrying the dot code and display options.
///
/// `:layout:` names the layout program and takes precedence over
/// `:graphviz_dot:`.
fn build_node(code: String, block: &DirectiveBlock, line: usize) -> Node {
    let mut node = Node::new(NODE_KIND, code, line);
    for key in ["alt", "align", "caption", "name"] {
        if let Some(value) = block.option(key).filter(|v| !v.is_empty()) {
            node.set_attr(key, value);
        }
    }
    if let Some(program) = block
        .option("layout")
        .or_else(|| block.option("graphviz_dot"))
        .filter(|v| !v.is_empty())
    {
        node.set_attr("graphviz_dot", program);
    }
    if let Some(classes) = block.option("class") {
        node.classes = classes.split_whitespace().map(str::to_owned).collect();
    }
    node
}
