//! Pluggable directives for reStructuredText.
//!
//! Directives are registered in a caller-owned [`DirectiveRegistry`] and the
//! nodes they produce are rendered by visitors in a [`NodeHandlers`] table.
//! Nothing is registered globally: two markups with different registries do
//! not see each other's directives.
//!
//! # Architecture
//!
//! Processing runs in two phases around the external renderer:
//!
//! 1. **Preprocessing** ([`DirectiveProcessor::process`]): registered
//!    explicit-markup blocks (`.. name:: args`) are parsed into a
//!    [`DirectiveBlock`], handed to their [`Directive`], and replaced by a
//!    `raw` HTML placeholder that the renderer passes through unchanged.
//!    Unregistered directives are left for the renderer.
//!
//! 2. **Post-processing** ([`Prepared::finish`]): each [`Node`] is rendered by
//!    the [`NodeVisitor`] registered for its kind, and placeholders are
//!    swapped for the output in one pass using [`Replacements`].
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use markups_rst::SourceEnvironment;
//! use markups_rst::directive::{
//!     Directive, DirectiveBlock, DirectiveContext, DirectiveError, DirectiveProcessor,
//!     DirectiveRegistry, Node, NodeHandlers, NodeVisitor,
//! };
//!
//! struct Kbd;
//!
//! impl Directive for Kbd {
//!     fn run(&self, block: &DirectiveBlock, ctx: &DirectiveContext<'_>) -> Result<Node, DirectiveError> {
//!         Ok(Node::new("kbd", block.arguments.join(" "), ctx.line))
//!     }
//! }
//!
//! struct KbdVisitor;
//!
//! impl NodeVisitor for KbdVisitor {
//!     fn visit(&mut self, node: &Node, _env: &SourceEnvironment) -> String {
//!         format!("<kbd>{}</kbd>", node.content)
//!     }
//! }
//!
//! let mut registry = DirectiveRegistry::new();
//! registry.register("kbd", Arc::new(Kbd));
//! let mut handlers = NodeHandlers::new();
//! handlers.insert("kbd", KbdVisitor);
//!
//! let env = SourceEnvironment::default();
//! let prepared = DirectiveProcessor::new(&registry, &env).process(".. kbd:: Ctrl+C\n");
//! assert!(prepared.source.contains(".. raw:: html"));
//!
//! // The renderer passes the raw placeholder through; simulate that here.
//! let mut body = prepared.source.clone();
//! prepared.finish(&mut body, &mut handlers, &env);
//! assert!(body.contains("<kbd>Ctrl+C</kbd>"));
//! ```

mod block;
mod context;
mod node;
mod processor;
mod registry;
mod replacements;
mod translator;

pub use block::DirectiveBlock;
pub use context::DirectiveContext;
pub use node::Node;
pub use processor::{DirectiveProcessor, Prepared};
pub(crate) use processor::{escape_html, system_message};
pub use registry::{Directive, DirectiveError, DirectiveRegistry};
pub use replacements::Replacements;
pub use translator::{NodeHandlers, NodeVisitor};
