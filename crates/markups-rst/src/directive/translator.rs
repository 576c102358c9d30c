//! Translator capability table: node kind → visitor.

use std::collections::BTreeMap;

use super::Node;
use crate::SourceEnvironment;

/// Renders one kind of [`Node`] to HTML.
///
/// Visitors handle their own failures: they log and return fallback markup
/// rather than aborting the conversion.
pub trait NodeVisitor: Send {
    fn visit(&mut self, node: &Node, env: &SourceEnvironment) -> String;
}

/// Table of node visitors, passed explicitly to the post-processing phase.
#[derive(Default)]
pub struct NodeHandlers {
    visitors: BTreeMap<String, Box<dyn NodeVisitor>>,
}

impl NodeHandlers {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the visitor for `kind`, replacing any previous one.
    pub fn insert<V: NodeVisitor + 'static>(&mut self, kind: impl Into<String>, visitor: V) {
        self.visitors.insert(kind.into(), Box::new(visitor));
    }

    #[must_use]
    pub fn contains(&self, kind: &str) -> bool {
        self.visitors.contains_key(kind)
    }

    /// Render `node` with the visitor for its kind.
    ///
    /// Returns `None` if no visitor handles the node kind.
    pub fn visit(&mut self, node: &Node, env: &SourceEnvironment) -> Option<String> {
        self.visitors
            .get_mut(&node.kind)
            .map(|visitor| visitor.visit(node, env))
    }
}

impl std::fmt::Debug for NodeHandlers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.visitors.keys()).finish()
    }
}
