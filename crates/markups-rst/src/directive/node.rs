//! Document tree nodes produced by directives.

use std::collections::BTreeMap;

/// A node produced by a directive and rendered by a [`NodeVisitor`].
///
/// [`NodeVisitor`]: super::NodeVisitor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    /// Node kind, used to select the visitor (e.g., `graphviz`).
    pub kind: String,
    /// Main payload (e.g., the dot source of a diagram).
    pub content: String,
    /// Named attributes (e.g., `alt`, `align`, `caption`).
    pub attrs: BTreeMap<String, String>,
    /// Extra CSS classes.
    pub classes: Vec<String>,
    /// Source line of the directive (1-indexed).
    pub line: usize,
}

impl Node {
    #[must_use]
    pub fn new(kind: impl Into<String>, content: impl Into<String>, line: usize) -> Self {
        Self {
            kind: kind.into(),
            content: content.into(),
            attrs: BTreeMap::new(),
            classes: Vec::new(),
            line,
        }
    }

    /// Get an attribute value.
    #[must_use]
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs.get(key).map(String::as_str)
    }

    /// Set an attribute, replacing any previous value.
    pub fn set_attr(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.attrs.insert(key.into(), value.into());
    }
}
