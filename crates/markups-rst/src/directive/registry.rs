//! Directive handlers and their registry.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use super::{DirectiveBlock, DirectiveContext, Node};

/// Error raised by a directive handler.
///
/// Directive errors are reported as warnings and rendered in place of the
/// block; they never abort a conversion.
#[derive(Debug, thiserror::Error)]
pub enum DirectiveError {
    /// The block is not valid for this directive.
    #[error("{0}")]
    Invalid(String),
    /// A referenced file could not be read.
    #[error("external file '{}' not found or reading it failed: {source}", .path.display())]
    Read {
        /// Resolved path of the file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

/// Handler for an explicit-markup directive: `.. name:: arguments`.
///
/// One handler may be registered under several names; the name used in the
/// source is available as [`DirectiveBlock::name`].
pub trait Directive: Send + Sync {
    /// Turn a parsed block into a node.
    fn run(&self, block: &DirectiveBlock, ctx: &DirectiveContext<'_>)
    -> Result<Node, DirectiveError>;
}

/// Caller-owned table of directive handlers, keyed by directive name.
#[derive(Default, Clone)]
pub struct DirectiveRegistry {
    handlers: BTreeMap<String, Arc<dyn Directive>>,
}

impl DirectiveRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` under `name`, replacing any previous handler.
    pub fn register(&mut self, name: impl Into<String>, handler: Arc<dyn Directive>) {
        let name = name.into();
        if self.handlers.insert(name.clone(), handler).is_some() {
            tracing::debug!(directive = %name, "Replaced directive handler");
        }
    }

    /// Look up the handler for `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Arc<dyn Directive>> {
        self.handlers.get(name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    /// Registered directive names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.handlers.keys().map(String::as_str)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl std::fmt::Debug for DirectiveRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.handlers.keys()).finish()
    }
}
