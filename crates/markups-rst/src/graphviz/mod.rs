//! Graphviz diagram directives.
//!
//! Registers `graphviz`, `graph` and `digraph` into a [`DirectiveRegistry`]
//! and a `graphviz` visitor into a [`NodeHandlers`] table. Diagrams are laid
//! out by the external `dot` executable into the output directory of a
//! [`GraphvizBuilder`] and referenced from the HTML by path.
//!
//! ```text
//! .. graphviz::
//!
//!    digraph { a -> b }
//!
//! .. digraph:: deps
//!    :caption: Crate dependencies
//!
//!    cli -> rst -> core;
//! ```

mod builder;
mod directive;
mod key;
mod visitor;

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::{Arc, LazyLock, Mutex};

use markups::Capability;
use markups_config::GraphvizConfig;

pub use builder::{GraphvizBuilder, GraphvizError, IMAGE_DIR};
pub use directive::{GraphvizDirective, GraphvizSimpleDirective};
pub use key::GraphvizKey;
pub use visitor::GraphvizVisitor;

use crate::directive::{Directive, DirectiveRegistry, NodeHandlers};

/// Node kind produced by the Graphviz directives.
pub const NODE_KIND: &str = "graphviz";

/// Image format produced by `dot`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Svg,
    Png,
}

impl OutputFormat {
    /// File extension and `dot -T` argument.
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Svg => "svg",
            Self::Png => "png",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "svg" => Ok(Self::Svg),
            "png" => Ok(Self::Png),
            other => Err(format!(
                "unknown output format '{other}' (expected 'svg' or 'png')"
            )),
        }
    }
}

/// Settings of the diagram builder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphvizSettings {
    /// `dot` executable, overridable per diagram with `:graphviz_dot:`.
    pub dot: String,
    /// Extra arguments passed to every `dot` invocation.
    pub dot_args: Vec<String>,
    pub output_format: OutputFormat,
    /// Document language, used to prefer translated `.dot` files.
    pub language: Option<String>,
}

impl Default for GraphvizSettings {
    fn default() -> Self {
        Self {
            dot: "dot".to_owned(),
            dot_args: Vec::new(),
            output_format: OutputFormat::Svg,
            language: None,
        }
    }
}

impl GraphvizSettings {
    /// Settings from the `[graphviz]` config section.
    ///
    /// Returns `None` when the section disables Graphviz.
    #[must_use]
    pub fn from_config(config: &GraphvizConfig) -> Option<Self> {
        if !config.enabled {
            return None;
        }
        let output_format = config.output_format.parse().unwrap_or_else(|e: String| {
            tracing::warn!(error = %e, "Falling back to SVG output");
            OutputFormat::Svg
        });
        Some(Self {
            dot: config.dot.clone(),
            dot_args: config.dot_args.clone(),
            output_format,
            language: None,
        })
    }
}

static DOT_PROBES: LazyLock<Mutex<HashMap<String, Capability<PathBuf>>>> =
    LazyLock::new(|| Mutex::new(HashMap::new()));

/// Locate the `dot` executable.
///
/// The result is cached per program name for the lifetime of the process.
pub fn probe_dot(program: &str) -> Capability<PathBuf> {
    let mut probes = DOT_PROBES
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner);
    probes
        .entry(program.to_owned())
        .or_insert_with(|| match which::which(program) {
            Ok(path) => {
                tracing::debug!(program, path = %path.display(), "Found Graphviz");
                Capability::Available(path)
            }
            Err(e) => {
                tracing::debug!(program, error = %e, "Graphviz not found");
                Capability::Unavailable
            }
        })
        .clone()
}

/// Register the Graphviz directives and visitor, rendering with `builder`.
pub fn register(
    registry: &mut DirectiveRegistry,
    handlers: &mut NodeHandlers,
    builder: GraphvizBuilder,
) {
    registry.register("graphviz", Arc::new(GraphvizDirective));
    let simple: Arc<dyn Directive> = Arc::new(GraphvizSimpleDirective);
    registry.register("graph", Arc::clone(&simple));
    registry.register("digraph", simple);
    handlers.insert(NODE_KIND, GraphvizVisitor::new(builder));
}

/// Register Graphviz support if `dot` can be found and a builder created.
///
/// Returns whether anything was registered. An unusable extension is not an
/// error: the markup simply has no diagram directives.
pub fn try_register(
    registry: &mut DirectiveRegistry,
    handlers: &mut NodeHandlers,
    settings: GraphvizSettings,
) -> bool {
    if !probe_dot(&settings.dot).is_available() {
        return false;
    }
    match GraphvizBuilder::new(settings) {
        Ok(builder) => {
            register(registry, handlers, builder);
            true
        }
        Err(e) => {
            tracing::warn!(error = %e, "Failed to create Graphviz output directory");
            false
        }
    }
}
