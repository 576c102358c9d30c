//! reStructuredText markup backed by Docutils.
//!
//! [`RestructuredTextMarkup`] adapts the Docutils publisher to the
//! [`markups::Markup`] abstraction. Docutils does all parsing and HTML
//! generation; this crate configures it, extracts the parts of its output,
//! and optionally adds Graphviz diagram directives.
//!
//! # Architecture
//!
//! - [`publisher`]: the [`Publisher`] trait and the Docutils implementation
//!   (a Python interpreter driven over JSON on stdin/stdout)
//! - [`directive`]: caller-owned [`DirectiveRegistry`] and translator
//!   [`NodeHandlers`] table, plus the two-phase processor that runs
//!   registered directives around the publisher
//! - [`graphviz`]: `graphviz`, `graph` and `digraph` directives rendered
//!   with the `dot` executable
//!
//! # Example
//!
//! ```no_run
//! use markups::{ConvertedMarkup, Markup};
//! use markups_rst::RestructuredTextMarkup;
//!
//! if RestructuredTextMarkup::available() {
//!     let mut markup = RestructuredTextMarkup::new(None, None);
//!     let doc = markup.convert("Hello *world*").unwrap();
//!     assert!(doc.body().contains("<em>world</em>"));
//! }
//! ```

mod consts;
pub mod directive;
mod environment;
mod error;
pub mod graphviz;
mod markup;
mod overrides;
pub mod publisher;

pub use consts::MINIMUM_DOCUTILS_VERSION;
pub use directive::{DirectiveRegistry, NodeHandlers};
pub use environment::SourceEnvironment;
pub use error::RstError;
pub use markup::{
    ConvertedReStructuredText, RestructuredTextMarkup, RestructuredTextMarkupBuilder, catalog,
    extract_stylesheet,
};
pub use overrides::{MATH_OUTPUT, Overrides, SYNTAX_HIGHLIGHT, fixed_overrides, merge_overrides};
pub use publisher::{DocumentParts, DocutilsPublisher, PublishError, Publisher, probe_docutils};
