//! Common abstraction for lightweight markup languages.
//!
//! A markup implementation converts source text into a [`ConvertedMarkup`]:
//! an HTML body plus the metadata needed to assemble a complete page
//! (title, stylesheet, optional JavaScript).
//!
//! # Architecture
//!
//! - [`Markup`]: a configured converter for one language, described by a
//!   static [`MarkupInfo`]
//! - [`Catalog`]: the known markups as [`MarkupClass`]es, looked up by file
//!   name or language name
//! - [`ConvertedMarkup`]: the conversion result, with
//!   [`whole_html`](ConvertedMarkup::whole_html) for standalone documents
//! - [`Capability`]: tagged result of probing an optional external tool
//! - [`highlight`]: Pygments-compatible stylesheet for highlighted code
//!
//! # Example
//!
//! ```
//! use markups::{ConvertedMarkup, WholeHtmlOptions};
//!
//! struct Plain(String);
//!
//! impl ConvertedMarkup for Plain {
//!     fn title(&self) -> &str { "" }
//!     fn body(&self) -> &str { &self.0 }
//!     fn stylesheet(&self) -> &str { "" }
//! }
//!
//! let doc = Plain("<p>hi</p>\n".to_owned());
//! let html = doc.whole_html(&WholeHtmlOptions::default().with_fallback_title("Draft"));
//! assert!(html.contains("<title>Draft</title>"));
//! ```

mod capability;
mod catalog;
mod converted;
pub mod highlight;
mod markup;
mod mathjax;
mod version;

pub use capability::Capability;
pub use catalog::{Catalog, MarkupClass};
pub use converted::{ConvertedMarkup, WholeHtmlOptions};
pub use highlight::HighlightStyle;
pub use markup::{Markup, MarkupInfo};
pub use mathjax::{MATHJAX_LOCAL_URL, MATHJAX_WEB_URL, MathJaxUrls};
pub use version::{ParseVersionError, Version};
