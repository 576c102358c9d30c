//! Internal constants for the reStructuredText markup.

/// Oldest Docutils release with the `math_output` and `syntax_highlight`
/// settings this markup relies on.
pub const MINIMUM_DOCUTILS_VERSION: &str = "0.13";

/// Query string selecting the MathJax configuration profile.
pub(crate) const MATHJAX_CONFIG_QUERY: &str = "?config=TeX-AMS_CHTML";

/// Marker Docutils leaves in the head part when a document contains math.
pub(crate) const MATHJAX_HEAD_MARKER: &str = "MathJax.js?config=TeX-AMS_CHTML";

/// Opening tag of the embedded stylesheet in the Docutils `stylesheet` part.
pub(crate) const STYLE_START: &str = r#"<style type="text/css">"#;

/// Closing tag of the embedded stylesheet.
pub(crate) const STYLE_END: &str = "</style>";

/// CSS selector Docutils puts on highlighted code (`syntax_highlight = short`).
pub(crate) const CODE_SELECTOR: &str = ".code";

/// Interpreter used when none is configured.
pub(crate) const DEFAULT_PYTHON: &str = "python3";
