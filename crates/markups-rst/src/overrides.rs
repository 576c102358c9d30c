//! Docutils setting overrides.
//!
//! Two settings are always forced by this markup: `math_output` (MathJax from
//! the public CDN) and `syntax_highlight` (`short` Pygments classes, matching
//! the highlight stylesheet appended to every conversion). Caller values for
//! these keys are replaced without notice; every other key passes through.

use std::collections::BTreeMap;

use markups::MATHJAX_WEB_URL;

use crate::consts::MATHJAX_CONFIG_QUERY;

/// Docutils setting name → value.
pub type Overrides = BTreeMap<String, serde_json::Value>;

/// Setting selecting how math is rendered.
pub const MATH_OUTPUT: &str = "math_output";

/// Setting selecting the class names used for highlighted code.
pub const SYNTAX_HIGHLIGHT: &str = "syntax_highlight";

/// The settings forced on every Docutils publisher.
#[must_use]
pub fn fixed_overrides() -> [(&'static str, String); 2] {
    [
        (MATH_OUTPUT, format!("MathJax {MATHJAX_WEB_URL}{MATHJAX_CONFIG_QUERY}")),
        (SYNTAX_HIGHLIGHT, "short".to_owned()),
    ]
}

/// Merge caller overrides with the fixed settings. Fixed settings win.
#[must_use]
pub fn merge_overrides(caller: Option<Overrides>) -> Overrides {
    let mut overrides = caller.unwrap_or_default();
    for (key, value) in fixed_overrides() {
        overrides.insert(key.to_owned(), serde_json::Value::String(value));
    }
    overrides
}
