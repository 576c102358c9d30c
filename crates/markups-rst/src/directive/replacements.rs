//! Single-pass string replacement for post-processing.

/// Collects placeholder replacements and applies them together.
///
/// # Example
///
/// ```
/// use markups_rst::directive::Replacements;
///
/// let mut html = "<p>a</p>\n<!-- markups-node:0 -->\n".to_owned();
/// let mut replacements = Replacements::new();
/// replacements.add("<!-- markups-node:0 -->", "<div class=\"graphviz\"></div>");
/// replacements.apply(&mut html);
///
/// assert_eq!(html, "<p>a</p>\n<div class=\"graphviz\"></div>\n");
/// ```
#[derive(Debug, Default)]
pub struct Replacements {
    items: Vec<(String, String)>,
}

impl Replacements {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
        }
    }

    /// Register a replacement: all occurrences of `from` become `to`.
    ///
    /// Replacements are applied in the order they are added.
    pub fn add(&mut self, from: impl Into<String>, to: impl Into<String>) {
        self.items.push((from.into(), to.into()));
    }

    /// Apply all registered replacements, consuming the collector.
    pub fn apply(self, html: &mut String) {
        for (from, to) in self.items {
            if html.contains(&from) {
                *html = html.replace(&from, &to);
            }
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }
}
