//! MathJax script locations.

/// MathJax served from the public CDN.
pub const MATHJAX_WEB_URL: &str = "https://cdn.mathjax.org/mathjax/latest/MathJax.js";

/// MathJax installed by the system package manager.
pub const MATHJAX_LOCAL_URL: &str = "file:///usr/share/javascript/mathjax/MathJax.js";

/// Pair of MathJax script URLs, one for documents published on the web and
/// one for local (offline) previews.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MathJaxUrls {
    /// URL used when the document targets a web environment.
    pub web: String,
    /// URL used for local rendering.
    pub local: String,
}

impl Default for MathJaxUrls {
    fn default() -> Self {
        Self {
            web: MATHJAX_WEB_URL.to_owned(),
            local: MATHJAX_LOCAL_URL.to_owned(),
        }
    }
}

impl MathJaxUrls {
    /// Select the script URL for the target environment.
    #[must_use]
    pub fn url(&self, web_env: bool) -> &str {
        if web_env { &self.web } else { &self.local }
    }
}
