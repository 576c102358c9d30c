//! Conversion results and standalone document assembly.

/// Options for [`ConvertedMarkup::whole_html`].
#[derive(Debug, Clone)]
pub struct WholeHtmlOptions {
    /// Extra markup inserted into `<head>` before the title.
    pub custom_headers: String,
    /// Whether to embed the stylesheet in a `<style>` element.
    pub include_stylesheet: bool,
    /// Title used when the document does not define one.
    pub fallback_title: String,
    /// Whether the document targets a web environment (affects script URLs).
    pub web_env: bool,
}

impl Default for WholeHtmlOptions {
    fn default() -> Self {
        Self {
            custom_headers: String::new(),
            include_stylesheet: true,
            fallback_title: String::new(),
            web_env: false,
        }
    }
}

impl WholeHtmlOptions {
    #[must_use]
    pub fn with_custom_headers(mut self, headers: impl Into<String>) -> Self {
        self.custom_headers = headers.into();
        self
    }

    #[must_use]
    pub fn with_stylesheet(mut self, include: bool) -> Self {
        self.include_stylesheet = include;
        self
    }

    #[must_use]
    pub fn with_fallback_title(mut self, title: impl Into<String>) -> Self {
        self.fallback_title = title.into();
        self
    }

    #[must_use]
    pub fn with_web_env(mut self, web_env: bool) -> Self {
        self.web_env = web_env;
        self
    }
}

/// Result of converting a markup document.
pub trait ConvertedMarkup {
    /// Document title, or an empty string.
    fn title(&self) -> &str;

    /// HTML fragment for the document body.
    fn body(&self) -> &str;

    /// CSS for the document (without `<style>` tags).
    fn stylesheet(&self) -> &str;

    /// Script tags the document needs, or an empty string.
    fn javascript(&self, _web_env: bool) -> String {
        String::new()
    }

    /// Assemble a complete HTML document.
    fn whole_html(&self, options: &WholeHtmlOptions) -> String {
        let stylesheet = if options.include_stylesheet {
            format!("<style type=\"text/css\">\n{}</style>\n", self.stylesheet())
        } else {
            String::new()
        };

        let title = match self.title() {
            "" => options.fallback_title.as_str(),
            title => title,
        };
        let title = if title.is_empty() {
            String::new()
        } else {
            format!("<title>{title}</title>\n")
        };

        format!(
            "<!doctype html>\n\
             <html>\n\
             <head>\n\
             <meta http-equiv=\"content-type\" content=\"text/html; charset=utf-8\">\n\
             {headers}{title}{stylesheet}{javascript}\
             </head>\n\
             <body>\n\
             {body}\
             </body>\n\
             </html>\n",
            headers = options.custom_headers,
            javascript = self.javascript(options.web_env),
            body = self.body(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    struct Doc {
        title: &'static str,
    }

    impl ConvertedMarkup for Doc {
        fn title(&self) -> &str {
            self.title
        }

        fn body(&self) -> &str {
            "<p>body</p>\n"
        }

        fn stylesheet(&self) -> &str {
            "p { color: red }\n"
        }

        fn javascript(&self, web_env: bool) -> String {
            if web_env {
                "<script src=\"web.js\"></script>\n".to_owned()
            } else {
                String::new()
            }
        }
    }

    #[test]
    fn test_whole_html() {
        let html = Doc { title: "Hello" }.whole_html(&WholeHtmlOptions::default());
        assert_eq!(
            html,
            "<!doctype html>\n<html>\n<head>\n\
             <meta http-equiv=\"content-type\" content=\"text/html; charset=utf-8\">\n\
             <title>Hello</title>\n\
             <style type=\"text/css\">\np { color: red }\n</style>\n\
             </head>\n<body>\n<p>body</p>\n</body>\n</html>\n"
        );
    }

    #[test]
    fn test_fallback_title() {
        let doc = Doc { title: "" };
        let html = doc.whole_html(&WholeHtmlOptions::default().with_fallback_title("Untitled"));
        assert!(html.contains("<title>Untitled</title>"));

        let html = doc.whole_html(&WholeHtmlOptions::default());
        assert!(!html.contains("<title>"));
    }

    #[test]
    fn test_document_title_wins_over_fallback() {
        let html = Doc { title: "Real" }
            .whole_html(&WholeHtmlOptions::default().with_fallback_title("Untitled"));
        assert!(html.contains("<title>Real</title>"));
        assert!(!html.contains("Untitled"));
    }

    #[test]
    fn test_without_stylesheet_with_headers_and_script() {
        let html = Doc { title: "" }.whole_html(
            &WholeHtmlOptions::default()
                .with_stylesheet(false)
                .with_custom_headers("<meta name=\"x\">\n")
                .with_web_env(true),
        );
        assert!(!html.contains("<style"));
        assert!(html.contains("<meta name=\"x\">\n<script src=\"web.js\"></script>\n</head>"));
    }

    #[test]
    fn test_default_javascript_is_empty() {
        struct Bare;
        impl ConvertedMarkup for Bare {
            fn title(&self) -> &str {
                ""
            }
            fn body(&self) -> &str {
                ""
            }
            fn stylesheet(&self) -> &str {
                ""
            }
        }
        assert_eq!(Bare.javascript(true), "");
    }
}
