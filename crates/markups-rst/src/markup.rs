//! The reStructuredText markup adapter.

use std::path::{Path, PathBuf};

use markups::highlight::{self, HighlightStyle};
use markups::{
    Capability, Catalog, ConvertedMarkup, Markup, MarkupClass, MarkupInfo, MathJaxUrls, Version,
};
use markups_config::Config;

use crate::consts::{
    CODE_SELECTOR, DEFAULT_PYTHON, MATHJAX_CONFIG_QUERY, MATHJAX_HEAD_MARKER,
    MINIMUM_DOCUTILS_VERSION, STYLE_END, STYLE_START,
};
use crate::directive::{DirectiveProcessor, DirectiveRegistry, NodeHandlers};
use crate::graphviz::{self, GraphvizSettings};
use crate::{DocutilsPublisher, Overrides, Publisher, RstError, SourceEnvironment};
use crate::{merge_overrides, probe_docutils};

/// reStructuredText converter backed by Docutils.
///
/// The effective Docutils settings always contain `math_output` (MathJax from
/// the public CDN) and `syntax_highlight = "short"`. Caller overrides for
/// these two keys are replaced silently; all other keys pass through.
///
/// When the Graphviz `dot` executable is found at construction, the
/// `graphviz`, `graph` and `digraph` directives are registered in this
/// markup's own directive registry.
pub struct RestructuredTextMarkup {
    filename: Option<PathBuf>,
    overrides: Overrides,
    publisher: Box<dyn Publisher>,
    directives: DirectiveRegistry,
    handlers: NodeHandlers,
    environment: SourceEnvironment,
    mathjax: MathJaxUrls,
    highlight: HighlightStyle,
}

impl RestructuredTextMarkup {
    /// Create a markup for the document at `filename` with Docutils
    /// setting overrides.
    #[must_use]
    pub fn new(filename: Option<&Path>, overrides: Option<Overrides>) -> Self {
        let mut builder = Self::builder();
        if let Some(filename) = filename {
            builder = builder.filename(filename);
        }
        if let Some(overrides) = overrides {
            builder = builder.overrides(overrides);
        }
        builder.build()
    }

    #[must_use]
    pub fn builder() -> RestructuredTextMarkupBuilder {
        RestructuredTextMarkupBuilder::default()
    }

    /// Whether Docutils is importable by `python` and recent enough.
    #[must_use]
    pub fn available_with(python: &str) -> bool {
        docutils_capability(python).is_available()
    }

    /// Effective Docutils settings.
    #[must_use]
    pub fn overrides(&self) -> &Overrides {
        &self.overrides
    }

    /// Directives handled by this markup before Docutils sees the source.
    #[must_use]
    pub fn directives(&self) -> &DirectiveRegistry {
        &self.directives
    }

    /// Whether the Graphviz directives are registered.
    #[must_use]
    pub fn has_diagrams(&self) -> bool {
        self.directives.contains("graphviz")
    }
}

impl std::fmt::Debug for RestructuredTextMarkup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestructuredTextMarkup")
            .field("filename", &self.filename)
            .field("overrides", &self.overrides)
            .field("directives", &self.directives)
            .field("handlers", &self.handlers)
            .finish_non_exhaustive()
    }
}

/// Docutils found through `python`, if at least the minimum version.
fn docutils_capability(python: &str) -> Capability<Version> {
    let Ok(minimum) = MINIMUM_DOCUTILS_VERSION.parse::<Version>() else {
        return Capability::Unavailable;
    };
    probe_docutils(python).filter(|version| {
        let recent = *version >= minimum;
        if !recent {
            tracing::debug!(python, version = %version, minimum = %minimum, "Docutils is too old");
        }
        recent
    })
}

/// Markups provided by this crate, for lookup by file or language name.
///
/// Instances created through the catalog use the default interpreter and
/// settings.
#[must_use]
pub fn catalog() -> Catalog<RestructuredTextMarkup> {
    let mut catalog = Catalog::new();
    catalog.register(MarkupClass::of::<RestructuredTextMarkup>(|path| {
        RestructuredTextMarkup::new(Some(path), None)
    }));
    catalog
}

impl Markup for RestructuredTextMarkup {
    type Output = ConvertedReStructuredText;
    type Error = RstError;

    const INFO: MarkupInfo = MarkupInfo {
        name: "reStructuredText",
        language_home_page: "http://docutils.sourceforge.net/rst.html",
        module_home_page: "http://docutils.sourceforge.net/",
        syntax_documentation: "http://docutils.sourceforge.net/docs/ref/rst/restructuredtext.html",
        file_extensions: &[".rst", ".rest"],
        default_extension: ".rst",
    };

    fn available() -> bool {
        Self::available_with(DEFAULT_PYTHON)
    }

    fn filename(&self) -> Option<&Path> {
        self.filename.as_deref()
    }

    fn convert(&mut self, text: &str) -> Result<ConvertedReStructuredText, RstError> {
        let prepared = DirectiveProcessor::new(&self.directives, &self.environment)
            .with_source_path(self.filename.as_deref())
            .process(text);

        let parts = self
            .publisher
            .publish(&prepared.source, self.filename.as_deref(), &self.overrides)?;

        let mut body = parts.html_body;
        prepared.finish(&mut body, &mut self.handlers, &self.environment);

        let mut stylesheet = extract_stylesheet(&parts.stylesheet);
        stylesheet.push_str(&highlight::stylesheet(CODE_SELECTOR, self.highlight));

        Ok(ConvertedReStructuredText {
            head: parts.head,
            body,
            title: parts.title,
            stylesheet,
            mathjax: self.mathjax.clone(),
        })
    }
}

/// Builder for [`RestructuredTextMarkup`].
///
/// # Example
///
/// ```no_run
/// use markups::highlight::HighlightStyle;
/// use markups_rst::RestructuredTextMarkup;
///
/// let markup = RestructuredTextMarkup::builder()
///     .filename("docs/index.rst")
///     .python("python3.12")
///     .highlight(HighlightStyle::Disabled)
///     .graphviz(None)
///     .build();
/// assert!(!markup.has_diagrams());
/// ```
pub struct RestructuredTextMarkupBuilder {
    filename: Option<PathBuf>,
    overrides: Option<Overrides>,
    python: Option<String>,
    publisher: Option<Box<dyn Publisher>>,
    mathjax: MathJaxUrls,
    highlight: HighlightStyle,
    graphviz: Option<GraphvizSettings>,
    directives: DirectiveRegistry,
    handlers: NodeHandlers,
}

impl Default for RestructuredTextMarkupBuilder {
    fn default() -> Self {
        Self {
            filename: None,
            overrides: None,
            python: None,
            publisher: None,
            mathjax: MathJaxUrls::default(),
            highlight: HighlightStyle::Default,
            graphviz: Some(GraphvizSettings::default()),
            directives: DirectiveRegistry::new(),
            handlers: NodeHandlers::new(),
        }
    }
}

impl RestructuredTextMarkupBuilder {
    /// Path of the source document.
    #[must_use]
    pub fn filename(mut self, filename: impl Into<PathBuf>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    /// Docutils setting overrides. The two fixed settings always win.
    #[must_use]
    pub fn overrides(mut self, overrides: Overrides) -> Self {
        self.overrides = Some(overrides);
        self
    }

    /// Python interpreter running Docutils (default `python3`).
    #[must_use]
    pub fn python(mut self, python: impl Into<String>) -> Self {
        self.python = Some(python.into());
        self
    }

    /// Use a custom publisher instead of Docutils.
    #[must_use]
    pub fn publisher(mut self, publisher: Box<dyn Publisher>) -> Self {
        self.publisher = Some(publisher);
        self
    }

    #[must_use]
    pub fn mathjax(mut self, mathjax: MathJaxUrls) -> Self {
        self.mathjax = mathjax;
        self
    }

    #[must_use]
    pub fn highlight(mut self, highlight: HighlightStyle) -> Self {
        self.highlight = highlight;
        self
    }

    /// Graphviz settings, or `None` to never register the diagram directives.
    #[must_use]
    pub fn graphviz(mut self, graphviz: Option<GraphvizSettings>) -> Self {
        self.graphviz = graphviz;
        self
    }

    /// Start from a caller-populated directive registry and visitor table.
    #[must_use]
    pub fn directives(mut self, directives: DirectiveRegistry, handlers: NodeHandlers) -> Self {
        self.directives = directives;
        self.handlers = handlers;
        self
    }

    /// Apply a loaded configuration.
    ///
    /// Configured Docutils settings replace any overrides set earlier.
    #[must_use]
    pub fn with_config(mut self, config: &Config) -> Self {
        self.python = Some(config.restructuredtext.python.clone());
        if !config.restructuredtext.settings.is_empty() {
            self.overrides = Some(config.restructuredtext.settings.clone());
        }
        self.mathjax = config.mathjax.urls();
        self.highlight = config.highlight_style;
        self.graphviz = GraphvizSettings::from_config(&config.graphviz);
        self
    }

    #[must_use]
    pub fn build(self) -> RestructuredTextMarkup {
        let overrides = merge_overrides(self.overrides);
        let publisher = self.publisher.unwrap_or_else(|| {
            let python = self.python.unwrap_or_else(|| DEFAULT_PYTHON.to_owned());
            Box::new(DocutilsPublisher::new(python))
        });

        let language = self.graphviz.as_ref().and_then(|g| g.language.clone());
        let environment =
            SourceEnvironment::new(self.filename.as_deref()).with_language(language);

        let mut directives = self.directives;
        let mut handlers = self.handlers;
        if let Some(settings) = self.graphviz
            && graphviz::try_register(&mut directives, &mut handlers, settings)
        {
            tracing::debug!("Registered Graphviz directives");
        }

        RestructuredTextMarkup {
            filename: self.filename,
            overrides,
            publisher,
            directives,
            handlers,
            environment,
            mathjax: self.mathjax,
            highlight: self.highlight,
        }
    }
}

/// Inner text of the embedded `<style>` block in a Docutils `stylesheet`
/// part.
///
/// Returns an empty string when there is no `<style type="text/css">` tag.
/// A missing closing tag takes the rest of the fragment.
#[must_use]
pub fn extract_stylesheet(raw: &str) -> String {
    let Some(start) = raw.find(STYLE_START) else {
        return String::new();
    };
    let content_start = start + STYLE_START.len();
    let end = raw
        .rfind(STYLE_END)
        .filter(|&end| end >= content_start)
        .unwrap_or(raw.len());
    raw[content_start..end].to_owned()
}

/// A document converted by [`RestructuredTextMarkup`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertedReStructuredText {
    head: String,
    body: String,
    title: String,
    stylesheet: String,
    mathjax: MathJaxUrls,
}

impl ConvertedReStructuredText {
    #[must_use]
    pub fn new(
        head: impl Into<String>,
        body: impl Into<String>,
        title: impl Into<String>,
        stylesheet: impl Into<String>,
    ) -> Self {
        Self {
            head: head.into(),
            body: body.into(),
            title: title.into(),
            stylesheet: stylesheet.into(),
            mathjax: MathJaxUrls::default(),
        }
    }

    /// Use `mathjax` for the script tag.
    #[must_use]
    pub fn with_mathjax(mut self, mathjax: MathJaxUrls) -> Self {
        self.mathjax = mathjax;
        self
    }

    /// Head markup produced by Docutils.
    #[must_use]
    pub fn head(&self) -> &str {
        &self.head
    }
}

impl ConvertedMarkup for ConvertedReStructuredText {
    fn title(&self) -> &str {
        &self.title
    }

    fn body(&self) -> &str {
        &self.body
    }

    fn stylesheet(&self) -> &str {
        &self.stylesheet
    }

    /// MathJax script tag, when the document contains math.
    fn javascript(&self, web_env: bool) -> String {
        if !self.head.contains(MATHJAX_HEAD_MARKER) {
            return String::new();
        }
        format!(
            "<script type=\"text/javascript\" src=\"{}{MATHJAX_CONFIG_QUERY}\"></script>\n",
            self.mathjax.url(web_env)
        )
    }
}
