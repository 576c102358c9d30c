//! `markups convert` command implementation.

use std::io::Write;
use std::path::{Path, PathBuf};

use clap::Args;
use markups::{ConvertedMarkup, Markup, WholeHtmlOptions};
use markups_config::{CliSettings, Config};
use markups_rst::RestructuredTextMarkup;

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the convert command.
#[derive(Args)]
pub(crate) struct ConvertArgs {
    /// reStructuredText file to convert.
    file: PathBuf,

    /// Write the HTML document here instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Reference MathJax from the web instead of the local installation.
    #[arg(long)]
    web: bool,

    /// Do not embed the stylesheet.
    #[arg(long)]
    no_stylesheet: bool,

    /// Title used when the document has none (default: file name).
    #[arg(long)]
    title: Option<String>,

    /// Docutils setting override, e.g. `--set toc_backlinks=none`.
    #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    settings: Vec<(String, String)>,

    /// Python interpreter running Docutils (overrides config).
    #[arg(long, env = "MARKUPS_PYTHON")]
    python: Option<String>,

    /// Do not register the Graphviz directives.
    #[arg(long)]
    no_graphviz: bool,

    /// Path to configuration file (default: auto-discover markups.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose output (info-level logging).
    #[arg(short, long)]
    pub(crate) verbose: bool,
}

impl ConvertArgs {
    /// Execute the convert command.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is not reStructuredText, Docutils is
    /// missing, or conversion fails.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let catalog = markups_rst::catalog();
        let Some(class) = catalog.class_for_file_name(&self.file) else {
            return Err(CliError::UnsupportedFile(self.file));
        };
        tracing::debug!(markup = class.info().name, "Selected markup");

        let cli_settings = CliSettings {
            python: self.python.clone(),
            settings: self.settings.clone(),
            graphviz_enabled: self.no_graphviz.then_some(false),
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        let python = &config.restructuredtext.python;
        if !RestructuredTextMarkup::available_with(python) {
            return Err(CliError::Unavailable(format!(
                "Docutils {} or later is not available through '{python}'",
                markups_rst::MINIMUM_DOCUTILS_VERSION
            )));
        }

        let text = std::fs::read_to_string(&self.file)?;
        let mut markup = RestructuredTextMarkup::builder()
            .with_config(&config)
            .filename(&self.file)
            .build();
        tracing::info!(file = %self.file.display(), diagrams = markup.has_diagrams(), "Converting");

        let doc = markup.convert(&text)?;
        let options = WholeHtmlOptions::default()
            .with_stylesheet(!self.no_stylesheet)
            .with_web_env(self.web)
            .with_fallback_title(self.fallback_title());
        let html = doc.whole_html(&options);

        match &self.output {
            Some(path) => {
                std::fs::write(path, html)?;
                output.success(&format!("Wrote {}", path.display()));
            }
            None => std::io::stdout().lock().write_all(html.as_bytes())?,
        }
        Ok(())
    }

    fn fallback_title(&self) -> String {
        self.title
            .clone()
            .unwrap_or_else(|| file_title(&self.file))
    }
}

/// File name without extension.
fn file_title(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Parse a `KEY=VALUE` pair.
fn parse_key_value(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("invalid setting '{s}': expected KEY=VALUE"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("invalid setting '{s}': empty key"));
    }
    Ok((key.to_owned(), value.to_owned()))
}
