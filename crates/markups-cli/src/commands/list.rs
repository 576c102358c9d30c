//! `markups list` command implementation.

use std::path::PathBuf;

use clap::Args;
use markups::{Capability, Markup};
use markups_config::Config;
use markups_rst::graphviz::probe_dot;
use markups_rst::{RestructuredTextMarkup, probe_docutils};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the list command.
#[derive(Args)]
pub(crate) struct ListArgs {
    /// Path to configuration file (default: auto-discover markups.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose output (info-level logging).
    #[arg(short, long)]
    pub(crate) verbose: bool,
}

impl ListArgs {
    /// Print each markup and the external tools it relies on.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = Config::load(self.config.as_deref(), None)?;

        for class in markups_rst::catalog().classes() {
            let info = class.info();
            output.heading(&format!(
                "{} ({})",
                info.name,
                info.file_extensions.join(", ")
            ));
            let docutils = info == &RestructuredTextMarkup::INFO;
            if docutils {
                print_docutils(&output, &config);
            }
            output.info(&format!("  Syntax: {}", info.syntax_documentation));
            if docutils {
                print_graphviz(&output, &config);
            }
        }
        Ok(())
    }
}

fn print_docutils(output: &Output, config: &Config) {
    let python = &config.restructuredtext.python;
    if RestructuredTextMarkup::available_with(python) {
        if let Capability::Available(version) = probe_docutils(python) {
            output.success(&format!("  Docutils {version} via {python}"));
        }
    } else {
        output.warning(&format!(
            "  unavailable: Docutils {} or later not found via {python}",
            markups_rst::MINIMUM_DOCUTILS_VERSION
        ));
    }
}

fn print_graphviz(output: &Output, config: &Config) {
    if !config.graphviz.enabled {
        output.info("  Graphviz: disabled");
        return;
    }
    match probe_dot(&config.graphviz.dot) {
        Capability::Available(path) => {
            output.success(&format!("  Graphviz: {}", path.display()));
        }
        Capability::Unavailable => {
            output.warning(&format!("  Graphviz: '{}' not found", config.graphviz.dot));
        }
    }
}
