//! CLI error types.

use std::path::PathBuf;

use markups_config::ConfigError;
use markups_rst::RstError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Rst(#[from] RstError),

    #[error("{}: not a reStructuredText file (expected .rst or .rest)", .0.display())]
    UnsupportedFile(PathBuf),

    #[error("{0}")]
    Unavailable(String),
}
