//! Content-addressed image names.

use std::collections::BTreeMap;

use sha2::{Digest, Sha256};

use super::OutputFormat;

/// Image file name prefix.
const PREFIX: &str = "graphviz";

/// Everything that affects a rendered diagram.
#[derive(Debug, Clone, Copy)]
pub struct GraphvizKey<'a> {
    /// Dot source.
    pub code: &'a str,
    /// Directive options (`alt`, `caption`, `graphviz_dot`, ...).
    pub options: &'a BTreeMap<String, String>,
    /// `dot` executable (a layout engine such as `neato` when overridden).
    pub dot: &'a str,
    /// Extra `dot` arguments.
    pub dot_args: &'a [String],
    pub format: OutputFormat,
}

impl GraphvizKey<'_> {
    /// Hex-encoded SHA-256 of `{dot}:{args}:{format}:{options}:{code}`,
    /// with options as sorted `key=value` pairs.
    #[must_use]
    pub fn compute_hash(&self) -> String {
        let options = self
            .options
            .iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect::<Vec<_>>()
            .join(";");
        let content = format!(
            "{}:{}:{}:{options}:{}",
            self.dot,
            self.dot_args.join(" "),
            self.format,
            self.code
        );
        let mut hasher = Sha256::new();
        hasher.update(content.as_bytes());
        hex::encode(hasher.finalize())
    }

    /// Output file name: `graphviz-<hash>.<format>`.
    #[must_use]
    pub fn file_name(&self) -> String {
        format!("{PREFIX}-{}.{}", self.compute_hash(), self.format)
    }
}
