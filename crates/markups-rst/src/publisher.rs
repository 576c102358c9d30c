//! Document publishers.
//!
//! A [`Publisher`] turns reStructuredText source into the separately
//! retrievable parts of an HTML document. [`DocutilsPublisher`] runs the
//! Docutils `publish_parts` pipeline in a Python interpreter: the request is
//! written to stdin as JSON and the parts are read back from stdout.

use std::collections::HashMap;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};
use std::sync::{LazyLock, Mutex};

use markups::{Capability, Version};
use serde::{Deserialize, Serialize};

use crate::Overrides;

/// Parts of a published document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DocumentParts {
    /// Markup for the document `<head>` (scripts, meta tags).
    pub head: String,
    /// Body markup, wrapped in the writer's document container.
    pub html_body: String,
    /// Document title, empty when the source has none.
    pub title: String,
    /// Stylesheet markup (`<style>` block or `<link>` tags).
    pub stylesheet: String,
}

/// Publisher failure.
#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    /// The interpreter could not be started.
    #[error("failed to run '{program}': {source}")]
    Spawn {
        /// Program that failed to start.
        program: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// I/O error while talking to the interpreter.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// The renderer reported a fault (parse error, bad setting, ...).
    #[error("renderer failed ({status}): {stderr}")]
    Failed {
        /// Exit status of the interpreter.
        status: String,
        /// Error output, usually a Python traceback.
        stderr: String,
    },
    /// Output or request could not be (de)serialized.
    #[error("invalid renderer data: {0}")]
    Json(#[from] serde_json::Error),
}

/// Reader, parser and writer making up a Docutils pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Components {
    pub reader: &'static str,
    pub parser: &'static str,
    pub writer: &'static str,
}

impl Default for Components {
    /// Standalone reStructuredText to HTML.
    fn default() -> Self {
        Self {
            reader: "standalone",
            parser: "restructuredtext",
            writer: "html",
        }
    }
}

/// A configured renderer instance.
pub trait Publisher: Send {
    /// Render `source` with the given settings.
    ///
    /// `source_path` is used by the renderer to resolve relative resources
    /// (includes, images); it is not read by the publisher.
    fn publish(
        &self,
        source: &str,
        source_path: Option<&Path>,
        settings: &Overrides,
    ) -> Result<DocumentParts, PublishError>;
}

/// Python driver around `docutils.core.publish_parts`.
const PUBLISH_DRIVER: &str = r#"
import json, sys
from docutils.core import publish_parts
request = json.load(sys.stdin)
parts = publish_parts(
    source=request["source"],
    source_path=request["source_path"],
    reader_name=request["reader"],
    parser_name=request["parser"],
    writer_name=request["writer"],
    settings_overrides=request["settings"],
)
json.dump({key: parts.get(key, "") for key in ("head", "html_body", "title", "stylesheet")}, sys.stdout)
"#;

const VERSION_DRIVER: &str = "import docutils; print(docutils.__version__)";

#[derive(Serialize)]
struct PublishRequest<'a> {
    source: &'a str,
    source_path: Option<String>,
    reader: &'a str,
    parser: &'a str,
    writer: &'a str,
    settings: &'a Overrides,
}

/// Publisher backed by Docutils in a Python interpreter.
#[derive(Debug, Clone)]
pub struct DocutilsPublisher {
    python: String,
    components: Components,
}

impl DocutilsPublisher {
    /// Create a publisher running `python` with the standalone
    /// reStructuredText to HTML pipeline.
    #[must_use]
    pub fn new(python: impl Into<String>) -> Self {
        Self {
            python: python.into(),
            components: Components::default(),
        }
    }

    /// Interpreter used to run Docutils.
    #[must_use]
    pub fn python(&self) -> &str {
        &self.python
    }

    #[must_use]
    pub fn components(&self) -> &Components {
        &self.components
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.python);
        cmd.env("PYTHONIOENCODING", "utf-8");
        cmd
    }
}

impl Publisher for DocutilsPublisher {
    fn publish(
        &self,
        source: &str,
        source_path: Option<&Path>,
        settings: &Overrides,
    ) -> Result<DocumentParts, PublishError> {
        let request = PublishRequest {
            source,
            source_path: source_path.map(|p| p.display().to_string()),
            reader: self.components.reader,
            parser: self.components.parser,
            writer: self.components.writer,
            settings,
        };
        let payload = serde_json::to_vec(&request)?;

        let mut child = self
            .command()
            .arg("-c")
            .arg(PUBLISH_DRIVER)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| PublishError::Spawn {
                program: self.python.clone(),
                source,
            })?;

        // The interpreter may exit before reading its input; reap it first.
        let written = match child.stdin.take() {
            Some(mut stdin) => stdin.write_all(&payload),
            None => Ok(()),
        };
        let output = child.wait_with_output()?;
        let stderr = String::from_utf8_lossy(&output.stderr);

        if !output.status.success() {
            return Err(PublishError::Failed {
                status: output.status.to_string(),
                stderr: stderr.trim().to_owned(),
            });
        }
        written?;

        // Docutils reports non-fatal system messages on stderr.
        for line in stderr.lines().filter(|l| !l.trim().is_empty()) {
            tracing::debug!(message = line, "docutils");
        }

        Ok(serde_json::from_slice(&output.stdout)?)
    }
}

static DOCUTILS_PROBES: LazyLock<Mutex<HashMap<String, Capability<Version>>>> =
    LazyLock::new(|| Mutex::new(HashMap::new()));

/// Locate Docutils through `python` and report its version.
///
/// The result is cached per interpreter for the lifetime of the process.
/// Never fails: a missing interpreter, a missing module or an unparsable
/// version string all yield [`Capability::Unavailable`].
pub fn probe_docutils(python: &str) -> Capability<Version> {
    let mut probes = DOCUTILS_PROBES
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner);
    probes
        .entry(python.to_owned())
        .or_insert_with(|| run_version_probe(python))
        .clone()
}

fn run_version_probe(python: &str) -> Capability<Version> {
    let output = Command::new(python)
        .arg("-c")
        .arg(VERSION_DRIVER)
        .stdin(Stdio::null())
        .stderr(Stdio::null())
        .output();

    let output = match output {
        Ok(output) if output.status.success() => output,
        Ok(_) => {
            tracing::debug!(python, "Docutils is not importable");
            return Capability::Unavailable;
        }
        Err(e) => {
            tracing::debug!(python, error = %e, "Python interpreter not found");
            return Capability::Unavailable;
        }
    };

    match String::from_utf8_lossy(&output.stdout).parse::<Version>() {
        Ok(version) => {
            tracing::debug!(python, version = %version, "Found Docutils");
            Capability::Available(version)
        }
        Err(e) => {
            tracing::debug!(python, error = %e, "Unrecognized Docutils version");
            Capability::Unavailable
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_components() {
        let publisher = DocutilsPublisher::new("python3");
        assert_eq!(publisher.components().reader, "standalone");
        assert_eq!(publisher.components().parser, "restructuredtext");
        assert_eq!(publisher.components().writer, "html");
    }

    #[test]
    fn test_request_serialization() {
        let settings = Overrides::from([("syntax_highlight".to_owned(), "short".into())]);
        let request = PublishRequest {
            source: "Hello",
            source_path: Some("/docs/index.rst".to_owned()),
            reader: "standalone",
            parser: "restructuredtext",
            writer: "html",
            settings: &settings,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["source"], "Hello");
        assert_eq!(value["source_path"], "/docs/index.rst");
        assert_eq!(value["settings"]["syntax_highlight"], "short");
    }

    #[test]
    fn test_parts_deserialization_defaults_missing_fields() {
        let parts: DocumentParts =
            serde_json::from_str(r#"{"html_body": "<p>x</p>", "title": "T"}"#).unwrap();
        assert_eq!(parts.html_body, "<p>x</p>");
        assert_eq!(parts.title, "T");
        assert_eq!(parts.head, "");
        assert_eq!(parts.stylesheet, "");
    }

    #[test]
    fn test_missing_interpreter_unavailable() {
        let capability = probe_docutils("markups-no-such-python-interpreter");
        assert_eq!(capability, Capability::Unavailable);
    }

    #[test]
    fn test_publish_missing_interpreter() {
        let publisher = DocutilsPublisher::new("markups-no-such-python-interpreter");
        let err = publisher
            .publish("text", None, &Overrides::new())
            .unwrap_err();
        assert!(matches!(err, PublishError::Spawn { .. }));
    }

    /// Interpreter stand-in that ignores its input and runs `body`.
    #[cfg(unix)]
    fn fake_python(dir: &Path, body: &str) -> String {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.join("python");
        std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path.to_str().unwrap().to_owned()
    }

    #[cfg(unix)]
    #[test]
    fn test_publish_interpreter_exits_without_reading() {
        let dir = tempfile::tempdir().unwrap();
        let publisher = DocutilsPublisher::new(fake_python(dir.path(), "exit 0"));
        let source = "x".repeat(1 << 20);
        let err = publisher
            .publish(&source, None, &Overrides::new())
            .unwrap_err();
        assert!(
            matches!(&err, PublishError::Io(e) if e.kind() == std::io::ErrorKind::BrokenPipe),
            "unexpected error: {err}"
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_publish_failure_reported_over_write_error() {
        let dir = tempfile::tempdir().unwrap();
        let publisher =
            DocutilsPublisher::new(fake_python(dir.path(), "echo 'bad setting' >&2\nexit 3"));
        let source = "x".repeat(1 << 20);
        let err = publisher
            .publish(&source, None, &Overrides::new())
            .unwrap_err();
        match err {
            PublishError::Failed { stderr, .. } => assert_eq!(stderr, "bad setting"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_publish_with_docutils() {
        if !probe_docutils("python3").is_available() {
            return;
        }
        let publisher = DocutilsPublisher::new("python3");
        let parts = publisher
            .publish("Title\n=====\n\nBody *text*.\n", None, &Overrides::new())
            .unwrap();
        assert_eq!(parts.title, "Title");
        assert!(parts.html_body.contains("<em>text</em>"));
    }
}
