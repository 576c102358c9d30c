//! Diagram builder: output directory and `dot` invocation.

use std::collections::{BTreeMap, HashSet};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use tempfile::TempDir;

use super::{GraphvizKey, GraphvizSettings};

/// Image directory inside the output directory.
pub const IMAGE_DIR: &str = "_images";

/// Temp directory prefix.
const OUTDIR_PREFIX: &str = "markups-";

/// Failure to lay out a diagram.
#[derive(Debug, thiserror::Error)]
pub enum GraphvizError {
    /// I/O error while preparing the output or talking to `dot`.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// `dot` rejected the input.
    #[error("dot exited with error:\n[stderr]\n{stderr}\n[stdout]\n{stdout}")]
    Failed { stderr: String, stdout: String },
}

/// Owns the output directory diagrams are written to.
///
/// The directory is created on construction and removed when the builder is
/// dropped.
#[derive(Debug)]
pub struct GraphvizBuilder {
    settings: GraphvizSettings,
    outdir: TempDir,
    /// Programs already reported as not runnable.
    warned_dot: HashSet<String>,
}

impl GraphvizBuilder {
    /// Create a builder with a fresh temporary output directory.
    pub fn new(settings: GraphvizSettings) -> io::Result<Self> {
        let outdir = tempfile::Builder::new().prefix(OUTDIR_PREFIX).tempdir()?;
        tracing::debug!(outdir = %outdir.path().display(), "Created Graphviz output directory");
        Ok(Self {
            settings,
            outdir,
            warned_dot: HashSet::new(),
        })
    }

    #[must_use]
    pub fn settings(&self) -> &GraphvizSettings {
        &self.settings
    }

    /// Output directory.
    #[must_use]
    pub fn outdir(&self) -> &Path {
        self.outdir.path()
    }

    /// Directory the images are written to and referenced from.
    #[must_use]
    pub fn imgpath(&self) -> PathBuf {
        self.outdir.path().join(IMAGE_DIR)
    }

    /// Diagnostic sink. Warnings never abort a conversion.
    pub fn warn(&self, message: &str) {
        tracing::warn!("{message}");
    }

    /// Lay out `code` with `dot` and return the path of the image.
    ///
    /// `options` are the directive options of the diagram. A `graphviz_dot`
    /// entry overrides the program, and all of them take part in the image
    /// name, so an unchanged diagram is not laid out again. Returns
    /// `Ok(None)` when the program cannot be run at all; that is warned
    /// about once per program.
    pub fn render_dot(
        &mut self,
        code: &str,
        options: &BTreeMap<String, String>,
        cwd: Option<&Path>,
    ) -> Result<Option<PathBuf>, GraphvizError> {
        let dot = options
            .get("graphviz_dot")
            .unwrap_or(&self.settings.dot)
            .clone();
        let format = self.settings.output_format;
        let key = GraphvizKey {
            code,
            options,
            dot: &dot,
            dot_args: &self.settings.dot_args,
            format,
        };
        let outfn = self.imgpath().join(key.file_name());
        if outfn.is_file() {
            return Ok(Some(outfn));
        }
        if self.warned_dot.contains(&dot) {
            return Ok(None);
        }

        std::fs::create_dir_all(self.imgpath())?;

        let mut cmd = Command::new(&dot);
        cmd.args(&self.settings.dot_args)
            .arg(format!("-T{format}"))
            .arg(format!("-o{}", outfn.display()))
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(cwd) = cwd {
            cmd.current_dir(cwd);
        }

        let mut child = match cmd.spawn() {
            Ok(child) => child,
            Err(e) => {
                self.warn(&format!(
                    "dot command '{dot}' cannot be run (needed for graphviz output), \
                     check the graphviz dot setting: {e}"
                ));
                self.warned_dot.insert(dot);
                return Ok(None);
            }
        };
        // dot may exit before reading all input; reap it first.
        let written = match child.stdin.take() {
            Some(mut stdin) => stdin.write_all(code.as_bytes()),
            None => Ok(()),
        };
        let output = child.wait_with_output();

        let result = match (output, written) {
            (Ok(output), _) if !output.status.success() => Err(failed(&output)),
            (Err(e), _) | (_, Err(e)) => Err(GraphvizError::Io(e)),
            (Ok(output), Ok(())) if !outfn.is_file() => Err(failed(&output)),
            (Ok(_), Ok(())) => Ok(()),
        };
        if let Err(e) = result {
            // dot may leave a partial image behind.
            let _ = std::fs::remove_file(&outfn);
            return Err(e);
        }
        tracing::debug!(path = %outfn.display(), "Rendered diagram");
        Ok(Some(outfn))
    }
}

fn failed(output: &Output) -> GraphvizError {
    GraphvizError::Failed {
        stderr: String::from_utf8_lossy(&output.stderr).trim().to_owned(),
        stdout: String::from_utf8_lossy(&output.stdout).trim().to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphviz::{OutputFormat, probe_dot};

    #[test]
    fn test_outdir_layout() {
        let builder = GraphvizBuilder::new(GraphvizSettings::default()).unwrap();
        let outdir = builder.outdir().to_path_buf();
        assert!(outdir.is_dir());
        assert!(
            outdir
                .file_name()
                .unwrap()
                .to_string_lossy()
                .starts_with("markups-")
        );
        assert_eq!(builder.imgpath(), outdir.join("_images"));
    }

    #[test]
    fn test_outdir_removed_on_drop() {
        let builder = GraphvizBuilder::new(GraphvizSettings::default()).unwrap();
        let outdir = builder.outdir().to_path_buf();
        drop(builder);
        assert!(!outdir.exists());
    }

    #[test]
    fn test_missing_program_warns_once() {
        let mut builder = GraphvizBuilder::new(GraphvizSettings {
            dot: "markups-no-such-dot-program".to_owned(),
            ..GraphvizSettings::default()
        })
        .unwrap();

        assert!(builder.render_dot("digraph {}", &BTreeMap::new(), None).unwrap().is_none());
        assert!(builder.warned_dot.contains("markups-no-such-dot-program"));
        assert!(builder.render_dot("digraph {}", &BTreeMap::new(), None).unwrap().is_none());
    }

    #[test]
    fn test_program_from_options() {
        let mut builder = GraphvizBuilder::new(GraphvizSettings::default()).unwrap();
        let options = BTreeMap::from([(
            "graphviz_dot".to_owned(),
            "markups-no-such-layout-program".to_owned(),
        )]);

        assert!(builder.render_dot("digraph {}", &options, None).unwrap().is_none());
        assert!(builder.warned_dot.contains("markups-no-such-layout-program"));
        assert!(!builder.warned_dot.contains("dot"));
    }

    /// `dot` stand-in that writes a partial image and exits without reading
    /// its input.
    #[cfg(unix)]
    fn early_exit_dot(dir: &Path) -> String {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.join("dot");
        let script = "#!/bin/sh\nfor arg; do\n  case $arg in -o*) echo partial > \"${arg#-o}\" ;; esac\ndone\nexit 0\n";
        std::fs::write(&path, script).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path.to_str().unwrap().to_owned()
    }

    #[cfg(unix)]
    #[test]
    fn test_early_exit_removes_partial_image() {
        let dir = tempfile::tempdir().unwrap();
        let mut builder = GraphvizBuilder::new(GraphvizSettings {
            dot: early_exit_dot(dir.path()),
            ..GraphvizSettings::default()
        })
        .unwrap();
        let code = format!("digraph {{ {} }}", "a -> b; ".repeat(1 << 17));

        let err = builder.render_dot(&code, &BTreeMap::new(), None).unwrap_err();
        assert!(
            matches!(&err, GraphvizError::Io(e) if e.kind() == io::ErrorKind::BrokenPipe),
            "unexpected error: {err}"
        );
        let leftovers = std::fs::read_dir(builder.imgpath()).unwrap().count();
        assert_eq!(leftovers, 0);
    }

    #[test]
    fn test_render_with_dot() {
        if !probe_dot("dot").is_available() {
            return;
        }
        let mut builder = GraphvizBuilder::new(GraphvizSettings::default()).unwrap();
        let path = builder
            .render_dot("digraph { a -> b }", &BTreeMap::new(), None)
            .unwrap()
            .unwrap();
        assert!(path.starts_with(builder.imgpath()));
        assert_eq!(path.extension().unwrap(), "svg");
        assert!(std::fs::read_to_string(&path).unwrap().contains("<svg"));

        let again = builder
            .render_dot("digraph { a -> b }", &BTreeMap::new(), None)
            .unwrap()
            .unwrap();
        assert_eq!(path, again);
    }

    #[test]
    fn test_render_png_with_dot() {
        if !probe_dot("dot").is_available() {
            return;
        }
        let mut builder = GraphvizBuilder::new(GraphvizSettings {
            output_format: OutputFormat::Png,
            ..GraphvizSettings::default()
        })
        .unwrap();
        let path = builder.render_dot("graph { a -- b }", &BTreeMap::new(), None).unwrap().unwrap();
        assert_eq!(path.extension().unwrap(), "png");
    }

    #[test]
    fn test_dot_syntax_error() {
        if !probe_dot("dot").is_available() {
            return;
        }
        let mut builder = GraphvizBuilder::new(GraphvizSettings::default()).unwrap();
        let err = builder.render_dot("digraph { a -> }", &BTreeMap::new(), None).unwrap_err();
        assert!(matches!(err, GraphvizError::Failed { .. }));
    }
}
