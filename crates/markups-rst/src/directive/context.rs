//! Directive processing context.

use std::io;
use std::path::{Path, PathBuf};

use crate::SourceEnvironment;

/// Context provided to directive handlers.
///
/// Gives access to the source location, the document environment for
/// resolving referenced files, and a file reading callback.
///
/// # Example
///
/// ```
/// use std::path::Path;
/// use markups_rst::SourceEnvironment;
/// use markups_rst::directive::DirectiveContext;
///
/// let env = SourceEnvironment::new(Some(Path::new("/docs/index.rst")));
/// let ctx = DirectiveContext {
///     source_path: Some(Path::new("/docs/index.rst")),
///     env: &env,
///     line: 12,
///     read_file: &|path| std::fs::read_to_string(path),
/// };
///
/// assert_eq!(ctx.resolve_path("flow.dot"), Path::new("/docs/flow.dot"));
/// ```
pub struct DirectiveContext<'a> {
    /// Path to the source file being converted (if known).
    pub source_path: Option<&'a Path>,
    /// Environment resolving files referenced by the document.
    pub env: &'a SourceEnvironment,
    /// Line number of the directive marker (1-indexed).
    pub line: usize,
    /// Callback to read a file from the file system.
    pub read_file: &'a dyn Fn(&Path) -> io::Result<String>,
}

impl DirectiveContext<'_> {
    /// Resolve a referenced filename through the environment.
    #[must_use]
    pub fn resolve_path(&self, filename: &str) -> PathBuf {
        self.env.resolve(filename)
    }

    /// Read a file using the configured callback.
    pub fn read(&self, path: &Path) -> io::Result<String> {
        (self.read_file)(path)
    }
}
