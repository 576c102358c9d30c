//! Source document environment for directive handlers.

use std::path::{Path, PathBuf};

/// Resolves resources referenced from a source document.
///
/// Relative names are resolved against the absolute directory of the source
/// file. Absolute names, and every name when the source file is unknown,
/// pass through unchanged.
#[derive(Debug, Clone, Default)]
pub struct SourceEnvironment {
    dir: Option<PathBuf>,
    language: Option<String>,
}

impl SourceEnvironment {
    /// Create an environment for a document stored at `filename`.
    #[must_use]
    pub fn new(filename: Option<&Path>) -> Self {
        let dir = filename.map(|f| {
            let parent = match f.parent() {
                Some(p) if !p.as_os_str().is_empty() => p,
                _ => Path::new("."),
            };
            std::path::absolute(parent).unwrap_or_else(|_| parent.to_path_buf())
        });
        Self {
            dir,
            language: None,
        }
    }

    /// Set the document language, used to prefer translated resources.
    #[must_use]
    pub fn with_language(mut self, language: Option<String>) -> Self {
        self.language = language;
        self
    }

    /// Absolute directory of the source document, if known.
    #[must_use]
    pub fn dir(&self) -> Option<&Path> {
        self.dir.as_deref()
    }

    /// Resolve a referenced filename.
    #[must_use]
    pub fn resolve(&self, filename: &str) -> PathBuf {
        match &self.dir {
            Some(dir) if !Path::new(filename).is_absolute() => dir.join(filename),
            _ => PathBuf::from(filename),
        }
    }

    /// Resolve a referenced filename, preferring a translated variant
    /// (`name.<lang>.ext`) when a language is set and that file exists.
    #[must_use]
    pub fn resolve_for_language(&self, filename: &str) -> PathBuf {
        if let Some(language) = &self.language {
            let path = Path::new(filename);
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                let translated = match path.extension().and_then(|e| e.to_str()) {
                    Some(ext) => path.with_file_name(format!("{stem}.{language}.{ext}")),
                    None => path.with_file_name(format!("{stem}.{language}")),
                };
                let resolved = self.resolve(&translated.to_string_lossy());
                if resolved.exists() {
                    return resolved;
                }
            }
        }
        self.resolve(filename)
    }

    /// Record that the document depends on `path`.
    ///
    /// Documents are converted one at a time without a build graph, so this
    /// only traces the dependency.
    pub fn note_dependency(&self, path: &Path) {
        tracing::trace!(path = %path.display(), "Noted document dependency");
    }
}
