//! The [`Markup`] trait and its static metadata.

use std::path::Path;

use crate::ConvertedMarkup;

/// Static description of a markup language, used by catalogs and file
/// type detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkupInfo {
    /// Human readable name (e.g., `reStructuredText`).
    pub name: &'static str,
    /// Home page of the markup language.
    pub language_home_page: &'static str,
    /// Home page of the library implementing the conversion.
    pub module_home_page: &'static str,
    /// Syntax reference documentation.
    pub syntax_documentation: &'static str,
    /// File extensions, including the leading dot.
    pub file_extensions: &'static [&'static str],
    /// Extension used when saving new files.
    pub default_extension: &'static str,
}

impl MarkupInfo {
    /// Whether `path` has one of this markup's file extensions.
    ///
    /// The comparison is case-insensitive.
    #[must_use]
    pub fn matches_path(&self, path: &Path) -> bool {
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            return false;
        };
        self.file_extensions
            .iter()
            .any(|known| known.trim_start_matches('.').eq_ignore_ascii_case(ext))
    }
}

/// A configured converter for one markup language.
///
/// Conversion takes `&mut self`: implementations may hold per-call state in
/// their renderer, so calls on one instance are serialized by the borrow
/// checker. Create one instance per concurrent caller.
pub trait Markup {
    /// Result of a successful conversion.
    type Output: ConvertedMarkup;
    /// Conversion failure reported by the underlying renderer.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Static metadata for this markup.
    const INFO: MarkupInfo;

    /// Whether the external dependencies needed for conversion are present.
    ///
    /// Never fails: a missing dependency is reported as `false`.
    fn available() -> bool
    where
        Self: Sized;

    /// Path of the source document, used to resolve relative resources.
    fn filename(&self) -> Option<&Path>;

    /// Convert source text.
    fn convert(&mut self, text: &str) -> Result<Self::Output, Self::Error>;
}
