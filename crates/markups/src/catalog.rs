//! Lookup of markup implementations by file name or language name.

use std::path::Path;

use crate::{Markup, MarkupInfo};

/// A markup implementation that has not been instantiated yet.
///
/// `T` is whatever the catalog hands out for a document: the markup type
/// itself, or an enum over several markup types.
pub struct MarkupClass<T> {
    info: MarkupInfo,
    available: fn() -> bool,
    create: fn(&Path) -> T,
}

impl<T> MarkupClass<T> {
    #[must_use]
    pub const fn new(info: MarkupInfo, available: fn() -> bool, create: fn(&Path) -> T) -> Self {
        Self {
            info,
            available,
            create,
        }
    }

    /// Class for the markup type `M`, instantiated with `create`.
    #[must_use]
    pub fn of<M: Markup>(create: fn(&Path) -> T) -> Self {
        Self::new(M::INFO, M::available, create)
    }

    #[must_use]
    pub fn info(&self) -> &MarkupInfo {
        &self.info
    }

    /// Whether the markup's external dependencies are present.
    #[must_use]
    pub fn available(&self) -> bool {
        (self.available)()
    }

    /// Instantiate the markup for the document at `path`.
    #[must_use]
    pub fn create(&self, path: &Path) -> T {
        (self.create)(path)
    }
}

impl<T> std::fmt::Debug for MarkupClass<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("MarkupClass").field(&self.info.name).finish()
    }
}

/// Ordered set of markup classes.
///
/// When several classes claim a file extension, the one registered last
/// wins.
pub struct Catalog<T> {
    classes: Vec<MarkupClass<T>>,
}

impl<T> Catalog<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            classes: Vec::new(),
        }
    }

    /// Add `class` after the already registered ones.
    pub fn register(&mut self, class: MarkupClass<T>) {
        self.classes.push(class);
    }

    /// All registered classes, in registration order.
    #[must_use]
    pub fn classes(&self) -> &[MarkupClass<T>] {
        &self.classes
    }

    /// Classes whose dependencies are present.
    pub fn available(&self) -> impl Iterator<Item = &MarkupClass<T>> {
        self.classes.iter().filter(|class| class.available())
    }

    /// Class handling files like `path`, available or not.
    #[must_use]
    pub fn class_for_file_name(&self, path: &Path) -> Option<&MarkupClass<T>> {
        self.classes
            .iter()
            .rev()
            .find(|class| class.info.matches_path(path))
    }

    /// A markup instance for `path`.
    ///
    /// Returns `None` when no class handles the file or the class that does
    /// is unavailable.
    #[must_use]
    pub fn markup_for_file_name(&self, path: &Path) -> Option<T> {
        self.class_for_file_name(path)
            .filter(|class| class.available())
            .map(|class| class.create(path))
    }

    /// Class whose name matches `name`, ignoring case.
    #[must_use]
    pub fn find_by_name(&self, name: &str) -> Option<&MarkupClass<T>> {
        let name = name.to_lowercase();
        self.classes
            .iter()
            .find(|class| class.info.name.to_lowercase() == name)
    }
}

impl<T> Default for Catalog<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for Catalog<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(&self.classes).finish()
    }
}
