//! Tagged result of probing an optional external dependency.

/// Outcome of a capability probe.
///
/// Absence of an optional tool is a normal condition, not an error, so
/// probes return this instead of a `Result`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Capability<T> {
    /// The dependency was located; carries what the probe found
    /// (a version, a resolved executable path, ...).
    Available(T),
    /// The dependency could not be located or is unusable.
    Unavailable,
}

impl<T> Capability<T> {
    /// Whether the dependency was located.
    #[must_use]
    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available(_))
    }

    /// Borrow the probe payload, if available.
    #[must_use]
    pub fn as_available(&self) -> Option<&T> {
        match self {
            Self::Available(value) => Some(value),
            Self::Unavailable => None,
        }
    }

    /// Keep the capability only if the payload satisfies `predicate`.
    #[must_use]
    pub fn filter(self, predicate: impl FnOnce(&T) -> bool) -> Self {
        match self {
            Self::Available(value) if predicate(&value) => Self::Available(value),
            _ => Self::Unavailable,
        }
    }
}

impl<T> From<Option<T>> for Capability<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Unavailable, Self::Available)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_option() {
        assert_eq!(Capability::from(Some(3)), Capability::Available(3));
        assert_eq!(Capability::<i32>::from(None), Capability::Unavailable);
    }

    #[test]
    fn test_filter() {
        assert!(Capability::Available(5).filter(|v| *v > 3).is_available());
        assert!(!Capability::Available(2).filter(|v| *v > 3).is_available());
        assert!(!Capability::<i32>::Unavailable.filter(|_| true).is_available());
    }

    #[test]
    fn test_as_available() {
        assert_eq!(Capability::Available("dot").as_available(), Some(&"dot"));
        assert_eq!(Capability::<&str>::Unavailable.as_available(), None);
    }
}
