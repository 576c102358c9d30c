//! Dotted version numbers with numeric component ordering.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// A dotted version such as `0.13` or `0.21.2`.
///
/// Components compare numerically and left to right; missing trailing
/// components count as zero, so `0.13 == 0.13.0`. A non-numeric tail on a
/// component (`rc1` in `0.22rc1`) is kept for display but ignored for
/// ordering, and ends the numeric part of the version.
#[derive(Debug, Clone)]
pub struct Version {
    parts: Vec<u64>,
    raw: String,
}

/// Error returned when a string has no leading numeric component.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid version string: '{0}'")]
pub struct ParseVersionError(String);

impl Version {
    /// Numeric components of the version.
    #[must_use]
    pub fn parts(&self) -> &[u64] {
        &self.parts
    }

    fn component(&self, index: usize) -> u64 {
        self.parts.get(index).copied().unwrap_or(0)
    }
}

impl FromStr for Version {
    type Err = ParseVersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        let mut parts = Vec::new();

        for component in raw.split('.') {
            let digits_end = component
                .find(|c: char| !c.is_ascii_digit())
                .unwrap_or(component.len());
            let Ok(value) = component[..digits_end].parse::<u64>() else {
                break;
            };
            parts.push(value);
            if digits_end < component.len() {
                break;
            }
        }

        if parts.is_empty() {
            return Err(ParseVersionError(raw.to_owned()));
        }

        Ok(Self {
            parts,
            raw: raw.to_owned(),
        })
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.parts.len().max(other.parts.len());
        (0..len)
            .map(|i| self.component(i).cmp(&other.component(i)))
            .find(|ordering| ordering.is_ne())
            .unwrap_or(Ordering::Equal)
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}
