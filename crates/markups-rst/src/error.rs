//! Error types for reStructuredText conversion.

use crate::PublishError;

/// Conversion failure.
///
/// Directive and diagram problems are not errors: they are logged and shown
/// inline in the converted document.
#[derive(Debug, thiserror::Error)]
pub enum RstError {
    /// The renderer failed; its diagnostic is carried unmodified.
    #[error("reStructuredText rendering failed: {0}")]
    Publish(#[from] PublishError),
}
