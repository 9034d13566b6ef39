//! Error types for raw hits and normalized documents.

use thiserror::Error;

/// Errors that can occur when reading raw search hits.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentError {
    /// The hit carries no explain information at all.
    #[error("explain is not supported for this document")]
    ExplainNotSupported,

    /// A raw hit was not shaped like a document.
    #[error("invalid hit: expected a JSON object, found {found}")]
    InvalidHit {
        /// The JSON type that was found instead.
        found: &'static str,
    },
}
