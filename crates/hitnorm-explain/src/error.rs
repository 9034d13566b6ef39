//! Error types for explain parsing.

use thiserror::Error;

/// Errors that can occur when parsing an explain payload.
#[derive(Debug, Error)]
pub enum ExplainError {
    /// A string payload looked like JSON but did not parse.
    #[error("invalid explain JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A JSON payload did not have the shape of an explanation.
    #[error("malformed explain payload: {0}")]
    Malformed(String),

    /// A line of a text explanation could not be read.
    #[error("explain text line {line}: {message}")]
    Text {
        /// 1-based line number.
        line: usize,
        /// What was wrong with the line.
        message: String,
    },

    /// The payload contained no explanation at all.
    #[error("empty explain payload")]
    Empty,
}
