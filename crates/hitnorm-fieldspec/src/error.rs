//! Error types for field spec parsing.

use thiserror::Error;

/// Errors produced while tokenizing or resolving a field spec string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldSpecError {
    /// A `{` was opened but the matching `}` never appeared.
    #[error("unclosed '{{' in field spec")]
    UnclosedObject {
        /// Byte position of the opening brace.
        position: usize,
    },

    /// A JSON field definition could not be parsed.
    #[error("invalid field definition: {message}")]
    InvalidObject {
        /// Byte position of the opening brace.
        position: usize,
        /// Message from the JSON parser.
        message: String,
    },
}

impl FieldSpecError {
    /// Returns the byte position in the spec string where the error occurred.
    pub fn position(&self) -> usize {
        match self {
            Self::UnclosedObject { position } | Self::InvalidObject { position, .. } => *position,
        }
    }

    /// Formats the error with a position indicator under the offending spec string.
    pub fn format_with_context(&self, spec: &str) -> String {
        let mut result = String::new();
        result.push_str(&format!("field spec error: {self}\n"));
        result.push_str(&format!("  {spec}\n"));
        result.push_str(&format!(
            "  {}^",
            " ".repeat(self.position().min(spec.len()))
        ));
        result
    }
}
