//! Error types for the URL codec.

use thiserror::Error;

/// Errors that can occur when parsing URLs or deriving request headers.
#[derive(Debug, Error)]
pub enum UrlError {
    /// The string could not be parsed as a URL.
    #[error("invalid URL `{url}`: {source}")]
    Parse {
        /// The URL as given.
        url: String,
        /// Parser error.
        #[source]
        source: url::ParseError,
    },

    /// The URL parsed but names no host.
    #[error("URL `{0}` has no host")]
    MissingHost(String),

    /// A custom headers payload was not a JSON object.
    #[error("invalid custom headers: {0}")]
    InvalidHeaders(String),
}
