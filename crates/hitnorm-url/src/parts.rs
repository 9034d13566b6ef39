//! Generic URL decomposition and reconstruction.

use serde::Serialize;
use url::Url;

use crate::{
    args::{Args, format_solr_args, parse_solr_args},
    error::UrlError,
    headers::{Headers, derive_headers},
};

/// Protocol assumed when a URL has none.
pub const DEFAULT_PROTOCOL: &str = "http:";

/// A URL broken into its parts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedUrl {
    /// Scheme with trailing colon, e.g. `http:`.
    pub protocol: String,
    /// Host name, with the port if one was given.
    pub host: String,
    /// Path, always starting with `/`.
    pub pathname: String,
    /// Decoded user name, empty if absent.
    pub username: String,
    /// Decoded password, empty if absent.
    pub password: String,
    /// Raw query string without the `?`, empty if absent.
    pub query: String,
    /// Query arguments.
    pub params: Args,
}

impl ParsedUrl {
    /// Whether the URL carries credentials.
    pub fn has_credentials(&self) -> bool {
        !self.username.is_empty() || !self.password.is_empty()
    }

    /// Request headers for this URL: Basic auth from its credentials plus `custom`.
    pub fn headers(&self, custom: &str) -> Result<Headers, UrlError> {
        derive_headers(&self.username, &self.password, custom)
    }

    /// The parts needed to rebuild this URL.
    pub fn parts(&self) -> UrlParts {
        UrlParts {
            protocol: self.protocol.clone(),
            host: self.host.clone(),
            pathname: self.pathname.clone(),
            params: self.params.clone(),
        }
    }
}

/// The parts [`build_url`] assembles a URL from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UrlParts {
    /// Scheme with trailing colon. Empty means [`DEFAULT_PROTOCOL`].
    pub protocol: String,
    /// Host, with port.
    pub host: String,
    /// Path, may be empty.
    pub pathname: String,
    /// Query arguments.
    pub params: Args,
}

impl UrlParts {
    /// Parts for a bare host.
    pub fn new(protocol: impl Into<String>, host: impl Into<String>) -> Self {
        Self {
            protocol: protocol.into(),
            host: host.into(),
            ..Self::default()
        }
    }

    /// Sets the path.
    pub fn with_pathname(mut self, pathname: impl Into<String>) -> Self {
        self.pathname = pathname.into();
        self
    }

    /// Sets the query arguments.
    pub fn with_params(mut self, params: Args) -> Self {
        self.params = params;
        self
    }
}

/// Prefixes `http://` to a URL that has no scheme separator.
pub(crate) fn with_default_scheme(url: &str) -> String {
    if url.contains("://") {
        url.to_string()
    } else {
        format!("{DEFAULT_PROTOCOL}//{url}")
    }
}

/// Parses a URL into its parts.
///
/// A URL without a scheme is read as `http`.
pub fn parse_url(url: &str) -> Result<ParsedUrl, UrlError> {
    let full = with_default_scheme(url.trim());
    let parsed = Url::parse(&full).map_err(|source| UrlError::Parse {
        url: url.to_string(),
        source,
    })?;
    let host = parsed
        .host_str()
        .ok_or_else(|| UrlError::MissingHost(url.to_string()))?;
    let host = match parsed.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    };
    let query = parsed.query().unwrap_or_default().to_string();
    Ok(ParsedUrl {
        protocol: format!("{}:", parsed.scheme()),
        host,
        pathname: parsed.path().to_string(),
        username: decode_userinfo(parsed.username()),
        password: decode_userinfo(parsed.password().unwrap_or_default()),
        params: parse_solr_args(&query),
        query,
    })
}

/// Decodes a percent-encoded userinfo component, keeping it as-is if it does not decode.
fn decode_userinfo(text: &str) -> String {
    urlencoding::decode(text).map_or_else(|_| text.to_string(), |decoded| decoded.into_owned())
}

/// Assembles `protocol//host pathname[?params]`.
///
/// A trailing slash on the path is dropped before a query string is appended.
pub fn build_url(parts: &UrlParts) -> String {
    let protocol = if parts.protocol.is_empty() {
        DEFAULT_PROTOCOL
    } else {
        parts.protocol.as_str()
    };
    let mut url = format!("{protocol}//{}", parts.host);
    if parts.params.is_empty() {
        url.push_str(&parts.pathname);
    } else {
        url.push_str(parts.pathname.strip_suffix('/').unwrap_or(&parts.pathname));
        url.push('?');
        url.push_str(&format_solr_args(&parts.params));
    }
    url
}
