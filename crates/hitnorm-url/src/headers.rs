//! Request header derivation.

use std::collections::BTreeMap;

use base64::{Engine as _, engine::general_purpose::STANDARD};
use serde_json::Value;

use crate::error::UrlError;

/// Request headers by name.
pub type Headers = BTreeMap<String, String>;

/// Derives request headers from URL credentials and a custom headers payload.
///
/// A non-empty `username` or `password` yields a Basic `Authorization` header. A non-empty `custom`
/// string must be a JSON object; its entries are merged in and win over derived headers
/// with the same name, compared case-insensitively.
pub fn derive_headers(username: &str, password: &str, custom: &str) -> Result<Headers, UrlError> {
    let mut headers = Headers::new();
    if !username.is_empty() || !password.is_empty() {
        headers.insert("Authorization".into(), basic_auth(username, password));
    }
    for (name, value) in custom_headers(custom)? {
        headers.retain(|existing, _| !existing.eq_ignore_ascii_case(&name));
        headers.insert(name, value);
    }
    Ok(headers)
}

/// Parses a custom headers payload. An empty or blank string yields no headers.
pub fn custom_headers(custom: &str) -> Result<Headers, UrlError> {
    if custom.trim().is_empty() {
        return Ok(Headers::new());
    }
    let parsed: Value =
        serde_json::from_str(custom).map_err(|err| UrlError::InvalidHeaders(err.to_string()))?;
    let Value::Object(map) = parsed else {
        return Err(UrlError::InvalidHeaders("expected a JSON object".into()));
    };
    Ok(map
        .into_iter()
        .map(|(name, value)| {
            let value = match value {
                Value::String(s) => s,
                other => other.to_string(),
            };
            (name, value)
        })
        .collect())
}

/// `Basic <base64(user:password)>`.
pub fn basic_auth(username: &str, password: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{username}:{password}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_header_from_credentials() {
        let headers = derive_headers("user", "pass", "").unwrap();
        assert_eq!(headers["Authorization"], "Basic dXNlcjpwYXNz");
    }

    #[test]
    fn no_credentials_no_header() {
        assert!(derive_headers("", "", "").unwrap().is_empty());
    }

    #[test]
    fn password_alone_still_authenticates() {
        let headers = derive_headers("", "pw", "").unwrap();
        assert_eq!(headers["Authorization"], "Basic OnB3");
    }

    #[test]
    fn custom_headers_are_merged() {
        let headers = derive_headers("user", "pass", r#"{"Content-Type": "application/json"}"#).unwrap();
        assert_eq!(headers["Content-Type"], "application/json");
        assert!(headers.contains_key("Authorization"));
    }

    #[test]
    fn custom_headers_win() {
        let headers = derive_headers("user", "pass", r#"{"authorization": "Bearer t"}"#).unwrap();
        assert_eq!(headers.len(), 1);
        assert_eq!(headers["authorization"], "Bearer t");
    }

    #[test]
    fn non_string_values_use_json_text() {
        let headers = custom_headers(r#"{"X-Retries": 3}"#).unwrap();
        assert_eq!(headers["X-Retries"], "3");
    }

    #[test]
    fn invalid_custom_headers_fail() {
        assert!(matches!(
            derive_headers("user", "pass", "{not json"),
            Err(UrlError::InvalidHeaders(_))
        ));
        assert!(matches!(
            custom_headers(r#"["a"]"#),
            Err(UrlError::InvalidHeaders(_))
        ));
    }
}
