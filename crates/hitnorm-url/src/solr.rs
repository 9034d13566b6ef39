//! Solr endpoint URLs.

use serde::Serialize;

use crate::{
    args::{Args, format_solr_args},
    parts::{ParsedUrl, parse_url, with_default_scheme},
};

/// Characters with special meaning in Solr's standard query syntax.
const SPECIAL_CHARS: &[char] = &[
    '+', '-', '&', '!', '(', ')', '[', ']', '{', '}', '^', '"', '~', '?', ':', '\\',
];

/// The collection and request handler named by a Solr path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SolrPath {
    /// Collection (or core) name.
    pub collection_name: String,
    /// Request handler, e.g. `select`.
    pub request_handler: String,
}

/// A parsed Solr request URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SolrUrl {
    /// Scheme with trailing colon.
    pub protocol: String,
    /// Host with port.
    pub host: String,
    /// Full request path.
    pub pathname: String,
    /// Decoded user name, empty if absent.
    pub username: String,
    /// Decoded password, empty if absent.
    pub password: String,
    /// Collection (or core) name.
    pub collection_name: String,
    /// Request handler.
    pub request_handler: String,
    /// Query arguments.
    pub solr_args: Args,
}

impl SolrUrl {
    /// Builds the Solr view of an already parsed URL.
    ///
    /// Returns `None` if the path has fewer than two segments.
    pub fn from_parsed(parsed: ParsedUrl) -> Option<Self> {
        let path = parse_solr_path(&parsed.pathname)?;
        Some(Self {
            protocol: parsed.protocol,
            host: parsed.host,
            pathname: parsed.pathname,
            username: parsed.username,
            password: parsed.password,
            collection_name: path.collection_name,
            request_handler: path.request_handler,
            solr_args: parsed.params,
        })
    }

    /// The request endpoint without query arguments or credentials.
    pub fn endpoint(&self) -> String {
        format!("{}//{}{}", self.protocol, self.host, self.pathname)
    }

    /// The full request URL.
    pub fn to_url(&self) -> String {
        build_solr_url(&self.endpoint(), &self.solr_args)
    }
}

/// Appends arguments to a Solr endpoint, assuming `http` when it has no scheme.
pub fn build_solr_url(base: &str, args: &Args) -> String {
    let mut url = with_default_scheme(base);
    if !args.is_empty() {
        url.push(if url.contains('?') { '&' } else { '?' });
        url.push_str(&format_solr_args(args));
    }
    url
}

/// Splits a Solr path into collection and request handler.
///
/// The last segment is the handler and the one before it the collection. Returns
/// `None` for paths with fewer than two non-empty segments.
pub fn parse_solr_path(path: &str) -> Option<SolrPath> {
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    let [.., collection, handler] = segments.as_slice() else {
        return None;
    };
    Some(SolrPath {
        collection_name: (*collection).to_string(),
        request_handler: (*handler).to_string(),
    })
}

/// Parses a Solr request URL.
///
/// Returns `None` if the URL does not parse or its path names no collection and
/// handler.
pub fn parse_solr_url(url: &str) -> Option<SolrUrl> {
    SolrUrl::from_parsed(parse_url(url).ok()?)
}

/// Backslash-escapes characters that are special in Solr query syntax.
pub fn escape_user_query(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if SPECIAL_CHARS.contains(&c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn parses_solr_url() {
        let solr = parse_solr_url("http://localhost:8983/solr/mycollection/select?q=*:*").unwrap();
        assert_eq!(solr.protocol, "http:");
        assert_eq!(solr.host, "localhost:8983");
        assert_eq!(solr.collection_name, "mycollection");
        assert_eq!(solr.request_handler, "select");
        assert_eq!(solr.solr_args.get("q"), Some(&["*:*".to_string()][..]));
    }

    #[test]
    fn parses_solr_url_without_protocol() {
        let solr = parse_solr_url("localhost:8983/solr/collection1/select?q=*:*").unwrap();
        assert_eq!(solr.protocol, "http:");
        assert_eq!(solr.host, "localhost:8983");
        assert_eq!(solr.collection_name, "collection1");
    }

    #[test]
    fn short_paths_are_rejected() {
        assert_eq!(parse_solr_path(""), None);
        assert_eq!(parse_solr_path("single"), None);
        assert_eq!(parse_solr_path("/solr/"), None);
        assert_eq!(parse_solr_url("http://localhost:8983/invalid"), None);
        assert_eq!(parse_solr_url("http://localhost:8983/"), None);
    }

    #[test]
    fn two_segments_are_enough() {
        let path = parse_solr_path("/invalid/path").unwrap();
        assert_eq!(path.collection_name, "invalid");
        assert_eq!(path.request_handler, "path");
    }

    #[test]
    fn endpoint_and_full_url() {
        let solr = parse_solr_url("https://u:p@search:8983/solr/films/select?q=rambo&rows=10").unwrap();
        assert_eq!(solr.endpoint(), "https://search:8983/solr/films/select");
        assert_eq!(solr.to_url(), "https://search:8983/solr/films/select?q=rambo&rows=10");
        assert_eq!(solr.username, "u");
    }

    #[test]
    fn builds_urls_from_args() {
        let args: Args = [("a", "b"), ("c", "d")].into_iter().collect();
        assert_eq!(build_solr_url("www.example.com", &args), "http://www.example.com?a=b&c=d");

        let args: Args = [("a", "b"), ("a", "b"), ("c", "d")].into_iter().collect();
        assert_eq!(
            build_solr_url("www.example.com", &args),
            "http://www.example.com?a=b&a=b&c=d"
        );
    }

    #[test]
    fn builds_url_onto_existing_query() {
        let args: Args = [("fq", "x")].into_iter().collect();
        assert_eq!(
            build_solr_url("http://h/solr/c/select?q=a", &args),
            "http://h/solr/c/select?q=a&fq=x"
        );
        assert_eq!(build_solr_url("http://h/solr", &Args::new()), "http://h/solr");
    }

    #[test]
    fn escapes_every_special_character() {
        let escaped = escape_user_query("+-&!(){}[]^\"~?:\\");
        assert_eq!(escaped, "\\+\\-\\&\\!\\(\\)\\{\\}\\[\\]\\^\\\"\\~\\?\\:\\\\");
        assert_eq!(escaped.len(), 32);
    }

    #[test]
    fn escapes_only_special_characters() {
        assert_eq!(escape_user_query("hello:world"), "hello\\:world");
        assert_eq!(escape_user_query("hello+world&test"), "hello\\+world\\&test");
        assert_eq!(escape_user_query("first blood"), "first blood");
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let solr = parse_solr_url("http://localhost:8983/solr/mycollection/select?q=*:*").unwrap();
        let value = serde_json::to_value(&solr).unwrap();
        assert_eq!(value["collectionName"], json!("mycollection"));
        assert_eq!(value["requestHandler"], json!("select"));
        assert_eq!(value["solrArgs"], json!({"q": ["*:*"]}));
    }
}
