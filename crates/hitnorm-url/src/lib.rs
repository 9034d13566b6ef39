//! Query URL codec for hitnorm.
//!
//! Builds and takes apart the request URLs that search engine adapters send:
//! - Generic URL decomposition ([`parse_url`]) and reconstruction ([`build_url`])
//! - Solr argument multimaps that round-trip exactly through a query string, and removal
//!   of arguments the searcher manages itself
//! - Solr collection/handler paths and Elasticsearch document endpoints
//! - Request headers from URL credentials and custom JSON
//! - Query template hydration
//!
//! # Example
//!
//! ```
//! use hitnorm_url::{format_solr_args, parse_solr_args, parse_solr_url};
//!
//! let solr = parse_solr_url("http://localhost:8983/solr/films/select?q=*:*&fq=a&fq=b").unwrap();
//! assert_eq!(solr.collection_name, "films");
//! assert_eq!(solr.request_handler, "select");
//!
//! let query = format_solr_args(&solr.solr_args);
//! assert_eq!(query, "q=*:*&fq=a&fq=b");
//! assert_eq!(parse_solr_args(&query), solr.solr_args);
//! ```

#![warn(missing_docs)]

mod args;
mod error;
mod es;
mod headers;
mod parts;
mod solr;
mod template;

pub use args::{Args, UNSUPPORTED_ARGS, format_solr_args, parse_solr_args, remove_unsupported};
pub use error::UrlError;
pub use es::{
    EsDocRef, build_base_url, build_doc_url, build_explain_url, build_render_template_url,
    is_bulk_call, is_template_call, strip_basic_auth,
};
pub use headers::{Headers, basic_auth, custom_headers, derive_headers};
pub use parts::{DEFAULT_PROTOCOL, ParsedUrl, UrlParts, build_url, parse_url};
pub use solr::{SolrPath, SolrUrl, build_solr_url, escape_user_query, parse_solr_path, parse_solr_url};
pub use template::{HydrateOptions, hydrate, hydrate_str};
