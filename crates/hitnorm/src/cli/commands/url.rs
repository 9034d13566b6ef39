//! Implementation of `hitnorm url`.

use std::process::ExitCode;

use hitnorm_url::{
    Args, EsDocRef, Headers, ParsedUrl, SolrUrl, build_doc_url, build_explain_url,
    parse_solr_url, parse_url, remove_unsupported, strip_basic_auth,
};
use serde::Serialize;

use crate::cli::{
    args::{OutputArgs, UrlWhat},
    output::{key_value_table, print_json, subheader, table},
};

/// JSON output for `hitnorm url parse`.
#[derive(Serialize)]
struct JsonParsedUrl<'a> {
    /// The URL's parts.
    #[serde(flatten)]
    url: &'a ParsedUrl,
    /// Headers a request to this URL would carry.
    headers: &'a Headers,
}

/// Runs the selected URL operation.
pub fn run(what: &UrlWhat) -> ExitCode {
    match what {
        UrlWhat::Parse {
            url,
            headers,
            output,
        } => parse(url, headers, *output),
        UrlWhat::Solr {
            url,
            sanitize,
            output,
        } => solr(url, *sanitize, *output),
        UrlWhat::Es {
            url,
            index,
            id,
            doc_type,
        } => es(url, index, id, doc_type.as_deref()),
    }
}

/// Splits a URL into parts and derives its request headers.
fn parse(url: &str, custom_headers: &str, output: OutputArgs) -> ExitCode {
    let parsed = match parse_url(url) {
        Ok(parsed) => parsed,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };
    let headers = match parsed.headers(custom_headers) {
        Ok(headers) => headers,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    if output.json {
        return print_json(&JsonParsedUrl {
            url: &parsed,
            headers: &headers,
        });
    }

    let password = if parsed.password.is_empty() {
        String::new()
    } else {
        "********".to_string()
    };
    println!(
        "{}",
        key_value_table([
            ("url", strip_basic_auth(url)),
            ("protocol", parsed.protocol.clone()),
            ("host", parsed.host.clone()),
            ("pathname", parsed.pathname.clone()),
            ("username", parsed.username.clone()),
            ("password", password),
            ("query", parsed.query.clone()),
        ])
    );
    print_args(&parsed.params);
    if !headers.is_empty() {
        println!("{}", subheader("Headers:"));
        let mut rows = table(["Header", "Value"]);
        for (name, value) in &headers {
            rows.add_row([name.as_str(), value.as_str()]);
        }
        println!("{rows}");
    }
    ExitCode::SUCCESS
}

/// Reads a Solr request URL, optionally stripping unsupported arguments.
fn solr(url: &str, sanitize: bool, output: OutputArgs) -> ExitCode {
    let Some(mut solr) = parse_solr_url(url) else {
        eprintln!("error: not a Solr request URL: {url}");
        eprintln!("Expected a path ending in <collection>/<handler>");
        return ExitCode::FAILURE;
    };
    if sanitize {
        for warning in remove_unsupported(&mut solr.solr_args) {
            eprintln!("warning: {warning}");
        }
    }

    if output.json {
        return print_json(&solr);
    }

    print_solr(&solr);
    ExitCode::SUCCESS
}

/// Prints the Solr view of a URL.
fn print_solr(solr: &SolrUrl) {
    println!(
        "{}",
        key_value_table([
            ("collection", solr.collection_name.clone()),
            ("handler", solr.request_handler.clone()),
            ("endpoint", solr.endpoint()),
            ("url", solr.to_url()),
        ])
    );
    print_args(&solr.solr_args);
}

/// Prints query arguments, one row per value.
fn print_args(args: &Args) {
    if args.is_empty() {
        return;
    }
    println!("{}", subheader("Arguments:"));
    let mut rows = table(["Name", "Value"]);
    for (name, values) in args.iter() {
        for value in values {
            rows.add_row([name, value.as_str()]);
        }
    }
    println!("{rows}");
}

/// Prints the document and explain URLs for an Elasticsearch document.
fn es(url: &str, index: &str, id: &str, doc_type: Option<&str>) -> ExitCode {
    let parsed = match parse_url(url) {
        Ok(parsed) => parsed,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };
    let parts = parsed.parts();
    let doc = EsDocRef {
        index,
        doc_type,
        id,
    };
    println!("{}", build_doc_url(&parts, &doc, false));
    println!("{}", build_explain_url(&parts, &doc));
    ExitCode::SUCCESS
}
