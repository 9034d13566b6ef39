//! Implementation of `hitnorm normalize`.

use std::process::ExitCode;

use comfy_table::Cell;
use hitnorm_explain::{ExplainedDoc, HotMatch, docs_with_explain_other};
use hitnorm_highlight::HighlightedDoc;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::cli::{
    args::{DEFAULT_HOT_MATCHES, NormalizeCommand},
    context::CommandContext,
    input::{HitBatch, read_json, read_json_object},
    output::{dim, emphasize, header, print_json, stdout_is_terminal, table},
};

/// One normalized hit as printed.
#[derive(Debug, Serialize)]
struct NormalizedHit {
    /// Document id.
    id: String,
    /// Plain title.
    title: Option<String>,
    /// Title with highlight markup.
    highlighted_title: Option<String>,
    /// Thumbnail URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    thumb: Option<String>,
    /// Image URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    image: Option<String>,
    /// Score accounted for by the explain payload.
    score: f64,
    /// Snippet per sub field.
    subs: Map<String, Value>,
    /// Heaviest explain dimensions.
    hot_matches: Vec<HotMatch>,
}

/// Highlight rendering options resolved from flags and configuration.
struct Markers<'a> {
    /// Marker before a matched term.
    pre: &'a str,
    /// Marker after a matched term.
    post: &'a str,
    /// Fallback snippet length.
    snippet_length: usize,
}

/// Normalizes hits from a JSON file and prints them.
pub fn run(ctx: &CommandContext, cmd: &NormalizeCommand) -> ExitCode {
    let spec = match ctx.field_spec(cmd.spec.as_deref()) {
        Ok(spec) => spec,
        Err(code) => return code,
    };
    let input = match read_json(&cmd.file) {
        Ok(input) => input,
        Err(code) => return code,
    };
    let hits = match HitBatch::from_value(input).and_then(HitBatch::into_hits) {
        Ok(hits) => hits,
        Err(e) => {
            eprintln!("error: {}: {e}", cmd.file.display());
            return ExitCode::FAILURE;
        }
    };
    let explain_other = match &cmd.explain_other {
        Some(path) => match read_json_object(path) {
            Ok(map) => map,
            Err(code) => return code,
        },
        None => Map::new(),
    };

    let docs = docs_with_explain_other(hits, &spec, &explain_other);
    let max_score = cmd
        .max_score
        .unwrap_or_else(|| docs.iter().map(|doc| doc.score()).fold(0.0, f64::max));
    debug!(docs = docs.len(), max_score, "normalized hits");

    let markers = Markers {
        pre: cmd.pre.as_deref().unwrap_or(&ctx.config.highlight.pre),
        post: cmd.post.as_deref().unwrap_or(&ctx.config.highlight.post),
        snippet_length: cmd
            .snippet_length
            .unwrap_or(ctx.config.highlight.snippet_length),
    };
    let hot = cmd.hot.unwrap_or(DEFAULT_HOT_MATCHES);

    let results: Vec<NormalizedHit> = docs
        .into_iter()
        .map(|doc| render(doc, &markers, max_score, hot))
        .collect();

    if cmd.output.json {
        return print_json(&results);
    }
    print_text(&results, &markers);
    ExitCode::SUCCESS
}

/// Collects everything printed for one document.
fn render(mut doc: ExplainedDoc, markers: &Markers<'_>, max_score: f64, hot: usize) -> NormalizedHit {
    let hot_matches = if max_score > 0.0 {
        doc.hot_matches_out_of(max_score)
            .iter()
            .take(hot)
            .cloned()
            .collect()
    } else {
        Vec::new()
    };
    let score = doc.score();

    let mut highlighted = HighlightedDoc::new(doc).with_snippet_length(markers.snippet_length);
    let highlighted_title = highlighted.highlighted_title(markers.pre, markers.post);
    let subs = highlighted.sub_snippets(markers.pre, markers.post).clone();
    let normal = highlighted.doc();

    NormalizedHit {
        id: normal.id.clone(),
        title: normal.title.clone(),
        highlighted_title,
        thumb: normal.thumb.clone(),
        image: normal.image.clone(),
        score,
        subs,
        hot_matches,
    }
}

/// Prints hits as headed blocks with a snippet table.
fn print_text(results: &[NormalizedHit], markers: &Markers<'_>) {
    if results.is_empty() {
        println!("{}", dim("No documents."));
        return;
    }
    let styled = |text: &str| {
        if stdout_is_terminal() {
            emphasize(text, markers.pre, markers.post)
        } else {
            text.to_string()
        }
    };

    for hit in results {
        let title = hit
            .highlighted_title
            .as_deref()
            .or(hit.title.as_deref())
            .unwrap_or(&hit.id);
        println!("{}", header(&styled(title)));
        println!("{}", dim(&format!("id: {}  score: {:.4}", hit.id, hit.score)));

        if !hit.subs.is_empty() {
            let mut subs = table(["Field", "Snippet"]);
            for (field, value) in &hit.subs {
                let snippet = match value {
                    Value::String(s) => styled(s),
                    other => other.to_string(),
                };
                subs.add_row([Cell::new(field), Cell::new(snippet)]);
            }
            println!("{subs}");
        }

        for hot in &hit.hot_matches {
            println!("  {:>6.1}%  {}", hot.percentage, hot.description);
        }
        println!();
    }
}
