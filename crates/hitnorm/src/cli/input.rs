//! Reading hit batches from JSON input.

use std::{
    fs,
    io::{self, Read},
    path::Path,
    process::ExitCode,
    sync::Arc,
};

use hitnorm_document::{ExplainMap, Highlighting, RawHit, SearchHit};
use serde::Deserialize;
use serde_json::{Map, Value};

/// The accepted shapes of a `normalize` input file.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawInput {
    /// A bare array of source documents.
    Docs(Vec<Value>),
    /// Documents with the engine's highlighting and explain sections.
    Batch(HitBatch),
}

/// Raw hits plus the per-response sections every hit shares.
#[derive(Debug, Default, Deserialize)]
pub struct HitBatch {
    /// Source documents.
    pub docs: Vec<Value>,
    /// Highlighting keyed by document id.
    pub highlighting: Option<Highlighting>,
    /// Explain payloads keyed by document id.
    pub explain: Option<ExplainMap>,
}

impl HitBatch {
    /// Reads a batch from either accepted input shape.
    pub fn from_value(value: Value) -> Result<Self, String> {
        match serde_json::from_value(value) {
            Ok(RawInput::Docs(docs)) => Ok(Self {
                docs,
                ..Self::default()
            }),
            Ok(RawInput::Batch(batch)) => Ok(batch),
            Err(_) => Err(
                "input must be an array of documents or an object with a \"docs\" array".into(),
            ),
        }
    }

    /// Turns every document into a hit sharing this batch's highlighting and explain.
    pub fn into_hits(self) -> Result<Vec<Arc<dyn SearchHit>>, String> {
        Ok(self
            .into_raw_hits()?
            .into_iter()
            .map(|hit| Arc::new(hit) as Arc<dyn SearchHit>)
            .collect())
    }

    /// Builds one [`RawHit`] per document. The batch sections are wrapped once and
    /// shared by every hit.
    fn into_raw_hits(self) -> Result<Vec<RawHit>, String> {
        let Self {
            docs,
            highlighting,
            explain,
        } = self;
        let highlighting = highlighting.map(Arc::new);
        let explain = explain.map(Arc::new);
        docs.into_iter()
            .enumerate()
            .map(|(index, doc)| {
                let mut hit = RawHit::from_value(doc).map_err(|e| format!("docs[{index}]: {e}"))?;
                if let Some(highlighting) = &highlighting {
                    hit = hit.with_highlighting(Arc::clone(highlighting));
                }
                if let Some(explain) = &explain {
                    hit = hit.with_explain(Arc::clone(explain));
                }
                Ok(hit)
            })
            .collect()
    }
}

/// Reads and parses a JSON file, or stdin for `-`.
pub fn read_json(path: &Path) -> Result<Value, ExitCode> {
    let contents = if path == Path::new("-") {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf).map(|_| buf)
    } else {
        fs::read_to_string(path)
    }
    .map_err(|e| {
        eprintln!("error: failed to read {}: {e}", path.display());
        ExitCode::FAILURE
    })?;

    serde_json::from_str(&contents).map_err(|e| {
        eprintln!("error: invalid JSON in {}: {e}", path.display());
        ExitCode::FAILURE
    })
}

/// Reads a JSON file that must hold an object.
pub fn read_json_object(path: &Path) -> Result<Map<String, Value>, ExitCode> {
    match read_json(path)? {
        Value::Object(map) => Ok(map),
        _ => {
            eprintln!("error: {} must contain a JSON object", path.display());
            Err(ExitCode::FAILURE)
        }
    }
}
