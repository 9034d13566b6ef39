//! Configuration merging.
//!
//! Merges multiple `RawConfig` files into a single resolved `Config`, closest file
//! first.

use std::path::PathBuf;

use crate::{
    Config, FieldSettings, HighlightSettings, QuerySettings,
    parse::{RawConfig, RawFieldSettings, RawHighlightSettings, RawQuerySettings},
};

/// Separator placed between list fragments of a field spec.
const SPEC_FRAGMENT_SEPARATOR: &str = ", ";

/// A parsed config file with its source path.
pub struct ParsedConfig {
    /// Path to the config file.
    pub path: PathBuf,
    /// Parsed raw configuration.
    pub config: RawConfig,
}

/// Merges multiple configuration files into a single resolved `Config`.
///
/// Configs should be provided in precedence order: highest precedence first (closest to
/// CWD), lowest precedence last (global config). Each setting takes the first defined
/// value. A field spec is replaced as a whole, never combined across files.
pub fn merge_configs(configs: &[ParsedConfig]) -> Config {
    let mut config = Config {
        config_root: configs
            .first()
            .and_then(|c| c.path.parent())
            .map(PathBuf::from),
        ..Config::default()
    };

    // Lowest precedence first so higher precedence overwrites
    for parsed in configs.iter().rev() {
        if let Some(ref fields) = parsed.config.fields {
            apply_raw_fields(&mut config.fields, fields);
        }
        if let Some(ref highlight) = parsed.config.highlight {
            apply_raw_highlight(&mut config.highlight, highlight);
        }
        if let Some(ref query) = parsed.config.query {
            apply_raw_query(&mut config.query, query);
        }
    }

    config
}

/// Applies raw field settings, joining list fragments into one spec.
fn apply_raw_fields(result: &mut FieldSettings, raw: &RawFieldSettings) {
    if let Some(ref fragments) = raw.spec {
        result.spec = fragments.join(SPEC_FRAGMENT_SEPARATOR);
    }
}

/// Applies raw highlight settings.
fn apply_raw_highlight(result: &mut HighlightSettings, raw: &RawHighlightSettings) {
    if let Some(ref v) = raw.pre {
        result.pre.clone_from(v);
    }
    if let Some(ref v) = raw.post {
        result.post.clone_from(v);
    }
    if let Some(v) = raw.snippet_length {
        result.snippet_length = v;
    }
}

/// Applies raw query settings.
fn apply_raw_query(result: &mut QuerySettings, raw: &RawQuerySettings) {
    if let Some(ref v) = raw.default_keyword {
        result.default_keyword.clone_from(v);
    }
    if let Some(v) = raw.encode_uri {
        result.encode_uri = v;
    }
}
