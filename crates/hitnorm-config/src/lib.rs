//! Configuration system for hitnorm.
//!
//! hitnorm uses TOML configuration files named `.hitnorm.toml`. Configuration is resolved
//! by walking up the directory tree from the current working directory, collecting any
//! `.hitnorm.toml` files found, then loading `~/.hitnorm.toml` as the global config with
//! lowest precedence.
//!
//! ```toml
//! [fields]
//! spec = ["id:id", "title:title", "overview"]
//!
//! [highlight]
//! pre = "<em>"
//! post = "</em>"
//! snippet_length = 200
//!
//! [query]
//! default_keyword = ""
//! encode_uri = false
//! ```

#![warn(missing_docs)]

mod discovery;
mod error;
mod merge;
mod parse;
mod templates;
#[cfg(test)]
mod test_support;
mod validate;

use std::path::{Path, PathBuf};

pub use discovery::{CONFIG_FILENAME, discover_config_files, global_config_path, is_global_config};
pub use error::ConfigError;
use hitnorm_fieldspec::{DEFAULT_SPEC, FieldSpec, FieldSpecError};
pub use merge::{ParsedConfig, merge_configs};
pub use parse::{
    RawConfig, RawFieldSettings, RawHighlightSettings, RawQuerySettings, parse_config_file,
    parse_config_str,
};
use serde::{Deserialize, Serialize};
pub use templates::{global_template, local_template};
use tracing::debug;
pub use validate::ConfigWarning;
use validate::validate_config;

/// Top-level merged configuration for hitnorm.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Field spec settings.
    pub fields: FieldSettings,
    /// Highlight rendering settings.
    pub highlight: HighlightSettings,
    /// Query template settings.
    pub query: QuerySettings,
    /// Directory containing the most specific config file.
    #[serde(skip)]
    pub config_root: Option<PathBuf>,
}

impl Config {
    /// Loads configuration by discovering and merging all relevant `.hitnorm.toml` files.
    ///
    /// Returns `Ok(Config::default())` if no configuration files are found.
    pub fn load(cwd: &Path) -> Result<Self, ConfigError> {
        let config_files = discover_config_files(cwd);
        Self::load_from_files(&config_files)
    }

    /// Loads configuration from a specific list of config file paths.
    ///
    /// Files should be provided in precedence order: highest precedence first.
    pub fn load_from_files(files: &[PathBuf]) -> Result<Self, ConfigError> {
        let parsed = files
            .iter()
            .map(|path| {
                debug!(path = %path.display(), "loading config file");
                Ok(ParsedConfig {
                    path: path.clone(),
                    config: parse_config_file(path)?,
                })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        Ok(merge_configs(&parsed))
    }

    /// Parses the configured field spec.
    pub fn field_spec(&self) -> Result<FieldSpec, FieldSpecError> {
        hitnorm_fieldspec::parse(&self.fields.spec)
    }

    /// Validates the configuration and returns any warnings.
    pub fn validate(&self) -> Vec<ConfigWarning> {
        validate_config(self)
    }

    /// Serializes the effective settings to TOML, in the same layout as a
    /// `.hitnorm.toml` file.
    pub fn settings_to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

/// Which source fields fill which document roles.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct FieldSettings {
    /// The field spec string.
    pub spec: String,
}

impl Default for FieldSettings {
    fn default() -> Self {
        Self {
            spec: DEFAULT_SPEC.to_string(),
        }
    }
}

/// How highlighted snippets are rendered.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct HighlightSettings {
    /// Marker the engine places before a matched term.
    pub pre: String,
    /// Marker the engine places after a matched term.
    pub post: String,
    /// Characters of escaped text used when a field has no highlight.
    pub snippet_length: usize,
}

impl Default for HighlightSettings {
    fn default() -> Self {
        Self {
            pre: String::from("<em>"),
            post: String::from("</em>"),
            snippet_length: 200,
        }
    }
}

/// Query template hydration settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct QuerySettings {
    /// Substituted for keywords the query does not have.
    pub default_keyword: String,
    /// Percent-encode substituted query text and keywords.
    pub encode_uri: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_defaults() {
        let config = Config::default();
        assert_eq!(config.fields.spec, "id:id title:id *");
        assert_eq!(config.highlight.pre, "<em>");
        assert_eq!(config.highlight.post, "</em>");
        assert_eq!(config.highlight.snippet_length, 200);
        assert_eq!(config.query.default_keyword, "");
        assert!(!config.query.encode_uri);
    }

    #[test]
    fn test_settings_to_toml_roundtrip() {
        let mut config = Config::default();
        config.highlight.pre = "<b>".into();
        config.query.encode_uri = true;

        let toml = config.settings_to_toml().unwrap();
        assert!(toml.contains("[highlight]"));
        assert!(toml.contains("pre = \"<b>\""));

        let back: Config = toml::from_str(&toml).unwrap();
        assert_eq!(back.highlight, config.highlight);
        assert_eq!(back.query, config.query);
        assert_eq!(back.fields, config.fields);
    }

    #[test]
    fn test_field_spec() {
        let mut config = Config::default();
        config.fields.spec = "id:isbn title:name".into();
        let spec = config.field_spec().unwrap();
        assert_eq!(spec.id(), "isbn");
        assert_eq!(spec.title(), "name");
    }

    #[test]
    fn test_load_from_no_files() {
        let config = Config::load_from_files(&[]).unwrap();
        assert!(config.config_root.is_none());
        assert_eq!(config.fields, FieldSettings::default());
    }
}
