//! Configuration file parsing.
//!
//! Parses individual `.hitnorm.toml` files into intermediate `RawConfig` structures
//! that preserve the optional nature of all fields before merging.

use std::{fs, path::Path};

use serde::Deserialize;
use serde_with::{OneOrMany, serde_as};
#[cfg(test)]
use toml::de::Error as TomlError;

use crate::ConfigError;

/// Raw configuration as parsed directly from a TOML file.
///
/// All fields are optional to support partial configs that will be merged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// When true, stop discovery here - ignore parent and global configs.
    pub root: Option<bool>,
    /// Field spec section.
    pub fields: Option<RawFieldSettings>,
    /// Highlight section.
    pub highlight: Option<RawHighlightSettings>,
    /// Query template section.
    pub query: Option<RawQuerySettings>,
}

/// Raw field spec settings.
#[serde_as]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawFieldSettings {
    /// Field spec, either one string or a list of fragments.
    #[serde_as(as = "Option<OneOrMany<_>>")]
    pub spec: Option<Vec<String>>,
}

/// Raw highlight settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawHighlightSettings {
    /// Marker before a matched term.
    pub pre: Option<String>,
    /// Marker after a matched term.
    pub post: Option<String>,
    /// Fallback snippet length in characters.
    pub snippet_length: Option<usize>,
}

/// Raw query template settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawQuerySettings {
    /// Keyword used when the query has too few words.
    pub default_keyword: Option<String>,
    /// Percent-encode substituted query text.
    pub encode_uri: Option<bool>,
}

/// Parses a configuration file from disk.
pub fn parse_config_file(path: &Path) -> Result<RawConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;

    parse_config_str(&contents, path)
}

/// Parses configuration from a TOML string.
///
/// The `path` parameter is used for error reporting.
pub fn parse_config_str(contents: &str, path: &Path) -> Result<RawConfig, ConfigError> {
    toml::from_str(contents).map_err(|source| ConfigError::ParseToml {
        path: path.to_path_buf(),
        source,
    })
}

/// Parses configuration from a TOML string without path context.
#[cfg(test)]
pub fn parse_config(contents: &str) -> Result<RawConfig, TomlError> {
    toml::from_str(contents)
}

/// Checks if a config file has `root = true` set.
///
/// Returns false if the file cannot be read or parsed.
pub fn is_root_config(path: &Path) -> bool {
    let Ok(contents) = fs::read_to_string(path) else {
        return false;
    };
    let Ok(config) = toml::from_str::<RawConfig>(&contents) else {
        return false;
    };
    config.root == Some(true)
}
