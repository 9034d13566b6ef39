//! Configuration validation.
//!
//! Reports non-fatal problems in a loaded configuration.

use std::fmt;

use hitnorm_fieldspec::parse;

use crate::Config;

/// A non-fatal warning about the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigWarning {
    /// The field spec does not parse.
    InvalidFieldSpec {
        /// Parser message, with a position marker.
        message: String,
    },
    /// Exactly one of the highlight markers is empty.
    UnbalancedMarkers,
    /// The fallback snippet length is zero, so unhighlighted fields render empty.
    ZeroSnippetLength,
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidFieldSpec { message } => write!(f, "{message}"),
            Self::UnbalancedMarkers => {
                write!(f, "highlight pre and post markers must both be set or both be empty")
            }
            Self::ZeroSnippetLength => write!(f, "highlight snippet_length is 0"),
        }
    }
}

/// Validates the configuration and returns any warnings.
pub fn validate_config(config: &Config) -> Vec<ConfigWarning> {
    let mut warnings = Vec::new();

    if let Err(err) = parse(&config.fields.spec) {
        warnings.push(ConfigWarning::InvalidFieldSpec {
            message: err.format_with_context(&config.fields.spec),
        });
    }
    if config.highlight.pre.is_empty() != config.highlight.post.is_empty() {
        warnings.push(ConfigWarning::UnbalancedMarkers);
    }
    if config.highlight.snippet_length == 0 {
        warnings.push(ConfigWarning::ZeroSnippetLength);
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_clean() {
        assert!(validate_config(&Config::default()).is_empty());
    }

    #[test]
    fn test_invalid_spec() {
        let mut config = Config::default();
        config.fields.spec = "id:id {\"name\": \"poster\"".into();
        let warnings = validate_config(&config);
        assert_eq!(warnings.len(), 1);
        assert!(matches!(warnings[0], ConfigWarning::InvalidFieldSpec { .. }));
        assert!(warnings[0].to_string().contains('^'));
    }

    #[test]
    fn test_marker_and_length_warnings() {
        let mut config = Config::default();
        config.highlight.post = String::new();
        config.highlight.snippet_length = 0;
        assert_eq!(
            validate_config(&config),
            vec![ConfigWarning::UnbalancedMarkers, ConfigWarning::ZeroSnippetLength]
        );
    }
}
