//! Editor configuration.
//!
//! Everything the engine would otherwise read from ambient state (the coloring toggle, the indent
//! width) is held here and passed explicitly into each operation.

use crate::error::CoreError;
use serde::{Deserialize, Serialize};

/// Default width of one indent unit, in spaces.
pub const DEFAULT_INDENT_WIDTH: usize = 4;

/// Largest accepted indent width.
pub const MAX_INDENT_WIDTH: usize = 16;

/// Two-state syntax coloring switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Coloring {
    /// Classification spans are computed and applied.
    #[default]
    Enabled,
    /// No classification spans exist.
    Disabled,
}

impl Coloring {
    /// Returns `true` for [`Coloring::Enabled`].
    pub fn is_enabled(self) -> bool {
        self == Coloring::Enabled
    }
}

impl From<bool> for Coloring {
    fn from(enabled: bool) -> Self {
        if enabled {
            Coloring::Enabled
        } else {
            Coloring::Disabled
        }
    }
}

/// How the comment pass treats markers that sit inside string literals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommentPolicy {
    /// A comment starts at the first marker on a line that is not inside a string literal.
    /// String literals that start after that marker are dropped.
    #[default]
    OutsideStrings,
    /// Every marker starts a comment, even inside a string literal. String spans are kept.
    Literal,
}

/// Configuration for an [`Editor`](crate::Editor) session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Width of one indent unit, in spaces.
    pub indent_width: usize,
    /// Initial coloring mode.
    pub coloring: Coloring,
    /// Comment-vs-string policy for the classifier.
    pub comment_policy: CommentPolicy,
    /// Reclassify after every edit (when coloring is enabled) instead of shifting spans.
    pub reclassify_on_edit: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            indent_width: DEFAULT_INDENT_WIDTH,
            coloring: Coloring::Enabled,
            comment_policy: CommentPolicy::OutsideStrings,
            reclassify_on_edit: false,
        }
    }
}

impl EditorConfig {
    /// Parse a config from YAML. Missing fields take their defaults.
    pub fn from_yaml(yaml: &str) -> Result<Self, CoreError> {
        let config: EditorConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<(), CoreError> {
        if !(1..=MAX_INDENT_WIDTH).contains(&self.indent_width) {
            return Err(CoreError::InvalidConfig(format!(
                "indent_width must be in 1..={MAX_INDENT_WIDTH}, got {}",
                self.indent_width
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let config = EditorConfig::default();
        assert_eq!(config.indent_width, 4);
        assert!(config.coloring.is_enabled());
        assert_eq!(config.comment_policy, CommentPolicy::OutsideStrings);
        assert!(!config.reclassify_on_edit);
    }

    #[test]
    fn test_from_yaml_partial() {
        let config = EditorConfig::from_yaml("indent_width: 2\ncoloring: disabled\n").unwrap();
        assert_eq!(
            config,
            EditorConfig {
                indent_width: 2,
                coloring: Coloring::Disabled,
                ..EditorConfig::default()
            }
        );
    }

    #[test]
    fn test_from_yaml_comment_policy() {
        let config = EditorConfig::from_yaml("comment_policy: literal").unwrap();
        assert_eq!(config.comment_policy, CommentPolicy::Literal);
    }

    #[test]
    fn test_rejects_zero_width() {
        let err = EditorConfig::from_yaml("indent_width: 0").unwrap_err();
        assert!(matches!(err, CoreError::InvalidConfig(_)));
    }

    #[test]
    fn test_rejects_bad_yaml() {
        let err = EditorConfig::from_yaml("indent_width: [").unwrap_err();
        assert!(matches!(err, CoreError::ConfigYaml(_)));
    }
}
