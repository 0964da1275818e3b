#![warn(missing_docs)]
//! `notpad-lang` - data-driven language tables for `notpad-core`.
//!
//! This crate stays lightweight and knows nothing about buffers or highlighting passes. It
//! provides the fixed tables the classifier is built from (reserved words, built-in names, the
//! line comment marker) and the stable token class -> color mapping shared by every renderer or
//! exporter that needs per-character colors.

mod python;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use python::{PYTHON_BUILTINS, PYTHON_KEYWORDS, PYTHON_TABLE_VERSION};

/// Errors produced while loading or validating [`LanguageTables`].
#[derive(Debug, Error)]
pub enum LangError {
    #[error("YAML parse error: {0}")]
    /// YAML parsing failed.
    Yaml(#[from] serde_yaml::Error),

    #[error("empty word in {list} list")]
    /// A word list contained an empty entry.
    EmptyWord {
        /// Which list held the empty entry (`keywords` / `builtins`).
        list: &'static str,
    },

    #[error("line comment marker must not be empty")]
    /// The comment marker was configured but empty.
    EmptyCommentMarker,
}

/// Semantic class assigned to a classified span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenClass {
    /// Reserved word.
    Keyword,
    /// Built-in identifier.
    Builtin,
    /// Line comment (marker through end of line).
    Comment,
    /// Single- or double-quoted string literal.
    String,
    /// Integer or decimal literal.
    Number,
}

impl TokenClass {
    /// All classes in classification pass order (highest priority pass first).
    pub const SCAN_ORDER: [TokenClass; 5] = [
        TokenClass::String,
        TokenClass::Comment,
        TokenClass::Keyword,
        TokenClass::Builtin,
        TokenClass::Number,
    ];

    /// Priority used when several classes cover the same character at render time.
    ///
    /// Higher wins. Comments beat strings so that a comment marker is never painted over by a
    /// string-looking run inside the comment.
    pub fn render_priority(self) -> u8 {
        match self {
            TokenClass::Comment => 5,
            TokenClass::String => 4,
            TokenClass::Keyword => 3,
            TokenClass::Builtin => 2,
            TokenClass::Number => 1,
        }
    }

    /// Display color for this class.
    pub fn color(self) -> Rgb {
        match self {
            TokenClass::Keyword => Rgb::new(0x00, 0x00, 0xcc),
            TokenClass::Builtin => Rgb::new(0x00, 0x66, 0xaa),
            TokenClass::Comment => Rgb::new(0x00, 0x80, 0x00),
            TokenClass::String => Rgb::new(0xaa, 0x55, 0x00),
            TokenClass::Number => Rgb::new(0x99, 0x00, 0x99),
        }
    }

    /// Stable lowercase name (matches the serde representation).
    pub fn name(self) -> &'static str {
        match self {
            TokenClass::Keyword => "keyword",
            TokenClass::Builtin => "builtin",
            TokenClass::Comment => "comment",
            TokenClass::String => "string",
            TokenClass::Number => "number",
        }
    }
}

/// An 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb {
    /// Plain (unclassified) text color.
    pub const PLAIN: Rgb = Rgb::new(0, 0, 0);

    /// Create a color from its channels.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Color for an optional class; `None` is plain text.
    pub fn for_class(class: Option<TokenClass>) -> Self {
        class.map_or(Self::PLAIN, TokenClass::color)
    }

    /// `#rrggbb` form.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Channels scaled to `0.0..=1.0` (for document exporters that take float colors).
    pub fn to_unit(self) -> (f32, f32, f32) {
        (
            f32::from(self.r) / 255.0,
            f32::from(self.g) / 255.0,
            f32::from(self.b) / 255.0,
        )
    }
}

/// Comment tokens for a language.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CommentConfig {
    /// Line comment token (e.g. `#`, `//`).
    #[serde(default)]
    pub line: Option<String>,
}

impl CommentConfig {
    /// Create a config with a line comment token.
    pub fn line(token: impl Into<String>) -> Self {
        Self {
            line: Some(token.into()),
        }
    }

    /// Returns `true` if a non-empty line comment token is configured.
    pub fn has_line(&self) -> bool {
        self.line.as_deref().is_some_and(|s| !s.is_empty())
    }
}

/// The fixed word lists and comment marker a classifier is built from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageTables {
    /// Language name (informational).
    pub name: String,
    /// Version tag of the word lists (e.g. `python-3.12`).
    pub version: String,
    /// Reserved words.
    #[serde(default)]
    pub keywords: Vec<String>,
    /// Built-in identifiers.
    #[serde(default)]
    pub builtins: Vec<String>,
    /// Comment tokens.
    #[serde(default)]
    pub comment: CommentConfig,
}

impl LanguageTables {
    /// The checked-in Python tables.
    pub fn python() -> Self {
        Self {
            name: "python".to_string(),
            version: PYTHON_TABLE_VERSION.to_string(),
            keywords: PYTHON_KEYWORDS.iter().map(|s| s.to_string()).collect(),
            builtins: PYTHON_BUILTINS.iter().map(|s| s.to_string()).collect(),
            comment: CommentConfig::line("#"),
        }
    }

    /// Parse tables from YAML and validate them.
    pub fn from_yaml(yaml: &str) -> Result<Self, LangError> {
        let tables: LanguageTables = serde_yaml::from_str(yaml)?;
        tables.validate()?;
        Ok(tables)
    }

    /// Reject empty words and an empty comment marker.
    pub fn validate(&self) -> Result<(), LangError> {
        if self.keywords.iter().any(|w| w.is_empty()) {
            return Err(LangError::EmptyWord { list: "keywords" });
        }
        if self.builtins.iter().any(|w| w.is_empty()) {
            return Err(LangError::EmptyWord { list: "builtins" });
        }
        if self.comment.line.is_some() && !self.comment.has_line() {
            return Err(LangError::EmptyCommentMarker);
        }
        Ok(())
    }

    /// Returns `true` if `word` is in the reserved-word list.
    pub fn is_keyword(&self, word: &str) -> bool {
        self.keywords.iter().any(|k| k == word)
    }

    /// Returns `true` if `word` is in the built-in identifier list.
    pub fn is_builtin(&self, word: &str) -> bool {
        self.builtins.iter().any(|b| b == word)
    }
}

impl Default for LanguageTables {
    fn default() -> Self {
        Self::python()
    }
}
