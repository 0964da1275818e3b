//! Error types.
//!
//! Normal editing input never produces an error: not-found searches, empty terms and collapsed
//! selections are reported as outcome values. [`CoreError`] covers construction failures (bad
//! configuration, bad language tables) and host edits addressed outside the buffer.

use notpad_lang::LangError;
use thiserror::Error;

#[derive(Debug, Error)]
/// Errors produced by `notpad-core`.
pub enum CoreError {
    #[error("invalid range: {start}..{end} (buffer has {len} chars)")]
    /// A replace was addressed outside the buffer or with `start > end`.
    InvalidRange {
        /// Inclusive start character offset.
        start: usize,
        /// Exclusive end character offset.
        end: usize,
        /// Buffer length in characters.
        len: usize,
    },

    #[error("invalid config: {0}")]
    /// A configuration value failed validation.
    InvalidConfig(String),

    #[error("config parse error: {0}")]
    /// Configuration YAML failed to parse.
    ConfigYaml(#[from] serde_yaml::Error),

    #[error("regex compile error for {class} pattern: {source}")]
    /// A classifier pattern failed to compile.
    Regex {
        /// Name of the token class whose pattern failed.
        class: &'static str,
        /// The underlying regex error.
        #[source]
        source: regex::Error,
    },

    #[error(transparent)]
    /// Language tables failed validation.
    Lang(#[from] LangError),
}
