//! Tokenizer/classifier.
//!
//! Runs a fixed, ordered list of whole-buffer passes and returns the accepted spans. Each pass
//! pairs a matcher with an acceptance policy:
//!
//! | pass     | matcher                         | acceptance            |
//! |----------|---------------------------------|-----------------------|
//! | String   | quoted run, no literal newline  | always                |
//! | Comment  | marker through end of line      | always                |
//! | Keyword  | whole reserved word             | skip if classified    |
//! | Builtin  | whole built-in name             | skip if classified    |
//! | Number   | whole integer/decimal literal   | skip if classified    |
//!
//! "Skip if classified" looks only at the candidate's start offset, and only at spans accepted
//! by earlier passes: candidates of one pass are filtered against the state before that pass,
//! then inserted together.

use crate::config::CommentPolicy;
use crate::error::CoreError;
use crate::intervals::{Interval, IntervalTree};
use crate::line_index::LineIndex;
use crate::search::CharIndex;
use notpad_lang::{LanguageTables, TokenClass};
use regex::Regex;

const STRING_PATTERN: &str = r#"'(?:[^'\\\n]|\\.)*'|"(?:[^"\\\n]|\\.)*""#;
const NUMBER_PATTERN: &str = r"\b\d+(?:\.\d+)?\b";

/// A classified half-open character range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClassifiedSpan {
    /// Inclusive start character offset.
    pub start: usize,
    /// Exclusive end character offset.
    pub end: usize,
    /// Semantic class.
    pub class: TokenClass,
}

impl ClassifiedSpan {
    /// Create a new span.
    pub fn new(start: usize, end: usize, class: TokenClass) -> Self {
        Self { start, end, class }
    }
}

impl From<&Interval<TokenClass>> for ClassifiedSpan {
    fn from(interval: &Interval<TokenClass>) -> Self {
        Self::new(interval.start, interval.end, interval.value)
    }
}

/// When a candidate span is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Acceptance {
    Always,
    /// Rejected if its start offset is already covered by an earlier pass.
    SkipIfClassified,
}

#[derive(Debug, Clone)]
enum Matcher {
    Pattern(Regex),
    /// First marker per line that does not sit inside an accepted string.
    CommentOutsideStrings { marker: String },
}

#[derive(Debug, Clone)]
struct Pass {
    class: TokenClass,
    matcher: Matcher,
    acceptance: Acceptance,
}

/// Everything one classification call computes offsets against.
struct Snapshot<'a> {
    text: &'a str,
    chars: CharIndex,
    lines: LineIndex,
}

impl Matcher {
    fn candidates(
        &self,
        snapshot: &Snapshot<'_>,
        claimed: &IntervalTree<TokenClass>,
    ) -> Vec<(usize, usize)> {
        match self {
            Matcher::Pattern(regex) => regex
                .find_iter(snapshot.text)
                .map(|m| {
                    (
                        snapshot.chars.byte_to_char(m.start()),
                        snapshot.chars.byte_to_char(m.end()),
                    )
                })
                .filter(|(start, end)| start < end)
                .collect(),
            Matcher::CommentOutsideStrings { marker } => {
                let mut spans = Vec::new();
                let mut resume = 0;
                for (byte, _) in snapshot.text.match_indices(marker.as_str()) {
                    let start = snapshot.chars.byte_to_char(byte);
                    if start < resume {
                        continue;
                    }
                    let in_string = claimed
                        .query_point(start)
                        .iter()
                        .any(|i| i.value == TokenClass::String);
                    if in_string {
                        continue;
                    }
                    let line = snapshot.lines.line_of(start);
                    let end = snapshot
                        .lines
                        .line_end(line)
                        .unwrap_or(snapshot.lines.char_count());
                    spans.push((start, end));
                    resume = end;
                }
                spans
            }
        }
    }
}

/// Whole-buffer classifier for one language.
#[derive(Debug, Clone)]
pub struct Classifier {
    passes: Vec<Pass>,
    comment_policy: CommentPolicy,
}

impl Classifier {
    /// Build the pass list for `tables`.
    pub fn new(tables: &LanguageTables, comment_policy: CommentPolicy) -> Result<Self, CoreError> {
        tables.validate()?;

        let mut passes = vec![Pass {
            class: TokenClass::String,
            matcher: Matcher::Pattern(compile(TokenClass::String, STRING_PATTERN)?),
            acceptance: Acceptance::Always,
        }];

        if let Some(marker) = tables.comment.line.as_deref() {
            let matcher = match comment_policy {
                CommentPolicy::OutsideStrings => Matcher::CommentOutsideStrings {
                    marker: marker.to_string(),
                },
                CommentPolicy::Literal => Matcher::Pattern(compile(
                    TokenClass::Comment,
                    &format!("{}[^\\n]*", regex::escape(marker)),
                )?),
            };
            passes.push(Pass {
                class: TokenClass::Comment,
                matcher,
                acceptance: Acceptance::Always,
            });
        }

        for (class, words) in [
            (TokenClass::Keyword, &tables.keywords),
            (TokenClass::Builtin, &tables.builtins),
        ] {
            if words.is_empty() {
                continue;
            }
            passes.push(Pass {
                class,
                matcher: Matcher::Pattern(compile(class, &word_pattern(words))?),
                acceptance: Acceptance::SkipIfClassified,
            });
        }

        passes.push(Pass {
            class: TokenClass::Number,
            matcher: Matcher::Pattern(compile(TokenClass::Number, NUMBER_PATTERN)?),
            acceptance: Acceptance::SkipIfClassified,
        });

        Ok(Self {
            passes,
            comment_policy,
        })
    }

    /// Classifier for the checked-in Python tables.
    pub fn python(comment_policy: CommentPolicy) -> Result<Self, CoreError> {
        Self::new(&LanguageTables::python(), comment_policy)
    }

    /// The comment policy this classifier was built with.
    pub fn comment_policy(&self) -> CommentPolicy {
        self.comment_policy
    }

    /// Classify the whole of `text`. Returns spans sorted by `(start, end, class)`.
    ///
    /// Empty or whitespace-only text yields no spans.
    pub fn classify(&self, text: &str) -> Vec<ClassifiedSpan> {
        if text.trim().is_empty() {
            return Vec::new();
        }

        let snapshot = Snapshot {
            text,
            chars: CharIndex::new(text),
            lines: LineIndex::new(text),
        };
        let mut claimed: IntervalTree<TokenClass> = IntervalTree::new();

        for pass in &self.passes {
            let accepted: Vec<(usize, usize)> = pass
                .matcher
                .candidates(&snapshot, &claimed)
                .into_iter()
                .filter(|&(start, _)| match pass.acceptance {
                    Acceptance::Always => true,
                    Acceptance::SkipIfClassified => !claimed.covers(start),
                })
                .collect();

            tracing::trace!(class = pass.class.name(), accepted = accepted.len(), "classify pass");

            if let Matcher::CommentOutsideStrings { .. } = pass.matcher {
                // A quote after the comment marker is comment text, not a literal.
                let mut comments = IntervalTree::new();
                comments.replace_all(
                    accepted
                        .iter()
                        .map(|&(start, end)| Interval::new(start, end, ()))
                        .collect(),
                );
                claimed.retain(|i| i.value != TokenClass::String || !comments.covers(i.start));
            }

            for (start, end) in accepted {
                claimed.insert(Interval::new(start, end, pass.class));
            }
        }

        let mut spans: Vec<ClassifiedSpan> = claimed.iter().map(ClassifiedSpan::from).collect();
        spans.sort();
        spans
    }
}

fn word_pattern(words: &[String]) -> String {
    let alternatives: Vec<String> = words.iter().map(|w| regex::escape(w)).collect();
    format!(r"\b(?:{})\b", alternatives.join("|"))
}

fn compile(class: TokenClass, pattern: &str) -> Result<Regex, CoreError> {
    Regex::new(pattern).map_err(|source| CoreError::Regex {
        class: class.name(),
        source,
    })
}
