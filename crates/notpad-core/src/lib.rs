#![warn(missing_docs)]
//! NotPad Core - headless syntax coloring, search highlighting and block indentation
//!
//! # Overview
//!
//! `notpad-core` is the text-processing engine behind the NotPad code editor widget. It does not
//! draw anything: the editor shell owns the buffer, the selection and the view, and reaches the
//! engine through the [`TextHost`] trait. The engine answers with spans (what to color, what to
//! highlight) and block edits (what to replace).
//!
//! # Core Features
//!
//! - **Line Index**: `(line, column)` ↔ character offset conversion, O(log lines)
//! - **Classifier**: ordered whole-buffer passes (string, comment, keyword, builtin, number)
//! - **Highlight Registry**: classification spans, overlap resolved by render priority
//! - **Search Tracker**: all-matches and current-match highlights that are pruned when edits make
//!   them stale
//! - **Block Indent**: line-expanded indent/outdent applied as one atomic replacement
//!
//! # Architecture Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  Command Interface & Editor Session         │  ← Public API
//! ├─────────────────────────────────────────────┤
//! │  Highlight Registry   │  Search Tracker     │  ← Span owners
//! ├─────────────────────────────────────────────┤
//! │  Classifier           │  Block Indent       │  ← Pure passes / planners
//! ├─────────────────────────────────────────────┤
//! │  Interval Tree  │  Line Index  │  Search    │  ← Primitives
//! ├─────────────────────────────────────────────┤
//! │  TextHost (ropey-backed Buffer)             │  ← Text Storage
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use notpad_core::{Buffer, Editor, EditorConfig, TextHost, TokenClass};
//!
//! let mut editor = Editor::python(Buffer::new("x = 1\n# done\n"), EditorConfig::default()).unwrap();
//!
//! // Select both lines and indent them.
//! editor.host_mut().set_selection(0, 13);
//! editor.indent().unwrap();
//! assert_eq!(editor.host().text(), "    x = 1\n    # done\n");
//!
//! // Indented blocks are reclassified.
//! assert_eq!(editor.registry().class_at(14), Some(TokenClass::Comment));
//! assert_eq!(editor.registry().class_at(8), Some(TokenClass::Number));
//! ```
//!
//! # Offsets
//!
//! Every offset in the public API is a **character** offset into the newline-joined buffer.
//! Lines are 1-based, columns 0-based.
//!
//! # Module Description
//!
//! - [`line_index`] - line-start prefix array and address conversion
//! - [`classify`] - token classifier
//! - [`registry`] - classification span registry
//! - [`tracker`] - search highlight tracker
//! - [`indent`] - block indent / outdent planning
//! - [`editor`] - editor session over a [`TextHost`]
//! - [`commands`] - command interface

pub mod buffer;
pub mod classify;
pub mod commands;
pub mod config;
pub mod delta;
pub mod editor;
pub mod error;
pub mod indent;
pub mod intervals;
pub mod line_index;
pub mod registry;
pub mod search;
pub mod tracker;

pub use buffer::{Buffer, TextHost};
pub use classify::{ClassifiedSpan, Classifier};
pub use commands::{
    ClassifyCommand, Command, CommandResult, EditCommand, IndentCommand, SearchCommand,
};
pub use config::{Coloring, CommentPolicy, DEFAULT_INDENT_WIDTH, EditorConfig, MAX_INDENT_WIDTH};
pub use delta::{TextDelta, TextDeltaEdit};
pub use editor::{Editor, ReplaceOutcome, StatusLine};
pub use error::CoreError;
pub use indent::{BlockEdit, IndentUnit, indent_gutter, plan_indent, plan_outdent};
pub use intervals::{Interval, IntervalTree};
pub use line_index::{Address, LineIndex};
pub use registry::{HighlightRegistry, StyledRun};
pub use search::{Direction, SearchMatch};
pub use tracker::{FindOutcome, HighlightOutcome, SearchCategory, SearchSpan, SearchTracker};

pub use notpad_lang::{LanguageTables, Rgb, TokenClass};
