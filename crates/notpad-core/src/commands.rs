//! Command interface.
//!
//! A single entry point for shells that dispatch menu items and key bindings as data.
//!
//! # Example
//!
//! ```rust
//! use notpad_core::{Buffer, Command, CommandResult, Editor, EditorConfig, SearchCommand};
//! use notpad_core::{FindOutcome, SearchMatch};
//!
//! let mut editor = Editor::python(Buffer::new("a b a"), EditorConfig::default()).unwrap();
//!
//! let results = editor
//!     .execute_batch(vec![
//!         Command::Search(SearchCommand::Find { term: "a".to_string() }),
//!         Command::Search(SearchCommand::FindNext),
//!     ])
//!     .unwrap();
//!
//! assert_eq!(
//!     results[1],
//!     CommandResult::Find(FindOutcome::Found(SearchMatch { start: 4, end: 5 }))
//! );
//! ```

use crate::buffer::TextHost;
use crate::config::Coloring;
use crate::editor::{Editor, ReplaceOutcome, StatusLine};
use crate::error::CoreError;
use crate::indent::BlockEdit;
use crate::tracker::{FindOutcome, HighlightOutcome};

/// Syntax coloring commands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassifyCommand {
    /// Recompute all classification spans (no-op while coloring is off).
    Reclassify,
    /// Remove all classification spans.
    Clear,
    /// Switch coloring on or off.
    SetColoring {
        /// New mode.
        coloring: Coloring,
    },
    /// Flip the coloring mode.
    ToggleColoring,
}

/// Find / highlight / replace commands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchCommand {
    /// Find `term` from the cursor.
    Find {
        /// Search term; empty clears the current match.
        term: String,
    },
    /// Next occurrence of the remembered term.
    FindNext,
    /// Previous occurrence of the remembered term.
    FindPrev,
    /// Highlight every occurrence of `term`.
    HighlightAll {
        /// Search term; empty clears the highlights.
        term: String,
    },
    /// Remove every search highlight.
    ClearHighlights,
    /// Replace every occurrence of `find`.
    ReplaceAll {
        /// Text to replace.
        find: String,
        /// Replacement text.
        replacement: String,
    },
}

/// Block indentation commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndentCommand {
    /// Indent the selection or insert a unit at the cursor.
    Indent,
    /// Outdent the selection or remove spaces before the cursor.
    Outdent,
}

/// Text and caret commands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditCommand {
    /// Insert text at a character offset.
    Insert {
        /// Character offset to insert at.
        offset: usize,
        /// Text to insert.
        text: String,
    },
    /// Delete `[start, end)`.
    Delete {
        /// Inclusive start character offset.
        start: usize,
        /// Exclusive end character offset.
        end: usize,
    },
    /// Replace `[start, end)` with `text`.
    Replace {
        /// Inclusive start character offset.
        start: usize,
        /// Exclusive end character offset.
        end: usize,
        /// Replacement text.
        text: String,
    },
    /// Replace the whole document.
    Load {
        /// New content.
        text: String,
    },
    /// Move the cursor.
    SetCursor {
        /// Character offset.
        offset: usize,
    },
    /// Select `[start, end)`.
    SetSelection {
        /// Inclusive start character offset.
        start: usize,
        /// Exclusive end character offset.
        end: usize,
    },
    /// Drop the selection.
    ClearSelection,
}

/// Editor command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Syntax coloring
    Classify(ClassifyCommand),
    /// Find / highlight / replace
    Search(SearchCommand),
    /// Block indentation
    Indent(IndentCommand),
    /// Text and caret
    Edit(EditCommand),
}

/// Command execution result
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandResult {
    /// Success, no return value
    Success,
    /// Number of classification spans after the command.
    Spans(usize),
    /// Number of spans removed.
    Removed(usize),
    /// Find / find-next / find-prev outcome.
    Find(FindOutcome),
    /// Highlight-all outcome.
    Highlight(HighlightOutcome),
    /// Replace-all outcome.
    Replace(ReplaceOutcome),
    /// Applied indentation edit; `None` when outdent had nothing to remove.
    Block(Option<BlockEdit>),
    /// Cursor line after a text or caret command.
    Status(StatusLine),
}

impl<H: TextHost> Editor<H> {
    /// Execute command
    pub fn execute(&mut self, command: Command) -> Result<CommandResult, CoreError> {
        tracing::trace!(?command, "execute");
        match command {
            Command::Classify(cmd) => Ok(self.execute_classify(cmd)),
            Command::Search(cmd) => self.execute_search(cmd),
            Command::Indent(cmd) => self.execute_indent(cmd),
            Command::Edit(cmd) => self.execute_edit(cmd),
        }
    }

    /// Execute commands in order, stopping at the first error.
    pub fn execute_batch(
        &mut self,
        commands: Vec<Command>,
    ) -> Result<Vec<CommandResult>, CoreError> {
        let mut results = Vec::with_capacity(commands.len());

        for command in commands {
            let result = self.execute(command)?;
            results.push(result);
        }

        Ok(results)
    }

    fn execute_classify(&mut self, cmd: ClassifyCommand) -> CommandResult {
        match cmd {
            ClassifyCommand::Reclassify => CommandResult::Spans(self.reclassify()),
            ClassifyCommand::Clear => CommandResult::Removed(self.clear_classification()),
            ClassifyCommand::SetColoring { coloring } => {
                CommandResult::Spans(self.set_coloring(coloring))
            }
            ClassifyCommand::ToggleColoring => CommandResult::Spans(self.toggle_coloring()),
        }
    }

    fn execute_search(&mut self, cmd: SearchCommand) -> Result<CommandResult, CoreError> {
        Ok(match cmd {
            SearchCommand::Find { term } => CommandResult::Find(self.find(&term)),
            SearchCommand::FindNext => CommandResult::Find(self.find_next()),
            SearchCommand::FindPrev => CommandResult::Find(self.find_prev()),
            SearchCommand::HighlightAll { term } => {
                CommandResult::Highlight(self.highlight_all(&term))
            }
            SearchCommand::ClearHighlights => {
                self.clear_all_highlights();
                CommandResult::Success
            }
            SearchCommand::ReplaceAll { find, replacement } => {
                CommandResult::Replace(self.replace_all(&find, &replacement)?)
            }
        })
    }

    fn execute_indent(&mut self, cmd: IndentCommand) -> Result<CommandResult, CoreError> {
        let edit = match cmd {
            IndentCommand::Indent => Some(self.indent()?),
            IndentCommand::Outdent => self.outdent()?,
        };
        Ok(CommandResult::Block(edit))
    }

    fn execute_edit(&mut self, cmd: EditCommand) -> Result<CommandResult, CoreError> {
        match cmd {
            EditCommand::Insert { offset, text } => {
                self.edit(offset, offset, &text)?;
            }
            EditCommand::Delete { start, end } => {
                self.edit(start, end, "")?;
            }
            EditCommand::Replace { start, end, text } => {
                self.edit(start, end, &text)?;
            }
            EditCommand::Load { text } => {
                self.load(&text)?;
            }
            EditCommand::SetCursor { offset } => self.host_mut().set_cursor(offset),
            EditCommand::SetSelection { start, end } => self.host_mut().set_selection(start, end),
            EditCommand::ClearSelection => self.host_mut().clear_selection(),
        }
        Ok(CommandResult::Status(self.status()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::Buffer;
    use crate::config::EditorConfig;
    use pretty_assertions::assert_eq;

    fn editor(text: &str) -> Editor<Buffer> {
        Editor::python(Buffer::new(text), EditorConfig::default()).unwrap()
    }

    #[test]
    fn test_find_next_without_term_reports_no_term() {
        let mut editor = editor("abc");
        let result = editor
            .execute(Command::Search(SearchCommand::FindNext))
            .unwrap();
        assert_eq!(result, CommandResult::Find(FindOutcome::NoTerm));
    }

    #[test]
    fn test_indent_block_via_commands() {
        let mut editor = editor("x = 1\n# done\n");
        let results = editor
            .execute_batch(vec![
                Command::Edit(EditCommand::SetSelection { start: 0, end: 13 }),
                Command::Indent(IndentCommand::Indent),
            ])
            .unwrap();
        assert!(matches!(results[1], CommandResult::Block(Some(_))));
        assert_eq!(editor.host().text(), "    x = 1\n    # done\n");
    }

    #[test]
    fn test_batch_stops_on_error() {
        let mut editor = editor("abc");
        let err = editor
            .execute_batch(vec![
                Command::Edit(EditCommand::Delete { start: 0, end: 1 }),
                Command::Edit(EditCommand::Delete { start: 5, end: 9 }),
                Command::Edit(EditCommand::Delete { start: 0, end: 1 }),
            ])
            .unwrap_err();
        assert!(matches!(err, CoreError::InvalidRange { .. }));
        assert_eq!(editor.host().text(), "bc");
    }

    #[test]
    fn test_edit_reports_status() {
        let mut editor = editor("");
        let result = editor
            .execute(Command::Edit(EditCommand::Insert {
                offset: 0,
                text: "a\nb".to_string(),
            }))
            .unwrap();
        // The cursor sat at the insertion point and moves past the new text.
        assert_eq!(
            result,
            CommandResult::Status(StatusLine {
                line: 2,
                total_lines: 2
            })
        );
    }

    #[test]
    fn test_toggle_coloring_command() {
        let mut editor = editor("x = 1");
        let result = editor
            .execute(Command::Classify(ClassifyCommand::ToggleColoring))
            .unwrap();
        assert_eq!(result, CommandResult::Spans(0));
        assert_eq!(editor.coloring(), Coloring::Disabled);
    }
}
