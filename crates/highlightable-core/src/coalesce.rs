//! Edit recording: decides whether an edit extends the current history entry
//! or starts a new one.
//!
//! Consecutive edits of the same kind merge into one undo step. Moving the
//! selection between two edits breaks the run, as does switching kind.

use crate::actions::InputType;
use crate::history::{EditSource, History, HistoryEntry, HistoryUpdate};
use crate::types::Offsets;

/// Classify an edit against the current entry.
///
/// Returns the source of a new entry to insert, or `None` when the edit
/// should be merged into the current entry. `input_type` is `None` for a
/// committed composition, which counts as a character insertion.
pub fn classify(
    input_type: Option<&InputType>,
    data: Option<&str>,
    current: EditSource,
    selection_changed: bool,
) -> Option<EditSource> {
    match input_type {
        None | Some(InputType::InsertText) => {
            if data == Some(" ") {
                (current != EditSource::Space).then_some(EditSource::Space)
            } else {
                (current != EditSource::Normal || selection_changed).then_some(EditSource::Normal)
            }
        }
        Some(t) if t.is_insertion() => Some(EditSource::Single),
        Some(t) if t.is_deletion() => (current != EditSource::Delete).then_some(EditSource::Delete),
        Some(_) => None,
    }
}

/// Records user edits into a [`History`], coalescing runs of similar edits.
#[derive(Debug, Clone)]
pub struct EditRecorder {
    history: History,
    composing: bool,
    selection_changed: bool,
}

impl EditRecorder {
    pub fn new(initial_value: impl Into<String>) -> Self {
        Self {
            history: History::new(HistoryEntry::initial(initial_value)),
            composing: false,
            selection_changed: false,
        }
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn current(&self) -> &HistoryEntry {
        self.history.current()
    }

    pub fn is_composing(&self) -> bool {
        self.composing
    }

    pub fn set_composing(&mut self, composing: bool) {
        self.composing = composing;
    }

    /// Note the selection just before an edit is applied.
    ///
    /// A range selection, or a caret that moved away from where the last
    /// edit left it, marks the selection as changed. The current entry then
    /// takes the new offsets so undo lands where the edit started.
    pub fn before_input(&mut self, selection: Offsets) {
        if self.composing {
            return;
        }

        let current = self.history.current().offsets;
        if !selection.is_collapsed() || selection != current {
            self.selection_changed = true;
        }
        self.history.update(HistoryUpdate::offsets(selection));
    }

    /// Record an applied edit. Returns the source of the inserted entry, or
    /// `None` when the edit was merged into the current one.
    pub fn record(
        &mut self,
        input_type: Option<&InputType>,
        data: Option<&str>,
        value: impl Into<String>,
        offsets: Offsets,
    ) -> Option<EditSource> {
        let current = self.history.current().source;
        let source = classify(input_type, data, current, self.selection_changed);
        let value = value.into();

        match source {
            Some(source) => {
                tracing::debug!(
                    target: "highlightable::history",
                    ?source,
                    index = self.history.current_index() + 1,
                    "new history entry"
                );
                self.history.insert(HistoryEntry::new(value, offsets, source));
            }
            None => self
                .history
                .update(HistoryUpdate::value_and_offsets(value, offsets)),
        }

        self.selection_changed = false;
        source
    }

    pub fn undo(&mut self) -> Option<&HistoryEntry> {
        self.history.undo()
    }

    pub fn redo(&mut self) -> Option<&HistoryEntry> {
        self.history.redo()
    }
}
