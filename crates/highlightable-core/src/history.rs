//! Undo/redo history of plain-text snapshots.
//!
//! The stack is linear: inserting while not at the tail discards the redo
//! branch. The current entry is mutable so runs of similar edits can be
//! merged into it (see [`crate::coalesce`]).

use crate::types::Offsets;

/// What kind of edit produced a history entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EditSource {
    /// Seed entry created when the surface is bound.
    Initial,
    /// Insertion of a single space.
    Space,
    /// Plain character insertion.
    Normal,
    /// Any other insertion (paragraph, paste, drop, ...).
    Single,
    /// Any deletion.
    Delete,
}

/// A snapshot of the surface after an edit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HistoryEntry {
    pub value: String,
    pub offsets: Offsets,
    pub source: EditSource,
}

impl HistoryEntry {
    pub fn new(value: impl Into<String>, offsets: Offsets, source: EditSource) -> Self {
        Self {
            value: value.into(),
            offsets,
            source,
        }
    }

    /// The seed entry for a freshly bound surface.
    pub fn initial(value: impl Into<String>) -> Self {
        Self::new(value, Offsets::default(), EditSource::Initial)
    }
}

/// Partial entry merged into the current entry by [`History::update`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HistoryUpdate {
    pub value: Option<String>,
    pub offsets: Option<Offsets>,
    pub source: Option<EditSource>,
}

impl HistoryUpdate {
    pub fn offsets(offsets: Offsets) -> Self {
        Self {
            offsets: Some(offsets),
            ..Self::default()
        }
    }

    pub fn value_and_offsets(value: impl Into<String>, offsets: Offsets) -> Self {
        Self {
            value: Some(value.into()),
            offsets: Some(offsets),
            source: None,
        }
    }
}

/// Linear undo/redo stack.
#[derive(Clone, Debug)]
pub struct History {
    stack: Vec<HistoryEntry>,
    current_index: usize,
}

impl History {
    /// Create a history seeded with `initial`.
    pub fn new(initial: HistoryEntry) -> Self {
        Self {
            stack: vec![initial],
            current_index: 0,
        }
    }

    /// Push `entry` after the current one, discarding any redo branch.
    pub fn insert(&mut self, entry: HistoryEntry) {
        self.stack.truncate(self.current_index + 1);
        self.stack.push(entry);
        self.current_index = self.stack.len() - 1;
    }

    /// Merge `update` into the current entry in place.
    pub fn update(&mut self, update: HistoryUpdate) {
        let current = &mut self.stack[self.current_index];
        if let Some(value) = update.value {
            current.value = value;
        }
        if let Some(offsets) = update.offsets {
            current.offsets = offsets;
        }
        if let Some(source) = update.source {
            current.source = source;
        }
    }

    /// Step back one entry. Returns the new current entry, or `None` at the start.
    pub fn undo(&mut self) -> Option<&HistoryEntry> {
        if self.current_index == 0 {
            return None;
        }
        self.current_index -= 1;
        Some(&self.stack[self.current_index])
    }

    /// Step forward one entry. Returns the new current entry, or `None` at the tail.
    pub fn redo(&mut self) -> Option<&HistoryEntry> {
        if self.current_index + 1 >= self.stack.len() {
            return None;
        }
        self.current_index += 1;
        Some(&self.stack[self.current_index])
    }

    pub fn current(&self) -> &HistoryEntry {
        &self.stack[self.current_index]
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// Number of entries, including the seed.
    pub fn len(&self) -> usize {
        self.stack.len()
    }

    /// Always false: the seed entry is never removed.
    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    pub fn can_undo(&self) -> bool {
        self.current_index > 0
    }

    pub fn can_redo(&self) -> bool {
        self.current_index + 1 < self.stack.len()
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.stack
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(value: &str, at: usize) -> HistoryEntry {
        HistoryEntry::new(value, Offsets::caret(at), EditSource::Normal)
    }

    #[test]
    fn test_insert_undo_redo() {
        let mut history = History::new(HistoryEntry::initial("hello"));
        assert!(!history.can_undo());

        history.insert(entry("hello world", 11));
        assert_eq!(history.current().value, "hello world");
        assert!(history.can_undo());

        assert_eq!(history.undo().map(|e| e.value.as_str()), Some("hello"));
        assert!(!history.can_undo());
        assert!(history.can_redo());

        assert_eq!(history.redo().map(|e| e.value.as_str()), Some("hello world"));
        assert!(!history.can_redo());
    }

    #[test]
    fn test_boundaries_are_noops() {
        let mut history = History::new(HistoryEntry::initial(""));
        assert!(history.undo().is_none());
        assert!(history.redo().is_none());
        assert_eq!(history.current_index(), 0);
    }

    #[test]
    fn test_insert_discards_redo_branch() {
        let mut history = History::new(HistoryEntry::initial(""));
        history.insert(entry("a", 1));
        history.insert(entry("ab", 2));
        history.insert(entry("abc", 3));

        history.undo();
        history.undo();
        assert_eq!(history.current().value, "a");

        history.insert(entry("ax", 2));
        assert_eq!(history.len(), 3);
        assert!(!history.can_redo());
        assert_eq!(history.current_index(), 2);
    }

    #[test]
    fn test_update_merges_in_place() {
        let mut history = History::new(HistoryEntry::initial("x"));
        history.insert(entry("xy", 2));
        history.update(HistoryUpdate::offsets(Offsets::new(0, 2)));
        history.update(HistoryUpdate::value_and_offsets("xyz", Offsets::caret(3)));

        assert_eq!(history.len(), 2);
        let current = history.current();
        assert_eq!(current.value, "xyz");
        assert_eq!(current.offsets, Offsets::caret(3));
        assert_eq!(current.source, EditSource::Normal);
    }

    #[test]
    fn test_undo_redo_symmetry() {
        let mut history = History::new(HistoryEntry::initial(""));
        for (i, value) in ["a", "ab", "abc", "abcd"].iter().enumerate() {
            history.insert(entry(value, i + 1));
        }
        let before = history.current().clone();

        for m in 0..history.len() {
            for _ in 0..m {
                history.undo();
            }
            for _ in 0..m {
                history.redo();
            }
            assert_eq!(history.current(), &before, "m = {m}");
        }
    }
}
