//! Core offset and selection types.
//!
//! All offsets are UTF-16 code unit indices into the plain-text projection of
//! the editable surface, matching the units the DOM Selection API reports.

use std::ops::Range;

/// A `[start, end]` pair of plain-text offsets.
///
/// `start` corresponds to the selection anchor and `end` to the focus, so the
/// pair may be reversed. Use `min()`/`max()` for ordered bounds.
#[derive(Clone, Debug, Copy, PartialEq, Eq, Default, Hash)]
pub struct Offsets {
    pub start: usize,
    pub end: usize,
}

impl Offsets {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// A collapsed pair (caret) at `offset`.
    pub fn caret(offset: usize) -> Self {
        Self {
            start: offset,
            end: offset,
        }
    }

    pub fn is_collapsed(&self) -> bool {
        self.start == self.end
    }

    /// True when the focus sits before the anchor.
    pub fn is_reversed(&self) -> bool {
        self.start > self.end
    }

    /// Lower bound.
    pub fn min(&self) -> usize {
        self.start.min(self.end)
    }

    /// Upper bound.
    pub fn max(&self) -> usize {
        self.start.max(self.end)
    }

    /// Swap endpoints so that `start <= end`.
    pub fn normalize(self) -> Self {
        Self {
            start: self.min(),
            end: self.max(),
        }
    }

    pub fn len(&self) -> usize {
        self.max() - self.min()
    }

    pub fn is_empty(&self) -> bool {
        self.is_collapsed()
    }

    pub fn to_range(&self) -> Range<usize> {
        self.min()..self.max()
    }
}

impl From<usize> for Offsets {
    fn from(offset: usize) -> Self {
        Self::caret(offset)
    }
}

impl From<(usize, usize)> for Offsets {
    fn from((start, end): (usize, usize)) -> Self {
        Self::new(start, end)
    }
}

impl From<[usize; 2]> for Offsets {
    fn from([start, end]: [usize; 2]) -> Self {
        Self::new(start, end)
    }
}

impl From<Offsets> for (usize, usize) {
    fn from(o: Offsets) -> Self {
        (o.start, o.end)
    }
}

/// What to select when installing a selection.
#[derive(Clone, Debug, Copy, PartialEq, Eq)]
pub enum SelectOffsets {
    /// Select every character in the surface.
    All,
    /// Select a specific pair (collapsed when both ends are equal).
    Offsets(Offsets),
}

impl From<usize> for SelectOffsets {
    fn from(offset: usize) -> Self {
        Self::Offsets(Offsets::caret(offset))
    }
}

impl From<(usize, usize)> for SelectOffsets {
    fn from(pair: (usize, usize)) -> Self {
        Self::Offsets(pair.into())
    }
}

impl From<Offsets> for SelectOffsets {
    fn from(offsets: Offsets) -> Self {
        Self::Offsets(offsets)
    }
}

/// Which boundary to collapse the live selection to after installing it.
#[derive(Clone, Debug, Copy, PartialEq, Eq)]
pub enum Collapse {
    Start,
    End,
}

impl Collapse {
    /// Parse the `'start' | 'end'` strings used by JS callers.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "start" => Some(Self::Start),
            "end" => Some(Self::End),
            _ => None,
        }
    }
}

/// Options for installing a selection.
#[derive(Clone, Debug, Copy, PartialEq, Eq, Default)]
pub struct SelectOptions {
    /// Install even when the surface does not hold focus.
    pub force: bool,
    pub collapse: Option<Collapse>,
}

impl SelectOptions {
    pub fn forced() -> Self {
        Self {
            force: true,
            collapse: None,
        }
    }

    pub fn with_collapse(mut self, collapse: Collapse) -> Self {
        self.collapse = Some(collapse);
        self
    }
}

/// Payload handed to the caller's `on_input` callback after a user edit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InputNotice {
    pub value: String,
    /// Caret position after the edit (UTF-16 offset).
    pub position: usize,
}
