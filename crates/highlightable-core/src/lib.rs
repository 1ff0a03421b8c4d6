//! highlightable-core: pure Rust logic for a highlightable editable surface.
//!
//! This crate provides:
//! - `Offsets` and friends, the plain-text selection model
//! - offset mapping over any sequence of text nodes
//! - `perform_highlight`, rendering text to markup by ordered pattern rules
//! - `History` and `EditRecorder`, coalescing undo/redo
//! - input and keyboard classification, focus restoration policy

pub mod actions;
pub mod coalesce;
pub mod error;
pub mod focus;
pub mod highlight;
pub mod history;
pub mod platform;
pub mod selection;
pub mod text;
pub mod types;

pub use actions::{InputType, Key, KeyCombo, KeydownResult, Modifiers, Shortcut};
pub use coalesce::{EditRecorder, classify};
pub use error::HighlightError;
pub use focus::{FocusRestore, Modality, focus_restore};
pub use highlight::{
    DEFAULT_TAG, Highlight, HighlightRule, PLACEHOLDER_BASE, Pattern, ReplaceFn, TransformFn,
    perform_highlight,
};
pub use history::{EditSource, History, HistoryEntry, HistoryUpdate};
pub use platform::{PlatformError, SelectionPlatform};
pub use selection::{NodePoint, RangePoints, locate_range, resolve_offsets, span_all};
pub use smol_str::SmolStr;
pub use text::{escape_html, html_to_render, utf16_len, value_from_text};
pub use types::{Collapse, InputNotice, Offsets, SelectOffsets, SelectOptions};
pub use regex;
