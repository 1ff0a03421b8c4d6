//! Browser DOM layer for the highlightable input.
//!
//! Binds a contenteditable element to a highlight configuration. Assumes a
//! `wasm32-unknown-unknown` target environment.
//!
//! # Architecture
//!
//! - `cursor`: DOM selection ↔ plain-text offsets
//! - `dom_sync`: value extraction, HTML application, host attributes
//! - `events`: input type, keyboard and clipboard extraction
//! - `editor`: the `HighlightableInput` controller
//! - `interaction`: shared last-interaction tracking for focus handling
//! - `platform`: lazily detected browser capabilities
//! - `element`: `<highlightable-input>` custom element registration
//!
//! # Re-exports
//!
//! This crate re-exports `highlightable-core` for convenience, so consumers
//! only need to depend on `highlightable-browser`.

pub use highlightable_core;
pub use highlightable_core::*;

pub mod cursor;
pub mod dom_sync;
pub mod editor;
pub mod element;
pub mod events;
pub mod interaction;
pub mod platform;

pub use cursor::{DomSelection, get_selection, set_selection};
pub use dom_sync::{ElementConfig, Patch, PatchFn};
pub use editor::{HighlightableInput, InputCallback, SetupOptions};
pub use element::{ELEMENT_NAME, ensure_custom_element};
pub use interaction::InteractionContext;
pub use platform::Capabilities;
