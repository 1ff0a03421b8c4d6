//! Browser event extraction.
//!
//! Converts DOM events into the platform-agnostic input types and key
//! combinations from `highlightable_core`.

use highlightable_core::{InputType, Key, KeyCombo, Modifiers};

/// Get input type from an `input` or `beforeinput` event.
pub fn get_input_type_from_event(event: &web_sys::InputEvent) -> InputType {
    InputType::parse(&event.input_type())
}

/// Get the inserted text carried by an input event, if any.
pub fn get_data_from_event(event: &web_sys::InputEvent) -> Option<String> {
    event.data()
}

/// Key combination pressed in a keydown event.
pub fn key_combo_from_event(event: &web_sys::KeyboardEvent) -> KeyCombo {
    KeyCombo::with_modifiers(
        Key::from_key_value(&event.key()),
        Modifiers {
            ctrl: event.ctrl_key(),
            alt: event.alt_key(),
            shift: event.shift_key(),
            meta: event.meta_key(),
        },
    )
}

/// Plain text carried by a paste event.
///
/// Returns `None` when the event has no clipboard data or the data holds no
/// text, e.g. an image-only clipboard.
pub fn clipboard_text(event: &web_sys::ClipboardEvent) -> Option<String> {
    let data = event.clipboard_data()?;
    match data.get_data("text") {
        Ok(text) => Some(text).filter(|text| !text.is_empty()),
        Err(e) => {
            tracing::warn!(target: "highlightable::events", "clipboard read failed: {:?}", e);
            None
        }
    }
}

/// Insert text at the selection through the editing command, so the browser
/// records it as a normal `insertText` edit.
pub fn insert_text_command(document: &web_sys::Document, text: &str) -> bool {
    use wasm_bindgen::JsCast;

    let Some(html_document) = document.dyn_ref::<web_sys::HtmlDocument>() else {
        tracing::warn!(target: "highlightable::events", "document is not an HTML document");
        return false;
    };
    match html_document.exec_command_with_show_ui_and_value("insertText", false, text) {
        Ok(applied) => applied,
        Err(e) => {
            tracing::warn!(target: "highlightable::events", "insertText command failed: {:?}", e);
            false
        }
    }
}
