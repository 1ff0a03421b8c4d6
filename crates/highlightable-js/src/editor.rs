//! `setup` and the handle returned to JavaScript.

use highlightable_browser::{HighlightableInput, SelectOptions};
use wasm_bindgen::prelude::*;
use web_sys::HtmlElement;

use crate::options::parse_options;
use crate::types::{OffsetsJs, SelectOffsetsJs, SelectOptionsJs};

/// Bind highlighting to `el`.
///
/// Throws when `options` is malformed or a pattern does not compile.
#[wasm_bindgen]
pub fn setup(el: HtmlElement, options: JsValue) -> Result<HighlightableInputHandle, JsError> {
    let options = parse_options(&options)?;
    Ok(HighlightableInputHandle {
        inner: HighlightableInput::setup(el, options),
    })
}

/// A highlightable input bound to one element.
#[wasm_bindgen]
pub struct HighlightableInputHandle {
    inner: HighlightableInput,
}

#[wasm_bindgen]
impl HighlightableInputHandle {
    #[wasm_bindgen(js_name = getValue)]
    pub fn get_value(&self) -> String {
        self.inner.get_value()
    }

    /// Returns `false` when the value is unchanged.
    #[wasm_bindgen(js_name = setValue)]
    pub fn set_value(&self, value: String) -> bool {
        self.inner.set_value(value)
    }

    #[wasm_bindgen(js_name = getSelection)]
    pub fn get_selection(&self) -> OffsetsJs {
        self.inner.get_selection().into()
    }

    #[wasm_bindgen(js_name = setSelection)]
    pub fn set_selection(&self, offsets: SelectOffsetsJs, options: Option<SelectOptionsJs>) {
        let Some(offsets) = offsets.into_offsets() else {
            return;
        };
        let options = options.map(SelectOptions::from).unwrap_or_default();
        self.inner.set_selection(offsets, options);
    }

    /// Render `value` without touching the element.
    #[wasm_bindgen(js_name = valueToRawHTML)]
    pub fn value_to_raw_html(&self, value: &str) -> String {
        self.inner.value_to_raw_html(value)
    }

    pub fn undo(&self) -> bool {
        self.inner.undo()
    }

    pub fn redo(&self) -> bool {
        self.inner.redo()
    }

    pub fn dispose(&self) {
        self.inner.dispose();
    }

    /// Re-read the element attributes and rebind.
    pub fn refresh(&self) {
        self.inner.refresh();
    }
}
