//! Registration of the `<highlightable-input>` custom element.
//!
//! The element carries no behavior of its own. Registering it as
//! form-associated lets it participate in forms and labels; the controller
//! does the rest.

use std::cell::OnceCell;

use wasm_bindgen::prelude::*;

/// Tag name of the custom element.
pub const ELEMENT_NAME: &str = "highlightable-input";

// Classes extending `HTMLElement` can only be declared in JS.
#[wasm_bindgen(inline_js = r#"
export function define_form_associated(name) {
  if (typeof HTMLElement === 'undefined' || typeof customElements === 'undefined') {
    return false;
  }
  if (customElements.get(name) == null) {
    customElements.define(name, class extends HTMLElement {
      static formAssociated = true;
    });
  }
  return true;
}
"#)]
extern "C" {
    #[wasm_bindgen(catch)]
    fn define_form_associated(name: &str) -> Result<bool, JsValue>;
}

thread_local! {
    static REGISTERED: OnceCell<bool> = const { OnceCell::new() };
}

/// Register `<highlightable-input>` once. Returns whether the platform
/// supports custom elements; later calls return the memoized answer.
pub fn ensure_custom_element() -> bool {
    REGISTERED.with(|registered| {
        *registered.get_or_init(|| match define_form_associated(ELEMENT_NAME) {
            Ok(supported) => {
                tracing::debug!(
                    target: "highlightable::element",
                    supported,
                    "custom element registration"
                );
                supported
            }
            Err(e) => {
                tracing::warn!(
                    target: "highlightable::element",
                    "custom element registration failed: {:?}",
                    e
                );
                false
            }
        })
    })
}
