//! WASM bindings for the highlightable input.
//!
//! Exposes `setup(el, options)` to JavaScript/TypeScript apps and returns a
//! handle over the bound element.

mod editor;
mod options;
mod types;

pub use editor::*;
pub use options::SetupError;
pub use types::*;

use wasm_bindgen::prelude::*;

/// Install the panic hook and console tracing, then register the custom
/// element.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();

    use tracing::Level;
    use tracing::subscriber::set_global_default;
    use tracing_subscriber::Registry;
    use tracing_subscriber::layer::SubscriberExt;

    let console_level = if cfg!(debug_assertions) {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let wasm_layer = tracing_wasm::WASMLayer::new(
        tracing_wasm::WASMLayerConfigBuilder::new()
            .set_max_level(console_level)
            .build(),
    );

    let _ = set_global_default(Registry::default().with(wasm_layer));

    highlightable_browser::ensure_custom_element();
}
