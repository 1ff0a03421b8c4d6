//! Browser capability detection for platform-specific workarounds.
//!
//! Each flag is computed on first use and memoized. A `Capabilities` value is
//! created explicitly and shared by `Rc`; tests can pin flags up front.

use std::cell::OnceCell;
use std::rc::Rc;

/// Lazily detected browser capabilities.
#[derive(Debug, Default)]
pub struct Capabilities {
    firefox: OnceCell<bool>,
    chrome: OnceCell<bool>,
    mac: OnceCell<bool>,
    plain_text_paste: OnceCell<bool>,
}

thread_local! {
    static DETECTED: Rc<Capabilities> = Rc::new(Capabilities::new());
}

impl Capabilities {
    /// Capabilities detected from the running browser.
    pub fn new() -> Self {
        Self::default()
    }

    /// The per-thread detected instance.
    pub fn detected() -> Rc<Self> {
        DETECTED.with(Rc::clone)
    }

    pub fn with_firefox(self, value: bool) -> Self {
        let _ = self.firefox.set(value);
        self
    }

    pub fn with_chrome(self, value: bool) -> Self {
        let _ = self.chrome.set(value);
        self
    }

    pub fn with_mac(self, value: bool) -> Self {
        let _ = self.mac.set(value);
        self
    }

    pub fn with_plain_text_paste(self, value: bool) -> Self {
        let _ = self.plain_text_paste.set(value);
        self
    }

    /// Gecko. Commits compositions on the `input` following `compositionend`.
    pub fn is_firefox(&self) -> bool {
        *self.firefox.get_or_init(|| user_agent().contains("Firefox"))
    }

    /// Chromium and derived browsers, which drop the selection on blur.
    pub fn is_chrome(&self) -> bool {
        *self.chrome.get_or_init(|| user_agent().contains("Chrome"))
    }

    pub fn is_mac(&self) -> bool {
        *self.mac.get_or_init(|| navigator_platform().contains("Mac"))
    }

    /// Whether `-webkit-user-modify: read-write-plaintext-only` is available,
    /// making the browser strip formatting from pastes itself.
    pub fn supports_plain_text_paste(&self) -> bool {
        *self.plain_text_paste.get_or_init(|| {
            web_sys::css::supports_with_value("-webkit-user-modify", "read-write-plaintext-only")
                .unwrap_or(false)
        })
    }
}

fn user_agent() -> String {
    web_sys::window()
        .and_then(|w| w.navigator().user_agent().ok())
        .unwrap_or_default()
}

fn navigator_platform() -> String {
    web_sys::window()
        .and_then(|w| w.navigator().platform().ok())
        .unwrap_or_default()
}
