//! Page-wide interaction tracking: how the user last interacted.
//!
//! Focus handlers consult this to tell keyboard focus from a click. One
//! context is shared by every bound surface on the thread; the window
//! listeners live as long as some surface holds it.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use gloo_events::EventListener;
use highlightable_core::{FocusRestore, Modality, SmolStr, focus_restore};
use wasm_bindgen::JsCast;
use web_sys::{Element, Node};

#[derive(Debug, Default, Clone)]
struct InteractionState {
    modality: Option<Modality>,
    last_key: Option<SmolStr>,
    last_clicked: Option<Element>,
}

/// Last interaction modality, key and clicked element.
pub struct InteractionContext {
    state: Rc<RefCell<InteractionState>>,
    _listeners: Vec<EventListener>,
}

thread_local! {
    static SHARED: RefCell<Weak<InteractionContext>> = RefCell::new(Weak::new());
}

impl InteractionContext {
    /// Get the shared context, attaching window listeners if no surface
    /// currently holds it.
    pub fn acquire() -> Rc<Self> {
        SHARED.with(|slot| {
            let existing = slot.borrow().upgrade();
            if let Some(ctx) = existing {
                return ctx;
            }

            let ctx = Rc::new(match web_sys::window() {
                Some(window) => Self::listen(&window),
                None => Self::detached(),
            });
            *slot.borrow_mut() = Rc::downgrade(&ctx);
            tracing::debug!(target: "highlightable::interaction", "attached window listeners");
            ctx
        })
    }

    /// A context fed by `mousedown` and `keydown` on `target`.
    pub fn listen(target: &web_sys::EventTarget) -> Self {
        let state = Rc::new(RefCell::new(InteractionState::default()));

        let mousedown = {
            let state = state.clone();
            EventListener::new(target, "mousedown", move |event| {
                let clicked = event.target().and_then(|t| t.dyn_into::<Element>().ok());
                record_pointer(&state, clicked);
            })
        };
        let keydown = {
            let state = state.clone();
            EventListener::new(target, "keydown", move |event| {
                if let Some(event) = event.dyn_ref::<web_sys::KeyboardEvent>() {
                    record_key(&state, &event.key());
                }
            })
        };

        Self {
            state,
            _listeners: vec![mousedown, keydown],
        }
    }

    /// A context with no listeners, updated only through `record_*`.
    pub fn detached() -> Self {
        Self {
            state: Rc::new(RefCell::new(InteractionState::default())),
            _listeners: Vec::new(),
        }
    }

    pub fn record_pointer(&self, clicked: Option<Element>) {
        record_pointer(&self.state, clicked);
    }

    pub fn record_key(&self, key: &str) {
        record_key(&self.state, key);
    }

    pub fn modality(&self) -> Option<Modality> {
        self.state.borrow().modality
    }

    pub fn last_key(&self) -> Option<SmolStr> {
        self.state.borrow().last_key.clone()
    }

    /// Whether the last click landed inside `el`.
    pub fn clicked_inside(&self, el: &Node) -> bool {
        let state = self.state.borrow();
        state
            .last_clicked
            .as_ref()
            .is_some_and(|clicked| el.contains(Some(clicked.unchecked_ref::<Node>())))
    }

    /// How to restore the selection when `el` gains focus.
    pub fn focus_restore(&self, el: &Node, multi_line: bool) -> FocusRestore {
        let clicked_inside = self.clicked_inside(el);
        let state = self.state.borrow();
        focus_restore(
            state.modality,
            state.last_key.as_deref(),
            clicked_inside,
            multi_line,
        )
    }
}

impl std::fmt::Debug for InteractionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InteractionContext")
            .field("state", &self.state.borrow())
            .field("listening", &!self._listeners.is_empty())
            .finish()
    }
}

fn record_pointer(state: &RefCell<InteractionState>, clicked: Option<Element>) {
    let mut state = state.borrow_mut();
    state.modality = Some(Modality::Pointer);
    state.last_key = None;
    state.last_clicked = clicked;
}

fn record_key(state: &RefCell<InteractionState>, key: &str) {
    let mut state = state.borrow_mut();
    state.modality = Some(Modality::Keyboard);
    state.last_key = Some(key.into());
    state.last_clicked = None;
}
