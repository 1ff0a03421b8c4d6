//! The highlightable input controller.
//!
//! Binds an element to a highlight configuration: every content change
//! re-renders the highlighted HTML, restores the caret, and feeds the
//! coalescing undo history. State lives in an `Rc<RefCell<_>>` shared with
//! the event listeners; no borrow is held while calling back into the page
//! (caller callbacks, `insertText`), since those can re-enter the handlers.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use gloo_events::{EventListener, EventListenerOptions};
use highlightable_core::{
    EditRecorder, FocusRestore, Highlight, HistoryEntry, InputNotice, InputType, KeydownResult,
    Offsets, SelectOffsets, SelectOptions, SelectionPlatform, Shortcut, html_to_render,
    perform_highlight,
};
use wasm_bindgen::JsCast;
use web_sys::{Event, HtmlElement};

use crate::cursor::{DomSelection, is_active};
use crate::dom_sync::{
    ElementConfig, Patch, prepare_element, restore_resizing, set_content_editable,
    value_from_element,
};
use crate::element::ensure_custom_element;
use crate::events::{
    clipboard_text, get_data_from_event, get_input_type_from_event, insert_text_command,
    key_combo_from_event,
};
use crate::interaction::InteractionContext;
use crate::platform::Capabilities;

/// Callback notified after user edits and history steps.
pub type InputCallback = Rc<dyn Fn(&InputNotice)>;

/// Configuration for [`HighlightableInput::setup`].
#[derive(Clone)]
pub struct SetupOptions {
    default_value: Option<String>,
    highlight: Highlight,
    patch: Patch,
    on_input: Option<InputCallback>,
    interaction: Option<Rc<InteractionContext>>,
    capabilities: Option<Rc<Capabilities>>,
}

impl SetupOptions {
    pub fn new(highlight: impl Into<Highlight>) -> Self {
        Self {
            default_value: None,
            highlight: highlight.into(),
            patch: Patch::Replace,
            on_input: None,
            interaction: None,
            capabilities: None,
        }
    }

    /// Initial value. Defaults to the element's rendered text.
    pub fn default_value(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    pub fn patch(mut self, patch: Patch) -> Self {
        self.patch = patch;
        self
    }

    pub fn on_input(mut self, callback: impl Fn(&InputNotice) + 'static) -> Self {
        self.on_input = Some(Rc::new(callback));
        self
    }

    /// Use this interaction context instead of the shared one.
    pub fn interaction(mut self, interaction: Rc<InteractionContext>) -> Self {
        self.interaction = Some(interaction);
        self
    }

    /// Use these capabilities instead of the detected ones.
    pub fn capabilities(mut self, capabilities: Rc<Capabilities>) -> Self {
        self.capabilities = Some(capabilities);
        self
    }
}

impl fmt::Debug for SetupOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SetupOptions")
            .field("default_value", &self.default_value)
            .field("highlight", &self.highlight)
            .field("patch", &self.patch)
            .field("on_input", &self.on_input.as_ref().map(|_| "<fn>"))
            .finish_non_exhaustive()
    }
}

struct EditorState {
    el: HtmlElement,
    dom: DomSelection,
    highlight: Highlight,
    patch: Patch,
    on_input: Option<InputCallback>,
    capabilities: Rc<Capabilities>,
    injected_interaction: Option<Rc<InteractionContext>>,
    interaction: Option<Rc<InteractionContext>>,
    config: ElementConfig,
    text: String,
    html: String,
    /// Selection cached on blur, for browsers that drop it.
    cached_selection: Offsets,
    recorder: EditRecorder,
}

type SharedState = Rc<RefCell<EditorState>>;

/// A bound highlightable input.
///
/// Listeners stay attached until [`dispose`](Self::dispose) or drop.
pub struct HighlightableInput {
    state: SharedState,
    listeners: RefCell<Vec<EventListener>>,
}

impl HighlightableInput {
    /// Bind `el` and render its initial value.
    pub fn setup(el: HtmlElement, options: SetupOptions) -> Self {
        ensure_custom_element();

        let SetupOptions {
            default_value,
            highlight,
            patch,
            on_input,
            interaction,
            capabilities,
        } = options;

        let config = ElementConfig::read(&el);
        let initial = default_value
            .clone()
            .unwrap_or_else(|| value_from_element(&el, config.multi_line));

        let state = Rc::new(RefCell::new(EditorState {
            dom: DomSelection::new(el.clone()),
            el,
            highlight,
            patch,
            on_input,
            capabilities: capabilities.unwrap_or_else(Capabilities::detected),
            injected_interaction: interaction,
            interaction: None,
            config,
            text: String::new(),
            html: String::new(),
            cached_selection: Offsets::default(),
            recorder: EditRecorder::new(initial),
        }));

        let input = Self {
            state,
            listeners: RefCell::new(Vec::new()),
        };
        input.bind(default_value);
        input
    }

    fn bind(&self, default_value: Option<String>) {
        let (el, config) = {
            let mut s = self.state.borrow_mut();
            s.config = ElementConfig::read(&s.el);
            s.text.clear();
            s.html.clear();
            (s.el.clone(), s.config)
        };

        update_html(&self.state, false, default_value);

        if let Err(e) = prepare_element(&el, &config) {
            tracing::warn!(target: "highlightable::editor", "failed to prepare element: {e}");
        }

        let fix_paste = {
            let mut s = self.state.borrow_mut();
            let interaction = s
                .injected_interaction
                .clone()
                .unwrap_or_else(InteractionContext::acquire);
            s.interaction = Some(interaction);
            !s.capabilities.supports_plain_text_paste()
        };

        let mut listeners = vec![
            listen(&el, "keydown", &self.state, |state, event| {
                if let Some(event) = event.dyn_ref::<web_sys::KeyboardEvent>() {
                    if handle_keydown(state, event) == KeydownResult::Handled {
                        event.prevent_default();
                    }
                }
            }),
            listen(&el, "beforeinput", &self.state, |state, event| {
                if let Some(event) = event.dyn_ref::<web_sys::InputEvent>() {
                    handle_beforeinput(state, event);
                }
            }),
            listen(&el, "compositionstart", &self.state, |state, _| {
                handle_composition_start(state)
            }),
            listen(&el, "compositionend", &self.state, |state, _| {
                handle_composition_end(state)
            }),
            listen(&el, "input", &self.state, |state, event| {
                handle_input(state, event.dyn_ref::<web_sys::InputEvent>())
            }),
            listen(&el, "focus", &self.state, |state, _| handle_focus(state)),
            listen(&el, "blur", &self.state, |state, _| handle_blur(state)),
            listen(&el, "dblclick", &self.state, |state, _| {
                let el = state.borrow().el.clone();
                if let Err(e) = restore_resizing(&el) {
                    tracing::warn!(target: "highlightable::editor", "restore resizing failed: {e}");
                }
            }),
        ];

        if fix_paste {
            listeners.push(listen(&el, "paste", &self.state, |state, event| {
                if let Some(event) = event.dyn_ref::<web_sys::ClipboardEvent>() {
                    handle_paste(state, event);
                }
            }));
        }

        tracing::debug!(
            target: "highlightable::editor",
            multi_line = config.multi_line,
            read_only = config.read_only,
            disabled = config.disabled,
            fix_paste,
            "bound"
        );
        *self.listeners.borrow_mut() = listeners;
    }

    /// Current plain-text value.
    pub fn get_value(&self) -> String {
        self.state.borrow().text.clone()
    }

    /// Replace the value. Returns `false` when it is unchanged.
    ///
    /// Programmatic changes neither notify `on_input` nor enter the history.
    pub fn set_value(&self, value: impl Into<String>) -> bool {
        let value = value.into();
        if self.state.borrow().text == value {
            return false;
        }
        update_html(&self.state, false, Some(value));
        true
    }

    pub fn get_selection(&self) -> Offsets {
        let dom = self.state.borrow().dom.clone();
        dom.selection()
    }

    pub fn set_selection(&self, offsets: impl Into<SelectOffsets>, options: SelectOptions) {
        let dom = self.state.borrow().dom.clone();
        dom.select(offsets.into(), options);
    }

    /// Highlighted HTML for `value`, without touching the element.
    pub fn value_to_raw_html(&self, value: &str) -> String {
        let highlight = self.state.borrow().highlight.clone();
        perform_highlight(value, &highlight)
    }

    /// Step back in history. Returns whether there was an entry to restore.
    pub fn undo(&self) -> bool {
        step_history(&self.state, Step::Undo)
    }

    /// Step forward in history. Returns whether there was an entry to restore.
    pub fn redo(&self) -> bool {
        step_history(&self.state, Step::Redo)
    }

    /// Detach listeners and release the interaction context. Safe to call
    /// more than once.
    pub fn dispose(&self) {
        let listeners = std::mem::take(&mut *self.listeners.borrow_mut());
        if listeners.is_empty() {
            return;
        }
        drop(listeners);

        let mut s = self.state.borrow_mut();
        s.interaction = None;
        s.text.clear();
        s.html.clear();
        tracing::debug!(target: "highlightable::editor", "disposed");
    }

    /// Dispose, then bind again, picking up changed attributes.
    pub fn refresh(&self) {
        self.dispose();
        self.bind(None);
    }

    pub fn element(&self) -> HtmlElement {
        self.state.borrow().el.clone()
    }

    pub fn is_bound(&self) -> bool {
        !self.listeners.borrow().is_empty()
    }
}

impl fmt::Debug for HighlightableInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.state.borrow();
        f.debug_struct("HighlightableInput")
            .field("text", &s.text)
            .field("config", &s.config)
            .field("bound", &self.is_bound())
            .finish_non_exhaustive()
    }
}

fn listen(
    el: &HtmlElement,
    event_type: &'static str,
    state: &SharedState,
    handler: impl Fn(&SharedState, &Event) + 'static,
) -> EventListener {
    let state = state.clone();
    EventListener::new_with_options(
        el,
        event_type,
        EventListenerOptions::enable_prevent_default(),
        move |event| handler(&state, event),
    )
}

/// Re-derive the value (or take `value`), render it, and put the caret back.
///
/// Returns the notice to send when the change came from the user.
fn update_html(state: &SharedState, from_user: bool, value: Option<String>) -> Option<InputNotice> {
    let (el, dom, highlight, patch, multi_line) = {
        let s = state.borrow();
        (
            s.el.clone(),
            s.dom.clone(),
            s.highlight.clone(),
            s.patch.clone(),
            s.config.multi_line,
        )
    };

    let text = value.unwrap_or_else(|| value_from_element(&el, multi_line));
    let html = perform_highlight(&text, &highlight);
    let rendered = html_to_render(html.clone(), multi_line);

    let offsets = if is_focused(&el) {
        dom.selection()
    } else {
        Offsets::default()
    };

    {
        let mut s = state.borrow_mut();
        s.text = text;
        s.html = html;
    }

    patch.apply(&el, &rendered);
    dom.select(offsets.into(), SelectOptions::default());

    tracing::trace!(
        target: "highlightable::editor",
        from_user,
        caret = offsets.end,
        "rendered"
    );

    from_user.then(|| InputNotice {
        value: state.borrow().text.clone(),
        position: offsets.end,
    })
}

fn notify(state: &SharedState, notice: Option<InputNotice>) {
    let Some(notice) = notice else {
        return;
    };
    let callback = state.borrow().on_input.clone();
    if let Some(callback) = callback {
        callback(&notice);
    }
}

/// Record the edit just rendered into history.
fn record(state: &SharedState, input_type: Option<&InputType>, data: Option<&str>) {
    let dom = state.borrow().dom.clone();
    let offsets = dom.selection();
    let mut s = state.borrow_mut();
    let value = s.text.clone();
    s.recorder.record(input_type, data, value, offsets);
}

#[derive(Debug, Clone, Copy)]
enum Step {
    Undo,
    Redo,
}

fn step_history(state: &SharedState, step: Step) -> bool {
    let entry = {
        let mut s = state.borrow_mut();
        match step {
            Step::Undo => s.recorder.undo().cloned(),
            Step::Redo => s.recorder.redo().cloned(),
        }
    };
    match entry {
        Some(entry) => {
            tracing::debug!(target: "highlightable::editor", ?step, "history step");
            sync_history(state, entry);
            true
        }
        None => false,
    }
}

/// Show a history entry: render its value, select its offsets, notify.
fn sync_history(state: &SharedState, entry: HistoryEntry) {
    let HistoryEntry { value, offsets, .. } = entry;
    update_html(state, false, Some(value));

    let dom = state.borrow().dom.clone();
    dom.select(offsets.into(), SelectOptions::forced());

    let value = state.borrow().text.clone();
    notify(
        state,
        Some(InputNotice {
            value,
            position: offsets.start,
        }),
    );
}

fn handle_keydown(state: &SharedState, event: &web_sys::KeyboardEvent) -> KeydownResult {
    let (is_mac, read_only, dom) = {
        let s = state.borrow();
        (s.capabilities.is_mac(), s.config.read_only, s.dom.clone())
    };

    match key_combo_from_event(event).shortcut(is_mac) {
        Some(Shortcut::SelectAll) if read_only => {
            dom.select(SelectOffsets::All, SelectOptions::default());
            KeydownResult::Handled
        }
        Some(Shortcut::Undo) => {
            step_history(state, Step::Undo);
            KeydownResult::Handled
        }
        Some(Shortcut::Redo) => {
            step_history(state, Step::Redo);
            KeydownResult::Handled
        }
        _ => KeydownResult::NotHandled,
    }
}

fn handle_beforeinput(state: &SharedState, event: &web_sys::InputEvent) {
    let input_type = get_input_type_from_event(event);
    let (multi_line, composing, dom) = {
        let s = state.borrow();
        (s.config.multi_line, s.recorder.is_composing(), s.dom.clone())
    };

    if !multi_line && input_type.is_line_break() {
        event.prevent_default();
        return;
    }
    if composing {
        return;
    }

    match input_type {
        InputType::HistoryUndo => {
            step_history(state, Step::Undo);
            event.prevent_default();
        }
        InputType::HistoryRedo => {
            step_history(state, Step::Redo);
            event.prevent_default();
        }
        _ => {
            let selection = dom.selection();
            state.borrow_mut().recorder.before_input(selection);
        }
    }
}

fn handle_composition_start(state: &SharedState) {
    let dom = state.borrow().dom.clone();
    let selection = dom.selection();
    let mut s = state.borrow_mut();
    s.recorder.before_input(selection);
    s.recorder.set_composing(true);
}

fn handle_composition_end(state: &SharedState) {
    let firefox = {
        let mut s = state.borrow_mut();
        s.recorder.set_composing(false);
        s.capabilities.is_firefox()
    };

    // Firefox fires the committing `input` after `compositionend`.
    if !firefox {
        let notice = update_html(state, true, None);
        record(state, None, None);
        notify(state, notice);
    }
}

fn handle_input(state: &SharedState, event: Option<&web_sys::InputEvent>) {
    if state.borrow().recorder.is_composing() {
        return;
    }

    let input_type = event.map(get_input_type_from_event);
    let data = event.and_then(get_data_from_event);

    let notice = update_html(state, true, None);
    record(state, input_type.as_ref(), data.as_deref());
    notify(state, notice);
}

fn handle_paste(state: &SharedState, event: &web_sys::ClipboardEvent) {
    let Some(text) = clipboard_text(event) else {
        return;
    };
    event.prevent_default();

    let el = state.borrow().el.clone();
    let Some(document) = el.owner_document() else {
        return;
    };
    // Fires `beforeinput` and `input` synchronously.
    insert_text_command(&document, &text);

    let dom = state.borrow().dom.clone();
    let position = dom.selection().end;
    let value = state.borrow().text.clone();
    notify(state, Some(InputNotice { value, position }));
}

fn handle_focus(state: &SharedState) {
    let (el, dom, config, cached, interaction) = {
        let s = state.borrow();
        (
            s.el.clone(),
            s.dom.clone(),
            s.config,
            s.cached_selection,
            s.interaction.clone(),
        )
    };

    if !config.read_only {
        if let Err(e) = set_content_editable(&el, true) {
            tracing::warn!(target: "highlightable::editor", "failed to enable editing: {e}");
        }
    }

    let restore = match &interaction {
        Some(interaction) => interaction.focus_restore(el.as_ref(), config.multi_line),
        None => FocusRestore::Cached,
    };
    tracing::debug!(target: "highlightable::editor", ?restore, "focus");

    match restore {
        FocusRestore::SelectAll => dom.select(SelectOffsets::All, SelectOptions::default()),
        FocusRestore::Cached => dom.select(cached.into(), SelectOptions::default()),
        FocusRestore::Native => {}
    }
}

fn handle_blur(state: &SharedState) {
    let (el, dom, chrome) = {
        let s = state.borrow();
        (s.el.clone(), s.dom.clone(), s.capabilities.is_chrome())
    };

    if chrome {
        let selection = dom.selection();
        state.borrow_mut().cached_selection = selection;
    }
    if let Err(e) = set_content_editable(&el, false) {
        tracing::warn!(target: "highlightable::editor", "failed to disable editing: {e}");
    }
    el.set_scroll_left(0);
}

fn is_focused(el: &HtmlElement) -> bool {
    el.owner_document()
        .is_some_and(|document| is_active(el, &document))
}
