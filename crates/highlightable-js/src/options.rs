//! Conversion of the JS `setup` options object into `SetupOptions`.
//!
//! ```ts
//! interface HighlightRule {
//!   pattern: RegExp | string
//!   class?: string
//!   tagName?: string
//!   style?: string
//!   replacer?: string | ((match: string, ...groups: string[]) => string)
//! }
//!
//! interface SetupOptions {
//!   defaultValue?: string
//!   highlight: HighlightRule | HighlightRule[] | ((value: string) => string)
//!   patch?: (el: HTMLElement, html: string) => void
//!   onInput?: (event: { value: string; position: number }) => void
//! }
//! ```

use highlightable_browser::{Patch, SetupOptions};
use highlightable_core::regex::Captures;
use highlightable_core::{Highlight, HighlightError, HighlightRule, Pattern, escape_html};
use js_sys::{Array, Function, Reflect, RegExp};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use crate::types::InputNoticeJs;

/// Why a `setup` options object was rejected.
#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    #[error("options must be an object")]
    NotAnObject,
    #[error("`highlight` is required")]
    MissingHighlight,
    #[error("`{0}` has the wrong type, expected {1}")]
    WrongType(&'static str, &'static str),
    #[error("reading `{0}` failed: {1}")]
    Read(&'static str, String),
    #[error(transparent)]
    Pattern(#[from] HighlightError),
}

/// Build `SetupOptions` from the JS options object.
pub fn parse_options(options: &JsValue) -> Result<SetupOptions, SetupError> {
    if !options.is_object() {
        return Err(SetupError::NotAnObject);
    }

    let highlight = get(options, "highlight")?.ok_or(SetupError::MissingHighlight)?;
    let mut setup = SetupOptions::new(parse_highlight(&highlight)?);

    if let Some(value) = get(options, "defaultValue")? {
        let value = value
            .as_string()
            .ok_or(SetupError::WrongType("defaultValue", "a string"))?;
        setup = setup.default_value(value);
    }

    if let Some(patch) = get(options, "patch")? {
        let patch = function(patch, "patch")?;
        setup = setup.patch(Patch::custom(move |el, html| {
            if let Err(e) = patch.call2(&JsValue::NULL, el, &JsValue::from_str(html)) {
                tracing::error!(target: "highlightable::js", "patch threw: {:?}", e);
            }
        }));
    }

    if let Some(on_input) = get(options, "onInput")? {
        let on_input = function(on_input, "onInput")?;
        setup = setup.on_input(move |notice| {
            let payload = match serde_wasm_bindgen::to_value(&InputNoticeJs::from(notice)) {
                Ok(payload) => payload,
                Err(e) => {
                    tracing::error!(target: "highlightable::js", "serializing input notice failed: {}", e);
                    return;
                }
            };
            if let Err(e) = on_input.call1(&JsValue::NULL, &payload) {
                tracing::error!(target: "highlightable::js", "onInput threw: {:?}", e);
            }
        });
    }

    Ok(setup)
}

fn parse_highlight(value: &JsValue) -> Result<Highlight, SetupError> {
    if let Some(transform) = value.dyn_ref::<Function>() {
        let transform = transform.clone();
        return Ok(Highlight::custom(move |text| {
            match transform.call1(&JsValue::NULL, &JsValue::from_str(text)) {
                Ok(html) => html.as_string().unwrap_or_else(|| {
                    tracing::warn!(target: "highlightable::js", "highlight returned a non-string");
                    escape_html(text)
                }),
                Err(e) => {
                    tracing::error!(target: "highlightable::js", "highlight threw: {:?}", e);
                    escape_html(text)
                }
            }
        }));
    }

    if Array::is_array(value) {
        let rules = Array::from(value)
            .iter()
            .map(|rule| parse_rule(&rule))
            .collect::<Result<Vec<_>, _>>()?;
        return Ok(Highlight::Rules(rules));
    }

    Ok(parse_rule(value)?.into())
}

fn parse_rule(value: &JsValue) -> Result<HighlightRule, SetupError> {
    if !value.is_object() {
        return Err(SetupError::WrongType("highlight", "a rule, an array of rules or a function"));
    }

    let pattern = get(value, "pattern")?.ok_or(SetupError::WrongType("pattern", "a RegExp or a string"))?;
    let pattern = if let Some(re) = pattern.dyn_ref::<RegExp>() {
        Pattern::with_flags(&String::from(re.source()), &String::from(re.flags()))?
    } else if let Some(literal) = pattern.as_string() {
        Pattern::literal(&literal)?
    } else {
        return Err(SetupError::WrongType("pattern", "a RegExp or a string"));
    };

    let mut rule = HighlightRule::new(pattern);
    if let Some(class) = string(value, "class")? {
        rule = rule.class(class);
    }
    if let Some(tag_name) = string(value, "tagName")? {
        rule = rule.tag_name(tag_name);
    }
    if let Some(style) = string(value, "style")? {
        rule = rule.style(style);
    }

    if let Some(replacer) = get(value, "replacer")? {
        rule = if let Some(template) = replacer.as_string() {
            let template = template.replace("$&", "${0}");
            rule.replacer(move |caps| {
                let mut out = String::new();
                caps.expand(&template, &mut out);
                out
            })
        } else {
            let replacer = function(replacer, "replacer")?;
            rule.replacer(move |caps| call_replacer(&replacer, caps))
        };
    }

    Ok(rule)
}

/// Call a JS replacer as `String.prototype.replace` would: the match, then
/// each group (`undefined` when it did not participate).
fn call_replacer(replacer: &Function, caps: &Captures<'_>) -> String {
    let args = Array::new();
    for group in caps.iter() {
        match group {
            Some(m) => args.push(&JsValue::from_str(m.as_str())),
            None => args.push(&JsValue::UNDEFINED),
        };
    }

    match replacer.apply(&JsValue::NULL, &args) {
        Ok(markup) => markup.as_string().unwrap_or_else(|| {
            tracing::warn!(target: "highlightable::js", "replacer returned a non-string");
            caps[0].to_string()
        }),
        Err(e) => {
            tracing::error!(target: "highlightable::js", "replacer threw: {:?}", e);
            caps[0].to_string()
        }
    }
}

/// Property `key` of `obj`, with `undefined` and `null` as `None`.
fn get(obj: &JsValue, key: &'static str) -> Result<Option<JsValue>, SetupError> {
    let value =
        Reflect::get(obj, &JsValue::from_str(key)).map_err(|e| SetupError::Read(key, format!("{:?}", e)))?;
    if value.is_undefined() || value.is_null() {
        Ok(None)
    } else {
        Ok(Some(value))
    }
}

fn string(obj: &JsValue, key: &'static str) -> Result<Option<String>, SetupError> {
    get(obj, key)?
        .map(|value| value.as_string().ok_or(SetupError::WrongType(key, "a string")))
        .transpose()
}

fn function(value: JsValue, key: &'static str) -> Result<Function, SetupError> {
    value
        .dyn_into::<Function>()
        .map_err(|_| SetupError::WrongType(key, "a function"))
}
