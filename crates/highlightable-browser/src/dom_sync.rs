//! DOM synchronization for the editable surface.
//!
//! Reads the plain-text value back out of the element, installs rendered
//! HTML, and maintains the host element's attribute contract.

use std::fmt;
use std::rc::Rc;

use highlightable_core::{PlatformError, value_from_text};
use web_sys::HtmlElement;

/// Rows shown by a multi-line surface when `data-rows` is absent or invalid.
pub const DEFAULT_ROWS: u32 = 2;

/// Caller-supplied HTML applier.
pub type PatchFn = Rc<dyn Fn(&HtmlElement, &str)>;

/// How rendered HTML is written into the element.
#[derive(Clone, Default)]
pub enum Patch {
    /// Assign `innerHTML`.
    #[default]
    Replace,
    /// Hand the HTML to the caller, e.g. for a DOM diffing library.
    Custom(PatchFn),
}

impl Patch {
    pub fn custom(patch: impl Fn(&HtmlElement, &str) + 'static) -> Self {
        Self::Custom(Rc::new(patch))
    }

    pub fn apply(&self, el: &HtmlElement, html: &str) {
        match self {
            Self::Replace => el.set_inner_html(html),
            Self::Custom(patch) => patch(el, html),
        }
    }
}

impl fmt::Debug for Patch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Replace => f.write_str("Replace"),
            Self::Custom(_) => f.write_str("Custom(<fn>)"),
        }
    }
}

/// The user-visible value of the element.
///
/// Uses `innerText` rather than `textContent`: Firefox only reports the line
/// breaks typed during editing through the former.
pub fn value_from_element(el: &HtmlElement, multi_line: bool) -> String {
    value_from_text(&el.inner_text(), multi_line)
}

/// Structural configuration read from the host element's attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElementConfig {
    pub multi_line: bool,
    pub disabled: bool,
    pub read_only: bool,
    pub rows: u32,
}

impl Default for ElementConfig {
    fn default() -> Self {
        Self {
            multi_line: false,
            disabled: false,
            read_only: false,
            rows: DEFAULT_ROWS,
        }
    }
}

impl ElementConfig {
    /// Read `aria-multiline`, `aria-disabled`, `aria-readonly` and `data-rows`.
    pub fn read(el: &HtmlElement) -> Self {
        let flag = |name: &str| el.get_attribute(name).as_deref() == Some("true");
        Self {
            multi_line: flag("aria-multiline"),
            disabled: flag("aria-disabled"),
            read_only: flag("aria-readonly"),
            rows: parse_rows(el.get_attribute("data-rows").as_deref()),
        }
    }
}

/// Parse a `data-rows` value: a positive integer with an optional trailing
/// non-numeric suffix, falling back to [`DEFAULT_ROWS`].
pub fn parse_rows(value: Option<&str>) -> u32 {
    let Some(value) = value else {
        return DEFAULT_ROWS;
    };
    let digits: String = value
        .trim_start()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    match digits.parse::<u32>() {
        Ok(rows) if rows > 0 => rows,
        _ => DEFAULT_ROWS,
    }
}

/// Toggle editing. Removes the attribute rather than writing `"false"`,
/// which Safari does not honor.
pub fn set_content_editable(el: &HtmlElement, editable: bool) -> Result<(), PlatformError> {
    if editable {
        el.set_attribute("contenteditable", "true")
            .map_err(|e| format!("set contenteditable failed: {:?}", e))?;
    } else {
        el.remove_attribute("contenteditable")
            .map_err(|e| format!("remove contenteditable failed: {:?}", e))?;
    }
    Ok(())
}

pub fn set_focusable(el: &HtmlElement, focusable: bool) -> Result<(), PlatformError> {
    if focusable {
        el.set_tab_index(0);
    } else {
        el.remove_attribute("tabindex")
            .map_err(|e| format!("remove tabindex failed: {:?}", e))?;
    }
    Ok(())
}

pub fn set_rows(el: &HtmlElement, rows: u32) -> Result<(), PlatformError> {
    el.style()
        .set_property("--rows", &rows.to_string())
        .map_err(|e| format!("set --rows failed: {:?}", e))?;
    Ok(())
}

/// Apply the bound-state attributes: non-editable until focused, focusable
/// unless disabled, `--rows`, and the textbox role.
pub fn prepare_element(el: &HtmlElement, config: &ElementConfig) -> Result<(), PlatformError> {
    set_content_editable(el, false)?;
    set_focusable(el, !config.disabled)?;
    set_rows(el, config.rows)?;
    el.set_attribute("role", "textbox")
        .map_err(|e| format!("set role failed: {:?}", e))?;
    Ok(())
}

/// Drop the inline size left behind by a manual resize.
pub fn restore_resizing(el: &HtmlElement) -> Result<(), PlatformError> {
    let style = el.style();
    for property in ["width", "height"] {
        style
            .remove_property(property)
            .map_err(|e| format!("remove {property} failed: {:?}", e))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rows() {
        assert_eq!(parse_rows(None), DEFAULT_ROWS);
        assert_eq!(parse_rows(Some("5")), 5);
        assert_eq!(parse_rows(Some("3px")), 3);
        assert_eq!(parse_rows(Some("0")), DEFAULT_ROWS);
        assert_eq!(parse_rows(Some("-1")), DEFAULT_ROWS);
        assert_eq!(parse_rows(Some("lots")), DEFAULT_ROWS);
    }
}
