//! Plain-text helpers: UTF-16 lengths, value extraction, and line-ending projection.

/// Length of `text` in UTF-16 code units, the unit of every offset in this crate.
pub fn utf16_len(text: &str) -> usize {
    text.encode_utf16().count()
}

/// Derive the user-visible value from the text the browser rendered.
///
/// Single-line surfaces turn every line break (`\n` or `\r\n`) into a space.
/// Multi-line surfaces drop exactly one trailing `\n`, the one appended by
/// [`html_to_render`] so the last line stays visible.
pub fn value_from_text(rendered: &str, multi_line: bool) -> String {
    if multi_line {
        rendered
            .strip_suffix('\n')
            .unwrap_or(rendered)
            .to_string()
    } else {
        let mut value = String::with_capacity(rendered.len());
        let mut chars = rendered.chars().peekable();
        while let Some(c) = chars.next() {
            match c {
                '\r' if chars.peek() == Some(&'\n') => {
                    chars.next();
                    value.push(' ');
                }
                '\n' => value.push(' '),
                other => value.push(other),
            }
        }
        value
    }
}

/// Project highlighted HTML into what gets installed in the DOM.
///
/// A non-empty multi-line rendering gets one trailing line break, otherwise a
/// trailing empty line would collapse and the caret could not reach it.
pub fn html_to_render(html: String, multi_line: bool) -> String {
    if !multi_line || html.is_empty() {
        html
    } else {
        let mut html = html;
        html.push('\n');
        html
    }
}

/// Escape the characters that would otherwise be parsed as markup.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    push_escaped(&mut escaped, text);
    escaped
}

pub(crate) fn push_escaped(out: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            other => out.push(other),
        }
    }
}
