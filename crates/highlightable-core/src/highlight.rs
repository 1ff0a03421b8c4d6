//! Highlight rendering: plain text in, highlighted HTML out.
//!
//! Rules run in order over progressively rewritten text. Each match is swapped
//! for a private-use placeholder character instead of its markup, so a later
//! rule can never match inside markup produced by an earlier one. A single
//! final pass expands the placeholders.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use regex::{Captures, Regex, RegexBuilder};
use smol_str::SmolStr;

use crate::error::HighlightError;
use crate::text::{escape_html, push_escaped};

/// First placeholder code point (Supplementary Private Use Area-A).
pub const PLACEHOLDER_BASE: u32 = 0xF0000;

/// Tag used by the default replacer when a rule names none.
pub const DEFAULT_TAG: &str = "mark";

/// Caller-supplied markup builder: receives the full match and its groups.
pub type ReplaceFn = Rc<dyn Fn(&Captures<'_>) -> String>;

/// Caller-supplied transform replacing the whole rule set.
pub type TransformFn = Rc<dyn Fn(&str) -> String>;

/// A compiled rule pattern.
#[derive(Clone, Debug)]
pub struct Pattern {
    regex: Regex,
    global: bool,
}

impl Pattern {
    /// Compile a regular expression that replaces every match.
    pub fn new(source: &str) -> Result<Self, HighlightError> {
        Self::with_flags(source, "g")
    }

    /// Compile a regular expression with JS-style flags.
    ///
    /// Without `g` only the first match is replaced.
    pub fn with_flags(source: &str, flags: &str) -> Result<Self, HighlightError> {
        let mut builder = RegexBuilder::new(source);
        let mut global = false;

        for flag in flags.chars() {
            match flag {
                'g' => global = true,
                'i' => {
                    builder.case_insensitive(true);
                }
                'm' => {
                    builder.multi_line(true);
                }
                's' => {
                    builder.dot_matches_new_line(true);
                }
                'u' | 'd' => {}
                other => {
                    return Err(HighlightError::UnsupportedFlag {
                        flag: other,
                        flags: flags.to_string(),
                    });
                }
            }
        }

        let regex = builder
            .build()
            .map_err(|cause| HighlightError::InvalidPattern {
                source_text: source.to_string(),
                cause,
            })?;

        Ok(Self { regex, global })
    }

    /// Match `text` literally. Like a JS string pattern, only the first
    /// occurrence is replaced.
    pub fn literal(text: &str) -> Result<Self, HighlightError> {
        Self::with_flags(&regex::escape(text), "")
    }

    /// Wrap an already-compiled regex.
    pub fn from_regex(regex: Regex, global: bool) -> Self {
        Self { regex, global }
    }

    pub fn is_global(&self) -> bool {
        self.global
    }

    pub fn as_regex(&self) -> &Regex {
        &self.regex
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }
}

impl From<Regex> for Pattern {
    fn from(regex: Regex) -> Self {
        Self::from_regex(regex, true)
    }
}

/// One pattern → markup rule.
#[derive(Clone)]
pub struct HighlightRule {
    pub pattern: Pattern,
    pub tag_name: Option<SmolStr>,
    pub class: Option<String>,
    pub style: Option<String>,
    pub replacer: Option<ReplaceFn>,
}

impl fmt::Debug for HighlightRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HighlightRule")
            .field("pattern", &self.pattern.as_str())
            .field("tag_name", &self.tag_name)
            .field("class", &self.class)
            .field("style", &self.style)
            .field("replacer", &self.replacer.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

impl HighlightRule {
    pub fn new(pattern: Pattern) -> Self {
        Self {
            pattern,
            tag_name: None,
            class: None,
            style: None,
            replacer: None,
        }
    }

    pub fn tag_name(mut self, tag_name: impl Into<SmolStr>) -> Self {
        self.tag_name = Some(tag_name.into());
        self
    }

    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }

    pub fn style(mut self, style: impl Into<String>) -> Self {
        self.style = Some(style.into());
        self
    }

    pub fn replacer(mut self, replacer: impl Fn(&Captures<'_>) -> String + 'static) -> Self {
        self.replacer = Some(Rc::new(replacer));
        self
    }

    /// Markup for one match: the caller's replacer, or the default wrapper.
    fn markup(&self, caps: &Captures<'_>) -> String {
        if let Some(replacer) = &self.replacer {
            return replacer(caps);
        }

        let tag = self.tag_name.as_deref().unwrap_or(DEFAULT_TAG);
        let mut markup = String::new();
        markup.push('<');
        markup.push_str(tag);
        if let Some(class) = &self.class {
            markup.push_str(" class=\"");
            push_escaped(&mut markup, class);
            markup.push('"');
        }
        if let Some(style) = &self.style {
            markup.push_str(" style=\"");
            push_escaped(&mut markup, style);
            markup.push('"');
        }
        markup.push('>');
        push_escaped(&mut markup, &caps[0]);
        markup.push_str("</");
        markup.push_str(tag);
        markup.push('>');
        markup
    }
}

/// The highlight configuration: an ordered rule list, or one transform.
#[derive(Clone)]
pub enum Highlight {
    Rules(Vec<HighlightRule>),
    /// Output is used as-is: no placeholder protection, no escaping.
    Custom(TransformFn),
}

impl Highlight {
    pub fn custom(transform: impl Fn(&str) -> String + 'static) -> Self {
        Self::Custom(Rc::new(transform))
    }
}

impl fmt::Debug for Highlight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rules(rules) => f.debug_tuple("Rules").field(rules).finish(),
            Self::Custom(_) => f.write_str("Custom(<fn>)"),
        }
    }
}

impl From<HighlightRule> for Highlight {
    fn from(rule: HighlightRule) -> Self {
        Self::Rules(vec![rule])
    }
}

impl From<Vec<HighlightRule>> for Highlight {
    fn from(rules: Vec<HighlightRule>) -> Self {
        Self::Rules(rules)
    }
}

/// Two-way markup ↔ placeholder table for one render pass.
#[derive(Debug, Default)]
struct Placeholders {
    by_markup: HashMap<String, char>,
    by_key: HashMap<char, String>,
}

impl Placeholders {
    /// Placeholder for `markup`, allocating the next code point on first sight.
    fn key_for(&mut self, markup: String) -> Option<char> {
        if let Some(&key) = self.by_markup.get(&markup) {
            return Some(key);
        }
        let index = u32::try_from(self.by_markup.len()).ok()?;
        let key = char::from_u32(PLACEHOLDER_BASE.checked_add(index)?)?;
        self.by_key.insert(key, markup.clone());
        self.by_markup.insert(markup, key);
        Some(key)
    }

    fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }

    /// Escape plain text and expand placeholders, including ones nested in
    /// markup built from text that already held placeholders.
    ///
    /// Nested markup can only refer to keys allocated before its own, so
    /// inside the markup for `below` only lower keys expand. Anything else in
    /// the placeholder range came from the input and is kept as is.
    fn expand_into(&self, out: &mut String, text: &str, below: Option<char>) {
        for c in text.chars() {
            match self.by_key.get(&c) {
                Some(markup) if below.is_none_or(|limit| c < limit) => {
                    self.expand_into(out, markup, Some(c))
                }
                _ if below.is_none() => push_escaped(out, c.encode_utf8(&mut [0; 4])),
                _ => out.push(c),
            }
        }
    }
}

/// Render `text` to highlighted HTML.
///
/// This does not append the multi-line trailing break; see
/// [`crate::text::html_to_render`].
pub fn perform_highlight(text: &str, highlight: &Highlight) -> String {
    let rules = match highlight {
        Highlight::Custom(transform) => return transform(text),
        Highlight::Rules(rules) => rules,
    };

    let mut placeholders = Placeholders::default();
    let mut working = text.to_string();

    for rule in rules {
        let mut substitute = |caps: &Captures<'_>| {
            let markup = rule.markup(caps);
            match placeholders.key_for(markup.clone()) {
                Some(key) => key.to_string(),
                None => {
                    tracing::warn!(
                        target: "highlightable::highlight",
                        "placeholder range exhausted, inlining markup"
                    );
                    markup
                }
            }
        };

        let regex = rule.pattern.as_regex();
        let replaced = if rule.pattern.is_global() {
            regex.replace_all(&working, &mut substitute)
        } else {
            regex.replace(&working, &mut substitute)
        };
        working = replaced.into_owned();
    }

    if placeholders.is_empty() {
        return escape_html(&working);
    }

    tracing::trace!(
        target: "highlightable::highlight",
        distinct_markup = placeholders.by_key.len(),
        "expanding placeholders"
    );

    let mut html = String::with_capacity(working.len() * 2);
    placeholders.expand_into(&mut html, &working, None);
    html
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(pattern: &str) -> HighlightRule {
        HighlightRule::new(Pattern::new(pattern).expect("valid pattern"))
    }

    fn mention_rules() -> Highlight {
        Highlight::Rules(vec![
            rule(r"@[a-z][\da-z_]+").class("mention"),
            rule(r"#[a-z][\da-z_]+").class("hashtag"),
        ])
    }

    #[test]
    fn test_mention_highlighting() {
        let html = perform_highlight("hello @world", &rule("@[a-z]+").class("mention").into());
        insta::assert_snapshot!(html, @r#"hello <mark class="mention">@world</mark>"#);
    }

    #[test]
    fn test_multiple_rules_in_order() {
        let html = perform_highlight("hi @alice see #rust", &mention_rules());
        assert_eq!(
            html,
            r#"hi <mark class="mention">@alice</mark> see <mark class="hashtag">#rust</mark>"#
        );
    }

    #[test]
    fn test_generated_markup_is_not_rematched() {
        // The second rule matches words that appear in the first rule's markup.
        let rules = Highlight::Rules(vec![
            rule("@[a-z]+").class("mention"),
            rule("mark|class|mention").class("keyword"),
        ]);
        let html = perform_highlight("@bob mark", &rules);
        insta::assert_snapshot!(
            html,
            @r#"<mark class="mention">@bob</mark> <mark class="keyword">mark</mark>"#
        );
    }

    #[test]
    fn test_angle_bracket_rule_does_not_touch_markup() {
        let rules = Highlight::Rules(vec![
            rule("[a-z]+").tag_name("b"),
            rule("<|>").class("op"),
        ]);
        let html = perform_highlight("x<y", &rules);
        assert_eq!(
            html,
            r#"<b>x</b><mark class="op">&lt;</mark><b>y</b>"#
        );
    }

    #[test]
    fn test_identical_markup_shares_a_placeholder() {
        let mut table = Placeholders::default();
        let first = table.key_for("<mark>@a</mark>".to_string());
        let second = table.key_for("<mark>@a</mark>".to_string());
        let other = table.key_for("<mark>@b</mark>".to_string());
        assert_eq!(first, second);
        assert_eq!(first, char::from_u32(PLACEHOLDER_BASE));
        assert_eq!(other, char::from_u32(PLACEHOLDER_BASE + 1));

        let html = perform_highlight("@a @a @a", &rule("@[a-z]+").into());
        assert_eq!(html, "<mark>@a</mark> <mark>@a</mark> <mark>@a</mark>");
    }

    #[test]
    fn test_highlight_is_deterministic() {
        let text = "ping @carol and #news, then @carol again";
        let rules = mention_rules();
        assert_eq!(perform_highlight(text, &rules), perform_highlight(text, &rules));
    }

    #[test]
    fn test_no_match_returns_text() {
        assert_eq!(perform_highlight("plain words", &mention_rules()), "plain words");
        assert_eq!(perform_highlight("", &mention_rules()), "");
    }

    #[test]
    fn test_plain_text_is_escaped() {
        let html = perform_highlight("a < b @x", &rule("@[a-z]+").into());
        assert_eq!(html, "a &lt; b <mark>@x</mark>");
        assert_eq!(perform_highlight("<i>", &mention_rules()), "&lt;i&gt;");
    }

    #[test]
    fn test_replacer_receives_groups() {
        let variable = rule(r"\{\{([a-z_]+?)\}\}").replacer(|caps| {
            format!(
                r#"<mark class="variable"><span>{{{{</span>{}<span>}}}}</span></mark>"#,
                &caps[1]
            )
        });
        let html = perform_highlight("Hi {{first_name}}!", &variable.into());
        assert_eq!(
            html,
            r#"Hi <mark class="variable"><span>{{</span>first_name<span>}}</span></mark>!"#
        );
    }

    #[test]
    fn test_tag_and_style_attributes() {
        let html = perform_highlight(
            "red",
            &rule("red")
                .tag_name("span")
                .class("color")
                .style("border-bottom: 2px solid red")
                .into(),
        );
        assert_eq!(
            html,
            r#"<span class="color" style="border-bottom: 2px solid red">red</span>"#
        );
    }

    #[test]
    fn test_match_spanning_earlier_placeholder_expands_nested_markup() {
        let rules = Highlight::Rules(vec![
            rule("@[a-z]+").class("m"),
            rule(r"\(.*\)").class("group"),
        ]);
        let html = perform_highlight("(@ab)", &rules);
        assert_eq!(
            html,
            r#"<mark class="group">(<mark class="m">@ab</mark>)</mark>"#
        );
    }

    #[test]
    fn test_custom_transform_is_unprocessed() {
        let highlight = Highlight::custom(|text| format!("<u>{text}</u>"));
        assert_eq!(perform_highlight("a<b", &highlight), "<u>a<b</u>");
    }

    #[test]
    fn test_pattern_flags() {
        let first_only = HighlightRule::new(Pattern::with_flags("a", "").unwrap());
        assert_eq!(perform_highlight("aaa", &first_only.into()), "<mark>a</mark>aa");

        let insensitive = HighlightRule::new(Pattern::with_flags("rust", "gi").unwrap());
        assert_eq!(
            perform_highlight("Rust RUST", &insensitive.into()),
            "<mark>Rust</mark> <mark>RUST</mark>"
        );

        let literal = HighlightRule::new(Pattern::literal("a.b").unwrap());
        assert_eq!(
            perform_highlight("a.b axb a.b", &literal.into()),
            "<mark>a.b</mark> axb a.b"
        );

        let first_literal = HighlightRule::new(Pattern::literal("a").unwrap());
        assert!(!first_literal.pattern.is_global());
        assert_eq!(perform_highlight("aaa", &first_literal.into()), "<mark>a</mark>aa");

        let indices = HighlightRule::new(Pattern::with_flags("b", "dg").unwrap());
        assert_eq!(
            perform_highlight("abab", &indices.into()),
            "a<mark>b</mark>a<mark>b</mark>"
        );
    }

    #[test]
    fn test_placeholder_range_in_input_renders() {
        let any = HighlightRule::new(Pattern::new(".").unwrap());
        assert_eq!(
            perform_highlight("\u{F0000}", &any.into()),
            "<mark>\u{F0000}</mark>"
        );

        // Input code points that look like later keys stay literal.
        let html = perform_highlight("@a \u{F0001}", &rule("@[a-z]+").into());
        assert_eq!(html, "<mark>@a</mark> \u{F0001}");
    }

    #[test]
    fn test_pattern_errors() {
        assert!(matches!(
            Pattern::with_flags("a", "gy"),
            Err(HighlightError::UnsupportedFlag { flag: 'y', .. })
        ));
        assert!(matches!(
            Pattern::new("(unclosed"),
            Err(HighlightError::InvalidPattern { .. })
        ));
    }
}
