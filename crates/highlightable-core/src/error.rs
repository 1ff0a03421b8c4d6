//! Error types for highlight rule construction.

use miette::Diagnostic;

/// Errors raised while building highlight patterns.
///
/// Rendering itself never fails; a rule that cannot be compiled is rejected
/// when it is constructed.
#[derive(thiserror::Error, Debug, Diagnostic)]
pub enum HighlightError {
    /// The pattern source is not a valid regular expression.
    #[error("invalid highlight pattern `{source_text}`")]
    #[diagnostic(code(highlightable::pattern))]
    InvalidPattern {
        source_text: String,
        #[source]
        cause: regex::Error,
    },

    /// A flag character that has no equivalent here.
    #[error("unsupported pattern flag `{flag}` in `{flags}`")]
    #[diagnostic(
        code(highlightable::flag),
        help("supported flags are d, g, i, m, s and u")
    )]
    UnsupportedFlag { flag: char, flags: String },
}
