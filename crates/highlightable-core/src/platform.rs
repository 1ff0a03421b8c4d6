//! Platform abstraction for selection operations.
//!
//! The browser implementation maps offsets onto the DOM Selection API; tests
//! and other hosts can provide their own.

use crate::types::{Offsets, SelectOffsets, SelectOptions};

/// Error type for platform operations.
#[derive(Debug, Clone)]
pub struct PlatformError(pub String);

impl std::fmt::Display for PlatformError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for PlatformError {}

impl From<&str> for PlatformError {
    fn from(s: &str) -> Self {
        PlatformError(s.to_string())
    }
}

impl From<String> for PlatformError {
    fn from(s: String) -> Self {
        PlatformError(s)
    }
}

/// Read and install the selection of an editable surface in plain-text offsets.
///
/// Both operations degrade silently: a surface without a selection reads as
/// `[0, 0]`, and an install that cannot be mapped does nothing.
pub trait SelectionPlatform {
    /// Current selection as `[anchor, focus]` offsets.
    fn selection(&self) -> Offsets;

    /// Install a selection. Does nothing unless the surface holds focus or
    /// `options.force` is set.
    fn select(&self, offsets: SelectOffsets, options: SelectOptions);
}
