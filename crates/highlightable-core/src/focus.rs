//! Selection restoration when the surface gains focus.

/// How the user last interacted with the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Modality {
    Keyboard,
    Pointer,
}

/// What to do with the selection when the surface gains focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusRestore {
    /// Select the whole value (tabbing into a single-line surface).
    SelectAll,
    /// Reinstate the selection cached at the last blur.
    Cached,
    /// Keep whatever selection the platform placed.
    Native,
}

/// Decide how to restore the selection on focus.
///
/// Keyboard focus and programmatic focus (or a click on something outside
/// the surface, such as its label) restore the cached selection. A click
/// inside the surface keeps the caret where the pointer put it.
pub fn focus_restore(
    modality: Option<Modality>,
    last_key: Option<&str>,
    clicked_inside: bool,
    multi_line: bool,
) -> FocusRestore {
    match modality {
        Some(Modality::Keyboard) if last_key == Some("Tab") && !multi_line => FocusRestore::SelectAll,
        Some(Modality::Keyboard) => FocusRestore::Cached,
        _ if !clicked_inside => FocusRestore::Cached,
        _ => FocusRestore::Native,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tab_into_single_line_selects_all() {
        assert_eq!(
            focus_restore(Some(Modality::Keyboard), Some("Tab"), false, false),
            FocusRestore::SelectAll
        );
        assert_eq!(
            focus_restore(Some(Modality::Keyboard), Some("Tab"), false, true),
            FocusRestore::Cached
        );
    }

    #[test]
    fn test_other_keyboard_focus_restores_cache() {
        assert_eq!(
            focus_restore(Some(Modality::Keyboard), Some("Enter"), false, false),
            FocusRestore::Cached
        );
    }

    #[test]
    fn test_pointer_focus() {
        assert_eq!(
            focus_restore(Some(Modality::Pointer), None, true, true),
            FocusRestore::Native
        );
        // clicking a label outside the surface
        assert_eq!(
            focus_restore(Some(Modality::Pointer), None, false, true),
            FocusRestore::Cached
        );
    }

    #[test]
    fn test_programmatic_focus_restores_cache() {
        assert_eq!(focus_restore(None, None, false, false), FocusRestore::Cached);
    }
}
