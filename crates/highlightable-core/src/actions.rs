//! Input intents and keyboard shortcuts.
//!
//! Platform-agnostic classification of editing input. Browser `beforeinput`
//! and `input` events are parsed into [`InputType`]; keydown events into a
//! [`KeyCombo`] which is then matched against the shortcuts the surface
//! handles itself.

use smol_str::SmolStr;

/// Semantic input types from input events.
///
/// Follows the W3C Input Events `inputType` vocabulary. Only the members the
/// surface distinguishes get their own variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputType {
    // === Insertion ===
    /// Insert typed text.
    InsertText,
    /// Insert text from IME composition.
    InsertCompositionText,
    /// Insert a line break (Shift+Enter).
    InsertLineBreak,
    /// Insert a paragraph break (Enter).
    InsertParagraph,
    InsertFromPaste,
    InsertFromDrop,
    /// Spell check correction and similar.
    InsertReplacementText,
    InsertFromYank,
    /// Any other `insert*` type.
    InsertOther(SmolStr),

    // === Deletion ===
    DeleteContentBackward,
    DeleteContentForward,
    DeleteWordBackward,
    DeleteWordForward,
    DeleteSoftLineBackward,
    DeleteSoftLineForward,
    DeleteHardLineBackward,
    DeleteHardLineForward,
    DeleteByCut,
    DeleteByDrag,
    DeleteContent,
    /// Any other `delete*` type.
    DeleteOther(SmolStr),

    // === History ===
    HistoryUndo,
    HistoryRedo,

    /// Formatting and anything unrecognized.
    Other(SmolStr),
}

impl InputType {
    /// Parse an `inputType` string.
    pub fn parse(s: &str) -> Self {
        match s {
            "insertText" => Self::InsertText,
            "insertCompositionText" => Self::InsertCompositionText,
            "insertLineBreak" => Self::InsertLineBreak,
            "insertParagraph" => Self::InsertParagraph,
            "insertFromPaste" => Self::InsertFromPaste,
            "insertFromDrop" => Self::InsertFromDrop,
            "insertReplacementText" => Self::InsertReplacementText,
            "insertFromYank" => Self::InsertFromYank,

            "deleteContentBackward" => Self::DeleteContentBackward,
            "deleteContentForward" => Self::DeleteContentForward,
            "deleteWordBackward" => Self::DeleteWordBackward,
            "deleteWordForward" => Self::DeleteWordForward,
            "deleteSoftLineBackward" => Self::DeleteSoftLineBackward,
            "deleteSoftLineForward" => Self::DeleteSoftLineForward,
            "deleteHardLineBackward" => Self::DeleteHardLineBackward,
            "deleteHardLineForward" => Self::DeleteHardLineForward,
            "deleteByCut" => Self::DeleteByCut,
            "deleteByDrag" => Self::DeleteByDrag,
            "deleteContent" => Self::DeleteContent,

            "historyUndo" => Self::HistoryUndo,
            "historyRedo" => Self::HistoryRedo,

            other if other.starts_with("insert") => Self::InsertOther(other.into()),
            other if other.starts_with("delete") => Self::DeleteOther(other.into()),
            other => Self::Other(other.into()),
        }
    }

    /// Whether this input type is a deletion operation.
    pub fn is_deletion(&self) -> bool {
        matches!(
            self,
            Self::DeleteContentBackward
                | Self::DeleteContentForward
                | Self::DeleteWordBackward
                | Self::DeleteWordForward
                | Self::DeleteSoftLineBackward
                | Self::DeleteSoftLineForward
                | Self::DeleteHardLineBackward
                | Self::DeleteHardLineForward
                | Self::DeleteByCut
                | Self::DeleteByDrag
                | Self::DeleteContent
                | Self::DeleteOther(_)
        )
    }

    /// Whether this input type is an insertion operation.
    pub fn is_insertion(&self) -> bool {
        matches!(
            self,
            Self::InsertText
                | Self::InsertCompositionText
                | Self::InsertLineBreak
                | Self::InsertParagraph
                | Self::InsertFromPaste
                | Self::InsertFromDrop
                | Self::InsertReplacementText
                | Self::InsertFromYank
                | Self::InsertOther(_)
        )
    }

    /// Line and paragraph breaks, rejected by single-line surfaces.
    pub fn is_line_break(&self) -> bool {
        matches!(self, Self::InsertParagraph | Self::InsertLineBreak)
    }
}

/// Key values for keyboard input.
///
/// Shortcuts only involve character keys; everything else is kept as its
/// `KeyboardEvent.key` string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    /// A character key, lowercased.
    Character(SmolStr),
    /// Any other named key.
    Named(SmolStr),
}

impl Key {
    /// Convert a `KeyboardEvent.key` value.
    pub fn from_key_value(value: &str) -> Self {
        if value.chars().count() == 1 {
            Self::Character(value.to_lowercase().into())
        } else {
            Self::Named(value.into())
        }
    }

    fn is_char(&self, c: &str) -> bool {
        matches!(self, Self::Character(s) if s.as_str() == c)
    }
}

/// Modifier key state for a key combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub meta: bool,
}

impl Modifiers {
    /// Whether the platform's primary modifier is held (Cmd on Mac, Ctrl elsewhere).
    pub fn has_primary(&self, is_mac: bool) -> bool {
        if is_mac { self.meta } else { self.ctrl }
    }
}

/// A key combination as pressed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyCombo {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl KeyCombo {
    pub fn with_modifiers(key: Key, modifiers: Modifiers) -> Self {
        Self { key, modifiers }
    }

    /// Classify this combination against the shortcuts the surface handles.
    pub fn shortcut(&self, is_mac: bool) -> Option<Shortcut> {
        let m = self.modifiers;
        if m.alt || !m.has_primary(is_mac) {
            return None;
        }

        if self.key.is_char("z") {
            return Some(if m.shift { Shortcut::Redo } else { Shortcut::Undo });
        }
        if self.key.is_char("y") && !is_mac && !m.shift {
            return Some(Shortcut::Redo);
        }
        if self.key.is_char("a") && !m.shift {
            return Some(Shortcut::SelectAll);
        }
        None
    }
}

/// Keyboard shortcuts intercepted on keydown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shortcut {
    Undo,
    Redo,
    SelectAll,
}

/// Result of handling a keydown event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeydownResult {
    /// Event was handled, prevent default.
    Handled,
    /// Let the platform handle it.
    NotHandled,
}

#[cfg(test)]
mod tests {
    use super::*;

    const CTRL: Modifiers = Modifiers {
        ctrl: true,
        alt: false,
        shift: false,
        meta: false,
    };

    const META: Modifiers = Modifiers {
        ctrl: false,
        alt: false,
        shift: false,
        meta: true,
    };

    fn combo(key: &str, modifiers: Modifiers) -> KeyCombo {
        KeyCombo::with_modifiers(Key::from_key_value(key), modifiers)
    }

    fn shifted(modifiers: Modifiers) -> Modifiers {
        Modifiers {
            shift: true,
            ..modifiers
        }
    }

    #[test]
    fn test_parse_input_type() {
        assert_eq!(InputType::parse("insertText"), InputType::InsertText);
        assert_eq!(InputType::parse("historyUndo"), InputType::HistoryUndo);
        assert_eq!(
            InputType::parse("insertOrderedList"),
            InputType::InsertOther("insertOrderedList".into())
        );
        assert!(InputType::parse("deleteEntireSoftLine").is_deletion());
        assert!(!InputType::parse("formatBold").is_insertion());
        assert!(!InputType::parse("formatBold").is_deletion());
    }

    #[test]
    fn test_line_breaks() {
        assert!(InputType::InsertParagraph.is_line_break());
        assert!(InputType::InsertLineBreak.is_line_break());
        assert!(!InputType::InsertText.is_line_break());
    }

    #[test]
    fn test_key_from_value() {
        assert_eq!(Key::from_key_value("Z"), Key::Character("z".into()));
        assert_eq!(Key::from_key_value("Tab"), Key::Named("Tab".into()));
        assert_eq!(Key::from_key_value("ArrowLeft"), Key::Named("ArrowLeft".into()));
    }

    #[test]
    fn test_undo_redo_shortcuts() {
        assert_eq!(combo("z", CTRL).shortcut(false), Some(Shortcut::Undo));
        assert_eq!(combo("Z", shifted(META)).shortcut(true), Some(Shortcut::Redo));
        // Ctrl+Z on a Mac is not the primary modifier
        assert_eq!(combo("z", CTRL).shortcut(true), None);

        assert_eq!(combo("y", CTRL).shortcut(false), Some(Shortcut::Redo));
        assert_eq!(combo("y", META).shortcut(true), None);
    }

    #[test]
    fn test_select_all_shortcut() {
        assert_eq!(combo("a", META).shortcut(true), Some(Shortcut::SelectAll));
        assert_eq!(combo("a", Modifiers::default()).shortcut(true), None);
    }

    #[test]
    fn test_alt_disables_shortcuts() {
        let alt_ctrl = Modifiers { alt: true, ..CTRL };
        assert_eq!(combo("z", alt_ctrl).shortcut(false), None);
    }
}
