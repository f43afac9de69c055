//! Event types consumed and produced by the combobox controller.
//!
//! The host translates platform input into these events and feeds them to
//! [`ComboboxController`](super::ComboboxController). Only the keys the
//! controller reacts to are modeled individually; everything else maps to
//! [`Key::Unknown`] and passes through unhandled.

/// A keyboard key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    // Navigation
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Home,
    End,

    // Editing
    Backspace,
    Delete,
    Enter,
    Tab,

    // Whitespace
    Space,

    // Control
    Escape,

    /// Unknown/unmapped key.
    Unknown(u16),
}

/// The state of the keyboard modifiers during an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KeyboardModifiers {
    /// The Shift key is held.
    pub shift: bool,
    /// The Control key is held (Cmd on macOS).
    pub control: bool,
    /// The Alt key is held (Option on macOS).
    pub alt: bool,
    /// The Meta/Super key is held (Windows key, Cmd on macOS).
    pub meta: bool,
}

impl KeyboardModifiers {
    /// No modifiers pressed.
    pub const NONE: Self = Self {
        shift: false,
        control: false,
        alt: false,
        meta: false,
    };

    /// Shift modifier only.
    pub const SHIFT: Self = Self {
        shift: true,
        control: false,
        alt: false,
        meta: false,
    };
}

/// A key press delivered to the controller.
#[derive(Debug, Clone)]
pub struct KeyPressEvent {
    /// The key that was pressed.
    pub key: Key,
    /// Keyboard modifiers held during the event.
    pub modifiers: KeyboardModifiers,
    /// The text input from this key press (if any).
    ///
    /// For printable keys, this contains the character that would be typed.
    /// For non-printable keys it is empty.
    pub text: String,
}

impl KeyPressEvent {
    /// Create a new key press event.
    pub fn new(key: Key, modifiers: KeyboardModifiers, text: impl Into<String>) -> Self {
        Self {
            key,
            modifiers,
            text: text.into(),
        }
    }

    /// A key press with no modifiers and no text.
    pub fn plain(key: Key) -> Self {
        Self::new(key, KeyboardModifiers::NONE, "")
    }
}

/// Where the controller wants logical focus to go.
///
/// The controller never holds a handle to anything in the presentation
/// layer; instead it emits this intent and the host performs the actual
/// focus transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusTarget {
    /// The text input.
    Input,
    /// The pill at the given index within the selected-items strip.
    Pill(usize),
}
