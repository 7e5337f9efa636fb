//! Keyboard events delivered to a term.

/// Keys a term reacts to.
///
/// Anything else arrives as [`Key::Character`] or [`Key::Unknown`] and is
/// only passed through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Escape,
    Tab,
    Enter,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Home,
    End,
    PageUp,
    PageDown,
    Backspace,
    Delete,
    Space,
    Character(char),
    Unknown,
}

/// Keyboard modifiers held during a key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct KeyboardModifiers {
    pub shift: bool,
    pub control: bool,
    pub alt: bool,
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

    /// Check if any modifier is pressed.
    pub fn any(&self) -> bool {
        self.shift || self.control || self.alt || self.meta
    }
}

/// A key event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: Key,
    pub modifiers: KeyboardModifiers,
    /// The event targets the term's own input element.
    pub on_input: bool,
    /// The event is part of an IME composition.
    pub composing: bool,
}

impl KeyEvent {
    /// A plain key event on the term's input.
    pub fn new(key: Key) -> Self {
        Self {
            key,
            modifiers: KeyboardModifiers::NONE,
            on_input: true,
            composing: false,
        }
    }

    /// Set modifiers using builder pattern.
    pub fn with_modifiers(mut self, modifiers: KeyboardModifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Mark the event as targeting something other than the input.
    pub fn off_input(mut self) -> Self {
        self.on_input = false;
        self
    }

    /// Mark the event as part of an IME composition.
    pub fn composing(mut self) -> Self {
        self.composing = true;
        self
    }

    /// Composition keystrokes are handled by the IME, not the term.
    pub fn should_ignore(&self) -> bool {
        self.composing
    }
}

impl From<Key> for KeyEvent {
    fn from(key: Key) -> Self {
        Self::new(key)
    }
}
