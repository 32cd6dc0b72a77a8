// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Input vocabulary consumed by the dispatcher.
//!
//! Hosts translate platform events into [`InputEvent`]s and queue them on the
//! [`App`](crate::App), either directly or through an [`InputSource`]. The
//! continuously queryable pointer state is carried separately in
//! [`PointerState`], which the dispatcher re-checks once per frame to catch
//! hover changes that produce no native event (a node appearing under a
//! stationary pointer, for example).

use core::fmt;

use crate::rect::Point;

// ---------------------------------------------------------------------------
// Keyboard
// ---------------------------------------------------------------------------

/// A physical or logical key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    /// A printable key, by the character it produces without modifiers.
    Char(char),
    /// Space bar.
    Space,
    /// Return / Enter.
    Enter,
    /// Escape.
    Escape,
    /// Tab.
    Tab,
    /// Backspace.
    Backspace,
    /// Forward delete.
    Delete,
    /// Left arrow.
    Left,
    /// Right arrow.
    Right,
    /// Up arrow.
    Up,
    /// Down arrow.
    Down,
    /// Home.
    Home,
    /// End.
    End,
    /// Page up.
    PageUp,
    /// Page down.
    PageDown,
    /// Function key `F1`..`F24`.
    F(u8),
    /// A platform key code with no named variant.
    Other(u32),
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Char(c) => write!(f, "{}", c.to_lowercase()),
            Self::Space => f.write_str("space"),
            Self::Enter => f.write_str("enter"),
            Self::Escape => f.write_str("escape"),
            Self::Tab => f.write_str("tab"),
            Self::Backspace => f.write_str("backspace"),
            Self::Delete => f.write_str("delete"),
            Self::Left => f.write_str("left"),
            Self::Right => f.write_str("right"),
            Self::Up => f.write_str("up"),
            Self::Down => f.write_str("down"),
            Self::Home => f.write_str("home"),
            Self::End => f.write_str("end"),
            Self::PageUp => f.write_str("pageup"),
            Self::PageDown => f.write_str("pagedown"),
            Self::F(n) => write!(f, "f{n}"),
            Self::Other(code) => write!(f, "key{code}"),
        }
    }
}

/// Modifier keys held during a key event.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Modifiers {
    /// Either control key.
    pub ctrl: bool,
    /// Either alt / option key.
    pub alt: bool,
    /// Either shift key.
    pub shift: bool,
    /// Either meta / command / super key.
    pub meta: bool,
}

impl Modifiers {
    /// No modifiers held.
    pub const NONE: Self = Self {
        ctrl: false,
        alt: false,
        shift: false,
        meta: false,
    };

    /// Only control held.
    pub const CTRL: Self = Self {
        ctrl: true,
        ..Self::NONE
    };

    /// Only shift held.
    pub const SHIFT: Self = Self {
        shift: true,
        ..Self::NONE
    };
}

/// A key together with the modifiers held when it was pressed.
///
/// The [`Display`](fmt::Display) form is the canonical lookup key used by
/// [`Config::control`](crate::Config::control): modifiers in the fixed order
/// `ctrl`, `alt`, `shift`, `meta`, each followed by `+`, then the key name.
///
/// ```
/// use lamina_core::{Key, KeyCombo, Modifiers};
///
/// let combo = KeyCombo::new(Key::Char('S'), Modifiers::CTRL);
/// assert_eq!(combo.to_string(), "ctrl+s");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct KeyCombo {
    /// The key.
    pub key: Key,
    /// Held modifiers.
    pub mods: Modifiers,
}

impl KeyCombo {
    /// Creates a combination.
    #[must_use]
    pub const fn new(key: Key, mods: Modifiers) -> Self {
        Self { key, mods }
    }
}

impl From<Key> for KeyCombo {
    fn from(key: Key) -> Self {
        Self::new(key, Modifiers::NONE)
    }
}

impl fmt::Display for KeyCombo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let m = self.mods;
        for (held, name) in [
            (m.ctrl, "ctrl+"),
            (m.alt, "alt+"),
            (m.shift, "shift+"),
            (m.meta, "meta+"),
        ] {
            if held {
                f.write_str(name)?;
            }
        }
        write!(f, "{}", self.key)
    }
}

// ---------------------------------------------------------------------------
// Pointer
// ---------------------------------------------------------------------------

/// A pointer button.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Primary button.
    Left,
    /// Middle button / wheel click.
    Middle,
    /// Secondary button.
    Right,
    /// Any further button, by platform index.
    Other(u8),
}

/// The set of pointer buttons currently held.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Buttons(u8);

impl Buttons {
    /// No buttons held.
    pub const NONE: Self = Self(0);

    const fn bit(button: MouseButton) -> u8 {
        match button {
            MouseButton::Left => 1,
            MouseButton::Middle => 1 << 1,
            MouseButton::Right => 1 << 2,
            MouseButton::Other(_) => 0,
        }
    }

    /// Returns whether `button` is held. Always `false` for
    /// [`MouseButton::Other`].
    #[must_use]
    pub const fn contains(self, button: MouseButton) -> bool {
        self.0 & Self::bit(button) != 0
    }

    /// Returns a copy with `button` set to `pressed`.
    #[must_use]
    pub const fn with(self, button: MouseButton, pressed: bool) -> Self {
        if pressed {
            Self(self.0 | Self::bit(button))
        } else {
            Self(self.0 & !Self::bit(button))
        }
    }

    /// Returns whether no button is held.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Debug for Buttons {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set()
            .entries(
                [MouseButton::Left, MouseButton::Middle, MouseButton::Right]
                    .into_iter()
                    .filter(|b| self.contains(*b)),
            )
            .finish()
    }
}

/// A pointer movement from `start` to `end`, in the receiving node's local
/// coordinate space.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PointerSegment {
    /// Where the pointer was.
    pub start: Point,
    /// Where the pointer is now.
    pub end: Point,
    /// Buttons held during the move.
    pub buttons: Buttons,
}

impl PointerSegment {
    /// Re-expresses the segment relative to `origin`.
    #[must_use]
    pub fn to_local(self, origin: Point) -> Self {
        Self {
            start: self.start - origin,
            end: self.end - origin,
            buttons: self.buttons,
        }
    }
}

/// The continuously queryable pointer state, in window coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PointerState {
    /// Current pointer position.
    pub pos: Point,
    /// Buttons currently held.
    pub buttons: Buttons,
    /// Whether the window currently has pointer focus. No node is hovered
    /// while this is `false`.
    pub window_focused: bool,
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// A discrete input event. Positions are in window coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputEvent {
    /// A key was pressed.
    KeyDown {
        /// Text produced by the key, if any.
        unicode: Option<char>,
        /// The key.
        key: Key,
        /// Held modifiers.
        mods: Modifiers,
    },
    /// A key was released.
    KeyUp {
        /// The key.
        key: Key,
        /// Held modifiers.
        mods: Modifiers,
    },
    /// The pointer moved.
    PointerMotion {
        /// New position.
        pos: Point,
        /// Movement since the previous motion event.
        rel: Point,
        /// Buttons held.
        buttons: Buttons,
    },
    /// A pointer button was pressed.
    PointerDown {
        /// Pointer position.
        pos: Point,
        /// Which button.
        button: MouseButton,
    },
    /// A pointer button was released.
    PointerUp {
        /// Pointer position.
        pos: Point,
        /// Which button.
        button: MouseButton,
    },
}

/// A host-side source of input.
pub trait InputSource {
    /// Returns the next queued event, or `None` when drained.
    fn poll_event(&mut self) -> Option<InputEvent>;

    /// Returns the current pointer state.
    fn pointer(&self) -> PointerState;
}
