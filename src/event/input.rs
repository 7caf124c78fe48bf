//! Raw input events fed into a [`FrameInput`](super::provider::FrameInput).
//!
//! Defines [`InputEvent`], [`KeyEvent`], [`MouseButton`] and supporting types.
//! Crossterm events are converted via `From` impls and [`from_crossterm`] so
//! that terminal hosts can drive the UI without the rest of the crate
//! depending on crossterm.

use std::ops::{BitAnd, BitOr};

// ---------------------------------------------------------------------------
// Key
// ---------------------------------------------------------------------------

/// Keyboard key, decoupled from crossterm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Char(char),
    Enter,
    Escape,
    Tab,
    BackTab,
    Backspace,
    Delete,
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
    PageUp,
    PageDown,
    F(u8),
    /// Any key without a dedicated variant.
    Other,
}

// ---------------------------------------------------------------------------
// Modifiers
// ---------------------------------------------------------------------------

/// Modifier key bitmask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers(pub u8);

impl Modifiers {
    pub const NONE: Modifiers = Modifiers(0);
    pub const SHIFT: Modifiers = Modifiers(1);
    pub const CTRL: Modifiers = Modifiers(2);
    pub const ALT: Modifiers = Modifiers(4);

    /// Check whether `self` contains all the bits in `other`.
    pub fn contains(self, other: Modifiers) -> bool {
        (self.0 & other.0) == other.0
    }

    /// Check whether no modifier bits are set.
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for Modifiers {
    type Output = Modifiers;
    fn bitor(self, rhs: Self) -> Self::Output {
        Modifiers(self.0 | rhs.0)
    }
}

impl BitAnd for Modifiers {
    type Output = Modifiers;
    fn bitand(self, rhs: Self) -> Self::Output {
        Modifiers(self.0 & rhs.0)
    }
}

// ---------------------------------------------------------------------------
// KeyEvent
// ---------------------------------------------------------------------------

/// A keyboard event with key and modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub code: Key,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    pub fn new(code: Key, modifiers: Modifiers) -> Self {
        Self { code, modifiers }
    }
}

// ---------------------------------------------------------------------------
// MouseButton
// ---------------------------------------------------------------------------

/// Pointer button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

impl MouseButton {
    pub const ALL: [MouseButton; 3] = [MouseButton::Left, MouseButton::Right, MouseButton::Middle];

    pub(crate) const fn index(self) -> usize {
        match self {
            MouseButton::Left => 0,
            MouseButton::Right => 1,
            MouseButton::Middle => 2,
        }
    }
}

// ---------------------------------------------------------------------------
// InputEvent
// ---------------------------------------------------------------------------

/// One raw input event.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Pointer moved to a position in device coordinates.
    PointerMoved { x: f32, y: f32 },
    ButtonDown(MouseButton),
    ButtonUp(MouseButton),
    /// Wheel notches; positive scrolls up.
    Wheel(i32),
    KeyDown(KeyEvent),
    KeyUp(Key),
    /// Text entered this frame.
    Text(char),
    Resize { width: u16, height: u16 },
}

// ---------------------------------------------------------------------------
// From<crossterm> conversions
// ---------------------------------------------------------------------------

/// Convert crossterm key modifiers to our `Modifiers`.
fn convert_modifiers(m: crossterm::event::KeyModifiers) -> Modifiers {
    let mut out = Modifiers::NONE;
    if m.contains(crossterm::event::KeyModifiers::SHIFT) {
        out = out | Modifiers::SHIFT;
    }
    if m.contains(crossterm::event::KeyModifiers::CONTROL) {
        out = out | Modifiers::CTRL;
    }
    if m.contains(crossterm::event::KeyModifiers::ALT) {
        out = out | Modifiers::ALT;
    }
    out
}

impl From<crossterm::event::KeyCode> for Key {
    fn from(code: crossterm::event::KeyCode) -> Self {
        use crossterm::event::KeyCode;
        match code {
            KeyCode::Char(c) => Key::Char(c),
            KeyCode::Enter => Key::Enter,
            KeyCode::Esc => Key::Escape,
            KeyCode::Tab => Key::Tab,
            KeyCode::BackTab => Key::BackTab,
            KeyCode::Backspace => Key::Backspace,
            KeyCode::Delete => Key::Delete,
            KeyCode::Left => Key::Left,
            KeyCode::Right => Key::Right,
            KeyCode::Up => Key::Up,
            KeyCode::Down => Key::Down,
            KeyCode::Home => Key::Home,
            KeyCode::End => Key::End,
            KeyCode::PageUp => Key::PageUp,
            KeyCode::PageDown => Key::PageDown,
            KeyCode::F(n) => Key::F(n),
            _ => Key::Other,
        }
    }
}

impl From<crossterm::event::KeyEvent> for KeyEvent {
    fn from(ct: crossterm::event::KeyEvent) -> Self {
        KeyEvent {
            code: Key::from(ct.code),
            modifiers: convert_modifiers(ct.modifiers),
        }
    }
}

impl From<crossterm::event::MouseButton> for MouseButton {
    fn from(b: crossterm::event::MouseButton) -> Self {
        match b {
            crossterm::event::MouseButton::Left => MouseButton::Left,
            crossterm::event::MouseButton::Right => MouseButton::Right,
            crossterm::event::MouseButton::Middle => MouseButton::Middle,
        }
    }
}

/// Convert a crossterm `Event` into the raw events it implies.
///
/// Mouse events report their cell position first, then the button or wheel
/// change. Key presses of plain characters also produce a `Text` event.
/// Events with no counterpart produce nothing.
pub fn from_crossterm(event: crossterm::event::Event) -> Vec<InputEvent> {
    use crossterm::event::{Event, KeyEventKind, MouseEventKind};

    match event {
        Event::Key(ke) => {
            let key = KeyEvent::from(ke);
            match ke.kind {
                KeyEventKind::Release => vec![InputEvent::KeyUp(key.code)],
                KeyEventKind::Press | KeyEventKind::Repeat => {
                    let mut out = vec![InputEvent::KeyDown(key)];
                    let plain = !key.modifiers.contains(Modifiers::CTRL)
                        && !key.modifiers.contains(Modifiers::ALT);
                    if let (Key::Char(c), true) = (key.code, plain) {
                        out.push(InputEvent::Text(c));
                    }
                    out
                }
            }
        }
        Event::Mouse(me) => {
            let moved = InputEvent::PointerMoved { x: f32::from(me.column), y: f32::from(me.row) };
            let action = match me.kind {
                MouseEventKind::Down(b) => Some(InputEvent::ButtonDown(b.into())),
                MouseEventKind::Up(b) => Some(InputEvent::ButtonUp(b.into())),
                MouseEventKind::ScrollUp => Some(InputEvent::Wheel(1)),
                MouseEventKind::ScrollDown => Some(InputEvent::Wheel(-1)),
                _ => None,
            };
            std::iter::once(moved).chain(action).collect()
        }
        Event::Resize(width, height) => vec![InputEvent::Resize { width, height }],
        Event::Paste(text) => text.chars().map(InputEvent::Text).collect(),
        _ => Vec::new(),
    }
}

// ===========================================================================
// Tests
// ===========================================================================
