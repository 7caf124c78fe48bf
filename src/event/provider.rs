//! The input provider contract and a frame-based implementation.
//!
//! The core never polls devices. It reads boolean and edge queries through
//! [`InputProvider`]; [`FrameInput`] builds those answers from raw
//! [`InputEvent`]s pushed by the host between frames.

use std::collections::HashSet;

use crate::event::input::{InputEvent, Key, KeyEvent, MouseButton};
use crate::geometry::Vec2;

/// Queries the per-frame update consumes.
pub trait InputProvider {
    /// Pointer position in UI coordinates.
    fn pointer_position(&self) -> Vec2;

    /// Pointer movement since the previous frame.
    fn pointer_delta(&self) -> Vec2;

    /// Held down this frame.
    fn button_down(&self, button: MouseButton) -> bool;

    /// Went down this frame, even if it also went up again.
    fn button_pressed(&self, button: MouseButton) -> bool;

    /// Went up this frame.
    fn button_released(&self, button: MouseButton) -> bool;

    /// Wheel notches this frame; positive scrolls up.
    fn wheel_delta(&self) -> i32;

    fn key_down(&self, key: Key) -> bool;

    /// Went down this frame.
    fn key_pressed(&self, key: Key) -> bool;

    /// Text entered this frame.
    fn text(&self) -> &str;
}

// ---------------------------------------------------------------------------
// PointerTransform
// ---------------------------------------------------------------------------

/// Maps device pointer coordinates into UI coordinates:
/// `ui = (device - offset) * scale`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerTransform {
    pub offset: Vec2,
    pub scale: Vec2,
}

impl Default for PointerTransform {
    fn default() -> Self {
        Self { offset: Vec2::ZERO, scale: Vec2::ONE }
    }
}

impl PointerTransform {
    pub fn apply(&self, device: Vec2) -> Vec2 {
        (device - self.offset).scale(self.scale)
    }
}

// ---------------------------------------------------------------------------
// FrameInput
// ---------------------------------------------------------------------------

/// Input state accumulated from raw events.
///
/// Call [`begin_frame`](Self::begin_frame) once per frame before pushing that
/// frame's events. Edges are recorded as events arrive, so a press and a
/// release within one frame report both.
#[derive(Debug, Clone, Default)]
pub struct FrameInput {
    transform: PointerTransform,
    pointer: Vec2,
    prev_pointer: Vec2,
    buttons: [bool; 3],
    pressed: [bool; 3],
    released: [bool; 3],
    wheel: i32,
    keys: HashSet<Key>,
    keys_pressed: HashSet<Key>,
    text: String,
    last_key: Option<KeyEvent>,
}

impl FrameInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `transform` for subsequent pointer moves.
    pub fn with_transform(mut self, transform: PointerTransform) -> Self {
        self.transform = transform;
        self
    }

    pub fn set_transform(&mut self, transform: PointerTransform) {
        self.transform = transform;
    }

    /// Snapshot the pointer and clear edges and per-frame accumulators.
    pub fn begin_frame(&mut self) {
        self.prev_pointer = self.pointer;
        self.pressed = [false; 3];
        self.released = [false; 3];
        self.keys_pressed.clear();
        self.wheel = 0;
        self.text.clear();
        self.last_key = None;
    }

    /// Apply one raw event.
    pub fn handle_event(&mut self, event: &InputEvent) {
        match event {
            InputEvent::PointerMoved { x, y } => {
                self.pointer = self.transform.apply(Vec2::new(*x, *y));
            }
            InputEvent::ButtonDown(button) => {
                let i = button.index();
                self.pressed[i] |= !self.buttons[i];
                self.buttons[i] = true;
            }
            InputEvent::ButtonUp(button) => {
                let i = button.index();
                self.released[i] |= self.buttons[i];
                self.buttons[i] = false;
            }
            InputEvent::Wheel(delta) => self.wheel += delta,
            InputEvent::KeyDown(key) => {
                if self.keys.insert(key.code) {
                    self.keys_pressed.insert(key.code);
                }
                self.last_key = Some(*key);
            }
            InputEvent::KeyUp(key) => {
                self.keys.remove(key);
            }
            InputEvent::Text(c) => self.text.push(*c),
            InputEvent::Resize { .. } => {}
        }
    }

    /// Apply several raw events in order.
    pub fn handle_events<'a>(&mut self, events: impl IntoIterator<Item = &'a InputEvent>) {
        for event in events {
            self.handle_event(event);
        }
    }

    /// The most recent key press of this frame, with modifiers.
    pub fn last_key(&self) -> Option<KeyEvent> {
        self.last_key
    }
}

impl InputProvider for FrameInput {
    fn pointer_position(&self) -> Vec2 {
        self.pointer
    }

    fn pointer_delta(&self) -> Vec2 {
        self.pointer - self.prev_pointer
    }

    fn button_down(&self, button: MouseButton) -> bool {
        self.buttons[button.index()]
    }

    fn button_pressed(&self, button: MouseButton) -> bool {
        self.pressed[button.index()]
    }

    fn button_released(&self, button: MouseButton) -> bool {
        self.released[button.index()]
    }

    fn wheel_delta(&self) -> i32 {
        self.wheel
    }

    fn key_down(&self, key: Key) -> bool {
        self.keys.contains(&key)
    }

    fn key_pressed(&self, key: Key) -> bool {
        self.keys_pressed.contains(&key)
    }

    fn text(&self) -> &str {
        &self.text
    }
}

// ===========================================================================
// Tests
// ===========================================================================
