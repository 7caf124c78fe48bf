//! Pilot: programmatic interaction with a headless UserInterface.
//!
//! The `Pilot` owns a [`UserInterface`], a [`FrameInput`] and a
//! [`RecordingSurface`]. Every input helper runs exactly one update frame per
//! step, so a click is three frames: move, press, release.

use crate::app::{UiConfig, UserInterface};
use crate::dom::tree::EntityTree;
use crate::error::Result;
use crate::event::input::{InputEvent, Key, KeyEvent, Modifiers, MouseButton};
use crate::event::provider::FrameInput;
use crate::style::theme::Theme;
use crate::testing::surface::{RecordingSurface, StubAssets};

// ---------------------------------------------------------------------------
// Pilot
// ---------------------------------------------------------------------------

/// A headless frame driver for testing.
///
/// # Examples
///
/// ```ignore
/// use anchor_ui::testing::Pilot;
///
/// let mut pilot = Pilot::new(800, 600);
/// let ok = pilot.ui_mut().spawn(Entity::default(), Button::new("OK"));
/// pilot.tree_mut().add_child(pilot.ui().root(), ok)?;
/// pilot.click_at(400.0, 35.0);
/// assert_eq!(pilot.ui().active(), ok);
/// ```
pub struct Pilot {
    ui: UserInterface,
    input: FrameInput,
    surface: RecordingSurface,
    assets: StubAssets,
}

impl Pilot {
    /// Default config and built-in theme with a `width` x `height` viewport.
    pub fn new(width: i32, height: i32) -> Self {
        Self::from_ui(UserInterface::default(), width, height)
    }

    /// Build from `config`; fails like [`UserInterface::new`].
    pub fn with_config(config: UiConfig, width: i32, height: i32) -> Result<Self> {
        let ui = UserInterface::new(config, Theme::builtin())?;
        Ok(Self::from_ui(ui, width, height))
    }

    fn from_ui(mut ui: UserInterface, width: i32, height: i32) -> Self {
        ui.resize(width, height);
        Self {
            ui,
            input: FrameInput::new(),
            surface: RecordingSurface::new(width, height),
            assets: StubAssets::new(),
        }
    }

    /// Use `assets` for subsequent draws.
    pub fn with_assets(mut self, assets: StubAssets) -> Self {
        self.assets = assets;
        self
    }

    // ── Frames ───────────────────────────────────────────────────────

    /// Run one update frame with `events`.
    pub fn frame(&mut self, events: &[InputEvent]) {
        self.input.begin_frame();
        for event in events {
            if let InputEvent::Resize { width, height } = *event {
                let (w, h) = (i32::from(width), i32::from(height));
                self.surface.resize(w, h);
                self.ui.resize(w, h);
            }
            self.input.handle_event(event);
        }
        self.ui.update(&self.input);
    }

    /// Run one update frame without new input.
    pub fn idle(&mut self) {
        self.frame(&[]);
    }

    /// Draw into a freshly cleared surface and return it.
    pub fn draw(&mut self) -> &RecordingSurface {
        self.surface.clear();
        self.ui.draw(&mut self.surface, &self.assets);
        &self.surface
    }

    // ── Pointer ──────────────────────────────────────────────────────

    pub fn move_to(&mut self, x: f32, y: f32) {
        self.frame(&[InputEvent::PointerMoved { x, y }]);
    }

    pub fn press(&mut self, button: MouseButton) {
        self.frame(&[InputEvent::ButtonDown(button)]);
    }

    pub fn release(&mut self, button: MouseButton) {
        self.frame(&[InputEvent::ButtonUp(button)]);
    }

    /// Move, press and release the left button: three frames.
    pub fn click_at(&mut self, x: f32, y: f32) {
        self.move_to(x, y);
        self.press(MouseButton::Left);
        self.release(MouseButton::Left);
    }

    /// Move, then press and release within one frame: two frames.
    pub fn tap_at(&mut self, x: f32, y: f32) {
        self.move_to(x, y);
        self.frame(&[
            InputEvent::ButtonDown(MouseButton::Left),
            InputEvent::ButtonUp(MouseButton::Left),
        ]);
    }

    /// Press at `from`, move to `to` and release: four frames.
    pub fn drag(&mut self, from: (f32, f32), to: (f32, f32)) {
        self.move_to(from.0, from.1);
        self.press(MouseButton::Left);
        self.move_to(to.0, to.1);
        self.release(MouseButton::Left);
    }

    /// Turn the wheel by `delta` notches.
    pub fn scroll(&mut self, delta: i32) {
        self.frame(&[InputEvent::Wheel(delta)]);
    }

    // ── Keyboard ─────────────────────────────────────────────────────

    /// Press and release `key` with no modifiers: two frames.
    pub fn press_key(&mut self, key: Key) {
        self.press_key_with(key, Modifiers::NONE);
    }

    pub fn press_key_with(&mut self, key: Key, modifiers: Modifiers) {
        self.frame(&[InputEvent::KeyDown(KeyEvent::new(key, modifiers))]);
        self.frame(&[InputEvent::KeyUp(key)]);
    }

    /// Enter `text` as one frame of text input.
    pub fn type_text(&mut self, text: &str) {
        let events: Vec<InputEvent> = text.chars().map(InputEvent::Text).collect();
        self.frame(&events);
    }

    /// Resize the viewport and the surface: one frame.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.frame(&[InputEvent::Resize { width, height }]);
    }

    // ── Query ────────────────────────────────────────────────────────

    pub fn ui(&self) -> &UserInterface {
        &self.ui
    }

    pub fn ui_mut(&mut self) -> &mut UserInterface {
        &mut self.ui
    }

    pub fn tree(&self) -> &EntityTree {
        self.ui.tree()
    }

    pub fn tree_mut(&mut self) -> &mut EntityTree {
        self.ui.tree_mut()
    }

    /// Input state of the last frame.
    pub fn input(&self) -> &FrameInput {
        &self.input
    }

    /// Calls recorded by the last [`draw`](Self::draw).
    pub fn surface(&self) -> &RecordingSurface {
        &self.surface
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    use crate::dom::node::{Entity, EntityId};
    use crate::event::callbacks::EventKind;
    use crate::event::provider::InputProvider;
    use crate::geometry::{Rect, Vec2};
    use crate::layout::anchor::Anchor;
    use crate::widget::traits::WidgetValue;
    use crate::widgets::{CheckBox, Panel, PanelSkin};

    fn pilot_with_checkbox() -> (Pilot, EntityId) {
        let mut pilot = Pilot::new(800, 600);
        let cb = pilot.ui_mut().spawn(
            Entity::new(Anchor::TopLeft, Vec2::new(300.0, 40.0), Vec2::new(50.0, 50.0)),
            CheckBox::new("Sound", false),
        );
        let root = pilot.ui().root();
        pilot.tree_mut().add_child(root, cb).unwrap();
        (pilot, cb)
    }

    // ── Construction ─────────────────────────────────────────────────

    #[test]
    fn new_sets_viewport() {
        let mut pilot = Pilot::new(320, 240);
        pilot.idle();
        let root = pilot.ui().root();
        assert_eq!(pilot.tree_mut().dest_rect(root), Some(Rect::new(0, 0, 320, 240)));
    }

    #[test]
    fn with_config_rejects_bad_scale() {
        assert!(Pilot::with_config(UiConfig::new().with_scale(-1.0), 10, 10).is_err());
        assert!(Pilot::with_config(UiConfig::new().with_scale(2.0), 10, 10).is_ok());
    }

    // ── Pointer ──────────────────────────────────────────────────────

    #[test]
    fn click_toggles_checkbox() {
        let (mut pilot, cb) = pilot_with_checkbox();
        pilot.click_at(60.0, 60.0);
        assert_eq!(pilot.tree().value(cb), Some(WidgetValue::Bool(true)));
        pilot.click_at(200.0, 60.0);
        assert_eq!(pilot.tree().value(cb), Some(WidgetValue::Bool(false)), "label area counts");
    }

    #[test]
    fn click_event_order() {
        let (mut pilot, cb) = pilot_with_checkbox();
        let log = Rc::new(RefCell::new(Vec::new()));
        for kind in [
            EventKind::MouseEnter,
            EventKind::MouseDown,
            EventKind::MouseReleased,
            EventKind::Click,
            EventKind::ValueChange,
        ] {
            let log = Rc::clone(&log);
            pilot.tree_mut().on(cb, kind, move |_, _| log.borrow_mut().push(kind)).unwrap();
        }
        pilot.click_at(60.0, 60.0);
        assert_eq!(
            *log.borrow(),
            vec![
                EventKind::MouseEnter,
                EventKind::MouseDown,
                EventKind::MouseReleased,
                EventKind::Click,
                EventKind::ValueChange,
            ]
        );
    }

    #[test]
    fn drag_moves_draggable_panel() {
        let mut pilot = Pilot::new(800, 600);
        let mut e = Entity::new(Anchor::TopLeft, Vec2::new(100.0, 100.0), Vec2::ZERO)
            .with_draggable(true);
        e.set_padding(Vec2::ZERO);
        let panel = pilot.ui_mut().spawn(e, Panel::new(PanelSkin::Default));
        let root = pilot.ui().root();
        pilot.tree_mut().add_child(root, panel).unwrap();

        pilot.drag((10.0, 10.0), (60.0, 30.0));
        pilot.idle();
        assert_eq!(pilot.tree_mut().dest_rect(panel), Some(Rect::new(50, 20, 100, 100)));
        assert_eq!(pilot.ui().drag_target(), None);
    }

    // ── Keyboard ─────────────────────────────────────────────────────

    #[test]
    fn keyboard_reaches_input() {
        let mut pilot = Pilot::new(100, 100);
        pilot.frame(&[InputEvent::KeyDown(KeyEvent::new(Key::Enter, Modifiers::NONE))]);
        assert!(pilot.input().key_pressed(Key::Enter));
        pilot.idle();
        assert!(pilot.input().key_down(Key::Enter));
        assert!(!pilot.input().key_pressed(Key::Enter));
        pilot.type_text("hi");
        assert_eq!(pilot.input().text(), "hi");
    }

    // ── Drawing ──────────────────────────────────────────────────────

    #[test]
    fn resize_then_draw() {
        let (mut pilot, _) = pilot_with_checkbox();
        pilot.resize(1024, 768);
        let surface = pilot.draw();
        assert_eq!(surface.texture_dests("checkbox"), vec![Rect::new(50, 50, 40, 40)]);
        assert_eq!(surface.texts(), vec!["Sound"]);
        assert_eq!(pilot.ui().tree().viewport(), Rect::new(0, 0, 1024, 768));
    }
}
