//! UserInterface: the root manager that drives update and draw each frame.
//!
//! [`UserInterface`] owns the [`EntityTree`], remembers the sticky active
//! entity and the transient target, and runs the two-phase frame cycle:
//! [`update`](UserInterface::update) with the frame's input, then
//! [`draw`](UserInterface::draw) onto the host surface. Several interfaces may
//! coexist; nothing is process-global.

use serde::{Deserialize, Serialize};

use crate::document::LayoutDocument;
use crate::dom::node::{CursorKind, Entity, EntityId};
use crate::dom::tree::EntityTree;
use crate::error::{ErrorPolicy, Result, UiError};
use crate::event::callbacks::EventKind;
use crate::event::dispatch::{DispatchState, FrameInfo};
use crate::event::input::MouseButton;
use crate::event::provider::InputProvider;
use crate::geometry::{Rect, Vec2};
use crate::layout::engine::LayoutTuning;
use crate::style::color::Color;
use crate::style::theme::{Theme, ThemeAssets};
use crate::widget::draw::{BatchState, RenderSurface};
use crate::widget::scroll::ScrollScope;
use crate::widget::traits::Widget;

/// Cursor size used when the assets do not report the texture size.
const FALLBACK_CURSOR_SIZE: (i32, i32) = (32, 32);

// ---------------------------------------------------------------------------
// UiConfig
// ---------------------------------------------------------------------------

/// Configuration for a [`UserInterface`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Global scale applied to sizes, offsets and the cursor.
    pub scale: f32,
    /// Register clicks on release even when the press started elsewhere.
    pub promiscuous_clicks: bool,
    /// Turn invalid-state and not-found errors into no-ops.
    pub silent_soft_errors: bool,
    /// Draw the cursor overlay.
    pub show_cursor: bool,
    /// Cursor size multiplier, on top of the global scale.
    pub cursor_scale: f32,
    /// Auto-height rounding constants.
    pub tuning: LayoutTuning,
    /// Drag limit given to entities spawned through
    /// [`UserInterface::spawn`].
    pub limit_drag_to_parent: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            scale: 1.0,
            promiscuous_clicks: false,
            silent_soft_errors: false,
            show_cursor: true,
            cursor_scale: 1.0,
            tuning: LayoutTuning::default(),
            limit_drag_to_parent: true,
        }
    }
}

impl UiConfig {
    /// Create a new default config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the global scale (builder).
    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    /// Set promiscuous click mode (builder).
    pub fn with_promiscuous_clicks(mut self, enabled: bool) -> Self {
        self.promiscuous_clicks = enabled;
        self
    }

    /// Set the soft-error policy (builder).
    pub fn with_silent_soft_errors(mut self, silent: bool) -> Self {
        self.silent_soft_errors = silent;
        self
    }

    /// Show or hide the cursor overlay (builder).
    pub fn with_cursor(mut self, show: bool, scale: f32) -> Self {
        self.show_cursor = show;
        self.cursor_scale = scale;
        self
    }

    /// Set the auto-height constants (builder).
    pub fn with_tuning(mut self, tuning: LayoutTuning) -> Self {
        self.tuning = tuning;
        self
    }

    /// Set the default drag limit (builder).
    pub fn with_limit_drag_to_parent(mut self, limit: bool) -> Self {
        self.limit_drag_to_parent = limit;
        self
    }

    /// Parse a config from RON; missing fields keep their defaults.
    pub fn from_ron(text: &str) -> Result<Self> {
        ron::from_str(text).map_err(|e| UiError::Document(e.to_string()))
    }

    pub fn to_ron(&self) -> Result<String> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| UiError::Document(e.to_string()))
    }

    fn policy(&self) -> ErrorPolicy {
        ErrorPolicy { silent_soft_errors: self.silent_soft_errors }
    }
}

// ---------------------------------------------------------------------------
// UserInterface
// ---------------------------------------------------------------------------

/// The root manager.
///
/// # Examples
///
/// ```ignore
/// let mut ui = UserInterface::new(UiConfig::default(), Theme::builtin())?;
/// let ok = ui.spawn(Entity::default(), Button::new("OK"));
/// ui.tree_mut().add_child(ui.root(), ok)?;
///
/// loop {
///     input.begin_frame();
///     input.handle_events(&events);
///     ui.update(&input);
///     // ... game update ...
///     ui.draw(&mut surface, &assets);
/// }
/// ```
pub struct UserInterface {
    tree: EntityTree,
    config: UiConfig,
    active: EntityId,
    dispatch: DispatchState,
    cursor: CursorKind,
    pointer: Vec2,
}

impl std::fmt::Debug for UserInterface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserInterface")
            .field("tree", &self.tree)
            .field("config", &self.config)
            .field("active", &self.active)
            .field("target", &self.dispatch.target)
            .finish_non_exhaustive()
    }
}

impl Default for UserInterface {
    /// Default config with the built-in theme.
    fn default() -> Self {
        Self::build(UiConfig::default(), Theme::builtin())
    }
}

impl UserInterface {
    /// Create an interface holding only the root panel.
    ///
    /// Fails when the configured scale is not a positive finite number.
    pub fn new(config: UiConfig, theme: Theme) -> Result<Self> {
        let mut ui = Self::build(config, theme);
        ui.tree.set_scale(ui.config.scale)?;
        log::debug!("user interface created: {:?}", ui.config);
        Ok(ui)
    }

    fn build(config: UiConfig, theme: Theme) -> Self {
        let mut tree = EntityTree::new(theme);
        tree.policy = config.policy();
        tree.tuning = config.tuning;
        let root = tree.root();
        Self {
            tree,
            config,
            active: root,
            dispatch: DispatchState::default(),
            cursor: CursorKind::Default,
            pointer: Vec2::ZERO,
        }
    }

    // ── Access ───────────────────────────────────────────────────────

    pub fn tree(&self) -> &EntityTree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut EntityTree {
        &mut self.tree
    }

    pub fn config(&self) -> &UiConfig {
        &self.config
    }

    pub fn root(&self) -> EntityId {
        self.tree.root()
    }

    /// Spawn a detached entity, applying the configured drag limit.
    pub fn spawn(&mut self, mut entity: Entity, widget: impl Widget) -> EntityId {
        entity.limit_drag_to_parent = self.config.limit_drag_to_parent;
        self.tree.spawn(entity, widget)
    }

    /// Sticky entity that last received a press; the root when none did.
    pub fn active(&self) -> EntityId {
        self.active
    }

    /// Entity under the pointer after the last update.
    pub fn target(&self) -> Option<EntityId> {
        self.dispatch.target
    }

    /// Entity holding the current drag press.
    pub fn drag_target(&self) -> Option<EntityId> {
        self.dispatch.drag_target
    }

    /// Cursor requested by the current target.
    pub fn cursor(&self) -> CursorKind {
        self.cursor
    }

    // ── Settings ─────────────────────────────────────────────────────

    /// Resize the viewport the root covers.
    pub fn resize(&mut self, width: i32, height: i32) {
        self.tree.set_viewport(Rect::new(0, 0, width, height));
    }

    pub fn set_scale(&mut self, scale: f32) -> Result<()> {
        self.tree.set_scale(scale)?;
        self.config.scale = scale;
        Ok(())
    }

    pub fn set_promiscuous_clicks(&mut self, enabled: bool) {
        self.config.promiscuous_clicks = enabled;
    }

    pub fn set_silent_soft_errors(&mut self, silent: bool) {
        self.config.silent_soft_errors = silent;
        self.tree.policy = self.config.policy();
    }

    pub fn set_show_cursor(&mut self, show: bool) {
        self.config.show_cursor = show;
    }

    /// Register a callback fired for `kind` on every entity.
    pub fn on_global(
        &mut self,
        kind: EventKind,
        callback: impl FnMut(&mut EntityTree, EntityId) + 'static,
    ) {
        self.tree.on_global(kind, callback);
    }

    // ── Frame cycle ──────────────────────────────────────────────────

    /// Run one update pass with this frame's input.
    ///
    /// Call before the host's own game-state update.
    pub fn update(&mut self, input: &dyn InputProvider) {
        let left_down = input.button_down(MouseButton::Left);
        if !left_down {
            if let Some(released) = self.dispatch.drag_target.take() {
                log::trace!("drag target {released:?} released");
            }
        }
        let previous = self.dispatch.target;
        self.dispatch.begin_frame();

        let root = self.tree.root();
        if !self.tree.is_attached(self.active) {
            self.active = root;
        }
        self.pointer = input.pointer_position();
        self.tree.update_layout();

        let frame = FrameInfo {
            input,
            active: self.active,
            promiscuous_clicks: self.config.promiscuous_clicks,
        };
        self.tree.dispatch_frame(&frame, &mut self.dispatch);

        if left_down || input.button_pressed(MouseButton::Left) {
            self.active = self.dispatch.target.unwrap_or(root);
        }
        if previous != self.dispatch.target {
            log::trace!("target {previous:?} -> {:?}", self.dispatch.target);
        }
        self.cursor = self
            .dispatch
            .target
            .and_then(|target| self.tree.entity(target))
            .map_or(CursorKind::Default, |e| e.cursor);
    }

    /// Draw the tree, then the cursor overlay.
    ///
    /// A viewport size change re-lays out from the root.
    pub fn draw(&mut self, surface: &mut dyn RenderSurface, assets: &dyn ThemeAssets) {
        let (width, height) = surface.viewport_size();
        self.resize(width, height);
        self.tree.update_layout();
        let root = self.tree.root();
        self.tree.draw_entity(root, surface, assets, ScrollScope::NONE);
        if self.config.show_cursor {
            self.draw_cursor(surface, assets);
        }
    }

    fn draw_cursor(&self, surface: &mut dyn RenderSurface, assets: &dyn ThemeAssets) {
        let key = self.cursor.texture_key();
        let Some(texture) = assets.texture(key) else {
            log::warn!("missing cursor texture '{key}'");
            return;
        };
        let (w, h) = assets.texture_size(texture).unwrap_or(FALLBACK_CURSOR_SIZE);
        let factor = self.config.cursor_scale * self.tree.scale();
        let dest = Rect::new(
            self.pointer.x as i32,
            self.pointer.y as i32,
            (w as f32 * factor) as i32,
            (h as f32 * factor) as i32,
        );
        surface.begin(BatchState::default());
        surface.draw_texture(texture, dest, None, Color::WHITE, 0.0);
        surface.end();
    }

    // ── Persistence ──────────────────────────────────────────────────

    /// Serialize the root's children to RON.
    pub fn save_layout(&self) -> Result<String> {
        LayoutDocument::save(&self.tree).to_ron()
    }

    /// Replace the root's children with a RON layout.
    pub fn load_layout(&mut self, text: &str) -> Result<()> {
        LayoutDocument::from_ron(text)?.load(&mut self.tree)?;
        self.reset_interaction();
        Ok(())
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    /// Destroy every entity but the root and drop the global callbacks.
    pub fn shutdown(&mut self) {
        let root = self.tree.root();
        for child in self.tree.children(root).to_vec() {
            if let Err(err) = self.tree.destroy(child) {
                log::warn!("failed to destroy {child:?} during shutdown: {err}");
            }
        }
        self.tree.clear_all_global_callbacks();
        self.reset_interaction();
        log::debug!("user interface shut down");
    }

    fn reset_interaction(&mut self) {
        self.active = self.tree.root();
        self.dispatch = DispatchState::default();
        self.cursor = CursorKind::Default;
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    use pretty_assertions::assert_eq;

    use crate::event::input::InputEvent;
    use crate::event::provider::FrameInput;
    use crate::layout::anchor::Anchor;
    use crate::testing::{RecordingSurface, StubAssets};
    use crate::widgets::{Button, Panel, PanelSkin};

    fn ui() -> UserInterface {
        let mut ui = UserInterface::default();
        ui.resize(800, 600);
        ui
    }

    fn button_at(ui: &mut UserInterface, x: f32, y: f32) -> EntityId {
        let id = ui.spawn(
            Entity::new(Anchor::TopLeft, Vec2::new(100.0, 50.0), Vec2::new(x, y)),
            Button::new("OK"),
        );
        let root = ui.root();
        ui.tree_mut().add_child(root, id).unwrap();
        id
    }

    fn frame(ui: &mut UserInterface, input: &mut FrameInput, events: &[InputEvent]) {
        input.begin_frame();
        input.handle_events(events);
        ui.update(input);
    }

    // ── UiConfig ─────────────────────────────────────────────────────

    #[test]
    fn config_defaults() {
        let config = UiConfig::default();
        assert_eq!(config.scale, 1.0);
        assert!(!config.promiscuous_clicks);
        assert!(config.show_cursor);
        assert_eq!(config.tuning, LayoutTuning { auto_height_slack: 4, auto_height_epsilon: 2 });
    }

    #[test]
    fn config_builder_chain() {
        let config = UiConfig::new()
            .with_scale(2.0)
            .with_promiscuous_clicks(true)
            .with_silent_soft_errors(true)
            .with_cursor(false, 0.5)
            .with_limit_drag_to_parent(false);
        assert_eq!(config.scale, 2.0);
        assert!(config.promiscuous_clicks);
        assert!(config.silent_soft_errors);
        assert!(!config.show_cursor);
        assert_eq!(config.cursor_scale, 0.5);
        assert!(!config.limit_drag_to_parent);
    }

    #[test]
    fn config_from_partial_ron() {
        let config = UiConfig::from_ron("(scale: 1.5, promiscuous_clicks: true)").unwrap();
        assert_eq!(config.scale, 1.5);
        assert!(config.promiscuous_clicks);
        assert!(config.show_cursor);
        let again = UiConfig::from_ron(&config.to_ron().unwrap()).unwrap();
        assert_eq!(again, config);
        assert!(matches!(UiConfig::from_ron("(scale: "), Err(UiError::Document(_))));
    }

    #[test]
    fn invalid_scale_is_rejected() {
        let err = UserInterface::new(UiConfig::new().with_scale(0.0), Theme::builtin());
        assert!(matches!(err, Err(UiError::InvalidValue(_))));
        let mut ui = ui();
        assert!(ui.set_scale(f32::NAN).is_err());
        assert_eq!(ui.tree().scale(), 1.0);
    }

    #[test]
    fn lenient_config_silences_soft_errors() {
        let mut ui = UserInterface::new(UiConfig::new().with_silent_soft_errors(true), Theme::builtin())
            .unwrap();
        let a = button_at(&mut ui, 0.0, 0.0);
        let root = ui.root();
        assert!(ui.tree_mut().add_child(root, a).is_ok());
        ui.set_silent_soft_errors(false);
        assert!(ui.tree_mut().add_child(root, a).is_err());
    }

    // ── Update ───────────────────────────────────────────────────────

    #[test]
    fn target_and_cursor_follow_pointer() {
        let mut ui = ui();
        let mut input = FrameInput::new();
        let b = button_at(&mut ui, 10.0, 10.0);

        frame(&mut ui, &mut input, &[InputEvent::PointerMoved { x: 20.0, y: 20.0 }]);
        assert_eq!(ui.target(), Some(b));
        assert_eq!(ui.cursor(), CursorKind::Pointer);

        frame(&mut ui, &mut input, &[InputEvent::PointerMoved { x: 500.0, y: 500.0 }]);
        assert_eq!(ui.target(), None);
        assert_eq!(ui.cursor(), CursorKind::Default);
    }

    #[test]
    fn active_is_sticky_until_next_press() {
        let mut ui = ui();
        let mut input = FrameInput::new();
        let b = button_at(&mut ui, 10.0, 10.0);

        frame(&mut ui, &mut input, &[InputEvent::PointerMoved { x: 20.0, y: 20.0 }]);
        assert_eq!(ui.active(), ui.root());
        frame(&mut ui, &mut input, &[InputEvent::ButtonDown(MouseButton::Left)]);
        assert_eq!(ui.active(), b);
        frame(&mut ui, &mut input, &[InputEvent::ButtonUp(MouseButton::Left)]);
        frame(&mut ui, &mut input, &[InputEvent::PointerMoved { x: 500.0, y: 500.0 }]);
        assert_eq!(ui.active(), b);

        frame(&mut ui, &mut input, &[InputEvent::ButtonDown(MouseButton::Left)]);
        assert_eq!(ui.active(), ui.root());
    }

    #[test]
    fn detached_active_falls_back_to_root() {
        let mut ui = ui();
        let mut input = FrameInput::new();
        let b = button_at(&mut ui, 10.0, 10.0);
        frame(&mut ui, &mut input, &[InputEvent::PointerMoved { x: 20.0, y: 20.0 }]);
        frame(&mut ui, &mut input, &[InputEvent::ButtonDown(MouseButton::Left)]);
        assert_eq!(ui.active(), b);
        ui.tree_mut().remove_from_parent(b).unwrap();
        frame(&mut ui, &mut input, &[InputEvent::ButtonUp(MouseButton::Left)]);
        assert_eq!(ui.active(), ui.root());
    }

    #[test]
    fn global_callbacks_fire_for_any_entity() {
        let mut ui = ui();
        let mut input = FrameInput::new();
        let b = button_at(&mut ui, 10.0, 10.0);
        let clicked = Rc::new(Cell::new(None));
        let seen = Rc::clone(&clicked);
        ui.on_global(EventKind::Click, move |_, id| seen.set(Some(id)));

        frame(&mut ui, &mut input, &[InputEvent::PointerMoved { x: 20.0, y: 20.0 }]);
        frame(&mut ui, &mut input, &[InputEvent::ButtonDown(MouseButton::Left)]);
        frame(&mut ui, &mut input, &[InputEvent::ButtonUp(MouseButton::Left)]);
        assert_eq!(clicked.get(), Some(b));
    }

    #[test]
    fn spawn_applies_drag_limit() {
        let mut ui = UserInterface::new(
            UiConfig::new().with_limit_drag_to_parent(false),
            Theme::builtin(),
        )
        .unwrap();
        let id = ui.spawn(Entity::default(), Panel::new(PanelSkin::Default));
        assert!(!ui.tree().entity(id).unwrap().limit_drag_to_parent);
    }

    // ── Draw ─────────────────────────────────────────────────────────

    #[test]
    fn draw_resizes_root_and_overlays_cursor() {
        let mut ui = ui();
        let mut input = FrameInput::new();
        let _b = button_at(&mut ui, 10.0, 10.0);
        frame(&mut ui, &mut input, &[InputEvent::PointerMoved { x: 20.0, y: 30.0 }]);

        let mut surface = RecordingSurface::new(1024, 768);
        ui.draw(&mut surface, &StubAssets::new());
        assert_eq!(ui.tree().viewport(), Rect::new(0, 0, 1024, 768));
        assert_eq!(surface.texture_keys().last(), Some(&"cursor_pointer"));
        assert_eq!(surface.texture_dests("cursor_pointer"), vec![Rect::new(20, 30, 32, 32)]);
        assert_eq!(surface.texture_dests("button_default_hover"), vec![Rect::new(10, 10, 100, 50)]);
    }

    #[test]
    fn hidden_cursor_is_not_drawn() {
        let mut ui = ui();
        ui.set_show_cursor(false);
        let mut surface = RecordingSurface::new(800, 600);
        ui.draw(&mut surface, &StubAssets::new());
        assert!(surface.texture_dests("cursor_default").is_empty());
    }

    // ── Persistence and lifecycle ────────────────────────────────────

    #[test]
    fn layout_round_trip_through_ui() {
        let mut ui = ui();
        let b = button_at(&mut ui, 10.0, 10.0);
        ui.tree_mut().entity_mut(b).unwrap().identifier = "ok".into();
        let text = ui.save_layout().unwrap();

        let mut other = UserInterface::default();
        other.resize(800, 600);
        other.load_layout(&text).unwrap();
        let restored = other.tree().find_by_identifier("ok").unwrap();
        assert_eq!(other.tree_mut().dest_rect(restored), Some(Rect::new(10, 10, 100, 50)));
        assert!(other.load_layout("not ron").is_err());
    }

    #[test]
    fn shutdown_clears_everything_but_root() {
        let mut ui = ui();
        let b = button_at(&mut ui, 10.0, 10.0);
        ui.on_global(EventKind::Click, |_, _| panic!("globals must be cleared"));
        ui.shutdown();
        assert!(!ui.tree().contains(b));
        assert_eq!(ui.tree().len(), 1);
        let root = ui.root();
        ui.tree_mut().fire(root, EventKind::Click);
    }
}
