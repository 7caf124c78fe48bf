//! Entity types: EntityId, Entity, CursorKind.

use serde::{Deserialize, Serialize};
use slotmap::new_key_type;

use crate::geometry::Vec2;
use crate::layout::anchor::Anchor;
use crate::layout::cache::LayoutCache;
use crate::layout::resolve::DragState;
use crate::style::color::Color;
use crate::style::property::{names, EntityState, StyleProperty};
use crate::style::sheet::StyleSheet;

new_key_type! {
    /// Unique identifier for an entity. Copy, lightweight (u64).
    pub struct EntityId;
}

/// Pointer cursor shown while hovering an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CursorKind {
    #[default]
    Default,
    Pointer,
    IBeam,
}

impl CursorKind {
    /// Texture key of the cursor image.
    pub fn texture_key(self) -> &'static str {
        match self {
            CursorKind::Default => "cursor_default",
            CursorKind::Pointer => "cursor_pointer",
            CursorKind::IBeam => "cursor_ibeam",
        }
    }
}

/// Widget-independent state of a single entity.
///
/// Layout inputs are private and go through setters so that changing them
/// marks the layout cache dirty. Tree links (parent, children, background)
/// live in [`EntityTree`](crate::dom::EntityTree).
#[derive(Debug, Clone)]
pub struct Entity {
    /// Free-form name used by lookups and document relinking.
    pub identifier: String,
    anchor: Anchor,
    offset: Vec2,
    size: Vec2,
    min_size: Option<Vec2>,
    max_size: Option<Vec2>,
    style: StyleSheet,

    pub(crate) visible: bool,
    /// Disabled entities are drawn but receive no input.
    pub enabled: bool,
    /// Locked entities receive no input and are not drawn differently.
    pub locked: bool,
    draggable: bool,
    /// Keep a dragged entity inside its parent.
    pub limit_drag_to_parent: bool,
    /// Never claim the pointer; children are still updated.
    pub click_through: bool,
    /// Receive events even while the direct parent is locked.
    pub events_through_locked_parent: bool,
    /// Hit-test against the visible extent instead of the destination rectangle.
    pub use_actual_size_for_collision: bool,
    /// Extra pixels around the collision rectangle.
    pub extra_collision_margin: i32,
    pub(crate) priority_bonus: i32,
    pub cursor: CursorKind,

    pub(crate) state: EntityState,
    pub(crate) focused: bool,
    pub(crate) drag: DragState,
    pub(crate) layout: LayoutCache,
    pub(crate) propagate_to: Vec<EntityId>,
}

impl Default for Entity {
    fn default() -> Self {
        Self::new(Anchor::Auto, Vec2::DEFAULT_SIZE, Vec2::ZERO)
    }
}

impl Entity {
    /// Create entity state with the given layout inputs and default flags.
    pub fn new(anchor: Anchor, size: Vec2, offset: Vec2) -> Self {
        Self {
            identifier: String::new(),
            anchor,
            offset,
            size,
            min_size: None,
            max_size: None,
            style: StyleSheet::new(),
            visible: true,
            enabled: true,
            locked: false,
            draggable: false,
            limit_drag_to_parent: true,
            click_through: false,
            events_through_locked_parent: false,
            use_actual_size_for_collision: false,
            extra_collision_margin: 0,
            priority_bonus: 0,
            cursor: CursorKind::Default,
            state: EntityState::Default,
            focused: false,
            drag: DragState::default(),
            layout: LayoutCache::default(),
            propagate_to: Vec::new(),
        }
    }

    // ── Builders ─────────────────────────────────────────────────────

    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = identifier.into();
        self
    }

    pub fn with_anchor(mut self, anchor: Anchor) -> Self {
        self.anchor = anchor;
        self
    }

    pub fn with_size(mut self, size: Vec2) -> Self {
        self.size = size;
        self
    }

    pub fn with_offset(mut self, offset: Vec2) -> Self {
        self.offset = offset;
        self
    }

    /// Set an instance style override for `state` (builder).
    pub fn with_style(
        mut self,
        property: &str,
        value: impl Into<StyleProperty>,
        state: EntityState,
    ) -> Self {
        self.style.set(property, value, state);
        self
    }

    pub fn with_draggable(mut self, draggable: bool) -> Self {
        self.set_draggable(draggable);
        self
    }

    pub fn with_click_through(mut self, click_through: bool) -> Self {
        self.click_through = click_through;
        self
    }

    pub fn with_cursor(mut self, cursor: CursorKind) -> Self {
        self.cursor = cursor;
        self
    }

    // ── Layout inputs ────────────────────────────────────────────────

    pub fn anchor(&self) -> Anchor {
        self.anchor
    }

    pub fn set_anchor(&mut self, anchor: Anchor) {
        if self.anchor != anchor {
            self.anchor = anchor;
            self.mark_dirty();
        }
    }

    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    pub fn set_offset(&mut self, offset: Vec2) {
        if self.offset != offset {
            self.offset = offset;
            self.mark_dirty();
        }
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    pub fn set_size(&mut self, size: Vec2) {
        if self.size != size {
            self.size = size;
            self.mark_dirty();
        }
    }

    pub fn min_size(&self) -> Option<Vec2> {
        self.min_size
    }

    pub fn set_min_size(&mut self, min: Option<Vec2>) {
        self.min_size = min;
        self.mark_dirty();
    }

    pub fn max_size(&self) -> Option<Vec2> {
        self.max_size
    }

    pub fn set_max_size(&mut self, max: Option<Vec2>) {
        self.max_size = max;
        self.mark_dirty();
    }

    pub fn is_draggable(&self) -> bool {
        self.draggable
    }

    /// Enabling dragging re-snapshots the position on the next layout pass.
    pub fn set_draggable(&mut self, draggable: bool) {
        if self.draggable != draggable {
            self.draggable = draggable;
            self.drag = DragState { needs_init: draggable, ..DragState::default() };
            self.mark_dirty();
        }
    }

    /// Reset the accumulated drag so the next layout pass re-anchors.
    pub fn reset_drag(&mut self) {
        self.drag = DragState { needs_init: self.draggable, ..DragState::default() };
        self.mark_dirty();
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.dragging
    }

    pub fn priority_bonus(&self) -> i32 {
        self.priority_bonus
    }

    pub fn mark_dirty(&mut self) {
        self.layout.mark_dirty();
    }

    pub fn is_dirty(&self) -> bool {
        self.layout.is_dirty()
    }

    /// Layout version; bumps on every recomputation.
    pub fn layout_version(&self) -> u64 {
        self.layout.version()
    }

    // ── Flags and state ──────────────────────────────────────────────

    /// Own visibility flag; ancestors are not consulted.
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn state(&self) -> EntityState {
        self.state
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    /// Targets that also receive every event fired on this entity.
    pub fn propagation_targets(&self) -> &[EntityId] {
        &self.propagate_to
    }

    // ── Style ────────────────────────────────────────────────────────

    pub fn style(&self) -> &StyleSheet {
        &self.style
    }

    /// Replace the whole sheet.
    pub fn replace_style(&mut self, sheet: StyleSheet) {
        self.style = sheet;
        self.mark_dirty();
    }

    /// Set one property. Only layout-affecting values mark the entity dirty.
    pub fn set_style(&mut self, property: &str, value: impl Into<StyleProperty>, state: EntityState) {
        let value = value.into();
        if value.affects_layout() {
            self.mark_dirty();
        }
        self.style.set(property, value, state);
    }

    /// Resolve a property for the current state, falling back to default.
    pub fn style_property(&self, property: &str) -> Option<&StyleProperty> {
        self.style.get(property, self.state, true)
    }

    /// Color at the current state.
    pub fn style_color(&self, property: &str) -> Option<Color> {
        self.style.color(property, self.state)
    }

    /// Padding in unscaled pixels.
    pub fn padding(&self) -> Vec2 {
        self.style.vector(names::PADDING, EntityState::Default).unwrap_or(Vec2::ZERO)
    }

    pub fn set_padding(&mut self, padding: Vec2) {
        self.set_style(names::PADDING, padding, EntityState::Default);
    }

    pub fn space_before(&self) -> Vec2 {
        self.style.vector(names::SPACE_BEFORE, EntityState::Default).unwrap_or(Vec2::ZERO)
    }

    pub fn set_space_before(&mut self, space: Vec2) {
        self.set_style(names::SPACE_BEFORE, space, EntityState::Default);
    }

    pub fn space_after(&self) -> Vec2 {
        self.style.vector(names::SPACE_AFTER, EntityState::Default).unwrap_or(Vec2::ZERO)
    }

    pub fn set_space_after(&mut self, space: Vec2) {
        self.set_style(names::SPACE_AFTER, space, EntityState::Default);
    }

    pub fn fill_color(&self) -> Color {
        self.style_color(names::FILL_COLOR).unwrap_or(Color::WHITE)
    }

    pub fn set_fill_color(&mut self, color: Color) {
        self.set_style(names::FILL_COLOR, color, EntityState::Default);
    }

    /// Default-size override from the `DefaultSize` property.
    pub fn default_size_override(&self) -> Option<Vec2> {
        self.style.vector(names::DEFAULT_SIZE, EntityState::Default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clean() -> Entity {
        let mut e = Entity::default();
        e.layout.commit(
            crate::layout::cache::LayoutResult {
                dest: crate::geometry::Rect::EMPTY,
                internal: crate::geometry::Rect::EMPTY,
                actual: crate::geometry::Rect::EMPTY,
                flow: crate::geometry::Rect::EMPTY,
            },
            None,
            None,
        );
        e
    }

    #[test]
    fn defaults() {
        let e = Entity::default();
        assert_eq!(e.anchor(), Anchor::Auto);
        assert_eq!(e.size(), Vec2::DEFAULT_SIZE);
        assert!(e.is_visible());
        assert!(e.enabled);
        assert!(!e.locked);
        assert!(e.is_dirty());
        assert_eq!(e.state(), EntityState::Default);
    }

    #[test]
    fn builders() {
        let e = Entity::new(Anchor::TopLeft, Vec2::new(10.0, 20.0), Vec2::ONE)
            .with_identifier("ok")
            .with_cursor(CursorKind::Pointer)
            .with_click_through(true)
            .with_style(names::SCALE, 2.0f32, EntityState::Default);
        assert_eq!(e.identifier, "ok");
        assert_eq!(e.cursor, CursorKind::Pointer);
        assert!(e.click_through);
        assert_eq!(e.style().float(names::SCALE, EntityState::Default), Some(2.0));
    }

    #[test]
    fn layout_setters_mark_dirty() {
        let mut e = clean();
        e.set_size(Vec2::new(5.0, 5.0));
        assert!(e.is_dirty());

        let mut e = clean();
        e.set_anchor(Anchor::Auto);
        assert!(!e.is_dirty(), "unchanged value keeps the cache");
        e.set_anchor(Anchor::Center);
        assert!(e.is_dirty());
    }

    #[test]
    fn color_style_keeps_layout() {
        let mut e = clean();
        e.set_fill_color(Color::BLACK);
        assert!(!e.is_dirty());
        assert_eq!(e.fill_color(), Color::BLACK);

        e.set_padding(Vec2::new(4.0, 4.0));
        assert!(e.is_dirty());
        assert_eq!(e.padding(), Vec2::new(4.0, 4.0));
    }

    #[test]
    fn draggable_requests_snapshot() {
        let mut e = clean();
        e.set_draggable(true);
        assert!(e.is_draggable());
        assert!(e.drag.needs_init);
        assert!(e.is_dirty());
    }

    #[test]
    fn cursor_keys() {
        assert_eq!(CursorKind::Default.texture_key(), "cursor_default");
        assert_eq!(CursorKind::IBeam.texture_key(), "cursor_ibeam");
    }
}
