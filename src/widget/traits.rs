//! Widget traits: layout hooks, drawing, interaction, values.
//!
//! The core owns everything that is common to all entities (tree links,
//! layout inputs, interaction state, callbacks). A [`Widget`] only adds what
//! differs per kind: its default size and visible extent, how it draws, how it
//! reacts to clicks and the wheel, and the value it holds.

use std::any::Any;

use crate::document::WidgetRecord;
use crate::dom::node::{EntityId, Entity};
use crate::dom::tree::EntityTree;
use crate::error::{Result, UiError};
use crate::geometry::{Rect, Vec2};
use crate::style::theme::Theme;
use crate::widget::draw::{DrawArgs, DrawContext};

// ---------------------------------------------------------------------------
// Values
// ---------------------------------------------------------------------------

/// A value held by a value-holding widget.
#[derive(Debug, Clone, PartialEq)]
pub enum WidgetValue {
    Bool(bool),
    Float(f32),
    Text(String),
}

impl WidgetValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            WidgetValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            WidgetValue::Text(v) => Some(v),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Hooks
// ---------------------------------------------------------------------------

/// Read-only inputs available while computing layout.
#[derive(Debug, Clone, Copy)]
pub struct LayoutContext<'a> {
    pub theme: &'a Theme,
    pub scale: f32,
}

/// Layout hooks.
pub trait Layoutable {
    /// Size used for placeholder size components. A theme `DefaultSize`
    /// property overrides it.
    fn default_size(&self) -> Vec2;

    /// Visible extent when it differs from the destination rectangle.
    fn actual_rect(&self, entity: &Entity, dest: Rect, ctx: &LayoutContext<'_>) -> Option<Rect> {
        let _ = (entity, dest, ctx);
        None
    }

    /// Grow to fit children after they are laid out.
    fn auto_height(&self) -> bool {
        false
    }

    /// Called after the children were laid out, with the union of their
    /// rectangles (if any child is visible).
    fn children_laid_out(&mut self, internal: Rect, content: Option<Rect>) {
        let _ = (internal, content);
    }
}

/// Drawing hook, called once per pass.
pub trait Drawable {
    /// Draw the widget's visual into `args.dest` tinted with `args.tint`.
    fn draw(&self, entity: &Entity, args: &DrawArgs, ctx: &mut DrawContext<'_>);
}

/// Widgets holding a user-editable value.
pub trait ValueHolder {
    fn value(&self) -> WidgetValue;

    /// Replace the value. Returns `true` if it changed; a value of the wrong
    /// kind is an error.
    fn set_value(&mut self, value: WidgetValue) -> Result<bool>;
}

/// Interaction hooks.
pub trait Interactable {
    /// Claims the drag target on press even when not draggable.
    fn naturally_interactive(&self) -> bool {
        false
    }

    /// React to a click. Returns `true` if the held value changed.
    fn on_click(&mut self, entity: &mut Entity) -> bool {
        let _ = entity;
        false
    }

    /// React to the mouse wheel at global `scale`. Returns `true` if
    /// anything moved.
    fn on_mouse_wheel(&mut self, delta: i32, scale: f32) -> bool {
        let _ = (delta, scale);
        false
    }

    /// Translation applied to children while drawing and hit testing.
    fn scroll_offset(&self) -> Vec2 {
        Vec2::ZERO
    }

    /// Children are only drawn and hit inside the internal rectangle.
    fn clips_children(&self) -> bool {
        false
    }
}

// ---------------------------------------------------------------------------
// Widget
// ---------------------------------------------------------------------------

/// Core trait implemented by every widget kind.
///
/// Object-safe; concrete widgets are reached through [`as_any`](Self::as_any).
pub trait Widget: Layoutable + Drawable + Interactable + Any {
    /// The widget kind name (e.g. "Panel", "Button").
    fn widget_type(&self) -> &'static str;

    /// Style kinds cascaded after the `Entity` base, in order.
    fn style_kinds(&self) -> Vec<&'static str> {
        vec![self.widget_type()]
    }

    /// Adjust entity flags the widget kind depends on, before spawning.
    fn init_entity(&self, entity: &mut Entity) {
        let _ = entity;
    }

    /// Internal children created when the widget is spawned.
    fn compose(&mut self) -> Vec<(Entity, Box<dyn Widget>)> {
        Vec::new()
    }

    /// Re-resolve references to internal children after they were attached.
    fn relink(&mut self, tree: &EntityTree, id: EntityId) -> Result<()> {
        let _ = (tree, id);
        Ok(())
    }

    /// Value access, for value-holding widgets.
    fn value_holder(&self) -> Option<&dyn ValueHolder> {
        None
    }

    fn value_holder_mut(&mut self) -> Option<&mut dyn ValueHolder> {
        None
    }

    /// Serializable form of the widget-specific state.
    fn to_record(&self) -> WidgetRecord;

    /// Downcast to `&dyn Any` for runtime type inspection.
    fn as_any(&self) -> &dyn Any;

    /// Downcast to `&mut dyn Any` for mutable runtime type inspection.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Look up the child of `id` whose identifier is `identifier`.
pub(crate) fn find_internal_child(
    tree: &EntityTree,
    id: EntityId,
    identifier: &str,
) -> Result<EntityId> {
    tree.children(id)
        .iter()
        .copied()
        .find(|child| tree.entity(*child).is_some_and(|e| e.identifier == identifier))
        .ok_or_else(|| UiError::not_found("internal child", identifier))
}
