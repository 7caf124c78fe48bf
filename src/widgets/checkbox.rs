//! CheckBox widget: a toggle box with a label, holding a bool value.

use std::any::Any;

use crate::document::WidgetRecord;
use crate::dom::node::{CursorKind, Entity, EntityId};
use crate::dom::tree::EntityTree;
use crate::error::{Result, UiError};
use crate::geometry::{Rect, Vec2};
use crate::layout::anchor::Anchor;
use crate::style::property::{names, EntityState};
use crate::widget::draw::{DrawArgs, DrawContext};
use crate::widget::traits::{
    find_internal_child, Drawable, Interactable, Layoutable, ValueHolder, Widget, WidgetValue,
};
use crate::widgets::paragraph::Paragraph;

/// Identifier of a checkbox's internal label.
pub const CHECKBOX_LABEL: &str = "_checkbox_label";

/// A two-state toggle.
#[derive(Debug, Clone, Default)]
pub struct CheckBox {
    checked: bool,
    initial_text: String,
    label: Option<EntityId>,
}

impl CheckBox {
    pub fn new(text: impl Into<String>, checked: bool) -> Self {
        Self { checked, initial_text: text.into(), label: None }
    }

    pub(crate) fn from_record(checked: bool) -> Self {
        Self { checked, ..Self::default() }
    }

    pub fn is_checked(&self) -> bool {
        self.checked
    }

    pub fn label(&self) -> Option<EntityId> {
        self.label
    }

    fn texture_key(&self, state: EntityState) -> &'static str {
        match (self.checked, state) {
            (true, EntityState::Default) => "checkbox_checked",
            (true, _) => "checkbox_checked_hover",
            (false, EntityState::Default) => "checkbox",
            (false, _) => "checkbox_hover",
        }
    }
}

impl Layoutable for CheckBox {
    fn default_size(&self) -> Vec2 {
        Vec2::new(0.0, 40.0)
    }
}

impl Drawable for CheckBox {
    /// The box is a square at the left edge; the label draws itself.
    fn draw(&self, _entity: &Entity, args: &DrawArgs, ctx: &mut DrawContext<'_>) {
        let side = args.dest.height;
        let square = Rect::new(args.dest.x, args.dest.y, side, side);
        ctx.texture(self.texture_key(args.state), square, args.tint);
    }
}

impl Interactable for CheckBox {
    fn naturally_interactive(&self) -> bool {
        true
    }

    fn on_click(&mut self, _entity: &mut Entity) -> bool {
        self.checked = !self.checked;
        true
    }
}

impl ValueHolder for CheckBox {
    fn value(&self) -> WidgetValue {
        WidgetValue::Bool(self.checked)
    }

    fn set_value(&mut self, value: WidgetValue) -> Result<bool> {
        let checked = value
            .as_bool()
            .ok_or_else(|| UiError::InvalidValue(format!("{value:?} is not a bool")))?;
        let changed = checked != self.checked;
        self.checked = checked;
        Ok(changed)
    }
}

impl Widget for CheckBox {
    fn widget_type(&self) -> &'static str {
        "CheckBox"
    }

    fn init_entity(&self, entity: &mut Entity) {
        if entity.cursor == CursorKind::Default {
            entity.cursor = CursorKind::Pointer;
        }
    }

    fn compose(&mut self) -> Vec<(Entity, Box<dyn Widget>)> {
        let label = Entity::new(Anchor::CenterLeft, Vec2::ZERO, Vec2::new(50.0, 0.0))
            .with_identifier(CHECKBOX_LABEL)
            .with_click_through(true)
            .with_style(names::SPACE_AFTER, Vec2::ZERO, EntityState::Default);
        let text = std::mem::take(&mut self.initial_text);
        vec![(label, Box::new(Paragraph::new(text)) as Box<dyn Widget>)]
    }

    fn relink(&mut self, tree: &EntityTree, id: EntityId) -> Result<()> {
        self.label = Some(find_internal_child(tree, id, CHECKBOX_LABEL)?);
        Ok(())
    }

    fn value_holder(&self) -> Option<&dyn ValueHolder> {
        Some(self)
    }

    fn value_holder_mut(&mut self) -> Option<&mut dyn ValueHolder> {
        Some(self)
    }

    fn to_record(&self) -> WidgetRecord {
        WidgetRecord::CheckBox { checked: self.checked }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

// ===========================================================================
// Tests
// ===========================================================================
