//! Button widget: a skinned, naturally interactive box with a centered label.
//!
//! The label is an internal [`Paragraph`] child named `"_button_label"`. It is
//! click-through, so presses on the text reach the button. After a layout
//! document is loaded the button finds its label again by that identifier.

use std::any::Any;

use serde::{Deserialize, Serialize};

use crate::document::WidgetRecord;
use crate::dom::node::{CursorKind, Entity, EntityId};
use crate::dom::tree::EntityTree;
use crate::error::Result;
use crate::geometry::Vec2;
use crate::layout::anchor::Anchor;
use crate::style::property::{names, EntityState};
use crate::widget::draw::{DrawArgs, DrawContext};
use crate::widget::traits::{find_internal_child, Drawable, Interactable, Layoutable, Widget};
use crate::widgets::paragraph::Paragraph;

/// Identifier of a button's internal label.
pub const BUTTON_LABEL: &str = "_button_label";

/// Button skins, each mapped to a family of theme textures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ButtonSkin {
    #[default]
    Default,
    Alternative,
    Fancy,
}

impl ButtonSkin {
    /// Theme texture key for the skin in `state`, e.g. `button_fancy_hover`.
    pub fn texture_key(self, state: EntityState) -> String {
        let skin = match self {
            ButtonSkin::Default => "default",
            ButtonSkin::Alternative => "alternative",
            ButtonSkin::Fancy => "fancy",
        };
        match state {
            EntityState::Default => format!("button_{skin}"),
            EntityState::MouseHover => format!("button_{skin}_hover"),
            EntityState::MouseDown => format!("button_{skin}_down"),
        }
    }
}

/// A clickable button.
///
/// # Examples
///
/// ```ignore
/// let ok = tree.spawn(Entity::default(), Button::new("OK"));
/// tree.on(ok, EventKind::Click, |_, _| println!("clicked"))?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct Button {
    skin: ButtonSkin,
    /// Text handed to the label when the button is composed.
    initial_text: String,
    label: Option<EntityId>,
}

impl Button {
    pub fn new(text: impl Into<String>) -> Self {
        Self { initial_text: text.into(), ..Self::default() }
    }

    pub fn with_skin(mut self, skin: ButtonSkin) -> Self {
        self.skin = skin;
        self
    }

    pub(crate) fn from_record(skin: ButtonSkin) -> Self {
        Self { skin, ..Self::default() }
    }

    pub fn skin(&self) -> ButtonSkin {
        self.skin
    }

    pub fn set_skin(&mut self, skin: ButtonSkin) {
        self.skin = skin;
    }

    /// The internal label entity.
    pub fn label(&self) -> Option<EntityId> {
        self.label
    }
}

impl Layoutable for Button {
    fn default_size(&self) -> Vec2 {
        Vec2::new(0.0, 70.0)
    }
}

impl Drawable for Button {
    fn draw(&self, _entity: &Entity, args: &DrawArgs, ctx: &mut DrawContext<'_>) {
        let key = self.skin.texture_key(args.state);
        ctx.nine_slice(&key, args.dest, args.tint, args.scale);
    }
}

impl Interactable for Button {
    fn naturally_interactive(&self) -> bool {
        true
    }
}

impl Widget for Button {
    fn widget_type(&self) -> &'static str {
        "Button"
    }

    fn init_entity(&self, entity: &mut Entity) {
        if entity.cursor == CursorKind::Default {
            entity.cursor = CursorKind::Pointer;
        }
    }

    fn compose(&mut self) -> Vec<(Entity, Box<dyn Widget>)> {
        let label = Entity::new(Anchor::Center, Vec2::ZERO, Vec2::ZERO)
            .with_identifier(BUTTON_LABEL)
            .with_click_through(true)
            .with_style(names::ALIGN_CENTER, true, EntityState::Default)
            .with_style(names::SPACE_AFTER, Vec2::ZERO, EntityState::Default);
        let text = std::mem::take(&mut self.initial_text);
        vec![(label, Box::new(Paragraph::new(text)) as Box<dyn Widget>)]
    }

    fn relink(&mut self, tree: &EntityTree, id: EntityId) -> Result<()> {
        self.label = Some(find_internal_child(tree, id, BUTTON_LABEL)?);
        Ok(())
    }

    fn to_record(&self) -> WidgetRecord {
        WidgetRecord::Button { skin: self.skin }
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
