//! Style property values, interaction states and well-known property names.

use serde::{Deserialize, Serialize};

use crate::geometry::Vec2;
use crate::style::color::Color;

// ---------------------------------------------------------------------------
// EntityState
// ---------------------------------------------------------------------------

/// The interaction state of an entity, also the state axis of a style sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum EntityState {
    #[default]
    Default,
    MouseHover,
    MouseDown,
}

impl EntityState {
    /// All states, default first.
    pub const ALL: [EntityState; 3] =
        [EntityState::Default, EntityState::MouseHover, EntityState::MouseDown];

    /// Map a style-table pseudo-class (`hover`, `down`) to a state.
    pub fn from_pseudo_class(name: &str) -> Option<Self> {
        match name {
            "default" => Some(EntityState::Default),
            "hover" => Some(EntityState::MouseHover),
            "down" | "active" => Some(EntityState::MouseDown),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// StyleProperty
// ---------------------------------------------------------------------------

/// A single style value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum StyleProperty {
    Color(Color),
    Float(f32),
    Int(i32),
    Bool(bool),
    Vector(Vec2),
}

impl StyleProperty {
    pub fn as_color(&self) -> Option<Color> {
        match self {
            StyleProperty::Color(c) => Some(*c),
            _ => None,
        }
    }

    /// Floats and ints both read as `f32`.
    pub fn as_float(&self) -> Option<f32> {
        match self {
            StyleProperty::Float(v) => Some(*v),
            StyleProperty::Int(v) => Some(*v as f32),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i32> {
        match self {
            StyleProperty::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            StyleProperty::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_vector(&self) -> Option<Vec2> {
        match self {
            StyleProperty::Vector(v) => Some(*v),
            _ => None,
        }
    }

    /// Whether changing a property to this value can change layout.
    ///
    /// Colors never do; every other value kind is assumed to.
    pub fn affects_layout(&self) -> bool {
        !matches!(self, StyleProperty::Color(_))
    }
}

impl From<Color> for StyleProperty {
    fn from(value: Color) -> Self {
        StyleProperty::Color(value)
    }
}

impl From<f32> for StyleProperty {
    fn from(value: f32) -> Self {
        StyleProperty::Float(value)
    }
}

impl From<i32> for StyleProperty {
    fn from(value: i32) -> Self {
        StyleProperty::Int(value)
    }
}

impl From<bool> for StyleProperty {
    fn from(value: bool) -> Self {
        StyleProperty::Bool(value)
    }
}

impl From<Vec2> for StyleProperty {
    fn from(value: Vec2) -> Self {
        StyleProperty::Vector(value)
    }
}

// ---------------------------------------------------------------------------
// Property names
// ---------------------------------------------------------------------------

/// Names of the style properties the core and built-in widgets read.
pub mod names {
    pub const FILL_COLOR: &str = "FillColor";
    pub const OUTLINE_COLOR: &str = "OutlineColor";
    pub const OUTLINE_WIDTH: &str = "OutlineWidth";
    pub const SHADOW_COLOR: &str = "ShadowColor";
    pub const SHADOW_OFFSET: &str = "ShadowOffset";
    pub const SHADOW_SCALE: &str = "ShadowScale";
    pub const SCALE: &str = "Scale";
    pub const FONT_STYLE: &str = "FontStyle";
    pub const ALIGN_CENTER: &str = "AlignCenter";
    pub const WORD_WRAP: &str = "WordWrap";
    pub const PADDING: &str = "Padding";
    pub const SPACE_BEFORE: &str = "SpaceBefore";
    pub const SPACE_AFTER: &str = "SpaceAfter";
    pub const DEFAULT_SIZE: &str = "DefaultSize";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pseudo_class_mapping() {
        assert_eq!(EntityState::from_pseudo_class("hover"), Some(EntityState::MouseHover));
        assert_eq!(EntityState::from_pseudo_class("down"), Some(EntityState::MouseDown));
        assert_eq!(EntityState::from_pseudo_class("default"), Some(EntityState::Default));
        assert_eq!(EntityState::from_pseudo_class("focus"), None);
    }

    #[test]
    fn typed_accessors() {
        assert_eq!(StyleProperty::Float(1.5).as_float(), Some(1.5));
        assert_eq!(StyleProperty::Int(3).as_float(), Some(3.0));
        assert_eq!(StyleProperty::Int(3).as_int(), Some(3));
        assert_eq!(StyleProperty::Bool(true).as_bool(), Some(true));
        assert_eq!(StyleProperty::Color(Color::WHITE).as_vector(), None);
        assert_eq!(
            StyleProperty::Vector(Vec2::new(1.0, 2.0)).as_vector(),
            Some(Vec2::new(1.0, 2.0))
        );
    }

    #[test]
    fn only_colors_leave_layout_alone() {
        assert!(!StyleProperty::Color(Color::BLACK).affects_layout());
        assert!(StyleProperty::Float(1.0).affects_layout());
        assert!(StyleProperty::Vector(Vec2::ZERO).affects_layout());
        assert!(StyleProperty::Bool(false).affects_layout());
    }
}
