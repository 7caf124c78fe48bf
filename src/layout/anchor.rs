//! Anchors: the reference point on the parent an entity's offset is resolved against.

use serde::{Deserialize, Serialize};

/// Where an entity is positioned relative to its parent's internal rectangle.
///
/// The nine fixed anchors resolve directly against the parent; the four
/// `Auto*` anchors flow after the previous visible sibling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Anchor {
    Center,
    TopLeft,
    TopRight,
    TopCenter,
    BottomLeft,
    BottomRight,
    BottomCenter,
    CenterLeft,
    CenterRight,
    /// Below the previous sibling, aligned to the parent's left edge.
    #[default]
    Auto,
    /// Right of the previous sibling, wrapping to a new row on overflow.
    AutoInline,
    /// Right of the previous sibling, never wrapping.
    AutoInlineNoBreak,
    /// Below the previous sibling, horizontally centered.
    AutoCenter,
}

impl Anchor {
    /// Whether this anchor flows after the previous sibling.
    pub const fn is_auto(self) -> bool {
        matches!(
            self,
            Anchor::Auto | Anchor::AutoInline | Anchor::AutoInlineNoBreak | Anchor::AutoCenter
        )
    }

    /// Sign applied to the offset per axis: `-1` when the offset is measured
    /// inward from the right / bottom edge, `+1` otherwise.
    pub const fn offset_signs(self) -> (i32, i32) {
        let x = match self {
            Anchor::TopRight | Anchor::BottomRight | Anchor::CenterRight => -1,
            _ => 1,
        };
        let y = match self {
            Anchor::BottomLeft | Anchor::BottomRight | Anchor::BottomCenter => -1,
            _ => 1,
        };
        (x, y)
    }

    /// Whether the vertical position is independent of the parent's height.
    ///
    /// Only these children count toward an auto-height parent's content.
    pub const fn is_top_flow(self) -> bool {
        matches!(self, Anchor::TopLeft | Anchor::TopRight | Anchor::TopCenter) || self.is_auto()
    }
}
