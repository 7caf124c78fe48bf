//! Pure destination-rectangle resolution.
//!
//! Everything here works on plain values: the parent's internal rectangle, the
//! entity's layout inputs and (for auto anchors) the previous visible sibling's
//! flow rectangle. Cache handling and tree walking live in
//! [`engine`](super::engine).

use crate::geometry::{Rect, Vec2};
use crate::layout::anchor::Anchor;

/// The layout inputs of a single entity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutInput {
    pub anchor: Anchor,
    pub offset: Vec2,
    /// Requested size. Per component: negative uses `default_size`, `0` fills
    /// the parent, `(0, 1)` is a fraction of the parent, `>= 1` is pixels.
    pub size: Vec2,
    pub default_size: Vec2,
    pub min_size: Option<Vec2>,
    pub max_size: Option<Vec2>,
    /// Leading space, in unscaled pixels.
    pub space_before: Vec2,
    /// Global UI scale applied to pixel sizes, offsets and spacing.
    pub scale: f32,
}

impl Default for LayoutInput {
    fn default() -> Self {
        Self {
            anchor: Anchor::Auto,
            offset: Vec2::ZERO,
            size: Vec2::DEFAULT_SIZE,
            default_size: Vec2::ZERO,
            min_size: None,
            max_size: None,
            space_before: Vec2::ZERO,
            scale: 1.0,
        }
    }
}

/// What an auto-anchored entity needs to know about the sibling it follows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlowSibling {
    /// The sibling's auto-anchor rectangle.
    pub rect: Rect,
    /// The sibling's trailing space, in unscaled pixels.
    pub space_after: Vec2,
}

/// Per-entity drag bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DragState {
    /// Top-left position relative to the parent's internal origin, unscaled.
    pub offset: Vec2,
    /// Set until the first resolution snapshots the anchor-resolved position.
    pub needs_init: bool,
    /// Whether a drag gesture is in progress.
    pub dragging: bool,
}

// ---------------------------------------------------------------------------
// Size
// ---------------------------------------------------------------------------

/// Convert one size component using the percent-or-absolute rule.
fn size_component(value: f32, parent: i32, scale: f32) -> f32 {
    if value <= 0.0 {
        parent as f32
    } else if value < 1.0 {
        parent as f32 * value
    } else {
        value * scale
    }
}

/// Resolve the pixel size of an entity inside `parent`.
///
/// Placeholder components take the default size first. Min and max limits go
/// through the same conversion, and the result is never below one pixel.
pub fn resolve_size(input: &LayoutInput, parent: Rect) -> (i32, i32) {
    let pick = |value: f32, default: f32| if value < 0.0 { default } else { value };
    let raw = Vec2::new(
        pick(input.size.x, input.default_size.x),
        pick(input.size.y, input.default_size.y),
    );

    let mut w = size_component(raw.x, parent.width, input.scale);
    let mut h = size_component(raw.y, parent.height, input.scale);

    if let Some(min) = input.min_size {
        w = w.max(size_component(min.x, parent.width, input.scale));
        h = h.max(size_component(min.y, parent.height, input.scale));
    }
    if let Some(max) = input.max_size {
        w = w.min(size_component(max.x, parent.width, input.scale));
        h = h.min(size_component(max.y, parent.height, input.scale));
    }

    ((w as i32).max(1), (h as i32).max(1))
}

// ---------------------------------------------------------------------------
// Position
// ---------------------------------------------------------------------------

fn scaled(v: Vec2, scale: f32) -> (i32, i32) {
    ((v.x * scale) as i32, (v.y * scale) as i32)
}

/// Compute the destination rectangle for `input` inside `parent`.
///
/// `prev` is the previous visible sibling; it is only consulted for auto
/// anchors.
pub fn calc_dest_rect(input: &LayoutInput, parent: Rect, prev: Option<FlowSibling>) -> Rect {
    let (w, h) = resolve_size(input, parent);
    let (ox, oy) = scaled(input.offset, input.scale);
    let (left, top) = (parent.x, parent.y);
    let (right, bottom) = (parent.right(), parent.bottom());
    let (cx, cy) = (parent.center_x(), parent.center_y());

    let (x, y) = match input.anchor {
        Anchor::TopLeft => (left + ox, top + oy),
        Anchor::TopRight => (right - w - ox, top + oy),
        Anchor::TopCenter => (cx - w / 2 + ox, top + oy),
        Anchor::BottomLeft => (left + ox, bottom - h - oy),
        Anchor::BottomRight => (right - w - ox, bottom - h - oy),
        Anchor::BottomCenter => (cx - w / 2 + ox, bottom - h - oy),
        Anchor::CenterLeft => (left + ox, cy - h / 2 + oy),
        Anchor::CenterRight => (right - w - ox, cy - h / 2 + oy),
        Anchor::Center => (cx - w / 2 + ox, cy - h / 2 + oy),
        anchor => auto_position(anchor, input, parent, prev, w),
    };

    Rect::new(x, y, w, h)
}

fn auto_position(
    anchor: Anchor,
    input: &LayoutInput,
    parent: Rect,
    prev: Option<FlowSibling>,
    w: i32,
) -> (i32, i32) {
    let (ox, oy) = scaled(input.offset, input.scale);
    let (bx, by) = scaled(input.space_before, input.scale);
    let row_x = if anchor == Anchor::AutoCenter {
        parent.center_x() - w / 2 + ox
    } else {
        parent.x + ox
    };

    let Some(prev) = prev else {
        return (row_x + bx, parent.y + oy + by);
    };
    let (ax, ay) = scaled(prev.space_after, input.scale);

    if matches!(anchor, Anchor::AutoInline | Anchor::AutoInlineNoBreak) {
        let x = prev.rect.right() + ax + bx + ox;
        let fits = x + w <= parent.right();
        if fits || anchor == Anchor::AutoInlineNoBreak {
            return (x, prev.rect.y + oy);
        }
    }

    (row_x, prev.rect.bottom() + ay + by + oy)
}

// ---------------------------------------------------------------------------
// Flow rectangle
// ---------------------------------------------------------------------------

/// The rectangle later auto-anchored siblings flow after.
///
/// For fixed anchors the entity's own offset is taken back out, so a sibling
/// nudged by an offset still reserves its slot at the anchor point. `actual`
/// is the visible extent when it differs from the destination rectangle.
pub fn flow_rect(anchor: Anchor, offset: Vec2, scale: f32, actual: Rect) -> Rect {
    if anchor.is_auto() {
        return actual;
    }
    let (ox, oy) = scaled(offset, scale);
    let (sx, sy) = anchor.offset_signs();
    actual.translate(-sx * ox, -sy * oy)
}

// ---------------------------------------------------------------------------
// Drag
// ---------------------------------------------------------------------------

/// Resolve a draggable entity.
///
/// The first call places it by its anchor and records that position as the
/// drag offset. Later calls place it top-left at the accumulated drag offset.
/// With `limit_to_parent` the result is clamped inside `parent` and the drag
/// offset is corrected to match.
pub fn resolve_dragged(
    input: &LayoutInput,
    parent: Rect,
    prev: Option<FlowSibling>,
    drag: &mut DragState,
    limit_to_parent: bool,
) -> Rect {
    let scale = if input.scale > 0.0 { input.scale } else { 1.0 };
    let mut rect = if drag.needs_init {
        let rect = calc_dest_rect(input, parent, prev);
        drag.needs_init = false;
        rect
    } else {
        let pinned = LayoutInput {
            anchor: Anchor::TopLeft,
            offset: drag.offset,
            ..*input
        };
        calc_dest_rect(&pinned, parent, None)
    };

    if limit_to_parent {
        rect = rect.clamp_into(parent);
    }
    drag.offset = Vec2::new(
        (rect.x - parent.x) as f32 / scale,
        (rect.y - parent.y) as f32 / scale,
    );
    rect
}

// ===========================================================================
// Tests
// ===========================================================================
