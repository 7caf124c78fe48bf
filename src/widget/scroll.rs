//! Scroll state and scrollbar geometry for scrolling panels.
//!
//! `ScrollState` tracks how far a panel's content is scrolled, clamped to
//! `[0, content - viewport]` per axis. `ScrollbarState` turns it into the
//! thumb position and size used to draw an indicator.

use crate::geometry::{Rect, Vec2};

/// Pixels scrolled per wheel notch, before global scale.
pub const WHEEL_STEP: i32 = 20;

/// Wheel step in screen pixels at `scale`.
pub fn wheel_step(scale: f32) -> i32 {
    ((WHEEL_STEP as f32 * scale).round() as i32).max(1)
}

// ---------------------------------------------------------------------------
// ScrollScope
// ---------------------------------------------------------------------------

/// Scroll translation and clip inherited from the ancestors.
///
/// `offset` maps screen coordinates into layout coordinates
/// (`layout = screen + offset`). `clip` is in screen coordinates; `None`
/// means unclipped.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollScope {
    pub offset: Vec2,
    pub clip: Option<Rect>,
}

impl ScrollScope {
    /// No scrolling ancestor.
    pub const NONE: ScrollScope = ScrollScope { offset: Vec2::ZERO, clip: None };

    /// A layout rectangle moved to where it appears on screen.
    pub fn to_screen(&self, rect: Rect) -> Rect {
        rect.translate(-(self.offset.x as i32), -(self.offset.y as i32))
    }

    /// A screen point moved into layout coordinates.
    pub fn to_layout(&self, point: Vec2) -> Vec2 {
        point + self.offset
    }

    /// Whether the screen point survives the clip.
    pub fn shows_point(&self, point: Vec2) -> bool {
        self.clip.map_or(true, |clip| clip.contains(point))
    }

    /// Whether any part of the layout rectangle survives the clip.
    pub fn shows_rect(&self, rect: Rect) -> bool {
        self.clip.map_or(true, |clip| !clip.intersection(self.to_screen(rect)).is_empty())
    }

    /// The scope children see inside a widget scrolled by `scroll`. With
    /// `clip_to` (a layout rectangle of the widget), children are also
    /// clipped to it.
    pub fn nested(&self, scroll: Vec2, clip_to: Option<Rect>) -> ScrollScope {
        let clip = match (clip_to.map(|r| self.to_screen(r)), self.clip) {
            (Some(inner), Some(outer)) => Some(inner.intersection(outer)),
            (inner, outer) => inner.or(outer),
        };
        ScrollScope { offset: self.offset + scroll, clip }
    }
}

// ---------------------------------------------------------------------------
// ScrollState
// ---------------------------------------------------------------------------

/// Scroll position of a scrollable widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScrollState {
    /// Current offset, always within `[0, max_scroll]`.
    pub offset: (i32, i32),
    /// Extent of the scrollable content.
    pub content_size: (i32, i32),
    /// Extent of the visible area.
    pub viewport_size: (i32, i32),
}

impl ScrollState {
    pub fn new(content_size: (i32, i32), viewport_size: (i32, i32)) -> Self {
        Self { offset: (0, 0), content_size, viewport_size }
    }

    /// `max(0, content - viewport)` per axis.
    pub fn max_scroll(&self) -> (i32, i32) {
        (
            (self.content_size.0 - self.viewport_size.0).max(0),
            (self.content_size.1 - self.viewport_size.1).max(0),
        )
    }

    /// Scroll to an absolute position, clamped.
    pub fn scroll_to(&mut self, x: i32, y: i32) {
        let max = self.max_scroll();
        self.offset = (x.clamp(0, max.0), y.clamp(0, max.1));
    }

    /// Scroll by a relative delta, clamped.
    pub fn scroll_by(&mut self, dx: i32, dy: i32) {
        self.scroll_to(self.offset.0 + dx, self.offset.1 + dy);
    }

    pub fn is_scrollable_y(&self) -> bool {
        self.content_size.1 > self.viewport_size.1
    }

    /// Vertical progress in `[0.0, 1.0]`; 0.0 when not scrollable.
    pub fn scroll_percent_y(&self) -> f32 {
        let max = self.max_scroll().1;
        if max <= 0 {
            0.0
        } else {
            self.offset.1 as f32 / max as f32
        }
    }

    /// Measure content against the visible rectangle and re-clamp.
    ///
    /// `content` is the union of the children's rectangles, in the same
    /// coordinates as `viewport`.
    pub fn measure(&mut self, viewport: Rect, content: Option<Rect>) {
        self.viewport_size = (viewport.width, viewport.height);
        self.content_size = match content {
            Some(c) => (c.right() - viewport.x, c.bottom() - viewport.y),
            None => (0, 0),
        };
        self.scroll_to(self.offset.0, self.offset.1);
    }

    /// Offset as the vector children are translated by.
    pub fn as_vec2(&self) -> Vec2 {
        Vec2::new(self.offset.0 as f32, self.offset.1 as f32)
    }
}

// ---------------------------------------------------------------------------
// ScrollbarState
// ---------------------------------------------------------------------------

/// Vertical scrollbar thumb, both fields in `[0.0, 1.0]`.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrollbarState {
    /// 0.0 = top, 1.0 = bottom.
    pub thumb_position: f32,
    /// Fraction of the track covered (viewport / content).
    pub thumb_size: f32,
}

impl ScrollbarState {
    pub fn from_scroll_state(state: &ScrollState) -> Self {
        let (content, viewport) = (state.content_size.1, state.viewport_size.1);
        if content <= 0 || content <= viewport {
            return Self { thumb_position: 0.0, thumb_size: 1.0 };
        }
        Self {
            thumb_position: state.scroll_percent_y(),
            thumb_size: (viewport as f32 / content as f32).clamp(0.0, 1.0),
        }
    }

    /// The thumb rectangle inside `track`.
    pub fn thumb_rect(&self, track: Rect) -> Rect {
        let height = ((track.height as f32 * self.thumb_size) as i32).max(1);
        let travel = track.height - height;
        let y = track.y + (travel as f32 * self.thumb_position) as i32;
        Rect::new(track.x, y, track.width, height)
    }
}

// ===========================================================================
// Tests
// ===========================================================================
