//! Panel widget: a skinned container, optionally auto-height or scrolling.
//!
//! A panel draws its skin as a 9-slice texture and holds children. With
//! [`Overflow::Scroll`] it measures its content after every layout pass and
//! scrolls on the mouse wheel; descendants are drawn and hit-tested shifted by
//! the scroll offset.

use std::any::Any;

use serde::{Deserialize, Serialize};

use crate::document::WidgetRecord;
use crate::dom::node::Entity;
use crate::geometry::{Rect, Vec2};
use crate::widget::draw::{DrawArgs, DrawContext, DrawPass};
use crate::widget::scroll::{wheel_step, ScrollState, ScrollbarState};
use crate::widget::traits::{Drawable, Interactable, Layoutable, Widget};

/// Width of the scrollbar track, before global scale.
const SCROLLBAR_WIDTH: f32 = 12.0;

// ---------------------------------------------------------------------------
// Skin and overflow
// ---------------------------------------------------------------------------

/// Panel skins, each mapped to a theme texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PanelSkin {
    #[default]
    Default,
    Simple,
    Fancy,
    Golden,
    ListBackground,
    /// Draws nothing.
    None,
}

impl PanelSkin {
    /// Theme texture key, or `None` for the invisible skin.
    pub fn texture_key(self) -> Option<&'static str> {
        match self {
            PanelSkin::Default => Some("panel_default"),
            PanelSkin::Simple => Some("panel_simple"),
            PanelSkin::Fancy => Some("panel_fancy"),
            PanelSkin::Golden => Some("panel_golden"),
            PanelSkin::ListBackground => Some("panel_listbackground"),
            PanelSkin::None => None,
        }
    }
}

/// What happens to children that extend past the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Overflow {
    #[default]
    Visible,
    /// Scroll vertically with the mouse wheel.
    Scroll,
}

// ---------------------------------------------------------------------------
// Panel
// ---------------------------------------------------------------------------

/// A skinned container.
///
/// # Examples
///
/// ```ignore
/// let id = tree.spawn(
///     Entity::new(Anchor::Center, Vec2::new(400.0, 0.0), Vec2::ZERO),
///     Panel::new(PanelSkin::Fancy).with_auto_height(true),
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct Panel {
    skin: PanelSkin,
    auto_height: bool,
    overflow: Overflow,
    scroll: ScrollState,
}

impl Panel {
    pub fn new(skin: PanelSkin) -> Self {
        Self { skin, ..Self::default() }
    }

    /// Grow to fit the children (builder).
    pub fn with_auto_height(mut self, auto_height: bool) -> Self {
        self.auto_height = auto_height;
        self
    }

    pub fn with_overflow(mut self, overflow: Overflow) -> Self {
        self.overflow = overflow;
        self
    }

    pub fn skin(&self) -> PanelSkin {
        self.skin
    }

    pub fn set_skin(&mut self, skin: PanelSkin) {
        self.skin = skin;
    }

    pub fn overflow(&self) -> Overflow {
        self.overflow
    }

    pub fn set_overflow(&mut self, overflow: Overflow) {
        self.overflow = overflow;
        if overflow == Overflow::Visible {
            self.scroll = ScrollState::default();
        }
    }

    pub fn scroll(&self) -> &ScrollState {
        &self.scroll
    }

    /// Scroll to an absolute vertical offset, clamped to the content.
    pub fn scroll_to(&mut self, y: i32) {
        self.scroll.scroll_to(0, y);
    }

    pub(crate) fn from_record(skin: PanelSkin, auto_height: bool, overflow: Overflow) -> Self {
        Self { skin, auto_height, overflow, scroll: ScrollState::default() }
    }

    fn draw_scrollbar(&self, dest: Rect, scale: f32, ctx: &mut DrawContext<'_>, args: &DrawArgs) {
        if !self.scroll.is_scrollable_y() {
            return;
        }
        let width = (SCROLLBAR_WIDTH * scale) as i32;
        let track = Rect::new(dest.right() - width, dest.y, width, dest.height);
        let thumb = ScrollbarState::from_scroll_state(&self.scroll).thumb_rect(track);
        ctx.texture("scrollbar", track, args.tint);
        ctx.texture("scrollbar_mark", thumb, args.tint);
    }
}

impl Layoutable for Panel {
    fn default_size(&self) -> Vec2 {
        Vec2::new(500.0, 500.0)
    }

    fn auto_height(&self) -> bool {
        self.auto_height
    }

    fn children_laid_out(&mut self, internal: Rect, content: Option<Rect>) {
        if self.overflow == Overflow::Scroll {
            self.scroll.measure(internal, content);
        }
    }
}

impl Drawable for Panel {
    fn draw(&self, _entity: &Entity, args: &DrawArgs, ctx: &mut DrawContext<'_>) {
        let Some(key) = self.skin.texture_key() else {
            return;
        };
        ctx.nine_slice(key, args.dest, args.tint, args.scale);
        if args.pass == DrawPass::Base && self.overflow == Overflow::Scroll {
            self.draw_scrollbar(args.dest, args.scale, ctx, args);
        }
    }
}

impl Interactable for Panel {
    fn on_mouse_wheel(&mut self, delta: i32, scale: f32) -> bool {
        if self.overflow != Overflow::Scroll {
            return false;
        }
        let before = self.scroll.offset;
        self.scroll.scroll_by(0, -delta * wheel_step(scale));
        before != self.scroll.offset
    }

    fn clips_children(&self) -> bool {
        self.overflow == Overflow::Scroll
    }

    fn scroll_offset(&self) -> Vec2 {
        match self.overflow {
            Overflow::Scroll => self.scroll.as_vec2(),
            Overflow::Visible => Vec2::ZERO,
        }
    }
}

impl Widget for Panel {
    fn widget_type(&self) -> &'static str {
        "Panel"
    }

    fn to_record(&self) -> WidgetRecord {
        WidgetRecord::Panel {
            skin: self.skin,
            auto_height: self.auto_height,
            overflow: self.overflow,
        }
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
