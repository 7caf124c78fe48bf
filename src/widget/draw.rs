//! Renderer interface and the draw traversal.
//!
//! The host supplies a [`RenderSurface`]; the core brackets every visual pass
//! of every entity with `begin` / `end` and issues textured-rectangle and text
//! draws in between. Per entity the order is fixed: `BeforeDraw`, background,
//! base pass, shadow pass, outline pass, children by priority, `AfterDraw`.
//! Inside a clipping widget, entities entirely outside the clip are skipped
//! and the rest are drawn with the clip as scissor.

use crate::dom::node::EntityId;
use crate::dom::tree::EntityTree;
use crate::event::callbacks::EventKind;
use crate::geometry::{Rect, Vec2};
use crate::style::color::Color;
use crate::style::property::{names, EntityState};
use crate::style::theme::{FontId, TextureId, Theme, ThemeAssets};
use crate::widget::scroll::ScrollScope;

// ---------------------------------------------------------------------------
// Renderer interface
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BlendMode {
    #[default]
    AlphaBlend,
    Additive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SamplerMode {
    #[default]
    PointClamp,
    LinearClamp,
}

/// Shader effects the core asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Effect {
    /// Draw every opaque texel in the tint color.
    Silhouette,
    /// Greyed-out look for disabled entities.
    Disabled,
}

/// Batch state for one `begin` / `end` bracket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct BatchState {
    pub blend: BlendMode,
    pub sampler: SamplerMode,
    pub effect: Option<Effect>,
    /// Scissor rectangle in screen pixels; nothing outside it may show.
    pub clip: Option<Rect>,
}

/// Host drawing backend.
pub trait RenderSurface {
    /// Current viewport size in pixels.
    fn viewport_size(&self) -> (i32, i32);

    fn begin(&mut self, batch: BatchState);

    /// Draw `source` (or the whole texture) of `texture` stretched into `dest`.
    fn draw_texture(
        &mut self,
        texture: TextureId,
        dest: Rect,
        source: Option<Rect>,
        tint: Color,
        rotation: f32,
    );

    fn draw_text(&mut self, font: FontId, text: &str, position: Vec2, color: Color, scale: f32);

    fn end(&mut self);
}

// ---------------------------------------------------------------------------
// Per-pass arguments
// ---------------------------------------------------------------------------

/// Which visual pass is being drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DrawPass {
    Base,
    Shadow,
    Outline,
}

/// Arguments for one [`Drawable::draw`](crate::widget::Drawable::draw) call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawArgs {
    pub pass: DrawPass,
    /// Where to draw, already scrolled and offset for the pass.
    pub dest: Rect,
    pub tint: Color,
    pub state: EntityState,
    /// Global UI scale.
    pub scale: f32,
}

/// What a widget draws with.
pub struct DrawContext<'a> {
    pub surface: &'a mut dyn RenderSurface,
    pub assets: &'a dyn ThemeAssets,
    pub theme: &'a Theme,
}

impl DrawContext<'_> {
    /// Draw the texture registered under `key`. Missing keys are skipped.
    pub fn texture(&mut self, key: &str, dest: Rect, tint: Color) {
        match self.assets.texture(key) {
            Some(texture) => self.surface.draw_texture(texture, dest, None, tint, 0.0),
            None => log::warn!("missing texture '{key}'"),
        }
    }

    /// Draw the texture under `key` as a 9-slice: the frame keeps its pixel
    /// size (times `frame_scale`) and only the edges and center stretch.
    ///
    /// Falls back to a plain stretched draw when the key has no frame or the
    /// texture size is unknown.
    pub fn nine_slice(&mut self, key: &str, dest: Rect, tint: Color, frame_scale: f32) {
        let Some(texture) = self.assets.texture(key) else {
            log::warn!("missing texture '{key}'");
            return;
        };
        let frame = self.assets.frame(key).frame_width;
        let size = self.assets.texture_size(texture);
        let Some((tw, th)) = size.filter(|_| !frame.is_zero()) else {
            self.surface.draw_texture(texture, dest, None, tint, 0.0);
            return;
        };

        for (src, dst) in nine_slice_rects(tw, th, frame, dest, frame_scale) {
            self.surface.draw_texture(texture, dst, Some(src), tint, 0.0);
        }
    }
}

/// Source and destination rectangles of the nine 9-slice pieces, row-major.
pub fn nine_slice_rects(
    texture_width: i32,
    texture_height: i32,
    frame: Vec2,
    dest: Rect,
    frame_scale: f32,
) -> Vec<(Rect, Rect)> {
    let sw = (texture_width as f32 * frame.x) as i32;
    let sh = (texture_height as f32 * frame.y) as i32;
    let dw = ((sw as f32 * frame_scale) as i32).min(dest.width / 2);
    let dh = ((sh as f32 * frame_scale) as i32).min(dest.height / 2);

    let src_cols = [(0, sw), (sw, texture_width - sw * 2), (texture_width - sw, sw)];
    let src_rows = [(0, sh), (sh, texture_height - sh * 2), (texture_height - sh, sh)];
    let dst_cols = [
        (dest.x, dw),
        (dest.x + dw, dest.width - dw * 2),
        (dest.right() - dw, dw),
    ];
    let dst_rows = [
        (dest.y, dh),
        (dest.y + dh, dest.height - dh * 2),
        (dest.bottom() - dh, dh),
    ];

    let mut pieces = Vec::with_capacity(9);
    for row in 0..3 {
        for col in 0..3 {
            let src = Rect::new(src_cols[col].0, src_rows[row].0, src_cols[col].1, src_rows[row].1);
            let dst = Rect::new(dst_cols[col].0, dst_rows[row].0, dst_cols[col].1, dst_rows[row].1);
            pieces.push((src, dst));
        }
    }
    pieces
}

// ---------------------------------------------------------------------------
// Traversal
// ---------------------------------------------------------------------------

/// Destination of the shadow pass: offset, then scaled around its center.
fn shadow_rect(dest: Rect, offset: Vec2, shadow_scale: f32, scale: f32) -> Rect {
    let w = (dest.width as f32 * shadow_scale) as i32;
    let h = (dest.height as f32 * shadow_scale) as i32;
    Rect::new(
        dest.x + (offset.x * scale) as i32 - (w - dest.width) / 2,
        dest.y + (offset.y * scale) as i32 - (h - dest.height) / 2,
        w,
        h,
    )
}

impl EntityTree {
    /// Draw `id` and its visible descendants inside the ancestors' `scope`.
    pub(crate) fn draw_entity(
        &mut self,
        id: EntityId,
        surface: &mut dyn RenderSurface,
        assets: &dyn ThemeAssets,
        scope: ScrollScope,
    ) {
        if !self.entity(id).is_some_and(|e| e.is_visible()) {
            return;
        }
        self.fire(id, EventKind::BeforeDraw);
        if !self.contains(id) {
            return;
        }

        if let Some(background) = self.background(id) {
            self.draw_background(background, surface, assets, scope);
        }
        if self.entity(id).is_some_and(|e| scope.shows_rect(e.layout.dest)) {
            self.draw_passes(id, surface, assets, scope);
        }

        let child_scope = self.child_scope(id, scope);
        for child in self.sorted_children(id) {
            if self.parent(child) == Some(id) {
                self.draw_entity(child, surface, assets, child_scope);
            }
        }

        self.fire(id, EventKind::AfterDraw);
    }

    fn draw_background(
        &mut self,
        background: EntityId,
        surface: &mut dyn RenderSurface,
        assets: &dyn ThemeAssets,
        scope: ScrollScope,
    ) {
        if self.entity(background).is_some_and(|e| e.is_visible() && scope.shows_rect(e.layout.dest)) {
            self.draw_passes(background, surface, assets, scope);
        }
    }

    /// Base, shadow and outline passes of a single entity.
    fn draw_passes(
        &self,
        id: EntityId,
        surface: &mut dyn RenderSurface,
        assets: &dyn ThemeAssets,
        scope: ScrollScope,
    ) {
        let (Some(entity), Some(widget)) = (self.entity(id), self.widget(id)) else {
            return;
        };
        let scale = self.scale();
        let dest = scope.to_screen(entity.layout.dest);
        let state = entity.state();
        let style = entity.style();
        let mut ctx = DrawContext { surface, assets, theme: &self.theme };

        let base = BatchState {
            effect: (!self.is_enabled_in_tree(id)).then_some(Effect::Disabled),
            clip: scope.clip,
            ..BatchState::default()
        };
        let silhouette = BatchState {
            effect: Some(Effect::Silhouette),
            clip: scope.clip,
            ..BatchState::default()
        };
        let args = |pass, dest, tint| DrawArgs { pass, dest, tint, state, scale };

        ctx.surface.begin(base);
        widget.draw(entity, &args(DrawPass::Base, dest, entity.fill_color()), &mut ctx);
        ctx.surface.end();

        let shadow = style.color(names::SHADOW_COLOR, state).unwrap_or(Color::TRANSPARENT);
        if !shadow.is_transparent() {
            let offset = style.vector(names::SHADOW_OFFSET, state).unwrap_or(Vec2::ZERO);
            let shadow_scale = style.float(names::SHADOW_SCALE, state).unwrap_or(1.0);
            let rect = shadow_rect(dest, offset, shadow_scale, scale);
            ctx.surface.begin(silhouette);
            widget.draw(entity, &args(DrawPass::Shadow, rect, shadow), &mut ctx);
            ctx.surface.end();
        }

        let width = style.float(names::OUTLINE_WIDTH, state).unwrap_or(0.0);
        if width > 0.0 {
            let color = style.color(names::OUTLINE_COLOR, state).unwrap_or(Color::BLACK);
            let w = ((width * scale) as i32).max(1);
            ctx.surface.begin(silhouette);
            for (dx, dy) in [(-w, 0), (w, 0), (0, -w), (0, w)] {
                widget.draw(entity, &args(DrawPass::Outline, dest.translate(dx, dy), color), &mut ctx);
            }
            ctx.surface.end();
        }
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn nine_slice_layout() {
        let pieces = nine_slice_rects(100, 100, Vec2::new(0.2, 0.1), Rect::new(0, 0, 300, 200), 1.0);
        assert_eq!(pieces.len(), 9);
        // Top-left corner keeps its pixel size.
        assert_eq!(pieces[0], (Rect::new(0, 0, 20, 10), Rect::new(0, 0, 20, 10)));
        // Center stretches.
        assert_eq!(pieces[4], (Rect::new(20, 10, 60, 80), Rect::new(20, 10, 260, 180)));
        // Bottom-right corner.
        assert_eq!(pieces[8], (Rect::new(80, 90, 20, 10), Rect::new(280, 190, 20, 10)));
    }

    #[test]
    fn nine_slice_frame_never_exceeds_half() {
        let pieces = nine_slice_rects(100, 100, Vec2::new(0.4, 0.4), Rect::new(0, 0, 40, 40), 2.0);
        assert_eq!(pieces[0].1, Rect::new(0, 0, 20, 20));
        assert_eq!(pieces[4].1.width, 0);
    }

    #[test]
    fn shadow_rect_offsets_and_scales() {
        let dest = Rect::new(10, 10, 100, 50);
        assert_eq!(shadow_rect(dest, Vec2::new(4.0, 4.0), 1.0, 1.0), Rect::new(14, 14, 100, 50));
        assert_eq!(shadow_rect(dest, Vec2::ZERO, 1.2, 1.0), Rect::new(0, 5, 120, 60));
    }
}
