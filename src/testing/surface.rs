//! Recording render surface and stub theme assets.
//!
//! [`StubAssets`] hands out a [`TextureId`] per known texture key; the
//! [`RecordingSurface`] maps ids back to keys so draw calls can be asserted by
//! name.

use std::collections::HashMap;

use crate::geometry::{Rect, Vec2};
use crate::style::color::Color;
use crate::style::theme::{FontId, FontStyle, FrameMetadata, TextureId, ThemeAssets};
use crate::widget::draw::{BatchState, RenderSurface};

/// Texture keys the stub assets know about; a key's index is its texture id.
pub const TEXTURE_KEYS: &[&str] = &[
    "panel_default",
    "panel_simple",
    "panel_fancy",
    "panel_golden",
    "panel_listbackground",
    "scrollbar",
    "scrollbar_mark",
    "button_default",
    "button_default_hover",
    "button_default_down",
    "button_alternative",
    "button_alternative_hover",
    "button_alternative_down",
    "button_fancy",
    "button_fancy_hover",
    "button_fancy_down",
    "checkbox",
    "checkbox_hover",
    "checkbox_checked",
    "checkbox_checked_hover",
    "cursor_default",
    "cursor_pointer",
    "cursor_ibeam",
];

fn key_of(texture: TextureId) -> String {
    TEXTURE_KEYS
        .get(texture.0 as usize)
        .map_or_else(|| format!("#{}", texture.0), |key| (*key).to_owned())
}

// ---------------------------------------------------------------------------
// StubAssets
// ---------------------------------------------------------------------------

/// Theme assets backed by [`TEXTURE_KEYS`]. Every font style resolves.
///
/// Textures have no frame metadata unless one is registered with
/// [`with_frame`](Self::with_frame), so 9-slice draws become one plain draw.
#[derive(Debug, Clone, Default)]
pub struct StubAssets {
    frames: HashMap<String, (Vec2, (i32, i32))>,
}

impl StubAssets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Give `key` a 9-slice frame and a pixel size.
    pub fn with_frame(mut self, key: &str, frame_width: Vec2, size: (i32, i32)) -> Self {
        self.frames.insert(key.to_owned(), (frame_width, size));
        self
    }
}

impl ThemeAssets for StubAssets {
    fn texture(&self, key: &str) -> Option<TextureId> {
        TEXTURE_KEYS.iter().position(|k| *k == key).map(|i| TextureId(i as u32))
    }

    fn frame(&self, key: &str) -> FrameMetadata {
        self.frames
            .get(key)
            .map_or_else(FrameMetadata::default, |(frame_width, _)| FrameMetadata {
                frame_width: *frame_width,
            })
    }

    fn texture_size(&self, texture: TextureId) -> Option<(i32, i32)> {
        self.frames.get(&key_of(texture)).map(|(_, size)| *size)
    }

    fn font(&self, style: FontStyle) -> Option<FontId> {
        Some(FontId(style as u32))
    }
}

// ---------------------------------------------------------------------------
// RecordingSurface
// ---------------------------------------------------------------------------

/// One recorded renderer call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    Begin(BatchState),
    Texture { key: String, dest: Rect, source: Option<Rect>, tint: Color },
    Text { text: String, position: Vec2, color: Color, scale: f32 },
    End,
}

/// A [`RenderSurface`] that records every call.
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    size: (i32, i32),
    calls: Vec<DrawCall>,
}

impl RecordingSurface {
    pub fn new(width: i32, height: i32) -> Self {
        Self { size: (width, height), calls: Vec::new() }
    }

    pub fn resize(&mut self, width: i32, height: i32) {
        self.size = (width, height);
    }

    pub fn calls(&self) -> &[DrawCall] {
        &self.calls
    }

    /// Destination rectangles of every draw of texture `key`, in order.
    pub fn texture_dests(&self, key: &str) -> Vec<Rect> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                DrawCall::Texture { key: k, dest, .. } if k == key => Some(*dest),
                _ => None,
            })
            .collect()
    }

    /// Keys of every texture draw, in order.
    pub fn texture_keys(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                DrawCall::Texture { key, .. } => Some(key.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Every drawn string, in order.
    pub fn texts(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                DrawCall::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }
}

impl RenderSurface for RecordingSurface {
    fn viewport_size(&self) -> (i32, i32) {
        self.size
    }

    fn begin(&mut self, batch: BatchState) {
        self.calls.push(DrawCall::Begin(batch));
    }

    fn draw_texture(
        &mut self,
        texture: TextureId,
        dest: Rect,
        source: Option<Rect>,
        tint: Color,
        _rotation: f32,
    ) {
        self.calls.push(DrawCall::Texture { key: key_of(texture), dest, source, tint });
    }

    fn draw_text(&mut self, _font: FontId, text: &str, position: Vec2, color: Color, scale: f32) {
        self.calls.push(DrawCall::Text { text: text.to_owned(), position, color, scale });
    }

    fn end(&mut self) {
        self.calls.push(DrawCall::End);
    }
}

// ===========================================================================
// Tests
// ===========================================================================
