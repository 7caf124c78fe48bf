//! Paragraph widget: fixed-width text with word wrap and alignment.
//!
//! Text is measured with the theme's fixed-width [`FontMetrics`]. The visible
//! extent (the actual rectangle) is the laid-out text block, so auto-anchored
//! siblings flow right below the last line rather than below the full
//! destination rectangle. `Label` and `Header` are presets that cascade their
//! own theme styles after the `Paragraph` ones.

use std::any::Any;

use serde::{Deserialize, Serialize};

use crate::document::WidgetRecord;
use crate::dom::node::Entity;
use crate::error::{Result, UiError};
use crate::geometry::{Rect, Vec2};
use crate::style::property::{names, EntityState};
use crate::style::theme::{FontMetrics, FontStyle, Theme};
use crate::widget::draw::{DrawArgs, DrawContext};
use crate::widget::traits::{
    Drawable, Interactable, LayoutContext, Layoutable, ValueHolder, Widget, WidgetValue,
};

// ---------------------------------------------------------------------------
// Text layout
// ---------------------------------------------------------------------------

/// Split `text` into lines of at most `max_chars` characters, breaking at
/// spaces where possible. Explicit newlines are kept. `None` only splits at
/// newlines.
pub fn wrap_text(text: &str, max_chars: Option<usize>) -> Vec<String> {
    let mut lines = Vec::new();
    for raw in text.split('\n') {
        let Some(max) = max_chars.filter(|m| *m > 0) else {
            lines.push(raw.to_owned());
            continue;
        };
        let mut line = String::new();
        for word in raw.split(' ') {
            let mut word: Vec<char> = word.chars().collect();
            let line_len = line.chars().count();
            let needed = if line.is_empty() { word.len() } else { line_len + 1 + word.len() };
            if needed <= max {
                if !line.is_empty() {
                    line.push(' ');
                }
                line.extend(word);
                continue;
            }
            if !line.is_empty() {
                lines.push(std::mem::take(&mut line));
            }
            while word.len() > max {
                let rest = word.split_off(max);
                lines.push(word.into_iter().collect());
                word = rest;
            }
            line.extend(word);
        }
        lines.push(line);
    }
    lines
}

/// Text style values a paragraph reads from its sheet.
#[derive(Debug, Clone, Copy, PartialEq)]
struct TextStyle {
    font: FontStyle,
    metrics: FontMetrics,
    /// Own scale times the global scale.
    scale: f32,
    word_wrap: bool,
    align_center: bool,
}

impl TextStyle {
    fn resolve(entity: &Entity, theme: &Theme, global_scale: f32) -> Self {
        let style = entity.style();
        let state = EntityState::Default;
        let font = FontStyle::from_index(style.int(names::FONT_STYLE, state).unwrap_or(0));
        Self {
            font,
            metrics: theme.font_metrics(font),
            scale: style.float(names::SCALE, state).unwrap_or(1.0) * global_scale,
            word_wrap: style.boolean(names::WORD_WRAP, state).unwrap_or(true),
            align_center: style.boolean(names::ALIGN_CENTER, state).unwrap_or(false),
        }
    }

    fn char_width(&self) -> f32 {
        self.metrics.char_width * self.scale
    }

    fn line_height(&self) -> f32 {
        self.metrics.line_height * self.scale
    }

    fn lines(&self, text: &str, width: i32) -> Vec<String> {
        let max_chars = self
            .word_wrap
            .then(|| (width as f32 / self.char_width()).floor().max(1.0) as usize);
        wrap_text(text, max_chars)
    }

    /// Pixel width of a line.
    fn line_width(&self, line: &str) -> i32 {
        (line.chars().count() as f32 * self.char_width()) as i32
    }

    /// Left edge of a line inside `dest`.
    fn line_x(&self, line: &str, dest: Rect) -> i32 {
        if self.align_center {
            dest.x + (dest.width - self.line_width(line)) / 2
        } else {
            dest.x
        }
    }
}

// ---------------------------------------------------------------------------
// Paragraph
// ---------------------------------------------------------------------------

/// Which theme styles a paragraph cascades.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ParagraphKind {
    #[default]
    Paragraph,
    Label,
    Header,
}

/// A block of text.
#[derive(Debug, Clone, Default)]
pub struct Paragraph {
    text: String,
    kind: ParagraphKind,
}

impl Paragraph {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into(), kind: ParagraphKind::Paragraph }
    }

    /// Smaller, dimmer text.
    pub fn label(text: impl Into<String>) -> Self {
        Self { text: text.into(), kind: ParagraphKind::Label }
    }

    /// Bold, larger text.
    pub fn header(text: impl Into<String>) -> Self {
        Self { text: text.into(), kind: ParagraphKind::Header }
    }

    pub(crate) fn from_record(text: String, kind: ParagraphKind) -> Self {
        Self { text, kind }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn kind(&self) -> ParagraphKind {
        self.kind
    }
}

impl Layoutable for Paragraph {
    /// Fill the parent; the visible extent comes from the text.
    fn default_size(&self) -> Vec2 {
        Vec2::ZERO
    }

    fn actual_rect(&self, entity: &Entity, dest: Rect, ctx: &LayoutContext<'_>) -> Option<Rect> {
        let style = TextStyle::resolve(entity, ctx.theme, ctx.scale);
        let lines = style.lines(&self.text, dest.width);
        let width = lines.iter().map(|l| style.line_width(l)).max().unwrap_or(0);
        let height = (lines.len() as f32 * style.line_height()) as i32;
        let x = if style.align_center {
            dest.x + (dest.width - width) / 2
        } else {
            dest.x
        };
        Some(Rect::new(x, dest.y, width, height))
    }
}

impl Drawable for Paragraph {
    fn draw(&self, entity: &Entity, args: &DrawArgs, ctx: &mut DrawContext<'_>) {
        let style = TextStyle::resolve(entity, ctx.theme, args.scale);
        let Some(font) = ctx.assets.font(style.font) else {
            log::warn!("missing font for {:?}", style.font);
            return;
        };
        let line_height = style.line_height();
        for (row, line) in style.lines(&self.text, args.dest.width).iter().enumerate() {
            if line.is_empty() {
                continue;
            }
            let position = Vec2::new(
                style.line_x(line, args.dest) as f32,
                args.dest.y as f32 + row as f32 * line_height,
            );
            ctx.surface.draw_text(font, line, position, args.tint, style.scale);
        }
    }
}

impl Interactable for Paragraph {}

impl ValueHolder for Paragraph {
    fn value(&self) -> WidgetValue {
        WidgetValue::Text(self.text.clone())
    }

    fn set_value(&mut self, value: WidgetValue) -> Result<bool> {
        let WidgetValue::Text(text) = value else {
            return Err(UiError::InvalidValue(format!("{value:?} is not text")));
        };
        if text == self.text {
            return Ok(false);
        }
        self.text = text;
        Ok(true)
    }
}

impl Widget for Paragraph {
    fn widget_type(&self) -> &'static str {
        match self.kind {
            ParagraphKind::Paragraph => "Paragraph",
            ParagraphKind::Label => "Label",
            ParagraphKind::Header => "Header",
        }
    }

    fn style_kinds(&self) -> Vec<&'static str> {
        match self.kind {
            ParagraphKind::Paragraph => vec!["Paragraph"],
            ParagraphKind::Label => vec!["Paragraph", "Label"],
            ParagraphKind::Header => vec!["Paragraph", "Header"],
        }
    }

    fn init_entity(&self, entity: &mut Entity) {
        entity.use_actual_size_for_collision = true;
    }

    fn value_holder(&self) -> Option<&dyn ValueHolder> {
        Some(self)
    }

    fn value_holder_mut(&mut self) -> Option<&mut dyn ValueHolder> {
        Some(self)
    }

    fn to_record(&self) -> WidgetRecord {
        WidgetRecord::Paragraph { text: self.text.clone(), kind: self.kind }
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
