//! Themes: per-widget-kind default style sheets, font metrics, asset lookup.
//!
//! A [`Theme`] is built from style tables and cascades `Entity` base styles,
//! then widget-kind styles, into the sheet every new entity starts from.
//! Textures and fonts come from the host through [`ThemeAssets`].

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{Result, UiError};
use crate::style::parser::{parse_style_table, StyleRule};
use crate::style::sheet::StyleSheet;

/// Kind name whose sheet every widget kind inherits from.
pub const BASE_KIND: &str = "Entity";

/// The style table used by [`Theme::builtin`].
pub const BUILTIN_STYLE_TABLE: &str = r#"
Entity {
    FillColor: #ffffffff;
    OutlineColor: #000000ff;
    OutlineWidth: 0;
    ShadowColor: #00000000;
    ShadowOffset: 0 0;
    ShadowScale: 1.0;
    Scale: 1.0;
    Padding: 0 0;
    SpaceBefore: 0 0;
    SpaceAfter: 0 0;
}
Panel { Padding: 30 30; }
Button { Padding: 30 0; SpaceAfter: 0 8; }
Button:hover { FillColor: #f0f0ffff; }
Button:down { FillColor: #c8c8ffff; }
Paragraph { FontStyle: 0; WordWrap: true; AlignCenter: false; SpaceAfter: 0 8; }
Header { FontStyle: 1; Scale: 1.2; FillColor: #ffe08aff; }
Label { Scale: 0.8; FillColor: #dcdcdcff; }
CheckBox { SpaceAfter: 0 8; }
CheckBox:hover { FillColor: #f0f0ffff; }
"#;

// ---------------------------------------------------------------------------
// Asset handles
// ---------------------------------------------------------------------------

/// Opaque texture handle issued by the host's asset loader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(pub u32);

/// Opaque font handle issued by the host's asset loader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FontId(pub u32);

/// Font style variants, read from the `FontStyle` int property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FontStyle {
    #[default]
    Regular,
    Bold,
    Italic,
}

impl FontStyle {
    /// Map the `FontStyle` property value; unknown values read as regular.
    pub fn from_index(index: i32) -> Self {
        match index {
            1 => FontStyle::Bold,
            2 => FontStyle::Italic,
            _ => FontStyle::Regular,
        }
    }
}

/// Fixed-width font metrics at scale 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FontMetrics {
    pub char_width: f32,
    pub line_height: f32,
}

impl FontMetrics {
    /// Validate and create metrics. Both dimensions must be positive and finite.
    pub fn new(char_width: f32, line_height: f32) -> Result<Self> {
        let valid = |v: f32| v.is_finite() && v > 0.0;
        if !valid(char_width) || !valid(line_height) {
            return Err(UiError::InvalidValue(format!(
                "unsupported font metrics {char_width}x{line_height}"
            )));
        }
        Ok(Self { char_width, line_height })
    }
}

impl Default for FontMetrics {
    fn default() -> Self {
        Self { char_width: 10.0, line_height: 20.0 }
    }
}

/// Percentage-based border width of a 9-slice texture.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameMetadata {
    /// Frame width as a fraction of the texture size, per axis.
    pub frame_width: crate::geometry::Vec2,
}

/// Host-side asset lookup: textures, frame metadata, fonts.
///
/// Loaded once per theme switch; the core only reads it while drawing.
pub trait ThemeAssets {
    /// Texture for a logical key such as `"panel_default"` or `"button_hover"`.
    fn texture(&self, key: &str) -> Option<TextureId>;

    /// Frame metadata for a 9-slice texture key.
    fn frame(&self, key: &str) -> FrameMetadata {
        let _ = key;
        FrameMetadata::default()
    }

    /// Pixel size of a texture; needed to cut 9-slice source rectangles.
    fn texture_size(&self, texture: TextureId) -> Option<(i32, i32)> {
        let _ = texture;
        None
    }

    /// Font handle for a style.
    fn font(&self, style: FontStyle) -> Option<FontId>;
}

// ---------------------------------------------------------------------------
// Theme
// ---------------------------------------------------------------------------

/// Per-kind default style sheets plus font metrics.
#[derive(Debug, Clone, Default)]
pub struct Theme {
    sheets: HashMap<String, StyleSheet>,
    fonts: HashMap<FontStyle, FontMetrics>,
}

impl Theme {
    /// An empty theme: no styles, default font metrics.
    pub fn new() -> Self {
        Self::default()
    }

    /// The theme built from [`BUILTIN_STYLE_TABLE`].
    pub fn builtin() -> Self {
        let mut theme = Theme::new();
        // The built-in table is a constant covered by tests.
        if let Err(err) = theme.load_style_table(BUILTIN_STYLE_TABLE) {
            log::warn!("built-in style table failed to load: {err}");
        }
        theme
    }

    /// Parse a style table and merge its rules into this theme.
    ///
    /// Later rules overwrite earlier ones per `(kind, state, property)`.
    pub fn load_style_table(&mut self, input: &str) -> Result<()> {
        let rules = parse_style_table(input)?;
        self.apply_rules(&rules);
        log::debug!("loaded style table with {} rules", rules.len());
        Ok(())
    }

    /// Merge already-parsed rules.
    pub fn apply_rules(&mut self, rules: &[StyleRule]) {
        for rule in rules {
            for selector in &rule.selectors {
                let sheet = self.sheets.entry(selector.kind.clone()).or_default();
                for decl in &rule.declarations {
                    sheet.set(&decl.property, decl.value, selector.state);
                }
            }
        }
    }

    /// The sheet declared for exactly `kind`, if any.
    pub fn sheet(&self, kind: &str) -> Option<&StyleSheet> {
        self.sheets.get(kind)
    }

    /// Replace the sheet declared for `kind`.
    pub fn set_sheet(&mut self, kind: impl Into<String>, sheet: StyleSheet) {
        self.sheets.insert(kind.into(), sheet);
    }

    /// Cascade `Entity` base styles, then each kind in `kinds` in order.
    ///
    /// Widgets pass their kind chain (e.g. `["Paragraph", "Header"]`), so a
    /// preset inherits its family's styles before applying its own.
    pub fn stylesheet_for(&self, kinds: &[&str]) -> StyleSheet {
        let mut sheet = StyleSheet::new();
        if let Some(base) = self.sheets.get(BASE_KIND) {
            sheet.update_from(base);
        }
        for kind in kinds {
            if let Some(specific) = self.sheets.get(*kind) {
                sheet.update_from(specific);
            }
        }
        sheet
    }

    /// Metrics for a font style.
    pub fn font_metrics(&self, style: FontStyle) -> FontMetrics {
        self.fonts.get(&style).copied().unwrap_or_default()
    }

    /// Override metrics for a font style.
    pub fn set_font_metrics(&mut self, style: FontStyle, metrics: FontMetrics) {
        self.fonts.insert(style, metrics);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Vec2;
    use crate::style::color::Color;
    use crate::style::property::{names, EntityState};

    #[test]
    fn builtin_table_parses() {
        assert!(parse_style_table(BUILTIN_STYLE_TABLE).is_ok());
        let theme = Theme::builtin();
        assert!(theme.sheet(BASE_KIND).is_some());
        assert!(theme.sheet("Panel").is_some());
    }

    #[test]
    fn cascade_base_then_kind() {
        let theme = Theme::builtin();
        let sheet = theme.stylesheet_for(&["Panel"]);
        // From Panel.
        assert_eq!(
            sheet.vector(names::PADDING, EntityState::Default),
            Some(Vec2::new(30.0, 30.0))
        );
        // From Entity.
        assert_eq!(sheet.float(names::SCALE, EntityState::Default), Some(1.0));
    }

    #[test]
    fn cascade_kind_chain_order() {
        let theme = Theme::builtin();
        let sheet = theme.stylesheet_for(&["Paragraph", "Header"]);
        assert_eq!(sheet.int(names::FONT_STYLE, EntityState::Default), Some(1));
        assert_eq!(sheet.boolean(names::WORD_WRAP, EntityState::Default), Some(true));
    }

    #[test]
    fn later_tables_override() {
        let mut theme = Theme::builtin();
        theme
            .load_style_table("Button:hover { FillColor: #000000; }")
            .unwrap();
        let sheet = theme.stylesheet_for(&["Button"]);
        assert_eq!(
            sheet.color(names::FILL_COLOR, EntityState::MouseHover),
            Some(Color::BLACK)
        );
    }

    #[test]
    fn bad_table_is_error() {
        let mut theme = Theme::new();
        assert!(matches!(
            theme.load_style_table("Button {"),
            Err(UiError::StyleParse(_))
        ));
    }

    #[test]
    fn font_metrics_validation() {
        assert!(FontMetrics::new(8.0, 16.0).is_ok());
        assert!(matches!(FontMetrics::new(0.0, 16.0), Err(UiError::InvalidValue(_))));
        assert!(matches!(FontMetrics::new(8.0, f32::NAN), Err(UiError::InvalidValue(_))));
    }

    #[test]
    fn font_metrics_override() {
        let mut theme = Theme::new();
        assert_eq!(theme.font_metrics(FontStyle::Bold), FontMetrics::default());
        let m = FontMetrics::new(12.0, 24.0).unwrap();
        theme.set_font_metrics(FontStyle::Bold, m);
        assert_eq!(theme.font_metrics(FontStyle::Bold), m);
        assert_eq!(FontStyle::from_index(7), FontStyle::Regular);
    }
}
