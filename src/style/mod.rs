//! Style engine: per-state property sheets, style-table parsing, themes.

pub mod color;
pub mod property;
pub mod sheet;
pub mod tokenizer;
pub mod parser;
pub mod theme;

pub use color::Color;
pub use property::{names, EntityState, StyleProperty};
pub use sheet::StyleSheet;
pub use theme::{FontId, FontMetrics, FontStyle, FrameMetadata, TextureId, Theme, ThemeAssets};
