//! Widget system: capability traits, drawing, scrolling.

pub mod draw;
pub mod scroll;
pub mod traits;

pub use draw::{
    BatchState, BlendMode, DrawArgs, DrawContext, DrawPass, Effect, RenderSurface, SamplerMode,
};
pub use scroll::{ScrollScope, ScrollState, ScrollbarState};
pub use traits::{
    Drawable, Interactable, LayoutContext, Layoutable, ValueHolder, Widget, WidgetValue,
};
