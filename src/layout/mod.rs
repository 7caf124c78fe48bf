//! Layout: anchors, pure rectangle resolution, dirty/version caching and the
//! tree-aware layout pass.

pub mod anchor;
pub mod cache;
pub mod engine;
pub mod resolve;

pub use anchor::Anchor;
pub use cache::LayoutCache;
pub use engine::LayoutTuning;
pub use resolve::{calc_dest_rect, resolve_size, DragState, FlowSibling, LayoutInput};
