//! Headless testing toolkit: Pilot, recording surface, layout snapshots.
//!
//! Use the [`Pilot`] to drive a [`UserInterface`](crate::app::UserInterface)
//! frame by frame without a real renderer. Use [`RecordingSurface`] and
//! [`StubAssets`] to assert draw calls by texture key, and
//! [`layout_to_string`] to capture resolved rectangles for snapshot tests.

pub mod pilot;
pub mod snapshot;
pub mod surface;

pub use pilot::Pilot;
pub use snapshot::layout_to_string;
pub use surface::{DrawCall, RecordingSurface, StubAssets, TEXTURE_KEYS};
