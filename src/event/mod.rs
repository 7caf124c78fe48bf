//! Event system: raw input, the input provider, callbacks, per-frame dispatch.

pub mod callbacks;
pub mod dispatch;
pub mod input;
pub mod provider;

pub use callbacks::{Callback, EventCallbacks, EventKind};
pub use dispatch::{DispatchState, FrameInfo};
pub use input::{from_crossterm, InputEvent, Key, KeyEvent, Modifiers, MouseButton};
pub use provider::{FrameInput, InputProvider, PointerTransform};
