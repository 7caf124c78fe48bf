//! # anchor-ui
//!
//! A retained-mode widget library for frame-driven applications such as games.
//!
//! Entities live in a slotmap-backed tree and are positioned by anchors: a named
//! point on the parent plus an offset, or automatic flow that stacks siblings
//! vertically or wraps them inline. Sizes are either fractions of the parent or
//! absolute pixels scaled by a global factor. Each frame the host calls
//! [`UserInterface::update`](app::UserInterface::update) with the frame's input
//! and then [`UserInterface::draw`](app::UserInterface::draw) with its renderer.
//!
//! ## Core Systems
//!
//! - **[`geometry`]** — Vec2 and integer pixel Rect
//! - **[`error`]** — UiError taxonomy and the soft-error policy
//! - **[`style`]** — Per-state style sheets, style-table parser, themes
//! - **[`layout`]** — Anchor resolution, dirty/version caching, auto height
//! - **[`dom`]** — Entity arena with tree operations and queries
//! - **[`event`]** — Input events and provider, callbacks, per-frame dispatch
//! - **[`widget`]** — Widget capability traits, draw traversal, scroll state
//! - **[`widgets`]** — Built-in widgets: Panel, Paragraph, Button, CheckBox
//! - **[`document`]** — RON layout documents with relinking on load
//! - **[`app`]** — UiConfig and the UserInterface root manager
//! - **[`testing`]** — Pilot, recording surface, layout snapshots

// Foundation
pub mod error;
pub mod geometry;

// Core systems
pub mod dom;
pub mod layout;
pub mod style;

// Widget system
pub mod widget;
pub mod widgets;

// Events
pub mod event;

// Persistence
pub mod document;

// Application
pub mod app;

// Headless test support
pub mod testing;

pub use app::{UiConfig, UserInterface};
pub use error::{ErrorPolicy, Result, UiError};
