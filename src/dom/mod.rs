//! Entity arena: slotmap-backed entity tree with identifier and type queries.

pub mod node;
pub mod query;
pub mod tree;

pub use node::{CursorKind, Entity, EntityId};
pub use tree::{EntityTree, ROOT_IDENTIFIER};
