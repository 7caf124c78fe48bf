//! Per-entity layout cache with dirty and version tracking.
//!
//! Every recomputation bumps the entity's version. A child remembers the
//! parent version it was computed against, and an auto-anchored entity also
//! remembers which sibling it flowed after and that sibling's version, so a
//! change anywhere upstream is noticed without global invalidation.

use crate::dom::node::EntityId;
use crate::geometry::Rect;

/// Cached layout results for one entity.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutCache {
    dirty: bool,
    version: u64,
    parent_seen: Option<u64>,
    flow_seen: Option<(EntityId, u64)>,
    /// Destination rectangle, unscrolled.
    pub dest: Rect,
    /// Destination rectangle shrunk by padding.
    pub internal: Rect,
    /// Visible extent, used for collision when requested.
    pub actual: Rect,
    /// Rectangle later auto-anchored siblings flow after.
    pub flow: Rect,
}

impl Default for LayoutCache {
    fn default() -> Self {
        Self {
            dirty: true,
            version: 0,
            parent_seen: None,
            flow_seen: None,
            dest: Rect::EMPTY,
            internal: Rect::EMPTY,
            actual: Rect::EMPTY,
            flow: Rect::EMPTY,
        }
    }
}

/// Results of one recomputation, committed together.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutResult {
    pub dest: Rect,
    pub internal: Rect,
    pub actual: Rect,
    pub flow: Rect,
}

impl LayoutCache {
    /// Force recomputation on next access.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Incremented on every recomputation.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Whether the cached rectangles are out of date given the current
    /// parent version and flow sibling.
    pub fn is_stale(&self, parent_version: Option<u64>, flow: Option<(EntityId, u64)>) -> bool {
        self.dirty || self.parent_seen != parent_version || self.flow_seen != flow
    }

    /// Store fresh results, clear the dirty flag and bump the version.
    pub fn commit(
        &mut self,
        result: LayoutResult,
        parent_version: Option<u64>,
        flow: Option<(EntityId, u64)>,
    ) {
        self.dest = result.dest;
        self.internal = result.internal;
        self.actual = result.actual;
        self.flow = result.flow;
        self.parent_seen = parent_version;
        self.flow_seen = flow;
        self.dirty = false;
        self.version = self.version.wrapping_add(1);
    }
}
