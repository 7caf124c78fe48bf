//! Tree-aware layout: lazy recomputation and the top-down layout pass.
//!
//! [`EntityTree::recompute_if_stale`] brings the parent (and, for auto
//! anchors, the previous visible sibling) up to date first, then recomputes
//! the entity only if it is dirty or something it depends on changed version.
//! [`EntityTree::update_layout`] walks the attached tree top-down and also
//! applies auto height after each entity's children are placed.

use serde::{Deserialize, Serialize};

use crate::dom::node::EntityId;
use crate::dom::tree::EntityTree;
use crate::error::{Result, UiError};
use crate::geometry::{Rect, Vec2};
use crate::layout::cache::LayoutResult;
use crate::layout::resolve::{calc_dest_rect, flow_rect, resolve_dragged, FlowSibling, LayoutInput};
use crate::widget::traits::LayoutContext;

/// Rounding slack for auto-height containers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutTuning {
    /// Extra pixels added below the lowest child.
    pub auto_height_slack: i32,
    /// Height changes at or below this many pixels are ignored.
    pub auto_height_epsilon: i32,
}

impl Default for LayoutTuning {
    fn default() -> Self {
        Self { auto_height_slack: 4, auto_height_epsilon: 2 }
    }
}

impl EntityTree {
    /// The rectangle `id` is laid out in, with the version of its owner.
    ///
    /// Children use the parent's internal rectangle; a background uses its
    /// owner's destination rectangle.
    fn layout_parent(&self, id: EntityId) -> Option<(Rect, u64)> {
        if let Some(parent) = self.parent(id) {
            let e = self.entity(parent)?;
            return Some((e.layout.internal, e.layout.version()));
        }
        let owner = self.background_owner(id)?;
        let e = self.entity(owner)?;
        Some((e.layout.dest, e.layout.version()))
    }

    /// Recompute `id` if it or anything it depends on changed.
    ///
    /// Returns whether `id` itself was recomputed.
    pub fn recompute_if_stale(&mut self, id: EntityId) -> bool {
        let Some(entity) = self.entity(id) else {
            return false;
        };
        let auto = entity.anchor().is_auto();
        if let Some(upstream) = self.parent(id).or_else(|| self.background_owner(id)) {
            self.recompute_if_stale(upstream);
        }
        if auto {
            if let Some(prev) = self.previous_visible_sibling(id) {
                self.recompute_if_stale(prev);
            }
        }
        self.recompute_node(id)
    }

    /// Recompute `id` assuming its upstream entities are current.
    fn recompute_node(&mut self, id: EntityId) -> bool {
        let Some(entity) = self.entity(id) else {
            return false;
        };
        let parent = self.layout_parent(id);
        let parent_version = parent.map(|(_, v)| v);
        let prev = if entity.anchor().is_auto() {
            self.previous_visible_sibling(id)
        } else {
            None
        };
        let flow_key = prev.and_then(|p| self.entity(p).map(|e| (p, e.layout.version())));
        if !entity.layout.is_stale(parent_version, flow_key) {
            return false;
        }

        let parent_rect = parent.map_or(self.viewport(), |(rect, _)| rect);
        let Some((result, drag)) = self.compute_rects(id, parent_rect, prev) else {
            return false;
        };
        if let Some(entity) = self.entity_mut(id) {
            entity.drag = drag;
            entity.layout.commit(result, parent_version, flow_key);
        }
        true
    }

    fn compute_rects(
        &self,
        id: EntityId,
        parent_rect: Rect,
        prev: Option<EntityId>,
    ) -> Option<(LayoutResult, crate::layout::resolve::DragState)> {
        let entity = self.entity(id)?;
        let widget = self.widget(id)?;
        let scale = self.scale();
        let mut drag = entity.drag;

        let prev_flow = prev.and_then(|p| self.entity(p)).map(|e| FlowSibling {
            rect: e.layout.flow,
            space_after: e.space_after(),
        });
        let input = LayoutInput {
            anchor: entity.anchor(),
            offset: entity.offset(),
            size: entity.size(),
            default_size: entity.default_size_override().unwrap_or_else(|| widget.default_size()),
            min_size: entity.min_size(),
            max_size: entity.max_size(),
            space_before: entity.space_before(),
            scale,
        };

        let dest = if id == self.root() {
            self.viewport()
        } else if entity.is_draggable() {
            resolve_dragged(&input, parent_rect, prev_flow, &mut drag, entity.limit_drag_to_parent)
        } else {
            calc_dest_rect(&input, parent_rect, prev_flow)
        };
        let internal = dest.shrink(entity.padding() * scale);
        let ctx = LayoutContext { theme: &self.theme, scale };
        let actual = widget.actual_rect(entity, dest, &ctx).unwrap_or(dest);
        let flow = if entity.is_draggable() {
            actual
        } else {
            flow_rect(input.anchor, input.offset, scale, actual)
        };

        Some((LayoutResult { dest, internal, actual, flow }, drag))
    }

    /// Bring every attached entity up to date, top-down.
    pub fn update_layout(&mut self) {
        let root = self.root();
        self.layout_subtree(root);
    }

    fn layout_subtree(&mut self, id: EntityId) {
        self.recompute_node(id);
        if let Some(background) = self.background(id) {
            self.layout_subtree(background);
        }
        let children = self.children(id).to_vec();
        for child in &children {
            if self.parent(*child) == Some(id) {
                self.layout_subtree(*child);
            }
        }
        self.after_children(id, &children);
    }

    /// Report the children's extent to the widget and apply auto height.
    fn after_children(&mut self, id: EntityId, children: &[EntityId]) {
        let visible: Vec<_> = children
            .iter()
            .filter_map(|c| self.entity(*c))
            .filter(|e| e.is_visible())
            .collect();
        let content = visible.iter().map(|e| e.layout.actual).reduce(Rect::union);
        let lowest = visible
            .iter()
            .filter(|e| e.anchor().is_top_flow() && !e.is_draggable())
            .map(|e| e.layout.actual.bottom())
            .max();

        let Some(entity) = self.entity(id) else {
            return;
        };
        let (dest, internal) = (entity.layout.dest, entity.layout.internal);
        let padding_y = (entity.padding().y * self.scale()) as i32;
        let size = entity.size();
        let tuning = self.tuning;
        let scale = self.scale();

        let Some(widget) = self.widget_mut(id) else {
            return;
        };
        widget.children_laid_out(internal, content);
        if !widget.auto_height() {
            return;
        }
        let Some(lowest) = lowest else {
            return;
        };
        let desired = lowest - dest.y + padding_y + tuning.auto_height_slack;
        if (desired - dest.height).abs() > tuning.auto_height_epsilon {
            log::trace!("auto height of {id:?}: {} -> {desired}", dest.height);
            if let Some(entity) = self.entity_mut(id) {
                entity.set_size(Vec2::new(size.x, (desired as f32 / scale).max(1.0)));
            }
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    /// Destination rectangle of `id`, recomputed first if stale.
    pub fn dest_rect(&mut self, id: EntityId) -> Option<Rect> {
        self.recompute_if_stale(id);
        self.entity(id).map(|e| e.layout.dest)
    }

    /// Destination rectangle shrunk by padding, recomputed first if stale.
    pub fn internal_rect(&mut self, id: EntityId) -> Option<Rect> {
        self.recompute_if_stale(id);
        self.entity(id).map(|e| e.layout.internal)
    }

    /// Visible extent, recomputed first if stale.
    pub fn actual_rect(&mut self, id: EntityId) -> Option<Rect> {
        self.recompute_if_stale(id);
        self.entity(id).map(|e| e.layout.actual)
    }

    /// Last computed destination rectangle, without recomputing.
    pub fn cached_dest_rect(&self, id: EntityId) -> Option<Rect> {
        self.entity(id).map(|e| e.layout.dest)
    }

    /// Position of `point` inside `id` as fractions of its size, `(0,0)` at
    /// the top-left corner and `(1,1)` at the bottom-right.
    pub fn relative_point(&mut self, id: EntityId, point: Vec2) -> Result<Vec2> {
        let rect = self.dest_rect(id).ok_or(UiError::UnknownEntity)?;
        if !rect.contains(point) {
            return Err(UiError::PointOutsideEntity { x: point.x, y: point.y });
        }
        Ok(Vec2::new(
            (point.x - rect.x as f32) / rect.width as f32,
            (point.y - rect.y as f32) / rect.height as f32,
        ))
    }
}

// ===========================================================================
// Tests
// ===========================================================================
