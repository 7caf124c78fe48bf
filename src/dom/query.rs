//! Tree queries: traversal orders, lookups by identifier, type or predicate.

use std::collections::VecDeque;

use super::node::{Entity, EntityId};
use super::tree::EntityTree;
use crate::error::{Result, UiError};

impl EntityTree {
    /// `id` and its descendants, parents before children, children in
    /// insertion order.
    pub fn walk_depth_first(&self, id: EntityId) -> Vec<EntityId> {
        if !self.contains(id) {
            return Vec::new();
        }
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(node) = stack.pop() {
            out.push(node);
            stack.extend(self.children(node).iter().rev().copied());
        }
        out
    }

    /// `id` and its descendants, level by level.
    pub fn walk_breadth_first(&self, id: EntityId) -> Vec<EntityId> {
        if !self.contains(id) {
            return Vec::new();
        }
        let mut out = Vec::new();
        let mut queue = VecDeque::from([id]);
        while let Some(node) = queue.pop_front() {
            out.push(node);
            queue.extend(self.children(node).iter().copied());
        }
        out
    }

    /// First entity under the root (depth first) with `identifier`.
    pub fn find_by_identifier(&self, identifier: &str) -> Option<EntityId> {
        self.find_in_subtree(self.root(), identifier)
    }

    /// First entity in the subtree of `id` (inclusive) with `identifier`.
    pub fn find_in_subtree(&self, id: EntityId, identifier: &str) -> Option<EntityId> {
        self.walk_depth_first(id)
            .into_iter()
            .find(|node| self.entity(*node).is_some_and(|e| e.identifier == identifier))
    }

    /// Direct child of `parent` with `identifier`.
    ///
    /// A missing child is a not-found error, silenced under the lenient policy.
    pub fn get_child(&self, parent: EntityId, identifier: &str) -> Result<Option<EntityId>> {
        let result = self
            .children(parent)
            .iter()
            .copied()
            .find(|child| self.entity(*child).is_some_and(|e| e.identifier == identifier))
            .ok_or_else(|| UiError::not_found("child", identifier));
        self.policy.check_opt(result)
    }

    /// Attached entities whose widget kind is `widget_type`, depth first.
    pub fn query_by_type(&self, widget_type: &str) -> Vec<EntityId> {
        self.walk_depth_first(self.root())
            .into_iter()
            .filter(|node| self.widget(*node).is_some_and(|w| w.widget_type() == widget_type))
            .collect()
    }

    /// Attached entities matching `predicate`, depth first.
    pub fn query_all(&self, predicate: impl Fn(&Entity) -> bool) -> Vec<EntityId> {
        self.walk_depth_first(self.root())
            .into_iter()
            .filter(|node| self.entity(*node).is_some_and(&predicate))
            .collect()
    }
}
