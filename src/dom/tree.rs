//! The entity tree: arena storage, parent/child links, flags, callbacks.
//!
//! All entities live in a single `SlotMap`. Parent/child relationships, widget
//! objects, callbacks and user data are stored in secondary maps so that an
//! entity's core state can be borrowed independently of its widget, and
//! destroying a subtree is O(subtree size).
//!
//! An entity that is not attached anywhere still lives in the arena; it is
//! simply not reachable from the root. [`EntityTree::destroy`] removes it.

use std::any::Any;

use slotmap::{SecondaryMap, SlotMap};

use super::node::{Entity, EntityId};
use crate::error::{ErrorPolicy, Result, UiError};
use crate::event::callbacks::{Callback, EventCallbacks, EventKind};
use crate::geometry::{Rect, Vec2};
use crate::layout::anchor::Anchor;
use crate::layout::engine::LayoutTuning;
use crate::style::theme::Theme;
use crate::widget::traits::{Widget, WidgetValue};
use crate::widgets::panel::{Panel, PanelSkin};

/// Empty slice constant for returning when an entity has no children.
const EMPTY_CHILDREN: &[EntityId] = &[];

/// Identifier given to the root entity.
pub const ROOT_IDENTIFIER: &str = "root";

/// The entity arena and everything keyed by entity.
pub struct EntityTree {
    pub(crate) nodes: SlotMap<EntityId, Entity>,
    pub(crate) widgets: SecondaryMap<EntityId, Box<dyn Widget>>,
    callbacks: SecondaryMap<EntityId, EventCallbacks>,
    user_data: SecondaryMap<EntityId, Box<dyn Any>>,
    children: SecondaryMap<EntityId, Vec<EntityId>>,
    parent: SecondaryMap<EntityId, EntityId>,
    /// Priority-sorted children; an entry is present only while valid.
    sorted: SecondaryMap<EntityId, Vec<EntityId>>,
    background: SecondaryMap<EntityId, EntityId>,
    background_owner: SecondaryMap<EntityId, EntityId>,
    globals: EventCallbacks,
    root: EntityId,
    viewport: Rect,
    scale: f32,
    /// Theme new entities take their styles from.
    pub theme: Theme,
    /// How soft errors are reported.
    pub policy: ErrorPolicy,
    /// Auto-height fudge constants.
    pub tuning: LayoutTuning,
}

impl std::fmt::Debug for EntityTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityTree")
            .field("len", &self.nodes.len())
            .field("root", &self.root)
            .field("viewport", &self.viewport)
            .field("scale", &self.scale)
            .finish_non_exhaustive()
    }
}

impl EntityTree {
    /// Create a tree holding only the root panel.
    pub fn new(theme: Theme) -> Self {
        let mut tree = Self {
            nodes: SlotMap::with_key(),
            widgets: SecondaryMap::new(),
            callbacks: SecondaryMap::new(),
            user_data: SecondaryMap::new(),
            children: SecondaryMap::new(),
            parent: SecondaryMap::new(),
            sorted: SecondaryMap::new(),
            background: SecondaryMap::new(),
            background_owner: SecondaryMap::new(),
            globals: EventCallbacks::new(),
            root: EntityId::default(),
            viewport: Rect::EMPTY,
            scale: 1.0,
            theme,
            policy: ErrorPolicy::STRICT,
            tuning: LayoutTuning::default(),
        };
        let mut root = Entity::new(Anchor::TopLeft, Vec2::ZERO, Vec2::ZERO)
            .with_identifier(ROOT_IDENTIFIER)
            .with_click_through(true);
        root.set_padding(Vec2::ZERO);
        tree.root = tree.spawn(root, Panel::new(PanelSkin::None));
        tree
    }

    // ── Arena ────────────────────────────────────────────────────────

    /// Create a detached entity and its internal children.
    ///
    /// The entity's style starts from the theme cascade for the widget's
    /// kinds; styles already set on `entity` override it.
    pub fn spawn(&mut self, entity: Entity, widget: impl Widget) -> EntityId {
        self.spawn_boxed(entity, Box::new(widget))
    }

    pub fn spawn_boxed(&mut self, mut entity: Entity, mut widget: Box<dyn Widget>) -> EntityId {
        widget.init_entity(&mut entity);
        let mut sheet = self.theme.stylesheet_for(&widget.style_kinds());
        sheet.update_from(entity.style());
        entity.replace_style(sheet);

        let internal = widget.compose();
        let widget_type = widget.widget_type();
        let id = self.insert_raw(entity, widget);
        for (child_entity, child_widget) in internal {
            let child = self.spawn_boxed(child_entity, child_widget);
            self.link(id, child, None);
        }
        if let Err(err) = self.relink_widget(id) {
            log::warn!("{widget_type} failed to link its internal children: {err}");
        }
        log::debug!("spawned {widget_type} {id:?}");
        id
    }

    /// Insert an entity without theme styling or composition.
    pub(crate) fn insert_raw(&mut self, entity: Entity, widget: Box<dyn Widget>) -> EntityId {
        let id = self.nodes.insert(entity);
        self.widgets.insert(id, widget);
        self.callbacks.insert(id, EventCallbacks::new());
        self.children.insert(id, Vec::new());
        id
    }

    /// Run the widget's relink hook for `id`.
    pub(crate) fn relink_widget(&mut self, id: EntityId) -> Result<()> {
        let mut widget = self.widgets.remove(id).ok_or(UiError::UnknownEntity)?;
        let result = widget.relink(self, id);
        self.widgets.insert(id, widget);
        result
    }

    /// Remove `id` and all its descendants from the arena.
    pub fn destroy(&mut self, id: EntityId) -> Result<()> {
        let result = self.try_destroy(id);
        self.policy.check(result)
    }

    fn try_destroy(&mut self, id: EntityId) -> Result<()> {
        self.require(id)?;
        if id == self.root {
            return Err(UiError::CannotRemoveRoot);
        }
        if let Some(parent) = self.parent.get(id).copied() {
            self.unlink(parent, id);
        }
        for node in self.walk_depth_first(id) {
            self.nodes.remove(node);
            self.widgets.remove(node);
            self.callbacks.remove(node);
            self.user_data.remove(node);
            self.children.remove(node);
            self.parent.remove(node);
            self.sorted.remove(node);
            if let Some(bg) = self.background.remove(node) {
                self.background_owner.remove(bg);
            }
            if let Some(owner) = self.background_owner.remove(node) {
                self.background.remove(owner);
            }
        }
        log::debug!("destroyed {id:?}");
        Ok(())
    }

    pub fn root(&self) -> EntityId {
        self.root
    }

    /// Number of entities in the arena, attached or not.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always `false`: the root is never removed.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.nodes.contains_key(id)
    }

    fn require(&self, id: EntityId) -> Result<()> {
        if self.contains(id) {
            Ok(())
        } else {
            Err(UiError::UnknownEntity)
        }
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.nodes.get(id)
    }

    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.nodes.get_mut(id)
    }

    /// Entity lookup that reports a missing entity as an error.
    pub fn try_entity_mut(&mut self, id: EntityId) -> Result<&mut Entity> {
        self.nodes.get_mut(id).ok_or(UiError::UnknownEntity)
    }

    pub fn widget(&self, id: EntityId) -> Option<&dyn Widget> {
        self.widgets.get(id).map(|w| w.as_ref())
    }

    pub fn widget_mut(&mut self, id: EntityId) -> Option<&mut (dyn Widget + 'static)> {
        self.widgets.get_mut(id).map(|w| w.as_mut())
    }

    /// Downcast the widget of `id` to a concrete type.
    pub fn widget_as<T: Widget>(&self, id: EntityId) -> Option<&T> {
        self.widgets.get(id).and_then(|w| w.as_any().downcast_ref::<T>())
    }

    pub fn widget_as_mut<T: Widget>(&mut self, id: EntityId) -> Option<&mut T> {
        self.widgets.get_mut(id).and_then(|w| w.as_any_mut().downcast_mut::<T>())
    }

    // ── Links ────────────────────────────────────────────────────────

    pub fn parent(&self, id: EntityId) -> Option<EntityId> {
        self.parent.get(id).copied()
    }

    /// Children in insertion order.
    pub fn children(&self, id: EntityId) -> &[EntityId] {
        self.children.get(id).map_or(EMPTY_CHILDREN, Vec::as_slice)
    }

    /// Ancestors from the parent up to the topmost one.
    pub fn ancestors(&self, id: EntityId) -> Vec<EntityId> {
        let mut result = Vec::new();
        let mut current = id;
        while let Some(parent) = self.parent(current) {
            result.push(parent);
            current = parent;
        }
        result
    }

    /// Whether `ancestor` is a strict ancestor of `id`.
    pub fn is_ancestor(&self, ancestor: EntityId, id: EntityId) -> bool {
        let mut current = id;
        while let Some(parent) = self.parent(current) {
            if parent == ancestor {
                return true;
            }
            current = parent;
        }
        false
    }

    /// Whether `id` is the root or reachable from it.
    pub fn is_attached(&self, id: EntityId) -> bool {
        self.contains(id) && (id == self.root || self.is_ancestor(self.root, id))
    }

    /// Position of `id` in its parent's child list.
    pub fn index_in_parent(&self, id: EntityId) -> Option<usize> {
        let parent = self.parent(id)?;
        self.children(parent).iter().position(|c| *c == id)
    }

    /// Append `child` to `parent`.
    pub fn add_child(&mut self, parent: EntityId, child: EntityId) -> Result<()> {
        let result = self.try_attach(parent, child, None);
        self.policy.check(result)
    }

    /// Insert `child` into `parent` at `index` (clamped to the child count).
    pub fn insert_child(&mut self, parent: EntityId, child: EntityId, index: usize) -> Result<()> {
        let result = self.try_attach(parent, child, Some(index));
        self.policy.check(result)
    }

    fn try_attach(&mut self, parent: EntityId, child: EntityId, index: Option<usize>) -> Result<()> {
        self.require(parent)?;
        self.require(child)?;
        if child == self.root {
            return Err(UiError::CannotRemoveRoot);
        }
        if self.parent.contains_key(child) || self.background_owner.contains_key(child) {
            return Err(UiError::AlreadyParented);
        }
        if child == parent || self.is_ancestor(child, parent) {
            return Err(UiError::WouldCreateCycle);
        }
        self.link(parent, child, index);
        log::debug!("attached {child:?} to {parent:?}");
        Ok(())
    }

    pub(crate) fn link(&mut self, parent: EntityId, child: EntityId, index: Option<usize>) {
        if let Some(list) = self.children.get_mut(parent) {
            match index {
                Some(i) => list.insert(i.min(list.len()), child),
                None => list.push(child),
            }
        }
        self.parent.insert(child, parent);
        self.sorted.remove(parent);
        if let Some(entity) = self.nodes.get_mut(child) {
            entity.mark_dirty();
        }
    }

    fn unlink(&mut self, parent: EntityId, child: EntityId) {
        if let Some(list) = self.children.get_mut(parent) {
            list.retain(|c| *c != child);
        }
        self.parent.remove(child);
        self.sorted.remove(parent);
        if let Some(entity) = self.nodes.get_mut(child) {
            entity.state = crate::style::property::EntityState::Default;
            entity.focused = false;
            entity.mark_dirty();
        }
    }

    /// Detach `child` from `parent`. The child stays alive, detached.
    pub fn remove_child(&mut self, parent: EntityId, child: EntityId) -> Result<()> {
        let result = self.try_remove_child(parent, child);
        self.policy.check(result)
    }

    fn try_remove_child(&mut self, parent: EntityId, child: EntityId) -> Result<()> {
        self.require(parent)?;
        self.require(child)?;
        if self.parent(child) != Some(parent) {
            return Err(UiError::NotAChild);
        }
        self.unlink(parent, child);
        log::debug!("detached {child:?} from {parent:?}");
        Ok(())
    }

    /// Detach `child` from whatever parent it has.
    pub fn remove_from_parent(&mut self, child: EntityId) -> Result<()> {
        let result = match self.parent(child) {
            Some(parent) => self.try_remove_child(parent, child),
            None if child == self.root => Err(UiError::CannotRemoveRoot),
            None if self.contains(child) => Err(UiError::NotAChild),
            None => Err(UiError::UnknownEntity),
        };
        self.policy.check(result)
    }

    /// Detach every child of `parent`, leaving them alive.
    pub fn clear_children(&mut self, parent: EntityId) {
        for child in self.children(parent).to_vec() {
            self.unlink(parent, child);
        }
    }

    /// Move `id` to the end of its parent's child list, so it draws on top
    /// and is updated first.
    pub fn bring_to_front(&mut self, id: EntityId) -> Result<()> {
        let result = match self.parent(id) {
            Some(parent) => {
                if let Some(list) = self.children.get_mut(parent) {
                    list.retain(|c| *c != id);
                    list.push(id);
                }
                self.sorted.remove(parent);
                if let Some(entity) = self.nodes.get_mut(id) {
                    entity.mark_dirty();
                }
                Ok(())
            }
            None if self.contains(id) => Err(UiError::NotAChild),
            None => Err(UiError::UnknownEntity),
        };
        self.policy.check(result)
    }

    // ── Priority ─────────────────────────────────────────────────────

    /// Change the priority bonus, re-sorting the parent's children lazily.
    pub fn set_priority_bonus(&mut self, id: EntityId, bonus: i32) {
        if let Some(entity) = self.nodes.get_mut(id) {
            entity.priority_bonus = bonus;
        }
        if let Some(parent) = self.parent(id) {
            self.sorted.remove(parent);
        }
    }

    /// Children sorted by ascending priority (index plus bonus), ties kept in
    /// insertion order. Drawing walks this forwards, updating backwards.
    pub fn sorted_children(&mut self, id: EntityId) -> Vec<EntityId> {
        if let Some(sorted) = self.sorted.get(id) {
            return sorted.clone();
        }
        let mut keyed: Vec<(i64, EntityId)> = self
            .children(id)
            .iter()
            .enumerate()
            .map(|(index, child)| {
                let bonus = self.nodes.get(*child).map_or(0, |e| e.priority_bonus);
                (index as i64 + i64::from(bonus), *child)
            })
            .collect();
        keyed.sort_by_key(|(priority, _)| *priority);
        let sorted: Vec<EntityId> = keyed.into_iter().map(|(_, c)| c).collect();
        if self.contains(id) {
            self.sorted.insert(id, sorted.clone());
        }
        sorted
    }

    /// The closest earlier sibling whose own visibility flag is set.
    pub fn previous_visible_sibling(&self, id: EntityId) -> Option<EntityId> {
        let parent = self.parent(id)?;
        let siblings = self.children(parent);
        let index = siblings.iter().position(|c| *c == id)?;
        siblings[..index]
            .iter()
            .rev()
            .copied()
            .find(|s| self.nodes.get(*s).is_some_and(|e| e.visible))
    }

    // ── Background ───────────────────────────────────────────────────

    /// Attach (or with `None` clear) the background of `id`. A background is
    /// laid out against its owner's rectangle and drawn just before it.
    pub fn set_background(&mut self, id: EntityId, background: Option<EntityId>) -> Result<()> {
        let result = self.try_set_background(id, background);
        self.policy.check(result)
    }

    fn try_set_background(&mut self, id: EntityId, background: Option<EntityId>) -> Result<()> {
        self.require(id)?;
        if let Some(bg) = background {
            self.require(bg)?;
            if bg == self.root
                || self.parent.contains_key(bg)
                || self.background_owner.get(bg).is_some_and(|owner| *owner != id)
            {
                return Err(UiError::BackgroundHasParent);
            }
        }
        if let Some(old) = self.background.remove(id) {
            self.background_owner.remove(old);
        }
        if let Some(bg) = background {
            self.background.insert(id, bg);
            self.background_owner.insert(bg, id);
            if let Some(entity) = self.nodes.get_mut(bg) {
                entity.mark_dirty();
            }
        }
        Ok(())
    }

    pub fn background(&self, id: EntityId) -> Option<EntityId> {
        self.background.get(id).copied()
    }

    /// The entity `id` is the background of.
    pub fn background_owner(&self, id: EntityId) -> Option<EntityId> {
        self.background_owner.get(id).copied()
    }

    // ── Flags ────────────────────────────────────────────────────────

    /// Show or hide `id`, firing `VisibilityChange` when the flag changes.
    pub fn set_visible(&mut self, id: EntityId, visible: bool) {
        let Some(entity) = self.nodes.get_mut(id) else {
            return;
        };
        if entity.visible == visible {
            return;
        }
        entity.visible = visible;
        entity.mark_dirty();
        self.fire(id, EventKind::VisibilityChange);
    }

    /// Visible itself and through every ancestor.
    pub fn is_visible_in_tree(&self, id: EntityId) -> bool {
        self.flag_in_tree(id, |e| e.visible)
    }

    /// Enabled itself and through every ancestor.
    pub fn is_enabled_in_tree(&self, id: EntityId) -> bool {
        self.flag_in_tree(id, |e| e.enabled)
    }

    fn flag_in_tree(&self, id: EntityId, flag: impl Fn(&Entity) -> bool) -> bool {
        let Some(entity) = self.nodes.get(id) else {
            return false;
        };
        flag(entity)
            && self
                .ancestors(id)
                .iter()
                .all(|a| self.nodes.get(*a).is_some_and(&flag))
    }

    /// Whether a lock on `id` or an ancestor blocks its events. A lock on the
    /// direct parent is ignored when `id` opts into events through it.
    pub fn is_locked_for_events(&self, id: EntityId) -> bool {
        let Some(entity) = self.nodes.get(id) else {
            return true;
        };
        if entity.locked {
            return true;
        }
        self.ancestors(id).iter().enumerate().any(|(depth, a)| {
            let locked = self.nodes.get(*a).is_some_and(|e| e.locked);
            locked && !(depth == 0 && entity.events_through_locked_parent)
        })
    }

    // ── Geometry state ───────────────────────────────────────────────

    pub fn viewport(&self) -> Rect {
        self.viewport
    }

    /// Resize the viewport the root covers.
    pub fn set_viewport(&mut self, viewport: Rect) {
        if self.viewport != viewport {
            self.viewport = viewport;
            if let Some(root) = self.nodes.get_mut(self.root) {
                root.mark_dirty();
            }
        }
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Change the global scale. Every entity recomputes.
    pub fn set_scale(&mut self, scale: f32) -> Result<()> {
        if !scale.is_finite() || scale <= 0.0 {
            return Err(UiError::InvalidValue(format!("unsupported scale {scale}")));
        }
        self.scale = scale;
        for entity in self.nodes.values_mut() {
            entity.mark_dirty();
        }
        Ok(())
    }

    // ── Callbacks ────────────────────────────────────────────────────

    /// Register a callback on `id`.
    pub fn on(
        &mut self,
        id: EntityId,
        kind: EventKind,
        callback: impl FnMut(&mut EntityTree, EntityId) + 'static,
    ) -> Result<()> {
        let result = match self.callbacks.get_mut(id) {
            Some(slot) => {
                slot.push(kind, Box::new(callback) as Callback);
                Ok(())
            }
            None => Err(UiError::UnknownEntity),
        };
        self.policy.check(result)
    }

    /// Remove every callback of `kind` from `id`.
    pub fn clear_callbacks(&mut self, id: EntityId, kind: EventKind) {
        if let Some(slot) = self.callbacks.get_mut(id) {
            slot.clear(kind);
        }
    }

    /// Register a callback fired for `kind` on any entity.
    pub fn on_global(
        &mut self,
        kind: EventKind,
        callback: impl FnMut(&mut EntityTree, EntityId) + 'static,
    ) {
        self.globals.push(kind, Box::new(callback));
    }

    pub fn clear_global_callbacks(&mut self, kind: EventKind) {
        self.globals.clear(kind);
    }

    /// Drop every global callback of every kind.
    pub fn clear_all_global_callbacks(&mut self) {
        self.globals = EventCallbacks::new();
    }

    /// Forward every event fired on `from` to `to` as well.
    pub fn propagate_events_to(&mut self, from: EntityId, to: EntityId) -> Result<()> {
        let result = match (self.contains(to), self.nodes.get_mut(from)) {
            (true, Some(entity)) => {
                if !entity.propagate_to.contains(&to) {
                    entity.propagate_to.push(to);
                }
                Ok(())
            }
            _ => Err(UiError::UnknownEntity),
        };
        self.policy.check(result)
    }

    /// Fire `kind` on `id`: its own callbacks, those of its propagation
    /// targets (each at most once), then the global callbacks.
    pub fn fire(&mut self, id: EntityId, kind: EventKind) {
        if !self.contains(id) {
            return;
        }
        log::trace!("{kind:?} on {id:?}");
        let mut visited = Vec::new();
        self.fire_local(id, kind, &mut visited);

        let mut delivered = self.globals.take(kind);
        for callback in delivered.iter_mut() {
            callback(self, id);
        }
        self.globals.restore(kind, delivered);
    }

    fn fire_local(&mut self, id: EntityId, kind: EventKind, visited: &mut Vec<EntityId>) {
        if visited.contains(&id) || !self.contains(id) {
            return;
        }
        visited.push(id);

        let mut delivered = self.callbacks.get_mut(id).map(|s| s.take(kind)).unwrap_or_default();
        for callback in delivered.iter_mut() {
            callback(self, id);
        }
        if let Some(slot) = self.callbacks.get_mut(id) {
            slot.restore(kind, delivered);
        }

        let targets = self.nodes.get(id).map(|e| e.propagate_to.clone()).unwrap_or_default();
        for target in targets {
            self.fire_local(target, kind, visited);
        }
    }

    // ── User data and values ─────────────────────────────────────────

    /// Attach arbitrary data to `id`, replacing any previous data.
    pub fn set_user_data(&mut self, id: EntityId, data: impl Any) -> Result<()> {
        let result = if self.contains(id) {
            self.user_data.insert(id, Box::new(data));
            Ok(())
        } else {
            Err(UiError::UnknownEntity)
        };
        self.policy.check(result)
    }

    pub fn user_data<T: Any>(&self, id: EntityId) -> Option<&T> {
        self.user_data.get(id).and_then(|d| d.downcast_ref::<T>())
    }

    pub fn user_data_mut<T: Any>(&mut self, id: EntityId) -> Option<&mut T> {
        self.user_data.get_mut(id).and_then(|d| d.downcast_mut::<T>())
    }

    /// The value held by the widget of `id`, if it holds one.
    pub fn value(&self, id: EntityId) -> Option<WidgetValue> {
        self.widget(id)?.value_holder().map(|h| h.value())
    }

    /// Replace the held value, firing `ValueChange` when it changed.
    pub fn set_value(&mut self, id: EntityId, value: WidgetValue) -> Result<()> {
        let result = self.try_set_value(id, value);
        self.policy.check(result)
    }

    fn try_set_value(&mut self, id: EntityId, value: WidgetValue) -> Result<()> {
        let widget = self.widgets.get_mut(id).ok_or(UiError::UnknownEntity)?;
        let widget_type = widget.widget_type();
        let holder = widget
            .value_holder_mut()
            .ok_or_else(|| UiError::InvalidValue(format!("{widget_type} holds no value")))?;
        if holder.set_value(value)? {
            if let Some(entity) = self.nodes.get_mut(id) {
                entity.mark_dirty();
            }
            self.fire(id, EventKind::ValueChange);
        }
        Ok(())
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    use crate::widgets::checkbox::CheckBox;

    fn tree() -> EntityTree {
        EntityTree::new(Theme::builtin())
    }

    fn panel(tree: &mut EntityTree) -> EntityId {
        tree.spawn(Entity::default(), Panel::new(PanelSkin::Default))
    }

    // -----------------------------------------------------------------------
    // Structure
    // -----------------------------------------------------------------------

    #[test]
    fn new_tree_has_root() {
        let t = tree();
        assert_eq!(t.len(), 1);
        assert!(t.is_attached(t.root()));
        assert_eq!(t.entity(t.root()).map(|e| e.identifier.as_str()), Some(ROOT_IDENTIFIER));
        assert_eq!(t.entity(t.root()).map(|e| e.padding()), Some(Vec2::ZERO));
    }

    #[test]
    fn spawn_is_detached() {
        let mut t = tree();
        let p = panel(&mut t);
        assert!(t.contains(p));
        assert!(!t.is_attached(p));
        assert_eq!(t.parent(p), None);
    }

    #[test]
    fn spawn_applies_theme_then_overrides() {
        let mut t = tree();
        let custom = Entity::default().with_style(
            crate::style::names::PADDING,
            Vec2::new(1.0, 2.0),
            crate::style::EntityState::Default,
        );
        let p = t.spawn(custom, Panel::new(PanelSkin::Default));
        let e = t.entity(p).unwrap();
        assert_eq!(e.padding(), Vec2::new(1.0, 2.0));
        // Base style still cascaded in.
        assert!(e.style().float(crate::style::names::SCALE, crate::style::EntityState::Default).is_some());
    }

    #[test]
    fn add_and_remove_child() {
        let mut t = tree();
        let root = t.root();
        let p = panel(&mut t);
        t.add_child(root, p).unwrap();
        assert_eq!(t.parent(p), Some(root));
        assert_eq!(t.children(root), &[p]);
        assert_eq!(t.index_in_parent(p), Some(0));

        t.remove_child(root, p).unwrap();
        assert_eq!(t.parent(p), None);
        assert!(t.children(root).is_empty());
        assert!(t.contains(p), "detached entities stay alive");
    }

    #[test]
    fn double_parent_is_error() {
        let mut t = tree();
        let root = t.root();
        let a = panel(&mut t);
        let b = panel(&mut t);
        t.add_child(root, a).unwrap();
        t.add_child(root, b).unwrap();
        assert!(matches!(t.add_child(b, a), Err(UiError::AlreadyParented)));
        // Tree unchanged.
        assert_eq!(t.children(root), &[a, b]);
        assert!(t.children(b).is_empty());
    }

    #[test]
    fn remove_non_child_is_error() {
        let mut t = tree();
        let root = t.root();
        let a = panel(&mut t);
        assert!(matches!(t.remove_child(root, a), Err(UiError::NotAChild)));
        assert!(matches!(t.remove_from_parent(root), Err(UiError::CannotRemoveRoot)));
    }

    #[test]
    fn lenient_policy_swallows_soft_errors() {
        let mut t = tree();
        t.policy = ErrorPolicy::LENIENT;
        let root = t.root();
        let a = panel(&mut t);
        assert!(t.remove_child(root, a).is_ok());
        assert!(t.children(root).is_empty());
    }

    #[test]
    fn cycles_are_rejected() {
        let mut t = tree();
        let a = panel(&mut t);
        let b = panel(&mut t);
        t.add_child(a, b).unwrap();
        assert!(matches!(t.add_child(b, a), Err(UiError::WouldCreateCycle)));
        assert!(matches!(t.add_child(a, a), Err(UiError::WouldCreateCycle)));
        let root = t.root();
        assert!(matches!(t.add_child(a, root), Err(UiError::CannotRemoveRoot)));
    }

    #[test]
    fn insert_child_at_index() {
        let mut t = tree();
        let root = t.root();
        let a = panel(&mut t);
        let b = panel(&mut t);
        let c = panel(&mut t);
        t.add_child(root, a).unwrap();
        t.add_child(root, b).unwrap();
        t.insert_child(root, c, 1).unwrap();
        assert_eq!(t.children(root), &[a, c, b]);
    }

    #[test]
    fn destroy_removes_subtree() {
        let mut t = tree();
        let root = t.root();
        let a = panel(&mut t);
        let b = panel(&mut t);
        t.add_child(root, a).unwrap();
        t.add_child(a, b).unwrap();
        t.destroy(a).unwrap();
        assert!(!t.contains(a));
        assert!(!t.contains(b));
        assert!(t.children(root).is_empty());
        assert!(matches!(t.destroy(root), Err(UiError::CannotRemoveRoot)));
        assert!(matches!(t.destroy(a), Err(UiError::UnknownEntity)));
    }

    #[test]
    fn clear_children_detaches_all() {
        let mut t = tree();
        let root = t.root();
        let a = panel(&mut t);
        let b = panel(&mut t);
        t.add_child(root, a).unwrap();
        t.add_child(root, b).unwrap();
        t.clear_children(root);
        assert!(t.children(root).is_empty());
        assert_eq!(t.parent(a), None);
        assert!(t.contains(b));
    }

    // -----------------------------------------------------------------------
    // Priority
    // -----------------------------------------------------------------------

    #[test]
    fn sorted_children_by_index_and_bonus() {
        let mut t = tree();
        let root = t.root();
        let ids: Vec<_> = (0..3).map(|_| panel(&mut t)).collect();
        for id in &ids {
            t.add_child(root, *id).unwrap();
        }
        assert_eq!(t.sorted_children(root), ids);

        t.set_priority_bonus(ids[0], 5);
        assert_eq!(t.sorted_children(root), vec![ids[1], ids[2], ids[0]]);
    }

    #[test]
    fn bring_to_front_moves_last() {
        let mut t = tree();
        let root = t.root();
        let a = panel(&mut t);
        let b = panel(&mut t);
        t.add_child(root, a).unwrap();
        t.add_child(root, b).unwrap();
        assert_eq!(t.sorted_children(root), vec![a, b]);
        t.bring_to_front(a).unwrap();
        assert_eq!(t.children(root), &[b, a]);
        assert_eq!(t.sorted_children(root), vec![b, a]);
    }

    #[test]
    fn previous_visible_sibling_skips_hidden() {
        let mut t = tree();
        let root = t.root();
        let a = panel(&mut t);
        let b = panel(&mut t);
        let c = panel(&mut t);
        for id in [a, b, c] {
            t.add_child(root, id).unwrap();
        }
        assert_eq!(t.previous_visible_sibling(c), Some(b));
        t.set_visible(b, false);
        assert_eq!(t.previous_visible_sibling(c), Some(a));
        assert_eq!(t.previous_visible_sibling(a), None);
    }

    // -----------------------------------------------------------------------
    // Flags
    // -----------------------------------------------------------------------

    #[test]
    fn flags_inherit_from_ancestors() {
        let mut t = tree();
        let root = t.root();
        let a = panel(&mut t);
        let b = panel(&mut t);
        t.add_child(root, a).unwrap();
        t.add_child(a, b).unwrap();

        t.entity_mut(a).unwrap().enabled = false;
        assert!(!t.is_enabled_in_tree(b));
        assert!(t.is_visible_in_tree(b));

        t.set_visible(a, false);
        assert!(!t.is_visible_in_tree(b));
    }

    #[test]
    fn locked_parent_exception() {
        let mut t = tree();
        let root = t.root();
        let a = panel(&mut t);
        let b = panel(&mut t);
        t.add_child(root, a).unwrap();
        t.add_child(a, b).unwrap();
        t.entity_mut(a).unwrap().locked = true;
        assert!(t.is_locked_for_events(b));
        t.entity_mut(b).unwrap().events_through_locked_parent = true;
        assert!(!t.is_locked_for_events(b));

        // The exception covers only the direct parent.
        t.entity_mut(a).unwrap().locked = false;
        t.entity_mut(root).unwrap().locked = true;
        assert!(t.is_locked_for_events(b));
    }

    // -----------------------------------------------------------------------
    // Background
    // -----------------------------------------------------------------------

    #[test]
    fn background_must_be_detached() {
        let mut t = tree();
        let root = t.root();
        let a = panel(&mut t);
        let bg = panel(&mut t);
        t.add_child(root, a).unwrap();
        t.set_background(a, Some(bg)).unwrap();
        assert_eq!(t.background(a), Some(bg));
        assert_eq!(t.background_owner(bg), Some(a));
        assert!(matches!(t.add_child(root, bg), Err(UiError::AlreadyParented)));

        let c = panel(&mut t);
        t.add_child(root, c).unwrap();
        assert!(matches!(t.set_background(a, Some(c)), Err(UiError::BackgroundHasParent)));

        t.set_background(a, None).unwrap();
        assert_eq!(t.background_owner(bg), None);
    }

    // -----------------------------------------------------------------------
    // Callbacks
    // -----------------------------------------------------------------------

    #[test]
    fn fire_local_then_global() {
        let mut t = tree();
        let a = panel(&mut t);
        let log = Rc::new(RefCell::new(Vec::new()));

        let l = log.clone();
        t.on(a, EventKind::Click, move |_, _| l.borrow_mut().push("local")).unwrap();
        let l = log.clone();
        t.on_global(EventKind::Click, move |_, _| l.borrow_mut().push("global"));

        t.fire(a, EventKind::Click);
        assert_eq!(*log.borrow(), vec!["local", "global"]);
    }

    #[test]
    fn propagation_reaches_targets_once() {
        let mut t = tree();
        let a = panel(&mut t);
        let b = panel(&mut t);
        t.propagate_events_to(a, b).unwrap();
        t.propagate_events_to(b, a).unwrap();

        let hits = Rc::new(RefCell::new(Vec::new()));
        for id in [a, b] {
            let h = hits.clone();
            t.on(id, EventKind::MouseEnter, move |_, who| h.borrow_mut().push(who)).unwrap();
        }
        t.fire(a, EventKind::MouseEnter);
        assert_eq!(*hits.borrow(), vec![a, b]);
    }

    #[test]
    fn callback_may_destroy_its_entity() {
        let mut t = tree();
        let root = t.root();
        let a = panel(&mut t);
        t.add_child(root, a).unwrap();
        t.on(a, EventKind::Click, |tree, me| {
            let _ = tree.destroy(me);
        })
        .unwrap();
        t.fire(a, EventKind::Click);
        assert!(!t.contains(a));
        // Firing on a destroyed entity is a no-op.
        t.fire(a, EventKind::Click);
    }

    #[test]
    fn callback_registered_during_fire_runs_next_time() {
        let mut t = tree();
        let a = panel(&mut t);
        let count = Rc::new(RefCell::new(0));
        let c = count.clone();
        t.on(a, EventKind::Click, move |tree, me| {
            let c2 = c.clone();
            let _ = tree.on(me, EventKind::Click, move |_, _| *c2.borrow_mut() += 1);
        })
        .unwrap();
        t.fire(a, EventKind::Click);
        assert_eq!(*count.borrow(), 0);
        t.fire(a, EventKind::Click);
        assert_eq!(*count.borrow(), 1);
    }

    #[test]
    fn visibility_change_fires() {
        let mut t = tree();
        let a = panel(&mut t);
        let fired = Rc::new(RefCell::new(0));
        let f = fired.clone();
        t.on(a, EventKind::VisibilityChange, move |_, _| *f.borrow_mut() += 1).unwrap();
        t.set_visible(a, false);
        t.set_visible(a, false);
        t.set_visible(a, true);
        assert_eq!(*fired.borrow(), 2);
    }

    // -----------------------------------------------------------------------
    // User data and values
    // -----------------------------------------------------------------------

    #[test]
    fn user_data_round_trip() {
        let mut t = tree();
        let a = panel(&mut t);
        t.set_user_data(a, 42u32).unwrap();
        assert_eq!(t.user_data::<u32>(a), Some(&42));
        assert_eq!(t.user_data::<String>(a), None);
    }

    #[test]
    fn set_value_fires_on_change_only() {
        let mut t = tree();
        let cb = t.spawn(Entity::default(), CheckBox::new("Accept", false));
        let fired = Rc::new(RefCell::new(0));
        let f = fired.clone();
        t.on(cb, EventKind::ValueChange, move |_, _| *f.borrow_mut() += 1).unwrap();

        t.set_value(cb, WidgetValue::Bool(true)).unwrap();
        t.set_value(cb, WidgetValue::Bool(true)).unwrap();
        assert_eq!(*fired.borrow(), 1);
        assert_eq!(t.value(cb), Some(WidgetValue::Bool(true)));

        assert!(matches!(
            t.set_value(cb, WidgetValue::Text("x".into())),
            Err(UiError::InvalidValue(_))
        ));
        let p = panel(&mut t);
        assert!(matches!(t.set_value(p, WidgetValue::Bool(true)), Err(UiError::InvalidValue(_))));
    }
}
