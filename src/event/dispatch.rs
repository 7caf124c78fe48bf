//! Per-frame update: hit testing, interaction states, event firing, drag.
//!
//! [`EntityTree::dispatch_frame`] walks the tree top-down once per frame and
//! threads a [`DispatchState`] through the recursion. Children are visited in
//! reverse priority order, so the front-most entity claims the pointer first
//! and the deepest entity under the pointer ends up as the target. The wheel
//! is delivered once after the walk, when the target is final.

use crate::dom::node::EntityId;
use crate::dom::tree::EntityTree;
use crate::event::callbacks::EventKind;
use crate::event::input::MouseButton;
use crate::event::provider::InputProvider;
use crate::style::property::EntityState;
use crate::widget::scroll::ScrollScope;

/// Read-only inputs of one update pass.
pub struct FrameInfo<'a> {
    pub input: &'a dyn InputProvider,
    /// The sticky active entity; it receives wheel events even when the
    /// pointer is elsewhere.
    pub active: EntityId,
    /// Register a click on release even when the press happened elsewhere.
    pub promiscuous_clicks: bool,
}

/// What the pass has claimed so far.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchState {
    /// The entity under the pointer, deepest and front-most first.
    pub target: Option<EntityId>,
    /// The entity that owns the current press for dragging.
    pub drag_target: Option<EntityId>,
    /// Set once the target has processed the pointer.
    pub handled: bool,
    /// Set once `MouseWheel` has fired this frame.
    pub wheel_fired: bool,
    /// Set once a widget has consumed this frame's wheel movement.
    pub wheel_handled: bool,
}

impl DispatchState {
    /// Clear the per-frame claims; the drag target is kept.
    pub fn begin_frame(&mut self) {
        self.target = None;
        self.handled = false;
        self.wheel_fired = false;
        self.wheel_handled = false;
    }
}

impl EntityTree {
    /// Run one update pass over the whole tree, then deliver the wheel.
    pub fn dispatch_frame(&mut self, frame: &FrameInfo<'_>, state: &mut DispatchState) {
        let root = self.root();
        self.dispatch_update(root, frame, state, ScrollScope::NONE);
        self.dispatch_wheel(frame, state);
    }

    /// Update `id` and its subtree inside the ancestors' `scope`.
    pub(crate) fn dispatch_update(
        &mut self,
        id: EntityId,
        frame: &FrameInfo<'_>,
        state: &mut DispatchState,
        scope: ScrollScope,
    ) {
        if !self.contains(id) {
            return;
        }
        self.fire(id, EventKind::BeforeUpdate);
        if !self.contains(id) {
            return;
        }

        let visible = self.is_visible_in_tree(id);
        let enabled = self.is_enabled_in_tree(id);
        if !visible || !enabled || self.is_locked_for_events(id) {
            self.leave_interactivity(id);
            let locked_here = self.entity(id).is_some_and(|e| e.locked);
            if visible && enabled && locked_here {
                let child_scope = self.child_scope(id, scope);
                self.dispatch_children(id, frame, state, child_scope, true);
            }
            return;
        }

        let child_scope = self.child_scope(id, scope);
        if self.entity(id).is_some_and(|e| e.click_through) {
            self.dispatch_children(id, frame, state, child_scope, false);
            self.fire(id, EventKind::AfterUpdate);
            return;
        }

        let input = frame.input;
        let left_down = input.button_down(MouseButton::Left);
        let left_pressed = input.button_pressed(MouseButton::Left);
        let Some(entity) = self.entity(id) else {
            return;
        };
        let prev_state = entity.state;
        let collision = if entity.use_actual_size_for_collision {
            entity.layout.actual
        } else {
            entity.layout.dest
        }
        .grow(entity.extra_collision_margin);
        let pointer = input.pointer_position();
        let over = scope.shows_point(pointer) && collision.contains(scope.to_layout(pointer));

        let mut new_state = prev_state;
        let claims = !state.handled
            && over
            && state.target.map_or(true, |t| self.is_ancestor(t, id));
        if claims {
            state.target = Some(id);
            let keeps_down = entity.focused
                || frame.promiscuous_clicks
                || prev_state == EntityState::MouseDown
                || left_pressed;
            new_state = if left_down && keeps_down {
                EntityState::MouseDown
            } else {
                EntityState::MouseHover
            };
            if let Some(entity) = self.entity_mut(id) {
                entity.state = new_state;
            }
        }

        self.dispatch_children(id, frame, state, child_scope, false);
        if !self.contains(id) {
            return;
        }

        let interactive = self.entity(id).is_some_and(|e| e.is_draggable())
            || self.widget(id).is_some_and(|w| w.naturally_interactive());
        if interactive && state.drag_target.is_none() && claims && new_state == EntityState::MouseDown {
            log::trace!("drag target claimed by {id:?}");
            state.drag_target = Some(id);
        }

        if state.target == Some(id) {
            self.update_as_target(id, frame, state, prev_state, new_state);
        } else {
            self.update_as_bystander(id, left_pressed, prev_state);
        }

        self.update_drag(id, input, state);
        self.fire(id, EventKind::AfterUpdate);
    }

    /// Fire `MouseWheel` once: on the target, or on the active entity when
    /// nothing is under the pointer.
    fn dispatch_wheel(&mut self, frame: &FrameInfo<'_>, state: &mut DispatchState) {
        let wheel = frame.input.wheel_delta();
        if wheel == 0 || state.wheel_fired {
            return;
        }
        let receiver = state.target.filter(|t| self.contains(*t)).or_else(|| {
            let active = frame.active;
            let reachable = self.is_attached(active)
                && self.is_visible_in_tree(active)
                && self.is_enabled_in_tree(active);
            reachable.then_some(active)
        });
        let Some(id) = receiver else {
            return;
        };
        state.wheel_fired = true;
        self.fire(id, EventKind::MouseWheel);
        if self.contains(id) {
            state.wheel_handled = self.scroll_wheel(id, wheel);
        }
    }

    /// Offer the wheel to `id`, then to its ancestors until one scrolls.
    fn scroll_wheel(&mut self, id: EntityId, wheel: i32) -> bool {
        let scale = self.scale();
        let mut next = Some(id);
        while let Some(current) = next {
            if self.widget_mut(current).is_some_and(|w| w.on_mouse_wheel(wheel, scale)) {
                log::trace!("wheel {wheel} scrolled {current:?}");
                return true;
            }
            next = self.parent(current);
        }
        false
    }

    /// The scope `id`'s children are updated and drawn in.
    pub(crate) fn child_scope(&self, id: EntityId, scope: ScrollScope) -> ScrollScope {
        let Some(widget) = self.widget(id) else {
            return scope;
        };
        let clip_to = if widget.clips_children() {
            self.entity(id).map(|e| e.layout.internal)
        } else {
            None
        };
        scope.nested(widget.scroll_offset(), clip_to)
    }

    /// Update the children front-most first. With `through_lock_only`, only
    /// children that receive events through a locked parent are visited.
    fn dispatch_children(
        &mut self,
        id: EntityId,
        frame: &FrameInfo<'_>,
        state: &mut DispatchState,
        scope: ScrollScope,
        through_lock_only: bool,
    ) {
        for child in self.sorted_children(id).into_iter().rev() {
            if self.parent(child) != Some(id) {
                continue;
            }
            let through = self.entity(child).is_some_and(|e| e.events_through_locked_parent);
            if through_lock_only && !through {
                continue;
            }
            self.dispatch_update(child, frame, state, scope);
        }
    }

    /// Drop back to `Default`, closing any interaction in progress.
    fn leave_interactivity(&mut self, id: EntityId) {
        let Some(entity) = self.entity(id) else {
            return;
        };
        let (prev, dragging) = (entity.state, entity.drag.dragging);
        match prev {
            EntityState::MouseHover => self.fire(id, EventKind::MouseLeave),
            EntityState::MouseDown => {
                self.fire(id, EventKind::MouseReleased);
                self.fire(id, EventKind::MouseLeave);
            }
            EntityState::Default => {}
        }
        if let Some(entity) = self.entity_mut(id) {
            entity.state = EntityState::Default;
            entity.drag.dragging = false;
        }
        if dragging {
            self.fire(id, EventKind::StopDrag);
        }
    }

    /// Not under the pointer this frame.
    fn update_as_bystander(&mut self, id: EntityId, left_pressed: bool, prev: EntityState) {
        let Some(entity) = self.entity_mut(id) else {
            return;
        };
        entity.state = EntityState::Default;
        let lost_focus = left_pressed && entity.focused;
        if lost_focus {
            entity.focused = false;
        }
        if prev != EntityState::Default {
            self.fire(id, EventKind::MouseLeave);
        }
        if lost_focus {
            self.fire(id, EventKind::FocusChange);
        }
    }

    /// The resolved target: focus, enter, button transitions, clicks.
    fn update_as_target(
        &mut self,
        id: EntityId,
        frame: &FrameInfo<'_>,
        state: &mut DispatchState,
        prev: EntityState,
        current: EntityState,
    ) {
        let input = frame.input;
        state.handled = true;
        let pressed = input.button_pressed(MouseButton::Left);
        let released = input.button_released(MouseButton::Left);
        // Down and up inside one frame: a press immediately followed by a release.
        let tapped = pressed && released && !input.button_down(MouseButton::Left);

        if pressed {
            let gained = self.entity_mut(id).is_some_and(|e| !std::mem::replace(&mut e.focused, true));
            if gained {
                self.fire(id, EventKind::FocusChange);
            }
        }

        self.fire(id, EventKind::WhileMouseHoverOrDown);
        if prev == EntityState::Default {
            self.fire(id, EventKind::MouseEnter);
        }
        if pressed && (current == EntityState::MouseDown || tapped) {
            self.fire(id, EventKind::MouseDown);
        }

        if released && (prev == EntityState::MouseDown || tapped || frame.promiscuous_clicks) {
            self.fire(id, EventKind::MouseReleased);
            self.click(id);
        }

        if !self.contains(id) {
            return;
        }
        if current == EntityState::MouseDown {
            self.fire(id, EventKind::WhileMouseDown);
        } else {
            self.fire(id, EventKind::WhileMouseHover);
        }

        if input.button_pressed(MouseButton::Right) {
            self.fire(id, EventKind::RightMouseDown);
        }
        if input.button_released(MouseButton::Right) {
            self.fire(id, EventKind::RightClick);
        }
        if input.button_down(MouseButton::Right) {
            self.fire(id, EventKind::WhileRightMouseDown);
        }
    }

    /// Run the widget's click hook, then `Click` and, if the value moved,
    /// `ValueChange`.
    fn click(&mut self, id: EntityId) {
        let changed = match (self.widgets.get_mut(id), self.nodes.get_mut(id)) {
            (Some(widget), Some(entity)) => {
                let changed = widget.on_click(entity);
                if changed {
                    entity.mark_dirty();
                }
                changed
            }
            _ => return,
        };
        self.fire(id, EventKind::Click);
        if changed {
            self.fire(id, EventKind::ValueChange);
        }
    }

    /// Start, continue or stop dragging `id`.
    fn update_drag(&mut self, id: EntityId, input: &dyn InputProvider, state: &DispatchState) {
        let Some(entity) = self.entity(id) else {
            return;
        };
        let holding = state.drag_target == Some(id)
            && entity.focused
            && entity.is_draggable()
            && input.button_down(MouseButton::Left);
        let dragging = entity.drag.dragging;
        let delta = input.pointer_delta();

        if !holding {
            if dragging {
                if let Some(entity) = self.entity_mut(id) {
                    entity.drag.dragging = false;
                }
                log::trace!("drag of {id:?} stopped");
                self.fire(id, EventKind::StopDrag);
            }
            return;
        }

        if !dragging {
            if delta.is_zero() {
                return;
            }
            if let Some(entity) = self.entity_mut(id) {
                entity.drag.dragging = true;
            }
            if let Err(err) = self.bring_to_front(id) {
                log::warn!("dragged entity {id:?} could not come to front: {err}");
            }
            log::trace!("drag of {id:?} started");
            self.fire(id, EventKind::StartDrag);
        }

        if delta.is_zero() {
            return;
        }
        let scale = self.scale();
        if let Some(entity) = self.entity_mut(id) {
            entity.drag.offset += delta * (1.0 / scale);
            entity.mark_dirty();
        }
        self.fire(id, EventKind::WhileDragging);
    }
}

// ===========================================================================
// Tests
// ===========================================================================
