//! Event kinds and per-entity callback storage.
//!
//! Callbacks receive the tree mutably, so they may restructure it while an
//! event is being delivered. Firing takes a slot's callbacks out, runs them,
//! and puts them back only if the entity still exists; callbacks registered
//! during delivery are kept and run from the next event on.

use std::collections::HashMap;
use std::fmt;

use crate::dom::node::EntityId;
use crate::dom::tree::EntityTree;

/// Events an entity can fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    MouseDown,
    MouseReleased,
    WhileMouseDown,
    WhileMouseHover,
    WhileMouseHoverOrDown,
    Click,
    RightMouseDown,
    RightClick,
    WhileRightMouseDown,
    ValueChange,
    MouseEnter,
    MouseLeave,
    MouseWheel,
    StartDrag,
    StopDrag,
    WhileDragging,
    BeforeDraw,
    AfterDraw,
    BeforeUpdate,
    AfterUpdate,
    FocusChange,
    VisibilityChange,
}

/// A callback fired with the tree and the entity the event happened on.
pub type Callback = Box<dyn FnMut(&mut EntityTree, EntityId)>;

/// Callbacks registered per [`EventKind`].
#[derive(Default)]
pub struct EventCallbacks {
    slots: HashMap<EventKind, Vec<Callback>>,
}

impl fmt::Debug for EventCallbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let counts: HashMap<_, _> = self.slots.iter().map(|(k, v)| (*k, v.len())).collect();
        f.debug_struct("EventCallbacks").field("slots", &counts).finish()
    }
}

impl EventCallbacks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a callback for `kind`.
    pub fn push(&mut self, kind: EventKind, callback: Callback) {
        self.slots.entry(kind).or_default().push(callback);
    }

    /// Remove every callback for `kind`.
    pub fn clear(&mut self, kind: EventKind) {
        self.slots.remove(&kind);
    }

    /// Number of callbacks registered for `kind`.
    pub fn len(&self, kind: EventKind) -> usize {
        self.slots.get(&kind).map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.slots.values().all(Vec::is_empty)
    }

    /// Take the callbacks for `kind` out for delivery.
    pub(crate) fn take(&mut self, kind: EventKind) -> Vec<Callback> {
        self.slots.get_mut(&kind).map(std::mem::take).unwrap_or_default()
    }

    /// Put delivered callbacks back, ahead of any added meanwhile.
    pub(crate) fn restore(&mut self, kind: EventKind, delivered: Vec<Callback>) {
        if delivered.is_empty() {
            return;
        }
        let slot = self.slots.entry(kind).or_default();
        let added = std::mem::replace(slot, delivered);
        slot.extend(added);
    }
}
