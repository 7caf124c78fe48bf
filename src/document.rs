//! Persisted layouts: capture a live tree as a RON document and rebuild it.
//!
//! A [`LayoutDocument`] stores the root's children as nested [`EntityRecord`]s,
//! internal sub-entities included. Loading inserts the records without theme
//! styling or composition (the saved style sheets are already resolved), then
//! runs two fix-up passes over the rebuilt entities:
//!
//! 1. every widget's [`relink`](crate::widget::Widget::relink) hook, which finds
//!    internal children such as a button's label by identifier;
//! 2. event propagation links, saved as target identifiers.
//!
//! A failed load destroys everything it built and leaves the tree unchanged.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::dom::node::{CursorKind, Entity, EntityId};
use crate::dom::tree::EntityTree;
use crate::error::{Result, UiError};
use crate::geometry::Vec2;
use crate::layout::anchor::Anchor;
use crate::style::sheet::StyleSheet;
use crate::widget::traits::Widget;
use crate::widgets::button::{Button, ButtonSkin};
use crate::widgets::checkbox::CheckBox;
use crate::widgets::panel::{Overflow, Panel, PanelSkin};
use crate::widgets::paragraph::{Paragraph, ParagraphKind};

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// Widget kind plus the widget's own persistent state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WidgetRecord {
    Panel {
        skin: PanelSkin,
        #[serde(default)]
        auto_height: bool,
        #[serde(default)]
        overflow: Overflow,
    },
    Paragraph {
        text: String,
        #[serde(default)]
        kind: ParagraphKind,
    },
    Button {
        #[serde(default)]
        skin: ButtonSkin,
    },
    CheckBox {
        #[serde(default)]
        checked: bool,
    },
}

impl WidgetRecord {
    /// Build the widget, without its internal children.
    pub fn into_widget(self) -> Box<dyn Widget> {
        match self {
            WidgetRecord::Panel { skin, auto_height, overflow } => {
                Box::new(Panel::from_record(skin, auto_height, overflow))
            }
            WidgetRecord::Paragraph { text, kind } => Box::new(Paragraph::from_record(text, kind)),
            WidgetRecord::Button { skin } => Box::new(Button::from_record(skin)),
            WidgetRecord::CheckBox { checked } => Box::new(CheckBox::from_record(checked)),
        }
    }
}

/// Boolean and numeric entity flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntityFlags {
    pub visible: bool,
    pub enabled: bool,
    pub locked: bool,
    pub draggable: bool,
    pub limit_drag_to_parent: bool,
    pub click_through: bool,
    pub events_through_locked_parent: bool,
    pub use_actual_size_for_collision: bool,
    pub extra_collision_margin: i32,
}

impl Default for EntityFlags {
    fn default() -> Self {
        Self::of(&Entity::default())
    }
}

impl EntityFlags {
    fn of(entity: &Entity) -> Self {
        Self {
            visible: entity.is_visible(),
            enabled: entity.enabled,
            locked: entity.locked,
            draggable: entity.is_draggable(),
            limit_drag_to_parent: entity.limit_drag_to_parent,
            click_through: entity.click_through,
            events_through_locked_parent: entity.events_through_locked_parent,
            use_actual_size_for_collision: entity.use_actual_size_for_collision,
            extra_collision_margin: entity.extra_collision_margin,
        }
    }

    fn apply(self, entity: &mut Entity) {
        entity.visible = self.visible;
        entity.enabled = self.enabled;
        entity.locked = self.locked;
        entity.set_draggable(self.draggable);
        entity.limit_drag_to_parent = self.limit_drag_to_parent;
        entity.click_through = self.click_through;
        entity.events_through_locked_parent = self.events_through_locked_parent;
        entity.use_actual_size_for_collision = self.use_actual_size_for_collision;
        entity.extra_collision_margin = self.extra_collision_margin;
    }
}

/// One entity with its widget, background and ordered children.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityRecord {
    pub widget: WidgetRecord,
    #[serde(default)]
    pub identifier: String,
    pub anchor: Anchor,
    pub size: Vec2,
    #[serde(default)]
    pub offset: Vec2,
    #[serde(default)]
    pub min_size: Option<Vec2>,
    #[serde(default)]
    pub max_size: Option<Vec2>,
    #[serde(default)]
    pub style: StyleSheet,
    #[serde(default)]
    pub flags: EntityFlags,
    #[serde(default)]
    pub priority_bonus: i32,
    #[serde(default)]
    pub cursor: CursorKind,
    /// Identifiers of the entities this one forwards its events to.
    #[serde(default)]
    pub propagate_to: Vec<String>,
    #[serde(default)]
    pub background: Option<Box<EntityRecord>>,
    #[serde(default)]
    pub children: Vec<EntityRecord>,
}

impl EntityRecord {
    fn capture(tree: &EntityTree, id: EntityId) -> Option<Self> {
        let entity = tree.entity(id)?;
        let widget = tree.widget(id)?;
        let propagate_to = entity
            .propagation_targets()
            .iter()
            .filter_map(|target| {
                let identifier = tree.entity(*target).map(|e| e.identifier.clone())?;
                if identifier.is_empty() {
                    log::warn!("skipping event propagation to {target:?}: it has no identifier");
                    return None;
                }
                Some(identifier)
            })
            .collect();
        Some(Self {
            widget: widget.to_record(),
            identifier: entity.identifier.clone(),
            anchor: entity.anchor(),
            size: entity.size(),
            offset: entity.offset(),
            min_size: entity.min_size(),
            max_size: entity.max_size(),
            style: entity.style().clone(),
            flags: EntityFlags::of(entity),
            priority_bonus: entity.priority_bonus(),
            cursor: entity.cursor,
            propagate_to,
            background: tree
                .background(id)
                .and_then(|bg| Self::capture(tree, bg))
                .map(Box::new),
            children: tree
                .children(id)
                .iter()
                .filter_map(|child| Self::capture(tree, *child))
                .collect(),
        })
    }

    fn to_entity(&self) -> Entity {
        let mut entity = Entity::new(self.anchor, self.size, self.offset)
            .with_identifier(self.identifier.clone())
            .with_cursor(self.cursor);
        entity.set_min_size(self.min_size);
        entity.set_max_size(self.max_size);
        entity.replace_style(self.style.clone());
        entity.priority_bonus = self.priority_bonus;
        self.flags.apply(&mut entity);
        entity
    }
}

// ---------------------------------------------------------------------------
// LayoutDocument
// ---------------------------------------------------------------------------

/// The children of a tree's root, serializable to RON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LayoutDocument {
    pub children: Vec<EntityRecord>,
}

impl LayoutDocument {
    /// Capture the current content of `tree`.
    pub fn save(tree: &EntityTree) -> Self {
        let children = tree
            .children(tree.root())
            .iter()
            .filter_map(|child| EntityRecord::capture(tree, *child))
            .collect();
        Self { children }
    }

    pub fn to_ron(&self) -> Result<String> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| UiError::Document(e.to_string()))
    }

    pub fn from_ron(text: &str) -> Result<Self> {
        ron::from_str(text).map_err(|e| UiError::Document(e.to_string()))
    }

    /// Replace the root's children with the document's entities.
    ///
    /// The previous children are detached, not destroyed.
    pub fn load(&self, tree: &mut EntityTree) -> Result<()> {
        let mut build = Build::default();
        let top = match build.run(tree, &self.children) {
            Ok(top) => top,
            Err(err) => {
                build.discard(tree);
                return Err(err);
            }
        };

        let root = tree.root();
        tree.clear_children(root);
        for id in top {
            tree.add_child(root, id)?;
        }
        log::debug!("loaded layout document with {} entities", build.created.len());
        Ok(())
    }
}

/// Bookkeeping for one load.
#[derive(Default)]
struct Build {
    created: Vec<EntityId>,
    by_identifier: HashMap<String, EntityId>,
    propagation: Vec<(EntityId, Vec<String>)>,
}

impl Build {
    fn run(&mut self, tree: &mut EntityTree, records: &[EntityRecord]) -> Result<Vec<EntityId>> {
        let top = records
            .iter()
            .map(|record| self.insert(tree, record))
            .collect::<Result<Vec<_>>>()?;
        self.fix_up(tree)?;
        Ok(top)
    }

    fn insert(&mut self, tree: &mut EntityTree, record: &EntityRecord) -> Result<EntityId> {
        let id = tree.insert_raw(record.to_entity(), record.widget.clone().into_widget());
        self.created.push(id);
        if !record.identifier.is_empty() {
            self.by_identifier.entry(record.identifier.clone()).or_insert(id);
        }
        if !record.propagate_to.is_empty() {
            self.propagation.push((id, record.propagate_to.clone()));
        }
        for child in &record.children {
            let child = self.insert(tree, child)?;
            tree.link(id, child, None);
        }
        if let Some(background) = &record.background {
            let bg = self.insert(tree, background)?;
            tree.set_background(id, Some(bg))?;
        }
        Ok(id)
    }

    fn fix_up(&self, tree: &mut EntityTree) -> Result<()> {
        for id in &self.created {
            tree.relink_widget(*id)?;
        }
        for (from, targets) in &self.propagation {
            for name in targets {
                let to = self
                    .by_identifier
                    .get(name)
                    .copied()
                    .ok_or_else(|| UiError::not_found("propagation target", name.clone()))?;
                tree.propagate_events_to(*from, to)?;
            }
        }
        Ok(())
    }

    fn discard(&self, tree: &mut EntityTree) {
        for id in self.created.iter().rev() {
            if tree.contains(*id) {
                if let Err(err) = tree.destroy(*id) {
                    log::warn!("failed to discard {id:?} after a failed load: {err}");
                }
            }
        }
    }
}

// ===========================================================================
// Tests
// ===========================================================================
