//! Per-state style property storage with default-state fallback.
//!
//! A [`StyleSheet`] maps `(EntityState, property name)` to a [`StyleProperty`].
//! Lookups for a non-default state fall back to the default-state value exactly
//! once. [`StyleSheet::update_from`] is the last-writer-wins merge used to layer
//! theme base styles, widget-kind styles and instance overrides.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::geometry::Vec2;
use crate::style::color::Color;
use crate::style::property::{EntityState, StyleProperty};

/// Keyed style properties for every interaction state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StyleSheet {
    states: BTreeMap<EntityState, BTreeMap<String, StyleProperty>>,
}

impl StyleSheet {
    /// Create an empty sheet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up `property` for `state`.
    ///
    /// When the state has no entry and `fallback_to_default` is set, the
    /// default-state entry is returned instead. There is only ever one level of
    /// fallback.
    pub fn get(
        &self,
        property: &str,
        state: EntityState,
        fallback_to_default: bool,
    ) -> Option<&StyleProperty> {
        let exact = self.states.get(&state).and_then(|props| props.get(property));
        match exact {
            Some(value) => Some(value),
            None if fallback_to_default && state != EntityState::Default => self
                .states
                .get(&EntityState::Default)
                .and_then(|props| props.get(property)),
            None => None,
        }
    }

    /// Set `property` for exactly `state`. Other states are untouched.
    pub fn set(&mut self, property: &str, value: impl Into<StyleProperty>, state: EntityState) {
        self.states
            .entry(state)
            .or_default()
            .insert(property.to_owned(), value.into());
    }

    /// Remove `property` for exactly `state`, returning the old value.
    pub fn remove(&mut self, property: &str, state: EntityState) -> Option<StyleProperty> {
        let props = self.states.get_mut(&state)?;
        let old = props.remove(property);
        if props.is_empty() {
            self.states.remove(&state);
        }
        old
    }

    /// Shallow merge: every key in `other` overwrites the same key in `self`.
    /// Keys absent from `other` are left as they are.
    pub fn update_from(&mut self, other: &StyleSheet) {
        for (state, props) in &other.states {
            let target = self.states.entry(*state).or_default();
            for (name, value) in props {
                target.insert(name.clone(), *value);
            }
        }
    }

    /// Number of `(state, property)` entries.
    pub fn len(&self) -> usize {
        self.states.values().map(BTreeMap::len).sum()
    }

    /// Whether the sheet holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate all entries in `(state, name)` order.
    pub fn iter(&self) -> impl Iterator<Item = (EntityState, &str, &StyleProperty)> {
        self.states.iter().flat_map(|(state, props)| {
            props.iter().map(move |(name, value)| (*state, name.as_str(), value))
        })
    }

    // ── Typed helpers (always with default fallback) ─────────────────

    pub fn color(&self, property: &str, state: EntityState) -> Option<Color> {
        self.get(property, state, true).and_then(StyleProperty::as_color)
    }

    pub fn float(&self, property: &str, state: EntityState) -> Option<f32> {
        self.get(property, state, true).and_then(StyleProperty::as_float)
    }

    pub fn int(&self, property: &str, state: EntityState) -> Option<i32> {
        self.get(property, state, true).and_then(StyleProperty::as_int)
    }

    pub fn boolean(&self, property: &str, state: EntityState) -> Option<bool> {
        self.get(property, state, true).and_then(StyleProperty::as_bool)
    }

    pub fn vector(&self, property: &str, state: EntityState) -> Option<Vec2> {
        self.get(property, state, true).and_then(StyleProperty::as_vector)
    }
}
