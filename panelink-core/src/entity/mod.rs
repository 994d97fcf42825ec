//! Backend entities and their cached state
//!
//! Entities are created while the pages load and are never removed. Page
//! items refer to them by [`EntityHandle`], an index into the store.

pub mod kind;
pub mod store;

pub use kind::{attr, color_mode_attributes, supports_color_mode, EntityKind};
pub use store::EntityStore;

use alloc::collections::BTreeMap;
use alloc::string::String;

/// Stable reference to an entity in the [`EntityStore`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EntityHandle(pub(crate) usize);

impl EntityHandle {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Cached state of one backend entity
#[derive(Debug, Clone)]
pub struct Entity {
    id: String,
    kind: Option<EntityKind>,
    state: String,
    attributes: BTreeMap<String, String>,
}

impl Entity {
    pub fn new(id: &str) -> Self {
        Self {
            id: String::from(id),
            kind: EntityKind::from_entity_id(id),
            state: String::new(),
            attributes: BTreeMap::new(),
        }
    }

    /// Full entity id, e.g. `light.kitchen`
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Kind derived from the domain; `None` for unsupported domains
    pub fn kind(&self) -> Option<EntityKind> {
        self.kind
    }

    pub fn state(&self) -> &str {
        &self.state
    }

    /// Attribute value, if the backend has pushed it
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Attribute value or `default` when missing or empty
    pub fn attribute_or<'a>(&'a self, name: &str, default: &'a str) -> &'a str {
        match self.attribute(name) {
            Some(value) if !value.is_empty() => value,
            _ => default,
        }
    }

    /// Whether the state reads as on for this entity's kind
    pub fn is_on(&self) -> bool {
        match self.kind {
            Some(kind) => kind.is_on(&self.state),
            None => self.state == "on",
        }
    }

    pub(crate) fn set_state(&mut self, value: &str) {
        self.state.clear();
        self.state.push_str(value);
    }

    pub(crate) fn set_attribute(&mut self, name: &str, value: &str) {
        match self.attributes.get_mut(name) {
            Some(existing) => {
                existing.clear();
                existing.push_str(value);
            }
            None => {
                self.attributes.insert(String::from(name), String::from(value));
            }
        }
    }
}
