//! Entity store with a one-slot lookup cache

use alloc::vec::Vec;
use core::cell::Cell;

use super::{attr, Entity, EntityHandle};
use crate::error::CoreError;

/// Owns every entity the pages reference
///
/// Lookups are linear; the last hit is cached because updates usually
/// arrive as a burst of attributes for the same entity.
#[derive(Debug, Default)]
pub struct EntityStore {
    entities: Vec<Entity>,
    cached: Cell<Option<usize>>,
}

impl EntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the handle for `id`, creating the entity if needed
    pub fn get_or_create(&mut self, id: &str) -> EntityHandle {
        if let Some(handle) = self.find(id) {
            return handle;
        }
        self.entities.push(Entity::new(id));
        let index = self.entities.len() - 1;
        self.cached.set(Some(index));
        EntityHandle(index)
    }

    /// Handle for an existing entity
    pub fn find(&self, id: &str) -> Option<EntityHandle> {
        if let Some(index) = self.cached.get() {
            if self.entities.get(index).is_some_and(|e| e.id() == id) {
                return Some(EntityHandle(index));
            }
        }

        let index = self.entities.iter().position(|e| e.id() == id)?;
        self.cached.set(Some(index));
        Some(EntityHandle(index))
    }

    /// Entity by id
    pub fn lookup(&self, id: &str) -> Option<&Entity> {
        self.find(id).and_then(|handle| self.get(handle))
    }

    /// Entity by handle
    pub fn get(&self, handle: EntityHandle) -> Option<&Entity> {
        self.entities.get(handle.0)
    }

    /// Replace the state of a known entity
    pub fn set_state(&mut self, id: &str, value: &str) -> Result<EntityHandle, CoreError> {
        let handle = self.find(id).ok_or(CoreError::UnknownEntity)?;
        self.entities[handle.0].set_state(value);
        Ok(handle)
    }

    /// Replace one attribute of a known entity
    ///
    /// The attribute name `state` is routed to the entity state.
    pub fn set_attribute(
        &mut self,
        id: &str,
        name: &str,
        value: &str,
    ) -> Result<EntityHandle, CoreError> {
        if name == attr::STATE {
            return self.set_state(id, value);
        }
        let handle = self.find(id).ok_or(CoreError::UnknownEntity)?;
        self.entities[handle.0].set_attribute(name, value);
        Ok(handle)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (EntityHandle, &Entity)> {
        self.entities
            .iter()
            .enumerate()
            .map(|(index, entity)| (EntityHandle(index), entity))
    }
}
