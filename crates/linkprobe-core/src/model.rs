//! Convenience wrapper for model entities.
//!
//! [`Model`] holds only an [`EntityId`]; every query takes the store it
//! should read from, so a `Model` never outlives or aliases the data.

use crate::entity::{EntityId, EntityKind};
use crate::store::EntityStore;

/// Handle to a model entity with lookup helpers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Model {
    entity: EntityId,
}

impl Model {
    /// Wraps an entity id. Use [`Model::valid`] to check it actually names a
    /// model.
    #[must_use]
    pub const fn new(entity: EntityId) -> Self {
        Self { entity }
    }

    /// Returns the wrapped entity id.
    #[must_use]
    pub const fn entity(&self) -> EntityId {
        self.entity
    }

    /// Returns `true` if the id refers to a live model in `store`.
    #[must_use]
    pub fn valid(&self, store: &EntityStore) -> bool {
        store.get(self.entity).is_some_and(|e| e.is_model())
    }

    /// Returns the model's name.
    #[must_use]
    pub fn name<'s>(&self, store: &'s EntityStore) -> Option<&'s str> {
        store
            .get(self.entity)
            .filter(|e| e.is_model())
            .map(|e| e.name())
    }

    /// Finds a direct child link by name.
    #[must_use]
    pub fn link_by_name(&self, store: &EntityStore, name: &str) -> Option<EntityId> {
        if !self.valid(store) {
            return None;
        }
        store.find_child(self.entity, EntityKind::Link, name)
    }

    /// Returns the model's direct child links in id order.
    #[must_use]
    pub fn links(&self, store: &EntityStore) -> Vec<EntityId> {
        store
            .children(self.entity)
            .filter(|id| store.get(*id).is_some_and(|e| e.is_link()))
            .collect()
    }

    /// Returns the number of direct child links.
    #[must_use]
    pub fn link_count(&self, store: &EntityStore) -> usize {
        self.links(store).len()
    }
}

impl From<EntityId> for Model {
    fn from(entity: EntityId) -> Self {
        Self::new(entity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{LinkComponents, ModelComponents, WorldComponents};

    fn setup() -> (EntityStore, EntityId, EntityId, EntityId) {
        let mut store = EntityStore::new();
        let world = store.spawn_world("default", WorldComponents::default());
        let model = store
            .spawn_model(world, "robot", ModelComponents::default())
            .unwrap();
        let link = store
            .spawn_link(model, "base_link", LinkComponents::default())
            .unwrap();
        (store, world, model, link)
    }

    #[test]
    fn link_by_name_resolves() {
        let (store, _, model, link) = setup();
        let model = Model::new(model);
        assert!(model.valid(&store));
        assert_eq!(model.name(&store), Some("robot"));
        assert_eq!(model.link_by_name(&store, "base_link"), Some(link));
        assert_eq!(model.link_by_name(&store, "missing"), None);
    }

    #[test]
    fn non_model_is_invalid() {
        let (store, world, _, link) = setup();
        assert!(!Model::new(world).valid(&store));
        assert!(!Model::new(link).valid(&store));
        assert_eq!(Model::new(link).link_by_name(&store, "base_link"), None);
        assert_eq!(Model::new(world).name(&store), None);
    }

    #[test]
    fn nested_model_links_are_not_listed() {
        let (mut store, _, model, link) = setup();
        let nested = store
            .spawn_model(model, "gripper", ModelComponents::default())
            .unwrap();
        store
            .spawn_link(nested, "finger", LinkComponents::default())
            .unwrap();

        let model = Model::new(model);
        assert_eq!(model.links(&store), vec![link]);
        assert_eq!(model.link_count(&store), 1);
        assert_eq!(model.link_by_name(&store, "finger"), None);
    }
}
