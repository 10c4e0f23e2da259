//! The world store: an arena of entities addressed by [`EntityId`].
//!
//! The store owns every entity in a simulated world and is the only place
//! entity data lives. Systems hold plain ids and resolve them through the
//! store on each access, so a handle to a removed entity fails cleanly
//! instead of dangling.
//!
//! # Layout
//!
//! Entities live in a `BTreeMap` keyed by id. Ids are assigned monotonically
//! and never reused, which gives deterministic iteration order and makes
//! stale handles unambiguous.
//!
//! # Tree shape
//!
//! - A world has no parent.
//! - A model's parent is the world or another model.
//! - A link's parent is a model.
//!
//! Names are unique among siblings of the same kind.
//!
//! # Example
//!
//! ```
//! use linkprobe_core::entity::{LinkComponents, ModelComponents, WorldComponents};
//! use linkprobe_core::pose::Pose;
//! use linkprobe_core::store::EntityStore;
//!
//! let mut store = EntityStore::new();
//! let world = store.spawn_world("default", WorldComponents::default());
//! let model = store
//!     .spawn_model(world, "arm", ModelComponents::at(Pose::from_xyz_rpy(0.0, 0.0, 1.0, 0.0, 0.0, 0.0)))
//!     .unwrap();
//! let link = store
//!     .spawn_link(model, "base", LinkComponents::at(Pose::from_xyz_rpy(0.5, 0.0, 0.0, 0.0, 0.0, 0.0)))
//!     .unwrap();
//!
//! let pose = store.world_pose(link).unwrap();
//! assert_eq!(pose.position.to_array(), [0.5, 0.0, 1.0]);
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::entity::{
    Entity, EntityId, EntityInner, EntityKind, LinkComponents, ModelComponents, WorldComponents,
};
use crate::error::StoreError;
use crate::pose::Pose;

/// Arena holding every entity of a world.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntityStore {
    /// Monotonically increasing id counter.
    next_id: u64,
    /// Entity storage with deterministic iteration order.
    entities: BTreeMap<EntityId, Entity>,
}

impl EntityStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_id: 0,
            entities: BTreeMap::new(),
        }
    }

    fn allocate(&mut self, name: String, parent: Option<EntityId>, inner: EntityInner) -> EntityId {
        let id = EntityId::new(self.next_id);
        self.next_id += 1;
        self.entities.insert(id, Entity::new(id, name, parent, inner));
        id
    }

    /// Spawns a world entity, the root of an entity tree.
    pub fn spawn_world(&mut self, name: impl Into<String>, components: WorldComponents) -> EntityId {
        self.allocate(name.into(), None, EntityInner::World(components))
    }

    /// Spawns a model under a world or another model.
    ///
    /// # Errors
    ///
    /// Fails if `parent` is missing, is a link, or already has a model with
    /// this name.
    pub fn spawn_model(
        &mut self,
        parent: EntityId,
        name: impl Into<String>,
        components: ModelComponents,
    ) -> Result<EntityId, StoreError> {
        let name = name.into();
        let parent_kind = self.kind_of(parent)?;
        if parent_kind == EntityKind::Link {
            return Err(StoreError::WrongKind {
                id: parent,
                expected: EntityKind::Model,
                actual: parent_kind,
            });
        }
        self.check_unique(parent, EntityKind::Model, &name)?;
        Ok(self.allocate(name, Some(parent), EntityInner::Model(components)))
    }

    /// Spawns a link under a model.
    ///
    /// # Errors
    ///
    /// Fails if `model` is missing, is not a model, or already has a link
    /// with this name.
    pub fn spawn_link(
        &mut self,
        model: EntityId,
        name: impl Into<String>,
        components: LinkComponents,
    ) -> Result<EntityId, StoreError> {
        let name = name.into();
        self.expect_kind(model, EntityKind::Model)?;
        self.check_unique(model, EntityKind::Link, &name)?;
        Ok(self.allocate(name, Some(model), EntityInner::Link(components)))
    }

    /// Removes an entity and all of its descendants.
    ///
    /// Returns the removed entities, the requested one first. Empty if the
    /// id was not live.
    pub fn despawn(&mut self, id: EntityId) -> Vec<Entity> {
        let Some(root) = self.entities.remove(&id) else {
            return Vec::new();
        };
        let mut removed = vec![root];
        let mut frontier = vec![id];
        while let Some(parent) = frontier.pop() {
            let children: Vec<EntityId> = self.children(parent).collect();
            for child in children {
                if let Some(entity) = self.entities.remove(&child) {
                    removed.push(entity);
                    frontier.push(child);
                }
            }
        }
        removed
    }

    /// Returns the entity with this id, if live.
    #[must_use]
    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    /// Returns the entity with this id mutably, if live.
    #[must_use]
    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    /// Returns `true` if the id refers to a live entity.
    #[must_use]
    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(&id)
    }

    /// Returns the kind of a live entity.
    ///
    /// # Errors
    ///
    /// [`StoreError::UnknownEntity`] if the id is not live.
    pub fn kind_of(&self, id: EntityId) -> Result<EntityKind, StoreError> {
        self.get(id)
            .map(Entity::kind)
            .ok_or(StoreError::UnknownEntity(id))
    }

    /// Resolves an id and checks its kind.
    ///
    /// # Errors
    ///
    /// Fails if the id is not live or has a different kind.
    pub fn expect_kind(&self, id: EntityId, expected: EntityKind) -> Result<&Entity, StoreError> {
        let entity = self.get(id).ok_or(StoreError::UnknownEntity(id))?;
        if entity.kind() == expected {
            Ok(entity)
        } else {
            Err(StoreError::WrongKind {
                id,
                expected,
                actual: entity.kind(),
            })
        }
    }

    /// Iterates over the direct children of an entity in id order.
    pub fn children(&self, parent: EntityId) -> impl Iterator<Item = EntityId> + '_ {
        self.entities
            .values()
            .filter(move |e| e.parent() == Some(parent))
            .map(Entity::id)
    }

    /// Finds a direct child by kind and name.
    #[must_use]
    pub fn find_child(&self, parent: EntityId, kind: EntityKind, name: &str) -> Option<EntityId> {
        self.entities
            .values()
            .find(|e| e.parent() == Some(parent) && e.kind() == kind && e.name() == name)
            .map(Entity::id)
    }

    /// Returns the first world entity, if any.
    #[must_use]
    pub fn world_entity(&self) -> Option<EntityId> {
        self.entities
            .values()
            .find(|e| e.kind() == EntityKind::World)
            .map(Entity::id)
    }

    /// Returns an entity's pose relative to its parent.
    ///
    /// # Errors
    ///
    /// Fails if the id is not live or refers to a world.
    pub fn pose(&self, id: EntityId) -> Result<Pose, StoreError> {
        let entity = self.get(id).ok_or(StoreError::UnknownEntity(id))?;
        entity.pose().copied().ok_or(StoreError::NoPose(id))
    }

    /// Replaces an entity's pose relative to its parent.
    ///
    /// # Errors
    ///
    /// Fails if the id is not live or refers to a world.
    pub fn set_pose(&mut self, id: EntityId, pose: Pose) -> Result<(), StoreError> {
        let entity = self.get_mut(id).ok_or(StoreError::UnknownEntity(id))?;
        let slot = entity.inner_mut().pose_mut().ok_or(StoreError::NoPose(id))?;
        *slot = pose;
        Ok(())
    }

    /// Returns an entity's pose in the world frame by composing relative
    /// poses up the parent chain. The world entity itself is the identity.
    ///
    /// # Errors
    ///
    /// Fails if the id, or any ancestor, is not live.
    pub fn world_pose(&self, id: EntityId) -> Result<Pose, StoreError> {
        let mut pose = Pose::IDENTITY;
        let mut current = Some(id);
        while let Some(cursor) = current {
            let entity = self.get(cursor).ok_or(StoreError::UnknownEntity(cursor))?;
            if let Some(local) = entity.pose() {
                pose = *local * pose;
            }
            current = entity.parent();
        }
        Ok(pose)
    }

    /// Copies component data back from a snapshot for every entity that is
    /// live in both stores. Entities spawned or removed since the snapshot
    /// are left alone, and the id counter is never rewound.
    ///
    /// Returns the number of entities restored.
    pub fn restore_components_from(&mut self, snapshot: &EntityStore) -> usize {
        let mut restored = 0;
        for (id, saved) in &snapshot.entities {
            if let Some(entity) = self.entities.get_mut(id) {
                *entity.inner_mut() = saved.inner().clone();
                restored += 1;
            }
        }
        restored
    }

    /// Returns the number of live entities.
    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Returns `true` if the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Iterates over entities in id order.
    pub fn entities_sorted(&self) -> impl Iterator<Item = &Entity> + '_ {
        self.entities.values()
    }

    /// Iterates mutably over entities in id order.
    pub fn entities_sorted_mut(&mut self) -> impl Iterator<Item = &mut Entity> + '_ {
        self.entities.values_mut()
    }

    fn check_unique(&self, parent: EntityId, kind: EntityKind, name: &str) -> Result<(), StoreError> {
        if self.find_child(parent, kind, name).is_some() {
            Err(StoreError::DuplicateName {
                parent,
                kind,
                name: name.to_owned(),
            })
        } else {
            Ok(())
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
