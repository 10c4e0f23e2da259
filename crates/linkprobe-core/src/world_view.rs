//! `WorldView` provides read-only access to the world store for
//! post-update observers.
//!
//! A view borrows the [`EntityStore`] immutably for the duration of one hook
//! call, so an observer can neither mutate simulation state nor keep the
//! borrow past the call. Entity handles are resolved through the store on
//! every access.
//!
//! # Example
//!
//! ```
//! use linkprobe_core::entity::{LinkComponents, ModelComponents, WorldComponents};
//! use linkprobe_core::pose::Pose;
//! use linkprobe_core::store::EntityStore;
//! use linkprobe_core::system::UpdateInfo;
//! use linkprobe_core::world_view::WorldView;
//!
//! let mut store = EntityStore::new();
//! let world = store.spawn_world("default", WorldComponents::default());
//! let model = store.spawn_model(world, "arm", ModelComponents::default()).unwrap();
//! let link = store.spawn_link(model, "base", LinkComponents::default()).unwrap();
//!
//! let info = UpdateInfo::default();
//! let view = WorldView::new(&store, &info);
//! assert_eq!(view.link_by_name(model, "base"), Some(link));
//! assert_eq!(view.world_pose(link).unwrap(), Pose::IDENTITY);
//! ```

use crate::entity::{Entity, EntityId};
use crate::error::StoreError;
use crate::model::Model;
use crate::pose::Pose;
use crate::store::EntityStore;
use crate::system::UpdateInfo;

/// Read-only view of the world for one hook call.
#[derive(Debug, Clone, Copy)]
pub struct WorldView<'a> {
    store: &'a EntityStore,
    info: &'a UpdateInfo,
}

impl<'a> WorldView<'a> {
    /// Creates a view over `store` for the step described by `info`.
    #[must_use]
    pub const fn new(store: &'a EntityStore, info: &'a UpdateInfo) -> Self {
        Self { store, info }
    }

    /// Returns the timing metadata of the current step.
    #[must_use]
    pub const fn info(&self) -> &'a UpdateInfo {
        self.info
    }

    /// Returns the underlying store, read-only.
    #[must_use]
    pub const fn store(&self) -> &'a EntityStore {
        self.store
    }

    /// Returns an entity, if live.
    #[must_use]
    pub fn entity(&self, id: EntityId) -> Option<&'a Entity> {
        self.store.get(id)
    }

    /// Returns `true` if the id refers to a live entity.
    #[must_use]
    pub fn contains(&self, id: EntityId) -> bool {
        self.store.contains(id)
    }

    /// Returns an entity's pose relative to its parent.
    ///
    /// # Errors
    ///
    /// See [`EntityStore::pose`].
    pub fn pose(&self, id: EntityId) -> Result<Pose, StoreError> {
        self.store.pose(id)
    }

    /// Returns an entity's pose in the world frame.
    ///
    /// # Errors
    ///
    /// See [`EntityStore::world_pose`].
    pub fn world_pose(&self, id: EntityId) -> Result<Pose, StoreError> {
        self.store.world_pose(id)
    }

    /// Iterates over an entity's direct children.
    pub fn children(&self, parent: EntityId) -> impl Iterator<Item = EntityId> + 'a {
        self.store.children(parent)
    }

    /// Resolves a link of `model` by name.
    #[must_use]
    pub fn link_by_name(&self, model: EntityId, name: &str) -> Option<EntityId> {
        Model::new(model).link_by_name(self.store, name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{LinkComponents, ModelComponents, WorldComponents};
    use glam::DVec3;
    use std::time::Duration;

    #[test]
    fn exposes_step_info() {
        let store = EntityStore::new();
        let info = UpdateInfo {
            iterations: 12,
            sim_time: Duration::from_millis(12),
            dt: Duration::from_millis(1),
            ..UpdateInfo::default()
        };
        let view = WorldView::new(&store, &info);
        assert_eq!(view.info().iterations, 12);
        assert_eq!(view.info().dt, Duration::from_millis(1));
    }

    #[test]
    fn reads_poses_and_children() {
        let mut store = EntityStore::new();
        let world = store.spawn_world("default", WorldComponents::default());
        let model = store
            .spawn_model(
                world,
                "arm",
                ModelComponents::at(Pose::from_translation(DVec3::new(0.0, 0.0, 2.0))),
            )
            .unwrap();
        let link = store
            .spawn_link(
                model,
                "base",
                LinkComponents::at(Pose::from_translation(DVec3::new(1.0, 0.0, 0.0))),
            )
            .unwrap();

        let info = UpdateInfo::default();
        let view = WorldView::new(&store, &info);

        assert!(view.contains(link));
        assert_eq!(view.entity(link).unwrap().name(), "base");
        assert_eq!(view.pose(link).unwrap().position, DVec3::new(1.0, 0.0, 0.0));
        assert_eq!(
            view.world_pose(link).unwrap().position,
            DVec3::new(1.0, 0.0, 2.0)
        );
        assert_eq!(view.children(model).collect::<Vec<_>>(), vec![link]);
        assert_eq!(view.link_by_name(model, "nope"), None);
    }

    #[test]
    fn stale_handles_fail() {
        let store = EntityStore::new();
        let info = UpdateInfo::default();
        let view = WorldView::new(&store, &info);
        assert_eq!(
            view.world_pose(EntityId::new(3)),
            Err(StoreError::UnknownEntity(EntityId::new(3)))
        );
    }
}
