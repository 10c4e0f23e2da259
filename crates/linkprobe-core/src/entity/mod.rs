//! Entity types for the world store.
//!
//! - [`EntityId`]: opaque handle into the [`EntityStore`](crate::store::EntityStore)
//! - [`EntityKind`]: world, model or link
//! - [`EntityInner`]: kind-specific component storage
//! - [`Entity`]: the complete record held by the store
//!
//! Entities form a tree: the world at the root, models (possibly nested)
//! below it, and links below models. Each entity's pose is relative to its
//! parent.
//!
//! # Example
//!
//! ```
//! use linkprobe_core::entity::{Entity, EntityId, EntityInner, EntityKind, LinkComponents};
//!
//! let link = Entity::new(
//!     EntityId::new(3),
//!     "upper_arm",
//!     Some(EntityId::new(1)),
//!     EntityInner::Link(LinkComponents::default()),
//! );
//!
//! assert_eq!(link.kind(), EntityKind::Link);
//! assert_eq!(link.name(), "upper_arm");
//! ```

pub mod components;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use components::{LinkComponents, ModelComponents, WorldComponents};

use crate::pose::Pose;

/// Opaque identifier for an entity.
///
/// Ids are assigned monotonically by the store and never reused, so a stale
/// id held by a system simply fails to resolve after its entity is removed.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(u64);

impl EntityId {
    /// Creates an `EntityId` from a raw value.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw value.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityId({})", self.0)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for EntityId {
    fn from(id: u64) -> Self {
        Self::new(id)
    }
}

/// Kind of entity.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    /// Root of the entity tree.
    World,
    /// A model: a named group of links, optionally nested in another model.
    Model,
    /// A rigid body belonging to a model.
    Link,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::World => write!(f, "World"),
            Self::Model => write!(f, "Model"),
            Self::Link => write!(f, "Link"),
        }
    }
}

/// Kind-specific component storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EntityInner {
    /// World components (gravity)
    World(WorldComponents),
    /// Model components (pose, static flag)
    Model(ModelComponents),
    /// Link components (pose, velocities)
    Link(LinkComponents),
}

impl EntityInner {
    /// Returns the kind matching this storage.
    #[must_use]
    pub const fn kind(&self) -> EntityKind {
        match self {
            Self::World(_) => EntityKind::World,
            Self::Model(_) => EntityKind::Model,
            Self::Link(_) => EntityKind::Link,
        }
    }

    /// Returns the pose relative to the parent. The world has none.
    #[must_use]
    pub const fn pose(&self) -> Option<&Pose> {
        match self {
            Self::World(_) => None,
            Self::Model(model) => Some(&model.pose),
            Self::Link(link) => Some(&link.pose),
        }
    }

    /// Returns a mutable pose, if this kind has one.
    #[must_use]
    pub fn pose_mut(&mut self) -> Option<&mut Pose> {
        match self {
            Self::World(_) => None,
            Self::Model(model) => Some(&mut model.pose),
            Self::Link(link) => Some(&mut link.pose),
        }
    }
}

/// An entity record in the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    id: EntityId,
    name: String,
    parent: Option<EntityId>,
    inner: EntityInner,
}

impl Entity {
    /// Creates a new entity record. The store validates `parent`; this
    /// constructor does not.
    #[must_use]
    pub fn new(
        id: EntityId,
        name: impl Into<String>,
        parent: Option<EntityId>,
        inner: EntityInner,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            parent,
            inner,
        }
    }

    /// Returns the entity's id.
    #[must_use]
    pub const fn id(&self) -> EntityId {
        self.id
    }

    /// Returns the entity's name, unique among its siblings of the same kind.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the parent entity, `None` for the world.
    #[must_use]
    pub const fn parent(&self) -> Option<EntityId> {
        self.parent
    }

    /// Returns the entity kind.
    #[must_use]
    pub const fn kind(&self) -> EntityKind {
        self.inner.kind()
    }

    /// Returns the component storage.
    #[must_use]
    pub const fn inner(&self) -> &EntityInner {
        &self.inner
    }

    /// Returns the component storage mutably.
    #[must_use]
    pub fn inner_mut(&mut self) -> &mut EntityInner {
        &mut self.inner
    }

    /// Returns the pose relative to the parent.
    #[must_use]
    pub const fn pose(&self) -> Option<&Pose> {
        self.inner.pose()
    }

    /// Returns `true` if this is a model.
    #[must_use]
    pub const fn is_model(&self) -> bool {
        matches!(self.inner, EntityInner::Model(_))
    }

    /// Returns `true` if this is a link.
    #[must_use]
    pub const fn is_link(&self) -> bool {
        matches!(self.inner, EntityInner::Link(_))
    }

    /// Returns the model components if this is a model.
    #[must_use]
    pub const fn as_model(&self) -> Option<&ModelComponents> {
        match &self.inner {
            EntityInner::Model(model) => Some(model),
            _ => None,
        }
    }

    /// Returns the link components if this is a link.
    #[must_use]
    pub const fn as_link(&self) -> Option<&LinkComponents> {
        match &self.inner {
            EntityInner::Link(link) => Some(link),
            _ => None,
        }
    }

    /// Returns the link components mutably if this is a link.
    #[must_use]
    pub fn as_link_mut(&mut self) -> Option<&mut LinkComponents> {
        match &mut self.inner {
            EntityInner::Link(link) => Some(link),
            _ => None,
        }
    }
}
