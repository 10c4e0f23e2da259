//! Capability interfaces implemented by simulation systems.
//!
//! A *system* is a plugin instance attached to one entity. Every system
//! implements the base [`System`] trait; each optional hook is a separate
//! trait that a system opts into:
//!
//! | Capability | Trait | Called |
//! |------------|-------|--------|
//! | `CONFIGURE` | [`Configurable`] | once, when the system is attached |
//! | `PRE_UPDATE` | [`PreUpdatable`] | every step, before update |
//! | `UPDATE` | [`Updatable`] | every step, before kinematics |
//! | `POST_UPDATE` | [`PostUpdateObservable`] | every step, after kinematics |
//!
//! The host never downcasts. It asks the system for each capability through
//! the `as_*` lookups on [`System`] and dispatches only to those that answer.
//!
//! # Example
//!
//! ```
//! use linkprobe_core::system::{Capabilities, PostUpdateObservable, System, UpdateInfo};
//! use linkprobe_core::world_view::WorldView;
//!
//! #[derive(Default)]
//! struct StepCounter {
//!     steps: u64,
//! }
//!
//! impl System for StepCounter {
//!     fn name(&self) -> &str {
//!         "step_counter"
//!     }
//!
//!     fn as_post_update_observable(&mut self) -> Option<&mut dyn PostUpdateObservable> {
//!         Some(self)
//!     }
//! }
//!
//! impl PostUpdateObservable for StepCounter {
//!     fn post_update(&mut self, _info: &UpdateInfo, _view: &WorldView<'_>) {
//!         self.steps += 1;
//!     }
//! }
//!
//! let mut counter = StepCounter::default();
//! assert_eq!(counter.capabilities(), Capabilities::POST_UPDATE);
//! ```

use std::fmt;
use std::time::Duration;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::config::SystemConfig;
use crate::entity::EntityId;
use crate::events::EventManager;
use crate::store::EntityStore;
use crate::world_view::WorldView;

bitflags! {
    /// Set of optional hooks a system implements.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct Capabilities: u8 {
        /// Implements [`Configurable`].
        const CONFIGURE = 1 << 0;
        /// Implements [`PreUpdatable`].
        const PRE_UPDATE = 1 << 1;
        /// Implements [`Updatable`].
        const UPDATE = 1 << 2;
        /// Implements [`PostUpdateObservable`].
        const POST_UPDATE = 1 << 3;
    }
}

impl fmt::Display for Capabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.iter_names().map(|(name, _)| name).collect();
        if names.is_empty() {
            write!(f, "NONE")
        } else {
            write!(f, "{}", names.join("|"))
        }
    }
}

/// Timing metadata passed to every update hook.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateInfo {
    /// Number of completed, unpaused steps.
    pub iterations: u64,
    /// Simulated time elapsed.
    pub sim_time: Duration,
    /// Wall-clock time elapsed since the runner started.
    pub real_time: Duration,
    /// Simulated time advanced by this step; zero while paused.
    pub dt: Duration,
    /// Whether the simulation is paused for this step.
    pub paused: bool,
}

/// Base trait for every system.
///
/// All capability lookups default to `None`; a system overrides exactly the
/// ones it implements by returning `Some(self)`.
pub trait System: Send {
    /// Registered name of the system type.
    fn name(&self) -> &str;

    /// Returns the configure hook, if implemented.
    fn as_configurable(&mut self) -> Option<&mut dyn Configurable> {
        None
    }

    /// Returns the pre-update hook, if implemented.
    fn as_pre_updatable(&mut self) -> Option<&mut dyn PreUpdatable> {
        None
    }

    /// Returns the update hook, if implemented.
    fn as_updatable(&mut self) -> Option<&mut dyn Updatable> {
        None
    }

    /// Returns the post-update hook, if implemented.
    fn as_post_update_observable(&mut self) -> Option<&mut dyn PostUpdateObservable> {
        None
    }

    /// Returns the capability set derived from the lookups above.
    fn capabilities(&mut self) -> Capabilities {
        let mut caps = Capabilities::empty();
        caps.set(Capabilities::CONFIGURE, self.as_configurable().is_some());
        caps.set(Capabilities::PRE_UPDATE, self.as_pre_updatable().is_some());
        caps.set(Capabilities::UPDATE, self.as_updatable().is_some());
        caps.set(
            Capabilities::POST_UPDATE,
            self.as_post_update_observable().is_some(),
        );
        caps
    }
}

/// Called once when the system is attached to an entity.
///
/// Failures are the system's own business: it should log them and leave
/// itself inert rather than fault the host.
pub trait Configurable {
    /// Configures the system.
    ///
    /// * `entity` - the entity the system is attached to
    /// * `config` - the declared configuration block for this instance
    /// * `store` - the world store, lent mutably for the duration of the call
    /// * `events` - sink for host events
    fn configure(
        &mut self,
        entity: EntityId,
        config: &SystemConfig,
        store: &mut EntityStore,
        events: &mut EventManager,
    );
}

/// Called every step before [`Updatable::update`].
pub trait PreUpdatable {
    /// Runs the pre-update hook.
    fn pre_update(&mut self, info: &UpdateInfo, store: &mut EntityStore);
}

/// Called every step before kinematic integration.
pub trait Updatable {
    /// Runs the update hook.
    fn update(&mut self, info: &UpdateInfo, store: &mut EntityStore);
}

/// Called every step after kinematic integration with read-only access.
pub trait PostUpdateObservable {
    /// Observes the post-step world.
    fn post_update(&mut self, info: &UpdateInfo, view: &WorldView<'_>);
}

/// Identifies a system instance: a system type attached to an entity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SystemInstanceId {
    entity: EntityId,
    name: String,
}

impl SystemInstanceId {
    /// Creates a new instance identifier.
    #[must_use]
    pub fn new(entity: EntityId, name: impl Into<String>) -> Self {
        Self {
            entity,
            name: name.into(),
        }
    }

    /// Returns the entity the system is attached to.
    #[must_use]
    pub const fn entity(&self) -> EntityId {
        self.entity
    }

    /// Returns the system type name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for SystemInstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.name, self.entity)
    }
}

// =============================================================================
// Tests
// =============================================================================
