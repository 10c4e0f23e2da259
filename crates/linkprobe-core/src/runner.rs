//! Step runner that drives systems through the update loop.
//!
//! Each call to [`SimulationRunner::step`] runs these phases in order:
//!
//! 1. **EVENTS**: drain queued [`Event`]s (pause, stop, reset)
//! 2. **PRE_UPDATE**: [`PreUpdatable`](crate::system::PreUpdatable) hooks, mutable store
//! 3. **UPDATE**: [`Updatable`](crate::system::Updatable) hooks, mutable store
//! 4. **KINEMATICS**: integrate link velocities (skipped while paused)
//! 5. **POST_UPDATE**: [`PostUpdateObservable`](crate::system::PostUpdateObservable)
//!    hooks, read-only [`WorldView`]
//!
//! Systems run in load order within each phase.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use linkprobe_core::config::SystemConfig;
//! use linkprobe_core::entity::{LinkComponents, ModelComponents};
//! use linkprobe_core::registry::SystemRegistry;
//! use linkprobe_core::runner::SimulationRunner;
//! use linkprobe_core::systems::LinkPoseReporter;
//!
//! let mut runner = SimulationRunner::new("default", Duration::from_millis(1));
//! let world = runner.world_entity();
//! let model = runner.store_mut().spawn_model(world, "arm", ModelComponents::default()).unwrap();
//! runner.store_mut().spawn_link(model, "base", LinkComponents::default()).unwrap();
//!
//! let registry = SystemRegistry::with_builtin_systems();
//! let config = SystemConfig::new().with("link_name", "base");
//! runner.load_system(&registry, LinkPoseReporter::NAME, model, &config).unwrap();
//!
//! assert_eq!(runner.run(10), 10);
//! assert_eq!(runner.iterations(), 10);
//! ```

use std::fmt;
use std::time::{Duration, Instant};

use glam::DVec3;
use tracing::{debug, info, info_span};

use crate::config::{ModelConfig, SystemConfig, SystemEntry, WorldConfig};
use crate::entity::{EntityId, LinkComponents, ModelComponents, WorldComponents};
use crate::error::{RunnerError, StoreError};
use crate::events::{Event, EventManager};
use crate::kinematics::KinematicIntegrator;
use crate::registry::SystemRegistry;
use crate::store::EntityStore;
use crate::system::{Capabilities, System, SystemInstanceId, UpdateInfo};
use crate::world_view::WorldView;

/// A system attached to an entity, with its capabilities cached at load.
struct LoadedSystem {
    id: SystemInstanceId,
    capabilities: Capabilities,
    system: Box<dyn System>,
}

/// Owns a world store and steps the systems attached to it.
pub struct SimulationRunner {
    /// The world store.
    store: EntityStore,
    /// Store contents at the first step, used by [`Event::Reset`].
    initial: Option<EntityStore>,
    /// The world entity systems attach to by default.
    world: EntityId,
    /// Loaded systems in load order.
    systems: Vec<LoadedSystem>,
    /// Pending host events.
    events: EventManager,
    /// Velocity integrator.
    kinematics: KinematicIntegrator,
    /// Timing of the most recent step.
    info: UpdateInfo,
    /// Simulated time per unpaused step.
    dt: Duration,
    /// Wall-clock start, set on the first step.
    started: Option<Instant>,
    /// Set by [`Event::Stop`].
    stopped: bool,
}

impl fmt::Debug for SimulationRunner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimulationRunner")
            .field("world", &self.world)
            .field("entities", &self.store.entity_count())
            .field(
                "systems",
                &self.systems.iter().map(|s| s.id.to_string()).collect::<Vec<_>>(),
            )
            .field("info", &self.info)
            .field("dt", &self.dt)
            .field("stopped", &self.stopped)
            .finish_non_exhaustive()
    }
}

impl SimulationRunner {
    /// Creates a runner with an empty world named `world_name`.
    #[must_use]
    pub fn new(world_name: &str, dt: Duration) -> Self {
        let mut store = EntityStore::new();
        let world = store.spawn_world(world_name, WorldComponents::default());
        Self::with_store(store, world, dt)
    }

    /// Creates a runner over an existing store.
    #[must_use]
    pub fn with_store(store: EntityStore, world: EntityId, dt: Duration) -> Self {
        Self {
            store,
            initial: None,
            world,
            systems: Vec::new(),
            events: EventManager::new(),
            kinematics: KinematicIntegrator::new(),
            info: UpdateInfo::default(),
            dt,
            started: None,
            stopped: false,
        }
    }

    /// Builds a runner from a world description: spawns every model and
    /// link, then loads every system entry in document order.
    ///
    /// # Errors
    ///
    /// Fails on an invalid description, a duplicate sibling name, or an
    /// unknown system name.
    pub fn from_world_config(
        registry: &SystemRegistry,
        config: &WorldConfig,
    ) -> Result<Self, RunnerError> {
        let dt = config.physics.step_duration()?;

        let mut store = EntityStore::new();
        let world = store.spawn_world(
            config.name.as_str(),
            WorldComponents {
                gravity: config.gravity_vec(),
            },
        );

        let mut pending: Vec<(EntityId, &SystemEntry)> =
            config.systems.iter().map(|entry| (world, entry)).collect();
        for model in &config.models {
            spawn_model_tree(&mut store, world, model, &mut pending)?;
        }

        let mut runner = Self::with_store(store, world, dt);
        info!(
            world = %config.name,
            entities = runner.store.entity_count(),
            ?dt,
            "world loaded"
        );

        for (entity, entry) in pending {
            runner.load_system(registry, &entry.name, entity, &entry.params)?;
        }
        Ok(runner)
    }

    /// Instantiates a registered system and attaches it to `entity`.
    ///
    /// # Errors
    ///
    /// Fails if the name is unknown or the entity is not live.
    pub fn load_system(
        &mut self,
        registry: &SystemRegistry,
        name: &str,
        entity: EntityId,
        config: &SystemConfig,
    ) -> Result<SystemInstanceId, RunnerError> {
        if !self.store.contains(entity) {
            return Err(StoreError::UnknownEntity(entity).into());
        }
        let system = registry.instantiate(name)?;
        self.add_system(entity, system, config)
    }

    /// Attaches an already constructed system to `entity`, running its
    /// configure hook if it has one.
    ///
    /// # Errors
    ///
    /// Fails if the entity is not live.
    pub fn add_system(
        &mut self,
        entity: EntityId,
        mut system: Box<dyn System>,
        config: &SystemConfig,
    ) -> Result<SystemInstanceId, RunnerError> {
        if !self.store.contains(entity) {
            return Err(StoreError::UnknownEntity(entity).into());
        }

        let id = SystemInstanceId::new(entity, system.name());
        let capabilities = system.capabilities();
        let _span = info_span!("configure", system = %id).entered();

        if let Some(configurable) = system.as_configurable() {
            configurable.configure(entity, config, &mut self.store, &mut self.events);
        }
        info!(%capabilities, "system loaded");

        self.systems.push(LoadedSystem {
            id: id.clone(),
            capabilities,
            system,
        });
        Ok(id)
    }

    /// Runs one step. Returns `false` without doing anything once stopped.
    pub fn step(&mut self) -> bool {
        if self.initial.is_none() {
            self.initial = Some(self.store.clone());
            self.started = Some(Instant::now());
        }

        self.apply_events();
        if self.stopped {
            return false;
        }

        let paused = self.info.paused;
        if paused {
            self.info.dt = Duration::ZERO;
        } else {
            self.info.dt = self.dt;
            self.info.iterations = self.info.iterations.saturating_add(1);
            self.info.sim_time = self.info.sim_time.saturating_add(self.dt);
        }
        self.info.real_time = self.started.map_or(Duration::ZERO, |t| t.elapsed());
        let info = self.info;

        for loaded in &mut self.systems {
            if loaded.capabilities.contains(Capabilities::PRE_UPDATE) {
                if let Some(hook) = loaded.system.as_pre_updatable() {
                    hook.pre_update(&info, &mut self.store);
                }
            }
        }

        for loaded in &mut self.systems {
            if loaded.capabilities.contains(Capabilities::UPDATE) {
                if let Some(hook) = loaded.system.as_updatable() {
                    hook.update(&info, &mut self.store);
                }
            }
        }

        if !paused {
            let moved = self.kinematics.integrate(&mut self.store, info.dt.as_secs_f64());
            debug!(iteration = info.iterations, moved = moved.len(), "kinematics");
        }

        let view = WorldView::new(&self.store, &info);
        for loaded in &mut self.systems {
            if loaded.capabilities.contains(Capabilities::POST_UPDATE) {
                if let Some(hook) = loaded.system.as_post_update_observable() {
                    hook.post_update(&info, &view);
                }
            }
        }

        true
    }

    /// Runs up to `steps` steps, stopping early on [`Event::Stop`].
    /// Returns the number of steps actually run.
    pub fn run(&mut self, steps: u64) -> u64 {
        let mut ran = 0;
        for _ in 0..steps {
            if !self.step() {
                break;
            }
            ran += 1;
        }
        ran
    }

    fn apply_events(&mut self) {
        let events: Vec<Event> = self.events.drain().collect();
        for event in events {
            info!(%event, "applying event");
            match event {
                Event::Pause(paused) => self.info.paused = paused,
                Event::Stop => self.stopped = true,
                Event::Reset => {
                    if let Some(initial) = &self.initial {
                        self.store.restore_components_from(initial);
                    }
                    self.info.iterations = 0;
                    self.info.sim_time = Duration::ZERO;
                }
            }
        }
    }

    /// Pauses or resumes stepping immediately.
    pub fn set_paused(&mut self, paused: bool) {
        self.info.paused = paused;
    }

    /// Returns the world store.
    #[must_use]
    pub fn store(&self) -> &EntityStore {
        &self.store
    }

    /// Returns the world store mutably.
    #[must_use]
    pub fn store_mut(&mut self) -> &mut EntityStore {
        &mut self.store
    }

    /// Returns the event queue, for hosts injecting events directly.
    #[must_use]
    pub fn events_mut(&mut self) -> &mut EventManager {
        &mut self.events
    }

    /// Returns the world entity.
    #[must_use]
    pub const fn world_entity(&self) -> EntityId {
        self.world
    }

    /// Timing of the most recent step.
    #[must_use]
    pub const fn update_info(&self) -> &UpdateInfo {
        &self.info
    }

    /// Completed unpaused steps.
    #[must_use]
    pub const fn iterations(&self) -> u64 {
        self.info.iterations
    }

    /// Simulated time elapsed.
    #[must_use]
    pub const fn sim_time(&self) -> Duration {
        self.info.sim_time
    }

    /// Simulated time per unpaused step.
    #[must_use]
    pub const fn dt(&self) -> Duration {
        self.dt
    }

    /// Whether stepping is paused.
    #[must_use]
    pub const fn is_paused(&self) -> bool {
        self.info.paused
    }

    /// Whether the run has been stopped.
    #[must_use]
    pub const fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Number of loaded systems.
    #[must_use]
    pub fn system_count(&self) -> usize {
        self.systems.len()
    }

    /// Loaded system instances with their capabilities, in load order.
    pub fn systems(&self) -> impl Iterator<Item = (&SystemInstanceId, Capabilities)> + '_ {
        self.systems.iter().map(|s| (&s.id, s.capabilities))
    }
}

fn spawn_model_tree<'c>(
    store: &mut EntityStore,
    parent: EntityId,
    config: &'c ModelConfig,
    pending: &mut Vec<(EntityId, &'c SystemEntry)>,
) -> Result<EntityId, RunnerError> {
    let model = store.spawn_model(
        parent,
        config.name.as_str(),
        ModelComponents {
            pose: config.pose.into(),
            is_static: config.is_static,
        },
    )?;

    for link in &config.links {
        store.spawn_link(
            model,
            link.name.as_str(),
            LinkComponents {
                pose: link.pose.into(),
                linear_velocity: DVec3::from_array(link.linear_velocity),
                angular_velocity: DVec3::from_array(link.angular_velocity),
            },
        )?;
    }

    for nested in &config.models {
        spawn_model_tree(store, model, nested, pending)?;
    }

    pending.extend(config.systems.iter().map(|entry| (model, entry)));
    Ok(model)
}

// =============================================================================
// Tests
// =============================================================================
