//! # Linkprobe Core
//!
//! A small multibody simulation host with pluggable systems.
//!
//! A world is a tree of entities (world, models, links) held in an
//! [`EntityStore`](store::EntityStore). Systems are attached to entities,
//! found by name through a [`SystemRegistry`](registry::SystemRegistry),
//! and driven step by step by a [`SimulationRunner`](runner::SimulationRunner).
//!
//! ## Architecture
//!
//! - **Store**: arena of entities keyed by never-reused [`EntityId`](entity::EntityId)s
//! - **Systems**: capability traits (configure, pre-update, update, post-update)
//! - **Runner**: event handling, hook dispatch, kinematic integration
//!
//! The built-in [`LinkPoseReporter`](systems::LinkPoseReporter) prints one
//! link's world pose after every step.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use linkprobe_core::config::WorldConfig;
//! use linkprobe_core::registry;
//! use linkprobe_core::runner::SimulationRunner;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = WorldConfig::load("arm.world.json")?;
//! let mut runner = SimulationRunner::from_world_config(registry::builtin(), &config)?;
//! runner.run(100);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod entity;
pub mod error;
pub mod events;
pub mod kinematics;
pub mod model;
pub mod pose;
pub mod registry;
pub mod runner;
pub mod sink;
pub mod store;
pub mod system;
pub mod systems;
pub mod world_view;

#[cfg(test)]
mod tests;
