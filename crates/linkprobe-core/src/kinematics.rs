//! Kinematic integration stage.
//!
//! Moves links of non-static models by their stored velocities so that
//! poses change between steps. There are no forces, contacts or joints:
//!
//! - `position += linear_velocity * dt`
//! - `rotation = exp(angular_velocity * dt) * rotation`
//!
//! Velocities are expressed in the owning model's frame, the same frame as
//! the link pose.

use glam::{DQuat, DVec3};

use crate::entity::EntityId;
use crate::store::EntityStore;

/// Velocity integrator run by the [`SimulationRunner`](crate::runner::SimulationRunner)
/// between update and post-update.
#[derive(Debug, Clone, Copy, Default)]
pub struct KinematicIntegrator;

impl KinematicIntegrator {
    /// Creates an integrator.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Advances every moving link of a non-static model by `dt` seconds.
    ///
    /// Returns the ids of links that moved, in id order.
    pub fn integrate(&self, store: &mut EntityStore, dt: f64) -> Vec<EntityId> {
        if dt <= 0.0 {
            return Vec::new();
        }

        // First pass: links whose owning model is allowed to move.
        let movable: Vec<EntityId> = store
            .entities_sorted()
            .filter_map(|entity| {
                let link = entity.as_link()?;
                if !link.is_moving() {
                    return None;
                }
                let parent = store.get(entity.parent()?)?;
                let model = parent.as_model()?;
                (!model.is_static).then_some(entity.id())
            })
            .collect();

        for id in &movable {
            if let Some(link) = store.get_mut(*id).and_then(|e| e.as_link_mut()) {
                link.pose.position += link.linear_velocity * dt;
                let rotation_vector = link.angular_velocity * dt;
                if rotation_vector != DVec3::ZERO {
                    let delta = DQuat::from_scaled_axis(rotation_vector);
                    link.pose.rotation = (delta * link.pose.rotation).normalize();
                }
            }
        }

        movable
    }
}
