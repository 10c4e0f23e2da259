//! Component structs for each entity kind.
//!
//! Every entity carries exactly one of these, selected by its
//! [`EntityKind`](super::EntityKind). Poses are always relative to the
//! entity's parent.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::pose::Pose;

/// Standard gravity along -Z, in m/s^2.
pub const DEFAULT_GRAVITY: DVec3 = DVec3::new(0.0, 0.0, -9.8);

/// Components for the world entity.
///
/// The world is the root of the entity tree and has no pose of its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldComponents {
    /// Gravity vector in the world frame.
    pub gravity: DVec3,
}

impl Default for WorldComponents {
    fn default() -> Self {
        Self {
            gravity: DEFAULT_GRAVITY,
        }
    }
}

/// Components for model entities.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelComponents {
    /// Pose relative to the parent (world or enclosing model).
    pub pose: Pose,
    /// Static models are never moved by kinematic integration.
    pub is_static: bool,
}

impl ModelComponents {
    /// Creates a non-static model at the given pose.
    #[must_use]
    pub fn at(pose: Pose) -> Self {
        Self {
            pose,
            is_static: false,
        }
    }
}

/// Components for link entities.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LinkComponents {
    /// Pose relative to the owning model.
    pub pose: Pose,
    /// Linear velocity in the model frame, m/s.
    pub linear_velocity: DVec3,
    /// Angular velocity in the model frame, rad/s.
    pub angular_velocity: DVec3,
}

impl LinkComponents {
    /// Creates a link at rest at the given pose.
    #[must_use]
    pub fn at(pose: Pose) -> Self {
        Self {
            pose,
            ..Self::default()
        }
    }

    /// Returns `true` if the link has any non-zero velocity.
    #[must_use]
    pub fn is_moving(&self) -> bool {
        self.linear_velocity != DVec3::ZERO || self.angular_velocity != DVec3::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn world_defaults_to_standard_gravity() {
        assert_eq!(WorldComponents::default().gravity, DEFAULT_GRAVITY);
    }

    #[test]
    fn link_at_rest_is_not_moving() {
        let link = LinkComponents::at(Pose::IDENTITY);
        assert!(!link.is_moving());

        let moving = LinkComponents {
            angular_velocity: DVec3::Z,
            ..link
        };
        assert!(moving.is_moving());
    }

    #[test]
    fn component_structs_are_serializable() {
        let link = LinkComponents::at(Pose::from_xyz_rpy(1.0, 2.0, 3.0, 0.0, 0.0, 0.0));
        let json = serde_json::to_string(&link).unwrap();
        let back: LinkComponents = serde_json::from_str(&json).unwrap();
        assert_eq!(link, back);
    }
}
