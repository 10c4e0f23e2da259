//! Rigid-body poses.
//!
//! A [`Pose`] is a translation plus a rotation, always expressed relative to
//! some parent frame. Multiplying a parent pose by a child pose yields the
//! child expressed in the parent's own parent frame, which is how world poses
//! are built by walking up the entity tree.
//!
//! # Example
//!
//! ```
//! use linkprobe_core::pose::Pose;
//! use glam::DVec3;
//!
//! let model = Pose::from_xyz_rpy(1.0, 0.0, 0.0, 0.0, 0.0, std::f64::consts::FRAC_PI_2);
//! let link = Pose::from_xyz_rpy(1.0, 0.0, 0.0, 0.0, 0.0, 0.0);
//!
//! let world = model * link;
//! assert!(world.position.abs_diff_eq(DVec3::new(1.0, 1.0, 0.0), 1e-12));
//! ```

use std::fmt;
use std::ops::Mul;

use glam::{DQuat, DVec3, EulerRot};
use serde::{Deserialize, Serialize};

/// Position and orientation of a frame relative to its parent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    /// Translation in meters.
    pub position: DVec3,
    /// Orientation as a unit quaternion.
    pub rotation: DQuat,
}

impl Pose {
    /// The identity pose.
    pub const IDENTITY: Self = Self {
        position: DVec3::ZERO,
        rotation: DQuat::IDENTITY,
    };

    /// Creates a pose from a translation and rotation.
    #[must_use]
    pub const fn new(position: DVec3, rotation: DQuat) -> Self {
        Self { position, rotation }
    }

    /// Creates a pure translation.
    #[must_use]
    pub const fn from_translation(position: DVec3) -> Self {
        Self {
            position,
            rotation: DQuat::IDENTITY,
        }
    }

    /// Creates a pose from a translation and fixed-axis roll, pitch, yaw
    /// angles in radians (rotation about X, then Y, then Z).
    #[must_use]
    pub fn from_xyz_rpy(x: f64, y: f64, z: f64, roll: f64, pitch: f64, yaw: f64) -> Self {
        Self {
            position: DVec3::new(x, y, z),
            rotation: DQuat::from_euler(EulerRot::ZYX, yaw, pitch, roll),
        }
    }

    /// Returns `(roll, pitch, yaw)` in radians.
    #[must_use]
    pub fn rpy(&self) -> DVec3 {
        let (yaw, pitch, roll) = self.rotation.to_euler(EulerRot::ZYX);
        DVec3::new(roll, pitch, yaw)
    }

    /// Returns the inverse transform, so that `p * p.inverse()` is identity.
    #[must_use]
    pub fn inverse(&self) -> Self {
        let rotation = self.rotation.inverse();
        Self {
            position: rotation * -self.position,
            rotation,
        }
    }

    /// Transforms a point from this frame into the parent frame.
    #[must_use]
    pub fn transform_point(&self, point: DVec3) -> DVec3 {
        self.position + self.rotation * point
    }

    /// Approximate equality on both translation and rotation.
    ///
    /// Quaternions `q` and `-q` describe the same rotation and compare equal.
    #[must_use]
    pub fn abs_diff_eq(&self, other: &Self, max_abs_diff: f64) -> bool {
        self.position.abs_diff_eq(other.position, max_abs_diff)
            && (self.rotation.abs_diff_eq(other.rotation, max_abs_diff)
                || self.rotation.abs_diff_eq(-other.rotation, max_abs_diff))
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul for Pose {
    type Output = Pose;

    fn mul(self, child: Pose) -> Pose {
        Pose {
            position: self.transform_point(child.position),
            rotation: (self.rotation * child.rotation).normalize(),
        }
    }
}

/// Formats as `x y z roll pitch yaw`, the single-line form printed by the
/// pose reporter.
impl fmt::Display for Pose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rpy = self.rpy();
        let values = [
            self.position.x,
            self.position.y,
            self.position.z,
            rpy.x,
            rpy.y,
            rpy.z,
        ];
        for (i, value) in values.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            match f.precision() {
                Some(p) => {
                    // values that round to zero print as 0, never -0
                    let half_ulp = 0.5 * 10f64.powi(-i32::try_from(p).unwrap_or(i32::MAX));
                    let value = if value.abs() < half_ulp { 0.0 } else { *value };
                    write!(f, "{value:.p$}")?;
                }
                None => {
                    let value = if *value == 0.0 { 0.0 } else { *value };
                    write!(f, "{value}")?;
                }
            }
        }
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    const EPS: f64 = 1e-9;

    #[test]
    fn identity_is_default() {
        assert_eq!(Pose::default(), Pose::IDENTITY);
    }

    #[test]
    fn rpy_roundtrip_small_angles() {
        let pose = Pose::from_xyz_rpy(0.0, 0.0, 0.0, 0.1, -0.2, 0.3);
        let rpy = pose.rpy();
        assert!((rpy.x - 0.1).abs() < EPS);
        assert!((rpy.y + 0.2).abs() < EPS);
        assert!((rpy.z - 0.3).abs() < EPS);
    }

    #[test]
    fn compose_rotates_child_translation() {
        let parent = Pose::from_xyz_rpy(0.0, 0.0, 1.0, 0.0, 0.0, FRAC_PI_2);
        let child = Pose::from_translation(DVec3::new(2.0, 0.0, 0.0));

        let world = parent * child;
        assert!(world
            .position
            .abs_diff_eq(DVec3::new(0.0, 2.0, 1.0), EPS));
        assert!((world.rpy().z - FRAC_PI_2).abs() < EPS);
    }

    #[test]
    fn compose_with_identity() {
        let pose = Pose::from_xyz_rpy(1.0, 2.0, 3.0, 0.1, 0.2, 0.3);
        assert!((Pose::IDENTITY * pose).abs_diff_eq(&pose, EPS));
        assert!((pose * Pose::IDENTITY).abs_diff_eq(&pose, EPS));
    }

    #[test]
    fn inverse_cancels() {
        let pose = Pose::from_xyz_rpy(1.0, -2.0, 0.5, 0.3, 0.0, PI / 3.0);
        assert!((pose * pose.inverse()).abs_diff_eq(&Pose::IDENTITY, EPS));
        assert!((pose.inverse() * pose).abs_diff_eq(&Pose::IDENTITY, EPS));
    }

    #[test]
    fn display_format() {
        let pose = Pose::from_translation(DVec3::new(1.0, 2.5, -3.0));
        assert_eq!(format!("{pose}"), "1 2.5 -3 0 0 0");
    }

    #[test]
    fn display_with_precision() {
        let pose = Pose::from_xyz_rpy(1.0, 0.0, 0.0, 0.0, 0.0, FRAC_PI_2);
        assert_eq!(format!("{pose:.3}"), "1.000 0.000 0.000 0.000 0.000 1.571");
    }

    #[test]
    fn serialization_roundtrip() {
        let pose = Pose::from_xyz_rpy(1.0, 2.0, 3.0, 0.0, 0.5, 0.0);
        let json = serde_json::to_string(&pose).unwrap();
        let back: Pose = serde_json::from_str(&json).unwrap();
        assert_eq!(pose, back);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        fn any_pose() -> impl Strategy<Value = Pose> {
            (
                -100.0..100.0f64,
                -100.0..100.0f64,
                -100.0..100.0f64,
                -PI..PI,
                -1.5..1.5f64,
                -PI..PI,
            )
                .prop_map(|(x, y, z, r, p, yaw)| Pose::from_xyz_rpy(x, y, z, r, p, yaw))
        }

        proptest! {
            #[test]
            fn composition_is_associative(a in any_pose(), b in any_pose(), c in any_pose()) {
                let left = (a * b) * c;
                let right = a * (b * c);
                prop_assert!(left.abs_diff_eq(&right, 1e-6));
            }

            #[test]
            fn inverse_is_two_sided(p in any_pose()) {
                prop_assert!((p * p.inverse()).abs_diff_eq(&Pose::IDENTITY, 1e-6));
            }

            #[test]
            fn rotation_stays_normalized(a in any_pose(), b in any_pose()) {
                prop_assert!((a * b).rotation.is_normalized());
            }
        }
    }
}
