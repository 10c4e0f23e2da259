//! Built-in systems.
//!
//! - [`LinkPoseReporter`]: reports one link's world pose after every step
//!
//! Use [`SystemRegistry::with_builtin_systems()`](crate::registry::SystemRegistry::with_builtin_systems)
//! to get a registry with these pre-registered under their names and aliases.

mod link_pose;

pub use link_pose::{LinkPoseReporter, ReporterError, ReporterState, LINK_NAME_PARAM};
