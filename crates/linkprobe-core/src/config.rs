//! Declarative configuration.
//!
//! Two layers:
//!
//! - [`SystemConfig`]: the per-instance parameter block handed to
//!   [`Configurable::configure`](crate::system::Configurable::configure).
//! - [`WorldConfig`]: a JSON world description (models, links, attached
//!   systems) used to build a [`SimulationRunner`](crate::runner::SimulationRunner).
//!
//! # Example
//!
//! ```
//! use linkprobe_core::config::WorldConfig;
//!
//! let world = WorldConfig::from_json_str(r#"{
//!     "name": "demo",
//!     "models": [{
//!         "name": "arm",
//!         "links": [{ "name": "base" }],
//!         "systems": [{ "name": "link_pose_reporter", "params": { "link_name": "base" } }]
//!     }]
//! }"#).unwrap();
//!
//! assert_eq!(world.models[0].systems[0].params.get_str("link_name").unwrap(), "base");
//! ```

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use glam::DVec3;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::entity::components::DEFAULT_GRAVITY;
use crate::error::ConfigError;
use crate::pose::Pose;

/// Default physics step size in seconds.
pub const DEFAULT_MAX_STEP_SIZE: f64 = 0.001;

// =============================================================================
// System Config
// =============================================================================

/// Parameter block for one system instance.
///
/// Values are kept as raw JSON so each system decides how to interpret its
/// own fields. Accessors distinguish a missing field from a malformed one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SystemConfig {
    params: BTreeMap<String, Value>,
}

impl SystemConfig {
    /// Creates an empty parameter block.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Inserts or replaces a parameter.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.params.insert(key.into(), value.into());
    }

    /// Returns `true` if the parameter is present.
    #[must_use]
    pub fn has(&self, key: &str) -> bool {
        self.params.contains_key(key)
    }

    /// Returns the raw value of a parameter.
    #[must_use]
    pub fn get_raw(&self, key: &str) -> Option<&Value> {
        self.params.get(key)
    }

    /// Returns a string parameter.
    ///
    /// # Errors
    ///
    /// [`ConfigError::MissingField`] if absent, [`ConfigError::InvalidValue`]
    /// if present but not a string.
    pub fn get_str(&self, key: &str) -> Result<&str, ConfigError> {
        let value = self
            .params
            .get(key)
            .ok_or_else(|| ConfigError::MissingField(key.to_owned()))?;
        value.as_str().ok_or_else(|| ConfigError::InvalidValue {
            field: key.to_owned(),
            message: format!("expected a string, found {value}"),
        })
    }

    /// Deserializes a parameter into any serde type.
    ///
    /// # Errors
    ///
    /// [`ConfigError::MissingField`] if absent, [`ConfigError::InvalidValue`]
    /// if it does not deserialize.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<T, ConfigError> {
        let value = self
            .params
            .get(key)
            .ok_or_else(|| ConfigError::MissingField(key.to_owned()))?;
        T::deserialize(value).map_err(|e| ConfigError::InvalidValue {
            field: key.to_owned(),
            message: e.to_string(),
        })
    }

    /// Returns a parameter or `default` when absent.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidValue`] if present but malformed.
    pub fn get_or<T: DeserializeOwned>(&self, key: &str, default: T) -> Result<T, ConfigError> {
        if self.has(key) {
            self.get(key)
        } else {
            Ok(default)
        }
    }

    /// Number of parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Returns `true` if there are no parameters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}

// =============================================================================
// World Description
// =============================================================================

/// Pose as written in a world file: translation plus roll/pitch/yaw.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoseConfig {
    /// Translation `[x, y, z]` in meters.
    pub xyz: [f64; 3],
    /// Fixed-axis rotation `[roll, pitch, yaw]` in radians.
    pub rpy: [f64; 3],
}

impl From<PoseConfig> for Pose {
    fn from(p: PoseConfig) -> Self {
        Pose::from_xyz_rpy(p.xyz[0], p.xyz[1], p.xyz[2], p.rpy[0], p.rpy[1], p.rpy[2])
    }
}

/// A system attached to an entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemEntry {
    /// Registered name or alias of the system.
    pub name: String,
    /// Parameters handed to the system's configure hook.
    #[serde(default)]
    pub params: SystemConfig,
}

/// A link inside a model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkConfig {
    /// Link name, unique within its model.
    pub name: String,
    /// Pose relative to the model.
    #[serde(default)]
    pub pose: PoseConfig,
    /// Initial linear velocity `[vx, vy, vz]` in the model frame.
    #[serde(default)]
    pub linear_velocity: [f64; 3],
    /// Initial angular velocity `[wx, wy, wz]` in the model frame.
    #[serde(default)]
    pub angular_velocity: [f64; 3],
}

/// A model, possibly containing nested models.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Model name, unique among its siblings.
    pub name: String,
    /// Pose relative to the parent.
    #[serde(default)]
    pub pose: PoseConfig,
    /// Static models are never integrated.
    #[serde(default, rename = "static")]
    pub is_static: bool,
    /// Links owned by this model.
    #[serde(default)]
    pub links: Vec<LinkConfig>,
    /// Nested models.
    #[serde(default)]
    pub models: Vec<ModelConfig>,
    /// Systems attached to this model.
    #[serde(default)]
    pub systems: Vec<SystemEntry>,
}

/// Physics step settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Simulated seconds advanced per step.
    pub max_step_size: f64,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            max_step_size: DEFAULT_MAX_STEP_SIZE,
        }
    }
}

impl PhysicsConfig {
    /// The step size as a [`Duration`].
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidValue`] if the step is not positive or does not
    /// fit in a `Duration`.
    pub fn step_duration(&self) -> Result<Duration, ConfigError> {
        let dt = self.max_step_size;
        let invalid = |message: String| ConfigError::InvalidValue {
            field: "physics.max_step_size".to_owned(),
            message,
        };
        if !dt.is_finite() || dt <= 0.0 {
            return Err(invalid(format!("{dt} (must be > 0)")));
        }
        Duration::try_from_secs_f64(dt).map_err(|e| invalid(format!("{dt} ({e})")))
    }
}

/// A complete world description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldConfig {
    /// World name.
    #[serde(default = "default_world_name")]
    pub name: String,
    /// Gravity vector.
    #[serde(default = "default_gravity")]
    pub gravity: [f64; 3],
    /// Step settings.
    #[serde(default)]
    pub physics: PhysicsConfig,
    /// Top-level models.
    #[serde(default)]
    pub models: Vec<ModelConfig>,
    /// Systems attached to the world entity.
    #[serde(default)]
    pub systems: Vec<SystemEntry>,
}

fn default_world_name() -> String {
    "default".to_owned()
}

fn default_gravity() -> [f64; 3] {
    DEFAULT_GRAVITY.to_array()
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            name: default_world_name(),
            gravity: default_gravity(),
            physics: PhysicsConfig::default(),
            models: Vec::new(),
            systems: Vec::new(),
        }
    }
}

impl WorldConfig {
    /// Parses a world description from JSON and validates it.
    ///
    /// # Errors
    ///
    /// Fails on malformed JSON or an invalid step size.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a world description file.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read or does not parse.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_json_str(&content)
    }

    /// Checks values serde cannot.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidValue`] for a step that is not positive or does
    /// not fit in a `Duration`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.physics.step_duration().map(|_| ())
    }

    /// Gravity as a vector.
    #[must_use]
    pub fn gravity_vec(&self) -> DVec3 {
        DVec3::from_array(self.gravity)
    }
}

// =============================================================================
// Tests
// =============================================================================
