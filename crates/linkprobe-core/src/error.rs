//! Error types for the host surface.

use std::path::PathBuf;

use thiserror::Error;

use crate::entity::{EntityId, EntityKind};

/// Errors returned by [`EntityStore`](crate::store::EntityStore) operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The id does not refer to a live entity.
    #[error("entity {0} does not exist")]
    UnknownEntity(EntityId),

    /// The entity exists but is the wrong kind for the operation.
    #[error("entity {id} is a {actual}, expected {expected}")]
    WrongKind {
        /// The entity that was looked up.
        id: EntityId,
        /// The kind the operation needs.
        expected: EntityKind,
        /// The kind the entity actually has.
        actual: EntityKind,
    },

    /// A sibling of the same kind already uses this name.
    #[error("{kind} named '{name}' already exists under entity {parent}")]
    DuplicateName {
        /// Parent of the would-be sibling.
        parent: EntityId,
        /// Kind of the new entity.
        kind: EntityKind,
        /// The clashing name.
        name: String,
    },

    /// The entity kind carries no pose (the world).
    #[error("entity {0} has no pose")]
    NoPose(EntityId),
}

/// Errors produced while reading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read a configuration file.
    #[error("IO error reading {path}: {source}")]
    Io {
        /// The file that could not be read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// The file is not valid JSON for the expected shape.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// A required field is absent.
    #[error("missing required field: {0}")]
    MissingField(String),

    /// A field is present but has the wrong type or an out-of-range value.
    #[error("invalid value for {field}: {message}")]
    InvalidValue {
        /// Dotted path of the offending field.
        field: String,
        /// What is wrong with the value.
        message: String,
    },
}

/// Errors from the system registration table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// Neither a registered name nor an alias.
    #[error("no system registered under '{0}'")]
    UnknownSystem(String),

    /// The name or alias is taken.
    #[error("a system or alias named '{0}' is already registered")]
    Duplicate(String),
}

/// Errors from building or driving a [`SimulationRunner`](crate::runner::SimulationRunner).
#[derive(Debug, Error)]
pub enum RunnerError {
    /// System lookup failed.
    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),

    /// An entity operation failed.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// The world description was invalid.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_error_messages() {
        let e = StoreError::UnknownEntity(EntityId::new(4));
        assert_eq!(e.to_string(), "entity 4 does not exist");

        let e = StoreError::WrongKind {
            id: EntityId::new(1),
            expected: EntityKind::Model,
            actual: EntityKind::Link,
        };
        assert_eq!(e.to_string(), "entity 1 is a Link, expected Model");
    }

    #[test]
    fn config_error_messages() {
        let e = ConfigError::MissingField("link_name".into());
        assert_eq!(e.to_string(), "missing required field: link_name");

        let e = ConfigError::Io {
            path: PathBuf::from("/tmp/world.json"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        };
        let msg = e.to_string();
        assert!(msg.contains("/tmp/world.json"));
        assert!(msg.contains("not found"));
    }

    #[test]
    fn runner_error_wraps_sources() {
        let e: RunnerError = RegistryError::UnknownSystem("nope".into()).into();
        assert_eq!(
            e.to_string(),
            "registry error: no system registered under 'nope'"
        );
    }

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn errors_are_send_sync() {
        assert_send_sync::<StoreError>();
        assert_send_sync::<ConfigError>();
        assert_send_sync::<RunnerError>();
    }
}
