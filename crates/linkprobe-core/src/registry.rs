//! System registration table.
//!
//! A host finds systems by name: each registered system type has a factory
//! function, and any number of aliases may point at a registered name.
//! Registration is explicit. A process builds its table once at startup,
//! either its own or the shared [`builtin()`] table.
//!
//! # Example
//!
//! ```
//! use linkprobe_core::registry::SystemRegistry;
//! use linkprobe_core::systems::LinkPoseReporter;
//!
//! let registry = SystemRegistry::with_builtin_systems();
//!
//! let by_name = registry.instantiate(LinkPoseReporter::NAME).unwrap();
//! let by_alias = registry.instantiate(LinkPoseReporter::ALIAS).unwrap();
//! assert_eq!(by_name.name(), by_alias.name());
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::sync::OnceLock;

use crate::error::RegistryError;
use crate::system::System;
use crate::systems::LinkPoseReporter;

/// Creates a fresh, unconfigured system instance.
pub type SystemFactory = fn() -> Box<dyn System>;

/// Maps system names and aliases to factories.
#[derive(Default, Clone)]
pub struct SystemRegistry {
    /// Factories keyed by canonical name.
    factories: BTreeMap<String, SystemFactory>,
    /// Alias to canonical name.
    aliases: BTreeMap<String, String>,
}

impl SystemRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            factories: BTreeMap::new(),
            aliases: BTreeMap::new(),
        }
    }

    /// Registers a factory under a canonical name.
    ///
    /// # Errors
    ///
    /// [`RegistryError::Duplicate`] if the name is already a system or alias.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        factory: SystemFactory,
    ) -> Result<(), RegistryError> {
        let name = name.into();
        if self.is_known(&name) {
            return Err(RegistryError::Duplicate(name));
        }
        tracing::debug!(system = %name, "system registered");
        self.factories.insert(name, factory);
        Ok(())
    }

    /// Adds an alias for an already registered name.
    ///
    /// # Errors
    ///
    /// [`RegistryError::UnknownSystem`] if `target` is not registered,
    /// [`RegistryError::Duplicate`] if `alias` is taken.
    pub fn add_alias(
        &mut self,
        alias: impl Into<String>,
        target: &str,
    ) -> Result<(), RegistryError> {
        let alias = alias.into();
        if !self.factories.contains_key(target) {
            return Err(RegistryError::UnknownSystem(target.to_owned()));
        }
        if self.is_known(&alias) {
            return Err(RegistryError::Duplicate(alias));
        }
        self.aliases.insert(alias, target.to_owned());
        Ok(())
    }

    /// Resolves a name or alias to the canonical name.
    #[must_use]
    pub fn resolve<'a>(&'a self, name_or_alias: &'a str) -> Option<&'a str> {
        if self.factories.contains_key(name_or_alias) {
            Some(name_or_alias)
        } else {
            self.aliases.get(name_or_alias).map(String::as_str)
        }
    }

    /// Creates a new instance of the named system.
    ///
    /// # Errors
    ///
    /// [`RegistryError::UnknownSystem`] if neither a name nor an alias.
    pub fn instantiate(&self, name_or_alias: &str) -> Result<Box<dyn System>, RegistryError> {
        let factory = self
            .resolve(name_or_alias)
            .and_then(|name| self.factories.get(name))
            .ok_or_else(|| RegistryError::UnknownSystem(name_or_alias.to_owned()))?;
        Ok(factory())
    }

    /// Returns `true` if the string is a registered name or alias.
    #[must_use]
    pub fn is_known(&self, name_or_alias: &str) -> bool {
        self.resolve(name_or_alias).is_some()
    }

    /// Canonical names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.factories.keys().map(String::as_str)
    }

    /// Aliases pointing at `name`, in sorted order.
    pub fn aliases_of<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.aliases
            .iter()
            .filter(move |(_, target)| target.as_str() == name)
            .map(|(alias, _)| alias.as_str())
    }

    /// Number of registered system types (aliases not counted).
    #[must_use]
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    /// Returns `true` if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    /// Creates a registry with every built-in system and its alias.
    #[must_use]
    pub fn with_builtin_systems() -> Self {
        let mut registry = Self::new();
        registry.register_builtin_systems();
        registry
    }

    fn register_builtin_systems(&mut self) {
        let builtins: [(&str, &str, SystemFactory); 1] = [(
            LinkPoseReporter::NAME,
            LinkPoseReporter::ALIAS,
            LinkPoseReporter::boxed,
        )];
        for (name, alias, factory) in builtins {
            if let Err(e) = self
                .register(name, factory)
                .and_then(|()| self.add_alias(alias, name))
            {
                tracing::error!(system = name, error = %e, "failed to register built-in system");
            }
        }
    }
}

impl fmt::Debug for SystemRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SystemRegistry")
            .field("systems", &self.factories.keys().collect::<Vec<_>>())
            .field("aliases", &self.aliases)
            .finish()
    }
}

/// Process-wide table of built-in systems, built on first use.
pub fn builtin() -> &'static SystemRegistry {
    static BUILTIN: OnceLock<SystemRegistry> = OnceLock::new();
    BUILTIN.get_or_init(SystemRegistry::with_builtin_systems)
}

// =============================================================================
// Tests
// =============================================================================
