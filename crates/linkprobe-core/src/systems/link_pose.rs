//! Link pose reporter.
//!
//! Attaches to a model, resolves the link named by the `link_name`
//! parameter once at configure time, and reports that link's world pose
//! after every step.
//!
//! # Parameters
//!
//! | Key | Type | Required |
//! |-----|------|----------|
//! | `link_name` | string | yes |
//!
//! # Failure handling
//!
//! Configuration problems (missing or non-string `link_name`, not attached
//! to a model, no such link) are logged and leave the reporter disabled.
//! A disabled or never-configured reporter ignores post-update calls. If the
//! link is removed while the simulation runs, the reporter logs a warning
//! once and disables itself.

use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::config::SystemConfig;
use crate::entity::EntityId;
use crate::error::ConfigError;
use crate::events::EventManager;
use crate::model::Model;
use crate::sink::{PoseSample, PoseSink, StdoutSink};
use crate::store::EntityStore;
use crate::system::{Configurable, PostUpdateObservable, System, UpdateInfo};
use crate::world_view::WorldView;

/// Parameter naming the link to report.
pub const LINK_NAME_PARAM: &str = "link_name";

/// Why the reporter could not be configured, or stopped reporting.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReporterError {
    /// The `link_name` parameter is absent.
    #[error("missing required parameter 'link_name'")]
    MissingLinkName,

    /// The `link_name` parameter is not a string.
    #[error("parameter 'link_name' is malformed: {0}")]
    MalformedLinkName(String),

    /// The reporter is attached to something other than a live model.
    #[error("entity {0} is not a model")]
    NotAModel(EntityId),

    /// The model has no link with the requested name.
    #[error("model '{model}' has no link named '{link}'")]
    LinkNotFound {
        /// Name of the model searched.
        model: String,
        /// The requested link name.
        link: String,
    },

    /// The link resolved at configure time is gone.
    #[error("link '{link}' ({id}) no longer exists")]
    LinkRemoved {
        /// Name the link was resolved by.
        link: String,
        /// The link's former id.
        id: EntityId,
    },
}

/// Lifecycle of a reporter.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ReporterState {
    /// Configure has not been called.
    #[default]
    Unconfigured,
    /// Bound to a link.
    Configured {
        /// The resolved link.
        link: EntityId,
        /// The link's name, for output.
        link_name: String,
    },
    /// Configuration failed or the link vanished; updates are ignored.
    Disabled(ReporterError),
}

/// Reports one link's world pose after every step.
pub struct LinkPoseReporter {
    state: ReporterState,
    sink: Box<dyn PoseSink>,
}

impl LinkPoseReporter {
    /// Registered system name.
    pub const NAME: &'static str = "link_pose_reporter";

    /// Fully-qualified alias accepted by the registry.
    pub const ALIAS: &'static str = "linkprobe::systems::LinkPoseReporter";

    /// Creates an unconfigured reporter printing to stdout.
    #[must_use]
    pub fn new() -> Self {
        Self::with_sink(StdoutSink::new())
    }

    /// Creates an unconfigured reporter writing to `sink`.
    #[must_use]
    pub fn with_sink(sink: impl PoseSink + 'static) -> Self {
        Self {
            state: ReporterState::Unconfigured,
            sink: Box::new(sink),
        }
    }

    /// Registry factory.
    #[must_use]
    pub fn boxed() -> Box<dyn System> {
        Box::new(Self::new())
    }

    /// Returns the current lifecycle state.
    #[must_use]
    pub fn state(&self) -> &ReporterState {
        &self.state
    }

    /// Returns the bound link, if configured.
    #[must_use]
    pub fn link(&self) -> Option<EntityId> {
        match &self.state {
            ReporterState::Configured { link, .. } => Some(*link),
            _ => None,
        }
    }

    /// Returns `true` if bound to a link.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        matches!(self.state, ReporterState::Configured { .. })
    }

    fn resolve(
        entity: EntityId,
        config: &SystemConfig,
        store: &EntityStore,
    ) -> Result<(EntityId, String), ReporterError> {
        let link_name = config.get_str(LINK_NAME_PARAM).map_err(|e| match e {
            ConfigError::MissingField(_) => ReporterError::MissingLinkName,
            other => ReporterError::MalformedLinkName(other.to_string()),
        })?;

        let model = Model::new(entity);
        let model_name = model
            .name(store)
            .ok_or(ReporterError::NotAModel(entity))?;

        let link = model
            .link_by_name(store, link_name)
            .ok_or_else(|| ReporterError::LinkNotFound {
                model: model_name.to_owned(),
                link: link_name.to_owned(),
            })?;

        Ok((link, link_name.to_owned()))
    }
}

impl Default for LinkPoseReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for LinkPoseReporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LinkPoseReporter")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl System for LinkPoseReporter {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn as_configurable(&mut self) -> Option<&mut dyn Configurable> {
        Some(self)
    }

    fn as_post_update_observable(&mut self) -> Option<&mut dyn PostUpdateObservable> {
        Some(self)
    }
}

impl Configurable for LinkPoseReporter {
    fn configure(
        &mut self,
        entity: EntityId,
        config: &SystemConfig,
        store: &mut EntityStore,
        _events: &mut EventManager,
    ) {
        self.state = match Self::resolve(entity, config, store) {
            Ok((link, link_name)) => {
                info!(%entity, %link, link_name = %link_name, "link pose reporter bound");
                ReporterState::Configured { link, link_name }
            }
            Err(e) => {
                error!(%entity, error = %e, "link pose reporter disabled");
                ReporterState::Disabled(e)
            }
        };
    }
}

impl PostUpdateObservable for LinkPoseReporter {
    fn post_update(&mut self, info: &UpdateInfo, view: &WorldView<'_>) {
        let ReporterState::Configured { link, link_name } = &self.state else {
            return;
        };

        match view.world_pose(*link) {
            Ok(pose) => {
                debug!(
                    iteration = info.iterations,
                    link = %link_name,
                    %pose,
                    "link pose"
                );
                self.sink.record(&PoseSample {
                    iteration: info.iterations,
                    sim_time: info.sim_time,
                    link: *link,
                    link_name: link_name.clone(),
                    pose,
                });
            }
            Err(e) => {
                let reason = ReporterError::LinkRemoved {
                    link: link_name.clone(),
                    id: *link,
                };
                warn!(error = %e, "{reason}; link pose reporter disabled");
                self.state = ReporterState::Disabled(reason);
            }
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
