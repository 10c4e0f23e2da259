//! World builders for crate-level tests.

use std::time::Duration;

use glam::DVec3;

use crate::config::SystemConfig;
use crate::entity::{EntityId, LinkComponents, ModelComponents};
use crate::pose::Pose;
use crate::runner::SimulationRunner;
use crate::sink::RecordingSink;
use crate::systems::{LinkPoseReporter, LINK_NAME_PARAM};

/// Step used by every helper runner.
pub const TEST_DT: Duration = Duration::from_millis(1);

/// Ids of the entities in [`arm_world`].
#[derive(Debug, Clone, Copy)]
pub struct ArmIds {
    pub model: EntityId,
    pub base: EntityId,
    pub tip: EntityId,
}

/// A static model `arm` at `(0, 0, 1)` with links `base` at the model origin
/// and `tip` at `(0.5, 0, 0)` rotated a quarter turn in yaw.
pub fn arm_world() -> (SimulationRunner, ArmIds) {
    let mut runner = SimulationRunner::new("default", TEST_DT);
    let world = runner.world_entity();
    let store = runner.store_mut();

    let model = store
        .spawn_model(
            world,
            "arm",
            ModelComponents {
                pose: Pose::from_translation(DVec3::new(0.0, 0.0, 1.0)),
                is_static: true,
            },
        )
        .unwrap();
    let base = store
        .spawn_link(model, "base", LinkComponents::default())
        .unwrap();
    let tip = store
        .spawn_link(
            model,
            "tip",
            LinkComponents::at(Pose::from_xyz_rpy(
                0.5,
                0.0,
                0.0,
                0.0,
                0.0,
                std::f64::consts::FRAC_PI_2,
            )),
        )
        .unwrap();

    (runner, ArmIds { model, base, tip })
}

/// A non-static model `cart` with one link `body` moving at `velocity`.
pub fn moving_world(velocity: DVec3) -> (SimulationRunner, EntityId, EntityId) {
    let mut runner = SimulationRunner::new("default", TEST_DT);
    let world = runner.world_entity();
    let store = runner.store_mut();

    let model = store
        .spawn_model(world, "cart", ModelComponents::default())
        .unwrap();
    let body = store
        .spawn_link(
            model,
            "body",
            LinkComponents {
                linear_velocity: velocity,
                ..LinkComponents::default()
            },
        )
        .unwrap();

    (runner, model, body)
}

/// Attaches a reporter with a recording sink to `entity`.
pub fn attach_reporter(
    runner: &mut SimulationRunner,
    entity: EntityId,
    config: &SystemConfig,
) -> RecordingSink {
    let sink = RecordingSink::new();
    runner
        .add_system(
            entity,
            Box::new(LinkPoseReporter::with_sink(sink.clone())),
            config,
        )
        .unwrap();
    sink
}

/// Reporter configuration naming `link`.
pub fn link_config(link: &str) -> SystemConfig {
    SystemConfig::new().with(LINK_NAME_PARAM, link)
}
