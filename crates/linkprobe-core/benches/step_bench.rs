use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use glam::DVec3;
use linkprobe_core::config::SystemConfig;
use linkprobe_core::entity::{EntityId, LinkComponents, ModelComponents};
use linkprobe_core::pose::Pose;
use linkprobe_core::runner::SimulationRunner;
use linkprobe_core::sink::RecordingSink;
use linkprobe_core::systems::{LinkPoseReporter, LINK_NAME_PARAM};

/// A chain of `depth` nested models, each with one moving link.
fn build_chain(depth: usize) -> (SimulationRunner, Vec<EntityId>) {
    let mut runner = SimulationRunner::new("bench", Duration::from_millis(1));
    let mut parent = runner.world_entity();
    let mut models = Vec::with_capacity(depth);

    for i in 0..depth {
        let store = runner.store_mut();
        let model = store
            .spawn_model(
                parent,
                format!("segment_{i}"),
                ModelComponents::at(Pose::from_xyz_rpy(0.1, 0.0, 0.0, 0.0, 0.0, 0.05)),
            )
            .unwrap();
        store
            .spawn_link(
                model,
                "link",
                LinkComponents {
                    angular_velocity: DVec3::new(0.0, 0.0, 0.5),
                    ..LinkComponents::default()
                },
            )
            .unwrap();
        models.push(model);
        parent = model;
    }

    (runner, models)
}

fn bench_step_no_systems(c: &mut Criterion) {
    let (mut runner, _) = build_chain(16);

    c.bench_function("step_no_systems", |b| {
        b.iter(|| black_box(runner.step()))
    });
}

fn bench_step_with_reporters(c: &mut Criterion) {
    let (mut runner, models) = build_chain(16);
    let config = SystemConfig::new().with(LINK_NAME_PARAM, "link");
    for model in models {
        // Recording sink keeps the benchmark off stdout
        let reporter = LinkPoseReporter::with_sink(RecordingSink::new());
        runner.add_system(model, Box::new(reporter), &config).unwrap();
    }

    c.bench_function("step_with_reporters", |b| {
        b.iter(|| black_box(runner.step()))
    });
}

fn bench_world_pose_deep(c: &mut Criterion) {
    let (runner, models) = build_chain(64);
    let deepest = models[models.len() - 1];
    let link = runner.store().children(deepest).next().unwrap();

    c.bench_function("world_pose_depth_64", |b| {
        b.iter(|| black_box(runner.store().world_pose(black_box(link))))
    });
}

criterion_group!(
    benches,
    bench_step_no_systems,
    bench_step_with_reporters,
    bench_world_pose_deep
);
criterion_main!(benches);
