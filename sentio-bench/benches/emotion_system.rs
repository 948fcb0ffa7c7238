//! sentio benchmark suite.
//!
//! Frame-budget targets for a 500-entity crowd:
//!   stimulus_resolution_single ....... < 5μs
//!   decay_pass_500_entities .......... < 100μs
//!   influence_pass_100_entities ...... < 1ms
//!   full_frame_500_entities .......... < 2ms

use criterion::{Criterion, black_box, criterion_group, criterion_main};

use sentio_core::config::SentioConfig;
use sentio_core::emotion::Emotion;
use sentio_core::influence::NullIndex;
use sentio_core::sim::Simulation;
use sentio_core::stimulus::{EmotionEffect, Stimulus, StimulusKind};
use sentio_core::types::{EmotionProfile, EntityId, Position};
use sentio_game::spatial::UniformGrid;

const FRAME: f32 = 1.0 / 60.0;

/// Build a simulation with `count` entities scattered on a line, every
/// third one already in a mood.
fn crowd(count: usize) -> (Simulation, Vec<EntityId>) {
    let mut sim = Simulation::new(SentioConfig::default());
    let mut ids = Vec::with_capacity(count);
    for i in 0..count {
        let id = EntityId::new();
        sim.register_entity(
            id,
            EmotionProfile::default(),
            Position::new(i as f32 * 2.0, 0.0, 0.0),
        );
        ids.push(id);
    }
    for (i, &id) in ids.iter().enumerate() {
        if i % 3 == 0 {
            sim.submit(Stimulus::new(
                id,
                StimulusKind::Direct,
                EmotionEffect::new(Emotion::HAPPY, 0.8),
            ));
        }
    }
    sim.tick(FRAME, &NullIndex);
    (sim, ids)
}

/// Benchmark: resolving a single stimulus (target: < 5μs).
fn bench_stimulus_resolution(c: &mut Criterion) {
    let (mut sim, ids) = crowd(10);
    let target = ids[1];

    c.bench_function("stimulus_resolution_single", |b| {
        b.iter(|| {
            let stimulus = Stimulus::new(
                black_box(target),
                StimulusKind::Direct,
                EmotionEffect::new(Emotion::CURIOUS, 0.4),
            );
            black_box(sim.process_stimulus(&stimulus));
        });
    });
}

/// Benchmark: whole-population decay for 500 entities (target: < 100μs).
fn bench_decay_pass(c: &mut Criterion) {
    let (mut sim, _) = crowd(500);

    c.bench_function("decay_pass_500_entities", |b| {
        b.iter(|| {
            // NullIndex keeps influence out of the measurement; the tick is
            // decay + bookkeeping only once the queue is empty.
            sim.tick(black_box(FRAME), &NullIndex);
        });
    });
}

/// Benchmark: one influence pass over 100 clustered entities (target: < 1ms).
fn bench_influence_pass(c: &mut Criterion) {
    let (mut sim, ids) = crowd(100);
    for pair in ids.windows(2) {
        sim.record_interaction(pair[0], pair[1], 0.6, 0.4);
    }
    let mut grid = UniformGrid::new(8.0);
    grid.rebuild(sim.positions());
    let interval = sim.config().influence.interval_ticks;

    c.bench_function("influence_pass_100_entities", |b| {
        b.iter(|| {
            // A whole interval in one tick forces the pass to run each
            // iteration.
            sim.tick(black_box(interval as f32 / 60.0), &grid);
        });
    });
}

/// Benchmark: a full frame for 500 entities with spatial data (target: < 2ms).
fn bench_full_frame(c: &mut Criterion) {
    let (mut sim, ids) = crowd(500);
    for pair in ids.windows(2) {
        sim.record_interaction(pair[0], pair[1], 0.4, 0.2);
    }
    let mut grid = UniformGrid::new(8.0);
    grid.rebuild(sim.positions());

    c.bench_function("full_frame_500_entities", |b| {
        b.iter(|| {
            for &id in ids.iter().take(8) {
                sim.submit(Stimulus::new(
                    id,
                    StimulusKind::Direct,
                    EmotionEffect::new(Emotion::SURPRISED, 0.5),
                ));
            }
            sim.tick(black_box(FRAME), &grid);
        });
    });
}

criterion_group!(
    benches,
    bench_stimulus_resolution,
    bench_decay_pass,
    bench_influence_pass,
    bench_full_frame,
);
criterion_main!(benches);
