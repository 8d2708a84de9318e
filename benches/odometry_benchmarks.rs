use std::time::{Duration, Instant};

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use deadwheel_odometry::{FusionConfig, Pose, PoseEstimator, RawSample, WheelGeometry};
use rand::prelude::*;
use rand_pcg::Pcg64;

// Pre-generated sample stream to eliminate RNG overhead during benchmarks
struct PreGeneratedData {
    samples: Vec<RawSample>,
    index: usize,
}

impl PreGeneratedData {
    fn new(count: usize, seed: u64) -> Self {
        let mut rng = Pcg64::seed_from_u64(seed);
        let start = Instant::now();
        let mut samples = Vec::with_capacity(count);
        let mut ticks = (0_i64, 0_i64, 0_i64);

        for i in 0..count {
            // Wander around the field with mild per-cycle tick noise
            let phase = i as f32 * 0.05;
            ticks.0 += (300.0 * phase.sin()) as i64 + rng.random_range(-20..20);
            ticks.1 += (300.0 * (phase * 1.3).cos()) as i64 + rng.random_range(-20..20);
            ticks.2 += (100.0 * (phase * 0.7).sin()) as i64 + rng.random_range(-20..20);

            let yaw = 0.4 * phase.sin() + rng.random_range(-0.01..0.01);
            samples.push(RawSample::new(
                ticks.0,
                ticks.1,
                ticks.2,
                Some(yaw),
                start + Duration::from_millis(10 * i as u64),
            ));
        }

        Self { samples, index: 0 }
    }

    fn next(&mut self) -> RawSample {
        let sample = self.samples[self.index];
        self.index = (self.index + 1) % self.samples.len();
        sample
    }
}

fn estimator() -> PoseEstimator {
    PoseEstimator::new(
        WheelGeometry::default(),
        FusionConfig::default(),
        Pose::default(),
    )
    .expect("default configuration is valid")
}

/// Benchmark the steady-state update path with inertial fusion
fn bench_update_steady_state(c: &mut Criterion) {
    let mut est = estimator();
    let mut data = PreGeneratedData::new(4096, 42);

    // Prime so every benchmarked call takes the tracking path
    est.update(data.next());

    c.bench_function("odometry_update_steady_state", |b| {
        b.iter(|| black_box(est.update(black_box(data.next()))))
    });
}

/// Benchmark the encoder-only update path (no inertial reading)
fn bench_update_encoder_only(c: &mut Criterion) {
    let mut est = PoseEstimator::new(
        WheelGeometry::default(),
        FusionConfig {
            use_inertial: false,
            ..Default::default()
        },
        Pose::default(),
    )
    .expect("default configuration is valid");
    let mut data = PreGeneratedData::new(4096, 42);
    est.update(data.next());

    c.bench_function("odometry_update_encoder_only", |b| {
        b.iter(|| black_box(est.update(black_box(data.next()))))
    });
}

/// Benchmark the priming path (fresh estimator, first sample)
fn bench_update_priming(c: &mut Criterion) {
    let mut data = PreGeneratedData::new(4096, 7);

    c.bench_function("odometry_update_priming", |b| {
        b.iter(|| {
            let mut est = estimator();
            black_box(est.update(black_box(data.next())))
        })
    });
}

/// Benchmark a full control-loop burst of 100 cycles
fn bench_batch_updates(c: &mut Criterion) {
    let mut est = estimator();
    let mut data = PreGeneratedData::new(4096, 99);
    est.update(data.next());

    c.bench_function("odometry_batch_100_updates", |b| {
        b.iter(|| {
            for _ in 0..100 {
                black_box(est.update(black_box(data.next())));
            }
        })
    });
}

/// Benchmark estimator construction and validation
fn bench_estimator_new(c: &mut Criterion) {
    c.bench_function("odometry_estimator_new", |b| b.iter(|| black_box(estimator())));
}

/// Benchmark the pose snapshot accessor
fn bench_pose_access(c: &mut Criterion) {
    let est = estimator();

    c.bench_function("odometry_pose", |b| b.iter(|| black_box(est.pose())));
}

criterion_group!(
    benches,
    bench_update_steady_state,
    bench_update_encoder_only,
    bench_update_priming,
    bench_batch_updates,
    bench_estimator_new,
    bench_pose_access
);

criterion_main!(benches);
