//! Trajectory simulation demo
//!
//! Drives the estimator through a synthetic course (two straight legs
//! joined by a sweeping arc), synthesizing quantized encoder ticks and a
//! noisy inertial yaw from the commanded motion, then renders the
//! estimated path to a PNG and prints the final pose with diagnostics.
//!
//! Run with: `cargo run --example simulate`

use std::error::Error;
use std::time::{Duration, Instant};

use deadwheel_odometry::units::inches_per_tick;
use deadwheel_odometry::{FusionConfig, Pose, PoseEstimator, RawSample, WheelGeometry};
use plotters::prelude::*;
use rand::prelude::*;
use rand_pcg::Pcg64;
use tracing_subscriber::EnvFilter;

const CYCLE: Duration = Duration::from_millis(20); // 50 Hz control loop

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let geometry = WheelGeometry::default();
    let config = FusionConfig {
        inertial_weight: 0.08,
        ..Default::default()
    };
    let mut estimator = PoseEstimator::new(geometry, config, Pose::default())?;

    // Commanded robot-frame motion per cycle: (forward, lateral, rotation)
    let mut course: Vec<(f32, f32, f32)> = Vec::new();
    course.extend(std::iter::repeat_n((0.6, 0.0, 0.0), 80)); // 48 in straight
    course.extend(std::iter::repeat_n(
        (0.5, 0.0, std::f32::consts::PI / 120.0),
        120,
    )); // half circle
    course.extend(std::iter::repeat_n((0.6, 0.0, 0.0), 80)); // straight back

    let mut rng = Pcg64::seed_from_u64(2026);
    let ipt = inches_per_tick(&geometry);
    let start = Instant::now();

    // Synthesized sensor state
    let (mut left, mut right, mut strafe) = (0.0_f32, 0.0_f32, 0.0_f32);
    let mut true_heading = 0.0_f32;
    let inertial_zero = rng.random_range(-3.0..3.0); // arbitrary sensor zero

    estimator.update(RawSample::new(0, 0, 0, Some(inertial_zero), start));

    let mut path = Vec::with_capacity(course.len());
    for (cycle, &(forward, lateral, rotation)) in course.iter().enumerate() {
        let half_track = geometry.track_width / 2.0;
        left += forward - rotation * half_track;
        right += forward + rotation * half_track;
        strafe += lateral + rotation * geometry.lateral_wheel_offset;
        true_heading += rotation;

        // The inertial sensor sees the true heading plus its zero and a
        // little noise; one reading in twenty drops out
        let yaw = if cycle % 20 == 19 {
            None
        } else {
            Some(true_heading + inertial_zero + rng.random_range(-0.002..0.002))
        };

        let pose = estimator.update(RawSample::new(
            (left / ipt).round() as i64,
            (right / ipt).round() as i64,
            (strafe / ipt).round() as i64,
            yaw,
            start + CYCLE * (cycle as u32 + 1),
        ));
        path.push((pose.x, pose.y));
    }

    let pose = estimator.pose();
    let states = estimator.internal_states();
    println!(
        "Final pose: x = {:.2} in, y = {:.2} in, heading = {:.1} deg",
        pose.x,
        pose.y,
        pose.heading.to_degrees()
    );
    println!(
        "Last cycle: {:.1} in/s forward, {:.1} deg/s yaw, {:.2} deg heading disagreement",
        states.forward_velocity,
        states.yaw_rate.to_degrees(),
        states.heading_disagreement.to_degrees()
    );

    render(&path, "trajectory.png")?;
    println!("Wrote trajectory.png");

    Ok(())
}

fn render(path: &[(f32, f32)], file: &str) -> Result<(), Box<dyn Error>> {
    let root = BitMapBackend::new(file, (800, 800)).into_drawing_area();
    root.fill(&WHITE)?;

    let (min_x, max_x) = bounds(path.iter().map(|p| p.0));
    let (min_y, max_y) = bounds(path.iter().map(|p| p.1));

    let mut chart = ChartBuilder::on(&root)
        .caption("Estimated trajectory", ("sans-serif", 30))
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(min_x..max_x, min_y..max_y)?;

    chart
        .configure_mesh()
        .x_desc("x (in)")
        .y_desc("y (in)")
        .draw()?;

    chart.draw_series(LineSeries::new(path.iter().copied(), &BLUE))?;
    root.present()?;

    Ok(())
}

fn bounds(values: impl Iterator<Item = f32>) -> (f32, f32) {
    let (mut min, mut max) = (f32::MAX, f32::MIN);
    for v in values {
        min = min.min(v);
        max = max.max(v);
    }
    (min - 5.0, max + 5.0)
}
