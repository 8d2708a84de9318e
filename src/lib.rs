//! Deadwheel odometry - three-wheel dead-reckoning pose estimation for
//! mobile robots on a flat field.
//!
//! The estimator differences three encoder tick counters each control
//! cycle (two parallel drive-direction wheels and one perpendicular strafe
//! wheel), solves the differential/strafe kinematics for a robot-frame
//! displacement, blends the encoder-derived rotation with an absolute
//! inertial yaw reading through a complementary filter, and integrates the
//! displacement into a field-frame pose at the midpoint heading.
//!
//! # Features
//!
//! - Tick-delta distance integration, immune to control-loop jitter
//! - Complementary heading fusion with configurable inertial weight
//! - Automatic inertial-zero alignment, recaptured after every reset
//! - Arc compensation for the offset strafe wheel
//! - Per-wheel direction signs as configuration, never hard-coded
//! - Graceful degradation to encoder-only heading when the inertial
//!   sensor is unavailable
//! - No I/O and no blocking inside the core: all sensor values are pushed
//!   in by the caller once per cycle
//!
//! # Quick Start
//!
//! ```rust
//! use std::time::{Duration, Instant};
//!
//! use deadwheel_odometry::{FusionConfig, Pose, PoseEstimator, RawSample, WheelGeometry};
//!
//! let mut estimator = PoseEstimator::new(
//!     WheelGeometry::default(),
//!     FusionConfig::default(),
//!     Pose::default(),
//! )
//! .unwrap();
//!
//! // First call primes the estimator; no displacement yet
//! let start = Instant::now();
//! estimator.update(RawSample::new(0, 0, 0, None, start));
//!
//! // Half a wheel revolution on both drive wheels: pi inches forward
//! let pose = estimator.update(RawSample::new(
//!     4096,
//!     4096,
//!     0,
//!     None,
//!     start + Duration::from_millis(20),
//! ));
//! assert!((pose.x - std::f32::consts::PI).abs() < 1e-3);
//! ```

pub mod alignment;
mod estimator;
pub mod kinematics;
pub mod math;
mod types;
pub mod units;

// Re-export all public types and functions
pub use alignment::YawAlignment;
pub use estimator::PoseEstimator;
pub use kinematics::{LocalDisplacement, solve_displacement};
pub use math::{normalize_angle, rotate_to_field, unwrap_near};
pub use types::*;
