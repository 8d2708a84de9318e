//! Core types and configuration for the deadwheel odometry library

use std::time::Instant;

/// Mounting direction of an encoder or inertial yaw axis.
///
/// Every tracking wheel (and the inertial yaw axis) can be installed in
/// either orientation relative to the robot's positive travel direction.
/// The correct value for each sensor is determined empirically on the
/// physical robot, not assumed.
///
/// # Example
/// ```
/// use deadwheel_odometry::{Direction, WheelGeometry};
///
/// let geometry = WheelGeometry {
///     strafe_direction: Direction::Reversed,
///     ..Default::default()
/// };
/// assert_eq!(geometry.strafe_direction.sign(), -1.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    /// Counts increase when the wheel travels in the positive direction
    #[default]
    Forward,
    /// Counts decrease when the wheel travels in the positive direction
    Reversed,
}

impl Direction {
    /// Sign multiplier applied to raw readings (+1 or -1)
    pub fn sign(self) -> f32 {
        match self {
            Direction::Forward => 1.0,
            Direction::Reversed => -1.0,
        }
    }
}

/// Robot pose on the field.
///
/// Position is in inches in the field frame; heading is in radians,
/// normalized to (-pi, pi], counter-clockwise positive. The default pose
/// is the origin with zero heading.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Pose {
    /// Field-frame X position in inches
    pub x: f32,
    /// Field-frame Y position in inches
    pub y: f32,
    /// Field-frame heading in radians, normalized to (-pi, pi]
    pub heading: f32,
}

impl Pose {
    /// Create a pose from field coordinates and heading
    pub fn new(x: f32, y: f32, heading: f32) -> Self {
        Self { x, y, heading }
    }
}

/// Tracking wheel geometry and gearing.
///
/// Describes the three dead wheels: two parallel drive-direction encoders
/// separated by `track_width`, and one perpendicular strafe encoder mounted
/// `lateral_wheel_offset` from the robot's rotation center. All linear
/// dimensions are in inches and must be positive; validation happens once
/// when the estimator is constructed.
///
/// # Example
/// ```
/// use deadwheel_odometry::{Direction, WheelGeometry};
///
/// let geometry = WheelGeometry {
///     ticks_per_revolution: 8192.0,
///     wheel_diameter: 2.0,
///     gear_ratio: 1.0,
///     track_width: 13.5,
///     lateral_wheel_offset: 7.5,
///     left_direction: Direction::Forward,
///     right_direction: Direction::Reversed,
///     strafe_direction: Direction::Forward,
/// };
/// assert!(geometry.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct WheelGeometry {
    /// Encoder counts per full wheel revolution
    pub ticks_per_revolution: f32,
    /// Tracking wheel diameter in inches
    pub wheel_diameter: f32,
    /// Gearing between the encoder shaft and the wheel (1.0 = direct drive)
    pub gear_ratio: f32,
    /// Distance between the left and right parallel encoders in inches
    pub track_width: f32,
    /// Distance of the strafe encoder from the rotation center in inches
    pub lateral_wheel_offset: f32,
    /// Mounting direction of the left encoder
    pub left_direction: Direction,
    /// Mounting direction of the right encoder
    pub right_direction: Direction,
    /// Mounting direction of the strafe encoder
    pub strafe_direction: Direction,
}

impl WheelGeometry {
    /// Check the geometry invariants (all dimensions positive).
    ///
    /// Called by [`PoseEstimator::new`](crate::PoseEstimator::new); exposed
    /// so configuration can be vetted before the estimator exists.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let dimensions = [
            ("ticks per revolution", self.ticks_per_revolution),
            ("wheel diameter", self.wheel_diameter),
            ("gear ratio", self.gear_ratio),
            ("track width", self.track_width),
            ("lateral wheel offset", self.lateral_wheel_offset),
        ];
        for (name, value) in dimensions {
            if value <= 0.0 || !value.is_finite() {
                return Err(ConfigError::NonPositiveDimension { name, value });
            }
        }
        Ok(())
    }
}

impl Default for WheelGeometry {
    fn default() -> Self {
        Self {
            ticks_per_revolution: 8192.0,
            wheel_diameter: 2.0,
            gear_ratio: 1.0,
            track_width: 13.5,
            lateral_wheel_offset: 7.5,
            left_direction: Direction::Forward,
            right_direction: Direction::Forward,
            strafe_direction: Direction::Forward,
        }
    }
}

/// Heading fusion settings.
///
/// Controls the complementary filter that blends the encoder-derived
/// rotation with the absolute inertial yaw reading. The weight is the
/// per-cycle trust placed in the inertial reading: 0 reproduces pure
/// encoder dead reckoning, 1 makes the heading track the aligned inertial
/// yaw exactly. Small weights correct long-run encoder drift without
/// surrendering the encoders' low-latency response.
///
/// # Example
/// ```
/// use deadwheel_odometry::FusionConfig;
///
/// let config = FusionConfig {
///     inertial_weight: 0.1, // trust the inertial sensor more
///     ..Default::default()
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct FusionConfig {
    /// Whether inertial heading fusion is enabled
    pub use_inertial: bool,
    /// Per-cycle complementary filter weight on the inertial reading, in [0, 1]
    pub inertial_weight: f32,
    /// Sign of the inertial yaw axis relative to counter-clockwise positive
    pub inertial_yaw_sign: Direction,
    /// Upper bound on the update interval in seconds.
    ///
    /// A stalled control loop would otherwise be misread as a long, fast
    /// motion in the rate diagnostics. The clamp bounds only rate-derived
    /// quantities; distance integration is tick-delta based and unaffected
    /// by the interval length.
    pub max_time_step: f32,
}

impl FusionConfig {
    /// Check the fusion invariants (weight in [0, 1], positive time step)
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.inertial_weight) || !self.inertial_weight.is_finite() {
            return Err(ConfigError::InertialWeightOutOfRange(self.inertial_weight));
        }
        if self.max_time_step <= 0.0 || !self.max_time_step.is_finite() {
            return Err(ConfigError::NonPositiveTimeStep(self.max_time_step));
        }
        Ok(())
    }
}

impl Default for FusionConfig {
    fn default() -> Self {
        Self {
            use_inertial: true,
            inertial_weight: 0.05,
            inertial_yaw_sign: Direction::Forward,
            max_time_step: 0.1,
        }
    }
}

/// One cycle of raw sensor readings.
///
/// Tick counters are cumulative encoder positions, monotonic within a run;
/// the estimator differences consecutive samples internally. The inertial
/// yaw is an absolute angle in radians with an arbitrary zero, or `None`
/// when the sensor is unavailable this cycle. The timestamp must come from
/// a monotonic clock.
#[derive(Debug, Clone, Copy)]
pub struct RawSample {
    /// Cumulative left encoder ticks
    pub left_ticks: i64,
    /// Cumulative right encoder ticks
    pub right_ticks: i64,
    /// Cumulative strafe encoder ticks
    pub strafe_ticks: i64,
    /// Absolute inertial yaw in radians, if available this cycle
    pub inertial_yaw: Option<f32>,
    /// Monotonic clock reading for this cycle
    pub timestamp: Instant,
}

impl RawSample {
    /// Bundle one cycle of readings
    pub fn new(
        left_ticks: i64,
        right_ticks: i64,
        strafe_ticks: i64,
        inertial_yaw: Option<f32>,
        timestamp: Instant,
    ) -> Self {
        Self {
            left_ticks,
            right_ticks,
            strafe_ticks,
            inertial_yaw,
            timestamp,
        }
    }
}

/// Rate diagnostics derived from the last update cycle.
///
/// These are the quantities bounded by
/// [`FusionConfig::max_time_step`]: they divide by the clamped update
/// interval and are intended for operator-facing telemetry, not for
/// control of the estimate itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct EstimatorInternalStates {
    /// Robot-frame forward velocity in inches per second
    pub forward_velocity: f32,
    /// Robot-frame lateral velocity in inches per second
    pub lateral_velocity: f32,
    /// Yaw rate in radians per second
    pub yaw_rate: f32,
    /// Angle between the encoder heading estimate and the aligned inertial
    /// yaw in radians, zero when no inertial reading was fused.
    ///
    /// A persistently growing value indicates encoder drift (or a wheel
    /// losing contact); calling layers surface it as an operator warning.
    pub heading_disagreement: f32,
}

/// Estimator status flags.
///
/// # Example
/// ```
/// use deadwheel_odometry::{FusionConfig, Pose, PoseEstimator, WheelGeometry};
///
/// let estimator =
///     PoseEstimator::new(WheelGeometry::default(), FusionConfig::default(), Pose::default())
///         .unwrap();
/// assert!(!estimator.flags().tracking); // unprimed until the first update
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct EstimatorFlags {
    /// Whether a previous sample exists (the first update primes, it never
    /// produces a displacement)
    pub tracking: bool,
    /// Whether the inertial zero-offset has been captured since the last reset
    pub inertial_aligned: bool,
    /// Whether the last update expected an inertial reading and got none
    pub inertial_missing: bool,
    /// Whether the last update's interval exceeded the configured maximum
    pub time_step_clamped: bool,
}

/// Invalid static configuration, rejected once at estimator construction.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} must be positive, got {value}")]
    NonPositiveDimension { name: &'static str, value: f32 },

    #[error("inertial weight must be within [0, 1], got {0}")]
    InertialWeightOutOfRange(f32),

    #[error("max time step must be positive, got {0}")]
    NonPositiveTimeStep(f32),
}
