//! Heading fusion and pose integration for the deadwheel odometry library

use nalgebra::Vector2;
use tracing::{debug, warn};

use crate::alignment::YawAlignment;
use crate::kinematics::solve_displacement;
use crate::math::{normalize_angle, rotate_to_field};
use crate::types::{
    ConfigError, EstimatorFlags, EstimatorInternalStates, FusionConfig, Pose, RawSample,
    WheelGeometry,
};
use crate::units::ticks_to_inches;

/// Dead-reckoning pose estimator.
///
/// Maintains the field-frame pose by differencing encoder tick counters
/// each cycle, solving the three-wheel kinematics for a robot-frame
/// displacement, blending the encoder-derived rotation with the absolute
/// inertial yaw through a complementary filter, and rotating the
/// displacement into the field frame at the midpoint heading.
///
/// The estimator is UNPRIMED until the first [`update`](Self::update)
/// call, which records the sample and returns the initial pose unchanged;
/// every later call produces one pose increment. [`reset`](Self::reset)
/// returns to UNPRIMED. All sensor reads happen outside the estimator:
/// `update` never blocks and performs no I/O, so one caller thread drives
/// it at the control-loop rate and no locking is needed.
pub struct PoseEstimator {
    /// Tracking wheel geometry
    geometry: WheelGeometry,
    /// Fusion settings
    config: FusionConfig,
    /// Field-frame X accumulator in inches
    x: f32,
    /// Field-frame Y accumulator in inches
    y: f32,
    /// Unbounded heading accumulator in radians
    heading: f32,
    /// Previous cycle's sample; `None` while unprimed
    previous: Option<RawSample>,
    /// Inertial yaw zero alignment
    alignment: YawAlignment,
    /// Last-cycle rate diagnostics
    states: EstimatorInternalStates,
    /// Whether the last update expected an inertial reading and got none
    inertial_missing: bool,
    /// Whether the last update's interval exceeded `max_time_step`
    time_step_clamped: bool,
}

impl PoseEstimator {
    /// Create an estimator from validated configuration.
    ///
    /// Fails with [`ConfigError`] if any geometry dimension is
    /// non-positive or the fusion settings are out of range; per-cycle
    /// input is never a construction concern.
    pub fn new(
        geometry: WheelGeometry,
        config: FusionConfig,
        initial_pose: Pose,
    ) -> Result<Self, ConfigError> {
        geometry.validate()?;
        config.validate()?;

        Ok(Self {
            geometry,
            config,
            x: initial_pose.x,
            y: initial_pose.y,
            heading: initial_pose.heading,
            previous: None,
            alignment: YawAlignment::new(config.inertial_yaw_sign),
            states: EstimatorInternalStates::default(),
            inertial_missing: false,
            time_step_clamped: false,
        })
    }

    /// Advance the estimate by one sensor cycle and return the new pose.
    ///
    /// The first call after construction or reset primes the estimator
    /// and returns the current pose unchanged; there is no valid delta
    /// yet. Degraded input never fails: a missing inertial reading falls
    /// back to encoder-only heading, and a stalled interval is clamped so
    /// it cannot distort the rate diagnostics. Distance integration is
    /// tick-delta based and independent of the interval length.
    pub fn update(&mut self, sample: RawSample) -> Pose {
        let Some(previous) = self.previous else {
            self.previous = Some(sample);
            return self.pose();
        };

        // Interval clamp protects only rate-derived quantities
        let raw_dt = sample
            .timestamp
            .saturating_duration_since(previous.timestamp)
            .as_secs_f32();
        let dt = raw_dt.min(self.config.max_time_step);
        self.time_step_clamped = raw_dt > self.config.max_time_step;
        if self.time_step_clamped {
            warn!(
                raw_dt,
                max_time_step = self.config.max_time_step,
                "control loop stalled, clamping time step"
            );
        }

        let left = ticks_to_inches(
            sample.left_ticks - previous.left_ticks,
            self.geometry.left_direction,
            &self.geometry,
        );
        let right = ticks_to_inches(
            sample.right_ticks - previous.right_ticks,
            self.geometry.right_direction,
            &self.geometry,
        );
        let strafe = ticks_to_inches(
            sample.strafe_ticks - previous.strafe_ticks,
            self.geometry.strafe_direction,
            &self.geometry,
        );

        let local = solve_displacement(left, right, strafe, &self.geometry);
        let encoder_heading = self.heading + local.rotation;

        self.inertial_missing = false;
        let fused_heading = match sample.inertial_yaw {
            Some(raw_yaw) if self.config.use_inertial => {
                let aligned = self.alignment.align(raw_yaw, encoder_heading);
                self.states.heading_disagreement = aligned - encoder_heading;
                let weight = self.config.inertial_weight;
                (1.0 - weight) * encoder_heading + weight * aligned
            }
            _ => {
                if self.config.use_inertial {
                    self.inertial_missing = true;
                    debug!("inertial reading unavailable, using encoder heading");
                }
                self.states.heading_disagreement = 0.0;
                encoder_heading
            }
        };

        // Midpoint heading halves the integration error of a
        // rotate-while-translate cycle compared to either endpoint.
        let midpoint_heading = 0.5 * (self.heading + fused_heading);
        let field = rotate_to_field(Vector2::new(local.forward, local.lateral), midpoint_heading);

        self.x += field.x;
        self.y += field.y;
        self.heading = fused_heading;

        if dt > 0.0 {
            self.states.forward_velocity = local.forward / dt;
            self.states.lateral_velocity = local.lateral / dt;
            self.states.yaw_rate = local.rotation / dt;
        } else {
            self.states.forward_velocity = 0.0;
            self.states.lateral_velocity = 0.0;
            self.states.yaw_rate = 0.0;
        }

        self.previous = Some(sample);
        self.pose()
    }

    /// Return the estimator to UNPRIMED at the given pose.
    ///
    /// Clears the previous sample and the inertial alignment offset (it
    /// is recaptured at the next inertial reading) and zeroes the rate
    /// diagnostics. The first `update` after a reset is a priming call.
    pub fn reset(&mut self, pose: Pose) {
        self.x = pose.x;
        self.y = pose.y;
        self.heading = pose.heading;
        self.previous = None;
        self.alignment.reset();
        self.states = EstimatorInternalStates::default();
        self.inertial_missing = false;
        self.time_step_clamped = false;
    }

    /// Read-only snapshot of the current pose, heading normalized to
    /// (-pi, pi]
    pub fn pose(&self) -> Pose {
        Pose {
            x: self.x,
            y: self.y,
            heading: normalize_angle(self.heading),
        }
    }

    /// The configured wheel geometry
    pub fn geometry(&self) -> WheelGeometry {
        self.geometry
    }

    /// The configured fusion settings
    pub fn config(&self) -> FusionConfig {
        self.config
    }

    /// Rate diagnostics from the last update cycle
    pub fn internal_states(&self) -> EstimatorInternalStates {
        self.states
    }

    /// Current status flags
    pub fn flags(&self) -> EstimatorFlags {
        EstimatorFlags {
            tracking: self.previous.is_some(),
            inertial_aligned: self.alignment.is_aligned(),
            inertial_missing: self.inertial_missing,
            time_step_clamped: self.time_step_clamped,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::time::{Duration, Instant};

    fn estimator() -> PoseEstimator {
        PoseEstimator::new(
            WheelGeometry::default(),
            FusionConfig::default(),
            Pose::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_first_update_primes_without_displacement() {
        let mut estimator = estimator();
        assert!(!estimator.flags().tracking);

        // Nonzero counters on the priming call must not move the pose;
        // there is no previous sample to difference against.
        let pose = estimator.update(RawSample::new(5000, -3000, 700, None, Instant::now()));
        assert_eq!(pose, Pose::default());
        assert!(estimator.flags().tracking);
    }

    #[test]
    fn test_zero_deltas_leave_pose_unchanged() {
        let mut estimator = estimator();
        let start = Instant::now();
        estimator.update(RawSample::new(100, 200, 300, None, start));

        for cycle in 1..=10 {
            let pose = estimator.update(RawSample::new(
                100,
                200,
                300,
                None,
                start + Duration::from_millis(20 * cycle),
            ));
            assert_eq!(pose, Pose::default());
        }
    }

    #[test]
    fn test_configuration_accessors() {
        let geometry = WheelGeometry {
            track_width: 11.0,
            ..Default::default()
        };
        let config = FusionConfig {
            inertial_weight: 0.25,
            ..Default::default()
        };
        let estimator = PoseEstimator::new(geometry, config, Pose::default()).unwrap();

        assert_eq!(estimator.geometry().track_width, 11.0);
        assert_eq!(estimator.config().inertial_weight, 0.25);
    }

    #[test]
    fn test_rejects_invalid_configuration() {
        let geometry = WheelGeometry {
            track_width: -1.0,
            ..Default::default()
        };
        assert!(PoseEstimator::new(geometry, FusionConfig::default(), Pose::default()).is_err());

        let config = FusionConfig {
            inertial_weight: 2.0,
            ..Default::default()
        };
        assert!(PoseEstimator::new(WheelGeometry::default(), config, Pose::default()).is_err());
    }

    #[test]
    fn test_forward_motion_along_heading() {
        let mut estimator = estimator();
        let start = Instant::now();
        estimator.update(RawSample::new(0, 0, 0, None, start));

        // Half a revolution on both drive wheels: pi inches forward
        let pose = estimator.update(RawSample::new(
            4096,
            4096,
            0,
            None,
            start + Duration::from_millis(20),
        ));
        assert!((pose.x - std::f32::consts::PI).abs() < 1e-3);
        assert!(pose.y.abs() < 1e-6);
        assert!(pose.heading.abs() < 1e-6);
    }

    #[test]
    fn test_velocity_diagnostics_use_interval() {
        let mut estimator = estimator();
        let start = Instant::now();
        estimator.update(RawSample::new(0, 0, 0, None, start));
        estimator.update(RawSample::new(
            4096,
            4096,
            0,
            None,
            start + Duration::from_millis(20),
        ));

        let states = estimator.internal_states();
        let expected = std::f32::consts::PI / 0.020;
        assert!((states.forward_velocity - expected).abs() / expected < 1e-2);
        assert_eq!(states.yaw_rate, 0.0);
    }

    #[test]
    fn test_stalled_interval_clamps_rates_not_distance() {
        let mut estimator = estimator();
        let start = Instant::now();
        estimator.update(RawSample::new(0, 0, 0, None, start));

        // 2 s gap, far beyond the 0.1 s maximum
        let pose = estimator.update(RawSample::new(
            4096,
            4096,
            0,
            None,
            start + Duration::from_secs(2),
        ));

        // Distance integration is interval-independent
        assert!((pose.x - std::f32::consts::PI).abs() < 1e-3);
        assert!(estimator.flags().time_step_clamped);
        // Rates are computed against the clamped interval
        let expected = std::f32::consts::PI / 0.1;
        assert!((estimator.internal_states().forward_velocity - expected).abs() < 1e-2);
    }

    #[test]
    fn test_reset_returns_to_unprimed() {
        let mut estimator = estimator();
        let start = Instant::now();
        estimator.update(RawSample::new(0, 0, 0, Some(0.3), start));
        estimator.update(RawSample::new(
            1000,
            1000,
            0,
            Some(0.3),
            start + Duration::from_millis(20),
        ));
        assert!(estimator.flags().inertial_aligned);

        let target = Pose::new(24.0, -12.0, 1.0);
        estimator.reset(target);
        assert!(!estimator.flags().tracking);
        assert!(!estimator.flags().inertial_aligned);
        assert_eq!(estimator.pose(), target);

        // First update after reset primes and returns the reset pose exactly
        let pose = estimator.update(RawSample::new(
            9999,
            -9999,
            123,
            Some(2.0),
            start + Duration::from_millis(40),
        ));
        assert_eq!(pose, target);
    }

    #[test]
    fn test_missing_inertial_degrades_to_encoder_heading() {
        let mut estimator = estimator();
        let start = Instant::now();
        estimator.update(RawSample::new(0, 0, 0, None, start));

        let pose = estimator.update(RawSample::new(
            -1000,
            1000,
            0,
            None,
            start + Duration::from_millis(20),
        ));
        assert!(estimator.flags().inertial_missing);
        assert!(pose.heading > 0.0);
    }
}
