//! Tick-to-distance conversion for the deadwheel odometry library

use std::f32::consts::PI;

use crate::types::{Direction, WheelGeometry};

/// Convert an encoder tick delta to linear wheel travel in inches.
///
/// `distance = delta_ticks * sign * (pi * wheel_diameter) /
/// (ticks_per_revolution * gear_ratio)`. Pure arithmetic with no error
/// conditions: direction is valid by construction and the geometry is
/// validated when the estimator is built.
///
/// # Example
/// ```
/// use deadwheel_odometry::units::ticks_to_inches;
/// use deadwheel_odometry::{Direction, WheelGeometry};
///
/// // Half a revolution of a 2 inch wheel travels pi inches
/// let distance = ticks_to_inches(4096, Direction::Forward, &WheelGeometry::default());
/// assert!((distance - std::f32::consts::PI).abs() < 1e-4);
/// ```
pub fn ticks_to_inches(delta_ticks: i64, direction: Direction, geometry: &WheelGeometry) -> f32 {
    delta_ticks as f32 * direction.sign() * inches_per_tick(geometry)
}

/// Linear travel per encoder tick in inches
pub fn inches_per_tick(geometry: &WheelGeometry) -> f32 {
    (PI * geometry.wheel_diameter) / (geometry.ticks_per_revolution * geometry.gear_ratio)
}
