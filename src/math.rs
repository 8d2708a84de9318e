//! Angle and frame arithmetic for the deadwheel odometry library

use nalgebra::{Rotation2, Vector2};

use std::f32::consts::{PI, TAU};

/// Normalize an angle to the interval (-pi, pi].
///
/// The estimator accumulates heading without bound; reported poses carry
/// the normalized equivalent.
pub fn normalize_angle(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(TAU);
    if wrapped > PI { wrapped - TAU } else { wrapped }
}

/// Shift `angle` by whole turns so it lands within half a turn of
/// `reference`.
///
/// Used before blending an absolute (wrapped) yaw reading with the
/// unbounded encoder heading accumulator: a weighted average across the
/// +-pi seam would tear the estimate.
pub fn unwrap_near(angle: f32, reference: f32) -> f32 {
    reference + normalize_angle(angle - reference)
}

/// Rotate a robot-frame displacement into the field frame.
///
/// `local.x` is forward travel, `local.y` lateral travel; `heading` is the
/// field-frame heading at which the displacement occurred.
pub fn rotate_to_field(local: Vector2<f32>, heading: f32) -> Vector2<f32> {
    Rotation2::new(heading) * local
}
