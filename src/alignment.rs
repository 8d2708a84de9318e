//! Inertial yaw alignment for the deadwheel odometry library

use tracing::debug;

use crate::math::unwrap_near;
use crate::types::Direction;

/// Aligns the inertial sensor's arbitrary yaw zero with the estimator's
/// heading frame.
///
/// The sensor reports an absolute yaw with an arbitrary zero. The first
/// reading after construction or reset fixes an offset so the aligned yaw
/// coincides with the estimator's heading at that instant; subsequent
/// readings are corrected by the same offset and unwrapped next to the
/// reference heading so the complementary filter never blends across a
/// wrap seam.
#[derive(Debug, Clone, Copy)]
pub struct YawAlignment {
    /// Sign of the yaw axis relative to counter-clockwise positive
    sign: Direction,
    /// Offset fixed at the first reading; `None` until captured
    offset: Option<f32>,
}

impl YawAlignment {
    /// Create an unaligned instance with the configured yaw sign
    pub fn new(sign: Direction) -> Self {
        Self { sign, offset: None }
    }

    /// Align a raw yaw reading against the current heading estimate.
    ///
    /// Captures the zero offset on the first call after a reset; returns
    /// the aligned yaw, shifted by whole turns to sit within half a turn
    /// of `reference_heading`.
    pub fn align(&mut self, raw_yaw: f32, reference_heading: f32) -> f32 {
        let signed = self.sign.sign() * raw_yaw;
        let offset = match self.offset {
            Some(offset) => offset,
            None => {
                let offset = signed - reference_heading;
                self.offset = Some(offset);
                debug!(offset, "captured inertial yaw alignment");
                offset
            }
        };
        unwrap_near(signed - offset, reference_heading)
    }

    /// Whether the zero offset has been captured
    pub fn is_aligned(&self) -> bool {
        self.offset.is_some()
    }

    /// Clear the captured offset so it is recomputed on the next reading
    pub fn reset(&mut self) {
        self.offset = None;
    }
}
