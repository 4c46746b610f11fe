//! Conversions between the external convention and the matcher's local one.
//!
//! ```text
//!   external            matcher-local
//!   meters              centimeters
//!   x forward, y left   rx =  y·100,  ry = -x·100
//!   yaw                 th = yaw
//! ```
//!
//! The matcher frame is the external frame rotated by -90°: a beam with
//! external bearing φ has matcher bearing φ - π/2. Every conversion between
//! the two conventions goes through this module.

use std::f64::consts::FRAC_PI_2;

use super::math::normalize_angle;
use super::types::{LocalOffset, Pose2D};

/// Centimeters per meter (matcher working units).
pub const CM_PER_M: f64 = 100.0;

/// Stored in place of a range when the reading is invalid (centimeters).
pub const READING_ERROR: f64 = 99_999.0;

/// Meters to working units.
#[inline]
pub fn meters_to_working(meters: f64) -> f64 {
    meters * CM_PER_M
}

/// Working units to meters.
#[inline]
pub fn working_to_meters(working: f64) -> f64 {
    working / CM_PER_M
}

/// External beam bearing (radians) to matcher-frame bearing.
#[inline]
pub fn to_matcher_bearing(external: f64) -> f64 {
    external - FRAC_PI_2
}

/// External transform to matcher-local offset.
#[inline]
pub fn to_matcher_frame(pose: &Pose2D) -> LocalOffset {
    LocalOffset {
        rx: meters_to_working(pose.y),
        ry: -meters_to_working(pose.x),
        th: pose.theta,
    }
}

/// Matcher-local offset back to an external transform.
#[inline]
pub fn from_matcher_frame(offset: &LocalOffset) -> Pose2D {
    Pose2D {
        x: -working_to_meters(offset.ry),
        y: working_to_meters(offset.rx),
        theta: normalize_angle(offset.th),
    }
}
