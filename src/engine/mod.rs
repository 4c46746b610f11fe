//! Odometry orchestration layer.
//!
//! # Contents
//!
//! - [`LaserOdometry`]: per-cycle estimator owning the reference scan
//! - [`KeyframeGate`]: per-axis plausibility check on increments

mod keyframe;
mod odometry;

pub use keyframe::{
    KeyframeAxis, KeyframeGate, KeyframeThresholds, KeyframeVerdict, KeyframeViolation,
};
pub use odometry::{Increment, LaserOdometry};
