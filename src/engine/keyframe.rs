//! Keyframe gate for odometry increments.
//!
//! Decides whether a single-cycle increment is plausible enough for the
//! caller to compose into its trajectory. The verdict never changes which
//! scan becomes the next reference.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::defaults;
use crate::core::types::Pose2D;

/// Largest acceptable single-cycle increment per axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyframeThresholds {
    /// Maximum absolute yaw change (radians).
    #[serde(default = "defaults::max_yaw")]
    pub max_yaw: f64,

    /// Maximum absolute forward motion (meters).
    #[serde(default = "defaults::max_x")]
    pub max_x: f64,

    /// Maximum absolute lateral motion (meters).
    #[serde(default = "defaults::max_y")]
    pub max_y: f64,
}

impl Default for KeyframeThresholds {
    fn default() -> Self {
        Self {
            max_yaw: defaults::max_yaw(),
            max_x: defaults::max_x(),
            max_y: defaults::max_y(),
        }
    }
}

/// Axis whose bound an increment exceeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyframeAxis {
    Yaw,
    X,
    Y,
}

impl fmt::Display for KeyframeAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyframeAxis::Yaw => write!(f, "yaw"),
            KeyframeAxis::X => write!(f, "x"),
            KeyframeAxis::Y => write!(f, "y"),
        }
    }
}

/// Which bound was exceeded, and by how much.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeyframeViolation {
    pub axis: KeyframeAxis,
    /// Configured bound.
    pub limit: f64,
    /// Absolute value observed.
    pub actual: f64,
}

impl KeyframeViolation {
    /// Amount by which the bound was exceeded.
    pub fn excess(&self) -> f64 {
        self.actual - self.limit
    }
}

impl fmt::Display for KeyframeViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let unit = match self.axis {
            KeyframeAxis::Yaw => "rad",
            KeyframeAxis::X | KeyframeAxis::Y => "m",
        };
        write!(
            f,
            "|{}| = {:.4}{} exceeds limit {:.4}{} by {:.4}{}",
            self.axis,
            self.actual,
            unit,
            self.limit,
            unit,
            self.excess(),
            unit
        )
    }
}

/// Outcome of the keyframe check.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum KeyframeVerdict {
    Trusted,
    Untrusted(KeyframeViolation),
}

impl KeyframeVerdict {
    /// True if the increment may be composed into the trajectory.
    pub fn is_trusted(&self) -> bool {
        matches!(self, KeyframeVerdict::Trusted)
    }

    /// The violated bound, if any.
    pub fn violation(&self) -> Option<&KeyframeViolation> {
        match self {
            KeyframeVerdict::Trusted => None,
            KeyframeVerdict::Untrusted(violation) => Some(violation),
        }
    }
}

/// Per-axis bound check on odometry increments.
#[derive(Debug, Clone, Default)]
pub struct KeyframeGate {
    thresholds: KeyframeThresholds,
}

impl KeyframeGate {
    /// Create a gate with the given thresholds.
    pub fn new(thresholds: KeyframeThresholds) -> Self {
        Self { thresholds }
    }

    /// Check `increment` against yaw, then x, then y.
    ///
    /// Stops at the first violated bound. A value exactly at its bound is
    /// trusted.
    pub fn evaluate(&self, increment: &Pose2D) -> KeyframeVerdict {
        let checks = [
            (KeyframeAxis::Yaw, self.thresholds.max_yaw, increment.theta.abs()),
            (KeyframeAxis::X, self.thresholds.max_x, increment.x.abs()),
            (KeyframeAxis::Y, self.thresholds.max_y, increment.y.abs()),
        ];

        for (axis, limit, actual) in checks {
            // NaN fails closed
            if !(actual <= limit) {
                let violation = KeyframeViolation {
                    axis,
                    limit,
                    actual,
                };
                log::warn!("Untrusted increment: {}", violation);
                return KeyframeVerdict::Untrusted(violation);
            }
        }
        KeyframeVerdict::Trusted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn gate() -> KeyframeGate {
        KeyframeGate::new(KeyframeThresholds {
            max_yaw: 0.3,
            max_x: 0.5,
            max_y: 0.2,
        })
    }

    #[test]
    fn test_small_increment_trusted() {
        let verdict = gate().evaluate(&Pose2D::new(0.1, -0.05, 0.02));
        assert!(verdict.is_trusted());
        assert!(verdict.violation().is_none());
    }

    #[test]
    fn test_yaw_checked_before_x() {
        let verdict = gate().evaluate(&Pose2D::new(1.0, 0.0, 0.6));
        let violation = verdict.violation().unwrap();
        assert_eq!(violation.axis, KeyframeAxis::Yaw);
        assert_relative_eq!(violation.limit, 0.3);
        assert_relative_eq!(violation.actual, 0.6);
    }

    #[test]
    fn test_x_checked_before_y() {
        let verdict = gate().evaluate(&Pose2D::new(-0.7, 0.9, 0.0));
        assert_eq!(verdict.violation().unwrap().axis, KeyframeAxis::X);
        assert_relative_eq!(verdict.violation().unwrap().actual, 0.7);
    }

    #[test]
    fn test_lateral_violation() {
        let verdict = gate().evaluate(&Pose2D::new(0.0, -0.25, 0.0));
        let violation = verdict.violation().unwrap();
        assert_eq!(violation.axis, KeyframeAxis::Y);
        assert_relative_eq!(violation.excess(), 0.05, epsilon = 1e-12);
    }

    #[test]
    fn test_bound_is_inclusive() {
        let gate = KeyframeGate::new(KeyframeThresholds {
            max_yaw: 1.0,
            max_x: 2.0,
            max_y: 2.0,
        });
        assert!(gate.evaluate(&Pose2D::new(0.0, 0.0, 1.0)).is_trusted());
        assert!(gate.evaluate(&Pose2D::new(0.0, 0.0, -1.0)).is_trusted());
        assert!(!gate.evaluate(&Pose2D::new(0.0, 0.0, 2.0)).is_trusted());
        assert!(gate.evaluate(&Pose2D::new(2.0, -2.0, 0.0)).is_trusted());
        assert!(!gate.evaluate(&Pose2D::new(3.0, 0.0, 0.0)).is_trusted());
    }

    #[test]
    fn test_nan_is_untrusted() {
        let increment = Pose2D {
            x: f64::NAN,
            y: 0.0,
            theta: 0.0,
        };
        assert!(!gate().evaluate(&increment).is_trusted());
    }

    #[test]
    fn test_violation_display() {
        let violation = KeyframeViolation {
            axis: KeyframeAxis::X,
            limit: 0.5,
            actual: 0.75,
        };
        assert_eq!(
            violation.to_string(),
            "|x| = 0.7500m exceeds limit 0.5000m by 0.2500m"
        );
    }
}
