//! Raw LiDAR scan as delivered by the sensor driver.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when a raw scan cannot be turned into a scan record.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScanError {
    /// Scan metadata is unusable for matcher geometry.
    #[error("Invalid scan metadata: {0}")]
    InvalidMetadata(&'static str),

    /// The beam count changed after initialization.
    #[error("Beam count mismatch: expected {expected}, got {actual}")]
    BeamCountMismatch { expected: usize, actual: usize },
}

/// Raw LiDAR scan in polar coordinates.
///
/// Represents a single sweep from a rotating 2D range sensor. Beam `i` is
/// measured at `angle_min + i * angle_increment`, counter-clockwise from
/// the robot's forward axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaserScan {
    /// Start angle in radians
    pub angle_min: f32,
    /// End angle in radians
    pub angle_max: f32,
    /// Angular resolution (radians between consecutive readings)
    pub angle_increment: f32,
    /// Minimum valid range in meters
    pub range_min: f32,
    /// Maximum valid range in meters
    pub range_max: f32,
    /// Range measurements in meters (0 = no return)
    pub ranges: Vec<f32>,
}

impl LaserScan {
    /// Create a new laser scan with the given parameters.
    pub fn new(
        angle_min: f32,
        angle_max: f32,
        angle_increment: f32,
        range_min: f32,
        range_max: f32,
        ranges: Vec<f32>,
    ) -> Self {
        Self {
            angle_min,
            angle_max,
            angle_increment,
            range_min,
            range_max,
            ranges,
        }
    }

    /// Number of range measurements.
    #[inline]
    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    /// Check if scan is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Angle of beam `index` in radians.
    #[inline]
    pub fn angle_at(&self, index: usize) -> f32 {
        self.angle_min + index as f32 * self.angle_increment
    }

    /// Angular span between the first and last beam in radians.
    #[inline]
    pub fn field_of_view(&self) -> f64 {
        self.angle_max as f64 - self.angle_min as f64
    }

    /// Validate that the metadata can describe matcher geometry.
    pub fn validate(&self) -> Result<(), ScanError> {
        if self.ranges.len() < 2 {
            return Err(ScanError::InvalidMetadata("scan needs at least two beams"));
        }
        if !(self.field_of_view() > 0.0) {
            return Err(ScanError::InvalidMetadata(
                "angle_max must be greater than angle_min",
            ));
        }
        if !(self.range_max > 0.0) {
            return Err(ScanError::InvalidMetadata("range_max must be positive"));
        }
        Ok(())
    }
}

impl Default for LaserScan {
    fn default() -> Self {
        let increment = std::f32::consts::TAU / 360.0;
        Self {
            angle_min: 0.0,
            angle_max: std::f32::consts::TAU - increment,
            angle_increment: increment,
            range_min: 0.15,
            range_max: 12.0,
            ranges: Vec::new(),
        }
    }
}
