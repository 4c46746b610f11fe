//! Matcher tuning (physical units) and derived matcher geometry (working units).

use std::f64::consts::TAU;

use serde::{Deserialize, Serialize};

use crate::config::defaults;
use crate::core::frames::{meters_to_working, to_matcher_bearing};
use crate::core::math::{deg_to_rad, normalize_angle, rad_to_deg};
use crate::core::types::{LaserScan, ScanError};

/// Externally supplied matcher tuning, in physical units.
///
/// Read once at initialization and converted into [`MatcherConfig`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatcherTuning {
    /// Minimum number of usable beams (and correspondences) for a match.
    #[serde(default = "defaults::min_valid_points")]
    pub min_valid_points: usize,

    /// Half-width of the angular correspondence search (degrees).
    #[serde(default = "defaults::search_window")]
    pub search_window: f64,

    /// Range differences at or above this are not correspondences (meters).
    #[serde(default = "defaults::max_error")]
    pub max_error: f64,

    /// Iteration budget of the polar pass.
    #[serde(default = "defaults::max_iterations")]
    pub max_iterations: u32,

    /// Iteration budget of the point-to-line refinement pass.
    #[serde(default = "defaults::max_iterations_icp")]
    pub max_iterations_icp: u32,

    /// Polar pass stops once corrections stay below this (meters).
    #[serde(default = "defaults::stop_condition")]
    pub stop_condition: f64,

    /// Refinement pass stops once a step is below this (meters).
    #[serde(default = "defaults::stop_condition_icp")]
    pub stop_condition_icp: f64,
}

impl Default for MatcherTuning {
    fn default() -> Self {
        Self {
            min_valid_points: defaults::min_valid_points(),
            search_window: defaults::search_window(),
            max_error: defaults::max_error(),
            max_iterations: defaults::max_iterations(),
            max_iterations_icp: defaults::max_iterations_icp(),
            stop_condition: defaults::stop_condition(),
            stop_condition_icp: defaults::stop_condition_icp(),
        }
    }
}

/// Immutable matcher geometry and limits, in working units.
///
/// Derived once from the first scan's metadata plus [`MatcherTuning`].
/// Deriving twice from identical inputs yields equal values.
#[derive(Debug, Clone, PartialEq)]
pub struct MatcherConfig {
    /// Beams per scan.
    pub beam_count: usize,
    /// Field of view in degrees.
    pub field_of_view: f64,
    /// Maximum sensor range (cm).
    pub max_range: f64,
    /// Minimum usable beams / correspondences.
    pub min_valid_points: usize,
    /// Half-width of the correspondence search, in beams.
    pub search_window: usize,
    /// Correspondence rejection threshold (cm).
    pub max_error: f64,
    /// Iteration budget of the polar pass.
    pub max_iterations: u32,
    /// Iteration budget of the refinement pass.
    pub max_iterations_icp: u32,
    /// Polar pass stop threshold (cm + rad).
    pub stop_condition: f64,
    /// Refinement pass stop threshold (cm + rad).
    pub stop_condition_icp: f64,
    /// Bearing of beam 0 in the matcher frame (radians).
    pub bearing_min: f64,
    /// Angle between consecutive beams (radians).
    pub bearing_step: f64,
    /// True when the beams cover the full circle and indices wrap.
    pub full_circle: bool,
    cosines: Vec<f64>,
    sines: Vec<f64>,
}

impl MatcherConfig {
    /// Derive matcher geometry from scan metadata and tuning.
    pub fn derive(scan: &LaserScan, tuning: &MatcherTuning) -> Result<Self, ScanError> {
        scan.validate()?;

        let beam_count = scan.len();
        let fov = scan.field_of_view();
        let bearing_step = fov / (beam_count - 1) as f64;
        let bearing_min = to_matcher_bearing(scan.angle_min as f64);
        let full_circle = beam_count as f64 * bearing_step >= TAU - 0.5 * bearing_step;

        let window = (deg_to_rad(tuning.search_window) / bearing_step).ceil();
        let search_window = (window.max(1.0) as usize).min(beam_count / 2).max(1);

        let (sines, cosines): (Vec<f64>, Vec<f64>) = (0..beam_count)
            .map(|i| (bearing_min + i as f64 * bearing_step).sin_cos())
            .unzip();

        Ok(Self {
            beam_count,
            field_of_view: rad_to_deg(fov),
            max_range: meters_to_working(scan.range_max as f64),
            min_valid_points: tuning.min_valid_points,
            search_window,
            max_error: meters_to_working(tuning.max_error),
            max_iterations: tuning.max_iterations,
            max_iterations_icp: tuning.max_iterations_icp,
            stop_condition: meters_to_working(tuning.stop_condition),
            stop_condition_icp: meters_to_working(tuning.stop_condition_icp),
            bearing_min,
            bearing_step,
            full_circle,
            cosines,
            sines,
        })
    }

    /// Cosine of beam `i`'s bearing.
    #[inline]
    pub fn cos(&self, i: usize) -> f64 {
        self.cosines[i]
    }

    /// Sine of beam `i`'s bearing.
    #[inline]
    pub fn sin(&self, i: usize) -> f64 {
        self.sines[i]
    }

    /// Bearing of beam `i` in the matcher frame.
    #[inline]
    pub fn bearing(&self, i: usize) -> f64 {
        self.bearing_min + i as f64 * self.bearing_step
    }

    /// Fractional beam index of a matcher-frame bearing.
    ///
    /// For partial scans the blind sector is split evenly, so bearings just
    /// outside the field of view map to slightly negative or slightly too
    /// large indices rather than wrapping to the far end.
    pub fn fractional_index(&self, bearing: f64) -> f64 {
        if self.full_circle {
            (bearing - self.bearing_min).rem_euclid(TAU) / self.bearing_step
        } else {
            let half_span = 0.5 * (self.beam_count - 1) as f64 * self.bearing_step;
            let from_center = normalize_angle(bearing - (self.bearing_min + half_span));
            (from_center + half_span) / self.bearing_step
        }
    }

    /// Map a possibly out-of-range beam index to a beam, wrapping on full circles.
    #[inline]
    pub fn wrap_index(&self, index: i64) -> Option<usize> {
        let n = self.beam_count as i64;
        if (0..n).contains(&index) {
            Some(index as usize)
        } else if self.full_circle {
            Some(index.rem_euclid(n) as usize)
        } else {
            None
        }
    }
}
