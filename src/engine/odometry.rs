//! Scan-to-scan laser odometry estimator.
//!
//! One call to [`LaserOdometry::process`] is one cycle:
//!
//! ```text
//! scan ──► ScanPreprocessor ──► current record ◄── to_matcher_frame(predicted)
//!                                     │
//!             reference record ──► PolarScanMatcher
//!                                     │
//!          from_matcher_frame ◄── refined offset
//!                                     │
//!          current record becomes the new reference (success or failure)
//! ```

use crate::algorithms::matching::{MatcherConfig, PolarScanMatcher};
use crate::config::OdometryConfig;
use crate::core::frames::{from_matcher_frame, to_matcher_frame, working_to_meters};
use crate::core::types::{LaserScan, Pose2D, ScanRecord};
use crate::error::OdometryError;
use crate::sensors::preprocessing::ScanPreprocessor;

use super::keyframe::{KeyframeGate, KeyframeVerdict};

/// Estimated motion for one successful cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct Increment {
    /// Motion of the current scan relative to the previous reference.
    pub transform: Pose2D,
    /// Iterations spent in the polar pass.
    pub polar_iterations: u32,
    /// Iterations spent in the refinement pass.
    pub refinement_iterations: u32,
    /// Mean point-to-line residual (meters).
    pub mean_error: f64,
    /// Correspondences in the final refinement step.
    pub correspondences: usize,
}

/// State that exists once the first scan has been seen.
#[derive(Debug)]
struct Tracker {
    preprocessor: ScanPreprocessor,
    matcher: PolarScanMatcher,
    reference: ScanRecord,
}

/// Laser odometry estimator.
///
/// Uninitialized until [`initialize`](Self::initialize) succeeds; ready
/// from then on. Failures are reported per call and are never sticky.
#[derive(Debug)]
pub struct LaserOdometry {
    config: OdometryConfig,
    gate: KeyframeGate,
    tracker: Option<Tracker>,
}

impl LaserOdometry {
    /// Create an uninitialized estimator.
    pub fn new(config: OdometryConfig) -> Self {
        let gate = KeyframeGate::new(config.keyframe.clone());
        Self {
            config,
            gate,
            tracker: None,
        }
    }

    /// Get the configuration.
    pub fn config(&self) -> &OdometryConfig {
        &self.config
    }

    /// True once the first scan has been accepted.
    pub fn is_initialized(&self) -> bool {
        self.tracker.is_some()
    }

    /// Derived matcher geometry, once initialized.
    pub fn matcher_config(&self) -> Option<&MatcherConfig> {
        self.tracker.as_ref().map(|t| t.matcher.config())
    }

    /// Current reference scan record, once initialized.
    pub fn reference(&self) -> Option<&ScanRecord> {
        self.tracker.as_ref().map(|t| &t.reference)
    }

    /// Derive matcher geometry from `first_scan` and store it as the reference.
    ///
    /// Calling this again restarts from a new first scan. On error the
    /// estimator keeps its previous state.
    pub fn initialize(&mut self, first_scan: &LaserScan) -> Result<(), OdometryError> {
        self.config.validate()?;

        let geometry = MatcherConfig::derive(first_scan, &self.config.matcher)?;
        let mut preprocessor =
            ScanPreprocessor::new(self.config.preprocessing.clone(), geometry.beam_count);
        let mut reference = ScanRecord::new(geometry.beam_count);
        preprocessor.process(&geometry, &first_scan.ranges, &mut reference)?;

        log::info!(
            "Laser odometry initialized: {} beams, {:.1}° FOV, max range {:.2}m",
            geometry.beam_count,
            geometry.field_of_view,
            working_to_meters(geometry.max_range)
        );
        log::info!("Matcher tuning: {:?}", self.config.matcher);
        log::debug!(
            "Matcher geometry: window {} beams, max error {:.1}cm, stop {:.3}/{:.3}cm, \
             iterations {}/{}, full circle {}",
            geometry.search_window,
            geometry.max_error,
            geometry.stop_condition,
            geometry.stop_condition_icp,
            geometry.max_iterations,
            geometry.max_iterations_icp,
            geometry.full_circle
        );

        self.tracker = Some(Tracker {
            preprocessor,
            matcher: PolarScanMatcher::new(geometry),
            reference,
        });
        Ok(())
    }

    /// Estimate the motion from the reference scan to `scan`.
    ///
    /// `predicted` is the caller's motion prior for this cycle (external
    /// convention); pass [`Pose2D::identity`] when there is none.
    ///
    /// Once `scan` is preprocessed it becomes the new reference, whether or
    /// not matching succeeds. If it cannot be preprocessed the reference is
    /// left unchanged.
    pub fn process(
        &mut self,
        scan: &LaserScan,
        predicted: &Pose2D,
    ) -> Result<Increment, OdometryError> {
        let tracker = self.tracker.as_mut().ok_or(OdometryError::NotInitialized)?;
        let geometry = tracker.matcher.config();

        let mut current = ScanRecord::new(geometry.beam_count);
        tracker
            .preprocessor
            .process(geometry, &scan.ranges, &mut current)?;

        current.set_offset(to_matcher_frame(predicted));
        tracker.reference.reset_offset();

        let result = tracker.matcher.match_scans(&tracker.reference, &mut current);
        tracker.reference = current;

        match result {
            Ok(report) => {
                let transform = from_matcher_frame(&report.offset);
                log::debug!(
                    "Odometry increment: ({:.4}m, {:.4}m, {:.4}rad)",
                    transform.x,
                    transform.y,
                    transform.theta
                );
                Ok(Increment {
                    transform,
                    polar_iterations: report.polar_iterations,
                    refinement_iterations: report.refinement_iterations,
                    mean_error: working_to_meters(report.mean_error),
                    correspondences: report.correspondences,
                })
            }
            Err(err) => {
                log::warn!("Scan matching failed, reference advanced anyway: {}", err);
                Err(err.into())
            }
        }
    }

    /// Check an increment against the keyframe thresholds.
    pub fn evaluate_keyframe(&self, increment: &Pose2D) -> KeyframeVerdict {
        self.gate.evaluate(increment)
    }
}
