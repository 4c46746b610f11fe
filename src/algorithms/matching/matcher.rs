//! Two-pass polar scan matcher.

use super::config::MatcherConfig;
use super::polar::polar_pass;
use super::refine::refine;
use super::scratch::MatchScratch;
use super::{MatchError, MatchReport};
use crate::core::types::ScanRecord;

/// Polar scan matcher with buffers sized once for the configured geometry.
#[derive(Debug, Clone)]
pub struct PolarScanMatcher {
    config: MatcherConfig,
    scratch: MatchScratch,
}

impl PolarScanMatcher {
    /// Create a matcher for the given geometry.
    pub fn new(config: MatcherConfig) -> Self {
        let scratch = MatchScratch::new(config.beam_count, config.search_window);
        Self { config, scratch }
    }

    /// Get the matcher geometry.
    pub fn config(&self) -> &MatcherConfig {
        &self.config
    }

    /// Align `current` against `reference`.
    ///
    /// `current`'s offset is the starting guess, in the reference frame.
    /// On success it holds the refined offset, also returned in the report.
    /// On failure it is left untouched and must not be used as an estimate.
    pub fn match_scans(
        &mut self,
        reference: &ScanRecord,
        current: &mut ScanRecord,
    ) -> Result<MatchReport, MatchError> {
        let config = &self.config;
        if reference.len() != config.beam_count || current.len() != config.beam_count {
            return Err(MatchError::NumericalFault(
                "scan record size does not match matcher geometry",
            ));
        }

        for record in [&*current, reference] {
            let valid = record.matchable_count();
            if valid < config.min_valid_points {
                return Err(MatchError::DegenerateScan {
                    valid,
                    required: config.min_valid_points,
                });
            }
        }

        let mut offset = current.offset();
        if !offset.is_finite() {
            return Err(MatchError::NumericalFault("non-finite initial offset"));
        }

        let polar_iterations = polar_pass(config, reference, current, &mut offset, &mut self.scratch)?;
        let refinement = refine(config, reference, current, &mut offset)?;

        current.set_offset(offset);
        log::debug!(
            "Scan match: offset ({:.2}cm, {:.2}cm, {:.4}rad), {} + {} iterations, {} correspondences, mean error {:.2}cm",
            offset.rx,
            offset.ry,
            offset.th,
            polar_iterations,
            refinement.iterations,
            refinement.correspondences,
            refinement.mean_error
        );

        Ok(MatchReport {
            offset,
            polar_iterations,
            refinement_iterations: refinement.iterations,
            mean_error: refinement.mean_error,
            correspondences: refinement.correspondences,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::matching::{MatchPass, MatcherTuning};
    use crate::core::frames::to_matcher_frame;
    use crate::core::types::{LaserScan, LocalOffset, Pose2D};
    use crate::harness::SyntheticRoom;
    use crate::sensors::preprocessing::{PreprocessorConfig, ScanPreprocessor};
    use approx::assert_relative_eq;

    fn tuning() -> MatcherTuning {
        MatcherTuning {
            max_iterations: 30,
            stop_condition: 0.01,
            stop_condition_icp: 0.0002,
            ..MatcherTuning::default()
        }
    }

    fn setup(pose: &Pose2D, tuning: &MatcherTuning) -> (PolarScanMatcher, ScanRecord, ScanRecord) {
        let room = SyntheticRoom::furnished();
        let template = LaserScan {
            ranges: vec![0.0; 360],
            ..LaserScan::default()
        };
        let first = room.scan_from(&Pose2D::identity(), &template);
        let second = room.scan_from(pose, &template);

        let config = MatcherConfig::derive(&first, tuning).unwrap();
        let mut pre = ScanPreprocessor::new(PreprocessorConfig::default(), 360);
        let mut reference = ScanRecord::new(360);
        let mut current = ScanRecord::new(360);
        pre.process(&config, &first.ranges, &mut reference).unwrap();
        pre.process(&config, &second.ranges, &mut current).unwrap();
        (PolarScanMatcher::new(config), reference, current)
    }

    #[test]
    fn test_match_recovers_known_offset() {
        let truth = Pose2D::new(0.15, -0.1, 0.05);
        let (mut matcher, reference, mut current) = setup(&truth, &tuning());
        let expected = to_matcher_frame(&truth);
        current.set_offset(expected);

        let report = matcher.match_scans(&reference, &mut current).unwrap();
        assert_eq!(current.offset(), report.offset);
        assert_relative_eq!(report.offset.rx, expected.rx, epsilon = 0.3);
        assert_relative_eq!(report.offset.ry, expected.ry, epsilon = 0.3);
        assert_relative_eq!(report.offset.th, expected.th, epsilon = 2e-3);
        assert!(report.correspondences >= 40);
        assert!(report.mean_error < 1.0);
    }

    #[test]
    fn test_match_from_perturbed_prediction() {
        let truth = Pose2D::new(0.1, 0.05, -0.03);
        let (mut matcher, reference, mut current) = setup(&truth, &tuning());
        let expected = to_matcher_frame(&truth);
        current.set_offset(LocalOffset::new(
            expected.rx + 3.0,
            expected.ry - 2.0,
            expected.th + 0.02,
        ));

        let report = matcher.match_scans(&reference, &mut current).unwrap();
        assert_relative_eq!(report.offset.rx, expected.rx, epsilon = 0.3);
        assert_relative_eq!(report.offset.ry, expected.ry, epsilon = 0.3);
        assert_relative_eq!(report.offset.th, expected.th, epsilon = 2e-3);
    }

    #[test]
    fn test_degenerate_current_scan() {
        let (mut matcher, reference, _) = setup(&Pose2D::identity(), &tuning());
        let mut current = ScanRecord::new(360);
        let err = matcher.match_scans(&reference, &mut current).unwrap_err();
        assert_eq!(
            err,
            MatchError::DegenerateScan {
                valid: 0,
                required: 40
            }
        );
    }

    #[test]
    fn test_size_mismatch_is_fault() {
        let (mut matcher, reference, _) = setup(&Pose2D::identity(), &tuning());
        let mut current = ScanRecord::new(180);
        assert!(matches!(
            matcher.match_scans(&reference, &mut current),
            Err(MatchError::NumericalFault(_))
        ));
    }

    #[test]
    fn test_iteration_budget_exhausted() {
        let strict = MatcherTuning {
            max_iterations: 2,
            ..tuning()
        };
        let (mut matcher, reference, mut current) = setup(&Pose2D::new(0.1, 0.0, 0.0), &strict);
        let err = matcher.match_scans(&reference, &mut current).unwrap_err();
        assert_eq!(
            err,
            MatchError::ConvergenceFailure {
                pass: MatchPass::Polar,
                iterations: 2
            }
        );
    }

    #[test]
    fn test_non_finite_offset_rejected() {
        let (mut matcher, reference, mut current) = setup(&Pose2D::identity(), &tuning());
        current.set_offset(LocalOffset::new(f64::NAN, 0.0, 0.0));
        assert_eq!(
            matcher.match_scans(&reference, &mut current),
            Err(MatchError::NumericalFault("non-finite initial offset"))
        );
    }
}
