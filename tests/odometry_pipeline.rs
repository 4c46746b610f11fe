//! End-to-end tests of the odometry cycle.

mod common;

use approx::assert_relative_eq;

use gati_odometry::algorithms::matching::MatcherConfig;
use gati_odometry::{
    KeyframeAxis, LaserOdometry, LaserScan, MatchError, MatcherTuning, OdometryError, Pose2D,
};

/// Position and heading tolerance for recovered increments.
const TOLERANCE: f64 = 1e-3;

// ============================================================================
// Known-offset recovery
// ============================================================================

fn assert_recovers(truth: Pose2D) {
    let mut odometry = common::initialized_at(&Pose2D::identity(), common::synthetic_config());
    let increment = odometry
        .process(&common::scan_at(&truth), &truth)
        .unwrap_or_else(|e| panic!("matching {:?} failed: {}", truth, e));

    assert_relative_eq!(increment.transform.x, truth.x, epsilon = TOLERANCE);
    assert_relative_eq!(increment.transform.y, truth.y, epsilon = TOLERANCE);
    assert_relative_eq!(increment.transform.theta, truth.theta, epsilon = TOLERANCE);
    assert!(increment.correspondences >= 40);
}

#[test]
fn test_recovers_forward_motion() {
    assert_recovers(Pose2D::new(0.1, 0.0, 0.0));
}

#[test]
fn test_recovers_lateral_motion() {
    assert_recovers(Pose2D::new(0.0, -0.08, 0.0));
}

#[test]
fn test_recovers_pure_rotation() {
    assert_recovers(Pose2D::new(0.0, 0.0, 0.07));
}

#[test]
fn test_recovers_combined_motion() {
    assert_recovers(Pose2D::new(0.12, 0.05, -0.05));
}

#[test]
fn test_identity_motion() {
    assert_recovers(Pose2D::identity());
}

// ============================================================================
// Failure handling
// ============================================================================

#[test]
fn test_all_zero_scan_is_degenerate() {
    let mut odometry = common::initialized_at(&Pose2D::identity(), common::synthetic_config());
    let blank = common::template();

    let err = odometry.process(&blank, &Pose2D::identity()).unwrap_err();
    match err {
        OdometryError::Match(MatchError::DegenerateScan { valid, required }) => {
            assert_eq!(valid, 0);
            assert_eq!(required, 40);
        }
        other => panic!("expected DegenerateScan, got {:?}", other),
    }

    let reference = odometry.reference().unwrap();
    assert!((0..reference.len()).all(|i| !reference.is_valid(i)));
}

#[test]
fn test_failed_cycle_advances_reference() {
    let mut odometry = common::initialized_at(&Pose2D::identity(), common::synthetic_config());

    // Only a handful of beams hit anything
    let mut sparse = common::scan_at(&Pose2D::new(0.05, 0.0, 0.0));
    for r in sparse.ranges.iter_mut().skip(20) {
        *r = 0.0;
    }
    let result = odometry.process(&sparse, &Pose2D::new(0.05, 0.0, 0.0));
    assert!(matches!(
        result,
        Err(OdometryError::Match(MatchError::DegenerateScan { .. }))
    ));

    // The stored reference is the scan just processed, not the first one
    let reference = odometry.reference().unwrap();
    assert!(reference.matchable_count() <= 20);
    assert_relative_eq!(
        reference.range(5),
        sparse.ranges[5] as f64 * 100.0,
        epsilon = 1e-3
    );

    // A failure is not sticky: the next usable scan is matched against it,
    // which here fails again because the reference itself is degenerate
    let next = common::scan_at(&Pose2D::new(0.1, 0.0, 0.0));
    assert!(odometry.process(&next, &Pose2D::new(0.05, 0.0, 0.0)).is_err());

    // ...and the cycle after that succeeds
    let after = common::scan_at(&Pose2D::new(0.15, 0.0, 0.0));
    let increment = odometry
        .process(&after, &Pose2D::new(0.05, 0.0, 0.0))
        .unwrap();
    assert_relative_eq!(increment.transform.x, 0.05, epsilon = TOLERANCE);
}

#[test]
fn test_scan_shape_error_keeps_reference() {
    let mut odometry = common::initialized_at(&Pose2D::identity(), common::synthetic_config());
    let before = odometry.reference().unwrap().clone();

    let truncated = LaserScan {
        ranges: vec![2.0; 100],
        ..common::template()
    };
    assert!(matches!(
        odometry.process(&truncated, &Pose2D::identity()),
        Err(OdometryError::Scan(_))
    ));
    assert_eq!(odometry.reference().unwrap(), &before);
}

#[test]
fn test_not_initialized() {
    let mut odometry = LaserOdometry::new(common::synthetic_config());
    let result = odometry.process(&common::scan_at(&Pose2D::identity()), &Pose2D::identity());
    assert!(matches!(result, Err(OdometryError::NotInitialized)));
}

// ============================================================================
// Configuration derivation
// ============================================================================

#[test]
fn test_reinitialization_is_deterministic() {
    let scan = common::scan_at(&Pose2D::identity());
    let mut a = LaserOdometry::new(common::synthetic_config());
    let mut b = LaserOdometry::new(common::synthetic_config());
    a.initialize(&scan).unwrap();
    b.initialize(&scan).unwrap();
    assert_eq!(a.matcher_config(), b.matcher_config());

    // Re-initializing the same instance reproduces the same geometry
    let first = a.matcher_config().cloned();
    a.initialize(&scan).unwrap();
    assert_eq!(a.matcher_config().cloned(), first);
}

#[test]
fn test_derived_geometry_units() {
    let scan = common::scan_at(&Pose2D::identity());
    let config = MatcherConfig::derive(&scan, &MatcherTuning::default()).unwrap();
    assert_eq!(config.beam_count, 360);
    assert!(config.full_circle);
    assert_relative_eq!(config.max_range, 1200.0, epsilon = 1e-3);
    assert_relative_eq!(config.max_error, 100.0, epsilon = 1e-9);
    assert_eq!(config.search_window, 20);
}

// ============================================================================
// Keyframe gate
// ============================================================================

#[test]
fn test_gate_reports_yaw_before_x() {
    let odometry = LaserOdometry::new(common::synthetic_config());
    let verdict = odometry.evaluate_keyframe(&Pose2D::new(2.0, 0.0, 1.0));
    assert_eq!(verdict.violation().unwrap().axis, KeyframeAxis::Yaw);
}

#[test]
fn test_gate_limit_is_inclusive() {
    let mut config = common::synthetic_config();
    config.keyframe.max_yaw = 0.25;
    let odometry = LaserOdometry::new(config);
    assert!(
        odometry
            .evaluate_keyframe(&Pose2D::new(0.0, 0.0, 0.25))
            .is_trusted()
    );
    assert!(
        !odometry
            .evaluate_keyframe(&Pose2D::new(0.0, 0.0, 1.25))
            .is_trusted()
    );
}
