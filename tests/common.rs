//! Test utilities for GatiOdometry integration tests.

#![allow(dead_code)]

use gati_odometry::harness::SyntheticRoom;
use gati_odometry::{LaserOdometry, LaserScan, OdometryConfig, Pose2D};

/// Full-circle 360-beam scan metadata with no readings.
pub fn template() -> LaserScan {
    LaserScan {
        ranges: vec![0.0; 360],
        ..LaserScan::default()
    }
}

/// Forward-centred scan metadata covering `field_of_view_deg` at 1° per beam.
pub fn partial_template(field_of_view_deg: u32) -> LaserScan {
    let half = (field_of_view_deg as f32 / 2.0).to_radians();
    LaserScan::new(
        -half,
        half,
        1.0f32.to_radians(),
        0.15,
        12.0,
        vec![0.0; field_of_view_deg as usize + 1],
    )
}

/// Tuning for noise-free synthetic scans.
///
/// The median filter is disabled since simulated ranges carry no shot noise.
pub fn synthetic_config() -> OdometryConfig {
    let mut config = OdometryConfig::default();
    config.matcher.max_iterations = 30;
    config.matcher.stop_condition = 0.01;
    config.matcher.stop_condition_icp = 0.0001;
    config.preprocessing.median_half_window = 0;
    config
}

/// Scan of the furnished room from `pose`.
pub fn scan_at(pose: &Pose2D) -> LaserScan {
    SyntheticRoom::furnished().scan_from(pose, &template())
}

/// Scan of the furnished room from `pose` with the given metadata.
pub fn scan_with(template: &LaserScan, pose: &Pose2D) -> LaserScan {
    SyntheticRoom::furnished().scan_from(pose, template)
}

/// Estimator initialized with a scan taken at `start`.
pub fn initialized_at(start: &Pose2D, config: OdometryConfig) -> LaserOdometry {
    initialized_with(&template(), start, config)
}

/// Estimator initialized with a scan of the given metadata taken at `start`.
pub fn initialized_with(
    template: &LaserScan,
    start: &Pose2D,
    config: OdometryConfig,
) -> LaserOdometry {
    let mut odometry = LaserOdometry::new(config);
    odometry
        .initialize(&scan_with(template, start))
        .expect("initialization should succeed");
    odometry
}
