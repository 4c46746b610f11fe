//! GatiOdometry - Polar scan matching laser odometry for 2D LiDAR
//!
//! Estimates the motion between consecutive range scans by matching each
//! new scan against the previous one.
//!
//! # Architecture
//!
//! The crate is organized into 4 logical layers plus support modules:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                    engine/                          │  ← Orchestration
//! │          (LaserOdometry, KeyframeGate)              │
//! └─────────────────────────────────────────────────────┘
//!                          │
//! ┌─────────────────────────────────────────────────────┐
//! │                  algorithms/                        │  ← Core algorithms
//! │        (polar pass, point-to-line refinement)       │
//! └─────────────────────────────────────────────────────┘
//!                          │
//! ┌─────────────────────────────────────────────────────┐
//! │                   sensors/                          │  ← Sensor processing
//! │      (median filter, far points, segmentation)      │
//! └─────────────────────────────────────────────────────┘
//!                          │
//! ┌─────────────────────────────────────────────────────┐
//! │                     core/                           │  ← Foundation
//! │           (types, math, frame conversion)           │
//! └─────────────────────────────────────────────────────┘
//!
//!   config/   TOML configuration with per-field defaults
//!   harness/  synthetic room for tests, benchmarks and simulation
//! ```
//!
//! # Conventions
//!
//! The public API uses meters and radians with x forward and y left. The
//! matcher works in centimeters in a frame rotated by -90°; all conversions
//! live in [`core::frames`].
//!
//! # Example
//!
//! ```ignore
//! use gati_odometry::{LaserOdometry, OdometryConfig, Pose2D};
//!
//! let mut odometry = LaserOdometry::new(OdometryConfig::load_default()?);
//! odometry.initialize(&first_scan)?;
//!
//! let mut pose = Pose2D::identity();
//! for scan in scans {
//!     match odometry.process(&scan, &Pose2D::identity()) {
//!         Ok(increment) if odometry.evaluate_keyframe(&increment.transform).is_trusted() => {
//!             pose = pose.compose(&increment.transform);
//!         }
//!         Ok(_) => {}
//!         Err(e) => log::warn!("cycle failed: {}", e),
//!     }
//! }
//! ```

// ============================================================================
// Layer 1: Core foundation (no internal deps)
// ============================================================================
pub mod core;

// ============================================================================
// Layer 2: Sensor processing (depends on core)
// ============================================================================
pub mod sensors;

// ============================================================================
// Layer 3: Algorithms (depends on core, sensors)
// ============================================================================
pub mod algorithms;

// ============================================================================
// Layer 4: Odometry engine (depends on core, sensors, algorithms)
// ============================================================================
pub mod engine;

// ============================================================================
// Support
// ============================================================================
pub mod config;
pub mod error;
pub mod harness;

// ============================================================================
// Convenience re-exports (flat namespace for common use)
// ============================================================================

// Core types
pub use crate::core::math;
pub use crate::core::types::{LaserScan, LocalOffset, Point2D, Pose2D, ScanError, ScanRecord};

// Sensors - Preprocessing
pub use sensors::preprocessing::{PreprocessorConfig, ScanPreprocessor};

// Algorithms - Matching
pub use algorithms::matching::{
    MatchError, MatchPass, MatchReport, MatcherConfig, MatcherTuning, PolarScanMatcher,
};

// Engine
pub use engine::{
    Increment, KeyframeAxis, KeyframeGate, KeyframeThresholds, KeyframeVerdict,
    KeyframeViolation, LaserOdometry,
};

// Config & errors
pub use config::{ConfigError, DEFAULT_CONFIG_PATH, OdometryConfig};
pub use error::OdometryError;
