//! Core foundation layer.
//!
//! This is the bottom layer of the odometry stack with no internal dependencies.
//! All other layers depend on core.
//!
//! # Contents
//!
//! - [`types`]: Core data types (poses, raw scans, scan records)
//! - [`math`]: Angle normalization and unit helpers
//! - [`frames`]: External ↔ matcher-local unit and axis conversion

pub mod frames;
pub mod math;
pub mod types;
