//! Core data types for laser odometry.
//!
//! - [`Point2D`], [`Pose2D`]: external convention, meters and radians
//! - [`LaserScan`]: raw range scan from the sensor driver
//! - [`ScanRecord`], [`LocalOffset`]: matcher working representation

mod pose;
mod scan;
mod scan_record;

pub use pose::{Point2D, Pose2D};
pub use scan::{LaserScan, ScanError};
pub use scan_record::{LocalOffset, ScanRecord};
