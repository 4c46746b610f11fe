//! Simulation harness for tests, benchmarks and the simulation binary.
//!
//! Produces [`LaserScan`](crate::core::types::LaserScan)s by ray casting
//! against a polygonal room, standing in for a real sensor driver.
//!
//! ```ignore
//! use gati_odometry::harness::SyntheticRoom;
//!
//! let room = SyntheticRoom::furnished();
//! let scan = room.scan_from(&Pose2D::new(0.2, 0.1, 0.05), &template);
//! ```

mod room;

pub use room::{SyntheticRoom, Wall};
