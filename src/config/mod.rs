//! Configuration loading for the odometry.
//!
//! All tuning lives in a single TOML file with per-field defaults.
//!
//! ```toml
//! [matcher]
//! min_valid_points = 40
//! search_window = 20.0     # degrees
//! max_error = 1.0          # meters
//! max_iterations = 20
//! max_iterations_icp = 50
//! stop_condition = 0.004   # meters
//! stop_condition_icp = 0.001
//!
//! [keyframe]
//! max_yaw = 0.35           # radians
//! max_x = 0.5              # meters
//! max_y = 0.25
//!
//! [preprocessing]
//! median_half_window = 2
//! segment_max_jump = 20.0  # centimeters
//! ```

pub(crate) mod defaults;
mod error;
mod odometry;

pub use error::ConfigError;
pub use odometry::{DEFAULT_CONFIG_PATH, OdometryConfig};
