//! Default value functions for serde deserialization.

// [matcher]

pub fn min_valid_points() -> usize {
    40
}

pub fn search_window() -> f64 {
    20.0
}

pub fn max_error() -> f64 {
    1.0
}

pub fn max_iterations() -> u32 {
    20
}

pub fn max_iterations_icp() -> u32 {
    50
}

pub fn stop_condition() -> f64 {
    0.004
}

pub fn stop_condition_icp() -> f64 {
    0.001
}

// [keyframe]

pub fn max_yaw() -> f64 {
    0.35
}

pub fn max_x() -> f64 {
    0.5
}

pub fn max_y() -> f64 {
    0.25
}

// [preprocessing]

pub fn median_half_window() -> usize {
    2
}

pub fn segment_max_jump() -> f64 {
    20.0
}
