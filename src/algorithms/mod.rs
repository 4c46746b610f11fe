//! Core odometry algorithms layer.
//!
//! # Contents
//!
//! - [`matching`]: Two-pass polar scan matching (polar pass + point-to-line refinement)

pub mod matching;
