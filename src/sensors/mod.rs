//! Sensor processing layer.
//!
//! - [`preprocessing`]: raw range scan → matchable [`ScanRecord`](crate::core::types::ScanRecord)

pub mod preprocessing;
