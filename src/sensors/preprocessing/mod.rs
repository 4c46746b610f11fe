//! Scan preprocessing.
//!
//! Turns a raw range array into a matchable [`ScanRecord`].
//!
//! # Pipeline
//!
//! ```text
//! ranges (m) → unit conversion + invalid sentinel → median filter
//!            → Cartesian x/y → far-point flags → segmentation → ScanRecord
//! ```
//!
//! # Example
//!
//! ```ignore
//! use gati_odometry::sensors::preprocessing::{ScanPreprocessor, PreprocessorConfig};
//!
//! let mut preprocessor = ScanPreprocessor::new(PreprocessorConfig::default(), geometry.beam_count);
//! let mut record = ScanRecord::new(geometry.beam_count);
//! preprocessor.process(&geometry, &scan.ranges, &mut record)?;
//! println!("{} matchable beams", record.matchable_count());
//! ```

mod median;
mod segmentation;

pub use median::median_filter;
pub use segmentation::{find_far_points, segment_scan};

use serde::{Deserialize, Serialize};

use crate::algorithms::matching::MatcherConfig;
use crate::config::defaults;
use crate::core::frames::{READING_ERROR, meters_to_working};
use crate::core::types::{ScanError, ScanRecord};

/// Configuration for the preprocessing pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreprocessorConfig {
    /// Beams on each side of the median window (0 disables the filter).
    #[serde(default = "defaults::median_half_window")]
    pub median_half_window: usize,

    /// Largest range step (cm) between neighbouring beams of one segment.
    #[serde(default = "defaults::segment_max_jump")]
    pub segment_max_jump: f64,
}

impl Default for PreprocessorConfig {
    fn default() -> Self {
        Self {
            median_half_window: defaults::median_half_window(),
            segment_max_jump: defaults::segment_max_jump(),
        }
    }
}

/// Complete scan preprocessing pipeline.
///
/// Holds the median filter buffers, sized once for the beam count.
#[derive(Debug)]
pub struct ScanPreprocessor {
    config: PreprocessorConfig,
    unfiltered: Vec<f64>,
    window: Vec<f64>,
}

impl ScanPreprocessor {
    /// Create a preprocessor for scans of `beam_count` beams.
    pub fn new(config: PreprocessorConfig, beam_count: usize) -> Self {
        let window = 2 * config.median_half_window + 1;
        Self {
            config,
            unfiltered: Vec::with_capacity(beam_count),
            window: Vec::with_capacity(window),
        }
    }

    /// Get the configuration.
    pub fn config(&self) -> &PreprocessorConfig {
        &self.config
    }

    /// Populate `record` from raw ranges in meters.
    ///
    /// A reading of zero (or a non-finite or negative one) is stored as
    /// [`READING_ERROR`] and marked invalid. The record's offset is zeroed.
    /// Nothing besides `record` is modified.
    pub fn process(
        &mut self,
        geometry: &MatcherConfig,
        ranges: &[f32],
        record: &mut ScanRecord,
    ) -> Result<(), ScanError> {
        let n = geometry.beam_count;
        if ranges.len() != n {
            return Err(ScanError::BeamCountMismatch {
                expected: n,
                actual: ranges.len(),
            });
        }
        if record.len() != n {
            return Err(ScanError::BeamCountMismatch {
                expected: n,
                actual: record.len(),
            });
        }

        record.reset_offset();

        for (slot, &reading) in record.ranges.iter_mut().zip(ranges) {
            *slot = if reading.is_finite() && reading > 0.0 {
                meters_to_working(reading as f64)
            } else {
                READING_ERROR
            };
        }

        median_filter(
            &mut record.ranges,
            self.config.median_half_window,
            &mut self.unfiltered,
            &mut self.window,
        );

        for i in 0..n {
            let r = record.ranges[i];
            let valid = r < READING_ERROR;
            record.valid[i] = valid;
            if valid {
                record.xs[i] = r * geometry.cos(i);
                record.ys[i] = r * geometry.sin(i);
            } else {
                record.xs[i] = 0.0;
                record.ys[i] = 0.0;
            }
        }

        find_far_points(record, geometry.max_range);
        segment_scan(record, self.config.segment_max_jump);

        log::trace!(
            "Preprocessed scan: {} matchable beams, {} segments",
            record.matchable_count(),
            record.segment_count()
        );
        Ok(())
    }
}
