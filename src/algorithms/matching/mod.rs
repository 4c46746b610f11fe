//! Polar scan matching.
//!
//! Aligns the current scan against the reference scan in two passes:
//!
//! 1. **Polar pass**: the current scan is projected into the reference
//!    frame and compared beam by beam. Translation is estimated by weighted
//!    least squares along beam directions and orientation by a shift search
//!    over the projected ranges, alternating until corrections stay small.
//! 2. **Refinement pass**: point-to-line Gauss-Newton against lines through
//!    neighbouring reference points of the same segment.
//!
//! Both passes work in the matcher's local frame and units
//! (see [`crate::core::frames`]).
//!
//! # Example
//!
//! ```ignore
//! use gati_odometry::algorithms::matching::{MatcherConfig, PolarScanMatcher};
//!
//! let config = MatcherConfig::derive(&first_scan, &tuning)?;
//! let mut matcher = PolarScanMatcher::new(config);
//!
//! current.set_offset(predicted);
//! let report = matcher.match_scans(&reference, &mut current)?;
//! println!("offset {:?} after {} + {} iterations",
//!     report.offset, report.polar_iterations, report.refinement_iterations);
//! ```

mod config;
mod matcher;
mod polar;
mod refine;
mod scratch;

pub use config::{MatcherConfig, MatcherTuning};
pub use matcher::PolarScanMatcher;

use std::fmt;

use thiserror::Error;

use crate::core::types::LocalOffset;

/// Matching pass that produced a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchPass {
    /// Alternating translation/orientation pass.
    Polar,
    /// Point-to-line Gauss-Newton pass.
    Refinement,
}

impl fmt::Display for MatchPass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchPass::Polar => write!(f, "polar"),
            MatchPass::Refinement => write!(f, "refinement"),
        }
    }
}

/// Reasons a match attempt fails.
///
/// On any of these the current scan's offset must not be used.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MatchError {
    /// Too few usable beams or correspondences.
    #[error("Degenerate scan: {valid} usable points, {required} required")]
    DegenerateScan { valid: usize, required: usize },

    /// Iteration budget exhausted before the stop condition held.
    #[error("No convergence in {pass} pass after {iterations} iterations")]
    ConvergenceFailure { pass: MatchPass, iterations: u32 },

    /// Ill-conditioned or non-finite intermediate result.
    #[error("Numerical fault: {0}")]
    NumericalFault(&'static str),
}

/// Outcome of a successful match.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchReport {
    /// Refined pose of the current scan in the reference frame (local units).
    pub offset: LocalOffset,
    /// Iterations spent in the polar pass.
    pub polar_iterations: u32,
    /// Iterations spent in the refinement pass.
    pub refinement_iterations: u32,
    /// Mean absolute point-to-line residual of the last refinement step (cm).
    pub mean_error: f64,
    /// Correspondences used in the last refinement step.
    pub correspondences: usize,
}
