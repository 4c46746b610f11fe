//! Polar pass: alternating translation and orientation estimation.
//!
//! Works on the current scan projected into the reference scan's polar grid,
//! so every comparison is a range difference along a reference beam.

use super::config::MatcherConfig;
use super::scratch::{MatchScratch, Projection};
use super::{MatchError, MatchPass};
use crate::core::math::normalize_angle;
use crate::core::types::{LocalOffset, ScanRecord};

/// Score assigned to an orientation shift with no overlapping beams.
const LARGE_ERROR: f64 = 10_000.0;

/// Initial translation weighting constant (cm²).
const INITIAL_WEIGHT_SCALE: f64 = 70.0 * 70.0;

/// From this iteration on the weighting constant shrinks by [`WEIGHT_DECAY`].
const WEIGHT_DECAY_ITERATION: u32 = 10;
const WEIGHT_DECAY: f64 = 50.0;

/// Consecutive small corrections required to declare convergence.
const SMALL_CORRECTIONS_TO_STOP: u32 = 3;

/// Below this the translation normal equations are treated as singular.
const MIN_DETERMINANT: f64 = 1e-3;

/// Project `current`, placed at `offset`, onto the reference beam grid.
///
/// Consecutive beams of one segment are joined and their range linearly
/// interpolated across every reference beam between them. Where several
/// surfaces fall on one beam the nearest wins; surfaces traversed against
/// the beam order face away from the reference origin and are marked
/// occluded.
pub(crate) fn project(
    config: &MatcherConfig,
    current: &ScanRecord,
    offset: &LocalOffset,
    scratch: &mut MatchScratch,
) {
    scratch.clear_projection();

    let (sin_t, cos_t) = offset.th.sin_cos();
    for i in 0..config.beam_count {
        if !current.is_matchable(i) {
            continue;
        }
        let (x, y) = current.point(i);
        let px = cos_t * x - sin_t * y + offset.rx;
        let py = sin_t * x + cos_t * y + offset.ry;
        scratch.beam_index[i] = config.fractional_index(py.atan2(px));
        scratch.beam_range[i] = px.hypot(py);
    }

    let n = config.beam_count as f64;
    for i in 1..config.beam_count {
        let seg = current.segment(i);
        if seg == 0 || seg != current.segment(i - 1) {
            continue;
        }

        let (mut f0, r0) = (scratch.beam_index[i - 1], scratch.beam_range[i - 1]);
        let (mut f1, r1) = (scratch.beam_index[i], scratch.beam_range[i]);
        if !f0.is_finite() || !f1.is_finite() {
            continue;
        }

        // Pair straddles the seam of a full-circle scan, or the middle of
        // the blind sector of a partial one
        if (f1 - f0).abs() > 0.5 * n {
            if !config.full_circle {
                continue;
            }
            if f0 < f1 {
                f0 += n;
            } else {
                f1 += n;
            }
        }

        let occluded = f1 < f0;
        let (lo, hi, r_lo, r_hi) = if occluded {
            (f1, f0, r1, r0)
        } else {
            (f0, f1, r0, r1)
        };

        let span = hi - lo;
        for k in (lo.ceil() as i64)..=(hi.floor() as i64) {
            let Some(slot) = config.wrap_index(k) else {
                continue;
            };
            let t = if span > 0.0 { (k as f64 - lo) / span } else { 0.0 };
            let r = r_lo + t * (r_hi - r_lo);
            if r < scratch.projected_ranges[slot] {
                scratch.projected_ranges[slot] = r;
                scratch.projected_state[slot] = if occluded {
                    Projection::Occluded
                } else {
                    Projection::Visible
                };
            }
        }
    }
}

/// Rotation correction (radians) from a shift search over the projection.
///
/// Every shift within ±window beams is scored by the mean absolute range
/// difference; the best shift is refined by fitting a parabola through its
/// neighbours.
pub(crate) fn orientation_search(
    config: &MatcherConfig,
    reference: &ScanRecord,
    scratch: &mut MatchScratch,
) -> Result<f64, MatchError> {
    let window = config.search_window as i64;
    let mut best_slot = 0;
    let mut best_error = LARGE_ERROR;

    for (slot, shift) in (-window..=window).enumerate() {
        let mut sum = 0.0;
        let mut count = 0usize;
        for i in 0..config.beam_count {
            if scratch.projected_state[i] != Projection::Visible {
                continue;
            }
            let Some(j) = config.wrap_index(i as i64 + shift) else {
                continue;
            };
            if !reference.is_matchable(j) {
                continue;
            }
            sum += (reference.range(j) - scratch.projected_ranges[i]).abs();
            count += 1;
        }

        let error = if count > 0 {
            sum / count as f64
        } else {
            LARGE_ERROR
        };
        scratch.shift_errors[slot] = error;
        if error < best_error {
            best_error = error;
            best_slot = slot;
        }
    }

    if best_error >= LARGE_ERROR {
        return Err(MatchError::NumericalFault(
            "no overlap in orientation search",
        ));
    }

    let mut shift = best_slot as f64 - window as f64;
    let errors = &scratch.shift_errors;
    if best_slot > 0 && best_slot + 1 < errors.len() {
        let (left, mid, right) = (errors[best_slot - 1], errors[best_slot], errors[best_slot + 1]);
        let curvature = left - 2.0 * mid + right;
        if curvature > 0.0 && left < LARGE_ERROR && right < LARGE_ERROR {
            shift += 0.5 * (left - right) / curvature;
        }
    }

    Ok(shift * config.bearing_step)
}

/// Translation correction (cm) by weighted least squares along beam directions.
///
/// Each usable reference beam contributes `dr = r_ref - r_projected` as a
/// measurement of the translation's component along that beam, weighted by
/// `c / (dr² + c)`.
pub(crate) fn translation_estimation(
    config: &MatcherConfig,
    reference: &ScanRecord,
    scratch: &MatchScratch,
    weight_scale: f64,
) -> Result<(f64, f64), MatchError> {
    let (mut hxx, mut hxy, mut hyy) = (0.0, 0.0, 0.0);
    let (mut gx, mut gy) = (0.0, 0.0);
    let mut used = 0usize;

    for i in 0..config.beam_count {
        if !reference.is_matchable(i) || reference.segment(i) == 0 {
            continue;
        }
        if scratch.projected_state[i] != Projection::Visible {
            continue;
        }
        let projected = scratch.projected_ranges[i];
        if projected >= config.max_range {
            continue;
        }
        let dr = reference.range(i) - projected;
        if dr.abs() >= config.max_error {
            continue;
        }

        let w = weight_scale / (dr * dr + weight_scale);
        let (c, s) = (config.cos(i), config.sin(i));
        hxx += w * c * c;
        hxy += w * c * s;
        hyy += w * s * s;
        gx += w * dr * c;
        gy += w * dr * s;
        used += 1;
    }

    if used < config.min_valid_points {
        return Err(MatchError::DegenerateScan {
            valid: used,
            required: config.min_valid_points,
        });
    }

    let det = hxx * hyy - hxy * hxy;
    if det.abs() < MIN_DETERMINANT {
        return Err(MatchError::NumericalFault("singular translation estimate"));
    }

    Ok(((hyy * gx - hxy * gy) / det, (hxx * gy - hxy * gx) / det))
}

/// Run the polar pass, updating `offset` in place.
///
/// Odd iterations search orientation, even iterations estimate translation.
/// Stops once three consecutive iterations leave the latest corrections
/// below the stop condition. Returns the number of iterations run.
pub(crate) fn polar_pass(
    config: &MatcherConfig,
    reference: &ScanRecord,
    current: &ScanRecord,
    offset: &mut LocalOffset,
    scratch: &mut MatchScratch,
) -> Result<u32, MatchError> {
    let (mut dx, mut dy, mut dth) = (10.0f64, 10.0f64, 10.0f64);
    let mut weight_scale = INITIAL_WEIGHT_SCALE;
    let mut small_corrections = 0;
    let mut iteration = 0;

    while iteration < config.max_iterations && small_corrections < SMALL_CORRECTIONS_TO_STOP {
        project(config, current, offset, scratch);

        if iteration % 2 == 1 {
            dth = orientation_search(config, reference, scratch)?;
            offset.th = normalize_angle(offset.th + dth);
        } else {
            if iteration == WEIGHT_DECAY_ITERATION {
                weight_scale /= WEIGHT_DECAY;
            }
            (dx, dy) = translation_estimation(config, reference, scratch, weight_scale)?;
            offset.rx += dx;
            offset.ry += dy;
        }

        if !offset.is_finite() {
            return Err(MatchError::NumericalFault("non-finite pose in polar pass"));
        }

        iteration += 1;
        if dx.abs() + dy.abs() + dth.abs() < config.stop_condition {
            small_corrections += 1;
        } else {
            small_corrections = 0;
        }
    }

    if small_corrections < SMALL_CORRECTIONS_TO_STOP {
        return Err(MatchError::ConvergenceFailure {
            pass: MatchPass::Polar,
            iterations: iteration,
        });
    }

    log::trace!(
        "Polar pass converged in {} iterations: ({:.2}, {:.2}, {:.4})",
        iteration,
        offset.rx,
        offset.ry,
        offset.th
    );
    Ok(iteration)
}
