//! Refinement pass: point-to-line Gauss-Newton.

use super::config::MatcherConfig;
use super::{MatchError, MatchPass};
use crate::core::math::normalize_angle;
use crate::core::types::{LocalOffset, ScanRecord};

/// Result of a converged refinement pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Refinement {
    pub iterations: u32,
    /// Mean absolute residual of the last step (cm).
    pub mean_error: f64,
    pub correspondences: usize,
}

/// Target line for one current-scan point.
#[derive(Debug, Clone, Copy)]
struct LineMatch {
    /// Unit normal of the reference line.
    nx: f64,
    ny: f64,
    /// Signed point-to-line distance (cm).
    residual: f64,
}

/// Find the reference line nearest to point `(px, py)` (reference frame).
///
/// Candidates are the matchable, segmented reference beams within ±window
/// beams of the point's bearing. The line runs through the nearest
/// candidate and its closer neighbour from the same segment.
fn nearest_line(
    config: &MatcherConfig,
    reference: &ScanRecord,
    px: f64,
    py: f64,
) -> Option<LineMatch> {
    let index = config.fractional_index(py.atan2(px));
    if !index.is_finite() {
        return None;
    }
    let center = index.round() as i64;
    let window = config.search_window as i64;
    let max_sq = config.max_error * config.max_error;

    let squared_distance = |j: usize| {
        let (x, y) = reference.point(j);
        (x - px).powi(2) + (y - py).powi(2)
    };

    let mut best: Option<(usize, f64)> = None;
    for k in (center - window)..=(center + window) {
        let Some(j) = config.wrap_index(k) else {
            continue;
        };
        if !reference.is_matchable(j) || reference.segment(j) == 0 {
            continue;
        }
        let d = squared_distance(j);
        if best.is_none_or(|(_, best_d)| d < best_d) {
            best = Some((j, d));
        }
    }

    let (nearest, nearest_sq) = best?;
    if nearest_sq >= max_sq {
        return None;
    }

    let segment = reference.segment(nearest);
    let neighbour = [nearest as i64 - 1, nearest as i64 + 1]
        .into_iter()
        .filter_map(|k| config.wrap_index(k))
        .filter(|&j| reference.segment(j) == segment)
        .min_by(|&a, &b| squared_distance(a).total_cmp(&squared_distance(b)))?;

    let (ax, ay) = reference.point(nearest);
    let (bx, by) = reference.point(neighbour);
    let (dx, dy) = (bx - ax, by - ay);
    let length = dx.hypot(dy);
    if length < 1e-9 {
        return None;
    }

    let nx = -dy / length;
    let ny = dx / length;
    let residual = nx * (px - ax) + ny * (py - ay);
    if residual.abs() >= config.max_error {
        return None;
    }

    Some(LineMatch { nx, ny, residual })
}

/// Refine `offset` by point-to-line Gauss-Newton.
///
/// Each step linearizes the point-to-line residuals around the current pose
/// and applies the solution of the 3×3 normal equations additively.
/// Converges once a step satisfies `|dx| + |dy| + |dθ| < stop_condition_icp`.
pub(crate) fn refine(
    config: &MatcherConfig,
    reference: &ScanRecord,
    current: &ScanRecord,
    offset: &mut LocalOffset,
) -> Result<Refinement, MatchError> {
    for iteration in 1..=config.max_iterations_icp {
        let (sin_t, cos_t) = offset.th.sin_cos();

        let mut h = [[0.0f64; 3]; 3];
        let mut g = [0.0f64; 3];
        let mut used = 0usize;
        let mut error_sum = 0.0;

        for i in 0..config.beam_count {
            if !current.is_matchable(i) {
                continue;
            }
            let (x, y) = current.point(i);
            let px = cos_t * x - sin_t * y + offset.rx;
            let py = sin_t * x + cos_t * y + offset.ry;

            let Some(line) = nearest_line(config, reference, px, py) else {
                continue;
            };

            // Rotation derivative uses the untransformed point
            let j = [
                line.nx,
                line.ny,
                line.nx * (-sin_t * x - cos_t * y) + line.ny * (cos_t * x - sin_t * y),
            ];
            for row in 0..3 {
                for col in 0..3 {
                    h[row][col] += j[row] * j[col];
                }
                g[row] -= j[row] * line.residual;
            }
            used += 1;
            error_sum += line.residual.abs();
        }

        if used < config.min_valid_points {
            return Err(MatchError::DegenerateScan {
                valid: used,
                required: config.min_valid_points,
            });
        }

        let delta = solve_3x3(&h, &g)
            .ok_or(MatchError::NumericalFault("singular refinement system"))?;

        offset.rx += delta[0];
        offset.ry += delta[1];
        offset.th = normalize_angle(offset.th + delta[2]);
        if !offset.is_finite() {
            return Err(MatchError::NumericalFault(
                "non-finite pose in refinement pass",
            ));
        }

        if delta[0].abs() + delta[1].abs() + delta[2].abs() < config.stop_condition_icp {
            return Ok(Refinement {
                iterations: iteration,
                mean_error: error_sum / used as f64,
                correspondences: used,
            });
        }
    }

    Err(MatchError::ConvergenceFailure {
        pass: MatchPass::Refinement,
        iterations: config.max_iterations_icp,
    })
}

/// Solve the 3×3 system `h · x = g` using Cramer's rule.
///
/// Returns `None` if the system is singular or the solution is not finite.
#[inline]
fn solve_3x3(h: &[[f64; 3]; 3], g: &[f64; 3]) -> Option<[f64; 3]> {
    let det = h[0][0] * (h[1][1] * h[2][2] - h[1][2] * h[2][1])
        - h[0][1] * (h[1][0] * h[2][2] - h[1][2] * h[2][0])
        + h[0][2] * (h[1][0] * h[2][1] - h[1][1] * h[2][0]);

    if !det.is_finite() || det.abs() < 1e-10 {
        return None;
    }

    let inv_det = 1.0 / det;
    let x = [
        (g[0] * (h[1][1] * h[2][2] - h[1][2] * h[2][1])
            - h[0][1] * (g[1] * h[2][2] - h[1][2] * g[2])
            + h[0][2] * (g[1] * h[2][1] - h[1][1] * g[2]))
            * inv_det,
        (h[0][0] * (g[1] * h[2][2] - h[1][2] * g[2])
            - g[0] * (h[1][0] * h[2][2] - h[1][2] * h[2][0])
            + h[0][2] * (h[1][0] * g[2] - g[1] * h[2][0]))
            * inv_det,
        (h[0][0] * (h[1][1] * g[2] - g[1] * h[2][1])
            - h[0][1] * (h[1][0] * g[2] - g[1] * h[2][0])
            + g[0] * (h[1][0] * h[2][1] - h[1][1] * h[2][0]))
            * inv_det,
    ];

    x.iter().all(|v| v.is_finite()).then_some(x)
}
