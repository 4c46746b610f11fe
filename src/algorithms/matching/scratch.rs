//! Pre-allocated working buffers for the matcher hot paths.
//!
//! Sized once for the beam count and search window, then reused every cycle.

/// State of one reference-indexed slot of the projected scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Projection {
    /// No projected surface falls on this beam.
    Empty,
    /// The nearest surface faces the reference origin.
    Visible,
    /// The nearest surface is seen from behind.
    Occluded,
}

/// Scratch space shared by the polar and refinement passes.
#[derive(Debug, Clone)]
pub(crate) struct MatchScratch {
    /// Projected range per reference beam (cm).
    pub(crate) projected_ranges: Vec<f64>,
    pub(crate) projected_state: Vec<Projection>,

    /// Per current beam: fractional reference index and range after projection.
    pub(crate) beam_index: Vec<f64>,
    pub(crate) beam_range: Vec<f64>,

    /// Orientation search error per shift (2·window + 1 entries).
    pub(crate) shift_errors: Vec<f64>,
}

impl MatchScratch {
    /// Allocate buffers for `beam_count` beams and a ±`search_window` search.
    pub(crate) fn new(beam_count: usize, search_window: usize) -> Self {
        Self {
            projected_ranges: vec![f64::INFINITY; beam_count],
            projected_state: vec![Projection::Empty; beam_count],
            beam_index: vec![f64::NAN; beam_count],
            beam_range: vec![0.0; beam_count],
            shift_errors: vec![0.0; 2 * search_window + 1],
        }
    }

    pub(crate) fn clear_projection(&mut self) {
        self.projected_ranges.fill(f64::INFINITY);
        self.projected_state.fill(Projection::Empty);
        self.beam_index.fill(f64::NAN);
    }
}
