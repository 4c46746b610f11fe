//! Working polar scan record consumed by the scan matcher.
//!
//! All lengths are in matcher working units (centimeters) and all
//! coordinates are in the matcher's local frame (see [`crate::core::frames`]).

/// Pose offset of a scan relative to the reference scan's frame.
///
/// `rx`, `ry` in centimeters, `th` in radians, matcher-local convention.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LocalOffset {
    pub rx: f64,
    pub ry: f64,
    pub th: f64,
}

impl LocalOffset {
    /// Create a new offset.
    #[inline]
    pub fn new(rx: f64, ry: f64, th: f64) -> Self {
        Self { rx, ry, th }
    }

    /// Zero offset (the reference frame itself).
    #[inline]
    pub fn zero() -> Self {
        Self::default()
    }

    /// True if every component is finite.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.rx.is_finite() && self.ry.is_finite() && self.th.is_finite()
    }
}

/// Matchable representation of one laser scan.
///
/// Beams are stored as a Structure of Arrays. The beam count is fixed when
/// the record is created; no operation resizes it.
///
/// Segment id `0` means the beam belongs to no segment.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanRecord {
    pub(crate) ranges: Vec<f64>,
    pub(crate) valid: Vec<bool>,
    pub(crate) xs: Vec<f64>,
    pub(crate) ys: Vec<f64>,
    pub(crate) far: Vec<bool>,
    pub(crate) segments: Vec<u32>,
    offset: LocalOffset,
}

impl ScanRecord {
    /// Create an empty record for `beam_count` beams.
    ///
    /// Every beam starts invalid with no segment.
    pub fn new(beam_count: usize) -> Self {
        Self {
            ranges: vec![0.0; beam_count],
            valid: vec![false; beam_count],
            xs: vec![0.0; beam_count],
            ys: vec![0.0; beam_count],
            far: vec![false; beam_count],
            segments: vec![0; beam_count],
            offset: LocalOffset::zero(),
        }
    }

    /// Number of beams.
    #[inline]
    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    /// True if the record holds no beams.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Range of beam `i` in centimeters.
    #[inline]
    pub fn range(&self, i: usize) -> f64 {
        self.ranges[i]
    }

    /// All ranges.
    #[inline]
    pub fn ranges(&self) -> &[f64] {
        &self.ranges
    }

    /// Whether beam `i` holds a measured range.
    #[inline]
    pub fn is_valid(&self, i: usize) -> bool {
        self.valid[i]
    }

    /// Whether beam `i` is at or beyond the max range.
    #[inline]
    pub fn is_far(&self, i: usize) -> bool {
        self.far[i]
    }

    /// Valid and not far: usable for correspondences.
    #[inline]
    pub fn is_matchable(&self, i: usize) -> bool {
        self.valid[i] && !self.far[i]
    }

    /// Segment id of beam `i` (0 = none).
    #[inline]
    pub fn segment(&self, i: usize) -> u32 {
        self.segments[i]
    }

    /// Cartesian coordinates of beam `i` in the scan's own frame.
    #[inline]
    pub fn point(&self, i: usize) -> (f64, f64) {
        (self.xs[i], self.ys[i])
    }

    /// Number of beams usable for correspondences.
    pub fn matchable_count(&self) -> usize {
        (0..self.len()).filter(|&i| self.is_matchable(i)).count()
    }

    /// Number of distinct segments.
    pub fn segment_count(&self) -> usize {
        let mut count = 0;
        let mut last = 0;
        for &seg in &self.segments {
            if seg != 0 && seg != last {
                count += 1;
            }
            last = seg;
        }
        count
    }

    /// Pose offset relative to the reference frame.
    #[inline]
    pub fn offset(&self) -> LocalOffset {
        self.offset
    }

    /// Set the pose offset.
    #[inline]
    pub fn set_offset(&mut self, offset: LocalOffset) {
        self.offset = offset;
    }

    /// Zero the pose offset, making this record a matching origin.
    #[inline]
    pub fn reset_offset(&mut self) {
        self.offset = LocalOffset::zero();
    }
}
