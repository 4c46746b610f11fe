//! Far-point marking and segmentation of a scan record.

use crate::core::types::ScanRecord;

/// Flag beams at or beyond `max_range` (cm) as far points.
pub fn find_far_points(record: &mut ScanRecord, max_range: f64) {
    for (far, &range) in record.far.iter_mut().zip(record.ranges.iter()) {
        *far = range >= max_range;
    }
}

/// Group contiguous matchable beams into segments.
///
/// A beam continues the current segment when its range is within
/// `max_jump` (cm) of the previous beam, or, once the segment holds two
/// beams, within `max_jump` of the linear extrapolation of the previous two.
/// Beams that are invalid or far end the segment. Segments with a single
/// beam are dissolved. Segment ids start at 1; 0 means no segment.
pub fn segment_scan(record: &mut ScanRecord, max_jump: f64) {
    let n = record.len();
    let mut next_id = 0u32;
    let mut run = 0usize;

    for i in 0..n {
        if !record.is_matchable(i) {
            record.segments[i] = 0;
            run = 0;
            continue;
        }

        let continues = run > 0 && {
            let r = record.ranges[i];
            let prev = record.ranges[i - 1];
            let near_previous = (r - prev).abs() <= max_jump;
            let near_extrapolated =
                run >= 2 && (r - (2.0 * prev - record.ranges[i - 2])).abs() <= max_jump;
            near_previous || near_extrapolated
        };

        if !continues {
            next_id += 1;
            run = 0;
        }
        record.segments[i] = next_id;
        run += 1;
    }

    dissolve_single_beam_segments(record);
}

fn dissolve_single_beam_segments(record: &mut ScanRecord) {
    let n = record.len();
    for i in 0..n {
        let seg = record.segments[i];
        if seg == 0 {
            continue;
        }
        let left = i > 0 && record.segments[i - 1] == seg;
        let right = i + 1 < n && record.segments[i + 1] == seg;
        if !left && !right {
            record.segments[i] = 0;
        }
    }
}
