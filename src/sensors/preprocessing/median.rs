//! Median filter over neighbouring beams.

/// Replace each range by the median of its `2 * half_window + 1` neighbours.
///
/// Indices beyond the scan ends are clamped to the first/last beam. Medians
/// are taken over the unfiltered input, copied into `unfiltered` first.
/// `window` must hold at least `2 * half_window + 1` values.
pub fn median_filter(
    ranges: &mut [f64],
    half_window: usize,
    unfiltered: &mut Vec<f64>,
    window: &mut Vec<f64>,
) {
    if half_window == 0 || ranges.is_empty() {
        return;
    }

    unfiltered.clear();
    unfiltered.extend_from_slice(ranges);

    let last = ranges.len() as i64 - 1;
    for (i, out) in ranges.iter_mut().enumerate() {
        window.clear();
        for offset in -(half_window as i64)..=(half_window as i64) {
            let j = (i as i64 + offset).clamp(0, last) as usize;
            window.push(unfiltered[j]);
        }
        window.sort_unstable_by(f64::total_cmp);
        *out = window[half_window];
    }
}
