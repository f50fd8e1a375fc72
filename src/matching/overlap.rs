use crate::core::alignment::AlignmentMatch;

/// Signed overlap of two half-open intervals, measured from the one that
/// begins first. Negative values are the gap between them.
///
/// On equal begins the shorter interval counts as earlier, which keeps the
/// result independent of argument order.
#[inline]
fn axis_overlap(a: (u64, u64), b: (u64, u64)) -> i128 {
    let (earlier, later) = if a <= b { (a, b) } else { (b, a) };
    i128::from(earlier.1) - i128::from(later.0)
}

/// Whether two matches describe the same alignment closely enough to count
/// as agreeing.
///
/// Matches agree when they have the same query and strand, and overlap by at
/// least `min_overlap` bases on both the reference and the query.
pub fn matches_overlap(a: &AlignmentMatch, b: &AlignmentMatch, min_overlap: u64) -> bool {
    if a.query_id != b.query_id || a.strand != b.strand {
        return false;
    }

    let min_overlap = i128::from(min_overlap);
    axis_overlap((a.ref_begin, a.ref_end), (b.ref_begin, b.ref_end)) >= min_overlap
        && axis_overlap((a.query_begin, a.query_end), (b.query_begin, b.query_end))
            >= min_overlap
}
