//! Classification of test matches against truth matches.
//!
//! Both collections must be in canonical order. They are walked together one
//! reference sequence at a time, in metadata order, and every truth match on
//! a sequence is compared with every test match on the same sequence. The
//! comparison is quadratic per reference sequence.

use serde::Serialize;

use crate::core::alignment::AlignmentMatch;
use crate::matching::overlap::matches_overlap;
use crate::metadata::store::MetadataIndex;

/// Outcome of comparing a test set with a truth set
#[derive(Debug, Clone, Default)]
pub struct Classification {
    /// Test matches that overlap at least one truth match
    pub true_positives: usize,

    /// Truth matches with at least one overlapping test match
    pub truth_found: usize,

    /// Truth matches with no overlapping test match, in canonical order
    pub false_negatives: Vec<AlignmentMatch>,

    /// Test matches with no overlapping truth match, in canonical order
    pub false_positives: Vec<AlignmentMatch>,

    truth_total: usize,
    test_total: usize,
}

/// Counts and rates derived from a [`Classification`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ClassificationMetrics {
    pub truth_matches: usize,
    pub test_matches: usize,
    pub true_positives: usize,
    pub false_positives: usize,
    pub false_negatives: usize,
    pub sensitivity: f64,
    pub precision: f64,
}

#[allow(clippy::cast_precision_loss)]
fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

impl Classification {
    pub fn truth_total(&self) -> usize {
        self.truth_total
    }

    pub fn test_total(&self) -> usize {
        self.test_total
    }

    /// Fraction of truth matches that were found
    pub fn sensitivity(&self) -> f64 {
        ratio(self.truth_found, self.truth_total)
    }

    /// Fraction of test matches that are true positives
    pub fn precision(&self) -> f64 {
        ratio(self.true_positives, self.test_total)
    }

    pub fn metrics(&self) -> ClassificationMetrics {
        ClassificationMetrics {
            truth_matches: self.truth_total,
            test_matches: self.test_total,
            true_positives: self.true_positives,
            false_positives: self.false_positives.len(),
            false_negatives: self.false_negatives.len(),
            sensitivity: self.sensitivity(),
            precision: self.precision(),
        }
    }
}

/// End of the run of matches on `ref_index` starting at `start`
fn group_end(matches: &[AlignmentMatch], start: usize, ref_index: usize) -> usize {
    matches[start..]
        .iter()
        .position(|m| m.ref_index != ref_index)
        .map_or(matches.len(), |offset| start + offset)
}

/// Classify test matches against truth matches.
///
/// A truth match that overlaps at least one test match marks all of those
/// test matches as found; otherwise it is a false negative. Test matches
/// never marked found are false positives.
pub fn classify(
    truth: &[AlignmentMatch],
    test: &[AlignmentMatch],
    meta: &MetadataIndex,
    min_overlap: u64,
) -> Classification {
    debug_assert!(truth.windows(2).all(|w| w[0].position_cmp(&w[1]).is_le()));
    debug_assert!(test.windows(2).all(|w| w[0].position_cmp(&w[1]).is_le()));

    let mut result = Classification {
        truth_total: truth.len(),
        test_total: test.len(),
        ..Classification::default()
    };
    let mut found = vec![false; test.len()];
    let mut truth_cursor = 0;
    let mut test_cursor = 0;

    for sequence in meta.sequences_in_fasta_order() {
        let truth_end = group_end(truth, truth_cursor, sequence.index);
        let test_end = group_end(test, test_cursor, sequence.index);

        for truth_match in &truth[truth_cursor..truth_end] {
            let mut any = false;
            for (offset, test_match) in test[test_cursor..test_end].iter().enumerate() {
                if matches_overlap(truth_match, test_match, min_overlap) {
                    found[test_cursor + offset] = true;
                    any = true;
                }
            }
            if any {
                result.truth_found += 1;
            } else {
                result.false_negatives.push(truth_match.clone());
            }
        }

        truth_cursor = truth_end;
        test_cursor = test_end;
    }

    // Matches outside every group can only come from an index that disagrees
    // with the metadata; they can never be found.
    result
        .false_negatives
        .extend(truth[truth_cursor..].iter().cloned());

    for (test_match, was_found) in test.iter().zip(&found) {
        if *was_found {
            result.true_positives += 1;
        } else {
            result.false_positives.push(test_match.clone());
        }
    }

    result
}
