//! Per-query consolidation of match sets.
//!
//! Repetitive queries can produce thousands of matches that swamp an
//! evaluation. Consolidation caps the matches kept for each query: queries
//! with at least `disable_threshold` matches are dropped completely, and
//! queries with more than `retain_per_query` matches keep only their
//! longest ones.

use std::collections::{BTreeSet, HashMap};

use serde::Serialize;
use tracing::debug;

use crate::core::alignment::{AlignmentMatch, MatchSet};
use crate::core::types::MatchFormat;

/// How many matches to keep per query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ConsolidationPolicy {
    /// Keep at most this many matches per query; 0 disables consolidation
    pub retain_per_query: usize,

    /// Drop every match of a query with at least this many matches
    pub disable_threshold: Option<usize>,
}

impl ConsolidationPolicy {
    pub fn new(retain_per_query: usize, disable_threshold: Option<usize>) -> Self {
        Self {
            retain_per_query,
            disable_threshold,
        }
    }

    pub fn is_active(&self) -> bool {
        self.retain_per_query > 0
    }
}

/// What consolidation removed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConsolidationSummary {
    /// Queries that were capped to their longest matches
    pub overabundant_queries: Vec<String>,

    /// Queries whose matches were all dropped
    pub disabled_queries: Vec<String>,

    /// Number of matches removed
    pub removed: usize,
}

/// Decide which matches survive, returning the keep flags and the sorted
/// overabundant and disabled query ids
fn select_matches(
    matches: &[AlignmentMatch],
    retain: usize,
    disable: usize,
) -> (Vec<bool>, Vec<String>, Vec<String>) {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for m in matches {
        *counts.entry(m.query_id.as_str()).or_default() += 1;
    }

    let mut keep = vec![true; matches.len()];
    let mut disabled: BTreeSet<&str> = BTreeSet::new();
    let mut overabundant: HashMap<&str, Vec<usize>> = HashMap::new();

    for (i, m) in matches.iter().enumerate() {
        let query = m.query_id.as_str();
        let count = counts[query];
        if count >= disable {
            keep[i] = false;
            disabled.insert(query);
        } else if count > retain {
            overabundant.entry(query).or_default().push(i);
        }
    }

    for indices in overabundant.values_mut() {
        // Stable: equal lengths keep input order
        indices.sort_by(|&a, &b| matches[b].ref_len().cmp(&matches[a].ref_len()));
        for &i in &indices[retain..] {
            keep[i] = false;
        }
    }

    let mut overabundant_queries: Vec<String> =
        overabundant.keys().map(|q| (*q).to_string()).collect();
    overabundant_queries.sort_unstable();
    let disabled_queries: Vec<String> = disabled.into_iter().map(str::to_string).collect();

    (keep, overabundant_queries, disabled_queries)
}

/// Cap the number of matches per query.
///
/// Only GFF match sets are consolidated; BLAST tabular sets are left
/// untouched. When the policy is active the set is returned in canonical
/// order regardless of its input order. Among equally long matches of an
/// overabundant query, the ones earlier in the input are kept.
pub fn consolidate(set: &mut MatchSet, policy: &ConsolidationPolicy) -> ConsolidationSummary {
    if set.format != MatchFormat::Gff || !policy.is_active() {
        return ConsolidationSummary::default();
    }

    let retain = policy.retain_per_query;
    let disable = policy.disable_threshold.unwrap_or(usize::MAX);

    let (keep, overabundant_queries, disabled_queries) =
        select_matches(&set.matches, retain, disable);

    let before = set.matches.len();
    let matches = std::mem::take(&mut set.matches);
    set.matches = matches
        .into_iter()
        .zip(keep)
        .filter_map(|(m, k)| k.then_some(m))
        .collect();
    set.sort();

    let summary = ConsolidationSummary {
        overabundant_queries,
        disabled_queries,
        removed: before - set.matches.len(),
    };

    if !summary.overabundant_queries.is_empty() {
        debug!(
            "Overabundant queries: {}",
            summary.overabundant_queries.join(", ")
        );
    }
    debug!("Disabled {} queries", summary.disabled_queries.len());

    summary
}

/// Remove records that describe the same alignment as an earlier record.
///
/// Expects a set in canonical order, so that duplicates share a
/// `(reference index, reference begin)` run. Returns the number removed.
pub fn dedup(set: &mut MatchSet) -> usize {
    let before = set.matches.len();
    let mut kept: Vec<AlignmentMatch> = Vec::with_capacity(before);
    let mut run_start = 0;

    for m in std::mem::take(&mut set.matches) {
        if let Some(last) = kept.last() {
            if (last.ref_index, last.ref_begin) != (m.ref_index, m.ref_begin) {
                run_start = kept.len();
            }
        }
        if !kept[run_start..].iter().any(|k| k.is_same_match(&m)) {
            kept.push(m);
        }
    }

    set.matches = kept;
    before - set.matches.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::alignment::tests::{blast_match, gff_match};
    use crate::core::types::Strand;

    fn count_query(set: &MatchSet, query: &str) -> usize {
        set.matches.iter().filter(|m| m.query_id == query).count()
    }

    #[test]
    fn test_keeps_longest_matches() {
        // Ten matches for Q2 with lengths 10, 20, ..., 100
        let matches = (1..=10u64)
            .map(|i| gff_match(0, (i * 1000, i * 1000 + i * 10), "Q2", (0, i * 10)))
            .collect();
        let mut set = MatchSet::new(MatchFormat::Gff, matches);

        let summary = consolidate(&mut set, &ConsolidationPolicy::new(3, Some(100)));

        assert_eq!(set.len(), 3);
        let mut lengths: Vec<u64> = set.matches.iter().map(AlignmentMatch::ref_len).collect();
        lengths.sort_unstable();
        assert_eq!(lengths, vec![80, 90, 100]);
        assert_eq!(summary.overabundant_queries, vec!["Q2".to_string()]);
        assert_eq!(summary.removed, 7);
        assert!(set.is_sorted());
    }

    #[test]
    fn test_disables_repetitive_query() {
        let mut matches: Vec<_> = (0..15u64)
            .map(|i| gff_match(0, (i * 100, i * 100 + 50), "Q3", (0, 50)))
            .collect();
        matches.push(gff_match(0, (5, 55), "Q4", (0, 50)));
        let mut set = MatchSet::new(MatchFormat::Gff, matches);

        let summary = consolidate(&mut set, &ConsolidationPolicy::new(20, Some(10)));

        assert_eq!(count_query(&set, "Q3"), 0);
        assert_eq!(count_query(&set, "Q4"), 1);
        assert_eq!(summary.disabled_queries, vec!["Q3".to_string()]);
        assert!(summary.overabundant_queries.is_empty());
    }

    #[test]
    fn test_disable_threshold_is_inclusive() {
        let matches = (0..10u64)
            .map(|i| gff_match(0, (i * 100, i * 100 + 50), "Q", (0, 50)))
            .collect();
        let mut set = MatchSet::new(MatchFormat::Gff, matches);
        consolidate(&mut set, &ConsolidationPolicy::new(3, Some(10)));
        assert!(set.is_empty());
    }

    #[test]
    fn test_small_queries_untouched() {
        let matches = vec![
            gff_match(1, (0, 50), "A", (0, 50)),
            gff_match(0, (10, 30), "A", (0, 20)),
            gff_match(0, (0, 40), "B", (0, 40)),
        ];
        let mut set = MatchSet::new(MatchFormat::Gff, matches);
        let summary = consolidate(&mut set, &ConsolidationPolicy::new(2, None));

        assert_eq!(set.len(), 3);
        assert_eq!(summary, ConsolidationSummary::default());
        // Output is in canonical order
        assert_eq!(set.matches[0].query_id, "B");
        assert_eq!(set.matches[2].ref_index, 1);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let matches = vec![
            gff_match(0, (500, 600), "Q", (0, 100)),
            gff_match(0, (100, 200), "Q", (0, 100)),
            gff_match(0, (300, 400), "Q", (0, 100)),
        ];
        let mut set = MatchSet::new(MatchFormat::Gff, matches);
        consolidate(&mut set, &ConsolidationPolicy::new(2, None));

        let begins: Vec<u64> = set.matches.iter().map(|m| m.ref_begin).collect();
        assert_eq!(begins, vec![100, 500]);
    }

    #[test]
    fn test_zero_retain_disables_consolidation() {
        let matches: Vec<_> = (0..15u64)
            .map(|i| gff_match(0, (i * 100, i * 100 + 50), "Q", (0, 50)))
            .collect();
        let mut set = MatchSet::new(MatchFormat::Gff, matches);
        let summary = consolidate(&mut set, &ConsolidationPolicy::new(0, Some(10)));
        assert_eq!(set.len(), 15);
        assert_eq!(summary.removed, 0);
    }

    #[test]
    fn test_blast_sets_pass_through() {
        let matches: Vec<_> = (0..5u64)
            .map(|i| blast_match(0, (500 - i * 100, 600), "Q", (0, 50), Strand::Forward))
            .collect();
        let mut set = MatchSet::new(MatchFormat::Blast, matches);
        consolidate(&mut set, &ConsolidationPolicy::new(1, Some(2)));

        assert_eq!(set.len(), 5);
        assert_eq!(set.matches[0].ref_begin, 500);
    }

    #[test]
    fn test_dedup() {
        let a = gff_match(0, (100, 200), "Q", (0, 100));
        let mut same_but_longer = a.clone();
        same_but_longer.ref_end = 250;
        let between = gff_match(0, (100, 220), "R", (0, 100));
        let other = gff_match(0, (100, 200), "Q", (5, 100));

        let mut set = MatchSet::new(
            MatchFormat::Gff,
            vec![a, between, same_but_longer, other, gff_match(1, (100, 200), "Q", (0, 100))],
        );
        set.sort();

        assert_eq!(dedup(&mut set), 1);
        assert_eq!(set.len(), 4);
        assert!(set.is_sorted());
    }
}
