use serde::Serialize;
use tracing::{debug, info};

use crate::core::alignment::MatchSet;
use crate::core::types::MatchFormat;
use crate::matching::classify::{classify, Classification, ClassificationMetrics};
use crate::matching::consolidate::{consolidate, dedup, ConsolidationPolicy};
use crate::metadata::store::MetadataIndex;

/// Default minimum length of a local match
pub const DEFAULT_MIN_LEN: u64 = 150;

/// Default minimum overlap for a truth and a test match to agree
pub const DEFAULT_MIN_OVERLAP: u64 = 50;

/// Default maximum error rate of a local match
pub const DEFAULT_ERROR_RATE: f64 = 0.025;

/// Configuration for an evaluation run
#[derive(Debug, Clone, Serialize)]
pub struct EvaluationConfig {
    /// Minimum length of a local match
    pub min_len: u64,
    /// Minimum overlap on both axes for two matches to agree
    pub min_overlap: u64,
    /// Maximum error rate of a local match
    pub error_rate: f64,
    /// Per-query match retention
    pub consolidation: ConsolidationPolicy,
    /// Collapse duplicate records before classifying
    pub dedup: bool,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            min_len: DEFAULT_MIN_LEN,
            min_overlap: DEFAULT_MIN_OVERLAP,
            error_rate: DEFAULT_ERROR_RATE,
            consolidation: ConsolidationPolicy::default(),
            dedup: false,
        }
    }
}

/// What happened to one input set before classification
#[derive(Debug, Clone, Serialize)]
pub struct SetReport {
    pub format: MatchFormat,
    pub records_read: usize,
    pub records_evaluated: usize,
    pub overabundant_queries: Vec<String>,
    pub disabled_queries: Vec<String>,
    pub duplicates_removed: usize,
}

/// Result of evaluating a test set against a truth set
#[derive(Debug, Clone)]
pub struct Evaluation {
    pub truth: SetReport,
    pub test: SetReport,
    pub classification: Classification,
}

/// Serializable overview of an [`Evaluation`]
#[derive(Debug, Clone, Serialize)]
pub struct EvaluationSummary {
    pub config: EvaluationConfig,
    pub truth: SetReport,
    pub test: SetReport,
    pub metrics: ClassificationMetrics,
}

impl Evaluation {
    pub fn summary(&self, config: &EvaluationConfig) -> EvaluationSummary {
        EvaluationSummary {
            config: config.clone(),
            truth: self.truth.clone(),
            test: self.test.clone(),
            metrics: self.classification.metrics(),
        }
    }
}

/// Compares test matches with truth matches
pub struct Evaluator<'a> {
    meta: &'a MetadataIndex,
    config: EvaluationConfig,
}

impl<'a> Evaluator<'a> {
    pub fn new(meta: &'a MetadataIndex, config: EvaluationConfig) -> Self {
        Self { meta, config }
    }

    pub fn config(&self) -> &EvaluationConfig {
        &self.config
    }

    /// Consolidate, sort and optionally deduplicate a set in place
    pub fn prepare(&self, set: &mut MatchSet) -> SetReport {
        let records_read = set.len();
        let consolidation = consolidate(set, &self.config.consolidation);
        set.sort();

        let duplicates_removed = if self.config.dedup { dedup(set) } else { 0 };
        if duplicates_removed > 0 {
            debug!("Removed {} duplicate records", duplicates_removed);
        }

        SetReport {
            format: set.format,
            records_read,
            records_evaluated: set.len(),
            overabundant_queries: consolidation.overabundant_queries,
            disabled_queries: consolidation.disabled_queries,
            duplicates_removed,
        }
    }

    /// Run the full comparison.
    ///
    /// Both sets are left in canonical order.
    pub fn evaluate(&self, truth: &mut MatchSet, test: &mut MatchSet) -> Evaluation {
        let truth_report = self.prepare(truth);
        let test_report = self.prepare(test);

        let classification = classify(
            &truth.matches,
            &test.matches,
            self.meta,
            self.config.min_overlap,
        );
        info!(
            "{} true positives, {} false positives, {} false negatives",
            classification.true_positives,
            classification.false_positives.len(),
            classification.false_negatives.len()
        );

        Evaluation {
            truth: truth_report,
            test: test_report,
            classification,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::alignment::tests::gff_match;
    use crate::metadata::store::tests::make_test_metadata;

    #[test]
    fn test_default_config() {
        let config = EvaluationConfig::default();
        assert_eq!(config.min_len, 150);
        assert_eq!(config.min_overlap, 50);
        assert!((config.error_rate - 0.025).abs() < f64::EPSILON);
        assert!(!config.consolidation.is_active());
        assert!(!config.dedup);
    }

    #[test]
    fn test_evaluate_unsorted_input() {
        let meta = make_test_metadata();
        let mut truth = MatchSet::new(
            MatchFormat::Gff,
            vec![
                gff_match(1, (400, 600), "Q3", (0, 200)),
                gff_match(0, (1000, 1200), "Q2", (0, 200)),
                gff_match(0, (100, 200), "Q1", (10, 110)),
            ],
        );
        let mut test = MatchSet::new(
            MatchFormat::Gff,
            vec![
                gff_match(0, (1050, 1250), "Q2", (50, 250)),
                gff_match(0, (150, 250), "Q1", (60, 160)),
            ],
        );

        let config = EvaluationConfig {
            min_overlap: 10,
            ..EvaluationConfig::default()
        };
        let evaluation = Evaluator::new(&meta, config).evaluate(&mut truth, &mut test);

        assert!(truth.is_sorted());
        assert_eq!(evaluation.classification.true_positives, 2);
        assert_eq!(evaluation.classification.false_negatives.len(), 1);
        assert!(evaluation.classification.false_positives.is_empty());
        assert_eq!(evaluation.truth.records_read, 3);
    }

    #[test]
    fn test_evaluate_consolidates_test_set() {
        let meta = make_test_metadata();
        let mut truth = MatchSet::new(
            MatchFormat::Gff,
            vec![gff_match(0, (0, 100), "Q", (0, 100))],
        );
        let mut test = MatchSet::new(
            MatchFormat::Gff,
            (0..5u64)
                .map(|i| gff_match(0, (i * 100, i * 100 + 100 - i), "Q", (0, 100 - i)))
                .collect(),
        );

        let config = EvaluationConfig {
            consolidation: ConsolidationPolicy::new(2, None),
            ..EvaluationConfig::default()
        };
        let evaluation = Evaluator::new(&meta, config).evaluate(&mut truth, &mut test);

        assert_eq!(evaluation.test.records_evaluated, 2);
        assert_eq!(evaluation.test.overabundant_queries, vec!["Q".to_string()]);
        assert_eq!(evaluation.classification.true_positives, 1);
        assert_eq!(evaluation.classification.false_positives.len(), 1);
    }

    #[test]
    fn test_evaluate_with_dedup() {
        let meta = make_test_metadata();
        let record = gff_match(0, (0, 100), "Q", (0, 100));
        let mut truth = MatchSet::new(MatchFormat::Gff, vec![record.clone()]);
        let mut test = MatchSet::new(MatchFormat::Gff, vec![record.clone(), record]);

        let config = EvaluationConfig {
            dedup: true,
            ..EvaluationConfig::default()
        };
        let evaluation = Evaluator::new(&meta, config).evaluate(&mut truth, &mut test);

        assert_eq!(evaluation.test.duplicates_removed, 1);
        assert_eq!(evaluation.classification.true_positives, 1);
    }
}
