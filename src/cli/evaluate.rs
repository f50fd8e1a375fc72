//! Evaluate command - classify test alignments against truth alignments.

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use tracing::warn;

use crate::cli::OutputFormat;
use crate::matching::consolidate::ConsolidationPolicy;
use crate::matching::engine::{
    EvaluationConfig, EvaluationSummary, Evaluator, DEFAULT_ERROR_RATE, DEFAULT_MIN_LEN,
    DEFAULT_MIN_OVERLAP,
};
use crate::metadata::store::MetadataIndex;
use crate::parsing::io::{read_matches, write_matches};
use crate::utils::validation::{default_output_prefix, output_paths, validate_config, OutputPaths};

/// Arguments for the evaluate command
#[derive(Args)]
pub struct EvaluateArgs {
    /// Truth alignments (GFF or BLAST tabular, optionally gzipped)
    #[arg(long, required = true)]
    pub truth: PathBuf,

    /// Test alignments to evaluate (GFF or BLAST tabular, optionally gzipped)
    #[arg(long, required = true)]
    pub test: PathBuf,

    /// Reference metadata file
    #[arg(long, required = true)]
    pub ref_meta: PathBuf,

    /// Minimum length of a local match
    #[arg(short = 'l', long, default_value_t = DEFAULT_MIN_LEN)]
    pub min_len: u64,

    /// Minimum overlap between a truth and a test match, on both the
    /// reference and the query. Must not exceed --min-len
    #[arg(short = 'o', long, default_value_t = DEFAULT_MIN_OVERLAP)]
    pub overlap: u64,

    /// Maximum error rate of a local match, in [0, 0.1]
    #[arg(short = 'e', long, default_value_t = DEFAULT_ERROR_RATE)]
    pub error_rate: f64,

    /// Keep at most this many of the longest matches per query (0 = all).
    /// Only applies to GFF input
    #[arg(long, default_value_t = 0)]
    pub num_matches: usize,

    /// Drop all matches of queries with at least this many matches.
    /// Only applies together with --num-matches
    #[arg(long)]
    pub disable_thresh: Option<usize>,

    /// Prefix for the output files [default: test path without extension]
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Collapse duplicate records before comparing
    #[arg(long)]
    pub dedup: bool,
}

impl EvaluateArgs {
    pub fn to_config(&self) -> EvaluationConfig {
        EvaluationConfig {
            min_len: self.min_len,
            min_overlap: self.overlap,
            error_rate: self.error_rate,
            consolidation: ConsolidationPolicy::new(self.num_matches, self.disable_thresh),
            dedup: self.dedup,
        }
    }
}

/// Execute the evaluate command
///
/// # Errors
///
/// Returns an error if the options are invalid, an input cannot be read or
/// parsed, or an output file cannot be written.
#[allow(clippy::needless_pass_by_value)]
pub fn run(args: EvaluateArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let config = args.to_config();
    validate_config(&config)?;

    if args.disable_thresh.is_some() && args.num_matches == 0 {
        warn!("--disable-thresh has no effect without --num-matches");
    }

    let meta = MetadataIndex::load(&args.ref_meta)
        .with_context(|| format!("Failed to load metadata from {}", args.ref_meta.display()))?;
    if verbose {
        eprintln!(
            "Metadata: {} sequences, {} segments",
            meta.sequence_count(),
            meta.segment_count()
        );
    }

    let mut truth = read_matches(&args.truth, &meta)?;
    let mut test = read_matches(&args.test, &meta)?;
    if verbose {
        eprintln!(
            "Truth: {} {} records, test: {} {} records",
            truth.len(),
            truth.format,
            test.len(),
            test.format
        );
    }

    let evaluator = Evaluator::new(&meta, config);
    let evaluation = evaluator.evaluate(&mut truth, &mut test);

    let prefix = args
        .out
        .clone()
        .unwrap_or_else(|| default_output_prefix(&args.test));
    let paths = output_paths(&prefix, &args.truth, truth.format, &args.test, test.format);

    write_matches(&paths.missing, &evaluation.classification.false_negatives)
        .with_context(|| format!("Failed to write {}", paths.missing.display()))?;
    write_matches(&paths.only, &evaluation.classification.false_positives)
        .with_context(|| format!("Failed to write {}", paths.only.display()))?;

    let summary = evaluation.summary(evaluator.config());
    match format {
        OutputFormat::Text => print_text_summary(&args, &summary, &paths),
        OutputFormat::Json => print_json_summary(&args, &summary, &paths)?,
        OutputFormat::Tsv => print_tsv_summary(&args, &summary, &paths),
    }

    Ok(())
}

fn print_text_summary(args: &EvaluateArgs, summary: &EvaluationSummary, paths: &OutputPaths) {
    let metrics = &summary.metrics;

    println!(
        "\nEvaluation: {} vs {}",
        args.test.display(),
        args.truth.display()
    );
    println!(
        "\n   Truth: {} {} records, {} evaluated",
        summary.truth.records_read, summary.truth.format, summary.truth.records_evaluated
    );
    println!(
        "   Test:  {} {} records, {} evaluated",
        summary.test.records_read, summary.test.format, summary.test.records_evaluated
    );

    let disabled = summary.truth.disabled_queries.len() + summary.test.disabled_queries.len();
    let overabundant =
        summary.truth.overabundant_queries.len() + summary.test.overabundant_queries.len();
    if disabled + overabundant > 0 {
        println!("   Consolidation: {overabundant} queries capped, {disabled} queries disabled");
    }

    println!("\n   True positives:  {}", metrics.true_positives);
    println!(
        "   False positives: {} → {}",
        metrics.false_positives,
        paths.only.display()
    );
    println!(
        "   False negatives: {} → {}",
        metrics.false_negatives,
        paths.missing.display()
    );
    println!(
        "\n   Sensitivity: {:.2}%  Precision: {:.2}%",
        metrics.sensitivity * 100.0,
        metrics.precision * 100.0
    );
}

fn print_json_summary(
    args: &EvaluateArgs,
    summary: &EvaluationSummary,
    paths: &OutputPaths,
) -> anyhow::Result<()> {
    let output = serde_json::json!({
        "truth_file": args.truth.display().to_string(),
        "test_file": args.test.display().to_string(),
        "summary": summary,
        "outputs": {
            "missing": paths.missing.display().to_string(),
            "only": paths.only.display().to_string(),
        },
    });

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_tsv_summary(args: &EvaluateArgs, summary: &EvaluationSummary, paths: &OutputPaths) {
    let metrics = &summary.metrics;

    println!(
        "truth\ttest\ttruth_matches\ttest_matches\ttrue_positives\tfalse_positives\tfalse_negatives\tsensitivity\tprecision\tmissing_file\tonly_file"
    );
    println!(
        "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{:.4}\t{:.4}\t{}\t{}",
        args.truth.display(),
        args.test.display(),
        metrics.truth_matches,
        metrics.test_matches,
        metrics.true_positives,
        metrics.false_positives,
        metrics.false_negatives,
        metrics.sensitivity,
        metrics.precision,
        paths.missing.display(),
        paths.only.display()
    );
}
