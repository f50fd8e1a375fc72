//! Command-line interface for alignment-evaluator.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **evaluate**: Compare a test set of alignments with a truth set
//! - **metadata**: Show the contents of a reference metadata file
//!
//! ## Usage
//!
//! ```text
//! # Evaluate search results against a truth set
//! alignment-evaluator evaluate --truth truth.gff --test test.gff --ref-meta ref.meta
//!
//! # Cap repetitive queries and write results under a custom prefix
//! alignment-evaluator evaluate --truth truth.gff --test test.gff --ref-meta ref.meta \
//!     --num-matches 10 --disable-thresh 1000 --out results/run1
//!
//! # JSON summary for scripting
//! alignment-evaluator evaluate ... --format json
//!
//! # Inspect a metadata file
//! alignment-evaluator metadata ref.meta --format tsv
//! ```

use clap::{Parser, Subcommand};

pub mod evaluate;
pub mod metadata;

#[derive(Parser)]
#[command(name = "alignment-evaluator")]
#[command(author = "Fulcrum Genomics")]
#[command(version)]
#[command(about = "Evaluate the accuracy of local alignment search results")]
#[command(
    long_about = "alignment-evaluator compares the local alignments reported by a search tool with a truth set of alignments.\n\nEach test alignment is classified as a true or false positive, and each truth alignment as found or missed. Missed truth alignments and unmatched test alignments are written to files in their original format."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compare test alignments with truth alignments
    Evaluate(evaluate::EvaluateArgs),

    /// Show the contents of a reference metadata file
    Metadata(metadata::MetadataArgs),
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
}
