//! # alignment-evaluator
//!
//! A library for measuring the accuracy of local alignment search results.
//!
//! Approximate search tools trade sensitivity for speed, and judging that
//! trade-off needs a comparison against a set of alignments known to be
//! correct. `alignment-evaluator` reads a truth set and a test set, matches
//! them up by overlapping reference and query intervals, and reports which
//! truth alignments were missed and which test alignments have no
//! counterpart.
//!
//! ## Features
//!
//! - **Two input formats**: Stellar GFF and BLAST-like tabular output,
//!   plain or gzipped, detected per file
//! - **Overlap matching**: Alignments agree when they share query and strand
//!   and overlap on both the reference and the query
//! - **Consolidation**: Caps repetitive queries to their longest matches
//! - **Native output**: Missed and unmatched alignments are written back in
//!   the format they were read in
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::path::Path;
//! use alignment_evaluator::{EvaluationConfig, Evaluator, MetadataIndex};
//! use alignment_evaluator::parsing::io::read_matches;
//!
//! // Load the database metadata used to resolve sequence ids
//! let meta = MetadataIndex::load(Path::new("ref.meta")).unwrap();
//!
//! let mut truth = read_matches(Path::new("truth.gff"), &meta).unwrap();
//! let mut test = read_matches(Path::new("test.gff"), &meta).unwrap();
//!
//! let evaluator = Evaluator::new(&meta, EvaluationConfig::default());
//! let evaluation = evaluator.evaluate(&mut truth, &mut test);
//!
//! let metrics = evaluation.classification.metrics();
//! println!("sensitivity {:.3}, precision {:.3}", metrics.sensitivity, metrics.precision);
//! ```
//!
//! ## Modules
//!
//! - [`metadata`]: Reference database metadata
//! - [`core`]: Alignment match types
//! - [`parsing`]: Readers and writers for GFF and BLAST tabular files
//! - [`matching`]: Overlap, consolidation and classification
//! - [`cli`]: Command-line interface implementation

pub mod cli;
pub mod core;
pub mod matching;
pub mod metadata;
pub mod parsing;
pub mod utils;

// Re-export commonly used types for convenience
pub use crate::core::alignment::{AlignmentMatch, MatchDetail, MatchSet};
pub use crate::core::types::*;
pub use matching::engine::{Evaluation, EvaluationConfig, Evaluator};
pub use metadata::store::{MetadataError, MetadataIndex};
pub use parsing::ParseError;
