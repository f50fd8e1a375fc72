//! Comparison of test alignments with truth alignments.
//!
//! - [`overlap`]: whether two matches agree
//! - [`consolidate`]: per-query capping of repetitive matches
//! - [`classify`]: true positive / false positive / false negative split
//! - [`engine`]: [`Evaluator`](engine::Evaluator), which runs the steps in order
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::path::Path;
//! use alignment_evaluator::{EvaluationConfig, Evaluator, MetadataIndex};
//! use alignment_evaluator::parsing::io::read_matches;
//!
//! let meta = MetadataIndex::load(Path::new("ref.meta")).unwrap();
//! let mut truth = read_matches(Path::new("truth.gff"), &meta).unwrap();
//! let mut test = read_matches(Path::new("test.gff"), &meta).unwrap();
//!
//! let evaluator = Evaluator::new(&meta, EvaluationConfig::default());
//! let evaluation = evaluator.evaluate(&mut truth, &mut test);
//!
//! println!(
//!     "{} true positives, {} missed",
//!     evaluation.classification.true_positives,
//!     evaluation.classification.false_negatives.len()
//! );
//! ```

pub mod classify;
pub mod consolidate;
pub mod engine;
pub mod overlap;
