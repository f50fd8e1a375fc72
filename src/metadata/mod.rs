//! Metadata of a split sequence database.
//!
//! Alignment output refers to reference sequences by FASTA id. The metadata
//! written when the database was split maps each id to a stable 0-based
//! index and records which segments each sequence was divided into. The
//! index fixes the order in which reference sequences are evaluated.
//!
//! ## Example
//!
//! ```rust,no_run
//! use alignment_evaluator::MetadataIndex;
//! use std::path::Path;
//!
//! let meta = MetadataIndex::load(Path::new("ref_meta.bin")).unwrap();
//! let index = meta.resolve_index("NC_000081.7").unwrap();
//!
//! for segment in meta.segments_of(index).unwrap() {
//!     println!("{}", segment.unique_id());
//! }
//! ```
//!
//! ## Snapshot Format
//!
//! Metadata is stored as a bincode snapshot prefixed with a schema version
//! ([`store::METADATA_VERSION`]). Snapshots with a different version are
//! rejected rather than reinterpreted.

pub mod entry;
pub mod store;
