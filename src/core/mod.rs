//! Core data types for alignment evaluation.
//!
//! - [`AlignmentMatch`]: A single local alignment, read from either supported format
//! - [`MatchSet`]: All matches from one file, tagged with the file's format
//! - [`Strand`], [`MatchFormat`]: Small shared enums
//!
//! ## Coordinates
//!
//! All coordinates are 0-based and half-open. Matches are kept in canonical
//! order `(reference index, reference begin, reference end)`, where the
//! reference index comes from the metadata of the searched database, not
//! from the order reference ids appear in a file.
//!
//! [`AlignmentMatch`]: alignment::AlignmentMatch
//! [`MatchSet`]: alignment::MatchSet
//! [`Strand`]: types::Strand
//! [`MatchFormat`]: types::MatchFormat

pub mod alignment;
pub mod types;
