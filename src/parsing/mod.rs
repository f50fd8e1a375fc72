//! Parsers for the two supported alignment formats.
//!
//! - **BLAST tabular** ([`blast`]): 9 positional columns
//!   `ref_id ref_begin ref_end pident strand evalue query_id query_begin query_end`
//!   with strand written as `plus`/`minus`
//! - **Stellar GFF** ([`gff`]): 9 tab-separated columns with the query
//!   coordinates packed into the attribute column,
//!   `query_id;seq2Range=<begin>,<end>;[eValue=...;]cigar=...;mutations=...`
//!
//! [`io`] reads whole files of either format (optionally gzip-compressed)
//! into a [`MatchSet`](crate::core::alignment::MatchSet) and writes matches
//! back out in their native format.
//!
//! ## Example
//!
//! ```rust,no_run
//! use alignment_evaluator::MetadataIndex;
//! use alignment_evaluator::parsing::io::read_matches;
//! use std::path::Path;
//!
//! let meta = MetadataIndex::load(Path::new("ref_meta.bin")).unwrap();
//! let truth = read_matches(Path::new("truth.gff"), &meta).unwrap();
//! println!("{} matches", truth.len());
//! ```

pub mod blast;
pub mod gff;
pub mod io;

use thiserror::Error;

use crate::core::types::PercentIdentity;
use crate::metadata::store::MetadataError;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed record: {0}")]
    MalformedRecord(String),

    #[error("Malformed GFF record attributes: {0}")]
    MalformedAttribute(String),

    #[error("Unsupported alignment format: {0}")]
    UnsupportedFormat(String),

    #[error(transparent)]
    Metadata(#[from] MetadataError),

    #[error("{path}:{line}: {source}")]
    AtLine {
        path: String,
        line: usize,
        source: Box<ParseError>,
    },
}

impl ParseError {
    /// Attach the location of the offending line
    pub fn at_line(self, path: impl Into<String>, line: usize) -> Self {
        Self::AtLine {
            path: path.into(),
            line,
            source: Box::new(self),
        }
    }

    /// The error without any location wrappers
    pub fn root(&self) -> &ParseError {
        match self {
            Self::AtLine { source, .. } => source.root(),
            other => other,
        }
    }
}

pub(crate) fn parse_position(field: &str, what: &str) -> Result<u64, ParseError> {
    field
        .trim()
        .parse()
        .map_err(|_| ParseError::MalformedRecord(format!("invalid {what}: '{field}'")))
}

pub(crate) fn parse_identity(field: &str) -> Result<PercentIdentity, ParseError> {
    PercentIdentity::parse(field).ok_or_else(|| {
        ParseError::MalformedRecord(format!("invalid percent identity: '{field}'"))
    })
}

pub(crate) fn check_interval(begin: u64, end: u64, axis: &str) -> Result<(), ParseError> {
    if begin > end {
        return Err(ParseError::MalformedRecord(format!(
            "{axis} begin {begin} is after end {end}"
        )));
    }
    Ok(())
}

pub(crate) fn check_field_count(fields: &[&str], expected: usize) -> Result<(), ParseError> {
    if fields.len() != expected {
        return Err(ParseError::MalformedRecord(format!(
            "expected {expected} fields, found {}",
            fields.len()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_identity() {
        assert!((parse_identity("97.7011").unwrap().value() - 97.7011).abs() < 1e-9);
        assert!(parse_identity("high").is_err());
        assert!(parse_identity("NaN").is_err());
    }

    #[test]
    fn test_root_unwraps_location() {
        let err = ParseError::MalformedAttribute("x".to_string()).at_line("a.gff", 3);
        assert_eq!(err.to_string(), "a.gff:3: Malformed GFF record attributes: x");
        assert!(matches!(err.root(), ParseError::MalformedAttribute(_)));
    }
}
