//! Parser for BLAST-like tabular alignment records.
//!
//! Format: `ref_id\tref_begin\tref_end\tpident\tstrand\tevalue\tquery_id\tquery_begin\tquery_end`
//!
//! Strand is `plus` or `minus`; any other token is read as forward. The
//! e-value is kept as written.

use crate::core::alignment::{AlignmentMatch, MatchDetail};
use crate::core::types::Strand;
use crate::metadata::store::MetadataIndex;
use crate::parsing::{
    check_field_count, check_interval, parse_identity, parse_position, ParseError,
};

/// Number of columns in a BLAST tabular record
pub const BLAST_FIELD_COUNT: usize = 9;

/// Split a line into fields. Tab-separated lines keep empty fields; lines
/// without tabs are split on whitespace.
pub fn split_blast_line(line: &str) -> Vec<&str> {
    if line.contains('\t') {
        line.split('\t').collect()
    } else {
        line.split_whitespace().collect()
    }
}

/// Build a match from the fields of one BLAST tabular record
///
/// # Errors
///
/// Returns `ParseError::MalformedRecord` if the field count is not 9 or a
/// coordinate or the percent identity does not parse, and
/// `ParseError::Metadata` if the reference id is not in the metadata.
pub fn parse_blast_fields(
    fields: &[&str],
    meta: &MetadataIndex,
) -> Result<AlignmentMatch, ParseError> {
    check_field_count(fields, BLAST_FIELD_COUNT)?;

    let ref_id = fields[0].to_string();
    let ref_index = meta.resolve_index(&ref_id)?;

    let ref_begin = parse_position(fields[1], "reference begin")?;
    let ref_end = parse_position(fields[2], "reference end")?;
    check_interval(ref_begin, ref_end, "reference")?;

    let percent_identity = parse_identity(fields[3])?;

    let (strand, _) = Strand::from_blast_token(fields[4]);

    let query_begin = parse_position(fields[7], "query begin")?;
    let query_end = parse_position(fields[8], "query end")?;
    check_interval(query_begin, query_end, "query")?;

    Ok(AlignmentMatch {
        ref_id,
        ref_index,
        ref_begin,
        ref_end,
        percent_identity,
        strand,
        query_id: fields[6].to_string(),
        query_begin,
        query_end,
        detail: MatchDetail::Blast {
            evalue: fields[5].to_string(),
        },
    })
}
