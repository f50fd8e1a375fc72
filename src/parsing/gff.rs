//! Parser for Stellar GFF alignment records.
//!
//! Format: `ref_id\tsource\tfeature\tref_begin\tref_end\tpident\tstrand\t.\tattributes`
//!
//! The attribute column holds the query id and range followed by the
//! alignment detail, with either four or five `;`-separated subfields:
//!
//! ```text
//! 1;seq2Range=1280,1378;cigar=97M1D2M;mutations=14A,45G,58T,92C
//! 1;seq2Range=1280,1378;eValue=4.05784e-73;cigar=97M1D2M;mutations=14A,45G,58T,92C
//! ```

use crate::core::alignment::{AlignmentMatch, MatchDetail};
use crate::core::types::Strand;
use crate::metadata::store::MetadataIndex;
use crate::parsing::{
    check_field_count, check_interval, parse_identity, parse_position, ParseError,
};

/// Number of columns in a GFF record
pub const GFF_FIELD_COUNT: usize = 9;

/// Query part of a GFF attribute column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GffAttributes {
    pub query_id: String,
    pub query_begin: u64,
    pub query_end: u64,
    /// Everything after `seq2Range`, joined with `;`
    pub alignment: String,
}

/// Parse the attribute column of a Stellar GFF record
///
/// # Errors
///
/// Returns `ParseError::MalformedAttribute` if the column does not have 4 or
/// 5 subfields or the `seq2Range` subfield cannot be read.
pub fn parse_attributes(column: &str) -> Result<GffAttributes, ParseError> {
    let subfields: Vec<&str> = column.split(';').collect();
    if subfields.len() != 4 && subfields.len() != 5 {
        return Err(ParseError::MalformedAttribute(column.to_string()));
    }

    let (query_begin, query_end) = subfields[1]
        .strip_prefix("seq2Range=")
        .and_then(|range| range.split_once(','))
        .and_then(|(begin, end)| Some((begin.parse::<u64>().ok()?, end.parse::<u64>().ok()?)))
        .ok_or_else(|| ParseError::MalformedAttribute(column.to_string()))?;

    Ok(GffAttributes {
        query_id: subfields[0].to_string(),
        query_begin,
        query_end,
        alignment: subfields[2..].join(";"),
    })
}

/// Build a match from the fields of one GFF record
///
/// # Errors
///
/// Returns `ParseError::MalformedRecord` if the field count is not 9 or a
/// coordinate or the percent identity does not parse,
/// `ParseError::MalformedAttribute` for a bad attribute column, and
/// `ParseError::Metadata` if the reference id is not in the metadata.
pub fn parse_gff_fields(
    fields: &[&str],
    meta: &MetadataIndex,
) -> Result<AlignmentMatch, ParseError> {
    check_field_count(fields, GFF_FIELD_COUNT)?;

    let ref_id = fields[0].to_string();
    let ref_index = meta.resolve_index(&ref_id)?;

    let ref_begin = parse_position(fields[3], "reference begin")?;
    let ref_end = parse_position(fields[4], "reference end")?;
    check_interval(ref_begin, ref_end, "reference")?;

    let percent_identity = parse_identity(fields[5])?;

    let (strand, _) = Strand::from_gff_token(fields[6]);

    let attributes = parse_attributes(fields[8])?;
    check_interval(attributes.query_begin, attributes.query_end, "query")?;

    Ok(AlignmentMatch {
        ref_id,
        ref_index,
        ref_begin,
        ref_end,
        percent_identity,
        strand,
        query_id: attributes.query_id,
        query_begin: attributes.query_begin,
        query_end: attributes.query_end,
        detail: MatchDetail::Gff {
            attributes: attributes.alignment,
        },
    })
}
