use std::cmp::Ordering;

use crate::core::types::{MatchFormat, PercentIdentity, Strand};

/// Percent identities closer than this are considered equal
pub const IDENTITY_TOLERANCE: f64 = 0.001;

/// Source tag written into column 2 of GFF output
pub const GFF_SOURCE: &str = "Stellar";

/// Feature tag written into column 3 of GFF output
pub const GFF_FEATURE: &str = "eps-matches";

/// Format-specific payload carried through unmodified
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchDetail {
    /// BLAST tabular e-value column
    Blast { evalue: String },
    /// GFF attributes after `seq2Range`, e.g. `cigar=97M1D2M;mutations=14A,45G`
    Gff { attributes: String },
}

/// A single local alignment between a reference and a query sequence.
///
/// Coordinates are 0-based and half-open. Both input formats produce this
/// type, so everything downstream of parsing is format-agnostic.
#[derive(Debug, Clone)]
pub struct AlignmentMatch {
    /// Reference sequence id
    pub ref_id: String,

    /// Index of the reference sequence in the metadata
    pub ref_index: usize,

    pub ref_begin: u64,
    pub ref_end: u64,

    /// Percent identity, kept as written in the input
    pub percent_identity: PercentIdentity,

    pub strand: Strand,

    pub query_id: String,
    pub query_begin: u64,
    pub query_end: u64,

    pub detail: MatchDetail,
}

impl AlignmentMatch {
    /// Format the match was read from
    pub fn format(&self) -> MatchFormat {
        match self.detail {
            MatchDetail::Blast { .. } => MatchFormat::Blast,
            MatchDetail::Gff { .. } => MatchFormat::Gff,
        }
    }

    /// Length of the alignment on the reference
    pub fn ref_len(&self) -> u64 {
        self.ref_end.saturating_sub(self.ref_begin)
    }

    /// Canonical order: reference index, then reference begin, then reference end
    pub fn position_cmp(&self, other: &Self) -> Ordering {
        (self.ref_index, self.ref_begin, self.ref_end).cmp(&(
            other.ref_index,
            other.ref_begin,
            other.ref_end,
        ))
    }

    pub fn identity_equals(&self, other: &Self) -> bool {
        (self.percent_identity.value() - other.percent_identity.value()).abs() < IDENTITY_TOLERANCE
    }

    /// Whether two records describe the same alignment.
    ///
    /// The reference end and the format-specific payload are ignored.
    pub fn is_same_match(&self, other: &Self) -> bool {
        self.ref_id == other.ref_id
            && self.ref_begin == other.ref_begin
            && self.strand == other.strand
            && self.query_id == other.query_id
            && self.query_begin == other.query_begin
            && self.identity_equals(other)
    }

    /// E-value, if the record carries one
    pub fn evalue(&self) -> Option<&str> {
        match &self.detail {
            MatchDetail::Blast { evalue } => Some(evalue),
            MatchDetail::Gff { attributes } => gff_attribute(attributes, "eValue"),
        }
    }

    /// CIGAR string of a GFF record
    pub fn cigar(&self) -> Option<&str> {
        match &self.detail {
            MatchDetail::Gff { attributes } => gff_attribute(attributes, "cigar"),
            MatchDetail::Blast { .. } => None,
        }
    }

    /// Mutation list of a GFF record
    pub fn mutations(&self) -> Option<&str> {
        match &self.detail {
            MatchDetail::Gff { attributes } => gff_attribute(attributes, "mutations"),
            MatchDetail::Blast { .. } => None,
        }
    }

    /// Render the record as one line of its native format, without a newline
    pub fn to_line(&self) -> String {
        match &self.detail {
            MatchDetail::Blast { evalue } => format!(
                "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
                self.ref_id,
                self.ref_begin,
                self.ref_end,
                self.percent_identity,
                self.strand.blast_token(),
                evalue,
                self.query_id,
                self.query_begin,
                self.query_end,
            ),
            MatchDetail::Gff { attributes } => format!(
                "{}\t{GFF_SOURCE}\t{GFF_FEATURE}\t{}\t{}\t{}\t{}\t.\t{};seq2Range={},{};{}",
                self.ref_id,
                self.ref_begin,
                self.ref_end,
                self.percent_identity,
                self.strand.gff_token(),
                self.query_id,
                self.query_begin,
                self.query_end,
                attributes,
            ),
        }
    }
}

impl PartialEq for AlignmentMatch {
    fn eq(&self, other: &Self) -> bool {
        self.is_same_match(other)
    }
}

fn gff_attribute<'a>(attributes: &'a str, key: &str) -> Option<&'a str> {
    attributes.split(';').find_map(|field| {
        field
            .split_once('=')
            .filter(|(k, _)| *k == key)
            .map(|(_, v)| v)
    })
}

/// All matches read from one file, tagged with the file's format
#[derive(Debug, Clone)]
pub struct MatchSet {
    pub format: MatchFormat,
    pub matches: Vec<AlignmentMatch>,
}

impl MatchSet {
    pub fn new(format: MatchFormat, matches: Vec<AlignmentMatch>) -> Self {
        Self { format, matches }
    }

    /// Stable sort into canonical position order
    pub fn sort(&mut self) {
        self.matches.sort_by(AlignmentMatch::position_cmp);
    }

    pub fn is_sorted(&self) -> bool {
        self.matches
            .windows(2)
            .all(|w| w[0].position_cmp(&w[1]) != Ordering::Greater)
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn blast_match(
        ref_index: usize,
        ref_range: (u64, u64),
        query_id: &str,
        query_range: (u64, u64),
        strand: Strand,
    ) -> AlignmentMatch {
        AlignmentMatch {
            ref_id: format!("ref{ref_index}"),
            ref_index,
            ref_begin: ref_range.0,
            ref_end: ref_range.1,
            percent_identity: PercentIdentity::parse("97.5").unwrap(),
            strand,
            query_id: query_id.to_string(),
            query_begin: query_range.0,
            query_end: query_range.1,
            detail: MatchDetail::Blast {
                evalue: "1e-10".to_string(),
            },
        }
    }

    pub(crate) fn gff_match(
        ref_index: usize,
        ref_range: (u64, u64),
        query_id: &str,
        query_range: (u64, u64),
    ) -> AlignmentMatch {
        AlignmentMatch {
            detail: MatchDetail::Gff {
                attributes: "cigar=100M;mutations=".to_string(),
            },
            ..blast_match(ref_index, ref_range, query_id, query_range, Strand::Forward)
        }
    }

    #[test]
    fn test_position_order() {
        let a = blast_match(0, (100, 200), "q", (0, 100), Strand::Forward);
        let b = blast_match(0, (100, 250), "q", (0, 100), Strand::Forward);
        let c = blast_match(1, (0, 10), "q", (0, 10), Strand::Forward);

        assert_eq!(a.position_cmp(&b), Ordering::Less);
        assert_eq!(b.position_cmp(&c), Ordering::Less);
        assert_eq!(c.position_cmp(&a), Ordering::Greater);
    }

    #[test]
    fn test_equality_ignores_ref_end_and_payload() {
        let a = blast_match(0, (100, 200), "q", (0, 100), Strand::Forward);
        let mut b = gff_match(0, (100, 260), "q", (0, 100));
        b.percent_identity = PercentIdentity::parse("97.5004").unwrap();
        assert_eq!(a, b);

        b.query_begin = 1;
        assert_ne!(a, b);
    }

    #[test]
    fn test_equality_identity_tolerance() {
        let a = blast_match(0, (100, 200), "q", (0, 100), Strand::Forward);
        let mut b = a.clone();
        b.percent_identity = PercentIdentity::parse("97.51").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_gff_attribute_accessors() {
        let mut m = gff_match(0, (0, 10), "q", (0, 10));
        m.detail = MatchDetail::Gff {
            attributes: "eValue=4.05e-73;cigar=97M1D2M;mutations=14A,45G".to_string(),
        };
        assert_eq!(m.evalue(), Some("4.05e-73"));
        assert_eq!(m.cigar(), Some("97M1D2M"));
        assert_eq!(m.mutations(), Some("14A,45G"));
        assert_eq!(m.format(), MatchFormat::Gff);
    }

    #[test]
    fn test_to_line() {
        let m = blast_match(0, (100, 200), "Q1", (10, 110), Strand::Reverse);
        assert_eq!(m.to_line(), "ref0\t100\t200\t97.5\tminus\t1e-10\tQ1\t10\t110");

        let g = gff_match(0, (100, 200), "Q1", (10, 110));
        assert_eq!(
            g.to_line(),
            "ref0\tStellar\teps-matches\t100\t200\t97.5\t+\t.\tQ1;seq2Range=10,110;cigar=100M;mutations="
        );
    }

    #[test]
    fn test_match_set_sort() {
        let mut set = MatchSet::new(
            MatchFormat::Blast,
            vec![
                blast_match(1, (0, 10), "q", (0, 10), Strand::Forward),
                blast_match(0, (50, 60), "q", (0, 10), Strand::Forward),
                blast_match(0, (5, 60), "q", (0, 10), Strand::Forward),
            ],
        );
        assert!(!set.is_sorted());
        set.sort();
        assert!(set.is_sorted());
        assert_eq!(set.matches[0].ref_begin, 5);
        assert_eq!(set.matches[2].ref_index, 1);
    }
}
