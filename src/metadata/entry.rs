use serde::{Deserialize, Serialize};

/// A FASTA file the database was built from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceFile {
    /// Numerical file id
    pub id: usize,
    /// Input FASTA path
    pub path: String,
}

impl SequenceFile {
    pub fn new(id: usize, path: impl Into<String>) -> Self {
        Self {
            id,
            path: path.into(),
        }
    }
}

/// A single database sequence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceEntry {
    /// Id of the [`SequenceFile`] this sequence was read from
    pub file_id: usize,

    /// FASTA id
    pub id: String,

    /// 0-based index in the input FASTA, stable across runs
    pub index: usize,

    /// Sequence length
    pub length: u64,
}

impl SequenceEntry {
    pub fn new(file_id: usize, id: impl Into<String>, index: usize, length: u64) -> Self {
        Self {
            file_id,
            id: id.into(),
            index,
            length,
        }
    }
}

/// A partition of the database.
///
/// A segment either covers a stretch of a single sequence, or bins several
/// whole sequences together (in which case `start` is 0).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentEntry {
    /// Numerical segment id
    pub id: usize,

    /// Indices of the sequences this segment spans
    pub seq_indices: Vec<usize>,

    /// Start position in the sequence; 0 for multi-sequence bins
    pub start: u64,

    /// Segment length
    pub length: u64,
}

impl SegmentEntry {
    pub fn new(id: usize, seq_indices: Vec<usize>, start: u64, length: u64) -> Self {
        Self {
            id,
            seq_indices,
            start,
            length,
        }
    }

    /// Whether this segment spans more than one sequence
    pub fn is_bin(&self) -> bool {
        self.seq_indices.len() > 1
    }

    pub fn contains_sequence(&self, index: usize) -> bool {
        self.seq_indices.contains(&index)
    }

    /// Identifier built from the spanned sequences, start and length,
    /// e.g. `0_1_0_2000`
    pub fn unique_id(&self) -> String {
        let mut id = String::new();
        for index in &self.seq_indices {
            id.push_str(&index.to_string());
            id.push('_');
        }
        id.push_str(&format!("{}_{}", self.start, self.length));
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_unique_id() {
        assert_eq!(SegmentEntry::new(0, vec![3], 100, 50).unique_id(), "3_100_50");
        assert_eq!(
            SegmentEntry::new(1, vec![0, 1], 0, 2000).unique_id(),
            "0_1_0_2000"
        );
    }

    #[test]
    fn test_segment_bin() {
        let single = SegmentEntry::new(0, vec![3], 100, 50);
        let bin = SegmentEntry::new(1, vec![0, 1], 0, 2000);
        assert!(!single.is_bin());
        assert!(bin.is_bin());
        assert!(bin.contains_sequence(1));
        assert!(!bin.contains_sequence(3));
    }
}
