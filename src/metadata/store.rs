use bincode::Options;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

use crate::metadata::entry::{SegmentEntry, SequenceEntry, SequenceFile};

#[derive(Error, Debug)]
pub enum MetadataError {
    #[error("Failed to read metadata: {0}")]
    Io(#[from] std::io::Error),

    #[error("Corrupt metadata: {0}")]
    Corrupt(String),

    #[error("Sequence metadata does not contain sequence {0} from alignment output")]
    UnknownSequence(String),

    #[error("Sequence {index} index out of range ({count} sequences)")]
    IndexOutOfRange { index: usize, count: usize },

    #[error("Segment {id} index out of range ({count} segments)")]
    SegmentOutOfRange { id: usize, count: usize },

    #[error("Can't order segment {0} by sequence: it bins multiple sequences")]
    MultiSequenceSegment(usize),
}

/// Snapshot schema version for compatibility checking
pub const METADATA_VERSION: u32 = 1;

#[derive(Deserialize)]
struct SnapshotHeader {
    version: u32,
}

/// Serializable metadata format
#[derive(Debug, Clone, Serialize, Deserialize)]
struct MetadataSnapshot {
    version: u32,
    total_len: u64,
    pattern_size: usize,
    files: Vec<SequenceFile>,
    sequences: Vec<SequenceEntry>,
    segments: Vec<SegmentEntry>,
}

/// Read-only description of a split sequence database.
///
/// Resolves FASTA ids to sequence indices and sequence indices to the
/// segments they were split into. There is no way to modify an index once
/// it has been built or loaded.
#[derive(Debug, Clone)]
pub struct MetadataIndex {
    total_len: u64,
    pattern_size: usize,
    files: Vec<SequenceFile>,
    sequences: Vec<SequenceEntry>,
    segments: Vec<SegmentEntry>,

    /// Index: FASTA id -> sequence index
    id_to_index: HashMap<String, usize>,

    /// Index: sequence index -> position in `sequences`
    index_to_position: Vec<usize>,
}

impl MetadataIndex {
    /// Build an index from its parts, checking that sequence indices are
    /// dense, ids are unique and segments reference known sequences.
    ///
    /// # Errors
    ///
    /// Returns `MetadataError::Corrupt` if any of those checks fail.
    pub fn new(
        total_len: u64,
        pattern_size: usize,
        files: Vec<SequenceFile>,
        sequences: Vec<SequenceEntry>,
        segments: Vec<SegmentEntry>,
    ) -> Result<Self, MetadataError> {
        let count = sequences.len();
        let mut index_to_position = vec![usize::MAX; count];
        let mut id_to_index = HashMap::with_capacity(count);

        for (position, seq) in sequences.iter().enumerate() {
            if seq.index >= count || index_to_position[seq.index] != usize::MAX {
                return Err(MetadataError::Corrupt(format!(
                    "sequence indices must be unique and within 0..{count}, found {} for {}",
                    seq.index, seq.id
                )));
            }
            index_to_position[seq.index] = position;

            if id_to_index.insert(seq.id.clone(), seq.index).is_some() {
                return Err(MetadataError::Corrupt(format!(
                    "sequence id {} appears more than once",
                    seq.id
                )));
            }
        }

        for (position, segment) in segments.iter().enumerate() {
            if segment.id != position {
                return Err(MetadataError::Corrupt(format!(
                    "segment at position {position} has id {}",
                    segment.id
                )));
            }
            if segment.seq_indices.is_empty() {
                return Err(MetadataError::Corrupt(format!(
                    "segment {} spans no sequences",
                    segment.id
                )));
            }
            if let Some(&bad) = segment.seq_indices.iter().find(|&&i| i >= count) {
                return Err(MetadataError::Corrupt(format!(
                    "segment {} references unknown sequence {bad}",
                    segment.id
                )));
            }
        }

        Ok(Self {
            total_len,
            pattern_size,
            files,
            sequences,
            segments,
            id_to_index,
            index_to_position,
        })
    }

    /// Load metadata from a binary snapshot
    ///
    /// # Errors
    ///
    /// Returns `MetadataError::Io` if the file cannot be read, or
    /// `MetadataError::Corrupt` if it does not decode, was written with a
    /// different schema version, or violates the index invariants.
    pub fn load(path: &Path) -> Result<Self, MetadataError> {
        let bytes = std::fs::read(path)?;
        Self::from_bytes(&bytes)
    }

    /// Decode metadata from snapshot bytes
    ///
    /// # Errors
    ///
    /// See [`MetadataIndex::load`].
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, MetadataError> {
        let header: SnapshotHeader = bincode::DefaultOptions::new()
            .with_fixint_encoding()
            .allow_trailing_bytes()
            .deserialize(bytes)
            .map_err(|e| MetadataError::Corrupt(format!("unreadable header: {e}")))?;

        if header.version != METADATA_VERSION {
            return Err(MetadataError::Corrupt(format!(
                "version mismatch (expected {METADATA_VERSION}, found {})",
                header.version
            )));
        }

        let snapshot: MetadataSnapshot = bincode::DefaultOptions::new()
            .with_fixint_encoding()
            .with_limit(bytes.len() as u64)
            .deserialize(bytes)
            .map_err(|e| MetadataError::Corrupt(e.to_string()))?;

        Self::new(
            snapshot.total_len,
            snapshot.pattern_size,
            snapshot.files,
            snapshot.sequences,
            snapshot.segments,
        )
    }

    /// Encode metadata as snapshot bytes
    ///
    /// # Errors
    ///
    /// Returns `MetadataError::Corrupt` if encoding fails.
    pub fn to_bytes(&self) -> Result<Vec<u8>, MetadataError> {
        let snapshot = MetadataSnapshot {
            version: METADATA_VERSION,
            total_len: self.total_len,
            pattern_size: self.pattern_size,
            files: self.files.clone(),
            sequences: self.sequences.clone(),
            segments: self.segments.clone(),
        };
        bincode::DefaultOptions::new()
            .with_fixint_encoding()
            .serialize(&snapshot)
            .map_err(|e| MetadataError::Corrupt(e.to_string()))
    }

    /// Write metadata to a binary snapshot
    ///
    /// # Errors
    ///
    /// Returns `MetadataError::Io` if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), MetadataError> {
        std::fs::write(path, self.to_bytes()?)?;
        Ok(())
    }

    /// Index of the sequence with this FASTA id
    ///
    /// # Errors
    ///
    /// Returns `MetadataError::UnknownSequence` if no sequence has this id.
    pub fn resolve_index(&self, id: &str) -> Result<usize, MetadataError> {
        self.id_to_index
            .get(id)
            .copied()
            .ok_or_else(|| MetadataError::UnknownSequence(id.to_string()))
    }

    /// Sequence with this index
    ///
    /// # Errors
    ///
    /// Returns `MetadataError::IndexOutOfRange` if `index` is not a sequence index.
    pub fn sequence(&self, index: usize) -> Result<&SequenceEntry, MetadataError> {
        self.index_to_position
            .get(index)
            .map(|&position| &self.sequences[position])
            .ok_or(MetadataError::IndexOutOfRange {
                index,
                count: self.sequences.len(),
            })
    }

    /// Segments that contain the sequence with this index
    ///
    /// # Errors
    ///
    /// Returns `MetadataError::IndexOutOfRange` if `index` is not a sequence index.
    pub fn segments_of(&self, index: usize) -> Result<Vec<&SegmentEntry>, MetadataError> {
        if index >= self.sequences.len() {
            return Err(MetadataError::IndexOutOfRange {
                index,
                count: self.sequences.len(),
            });
        }
        Ok(self
            .segments
            .iter()
            .filter(|segment| segment.contains_sequence(index))
            .collect())
    }

    /// Segment with this id
    ///
    /// # Errors
    ///
    /// Returns `MetadataError::SegmentOutOfRange` if there is no such segment.
    pub fn segment(&self, id: usize) -> Result<&SegmentEntry, MetadataError> {
        self.segments.get(id).ok_or(MetadataError::SegmentOutOfRange {
            id,
            count: self.segments.len(),
        })
    }

    /// Sequences by ascending index (the order of the input FASTA files)
    pub fn sequences_in_fasta_order(&self) -> impl Iterator<Item = &SequenceEntry> + '_ {
        self.index_to_position
            .iter()
            .map(move |&position| &self.sequences[position])
    }

    /// Sequences by ascending length; ties keep FASTA order
    pub fn sequences_by_length(&self) -> Vec<&SequenceEntry> {
        let mut ordered: Vec<_> = self.sequences_in_fasta_order().collect();
        ordered.sort_by_key(|seq| seq.length);
        ordered
    }

    /// Segments ordered by the sequence they cover
    ///
    /// # Errors
    ///
    /// Returns `MetadataError::MultiSequenceSegment` if any segment bins
    /// several sequences, since such segments have no single position.
    pub fn segments_in_fasta_order(&self) -> Result<Vec<&SegmentEntry>, MetadataError> {
        if let Some(bin) = self.segments.iter().find(|segment| segment.is_bin()) {
            return Err(MetadataError::MultiSequenceSegment(bin.id));
        }
        let mut ordered: Vec<_> = self.segments.iter().collect();
        ordered.sort_by_key(|segment| (segment.seq_indices[0], segment.start));
        Ok(ordered)
    }

    pub fn total_len(&self) -> u64 {
        self.total_len
    }

    pub fn pattern_size(&self) -> usize {
        self.pattern_size
    }

    pub fn files(&self) -> &[SequenceFile] {
        &self.files
    }

    pub fn sequences(&self) -> &[SequenceEntry] {
        &self.sequences
    }

    pub fn segments(&self) -> &[SegmentEntry] {
        &self.segments
    }

    pub fn sequence_count(&self) -> usize {
        self.sequences.len()
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }
}

impl std::fmt::Display for MetadataIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for seq in &self.sequences {
            writeln!(f, "{}\t{}\t{}", seq.id, seq.index, seq.length)?;
        }
        writeln!(f, "$")?;

        for segment in &self.segments {
            write!(f, "{}\t", segment.id)?;
            for index in &segment.seq_indices {
                write!(f, "{index}\t")?;
            }
            writeln!(f, "{}\t{}", segment.start, segment.length)?;
        }
        writeln!(f, "$")
    }
}
