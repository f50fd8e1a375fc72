//! Reading and writing whole alignment files.
//!
//! The format of an input file is decided once, from its extension
//! (ignoring a trailing `.gz`/`.bgz`), or by inspecting the first record
//! when the extension is not recognized.

use std::ffi::OsStr;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use flate2::read::MultiGzDecoder;
use tracing::{debug, warn};

use crate::core::alignment::{AlignmentMatch, MatchSet};
use crate::core::types::{MatchFormat, Strand};
use crate::metadata::store::MetadataIndex;
use crate::parsing::blast::{parse_blast_fields, split_blast_line};
use crate::parsing::gff::{parse_gff_fields, GFF_FIELD_COUNT};
use crate::parsing::ParseError;

/// Check if the path is a gzipped file
#[allow(clippy::case_sensitive_file_extension_comparisons)] // Already lowercased
fn is_gzipped(path: &Path) -> bool {
    let path_str = path.to_string_lossy().to_lowercase();
    path_str.ends_with(".gz") || path_str.ends_with(".bgz")
}

/// Lowercase extension, looking through a compression suffix
fn format_extension(path: &Path) -> Option<String> {
    let inner = if is_gzipped(path) {
        Path::new(path.file_stem()?)
    } else {
        path
    };
    inner
        .extension()
        .and_then(OsStr::to_str)
        .map(str::to_lowercase)
}

/// Open a file for line-by-line reading, decompressing gzip input
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be opened.
pub fn open_input(path: &Path) -> Result<Box<dyn BufRead>, ParseError> {
    let file = File::open(path)?;
    if is_gzipped(path) {
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

fn is_data_line(line: &str) -> bool {
    !line.trim().is_empty() && !line.starts_with('#')
}

/// Guess the format of a record line.
///
/// Nine tab-separated columns with a `seq2Range=` attribute is GFF;
/// anything else is treated as BLAST tabular.
pub fn sniff_format(line: &str) -> MatchFormat {
    let fields: Vec<&str> = line.trim_end().split('\t').collect();
    if fields.len() == GFF_FIELD_COUNT && fields[8].contains("seq2Range=") {
        MatchFormat::Gff
    } else {
        MatchFormat::Blast
    }
}

/// Determine the format of an alignment file
///
/// # Errors
///
/// Returns `ParseError::Io` if the file has to be inspected and cannot be
/// read, or `ParseError::UnsupportedFormat` if it has an unknown extension
/// and no records to inspect.
pub fn detect_format(path: &Path) -> Result<MatchFormat, ParseError> {
    if let Some(format) = format_extension(path)
        .as_deref()
        .and_then(MatchFormat::from_extension)
    {
        return Ok(format);
    }

    for line in open_input(path)?.lines() {
        let line = line?;
        if is_data_line(&line) {
            let format = sniff_format(&line);
            debug!("Detected {} format for {}", format, path.display());
            return Ok(format);
        }
    }

    Err(ParseError::UnsupportedFormat(format!(
        "cannot determine format of {}",
        path.display()
    )))
}

/// Split a record line into fields according to its format
pub fn split_fields(format: MatchFormat, line: &str) -> Vec<&str> {
    match format {
        MatchFormat::Blast => split_blast_line(line),
        MatchFormat::Gff => line.split('\t').collect(),
    }
}

/// Parse one record line
///
/// # Errors
///
/// Returns the error of the format's field parser.
pub fn parse_match_line(
    format: MatchFormat,
    line: &str,
    meta: &MetadataIndex,
) -> Result<AlignmentMatch, ParseError> {
    let fields = split_fields(format, line);
    match format {
        MatchFormat::Blast => parse_blast_fields(&fields, meta),
        MatchFormat::Gff => parse_gff_fields(&fields, meta),
    }
}

fn strand_recognized(format: MatchFormat, line: &str) -> bool {
    let fields = split_fields(format, line);
    match format {
        MatchFormat::Blast => Strand::from_blast_token(fields[4]).1,
        MatchFormat::Gff => Strand::from_gff_token(fields[6]).1,
    }
}

/// Counts gathered while reading one input
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReadStats {
    /// Records parsed
    pub records: usize,

    /// Records whose strand token was not recognized and read as forward
    pub lenient_strands: usize,
}

/// Read every record from a reader, also returning what was counted along
/// the way
///
/// `source` names the input in error and warning messages.
///
/// # Errors
///
/// Returns the first parse error, wrapped with its line number.
pub fn read_matches_with_stats<R: BufRead>(
    reader: R,
    format: MatchFormat,
    meta: &MetadataIndex,
    source: &str,
) -> Result<(MatchSet, ReadStats), ParseError> {
    let mut matches = Vec::new();
    let mut stats = ReadStats::default();

    for (i, line) in reader.lines().enumerate() {
        // Line numbers in errors are 1-based for user friendliness
        let line_num = i + 1;
        let line = line.map_err(|e| ParseError::Io(e).at_line(source, line_num))?;
        let line = line.trim_end_matches(['\r', '\n']);
        if !is_data_line(line) {
            continue;
        }

        let record =
            parse_match_line(format, line, meta).map_err(|e| e.at_line(source, line_num))?;
        if !strand_recognized(format, line) {
            stats.lenient_strands += 1;
        }
        matches.push(record);
    }
    stats.records = matches.len();

    if stats.lenient_strands > 0 {
        warn!(
            "{}: {} records had an unrecognized strand and were read as forward",
            source, stats.lenient_strands
        );
    }

    Ok((MatchSet::new(format, matches), stats))
}

/// Read every record from a reader
///
/// `source` names the input in error messages.
///
/// # Errors
///
/// Returns the first parse error, wrapped with its line number.
pub fn read_matches_from<R: BufRead>(
    reader: R,
    format: MatchFormat,
    meta: &MetadataIndex,
    source: &str,
) -> Result<MatchSet, ParseError> {
    read_matches_with_stats(reader, format, meta, source).map(|(set, _)| set)
}

/// Read every record from an alignment file
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be read,
/// `ParseError::UnsupportedFormat` if its format cannot be determined, or
/// the first record parse error wrapped with its line number.
pub fn read_matches(path: &Path, meta: &MetadataIndex) -> Result<MatchSet, ParseError> {
    let format = detect_format(path)?;
    let reader = open_input(path)?;
    let set = read_matches_from(reader, format, meta, &path.display().to_string())?;
    debug!(
        "Read {} {} records from {}",
        set.len(),
        format,
        path.display()
    );
    Ok(set)
}

/// Write matches in their native format, one per line
///
/// # Errors
///
/// Returns any I/O error from the writer.
pub fn write_matches_to<W: Write>(
    mut writer: W,
    matches: &[AlignmentMatch],
) -> std::io::Result<()> {
    for m in matches {
        writeln!(writer, "{}", m.to_line())?;
    }
    writer.flush()
}

/// Write matches to a file, replacing it if it exists
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be written.
pub fn write_matches(path: &Path, matches: &[AlignmentMatch]) -> Result<(), ParseError> {
    let file = File::create(path)?;
    write_matches_to(BufWriter::new(file), matches)?;
    Ok(())
}
