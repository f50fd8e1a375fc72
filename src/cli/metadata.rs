//! Metadata command - show the contents of a reference metadata file.

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;

use crate::cli::OutputFormat;
use crate::metadata::store::MetadataIndex;

/// Arguments for the metadata command
#[derive(Args)]
pub struct MetadataArgs {
    /// Reference metadata file
    #[arg(required = true)]
    pub path: PathBuf,

    /// List sequences by ascending length instead of FASTA order
    #[arg(long)]
    pub by_length: bool,
}

/// Execute the metadata command
///
/// # Errors
///
/// Returns an error if the metadata file cannot be loaded or the sequence
/// list cannot be serialized.
#[allow(clippy::needless_pass_by_value)]
pub fn run(args: MetadataArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let meta = MetadataIndex::load(&args.path)
        .with_context(|| format!("Failed to load metadata from {}", args.path.display()))?;

    if verbose {
        eprintln!(
            "{}: {} files, {} sequences, {} segments, total length {}",
            args.path.display(),
            meta.files().len(),
            meta.sequence_count(),
            meta.segment_count(),
            meta.total_len()
        );
    }

    match format {
        OutputFormat::Text => print!("{meta}"),
        OutputFormat::Json => print_json(&meta, args.by_length)?,
        OutputFormat::Tsv => print_tsv(&meta, args.by_length)?,
    }

    Ok(())
}

fn print_json(meta: &MetadataIndex, by_length: bool) -> anyhow::Result<()> {
    let sequences = if by_length {
        meta.sequences_by_length()
    } else {
        meta.sequences_in_fasta_order().collect()
    };

    let output = serde_json::json!({
        "total_len": meta.total_len(),
        "pattern_size": meta.pattern_size(),
        "files": meta.files(),
        "sequences": sequences,
        "segments": meta.segments(),
    });

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_tsv(meta: &MetadataIndex, by_length: bool) -> anyhow::Result<()> {
    let sequences = if by_length {
        meta.sequences_by_length()
    } else {
        meta.sequences_in_fasta_order().collect()
    };

    println!("index\tid\tlength\tfile\tsegments");
    for seq in sequences {
        let segments: Vec<String> = meta
            .segments_of(seq.index)?
            .iter()
            .map(|s| s.id.to_string())
            .collect();
        let file = meta
            .files()
            .iter()
            .find(|f| f.id == seq.file_id)
            .map_or("", |f| f.path.as_str());

        println!(
            "{}\t{}\t{}\t{}\t{}",
            seq.index,
            seq.id,
            seq.length,
            file,
            segments.join(",")
        );
    }
    Ok(())
}
