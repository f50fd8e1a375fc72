//! Option validation and output naming.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use crate::core::types::MatchFormat;
use crate::matching::engine::EvaluationConfig;

/// Largest accepted error rate
pub const MAX_ERROR_RATE: f64 = 0.1;

/// Invalid combination of evaluation options
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Minimum overlap {overlap} exceeds minimum match length {min_len}")]
    OverlapExceedsMinLength { overlap: u64, min_len: u64 },
    #[error("Error rate {0} is outside the range [0, {MAX_ERROR_RATE}]")]
    ErrorRateOutOfRange(f64),
    #[error("Disable threshold must be greater than zero")]
    ZeroDisableThreshold,
}

/// Check an evaluation configuration before any input is read
///
/// # Errors
///
/// Returns `ConfigError::OverlapExceedsMinLength` if the minimum overlap is
/// larger than the minimum match length, `ConfigError::ErrorRateOutOfRange`
/// if the error rate is not in `[0, 0.1]`, or
/// `ConfigError::ZeroDisableThreshold` if the disable threshold is zero.
pub fn validate_config(config: &EvaluationConfig) -> Result<(), ConfigError> {
    if config.min_overlap > config.min_len {
        return Err(ConfigError::OverlapExceedsMinLength {
            overlap: config.min_overlap,
            min_len: config.min_len,
        });
    }

    if !(0.0..=MAX_ERROR_RATE).contains(&config.error_rate) {
        return Err(ConfigError::ErrorRateOutOfRange(config.error_rate));
    }

    if config.consolidation.disable_threshold == Some(0) {
        return Err(ConfigError::ZeroDisableThreshold);
    }

    Ok(())
}

/// Output prefix used when none is given: the test path without its
/// extension. A compression suffix is removed along with the extension.
#[allow(clippy::case_sensitive_file_extension_comparisons)] // Already lowercased
#[must_use]
pub fn default_output_prefix(test_path: &Path) -> PathBuf {
    let lower = test_path.to_string_lossy().to_lowercase();
    let path = if lower.ends_with(".gz") || lower.ends_with(".bgz") {
        test_path.with_extension("")
    } else {
        test_path.to_path_buf()
    };
    path.with_extension("")
}

/// Extension of an input file as written, looking through a `.gz`/`.bgz`
/// suffix
fn input_extension(path: &Path) -> Option<&OsStr> {
    let ext = path.extension()?;
    let compressed = ext.eq_ignore_ascii_case("gz") || ext.eq_ignore_ascii_case("bgz");
    if compressed {
        Path::new(path.file_stem()?).extension()
    } else {
        Some(ext)
    }
}

/// Append `.<suffix>.<ext>` to a prefix, where `ext` is the input's own
/// extension or, failing that, the format's canonical one
fn with_suffix(prefix: &Path, suffix: &str, input: &Path, format: MatchFormat) -> PathBuf {
    let mut name = prefix.as_os_str().to_os_string();
    name.push(format!(".{suffix}."));
    match input_extension(input) {
        Some(ext) => name.push(ext),
        None => name.push(format.extension()),
    }
    PathBuf::from(name)
}

/// Paths of the two result files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    /// Truth matches not found in the test set
    pub missing: PathBuf,
    /// Test matches not found in the truth set
    pub only: PathBuf,
}

/// Name the result files for a prefix and the two inputs.
///
/// Each file keeps the extension of the input whose records it holds, minus
/// any compression suffix; outputs are never compressed.
#[must_use]
pub fn output_paths(
    prefix: &Path,
    truth: &Path,
    truth_format: MatchFormat,
    test: &Path,
    test_format: MatchFormat,
) -> OutputPaths {
    OutputPaths {
        missing: with_suffix(prefix, "missing", truth, truth_format),
        only: with_suffix(prefix, "only", test, test_format),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::consolidate::ConsolidationPolicy;

    #[test]
    fn test_validate_defaults() {
        assert!(validate_config(&EvaluationConfig::default()).is_ok());
    }

    #[test]
    fn test_overlap_exceeds_min_len() {
        let config = EvaluationConfig {
            min_len: 40,
            min_overlap: 50,
            ..EvaluationConfig::default()
        };
        assert!(matches!(
            validate_config(&config),
            Err(ConfigError::OverlapExceedsMinLength { .. })
        ));

        let equal = EvaluationConfig {
            min_len: 50,
            ..EvaluationConfig::default()
        };
        assert!(validate_config(&equal).is_ok());
    }

    #[test]
    fn test_error_rate_range() {
        for rate in [-0.01, 0.11, f64::NAN] {
            let config = EvaluationConfig {
                error_rate: rate,
                ..EvaluationConfig::default()
            };
            assert!(matches!(
                validate_config(&config),
                Err(ConfigError::ErrorRateOutOfRange(_))
            ));
        }

        for rate in [0.0, 0.1] {
            let config = EvaluationConfig {
                error_rate: rate,
                ..EvaluationConfig::default()
            };
            assert!(validate_config(&config).is_ok());
        }
    }

    #[test]
    fn test_zero_disable_threshold() {
        let config = EvaluationConfig {
            consolidation: ConsolidationPolicy::new(5, Some(0)),
            ..EvaluationConfig::default()
        };
        assert!(matches!(
            validate_config(&config),
            Err(ConfigError::ZeroDisableThreshold)
        ));
    }

    #[test]
    fn test_default_output_prefix() {
        assert_eq!(
            default_output_prefix(Path::new("/data/run1/test.gff")),
            PathBuf::from("/data/run1/test")
        );
        assert_eq!(
            default_output_prefix(Path::new("test.gff.gz")),
            PathBuf::from("test")
        );
        assert_eq!(default_output_prefix(Path::new("test")), PathBuf::from("test"));
    }

    #[test]
    fn test_output_paths_keep_input_extensions() {
        let paths = output_paths(
            Path::new("out/run.v2"),
            Path::new("data/truth.gff3"),
            MatchFormat::Gff,
            Path::new("data/run.m8"),
            MatchFormat::Blast,
        );
        assert_eq!(paths.missing, PathBuf::from("out/run.v2.missing.gff3"));
        assert_eq!(paths.only, PathBuf::from("out/run.v2.only.m8"));
    }

    #[test]
    fn test_output_paths_drop_compression_suffix() {
        let paths = output_paths(
            Path::new("run"),
            Path::new("truth.gff.gz"),
            MatchFormat::Gff,
            Path::new("test.TSV.BGZ"),
            MatchFormat::Blast,
        );
        assert_eq!(paths.missing, PathBuf::from("run.missing.gff"));
        assert_eq!(paths.only, PathBuf::from("run.only.TSV"));
    }

    #[test]
    fn test_output_paths_fall_back_to_format_extension() {
        let paths = output_paths(
            Path::new("run"),
            Path::new("truth"),
            MatchFormat::Gff,
            Path::new("test.gz"),
            MatchFormat::Blast,
        );
        assert_eq!(paths.missing, PathBuf::from("run.missing.gff"));
        assert_eq!(paths.only, PathBuf::from("run.only.txt"));
    }
}
