use serde::{Deserialize, Serialize};

/// Strand of an alignment relative to the reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Strand {
    #[default]
    Forward,
    Reverse,
}

impl Strand {
    /// Parse a BLAST-style strand token ("plus"/"minus").
    ///
    /// Returns the strand and whether the token was recognized. Unrecognized
    /// tokens fall back to forward.
    pub fn from_blast_token(token: &str) -> (Self, bool) {
        match token {
            "minus" => (Self::Reverse, true),
            "plus" => (Self::Forward, true),
            _ => (Self::Forward, false),
        }
    }

    /// Parse a GFF strand column ("+"/"-").
    ///
    /// Returns the strand and whether the token was recognized. Unrecognized
    /// tokens fall back to forward.
    pub fn from_gff_token(token: &str) -> (Self, bool) {
        match token {
            "-" => (Self::Reverse, true),
            "+" => (Self::Forward, true),
            _ => (Self::Forward, false),
        }
    }

    pub fn blast_token(self) -> &'static str {
        match self {
            Self::Forward => "plus",
            Self::Reverse => "minus",
        }
    }

    pub fn gff_token(self) -> &'static str {
        match self {
            Self::Forward => "+",
            Self::Reverse => "-",
        }
    }
}

impl std::fmt::Display for Strand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.gff_token())
    }
}

/// Text format an alignment file is written in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchFormat {
    /// BLAST-like tabular output: 9 positional columns with an e-value
    Blast,
    /// Stellar GFF output: 9 columns with a `;`-delimited attribute blob
    Gff,
}

impl MatchFormat {
    /// Canonical file extension used when writing this format
    pub fn extension(self) -> &'static str {
        match self {
            Self::Blast => "txt",
            Self::Gff => "gff",
        }
    }

    /// Map a (lowercase) file extension to a format
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "gff" | "gff3" => Some(Self::Gff),
            "txt" | "tsv" | "blast" | "m8" => Some(Self::Blast),
            _ => None,
        }
    }
}

impl std::fmt::Display for MatchFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Blast => write!(f, "BLAST tabular"),
            Self::Gff => write!(f, "GFF"),
        }
    }
}

/// Percent identity of an alignment.
///
/// Keeps the text exactly as it was read, for writing back out, together
/// with its numeric value, for comparisons. The two cannot disagree: the
/// only ways to build one parse the text or format the value.
#[derive(Debug, Clone, PartialEq)]
pub struct PercentIdentity {
    text: String,
    value: f64,
}

impl PercentIdentity {
    /// Parse a decimal percent identity, surrounding whitespace ignored.
    ///
    /// Returns `None` if the text is not a finite number.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        let value = text.parse::<f64>().ok().filter(|v| v.is_finite())?;
        Some(Self {
            text: text.to_string(),
            value,
        })
    }

    /// Build from a numeric value, formatted with the shortest exact text
    pub fn from_value(value: f64) -> Option<Self> {
        Self::parse(&value.to_string())
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl std::fmt::Display for PercentIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}
