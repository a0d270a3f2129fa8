use cashflow_core::RawTransaction;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::error::{IngestError, Result};

/// Statement layouts the ingester knows how to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatementFormat {
    /// Bank of Hawaii checking statement (narrative PDF)
    BohPdf,
    /// Bank of America credit card statement (column-aligned PDF)
    BoaPdf,
    /// Discover card CSV export
    DiscoverCsv,
    /// CSV with canonical column names
    GenericCsv,
}

impl StatementFormat {
    pub const ALL: [StatementFormat; 4] = [
        StatementFormat::BohPdf,
        StatementFormat::BoaPdf,
        StatementFormat::DiscoverCsv,
        StatementFormat::GenericCsv,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StatementFormat::BohPdf => "boh_pdf",
            StatementFormat::BoaPdf => "boa_pdf",
            StatementFormat::DiscoverCsv => "discover_csv",
            StatementFormat::GenericCsv => "generic_csv",
        }
    }

    /// Institution label used when the caller does not supply one.
    pub fn default_institution(&self) -> &'static str {
        match self {
            StatementFormat::BohPdf => "Bank of Hawaii",
            StatementFormat::BoaPdf => "Bank of America",
            StatementFormat::DiscoverCsv => "Discover",
            StatementFormat::GenericCsv => "Imported",
        }
    }
}

impl fmt::Display for StatementFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatementFormat {
    type Err = IngestError;

    fn from_str(s: &str) -> Result<Self> {
        StatementFormat::ALL
            .into_iter()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| IngestError::UnknownFormat(s.to_string()))
    }
}

/// Common contract for per-institution statement parsers.
///
/// `institution` and `account` are stamped on every row; `source_file` is the
/// base name of `path`.
pub trait StatementParser {
    fn parse(&self, path: &Path, account: &str, institution: &str) -> Result<Vec<RawTransaction>>;
}

/// Base file name used as the `source_file` provenance field.
pub fn source_file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
