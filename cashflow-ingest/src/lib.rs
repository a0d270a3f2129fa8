//! cashflow-ingest: statement parsers (CSV / PDF text) and format dispatch.

pub mod error;
pub mod parsers;
pub mod pdf_text;
pub mod types;
pub mod year;

use cashflow_core::{normalize, normalize_table, Transaction};
use std::path::Path;
use tracing::info;

pub use error::{IngestError, Result};
pub use types::{source_file_name, StatementFormat, StatementParser};

use parsers::{read_generic_csv, BoaCreditParser, BohCheckingParser, DiscoverCsvParser};

/// Knobs that affect parsing but are not part of a statement.
#[derive(Debug, Clone, Copy)]
pub struct IngestOptions {
    pub boa_fallback_year: i32,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            boa_fallback_year: parsers::boa_credit::DEFAULT_FALLBACK_YEAR,
        }
    }
}

/// Parse one statement file and normalize it into canonical transactions.
pub fn read_statement(
    path: &Path,
    format: StatementFormat,
    account: &str,
    institution: &str,
    options: &IngestOptions,
) -> Result<Vec<Transaction>> {
    if !path.is_file() {
        return Err(IngestError::FileNotFound(path.to_path_buf()));
    }

    let txns = match format {
        StatementFormat::BohPdf => normalize(BohCheckingParser.parse(path, account, institution)?),
        StatementFormat::BoaPdf => normalize(
            BoaCreditParser::new(options.boa_fallback_year).parse(path, account, institution)?,
        ),
        StatementFormat::DiscoverCsv => {
            normalize(DiscoverCsvParser.parse(path, account, institution)?)
        }
        StatementFormat::GenericCsv => {
            normalize_table(&read_generic_csv(path, account, institution)?)?
        }
    };

    info!(
        file = %path.display(),
        %format,
        rows = txns.len(),
        "parsed statement"
    );
    Ok(txns)
}
