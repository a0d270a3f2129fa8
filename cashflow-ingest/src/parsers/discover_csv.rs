//! Discover card CSV export parser
//!
//! Expected header:
//!   Trans. Date,Post Date,Description,Amount,Category
//!
//! `Amount` is the effect on the card balance (charges positive), so the
//! cashflow is its negation.

use cashflow_core::normalize::coerce_amount;
use cashflow_core::RawTransaction;
use chrono::NaiveDate;
use csv::StringRecord;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;

use crate::error::{IngestError, Result};
use crate::types::{source_file_name, StatementParser};

const DATE_COLUMN: &str = "Post Date";
const AMOUNT_COLUMN: &str = "Amount";
const DESCRIPTION_COLUMN: &str = "Description";

#[derive(Debug, Clone, Copy, Default)]
pub struct DiscoverCsvParser;

impl StatementParser for DiscoverCsvParser {
    fn parse(&self, path: &Path, account: &str, institution: &str) -> Result<Vec<RawTransaction>> {
        let file = File::open(path).map_err(|source| IngestError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        parse_discover_csv(file, &source_file_name(path), account, institution)
    }
}

fn find_column(headers: &StringRecord, name: &str, file: &str) -> Result<usize> {
    headers
        .iter()
        .position(|h| h.trim() == name)
        .ok_or_else(|| IngestError::MissingColumn {
            file: file.to_string(),
            column: name.to_string(),
        })
}

/// Parse a Discover export from any reader. Rows with an unparseable date or
/// amount are dropped.
pub fn parse_discover_csv<R: Read>(
    reader: R,
    source_file: &str,
    account: &str,
    institution: &str,
) -> Result<Vec<RawTransaction>> {
    let mut rdr = csv::ReaderBuilder::new().flexible(true).from_reader(reader);

    let headers = rdr.headers()?.clone();
    let date_c = find_column(&headers, DATE_COLUMN, source_file)?;
    let amount_c = find_column(&headers, AMOUNT_COLUMN, source_file)?;
    let desc_c = find_column(&headers, DESCRIPTION_COLUMN, source_file)?;

    let mut out = Vec::new();
    for (i, record) in rdr.records().enumerate() {
        let record = record?;

        let date = record
            .get(date_c)
            .and_then(|s| NaiveDate::parse_from_str(s.trim(), "%m/%d/%Y").ok());
        let amount = record.get(amount_c).and_then(coerce_amount);

        let (Some(date), Some(amount)) = (date, amount) else {
            debug!(file = source_file, row = i + 1, "skipping row with unparseable date or amount");
            continue;
        };

        out.push(RawTransaction {
            date,
            amount: -amount,
            description: record.get(desc_c).unwrap_or("").to_string(),
            institution: institution.to_string(),
            account: account.to_string(),
            source_file: source_file.to_string(),
        });
    }

    Ok(out)
}
