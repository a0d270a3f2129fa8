//! CSV whose headers are the canonical field names (any case), e.g. a
//! hand-edited export of the curated dataset.

use cashflow_core::RawTable;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::{IngestError, Result};
use crate::types::source_file_name;

pub fn read_generic_csv(path: &Path, account: &str, institution: &str) -> Result<RawTable> {
    let file = File::open(path).map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    read_generic_table(file, &source_file_name(path), account, institution)
}

/// Load rows into a [`RawTable`] with lower-cased, trimmed headers.
///
/// Provenance columns absent from the file are filled from the caller; the
/// data columns (`date`, `amount`, `description`) are left for the normalizer
/// to check.
pub fn read_generic_table<R: Read>(
    reader: R,
    source_file: &str,
    account: &str,
    institution: &str,
) -> Result<RawTable> {
    let mut rdr = csv::ReaderBuilder::new().flexible(true).from_reader(reader);

    let headers = rdr
        .headers()?
        .iter()
        .map(|h| h.trim().to_lowercase())
        .collect::<Vec<_>>();
    let mut table = RawTable::new(headers);

    for record in rdr.records() {
        table.push_row(record?.iter());
    }

    table.fill_missing_column("institution", institution);
    table.fill_missing_column("account", account);
    table.fill_missing_column("source_file", source_file);
    Ok(table)
}
