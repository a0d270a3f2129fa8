//! Monthly rollup written as CSV.

use cashflow_core::MonthlySummary;
use std::fs;
use std::path::Path;
use tracing::info;

use crate::error::{LedgerError, Result};

pub const MONTHLY_COLUMNS: [&str; 5] = ["month", "net_cashflow", "income", "spend", "n_txn"];

pub fn write_monthly_csv(summaries: &[MonthlySummary], path: &Path) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).map_err(LedgerError::io("create", dir))?;
    }

    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .map_err(LedgerError::csv(path))?;
    wtr.write_record(MONTHLY_COLUMNS).map_err(LedgerError::csv(path))?;
    for s in summaries {
        wtr.serialize(s).map_err(LedgerError::csv(path))?;
    }
    wtr.flush().map_err(LedgerError::io("write", path))?;

    info!(report = %path.display(), months = summaries.len(), "wrote monthly rollup");
    Ok(())
}
