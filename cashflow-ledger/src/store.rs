//! Curated transaction dataset: one CSV file, rewritten in full on every append.
//!
//! Appends are a read-modify-write under an exclusive lock on `<file>.lock`.
//! The new contents go to `<file>.tmp` and are renamed over the dataset, so a
//! crash mid-write leaves the previous version in place.

use cashflow_core::{Transaction, REQUIRED_COLUMNS};
use std::collections::HashSet;
use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::{LedgerError, Result};

/// Outcome of one append.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppendSummary {
    /// Rows in the dataset before the append
    pub existing: usize,
    /// Rows handed to `append`
    pub offered: usize,
    /// Rows that were not duplicates
    pub added: usize,
    /// Rows in the dataset afterwards
    pub total: usize,
}

#[derive(Debug, Clone)]
pub struct Store {
    path: PathBuf,
}

impl Store {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Full dataset, in persisted order.
    pub fn read(&self) -> Result<Vec<Transaction>> {
        if !self.exists() {
            return Err(LedgerError::DatasetNotFound(self.path.clone()));
        }
        self.read_rows()
    }

    /// Append `rows` after the existing dataset and drop exact duplicates,
    /// keeping the first occurrence (existing rows win).
    pub fn append(&self, rows: &[Transaction]) -> Result<AppendSummary> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(LedgerError::io("create", dir))?;
        }

        let _guard = self.lock()?;

        let mut merged = if self.exists() {
            self.read_rows()?
        } else {
            Vec::new()
        };
        let existing = merged.len();
        merged.extend_from_slice(rows);

        // A hand-edited dataset may already hold duplicates, so old rows can
        // collapse too; only survivors from the new batch count as added.
        let keep = first_occurrences(&merged);
        let added = keep[existing..].iter().filter(|k| **k).count();
        let merged = retain_kept(merged, keep);
        let total = merged.len();
        self.write_atomic(&merged)?;

        let summary = AppendSummary {
            existing,
            offered: rows.len(),
            added,
            total,
        };
        info!(
            dataset = %self.path.display(),
            offered = summary.offered,
            added = summary.added,
            total = summary.total,
            "appended transactions"
        );
        Ok(summary)
    }

    fn sibling(&self, suffix: &str) -> PathBuf {
        let mut name: OsString = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(suffix);
        self.path.with_file_name(name)
    }

    /// Exclusive advisory lock held for the duration of an append; released on drop.
    fn lock(&self) -> Result<File> {
        let lock_path = self.sibling(".lock");
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&lock_path)
            .map_err(LedgerError::io("open", &lock_path))?;
        file.lock().map_err(LedgerError::io("lock", &lock_path))?;
        debug!(lock = %lock_path.display(), "acquired dataset lock");
        Ok(file)
    }

    fn read_rows(&self) -> Result<Vec<Transaction>> {
        let mut rdr = csv::Reader::from_path(&self.path).map_err(LedgerError::csv(&self.path))?;
        rdr.deserialize()
            .collect::<std::result::Result<Vec<Transaction>, _>>()
            .map_err(LedgerError::csv(&self.path))
    }

    fn write_atomic(&self, rows: &[Transaction]) -> Result<()> {
        let tmp = self.sibling(".tmp");
        let written = write_rows(&tmp, rows).and_then(|()| {
            fs::rename(&tmp, &self.path).map_err(LedgerError::io("replace", &self.path))
        });
        if written.is_err() && tmp.exists() {
            if let Err(e) = fs::remove_file(&tmp) {
                debug!(tmp = %tmp.display(), error = %e, "could not remove temp file");
            }
        }
        written
    }
}

fn write_rows(path: &Path, rows: &[Transaction]) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .map_err(LedgerError::csv(path))?;

    // Written by hand so an empty dataset still carries its header.
    let header = REQUIRED_COLUMNS.iter().copied().chain(["month"]);
    wtr.write_record(header).map_err(LedgerError::csv(path))?;
    for row in rows {
        wtr.serialize(row).map_err(LedgerError::csv(path))?;
    }
    wtr.flush().map_err(LedgerError::io("write", path))?;
    Ok(())
}

/// `true` at each index whose dedup key has not appeared earlier.
fn first_occurrences(rows: &[Transaction]) -> Vec<bool> {
    let mut seen = HashSet::with_capacity(rows.len());
    rows.iter().map(|r| seen.insert(r.dedup_key())).collect()
}

fn retain_kept(rows: Vec<Transaction>, keep: Vec<bool>) -> Vec<Transaction> {
    rows.into_iter()
        .zip(keep)
        .filter_map(|(row, keep)| keep.then_some(row))
        .collect()
}

/// Drop rows whose dedup key was already seen, preserving order.
pub fn dedup(rows: Vec<Transaction>) -> Vec<Transaction> {
    let keep = first_occurrences(&rows);
    retain_kept(rows, keep)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cashflow_core::month_of;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    fn txn(day: u32, cents: i64, description: &str) -> Transaction {
        let date = NaiveDate::from_ymd_opt(2026, 1, day).unwrap();
        Transaction {
            date,
            amount: Decimal::new(cents, 2),
            description: description.to_string(),
            institution: "Discover".to_string(),
            account: "Discover It".to_string(),
            source_file: "discover.csv".to_string(),
            month: month_of(date),
        }
    }

    fn temp_store() -> (tempfile::TempDir, Store) {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open(dir.path().join("curated").join("transactions.csv"));
        (dir, store)
    }

    #[test]
    fn test_read_missing_dataset() {
        let (_dir, store) = temp_store();
        assert!(matches!(store.read(), Err(LedgerError::DatasetNotFound(_))));
    }

    #[test]
    fn test_append_creates_dataset_and_round_trips() {
        let (_dir, store) = temp_store();
        let rows = vec![txn(3, -5000, "KTA"), txn(4, 250000, "PAYROLL, ACME \"INC\"")];

        let summary = store.append(&rows).unwrap();
        assert_eq!(summary, AppendSummary { existing: 0, offered: 2, added: 2, total: 2 });
        assert_eq!(store.read().unwrap(), rows);
    }

    #[test]
    fn test_duplicate_append_keeps_count() {
        let (_dir, store) = temp_store();
        store.append(&[txn(3, -5000, "KTA")]).unwrap();

        let summary = store.append(&[txn(3, -5000, "KTA"), txn(5, -100, "BUS")]).unwrap();
        assert_eq!(summary.added, 1);
        assert_eq!(summary.total, 2);

        let summary = store.append(&[txn(3, -5000, "KTA")]).unwrap();
        assert_eq!(summary.added, 0);
        assert_eq!(store.read().unwrap().len(), 2);
    }

    #[test]
    fn test_existing_row_wins_tie() {
        let (_dir, store) = temp_store();
        // month is not part of the key
        let mut old = txn(3, -5000, "KTA");
        old.month = "edited".to_string();
        store.append(&[old.clone(), txn(9, 100, "REFUND")]).unwrap();

        store.append(&[txn(3, -5000, "KTA")]).unwrap();
        let rows = store.read().unwrap();
        assert_eq!(rows[0], old);
        assert_eq!(rows[1].description, "REFUND");
    }

    #[test]
    fn test_dedup_collapses_within_batch() {
        let rows = dedup(vec![txn(1, 100, "A"), txn(1, 100, "A"), txn(1, 100, "B")]);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].description, "B");
    }

    #[test]
    fn test_empty_append_writes_header() {
        let (_dir, store) = temp_store();
        store.append(&[]).unwrap();
        let text = fs::read_to_string(store.path()).unwrap();
        assert_eq!(text.trim(), "date,amount,description,institution,account,source_file,month");
        assert!(store.read().unwrap().is_empty());
    }

    #[test]
    fn test_append_over_dataset_with_duplicate_rows() {
        let (_dir, store) = temp_store();
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        let row = "2026-01-03,-50.00,KTA,Discover,Discover It,discover.csv,2026-01\n";
        let text = format!("date,amount,description,institution,account,source_file,month\n{row}{row}");
        fs::write(store.path(), text).unwrap();

        let summary = store.append(&[]).unwrap();
        assert_eq!(summary, AppendSummary { existing: 2, offered: 0, added: 0, total: 1 });

        let summary = store.append(&[txn(3, -5000, "KTA"), txn(5, -100, "BUS")]).unwrap();
        assert_eq!(summary, AppendSummary { existing: 1, offered: 2, added: 1, total: 2 });
        assert_eq!(store.read().unwrap()[1].description, "BUS");
    }

    #[test]
    fn test_failed_write_removes_temp_file() {
        let (dir, store) = temp_store();
        // A directory at the dataset path makes the final rename fail.
        fs::create_dir_all(store.path().join("occupied")).unwrap();

        assert!(store.append(&[txn(3, -5000, "KTA")]).is_err());
        let names: Vec<_> = fs::read_dir(dir.path().join("curated"))
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert!(!names.iter().any(|n| n.ends_with(".tmp")));
    }

    #[test]
    fn test_no_temp_file_left_behind() {
        let (dir, store) = temp_store();
        store.append(&[txn(3, -5000, "KTA")]).unwrap();
        let names: Vec<_> = fs::read_dir(dir.path().join("curated"))
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert!(!names.iter().any(|n| n.ends_with(".tmp")));
    }
}
