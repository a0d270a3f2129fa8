//! Coerce parser output into canonical transactions.
//!
//! Bad rows (unparseable date/amount, year outside 2000..=2100) are dropped
//! silently; only structurally missing columns are an error.

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use std::str::FromStr;
use tracing::debug;

use crate::error::SchemaError;
use crate::transaction::{month_of, RawTable, RawTransaction, Transaction, REQUIRED_COLUMNS};

pub const MIN_YEAR: i32 = 2000;
pub const MAX_YEAR: i32 = 2100;

/// Normalize typed parser rows. The schema is guaranteed by the type, so this never fails.
pub fn normalize(rows: Vec<RawTransaction>) -> Vec<Transaction> {
    let offered = rows.len();
    let out: Vec<Transaction> = rows
        .into_iter()
        .filter_map(|row| {
            let year = row.date.year();
            if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
                debug!(date = %row.date, "dropping row outside supported year range");
                return None;
            }
            Some(Transaction {
                month: month_of(row.date),
                date: row.date,
                amount: row.amount,
                description: row.description.trim().to_string(),
                institution: row.institution,
                account: row.account,
                source_file: row.source_file,
            })
        })
        .collect();

    if out.len() < offered {
        debug!(kept = out.len(), dropped = offered - out.len(), "normalized rows");
    }
    out
}

/// Normalize an untyped table whose headers name the canonical fields.
///
/// Fails only when a required column is absent from the header.
pub fn normalize_table(table: &RawTable) -> Result<Vec<Transaction>, SchemaError> {
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|c| table.column(c).is_none())
        .map(|c| c.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(SchemaError { missing });
    }

    // Checked above.
    let col = |name: &str| table.column(name).unwrap_or_default();
    let (date_c, amount_c, desc_c) = (col("date"), col("amount"), col("description"));
    let (inst_c, acct_c, src_c) = (col("institution"), col("account"), col("source_file"));

    let mut rows = Vec::with_capacity(table.len());
    for i in 0..table.len() {
        let (Some(date), Some(amount)) = (
            coerce_date(table.cell(i, date_c)),
            coerce_amount(table.cell(i, amount_c)),
        ) else {
            debug!(row = i, "dropping row with unparseable date or amount");
            continue;
        };

        rows.push(RawTransaction {
            date,
            amount,
            description: table.cell(i, desc_c).to_string(),
            institution: table.cell(i, inst_c).to_string(),
            account: table.cell(i, acct_c).to_string(),
            source_file: table.cell(i, src_c).to_string(),
        });
    }

    Ok(normalize(rows))
}

/// Parse a date cell; `None` when no known layout matches.
pub fn coerce_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    for fmt in ["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d);
        }
    }
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }
    None
}

/// Parse an amount cell: optional `$`, thousands commas, `-` or `(...)` for negatives.
pub fn coerce_amount(s: &str) -> Option<Decimal> {
    let mut s = s.trim();
    let mut negate = false;
    if let Some(inner) = s.strip_prefix('(').and_then(|r| r.strip_suffix(')')) {
        s = inner.trim();
        negate = true;
    }

    let cleaned: String = s.chars().filter(|c| *c != ',' && *c != '$').collect();
    if cleaned.is_empty() {
        return None;
    }

    let value = Decimal::from_str(&cleaned).ok()?;
    Some(if negate { -value } else { value })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(year: i32, description: &str) -> RawTransaction {
        RawTransaction {
            date: NaiveDate::from_ymd_opt(year, 6, 15).unwrap(),
            amount: Decimal::new(-1250, 2),
            description: description.to_string(),
            institution: "Bank of Hawaii".to_string(),
            account: "Checking".to_string(),
            source_file: "stmt.pdf".to_string(),
        }
    }

    fn canonical_table() -> RawTable {
        RawTable::new(REQUIRED_COLUMNS)
    }

    #[test]
    fn test_year_range_filter() {
        let out = normalize(vec![raw(1999, "a"), raw(2024, "b"), raw(2101, "c")]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].date.year(), 2024);
    }

    #[test]
    fn test_range_bounds_are_inclusive() {
        let out = normalize(vec![raw(2000, "a"), raw(2100, "b")]);
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn test_description_trimmed_and_month_derived() {
        let out = normalize(vec![raw(2024, "  POS Purchase  KTA SUPER STORES \n")]);
        assert_eq!(out[0].description, "POS Purchase  KTA SUPER STORES");
        assert_eq!(out[0].month, "2024-06");
    }

    #[test]
    fn test_missing_description_column_is_schema_error() {
        let mut table = RawTable::new(["date", "amount", "institution", "account", "source_file"]);
        table.push_row(["2024-01-02", "10.00", "X", "Y", "z.csv"]);

        let err = normalize_table(&table).unwrap_err();
        assert_eq!(err.missing, vec!["description".to_string()]);
    }

    #[test]
    fn test_empty_table_with_all_columns_is_ok() {
        let out = normalize_table(&canonical_table()).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_bad_cells_drop_rows_not_error() {
        let mut table = canonical_table();
        table.push_row(["2024-01-02", "10.00", "ok", "X", "Y", "z.csv"]);
        table.push_row(["not a date", "10.00", "bad date", "X", "Y", "z.csv"]);
        table.push_row(["2024-01-03", "ten", "bad amount", "X", "Y", "z.csv"]);
        table.push_row(["1999-12-31", "1.00", "too old", "X", "Y", "z.csv"]);
        table.push_row(["01/05/2024", "(1,234.50)", "  paren  ", "X", "Y", "z.csv"]);

        let out = normalize_table(&table).unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].description, "ok");
        assert_eq!(out[1].amount, Decimal::new(-123450, 2));
        assert_eq!(out[1].description, "paren");
        assert_eq!(out[1].month, "2024-01");
    }

    #[test]
    fn test_coerce_date_layouts() {
        let d = NaiveDate::from_ymd_opt(2026, 2, 7).unwrap();
        assert_eq!(coerce_date("2026-02-07"), Some(d));
        assert_eq!(coerce_date("02/07/2026"), Some(d));
        assert_eq!(coerce_date("2026-02-07 00:00:00"), Some(d));
        assert_eq!(coerce_date("2026-02-07T13:45:00"), Some(d));
        assert_eq!(coerce_date(""), None);
        assert_eq!(coerce_date("2026-13-01"), None);
    }

    #[test]
    fn test_coerce_amount_variants() {
        assert_eq!(coerce_amount("$1,050.25"), Some(Decimal::new(105025, 2)));
        assert_eq!(coerce_amount("-40"), Some(Decimal::new(-40, 0)));
        assert_eq!(coerce_amount("(12.00)"), Some(Decimal::new(-1200, 2)));
        assert_eq!(coerce_amount(" "), None);
        assert_eq!(coerce_amount("n/a"), None);
    }
}
