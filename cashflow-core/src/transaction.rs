//! Canonical transaction records and the raw shapes parsers hand to the normalizer

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Field names of the canonical schema, in persisted column order (minus `month`).
pub const REQUIRED_COLUMNS: [&str; 6] = [
    "date",
    "amount",
    "description",
    "institution",
    "account",
    "source_file",
];

/// One financial event after normalization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub date: NaiveDate,
    /// Positive = inflow (income/credit), negative = outflow (spend/debit)
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
    pub description: String,
    pub institution: String,
    pub account: String,
    /// Base name of the statement file the row came from
    pub source_file: String,
    /// `YYYY-MM`, derived from `date` by the normalizer
    pub month: String,
}

/// Identity of a transaction for deduplication.
pub type DedupKey<'a> = (NaiveDate, Decimal, &'a str, &'a str, &'a str, &'a str);

impl Transaction {
    /// Two rows with equal keys are the same transaction.
    pub fn dedup_key(&self) -> DedupKey<'_> {
        (
            self.date,
            self.amount,
            &self.description,
            &self.account,
            &self.institution,
            &self.source_file,
        )
    }

    pub fn is_income(&self) -> bool {
        self.amount.is_sign_positive() && !self.amount.is_zero()
    }

    pub fn is_spend(&self) -> bool {
        self.amount.is_sign_negative() && !self.amount.is_zero()
    }
}

/// `YYYY-MM` bucket for a date.
pub fn month_of(date: NaiveDate) -> String {
    format!("{:04}-{:02}", date.year(), date.month())
}

/// Parser output: every canonical field present and typed, `month` not yet derived.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTransaction {
    pub date: NaiveDate,
    pub amount: Decimal,
    pub description: String,
    pub institution: String,
    pub account: String,
    pub source_file: String,
}

/// Untyped tabular rows keyed by header name.
///
/// Used for CSV input whose columns are named after the canonical fields.
/// Short rows are padded with empty cells on read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push_row<I, S>(&mut self, cells: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rows.push(cells.into_iter().map(Into::into).collect());
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of a column by exact header name.
    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Cell at (`row`, `col`); out-of-range cells read as empty.
    pub fn cell(&self, row: usize, col: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Add `name` as a constant column unless the table already has it.
    pub fn fill_missing_column(&mut self, name: &str, value: &str) {
        if self.column(name).is_some() {
            return;
        }
        let width = self.headers.len();
        self.headers.push(name.to_string());
        for row in &mut self.rows {
            row.resize(width, String::new());
            row.push(value.to_string());
        }
    }
}

/// Per-month rollup of transactions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlySummary {
    pub month: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub net_cashflow: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub income: Decimal,
    /// Always >= 0
    #[serde(with = "rust_decimal::serde::str")]
    pub spend: Decimal,
    pub n_txn: usize,
}
