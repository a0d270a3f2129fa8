//! Bank of Hawaii checking statement parser (narrative PDF)
//!
//! All transactions live on the first two pages, DEBITS then CREDITS. A row
//! starts with a `MM-DD <kind> <amount>` line and its description continues
//! on the following lines:
//!
//!   This statement: January 14, 2026
//!   DEBITS
//!   12-18 POS Purchase 45.67
//!   KTA SUPER STORES
//!   HILO HI
//!   PPaaggee 11 ooff 33
//!   CREDITS
//!   01-05 Direct Deposit 2,500.00
//!   ACME CORP PAYROLL
//!
//! Rows carry no year: it comes from the "This statement:" caption, minus one
//! for months after the closing month (December rows on a January statement).

use cashflow_core::RawTransaction;
use chrono::{Month, NaiveDate};
use regex::Regex;
use rust_decimal::Decimal;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, warn};

use crate::error::{IngestError, Result};
use crate::pdf_text::{extract_pages, flatten_lines};
use crate::types::{source_file_name, StatementParser};

/// Pages that hold the DEBITS and CREDITS sections.
const SCANNED_PAGES: usize = 2;

const SECTION_MARKERS: [&str; 2] = ["CREDITS", "DEBITS"];

#[derive(Debug, Clone, Copy, Default)]
pub struct BohCheckingParser;

impl StatementParser for BohCheckingParser {
    fn parse(&self, path: &Path, account: &str, institution: &str) -> Result<Vec<RawTransaction>> {
        let pages = extract_pages(path)?;
        parse_boh_pages(&pages, &source_file_name(path), account, institution)
    }
}

/// Month and year of the statement closing date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClosingDate {
    pub year: i32,
    pub month: u32,
}

impl ClosingDate {
    /// Year for a row dated `month` on this statement.
    pub fn year_for(&self, month: u32) -> i32 {
        if month > self.month {
            self.year - 1
        } else {
            self.year
        }
    }
}

fn find_closing_date(text: &str) -> Result<Option<ClosingDate>> {
    let re = Regex::new(r"This statement:\s+([A-Za-z]+)\s+(\d{1,2}),\s+(\d{4})")?;
    let Some(caps) = re.captures(text) else {
        return Ok(None);
    };

    let month = Month::from_str(&caps[1]).ok().map(|m| m.number_from_month());
    let year = caps[3].parse::<i32>().ok();
    Ok(month.zip(year).map(|(month, year)| ClosingDate { year, month }))
}

/// A header line and the description lines collected after it.
#[derive(Debug, Clone, PartialEq)]
struct PendingEntry {
    month: u32,
    day: u32,
    kind: String,
    amount: Decimal,
    continuation: Vec<String>,
}

#[derive(Debug)]
enum ScanState {
    SeekingHeader,
    Accumulating(PendingEntry),
}

/// Line classifier for the transaction listing. Constructed only once the
/// statement has been anchored to a closing date.
struct Scanner {
    header: Regex,
    page_noise: Regex,
    state: ScanState,
    done: Vec<PendingEntry>,
}

impl Scanner {
    fn new() -> Result<Self> {
        Ok(Self {
            header: Regex::new(r"^(\d{2})-(\d{2})\s+(.+?)\s+(\d[\d,]*\.\d{2})$")?,
            // pdf text duplicates every glyph of the footer: "PPaaggee 11 ooff 33"
            page_noise: Regex::new(r"^(?:PPaaggee|Page)\s+\d+\s+(?:ooff|of)\s+\d+$")?,
            state: ScanState::SeekingHeader,
            done: Vec::new(),
        })
    }

    fn header_entry(&self, line: &str) -> Option<PendingEntry> {
        let caps = self.header.captures(line)?;
        Some(PendingEntry {
            month: caps[1].parse().ok()?,
            day: caps[2].parse().ok()?,
            kind: caps[3].to_string(),
            amount: Decimal::from_str(&caps[4].replace(',', "")).ok()?,
            continuation: Vec::new(),
        })
    }

    fn feed(&mut self, line: &str) {
        let header = self.header_entry(line);
        let state = std::mem::replace(&mut self.state, ScanState::SeekingHeader);

        self.state = match (state, header) {
            (ScanState::SeekingHeader, Some(next)) => ScanState::Accumulating(next),
            (ScanState::Accumulating(pending), Some(next)) => {
                self.done.push(pending);
                ScanState::Accumulating(next)
            }
            (ScanState::SeekingHeader, None) => ScanState::SeekingHeader,
            (ScanState::Accumulating(mut pending), None) => {
                if SECTION_MARKERS.iter().any(|m| line.contains(m)) {
                    // The marker stays out of the description, and with it out of the dedup key.
                    self.done.push(pending);
                    ScanState::SeekingHeader
                } else {
                    if !self.page_noise.is_match(line) {
                        pending.continuation.push(line.to_string());
                    }
                    ScanState::Accumulating(pending)
                }
            }
        };
    }

    fn finish(mut self) -> Vec<PendingEntry> {
        if let ScanState::Accumulating(pending) = self.state {
            self.done.push(pending);
        }
        self.done
    }
}

/// Parse already-extracted page texts. Only the first two pages are read.
pub fn parse_boh_pages<S: AsRef<str>>(
    pages: &[S],
    source_file: &str,
    account: &str,
    institution: &str,
) -> Result<Vec<RawTransaction>> {
    let scanned = &pages[..pages.len().min(SCANNED_PAGES)];
    let combined = scanned
        .iter()
        .map(|p| p.as_ref())
        .collect::<Vec<&str>>()
        .join("\n");

    let closing = find_closing_date(&combined)?.ok_or_else(|| IngestError::ClosingDateNotFound {
        file: source_file.to_string(),
    })?;
    debug!(file = source_file, ?closing, "statement closing date");

    let mut scanner = Scanner::new()?;
    for line in flatten_lines(scanned) {
        scanner.feed(line);
    }

    let mut out = Vec::new();
    for entry in scanner.finish() {
        let year = closing.year_for(entry.month);
        let Some(date) = NaiveDate::from_ymd_opt(year, entry.month, entry.day) else {
            warn!(
                file = source_file,
                month = entry.month,
                day = entry.day,
                "skipping row with invalid calendar date"
            );
            continue;
        };

        let amount = if entry.kind.contains("Debit") || entry.kind.contains("POS Purchase") {
            -entry.amount
        } else {
            entry.amount
        };

        let description = format!("{} {}", entry.kind, entry.continuation.join(" "))
            .trim()
            .to_string();

        out.push(RawTransaction {
            date,
            amount,
            description,
            institution: institution.to_string(),
            account: account.to_string(),
            source_file: source_file.to_string(),
        });
    }

    Ok(out)
}
