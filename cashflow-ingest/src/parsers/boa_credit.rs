//! Bank of America credit card statement parser (column-aligned PDF)
//!
//! Each transaction is exactly one line:
//!   Trans  Post   Description                      Ref   Acct  Amount
//!   01/10  01/12  SAFEWAY #1234 HONOLULU HI        5521  7302  123.45
//!   01/15  01/16  PAYMENT - THANK YOU              8841  7302  -500.00
//!
//! Charges are listed positive and payments/credits negative, so the cashflow
//! is the negated literal amount. Rows have no year; it is inferred once per
//! document from the file name and the first-page header.

use cashflow_core::RawTransaction;
use chrono::NaiveDate;
use regex::Regex;
use rust_decimal::Decimal;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, warn};

use crate::error::Result;
use crate::pdf_text::extract_pages;
use crate::types::{source_file_name, StatementParser};
use crate::year::{resolve_year, YearPatterns, YearSource};

pub const DEFAULT_FALLBACK_YEAR: i32 = 2026;

#[derive(Debug, Clone, Copy)]
pub struct BoaCreditParser {
    /// Year used when neither the file name nor the header carries one.
    pub fallback_year: i32,
}

impl Default for BoaCreditParser {
    fn default() -> Self {
        Self {
            fallback_year: DEFAULT_FALLBACK_YEAR,
        }
    }
}

impl StatementParser for BoaCreditParser {
    fn parse(&self, path: &Path, account: &str, institution: &str) -> Result<Vec<RawTransaction>> {
        let pages = extract_pages(path)?;
        self.parse_pages(&pages, &source_file_name(path), account, institution)
    }
}

impl BoaCreditParser {
    pub fn new(fallback_year: i32) -> Self {
        Self { fallback_year }
    }

    /// Statement year for a document named `source_file` with first-page text `header`.
    pub fn statement_year(&self, source_file: &str, header: &str) -> Result<i32> {
        let patterns = YearPatterns::new()?;
        let from_file = patterns.from_filename(source_file);
        let from_header = patterns.from_header(header);

        let (year, source) = resolve_year(from_file, from_header, self.fallback_year);
        match source {
            YearSource::Fallback => warn!(
                file = source_file,
                year, "no statement year in file name or header, using fallback"
            ),
            _ => debug!(file = source_file, year, ?source, ?from_file, ?from_header, "statement year"),
        }
        Ok(year)
    }

    /// Parse already-extracted page texts; every page is scanned.
    pub fn parse_pages<S: AsRef<str>>(
        &self,
        pages: &[S],
        source_file: &str,
        account: &str,
        institution: &str,
    ) -> Result<Vec<RawTransaction>> {
        let header = pages.first().map(|p| p.as_ref()).unwrap_or("");
        let year = self.statement_year(source_file, header)?;

        let line_re = Regex::new(concat!(
            r"^(?P<trans>\d{2}/\d{2})\s+",
            r"(?P<post>\d{2}/\d{2})\s+",
            r"(?P<desc>.+?)\s+",
            r"(?P<reference>\d{4})\s+",
            r"(?P<acct>\d{4})\s+",
            r"(?P<amount>-?\d[\d,]*\.\d{2})$"
        ))?;

        let mut out = Vec::new();
        for line in pages.iter().flat_map(|p| p.as_ref().lines()) {
            let Some(caps) = line_re.captures(line.trim()) else {
                continue;
            };

            // Posting date is the one that lands on the statement.
            let date_str = format!("{}/{}", &caps["post"], year);
            let Ok(date) = NaiveDate::parse_from_str(&date_str, "%m/%d/%Y") else {
                debug!(file = source_file, date = %date_str, "skipping row with invalid date");
                continue;
            };
            let Ok(amount) = Decimal::from_str(&caps["amount"].replace(',', "")) else {
                continue;
            };

            out.push(RawTransaction {
                date,
                amount: -amount,
                description: caps["desc"].to_string(),
                institution: institution.to_string(),
                account: account.to_string(),
                source_file: source_file.to_string(),
            });
        }

        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE_ONE: &str = r#"
Bank of America
Customer Rewards Visa Signature
Statement Closing Date 02/07/26
Account # XXXX XXXX XXXX 7302
Transactions
01/10 01/12 SAFEWAY #1234 HONOLULU HI 5521 7302 123.45
01/15 01/16 PAYMENT - THANK YOU 8841 7302 -500.00
"#;

    const PAGE_TWO: &str = r#"
  01/20 01/21 AMAZON MKTPLACE PMTS 1111 7302 1,020.10
01/22 01/23 MISSING AMOUNT 1111 7302
02/28 02/30 BAD POSTING DATE 2222 7302 9.00
Total fees charged this period $0.00
"#;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_boa_rows_and_signs() {
        let parser = BoaCreditParser::default();
        let txns = parser
            .parse_pages(&[PAGE_ONE, PAGE_TWO], "eStmt_2026-02-07.pdf", "BoA Visa", "Bank of America")
            .unwrap();

        assert_eq!(txns.len(), 3);
        assert_eq!(txns[0].date, ymd(2026, 1, 12));
        assert_eq!(txns[0].amount, Decimal::new(-12345, 2));
        assert_eq!(txns[0].description, "SAFEWAY #1234 HONOLULU HI");

        assert_eq!(txns[1].amount, Decimal::new(50000, 2));
        assert_eq!(txns[2].amount, Decimal::new(-102010, 2));
        assert_eq!(txns[2].date, ymd(2026, 1, 21));
    }

    #[test]
    fn test_header_year_used_when_filename_has_none() {
        let parser = BoaCreditParser::new(2019);
        let txns = parser
            .parse_pages(&[PAGE_ONE], "statement.pdf", "BoA Visa", "Bank of America")
            .unwrap();
        assert_eq!(txns[0].date.format("%Y").to_string(), "2026");
    }

    #[test]
    fn test_filename_year_beats_distant_header_year() {
        let parser = BoaCreditParser::default();
        assert_eq!(parser.statement_year("boa-2023.pdf", "Closing Date 02/07/26").unwrap(), 2023);
        assert_eq!(parser.statement_year("boa-2025.pdf", "Closing Date 02/07/26").unwrap(), 2026);
    }

    #[test]
    fn test_fallback_year_when_no_source() {
        let parser = BoaCreditParser::new(2031);
        let page = "01/10 01/12 COFFEE 5521 7302 4.50\n";
        let txns = parser.parse_pages(&[page], "visa.pdf", "BoA Visa", "Bank of America").unwrap();
        assert_eq!(txns[0].date, ymd(2031, 1, 12));
    }
}
