use cashflow_core::{normalize, rollup};
use cashflow_ingest::parsers::boh_checking::parse_boh_pages;
use cashflow_ingest::{read_statement, IngestOptions, StatementFormat};
use cashflow_ledger::{write_monthly_csv, LedgerError, Store};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::path::PathBuf;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .join("fixtures")
        .join(name)
}

fn discover_rows() -> Vec<cashflow_core::Transaction> {
    read_statement(
        &fixture("Discover-Statement-2026-01.csv"),
        StatementFormat::DiscoverCsv,
        "Discover It",
        "Discover",
        &IngestOptions::default(),
    )
    .unwrap()
}

/// Re-ingesting the same statement leaves the dataset unchanged.
#[test]
fn test_ingest_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let store = Store::open(dir.path().join("data/curated/transactions.csv"));

    let rows = discover_rows();
    assert_eq!(rows.len(), 5, "row without a post date is dropped");

    let first = store.append(&rows).unwrap();
    let second = store.append(&discover_rows()).unwrap();

    assert_eq!(first.total, 5);
    assert_eq!(second.added, 0);
    assert_eq!(second.total, first.total);
    assert_eq!(store.read().unwrap(), rows);
}

/// Full pipeline from two institutions to the monthly report.
#[test]
fn test_rollup_across_institutions() {
    let dir = tempfile::tempdir().unwrap();
    let store = Store::open(dir.path().join("transactions.csv"));

    store.append(&discover_rows()).unwrap();

    let text = std::fs::read_to_string(fixture("boh_statement_2026-01.txt")).unwrap();
    let pages: Vec<&str> = text.split('\u{c}').collect();
    let boh = parse_boh_pages(&pages, "boh_statement_2026-01.pdf", "BoH Checking", "Bank of Hawaii")
        .unwrap();
    assert_eq!(boh.len(), 5);
    store.append(&normalize(boh)).unwrap();

    let txns = store.read().unwrap();
    assert_eq!(txns.len(), 10);

    let months = rollup(&txns);
    assert_eq!(months.len(), 2);

    // Discover: airline 312.40; BoH: 45.67 + 1200.00
    let dec = &months[0];
    assert_eq!(dec.month, "2025-12");
    assert_eq!(dec.n_txn, 3);
    assert_eq!(dec.spend, Decimal::new(155807, 2));
    assert_eq!(dec.income, Decimal::ZERO);
    assert_eq!(dec.net_cashflow, Decimal::new(-155807, 2));

    // Discover: -50 +250 -18.25 +21.99; BoH: -60 +2500 +150
    let jan = &months[1];
    assert_eq!(jan.month, "2026-01");
    assert_eq!(jan.n_txn, 7);
    assert_eq!(jan.income, Decimal::new(292199, 2));
    assert_eq!(jan.spend, Decimal::new(12825, 2));
    assert_eq!(jan.net_cashflow, Decimal::new(279374, 2));

    let boh_dec = txns
        .iter()
        .find(|t| t.description.starts_with("POS Purchase KTA"))
        .unwrap();
    assert_eq!(boh_dec.date, NaiveDate::from_ymd_opt(2025, 12, 18).unwrap());

    let report = dir.path().join("reports/monthly_rollup.csv");
    write_monthly_csv(&months, &report).unwrap();
    let csv = std::fs::read_to_string(&report).unwrap();
    assert!(csv.starts_with("month,net_cashflow,income,spend,n_txn\n2025-12,"));
}

#[test]
fn test_report_before_ingest_fails() {
    let dir = tempfile::tempdir().unwrap();
    let store = Store::open(dir.path().join("transactions.csv"));
    assert!(matches!(store.read(), Err(LedgerError::DatasetNotFound(_))));
}
