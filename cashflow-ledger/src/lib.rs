//! cashflow-ledger: deduplicating transaction store and monthly report writers

pub mod chart;
pub mod error;
pub mod report;
pub mod store;

pub use chart::plot_monthly;
pub use error::{LedgerError, Result};
pub use report::write_monthly_csv;
pub use store::{AppendSummary, Store};
