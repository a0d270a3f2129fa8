//! cashflow-core: canonical transaction schema, normalizer and monthly rollup

pub mod error;
pub mod normalize;
pub mod rollup;
pub mod transaction;

pub use error::SchemaError;
pub use normalize::{normalize, normalize_table};
pub use rollup::rollup;
pub use transaction::{
    month_of, DedupKey, MonthlySummary, RawTable, RawTransaction, Transaction, REQUIRED_COLUMNS,
};
