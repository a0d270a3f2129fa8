pub mod boa_credit;
pub mod boh_checking;
pub mod discover_csv;
pub mod generic_csv;

pub use boa_credit::BoaCreditParser;
pub use boh_checking::BohCheckingParser;
pub use discover_csv::DiscoverCsvParser;
pub use generic_csv::read_generic_csv;
