use cashflow_core::SchemaError;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, IngestError>;

#[derive(Debug, Error)]
pub enum IngestError {
    /// Format tag not recognised; raised before any file is touched.
    #[error("unknown statement format `{0}` (expected one of: boh_pdf, boa_pdf, discover_csv, generic_csv)")]
    UnknownFormat(String),

    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("{file}: missing column `{column}`")]
    MissingColumn { file: String, column: String },

    /// The statement cannot be anchored to a year.
    #[error("{file}: could not find statement closing date")]
    ClosingDateNotFound { file: String },

    #[error("{file}: PDF text extraction failed: {message}")]
    Pdf { file: String, message: String },

    #[error("reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("invalid line pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error(transparent)]
    Schema(#[from] SchemaError),
}
