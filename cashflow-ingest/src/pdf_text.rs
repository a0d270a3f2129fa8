//! Plain-text extraction from statement PDFs, one string per page.

use std::path::Path;
use tracing::debug;

use crate::error::{IngestError, Result};
use crate::types::source_file_name;

pub fn extract_pages(path: &Path) -> Result<Vec<String>> {
    let pages = pdf_extract::extract_text_by_pages(path).map_err(|e| IngestError::Pdf {
        file: source_file_name(path),
        message: e.to_string(),
    })?;
    debug!(file = %path.display(), pages = pages.len(), "extracted PDF text");
    Ok(pages)
}

/// Trimmed, non-blank lines of the given pages, in page order.
pub fn flatten_lines<S: AsRef<str>>(pages: &[S]) -> Vec<&str> {
    pages
        .iter()
        .flat_map(|p| p.as_ref().lines())
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect()
}
