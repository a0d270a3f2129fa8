use thiserror::Error;

/// Input rows are missing whole canonical columns.
///
/// A parser contract violation, never raised for bad individual rows.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("missing required columns: {}", missing.join(", "))]
pub struct SchemaError {
    pub missing: Vec<String>,
}
