use std::io;

use thiserror::Error;

/// Error type for store access, schema validation, and report output failures.
///
/// Degenerate inputs inside the aggregation itself (single-observation
/// groups, zero denominators, no qualifying state) are not errors; they
/// resolve to sentinel values so analysis stays total.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("data store unavailable: {0}")]
    DataAccess(String),
    #[error("expected column '{0}' is missing from the store result")]
    Schema(String),
    #[error("report output rejected: {0}")]
    Render(#[from] io::Error),
    #[error("not enough data points ({points} < 2) for '{category}' to create a forecast")]
    InsufficientData { category: String, points: usize },
}
