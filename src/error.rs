use thiserror::Error;

/// Everything that can stop a statistics run.
///
/// Parse-class failures (`Parse`, `Json`) are kept apart from the logical
/// ones so a caller can tell a bad input file from a dataset that simply
/// cannot produce a given metric.
#[derive(Error, Debug)]
pub enum StatsError {
    #[error("invalid date for {field}: '{value}' (expected YYYY-MM-DD)")]
    Parse { field: &'static str, value: String },

    #[error("failed to parse input document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("no interval data: {0} is empty")]
    EmptyDataset(&'static str),

    #[error("{numerator} cannot be measured against {denominator}: zero-day span")]
    DegenerateAnchor {
        numerator: &'static str,
        denominator: &'static str,
    },
}

pub type Result<T> = std::result::Result<T, StatsError>;
