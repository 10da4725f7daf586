use thiserror::Error;

use crate::range::{RangeKind, RangeView};

#[derive(Error, Debug)]
pub enum ChartError {
    /// Filtering left no usable point to chart.
    #[error("no data: every sample was missing or non-finite")]
    NoData,

    /// A domain was requested over an empty sample set.
    #[error("cannot compute a domain from an empty sample set")]
    EmptySamples,

    /// The requested comparison view needs a range the biomarker lacks.
    #[error("{view} view not available: missing {missing:?} range")]
    RangeUnavailable {
        view: RangeView,
        missing: Vec<RangeKind>,
    },

    #[error("invalid {kind} range [{min}, {max}]")]
    InvalidRange { kind: RangeKind, min: f64, max: f64 },

    #[error("invalid record: {0}")]
    InvalidRecord(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ChartError>;
