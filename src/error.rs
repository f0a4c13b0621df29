//! Error types.
//!
//! Every fallible operation in the crate returns [`MtspError`]. Distance
//! lookups have their own [`DistanceError`] so that providers can report
//! failures without knowing about the optimizer.

use thiserror::Error;

use crate::ga::StopId;

/// Errors raised by a [`DistanceProvider`](crate::distance::DistanceProvider).
#[derive(Debug, Error)]
pub enum DistanceError {
    #[error("stop {stop} is outside the provider's address space of {size} stops")]
    UnknownStop { stop: StopId, size: usize },

    #[error("negative cost {cost} between stops {from} and {to}")]
    Negative { from: StopId, to: StopId, cost: f64 },

    #[error("malformed distance matrix: {0}")]
    MalformedMatrix(String),

    #[cfg(feature = "remote")]
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[cfg(feature = "remote")]
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },
}

/// Errors raised by the optimizer.
#[derive(Debug, Error)]
pub enum MtspError {
    /// Malformed construction parameters. Fatal, never retried.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A flat chromosome encoding does not describe a valid partition.
    ///
    /// This points at a bug in a genetic operator and is never repaired.
    #[error("structural violation: {0}")]
    StructuralViolation(String),

    #[error("distance lookup failed: {0}")]
    Distance(#[from] DistanceError),

    #[cfg(feature = "report")]
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "report")]
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[cfg(feature = "report")]
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl MtspError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        MtspError::InvalidArgument(msg.into())
    }

    pub(crate) fn structural(msg: impl Into<String>) -> Self {
        MtspError::StructuralViolation(msg.into())
    }
}
