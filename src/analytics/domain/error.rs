//! Error types for analytics requests.

use chrono::NaiveDate;
use thiserror::Error;

/// Rejected date ranges.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum RangeError {
    /// The end date precedes the start date.
    #[error("date range end {end} precedes start {start}")]
    Inverted {
        /// Requested start date.
        start: NaiveDate,
        /// Requested end date.
        end: NaiveDate,
    },

    /// Start and end coincide, leaving a zero-length range.
    #[error("date range starting and ending on {date} has zero length")]
    Empty {
        /// The coinciding date.
        date: NaiveDate,
    },
}

/// Errors returned by temporal aggregation.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum AnalyticsError {
    /// The requested range is invalid; aggregation did not run.
    #[error(transparent)]
    Range(#[from] RangeError),

    /// The caller cancelled the aggregation.
    #[error("aggregation cancelled after {completed_buckets} buckets")]
    Cancelled {
        /// Buckets completed before the cancellation was observed.
        completed_buckets: usize,
    },
}

/// Result type for analytics operations.
pub type AnalyticsResult<T> = Result<T, AnalyticsError>;
