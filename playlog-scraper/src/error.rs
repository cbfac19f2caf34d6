//! Error types for playlog-scraper
//!
//! Errors are scoped by how far they reach:
//! - entry-local: `TimeError` skips one playlist line
//! - station-local: [`StationError`] fails one station, the run continues
//! - run-fatal: `playlog_common::Error` from the store, nothing is committed

use crate::adapters::AdapterError;
use playlog_common::time::TimeError;
use thiserror::Error;

/// Why a station produced no plays this run
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StationError {
    /// Every download attempt failed with a retryable error
    #[error("Gave up after {attempts} attempt(s): {last}")]
    AttemptsExhausted { attempts: u32, last: AdapterError },

    /// Non-retryable adapter failure (parse, unsupported tag)
    #[error(transparent)]
    Adapter(#[from] AdapterError),

    /// Station row is unusable, e.g. its UTC offset is out of range
    #[error("Invalid station configuration: {0}")]
    InvalidStation(#[from] TimeError),
}
