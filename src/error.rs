//! Error types of the crate.
//!
//! The computation is deterministic and offline, so there are no retries:
//! any failure aborts the call and is surfaced to the caller as one of the
//! two variants below. Either all results are produced or none are.

use thiserror::Error;

/// Errors returned by the ordering and extraction engines.
#[derive(Error, Debug)]
pub enum OpticsError {
    /// invalid parameters or malformed input shape
    #[error("configuration error : {0}")]
    Configuration(String),
    /// unknown or inapplicable distance metric, propagated from the distance computation
    #[error("metric error : {0}")]
    Metric(String),
} // end of OpticsError
