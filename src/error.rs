//! Error taxonomy.
//!
//! Everything fallible in this crate happens before any worker thread is
//! spawned: loading the dataset and validating the run configuration. Once
//! the evolutionary loop is running, every operation is total (see the
//! propagation policy in the design notes) — a broken invariant there is a
//! bug, not a recoverable condition, and is caught with `debug_assert!`
//! instead of threaded through `Result`.

use thiserror::Error;

/// Top-level error type for initialisation failures.
#[derive(Debug, Error)]
pub enum RspError {
    /// The dataset file, CLI arguments, or config overlay was malformed.
    #[error("invalid input: {0}")]
    Input(String),

    /// Allocation or other resource failure during initialisation.
    #[error("resource error: {0}")]
    Resource(String),

    /// An algorithmic precondition (N >= 3, valid ranking rows, ...) failed.
    #[error("precondition violation: {0}")]
    Precondition(String),
}

pub type Result<T> = std::result::Result<T, RspError>;
