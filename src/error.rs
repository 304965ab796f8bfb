//! Error types.

use thiserror::Error;

/// Configuration errors reported before any candidate runs.
///
/// Failures inside candidate code are not represented here: a panicking
/// setup, action or teardown unwinds straight out of the run.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum KeitError {
    #[error("weight must be a finite number, got {0}")]
    NonFiniteWeight(f64),
}

pub type Result<T> = std::result::Result<T, KeitError>;
