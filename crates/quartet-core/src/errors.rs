//! Error type shared by the core crate.
//!
//! Shape problems in puzzle documents are never errors: they are collected as
//! `ValidationIssue`s. `QuartetError` covers argument and invariant failures that
//! abort an operation outright.

use thiserror::Error;

pub type QuartetResult<T> = Result<T, QuartetError>;

#[derive(Debug, Error)]
pub enum QuartetError {
    /// A caller supplied a value outside the accepted domain.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// An internal consistency rule did not hold.
    #[error("invariant violated: {0}")]
    Invariant(String),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl QuartetError {
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::Invariant(msg.into())
    }
}
