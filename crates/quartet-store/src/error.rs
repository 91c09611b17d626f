use std::path::PathBuf;

use quartet_core::env::Environment;
use quartet_core::QuartetError;
use thiserror::Error;

use crate::local::FileIssue;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    /// No candidate location exists for a requested puzzle input.
    #[error("puzzle not found: {0}")]
    InputNotFound(String),

    #[error("io error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// At least one loaded document has schema issues. Carries all of them.
    #[error("validation failed with {} issue(s)", .0.len())]
    Validation(Vec<FileIssue>),

    /// An environment variable holds a value of the wrong shape.
    #[error("invalid value for {var}: expected {expected}, got '{value}'")]
    InvalidEnvValue {
        var: String,
        expected: String,
        value: String,
    },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("source and target must differ (both are {0})")]
    SameEnvironment(Environment),

    #[error("source bucket {bucket} has no puzzles to promote")]
    EmptySource { bucket: String },

    /// The object store rejected or failed a request.
    #[error("{op} failed for {target}: {message}")]
    Remote {
        op: &'static str,
        target: String,
        message: String,
    },

    #[error(transparent)]
    Core(#[from] QuartetError),
}

impl StoreError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn remote(op: &'static str, target: impl Into<String>, message: impl ToString) -> Self {
        Self::Remote {
            op,
            target: target.into(),
            message: message.to_string(),
        }
    }
}
