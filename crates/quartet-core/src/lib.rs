//! quartet-core
//!
//! Core primitives for quartet:
//! - Puzzle document model and the closed content schema
//! - Field-path addressing for validation issues
//! - The accumulating schema validator
//! - Manifest model and deterministic manifest construction
//! - Environment tags and remote key layout
//! - Key-set reconciliation shared by upload and promotion
//!
//! The core crate does no filesystem or network I/O. Higher-level crates read
//! files, talk to object stores, and pass bytes/values in here.

pub mod date;
pub mod env;
pub mod errors;
pub mod layout;
pub mod manifest;
pub mod model;
pub mod path;
pub mod reconcile;
pub mod validate;

pub use crate::errors::{QuartetError, QuartetResult};

/// Convenience re-exports.
pub mod prelude {
    pub use crate::env::Environment;
    pub use crate::layout::{puzzle_key, MANIFEST_KEY, PUZZLE_PREFIX};
    pub use crate::manifest::{Manifest, ManifestEntry};
    pub use crate::model::{Category, Color, Puzzle};
    pub use crate::path::FieldPath;
    pub use crate::reconcile::{reconcile_key_sets, KeyDiff};
    pub use crate::validate::{validate, ValidationContext, ValidationIssue};
    pub use crate::{QuartetError, QuartetResult};
}
