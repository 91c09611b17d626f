//! quartet-store
//!
//! Everything in quartet that touches the outside world:
//! - `local`: resolving and loading puzzle files from a content workspace
//! - `remote`: the `RemoteStore` contract plus memory, directory and S3 backends
//! - `index`: paginated key listing (the only read path into remote state)
//! - `upload` / `promote`: the two reconcilers that mutate remote state
//! - `config`: bucket/endpoint configuration loaded from the environment
//!
//! Writes are issued one at a time in key order. The first failing write
//! aborts the operation; writes already issued stay in place.

pub mod config;
pub mod error;
pub mod index;
pub mod local;
pub mod promote;
pub mod remote;
pub mod upload;

#[cfg(test)]
mod test_support;

pub use crate::config::{Namespace, StoreConfig};
pub use crate::error::{StoreError, StoreResult};
pub use crate::local::{ContentLayout, FileIssue, LoadedBatch, LocalPuzzle};
pub use crate::promote::{promote, PromoteOptions, PromoteReport};
pub use crate::remote::{copy_source, ListPage, RemoteStore};
pub use crate::upload::{upload, upload_from_disk, UploadOptions, UploadReport};
