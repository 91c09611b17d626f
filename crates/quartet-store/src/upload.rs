//! Upload reconciliation: local puzzle files -> one environment's bucket.
//!
//! Steps:
//! 1. Refuse the whole batch if any file has a schema issue.
//! 2. Return a no-op report for an empty batch.
//! 3. Map each file to `puzzles/<file name>` and list the bucket's puzzle keys.
//! 4. Upload keys missing remotely (all keys with `overwrite`); skip the rest.
//!    Presence is by key only, so an edited file that keeps its name is not
//!    re-uploaded without `overwrite`.
//! 5. Write the manifest built from the full local set, even when nothing new
//!    was uploaded.
//!
//! Remote-only keys are reported and left alone. Dry runs do the listing and
//! planning but issue no writes.

use std::collections::{BTreeMap, BTreeSet};

use bytesize::ByteSize;
use serde::Serialize;
use time::OffsetDateTime;
use tracing::{info, warn};

use quartet_core::layout::{puzzle_key, JSON_CONTENT_TYPE, MANIFEST_KEY, PUZZLE_PREFIX};
use quartet_core::manifest::{Manifest, ManifestEntry};
use quartet_core::reconcile::reconcile_key_sets;
use quartet_core::QuartetError;

use crate::error::StoreResult;
use crate::index::list_keys;
use crate::local::{load_puzzles, ContentLayout, LoadedBatch, LocalPuzzle};
use crate::remote::RemoteStore;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UploadOptions {
    pub dry_run: bool,
    /// Re-upload keys that already exist remotely.
    pub overwrite: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadReport {
    pub bucket: String,
    pub dry_run: bool,
    /// Keys uploaded (or that would be, in a dry run).
    pub uploaded: Vec<String>,
    pub skipped: Vec<String>,
    pub remote_only: Vec<String>,
    pub manifest_written: bool,
}

impl UploadReport {
    fn empty(bucket: &str, opts: UploadOptions) -> Self {
        Self {
            bucket: bucket.to_string(),
            dry_run: opts.dry_run,
            uploaded: Vec::new(),
            skipped: Vec::new(),
            remote_only: Vec::new(),
            manifest_written: false,
        }
    }
}

/// Load `inputs` (or the whole puzzle directory) from disk and upload them.
pub async fn upload_from_disk<S>(
    store: &S,
    bucket: &str,
    layout: &ContentLayout,
    inputs: &[String],
    opts: UploadOptions,
) -> StoreResult<UploadReport>
where
    S: RemoteStore + ?Sized,
{
    let batch = load_puzzles(layout, inputs)?;
    upload(store, bucket, batch, opts, OffsetDateTime::now_utc()).await
}

/// Reconcile an already-loaded batch against `bucket`.
pub async fn upload<S>(
    store: &S,
    bucket: &str,
    batch: LoadedBatch,
    opts: UploadOptions,
    generated_at: OffsetDateTime,
) -> StoreResult<UploadReport>
where
    S: RemoteStore + ?Sized,
{
    let files = batch.require_clean()?;
    if files.is_empty() {
        info!(bucket, "no puzzles to upload");
        return Ok(UploadReport::empty(bucket, opts));
    }

    let mut local: BTreeMap<String, &LocalPuzzle> = BTreeMap::new();
    let mut entries = Vec::with_capacity(files.len());
    for file in &files {
        let puzzle = file.puzzle.as_ref().ok_or_else(|| {
            QuartetError::invariant(format!("{} passed validation without a model", file.display))
        })?;
        let key = puzzle_key(&file.file_name);
        entries.push(ManifestEntry {
            date: puzzle.date.clone(),
            path: key.clone(),
        });
        local.insert(key, file);
    }

    let desired: BTreeSet<String> = local.keys().cloned().collect();
    let present = list_keys(store, bucket, PUZZLE_PREFIX).await?;
    let diff = reconcile_key_sets(&present, &desired, opts.overwrite);

    for key in &diff.orphaned {
        warn!(bucket, key = %key, "object exists remotely but not locally");
    }
    info!(
        bucket,
        upload = diff.to_write.len(),
        skip = diff.to_skip.len(),
        remote_only = diff.orphaned.len(),
        dry_run = opts.dry_run,
        "upload plan"
    );

    let mut report = UploadReport {
        bucket: bucket.to_string(),
        dry_run: opts.dry_run,
        uploaded: diff.to_write,
        skipped: diff.to_skip,
        remote_only: diff.orphaned,
        manifest_written: false,
    };
    if opts.dry_run {
        return Ok(report);
    }

    for key in &report.uploaded {
        let file = local.get(key).ok_or_else(|| {
            QuartetError::invariant(format!("planned key {key} has no local file"))
        })?;
        store
            .put_object(bucket, key, file.raw.clone(), JSON_CONTENT_TYPE)
            .await?;
        info!(bucket, key = %key, size = %ByteSize::b(file.raw.len() as u64), "uploaded puzzle");
    }

    let manifest = Manifest::build(entries, generated_at)?;
    store
        .put_object(bucket, MANIFEST_KEY, manifest.to_bytes()?, JSON_CONTENT_TYPE)
        .await?;
    info!(bucket, puzzles = manifest.puzzles.len(), "wrote manifest");
    report.manifest_written = true;

    Ok(report)
}
