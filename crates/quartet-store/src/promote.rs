//! Promotion: copy puzzles from one environment's bucket into another's.
//!
//! Both buckets are listed up front. Keys missing from the target are copied
//! server-side (all source keys with `overwrite`), then the source manifest is
//! copied over the target's regardless of how many puzzles moved. Keys only in
//! the target are reported, never deleted.

use serde::Serialize;
use tracing::{info, warn};

use quartet_core::layout::{MANIFEST_KEY, PUZZLE_PREFIX};
use quartet_core::reconcile::reconcile_key_sets;

use crate::config::Namespace;
use crate::error::{StoreError, StoreResult};
use crate::index::list_keys;
use crate::remote::{copy_source, RemoteStore};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PromoteOptions {
    pub dry_run: bool,
    pub overwrite: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PromoteReport {
    pub source_bucket: String,
    pub target_bucket: String,
    pub dry_run: bool,
    pub copied: Vec<String>,
    pub skipped: Vec<String>,
    /// Keys present only in the target.
    pub remote_only: Vec<String>,
    pub manifest_copied: bool,
}

pub async fn promote<S>(
    store: &S,
    source: &Namespace,
    target: &Namespace,
    opts: PromoteOptions,
) -> StoreResult<PromoteReport>
where
    S: RemoteStore + ?Sized,
{
    if source.env == target.env {
        return Err(StoreError::SameEnvironment(source.env));
    }
    if source.bucket == target.bucket {
        return Err(StoreError::Config(format!(
            "{} and {} resolve to the same bucket {}",
            source.env, target.env, source.bucket
        )));
    }

    let (source_keys, target_keys) = tokio::try_join!(
        list_keys(store, &source.bucket, PUZZLE_PREFIX),
        list_keys(store, &target.bucket, PUZZLE_PREFIX),
    )?;
    if source_keys.is_empty() {
        return Err(StoreError::EmptySource {
            bucket: source.bucket.clone(),
        });
    }

    let diff = reconcile_key_sets(&target_keys, &source_keys, opts.overwrite);
    for key in &diff.orphaned {
        warn!(bucket = %target.bucket, key = %key, "object exists only in target");
    }
    info!(
        source = %source.bucket,
        target = %target.bucket,
        copy = diff.to_write.len(),
        skip = diff.to_skip.len(),
        target_only = diff.orphaned.len(),
        dry_run = opts.dry_run,
        "promotion plan"
    );

    let mut report = PromoteReport {
        source_bucket: source.bucket.clone(),
        target_bucket: target.bucket.clone(),
        dry_run: opts.dry_run,
        copied: diff.to_write,
        skipped: diff.to_skip,
        remote_only: diff.orphaned,
        manifest_copied: false,
    };
    if opts.dry_run {
        return Ok(report);
    }

    for key in &report.copied {
        store
            .copy_object(&target.bucket, key, &copy_source(&source.bucket, key))
            .await?;
        info!(target = %target.bucket, key = %key, "copied puzzle");
    }

    store
        .copy_object(
            &target.bucket,
            MANIFEST_KEY,
            &copy_source(&source.bucket, MANIFEST_KEY),
        )
        .await?;
    info!(target = %target.bucket, "copied manifest");
    report.manifest_copied = true;

    Ok(report)
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use quartet_core::env::Environment;

    use super::*;
    use crate::remote::memory::{MemoryStore, StoreCall};

    const A: &str = "puzzles/2024-06-01.json";
    const B: &str = "puzzles/2024-06-02.json";
    const C: &str = "puzzles/2024-06-03.json";

    fn dev() -> Namespace {
        Namespace::new(Environment::Dev, "dev-bkt")
    }

    fn prod() -> Namespace {
        Namespace::new(Environment::Prod, "prod-bkt")
    }

    /// Source holds {A, B} plus a manifest; target holds {A, C}.
    fn seeded() -> MemoryStore {
        let store = MemoryStore::new();
        store.insert("dev-bkt", A, "a-dev");
        store.insert("dev-bkt", B, "b-dev");
        store.insert("dev-bkt", MANIFEST_KEY, "manifest-dev");
        store.insert("prod-bkt", A, "a-prod");
        store.insert("prod-bkt", C, "c-prod");
        store
    }

    fn copied_keys(store: &MemoryStore) -> Vec<String> {
        store
            .mutations()
            .into_iter()
            .filter_map(|c| match c {
                StoreCall::Copy { key, .. } => Some(key),
                _ => None,
            })
            .collect()
    }

    #[tokio::test]
    async fn copies_missing_then_manifest() {
        let store = seeded();
        let report = promote(&store, &dev(), &prod(), PromoteOptions::default())
            .await
            .unwrap();

        assert_eq!(report.copied, vec![B]);
        assert_eq!(report.skipped, vec![A]);
        assert_eq!(report.remote_only, vec![C]);
        assert!(report.manifest_copied);
        assert_eq!(copied_keys(&store), vec![B, MANIFEST_KEY]);

        assert_eq!(store.get("prod-bkt", A).unwrap().body, b"a-prod".to_vec());
        assert_eq!(store.get("prod-bkt", B).unwrap().body, b"b-dev".to_vec());
        assert!(store.get("prod-bkt", C).is_some());
        assert_eq!(
            store.get("prod-bkt", MANIFEST_KEY).unwrap().body,
            b"manifest-dev".to_vec()
        );
    }

    #[tokio::test]
    async fn copy_source_names_source_bucket() {
        let store = seeded();
        promote(&store, &dev(), &prod(), PromoteOptions::default())
            .await
            .unwrap();
        let first = store.mutations().into_iter().next().unwrap();
        assert_eq!(
            first,
            StoreCall::Copy {
                bucket: "prod-bkt".to_string(),
                key: B.to_string(),
                source: copy_source("dev-bkt", B),
            }
        );
    }

    #[tokio::test]
    async fn overwrite_copies_every_source_key() {
        let store = seeded();
        let report = promote(
            &store,
            &dev(),
            &prod(),
            PromoteOptions { dry_run: false, overwrite: true },
        )
        .await
        .unwrap();

        assert_eq!(report.copied, vec![A, B]);
        assert!(report.skipped.is_empty());
        assert_eq!(copied_keys(&store), vec![A, B, MANIFEST_KEY]);
        assert_eq!(store.get("prod-bkt", A).unwrap().body, b"a-dev".to_vec());
    }

    #[tokio::test]
    async fn dry_run_copies_nothing() {
        let store = seeded();
        let report = promote(
            &store,
            &dev(),
            &prod(),
            PromoteOptions { dry_run: true, overwrite: false },
        )
        .await
        .unwrap();

        assert!(report.dry_run);
        assert_eq!(report.copied, vec![B]);
        assert!(!report.manifest_copied);
        assert!(store.mutations().is_empty());
    }

    #[tokio::test]
    async fn same_environment_fails_before_listing() {
        let store = seeded();
        let err = promote(&store, &dev(), &dev(), PromoteOptions::default())
            .await
            .unwrap_err();
        assert_matches!(err, StoreError::SameEnvironment(Environment::Dev));
        assert!(store.calls().is_empty());
    }

    #[tokio::test]
    async fn shared_bucket_fails_before_listing() {
        let store = seeded();
        let target = Namespace::new(Environment::Prod, "dev-bkt");
        let err = promote(&store, &dev(), &target, PromoteOptions::default())
            .await
            .unwrap_err();
        assert_matches!(err, StoreError::Config(_));
        assert!(store.calls().is_empty());
    }

    #[tokio::test]
    async fn empty_source_fails_without_copies() {
        let store = MemoryStore::new();
        store.insert("dev-bkt", MANIFEST_KEY, "manifest-dev");
        store.insert("prod-bkt", A, "a-prod");

        let err = promote(&store, &dev(), &prod(), PromoteOptions::default())
            .await
            .unwrap_err();
        assert_matches!(err, StoreError::EmptySource { ref bucket } if bucket == "dev-bkt");
        assert!(store.mutations().is_empty());
    }

    #[tokio::test]
    async fn failed_manifest_copy_keeps_copied_puzzles() {
        let store = seeded();
        store.fail_writes_to(MANIFEST_KEY);

        let err = promote(&store, &dev(), &prod(), PromoteOptions::default())
            .await
            .unwrap_err();
        assert_matches!(err, StoreError::Remote { op: "copy_object", .. });
        assert!(store.get("prod-bkt", B).is_some());
    }

    #[tokio::test]
    async fn already_in_sync_still_copies_manifest() {
        let store = seeded();
        store.insert("prod-bkt", B, "b-prod");

        let report = promote(&store, &dev(), &prod(), PromoteOptions::default())
            .await
            .unwrap();
        assert!(report.copied.is_empty());
        assert_eq!(copied_keys(&store), vec![MANIFEST_KEY]);
    }

    #[tokio::test]
    async fn prod_to_dev_is_allowed() {
        let store = seeded();
        store.insert("prod-bkt", MANIFEST_KEY, "manifest-prod");
        let report = promote(&store, &prod(), &dev(), PromoteOptions::default())
            .await
            .unwrap();
        assert_eq!(report.copied, vec![C]);
        assert_eq!(report.remote_only, vec![B]);
    }
}
