//! Directory-backed `RemoteStore`.
//!
//! Layout: `<root>/<bucket>/<key>`, where `/` in keys becomes a directory
//! separator. Keys containing `..`, empty segments or a leading `/` are
//! rejected so an object can never escape its bucket directory.
//!
//! Useful for running the CLI entirely offline and for end-to-end tests.

use std::fs;
use std::path::PathBuf;

use async_trait::async_trait;
use walkdir::WalkDir;

use crate::error::{StoreError, StoreResult};
use crate::remote::{parse_copy_source, ListPage, RemoteStore};

const DEFAULT_PAGE_SIZE: usize = 1000;

#[derive(Debug, Clone)]
pub struct FsStore {
    root: PathBuf,
    page_size: usize,
}

impl FsStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    fn bucket_dir(&self, bucket: &str) -> StoreResult<PathBuf> {
        check_segments(bucket)?;
        if bucket.contains('/') {
            return Err(StoreError::Config(format!("invalid bucket name: {bucket}")));
        }
        Ok(self.root.join(bucket))
    }

    fn object_path(&self, bucket: &str, key: &str) -> StoreResult<PathBuf> {
        check_segments(key)?;
        let mut p = self.bucket_dir(bucket)?;
        p.extend(key.split('/'));
        Ok(p)
    }

    fn all_keys(&self, bucket: &str) -> StoreResult<Vec<String>> {
        let dir = self.bucket_dir(bucket)?;
        if !dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut keys = Vec::new();
        for entry in WalkDir::new(&dir).min_depth(1) {
            let entry = entry.map_err(|e| StoreError::remote("list_objects", bucket, e))?;
            if !entry.file_type().is_file() {
                continue;
            }
            let rel = entry
                .path()
                .strip_prefix(&dir)
                .map_err(|e| StoreError::remote("list_objects", bucket, e))?;
            let key = rel
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            keys.push(key);
        }
        keys.sort();
        Ok(keys)
    }
}

fn check_segments(key: &str) -> StoreResult<()> {
    if key.is_empty() || key.split('/').any(|s| s.is_empty() || s == "." || s == "..") {
        return Err(StoreError::Config(format!("invalid object key: {key}")));
    }
    Ok(())
}

#[async_trait]
impl RemoteStore for FsStore {
    async fn list_objects(
        &self,
        bucket: &str,
        prefix: &str,
        continuation: Option<&str>,
    ) -> StoreResult<ListPage> {
        let mut matching = self
            .all_keys(bucket)?
            .into_iter()
            .filter(|k| k.starts_with(prefix))
            .filter(|k| continuation.map_or(true, |t| k.as_str() > t));

        let keys: Vec<String> = matching.by_ref().take(self.page_size).collect();
        let is_truncated = matching.next().is_some();
        let next_token = if is_truncated { keys.last().cloned() } else { None };

        Ok(ListPage {
            keys,
            is_truncated,
            next_token,
        })
    }

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        _content_type: &str,
    ) -> StoreResult<()> {
        let path = self.object_path(bucket, key)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
        }
        fs::write(&path, body).map_err(|e| StoreError::io(&path, e))
    }

    async fn copy_object(
        &self,
        target_bucket: &str,
        key: &str,
        copy_source: &str,
    ) -> StoreResult<()> {
        let (src_bucket, src_key) = parse_copy_source(copy_source)?;
        let from = self.object_path(&src_bucket, &src_key)?;
        if !from.is_file() {
            return Err(StoreError::remote(
                "copy_object",
                copy_source,
                "source object does not exist",
            ));
        }

        let to = self.object_path(target_bucket, key)?;
        if let Some(parent) = to.parent() {
            fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
        }
        fs::copy(&from, &to).map_err(|e| StoreError::io(&to, e))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::copy_source;

    #[tokio::test]
    async fn put_list_copy_round_trip() {
        let tmp = tempfile::tempdir().unwrap();
        let store = FsStore::new(tmp.path()).with_page_size(1);

        store
            .put_object("dev", "puzzles/2024-06-02.json", b"{}".to_vec(), "application/json")
            .await
            .unwrap();
        store
            .put_object("dev", "puzzles/2024-06-01.json", b"{}".to_vec(), "application/json")
            .await
            .unwrap();
        store
            .put_object("dev", "manifest.json", b"{}".to_vec(), "application/json")
            .await
            .unwrap();

        let first = store.list_objects("dev", "puzzles/", None).await.unwrap();
        assert_eq!(first.keys, vec!["puzzles/2024-06-01.json"]);
        assert!(first.is_truncated);
        let second = store
            .list_objects("dev", "puzzles/", first.next_token.as_deref())
            .await
            .unwrap();
        assert_eq!(second.keys, vec!["puzzles/2024-06-02.json"]);
        assert!(!second.is_truncated);

        store
            .copy_object("prod", "manifest.json", &copy_source("dev", "manifest.json"))
            .await
            .unwrap();
        assert!(tmp.path().join("prod").join("manifest.json").is_file());
    }

    #[tokio::test]
    async fn missing_bucket_lists_empty() {
        let tmp = tempfile::tempdir().unwrap();
        let store = FsStore::new(tmp.path());
        let page = store.list_objects("prod", "puzzles/", None).await.unwrap();
        assert!(page.keys.is_empty());
    }

    #[tokio::test]
    async fn traversal_keys_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let store = FsStore::new(tmp.path());
        for key in ["../escape.json", "puzzles//x.json", "/abs.json"] {
            assert!(store
                .put_object("dev", key, vec![], "application/json")
                .await
                .is_err());
        }
    }
}
