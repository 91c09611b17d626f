//! In-memory `RemoteStore`.
//!
//! Buckets are `BTreeMap`s so listings come back in key order. Every call is
//! recorded, which lets tests assert exactly which writes a reconciler issued.
//! `fail_writes_to` makes puts and copies to one key fail, to exercise
//! first-failure semantics.

use std::collections::BTreeMap;
use std::ops::Bound;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::error::{StoreError, StoreResult};
use crate::remote::{parse_copy_source, ListPage, RemoteStore};

const DEFAULT_PAGE_SIZE: usize = 1000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub body: Vec<u8>,
    pub content_type: String,
}

/// A recorded store call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    List {
        bucket: String,
        prefix: String,
        continuation: Option<String>,
    },
    Put {
        bucket: String,
        key: String,
    },
    Copy {
        bucket: String,
        key: String,
        source: String,
    },
}

impl StoreCall {
    pub fn is_mutation(&self) -> bool {
        !matches!(self, StoreCall::List { .. })
    }
}

#[derive(Debug, Default)]
struct Inner {
    buckets: BTreeMap<String, BTreeMap<String, StoredObject>>,
    calls: Vec<StoreCall>,
    fail_key: Option<String>,
}

#[derive(Debug)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
    page_size: usize,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::with_page_size(DEFAULT_PAGE_SIZE)
    }

    /// Listings return at most `page_size` keys per page (minimum 1).
    pub fn with_page_size(page_size: usize) -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
            page_size: page_size.max(1),
        }
    }

    /// Seed an object without recording a call.
    pub fn insert(&self, bucket: &str, key: &str, body: impl Into<Vec<u8>>) {
        self.inner
            .lock()
            .buckets
            .entry(bucket.to_string())
            .or_default()
            .insert(
                key.to_string(),
                StoredObject {
                    body: body.into(),
                    content_type: "application/octet-stream".to_string(),
                },
            );
    }

    pub fn get(&self, bucket: &str, key: &str) -> Option<StoredObject> {
        self.inner
            .lock()
            .buckets
            .get(bucket)
            .and_then(|b| b.get(key))
            .cloned()
    }

    pub fn keys(&self, bucket: &str) -> Vec<String> {
        self.inner
            .lock()
            .buckets
            .get(bucket)
            .map(|b| b.keys().cloned().collect())
            .unwrap_or_default()
    }

    pub fn calls(&self) -> Vec<StoreCall> {
        self.inner.lock().calls.clone()
    }

    pub fn mutations(&self) -> Vec<StoreCall> {
        self.calls().into_iter().filter(StoreCall::is_mutation).collect()
    }

    pub fn fail_writes_to(&self, key: &str) {
        self.inner.lock().fail_key = Some(key.to_string());
    }
}

#[async_trait]
impl RemoteStore for MemoryStore {
    async fn list_objects(
        &self,
        bucket: &str,
        prefix: &str,
        continuation: Option<&str>,
    ) -> StoreResult<ListPage> {
        let mut inner = self.inner.lock();
        inner.calls.push(StoreCall::List {
            bucket: bucket.to_string(),
            prefix: prefix.to_string(),
            continuation: continuation.map(str::to_string),
        });

        let Some(objects) = inner.buckets.get(bucket) else {
            return Ok(ListPage::default());
        };

        let start = match continuation {
            Some(token) => Bound::Excluded(token.to_string()),
            None => Bound::Unbounded,
        };
        let mut matching = objects
            .range::<String, _>((start, Bound::Unbounded))
            .map(|(k, _)| k)
            .filter(|k| k.starts_with(prefix));

        let keys: Vec<String> = matching.by_ref().take(self.page_size).cloned().collect();
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
        content_type: &str,
    ) -> StoreResult<()> {
        let mut inner = self.inner.lock();
        inner.calls.push(StoreCall::Put {
            bucket: bucket.to_string(),
            key: key.to_string(),
        });
        if inner.fail_key.as_deref() == Some(key) {
            return Err(StoreError::remote("put_object", key, "injected failure"));
        }

        inner.buckets.entry(bucket.to_string()).or_default().insert(
            key.to_string(),
            StoredObject {
                body,
                content_type: content_type.to_string(),
            },
        );
        Ok(())
    }

    async fn copy_object(
        &self,
        target_bucket: &str,
        key: &str,
        copy_source: &str,
    ) -> StoreResult<()> {
        let mut inner = self.inner.lock();
        inner.calls.push(StoreCall::Copy {
            bucket: target_bucket.to_string(),
            key: key.to_string(),
            source: copy_source.to_string(),
        });
        if inner.fail_key.as_deref() == Some(key) {
            return Err(StoreError::remote("copy_object", key, "injected failure"));
        }

        let (src_bucket, src_key) = parse_copy_source(copy_source)?;
        let object = inner
            .buckets
            .get(&src_bucket)
            .and_then(|b| b.get(&src_key))
            .cloned()
            .ok_or_else(|| {
                StoreError::remote("copy_object", copy_source, "source object does not exist")
            })?;

        inner
            .buckets
            .entry(target_bucket.to_string())
            .or_default()
            .insert(key.to_string(), object);
        Ok(())
    }
}
