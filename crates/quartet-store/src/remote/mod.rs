//! Remote object store contract.
//!
//! The reconcilers only need three operations from a store: a paginated key
//! listing, a put, and a server-side copy. Backends:
//! - `memory::MemoryStore`: in-process, records every call (tests, dry tooling)
//! - `fs::FsStore`: one directory per bucket (`fs` feature)
//! - `s3::S3Store`: AWS S3 or compatible endpoints (`s3` feature)

use async_trait::async_trait;
use url::form_urlencoded;

use crate::error::{StoreError, StoreResult};

#[cfg(feature = "fs")]
pub mod fs;
pub mod memory;
#[cfg(feature = "s3")]
pub mod s3;

/// One page of a key listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListPage {
    pub keys: Vec<String>,
    pub is_truncated: bool,
    pub next_token: Option<String>,
}

#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// List keys under `prefix`, starting after `continuation` when given.
    async fn list_objects(
        &self,
        bucket: &str,
        prefix: &str,
        continuation: Option<&str>,
    ) -> StoreResult<ListPage>;

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> StoreResult<()>;

    /// Copy the object named by `copy_source` (see [`copy_source`]) to `key` in
    /// `target_bucket` without downloading it.
    async fn copy_object(
        &self,
        target_bucket: &str,
        key: &str,
        copy_source: &str,
    ) -> StoreResult<()>;
}

/// Build a copy-source reference: `bucket/key` with every `/`-separated segment
/// percent-encoded on its own and the separators kept.
pub fn copy_source(bucket: &str, key: &str) -> String {
    std::iter::once(bucket)
        .chain(key.split('/'))
        .map(encode_segment)
        .collect::<Vec<_>>()
        .join("/")
}

/// Split a copy-source reference back into `(bucket, key)`.
pub fn parse_copy_source(source: &str) -> StoreResult<(String, String)> {
    let (bucket, key) = source
        .split_once('/')
        .ok_or_else(|| StoreError::Config(format!("copy source has no key: {source}")))?;
    if bucket.is_empty() || key.is_empty() {
        return Err(StoreError::Config(format!("malformed copy source: {source}")));
    }

    let key = key.split('/').map(decode_segment).collect::<Vec<_>>().join("/");
    Ok((decode_segment(bucket), key))
}

fn encode_segment(segment: &str) -> String {
    // form encoding writes spaces as '+'; a literal '+' is already %2B here.
    form_urlencoded::byte_serialize(segment.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

fn decode_segment(segment: &str) -> String {
    form_urlencoded::parse(segment.as_bytes())
        .next()
        .map(|(k, _)| k.into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_keys_are_unchanged() {
        assert_eq!(
            copy_source("quartet-dev", "puzzles/2024-06-01.json"),
            "quartet-dev/puzzles/2024-06-01.json"
        );
    }

    #[test]
    fn reserved_characters_encoded_per_segment() {
        let src = copy_source("b", "puzzles/a b+c&d=e?.json");
        assert_eq!(src, "b/puzzles/a%20b%2Bc%26d%3De%3F.json");
    }

    #[test]
    fn parse_inverts_encoding() {
        for key in ["puzzles/2024-06-01.json", "puzzles/a b+c&d=e?.json", "manifest.json"] {
            let (bucket, decoded) = parse_copy_source(&copy_source("bkt", key)).unwrap();
            assert_eq!(bucket, "bkt");
            assert_eq!(decoded, key);
        }
    }

    #[test]
    fn parse_rejects_missing_key() {
        assert!(parse_copy_source("bucket-only").is_err());
        assert!(parse_copy_source("bucket/").is_err());
    }
}
