//! S3 `RemoteStore` backed by `aws-sdk-s3`.
//!
//! Credentials come from the SDK default provider chain. Region, endpoint and
//! path-style addressing come from `StoreConfig`, so S3-compatible services
//! (MinIO, R2, LocalStack) work through `QUARTET_S3_ENDPOINT`.
//!
//! No retries are layered on top of the SDK's own behavior; errors surface as
//! `StoreError::Remote`.

use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;

use crate::config::StoreConfig;
use crate::error::{StoreError, StoreResult};
use crate::remote::{ListPage, RemoteStore};

#[derive(Debug, Clone)]
pub struct S3Store {
    client: Client,
}

impl S3Store {
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }

    pub async fn from_config(cfg: &StoreConfig) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = &cfg.region {
            loader = loader.region(Region::new(region.clone()));
        }
        if let Some(endpoint) = &cfg.endpoint {
            loader = loader.endpoint_url(endpoint);
        }
        let shared = loader.load().await;

        let s3_cfg = aws_sdk_s3::config::Builder::from(&shared)
            .force_path_style(cfg.force_path_style)
            .build();
        Self::from_client(Client::from_conf(s3_cfg))
    }
}

#[async_trait]
impl RemoteStore for S3Store {
    async fn list_objects(
        &self,
        bucket: &str,
        prefix: &str,
        continuation: Option<&str>,
    ) -> StoreResult<ListPage> {
        let resp = self
            .client
            .list_objects_v2()
            .bucket(bucket)
            .prefix(prefix)
            .set_continuation_token(continuation.map(str::to_string))
            .send()
            .await
            .map_err(|e| StoreError::remote("list_objects", bucket, DisplayErrorContext(&e)))?;

        let keys = resp
            .contents()
            .iter()
            .filter_map(|o| o.key().map(str::to_string))
            .collect();

        Ok(ListPage {
            keys,
            is_truncated: resp.is_truncated().unwrap_or(false),
            next_token: resp.next_continuation_token().map(str::to_string),
        })
    }

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> StoreResult<()> {
        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(body))
            .send()
            .await
            .map_err(|e| {
                StoreError::remote("put_object", format!("{bucket}/{key}"), DisplayErrorContext(&e))
            })?;
        Ok(())
    }

    async fn copy_object(
        &self,
        target_bucket: &str,
        key: &str,
        copy_source: &str,
    ) -> StoreResult<()> {
        self.client
            .copy_object()
            .bucket(target_bucket)
            .key(key)
            .copy_source(copy_source)
            .send()
            .await
            .map_err(|e| {
                StoreError::remote(
                    "copy_object",
                    format!("{copy_source} -> {target_bucket}/{key}"),
                    DisplayErrorContext(&e),
                )
            })?;
        Ok(())
    }
}
