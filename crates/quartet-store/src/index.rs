//! Remote key index.
//!
//! `list_keys` follows continuation tokens until the store stops reporting
//! truncation and returns every key it saw as one set. It is the only read path
//! into remote state used by the reconcilers.

use std::collections::BTreeSet;

use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::remote::RemoteStore;

pub async fn list_keys<S>(store: &S, bucket: &str, prefix: &str) -> StoreResult<BTreeSet<String>>
where
    S: RemoteStore + ?Sized,
{
    let mut keys = BTreeSet::new();
    let mut token: Option<String> = None;
    let mut pages = 0usize;

    loop {
        let page = store.list_objects(bucket, prefix, token.as_deref()).await?;
        pages += 1;
        debug!(bucket, prefix, page = pages, count = page.keys.len(), "listed page");
        keys.extend(page.keys);

        if !page.is_truncated {
            break;
        }
        match page.next_token {
            Some(next) if token.as_deref() != Some(next.as_str()) => token = Some(next),
            Some(_) => {
                return Err(StoreError::remote(
                    "list_objects",
                    bucket,
                    "continuation token did not advance",
                ))
            }
            None => {
                return Err(StoreError::remote(
                    "list_objects",
                    bucket,
                    "listing truncated without a continuation token",
                ))
            }
        }
    }

    debug!(bucket, prefix, pages, total = keys.len(), "listing complete");
    Ok(keys)
}
