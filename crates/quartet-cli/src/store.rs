//! Store selection for commands that touch remote state.

use anyhow::Result;
use tracing::info;

use quartet_store::remote::fs::FsStore;
use quartet_store::{RemoteStore, StoreConfig};

use crate::args::Cli;

/// Bucket configuration from the environment plus the store to talk to:
/// a directory when `--store-root` is given, S3 otherwise.
pub async fn open(cli: &Cli) -> Result<(Box<dyn RemoteStore>, StoreConfig)> {
    let config = StoreConfig::from_env()?;
    if let Some(root) = &cli.store_root {
        info!(root = %root.display(), "using directory store");
        return Ok((Box::new(FsStore::new(root)), config));
    }
    let store = open_s3(&config).await?;
    Ok((store, config))
}

#[cfg(feature = "s3")]
async fn open_s3(config: &StoreConfig) -> Result<Box<dyn RemoteStore>> {
    info!(region = ?config.region, endpoint = ?config.endpoint, "using s3 store");
    Ok(Box::new(quartet_store::remote::s3::S3Store::from_config(config).await))
}

#[cfg(not(feature = "s3"))]
async fn open_s3(_config: &StoreConfig) -> Result<Box<dyn RemoteStore>> {
    anyhow::bail!("built without S3 support; pass --store-root <dir>")
}
