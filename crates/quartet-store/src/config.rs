//! Store configuration.
//!
//! Explicit, serializable configuration for reaching the per-environment
//! buckets. Hosts build it from the process environment with
//! `StoreConfig::from_env`, or from any lookup function with `from_lookup`.
//!
//! Variables (empty values count as unset):
//! - `QUARTET_DEV_BUCKET`, `QUARTET_PROD_BUCKET`: bucket names
//! - `QUARTET_S3_REGION`: region override
//! - `QUARTET_S3_ENDPOINT`: custom endpoint URL (S3-compatible stores)
//! - `QUARTET_S3_FORCE_PATH_STYLE`: boolean
//!
//! Credentials are not handled here; the S3 backend uses the SDK default chain.

use serde::{Deserialize, Serialize};

use quartet_core::env::Environment;

use crate::error::{StoreError, StoreResult};

pub mod vars {
    pub const DEV_BUCKET: &str = "QUARTET_DEV_BUCKET";
    pub const PROD_BUCKET: &str = "QUARTET_PROD_BUCKET";
    pub const REGION: &str = "QUARTET_S3_REGION";
    pub const ENDPOINT: &str = "QUARTET_S3_ENDPOINT";
    pub const FORCE_PATH_STYLE: &str = "QUARTET_S3_FORCE_PATH_STYLE";
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "StoreConfig::default_dev_bucket")]
    pub dev_bucket: String,

    #[serde(default = "StoreConfig::default_prod_bucket")]
    pub prod_bucket: String,

    #[serde(default)]
    pub region: Option<String>,

    #[serde(default)]
    pub endpoint: Option<String>,

    /// Address buckets as `endpoint/bucket` instead of `bucket.endpoint`.
    #[serde(default)]
    pub force_path_style: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            dev_bucket: Self::default_dev_bucket(),
            prod_bucket: Self::default_prod_bucket(),
            region: None,
            endpoint: None,
            force_path_style: false,
        }
    }
}

impl StoreConfig {
    fn default_dev_bucket() -> String {
        "quartet-puzzles-dev".to_string()
    }

    fn default_prod_bucket() -> String {
        "quartet-puzzles-prod".to_string()
    }

    pub fn from_env() -> StoreResult<Self> {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> StoreResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |k: &str| lookup(k).filter(|v| !v.trim().is_empty());

        let mut cfg = Self::default();
        if let Some(b) = get(vars::DEV_BUCKET) {
            cfg.dev_bucket = b;
        }
        if let Some(b) = get(vars::PROD_BUCKET) {
            cfg.prod_bucket = b;
        }
        cfg.region = get(vars::REGION);
        cfg.endpoint = get(vars::ENDPOINT);
        if let Some(v) = get(vars::FORCE_PATH_STYLE) {
            cfg.force_path_style = parse_bool(vars::FORCE_PATH_STYLE, &v)?;
        }

        validate_config(&cfg)?;
        Ok(cfg)
    }

    pub fn bucket(&self, env: Environment) -> &str {
        match env {
            Environment::Dev => &self.dev_bucket,
            Environment::Prod => &self.prod_bucket,
        }
    }

    pub fn namespace(&self, env: Environment) -> Namespace {
        Namespace {
            env,
            bucket: self.bucket(env).to_string(),
        }
    }
}

/// An environment together with the bucket that backs it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Namespace {
    pub env: Environment,
    pub bucket: String,
}

impl Namespace {
    pub fn new(env: Environment, bucket: impl Into<String>) -> Self {
        Self {
            env,
            bucket: bucket.into(),
        }
    }
}

/// Parse a boolean configuration value strictly.
pub fn parse_bool(var: &str, value: &str) -> StoreResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(StoreError::InvalidEnvValue {
            var: var.to_string(),
            expected: "a boolean (true/false, 1/0, yes/no, on/off)".to_string(),
            value: value.to_string(),
        }),
    }
}

pub fn validate_config(cfg: &StoreConfig) -> StoreResult<()> {
    for env in Environment::ALL {
        if cfg.bucket(env).trim().is_empty() {
            return Err(StoreError::Config(format!("{env} bucket name must not be empty")));
        }
    }

    if cfg.dev_bucket == cfg.prod_bucket {
        return Err(StoreError::Config(format!(
            "dev and prod must use different buckets (both are {})",
            cfg.dev_bucket
        )));
    }

    Ok(())
}
