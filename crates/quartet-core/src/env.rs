//! Deployment environments.
//!
//! Each environment maps to its own bucket. The set is closed so promotion's
//! "source must differ from target" rule is a plain enum comparison.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{QuartetError, QuartetResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Dev,
    Prod,
}

impl Environment {
    pub const ALL: [Environment; 2] = [Environment::Dev, Environment::Prod];

    /// Parse an environment tag (`dev` or `prod`).
    pub fn parse(s: &str) -> QuartetResult<Self> {
        match s {
            "dev" => Ok(Self::Dev),
            "prod" => Ok(Self::Prod),
            _ => Err(QuartetError::invalid_argument(format!(
                "unknown environment '{s}': expected dev or prod"
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dev => "dev",
            Self::Prod => "prod",
        }
    }
}

impl FromStr for Environment {
    type Err = QuartetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
