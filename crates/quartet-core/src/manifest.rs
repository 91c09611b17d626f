//! Manifest model.
//!
//! The manifest is a derived index of every published puzzle. It is rebuilt
//! wholesale from the authoritative puzzle set on every upload and is never
//! merged with whatever manifest already exists remotely.
//!
//! Wire format (`manifest.json`):
//!
//! ```json
//! {
//!   "generatedAt": "2024-06-01T12:00:00.000Z",
//!   "latestPuzzle": "2024-06-01",
//!   "puzzles": [ { "date": "2024-06-01", "path": "puzzles/2024-06-01.json" } ]
//! }
//! ```
//!
//! `puzzles` is sorted ascending by date and `latestPuzzle` is omitted when the
//! list is empty. Serialized form is two-space pretty JSON plus a trailing newline.

use serde::{Deserialize, Serialize};
use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};

use crate::errors::{QuartetError, QuartetResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub date: String,
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    pub generated_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latest_puzzle: Option<String>,
    pub puzzles: Vec<ManifestEntry>,
}

impl Manifest {
    /// Build a manifest from puzzle entries. Order of `entries` does not matter.
    pub fn build(
        entries: impl IntoIterator<Item = ManifestEntry>,
        generated_at: OffsetDateTime,
    ) -> QuartetResult<Self> {
        let mut puzzles: Vec<ManifestEntry> = entries.into_iter().collect();
        puzzles.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.path.cmp(&b.path)));

        Ok(Self {
            generated_at: format_timestamp(generated_at)?,
            latest_puzzle: puzzles.last().map(|e| e.date.clone()),
            puzzles,
        })
    }

    pub fn to_bytes(&self) -> QuartetResult<Vec<u8>> {
        let mut out = serde_json::to_vec_pretty(self)?;
        out.push(b'\n');
        Ok(out)
    }
}

/// Render a timestamp as UTC ISO-8601 with millisecond precision.
pub fn format_timestamp(t: OffsetDateTime) -> QuartetResult<String> {
    let fmt = format_description!(
        "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3]Z"
    );
    t.to_offset(UtcOffset::UTC)
        .format(&fmt)
        .map_err(|e| QuartetError::invariant(format!("timestamp formatting failed: {e}")))
}
