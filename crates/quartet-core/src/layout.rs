//! Remote key layout.
//!
//! Puzzles are stored flat under `PUZZLE_PREFIX` using their original file
//! name. The manifest lives at a single well-known key outside that prefix.

/// Prefix for every puzzle object.
pub const PUZZLE_PREFIX: &str = "puzzles/";

/// Key of the manifest object.
pub const MANIFEST_KEY: &str = "manifest.json";

/// Content type used for puzzles and the manifest.
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Remote key for a puzzle file name.
pub fn puzzle_key(file_name: &str) -> String {
    format!("{PUZZLE_PREFIX}{file_name}")
}
