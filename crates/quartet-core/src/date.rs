//! `YYYY-MM-DD` date helpers.
//!
//! Puzzle dates are compared as strings; lexical order equals chronological
//! order for this format, which is what manifest sorting relies on. Digits are
//! ASCII only.

use std::sync::OnceLock;

use regex::Regex;

fn full_date_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").expect("static regex"))
}

fn embedded_date_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[0-9]{4}-[0-9]{2}-[0-9]{2}").expect("static regex"))
}

/// True if `s` is exactly a `YYYY-MM-DD` string.
pub fn is_iso_date(s: &str) -> bool {
    full_date_re().is_match(s)
}

/// Extract the first `YYYY-MM-DD` run from a file name, if any.
///
/// `2024-06-01.json` and `puzzle-2024-06-01-v2.json` both yield `2024-06-01`.
pub fn date_from_file_name(name: &str) -> Option<String> {
    embedded_date_re().find(name).map(|m| m.as_str().to_string())
}
