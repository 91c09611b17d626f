//! Fixtures shared by this crate's unit tests.

use std::fs;
use std::path::Path;

use serde_json::{json, Value};

use crate::local::ContentLayout;

/// A well-formed puzzle dated `date`.
pub fn puzzle_json(date: &str) -> Value {
    json!({
        "date": date,
        "categories": [
            { "id": "fish", "title": "Fish", "color": "yellow", "words": ["BASS", "PIKE", "SOLE", "CARP"] },
            { "id": "trees", "title": "Trees", "color": "green", "words": ["OAK", "ELM", "ASH", "FIR"] },
            { "id": "planets", "title": "Planets", "color": "blue", "words": ["MARS", "VENUS", "EARTH", "SATURN"] },
            { "id": "metals", "title": "Metals", "color": "purple", "words": ["IRON", "TIN", "GOLD", "LEAD"] }
        ],
        "startingOrder": [
            "BASS", "OAK", "MARS", "IRON", "PIKE", "ELM", "VENUS", "TIN",
            "SOLE", "ASH", "EARTH", "GOLD", "CARP", "FIR", "SATURN", "LEAD"
        ]
    })
}

/// A temp repository with an empty puzzle directory.
pub fn workspace() -> (tempfile::TempDir, ContentLayout) {
    let tmp = tempfile::tempdir().unwrap();
    let layout = ContentLayout::new(tmp.path());
    fs::create_dir_all(&layout.puzzles_dir).unwrap();
    (tmp, layout)
}

pub fn write(path: &Path, body: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, body).unwrap();
}

/// Write valid puzzles named `<date>.json` for each date.
pub fn write_puzzles(layout: &ContentLayout, dates: &[&str]) {
    for date in dates {
        write(
            &layout.puzzles_dir.join(format!("{date}.json")),
            &puzzle_json(date).to_string(),
        );
    }
}
