//! Puzzle document model.
//!
//! A puzzle has exactly four categories of four words each, one category per
//! color, and a sixteen-word `startingOrder` that permutes the category words.
//!
//! These types describe a document that has already passed
//! `crate::validate::validate`. Untrusted input is validated as a raw
//! `serde_json::Value` first so that every defect is reported, then converted
//! with `Puzzle::from_value`.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::{QuartetError, QuartetResult};

/// Number of categories in a puzzle.
pub const CATEGORY_COUNT: usize = 4;

/// Number of words in each category.
pub const WORDS_PER_CATEGORY: usize = 4;

/// Top-level field names.
pub mod fields {
    pub const DATE: &str = "date";
    pub const CATEGORIES: &str = "categories";
    pub const STARTING_ORDER: &str = "startingOrder";

    /// The closed set of allowed top-level keys.
    pub const ALLOWED_ROOT: [&str; 3] = [DATE, CATEGORIES, STARTING_ORDER];
}

/// Category color. Each color appears on exactly one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Yellow,
    Green,
    Blue,
    Purple,
}

impl Color {
    pub const ALL: [Color; 4] = [Color::Yellow, Color::Green, Color::Blue, Color::Purple];

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "yellow" => Some(Self::Yellow),
            "green" => Some(Self::Green),
            "blue" => Some(Self::Blue),
            "purple" => Some(Self::Purple),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Yellow => "yellow",
            Self::Green => "green",
            Self::Blue => "blue",
            Self::Purple => "purple",
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Extra keys on a category are ignored; only the document root is closed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub title: String,
    pub color: Color,
    pub words: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Puzzle {
    pub date: String,
    pub categories: Vec<Category>,
    #[serde(rename = "startingOrder")]
    pub starting_order: Vec<String>,
}

impl Puzzle {
    /// Convert a validated JSON value into the typed model.
    pub fn from_value(v: &Value) -> QuartetResult<Self> {
        Puzzle::deserialize(v).map_err(|e| {
            QuartetError::invalid_argument(format!("puzzle does not match schema: {e}"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Value {
        json!({
            "date": "2024-06-01",
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

    #[test]
    fn typed_model_from_value() {
        let p = Puzzle::from_value(&sample()).unwrap();
        assert_eq!(p.categories.len(), CATEGORY_COUNT);
        assert!(p.categories.iter().all(|c| c.words.len() == WORDS_PER_CATEGORY));
        assert_eq!(p.categories[1].color, Color::Green);
        assert_eq!(p.starting_order.len(), CATEGORY_COUNT * WORDS_PER_CATEGORY);
    }

    #[test]
    fn unknown_fields_rejected() {
        let mut v = sample();
        v["extra"] = json!(true);
        assert!(Puzzle::from_value(&v).is_err());
    }

    #[test]
    fn extra_category_keys_ignored() {
        let mut v = sample();
        v["categories"][0]["hint"] = json!("swims");
        let p = Puzzle::from_value(&v).unwrap();
        assert_eq!(p.categories[0].id, "fish");
    }

    #[test]
    fn color_parse_round_trips() {
        for c in Color::ALL {
            assert_eq!(Color::parse(c.as_str()), Some(c));
        }
        assert_eq!(Color::parse("Yellow"), None);
        assert_eq!(Color::parse("red"), None);
    }
}
