//! Schema validation for puzzle documents.
//!
//! `validate` is a pure accumulator: it runs every check over the raw JSON
//! value and concatenates the issues, so a single call reports every defect in
//! a document. It never fails and performs no I/O.
//!
//! Check order (and therefore issue order):
//! 1. `date`
//! 2. `categories` (ids, titles, colors, words, then per-color counts)
//! 3. `startingOrder` (entries, then set equality with the category words)
//! 4. unexpected top-level keys
//!
//! Cross-category rules (unique ids, unique words, one category per color) are
//! tracked in a `CategoryPass` owned by a single `validate` call.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::date::is_iso_date;
use crate::model::{fields, Color, Puzzle, CATEGORY_COUNT, WORDS_PER_CATEGORY};
use crate::path::FieldPath;

/// A single schema defect.
///
/// `field` is a rendered `FieldPath`; the empty string means the whole document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    pub field: String,
    pub message: String,
}

impl ValidationIssue {
    pub fn new(field: &FieldPath, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }

    /// A whole-document issue.
    pub fn root(message: impl Into<String>) -> Self {
        Self::new(&FieldPath::root(), message)
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.field.is_empty() {
            f.write_str(&self.message)
        } else {
            write!(f, "{}: {}", self.field, self.message)
        }
    }
}

/// Facts known about a document from outside its content.
#[derive(Debug, Clone, Default)]
pub struct ValidationContext {
    /// Date derived from the source file name; `date` must equal it when set.
    pub expected_date: Option<String>,
}

impl ValidationContext {
    pub fn with_expected_date(date: impl Into<String>) -> Self {
        Self {
            expected_date: Some(date.into()),
        }
    }
}

/// Validate a raw puzzle document.
pub fn validate(raw: &Value, ctx: &ValidationContext) -> Vec<ValidationIssue> {
    let Some(obj) = raw.as_object() else {
        return vec![ValidationIssue::root("puzzle must be a JSON object")];
    };

    let mut issues = check_date(obj.get(fields::DATE), ctx);

    let mut pass = CategoryPass::default();
    issues.extend(check_categories(obj.get(fields::CATEGORIES), &mut pass));
    issues.extend(check_starting_order(
        obj.get(fields::STARTING_ORDER),
        &pass.word_pool(),
    ));
    issues.extend(check_root_keys(obj));

    issues
}

/// Validate and, when clean, convert into the typed model.
pub fn validate_puzzle(
    raw: &Value,
    ctx: &ValidationContext,
) -> Result<Puzzle, Vec<ValidationIssue>> {
    let issues = validate(raw, ctx);
    if !issues.is_empty() {
        return Err(issues);
    }
    Puzzle::from_value(raw).map_err(|e| vec![ValidationIssue::root(e.to_string())])
}

fn check_date(v: Option<&Value>, ctx: &ValidationContext) -> Vec<ValidationIssue> {
    let path = FieldPath::field(fields::DATE);
    let Some(v) = v else {
        return vec![ValidationIssue::new(&path, "date is required")];
    };
    let Some(date) = v.as_str().filter(|s| is_iso_date(s)) else {
        return vec![ValidationIssue::new(
            &path,
            format!("date must be a string in YYYY-MM-DD format, got {v}"),
        )];
    };

    match ctx.expected_date.as_deref() {
        Some(expected) if expected != date => vec![ValidationIssue::new(
            &path,
            format!("date {date} does not match the file name date {expected}"),
        )],
        _ => Vec::new(),
    }
}

/// Cross-category state for one validation call.
#[derive(Debug, Default)]
struct CategoryPass {
    ids: BTreeSet<String>,
    /// Word -> index of the category that first claimed it.
    word_owner: BTreeMap<String, usize>,
    color_counts: BTreeMap<Color, usize>,
}

impl CategoryPass {
    fn word_pool(&self) -> BTreeSet<String> {
        self.word_owner.keys().cloned().collect()
    }
}

fn check_categories(v: Option<&Value>, pass: &mut CategoryPass) -> Vec<ValidationIssue> {
    let path = FieldPath::field(fields::CATEGORIES);
    let Some(v) = v else {
        return vec![ValidationIssue::new(&path, "categories is required")];
    };
    let Some(categories) = v.as_array() else {
        return vec![ValidationIssue::new(&path, "categories must be an array")];
    };

    let mut issues = Vec::new();
    if categories.len() != CATEGORY_COUNT {
        issues.push(ValidationIssue::new(
            &path,
            format!(
                "expected exactly {CATEGORY_COUNT} categories, found {}",
                categories.len()
            ),
        ));
    }

    for (idx, category) in categories.iter().enumerate() {
        issues.extend(check_category(idx, category, &path.index(idx), pass));
    }

    for color in Color::ALL {
        let found = pass.color_counts.get(&color).copied().unwrap_or(0);
        if found != 1 {
            issues.push(ValidationIssue::new(
                &path,
                format!("expected exactly 1 {color} category, found {found}"),
            ));
        }
    }

    issues
}

fn check_category(
    idx: usize,
    v: &Value,
    path: &FieldPath,
    pass: &mut CategoryPass,
) -> Vec<ValidationIssue> {
    let Some(obj) = v.as_object() else {
        return vec![ValidationIssue::new(path, "category must be an object")];
    };

    let mut issues = Vec::new();

    match required_text(obj, "id", path) {
        Ok(id) => {
            if !pass.ids.insert(id.to_string()) {
                issues.push(ValidationIssue::new(
                    &path.key("id"),
                    format!("duplicate category id \"{id}\""),
                ));
            }
        }
        Err(issue) => issues.push(issue),
    }

    if let Err(issue) = required_text(obj, "title", path) {
        issues.push(issue);
    }

    let color_path = path.key("color");
    match obj.get("color") {
        None => issues.push(ValidationIssue::new(&color_path, "color is required")),
        Some(c) => match c.as_str().and_then(Color::parse) {
            Some(color) => *pass.color_counts.entry(color).or_insert(0) += 1,
            None => issues.push(ValidationIssue::new(
                &color_path,
                format!("color must be one of yellow, green, blue, purple, got {c}"),
            )),
        },
    }

    issues.extend(check_category_words(idx, obj.get("words"), &path.key("words"), pass));
    issues
}

fn check_category_words(
    idx: usize,
    v: Option<&Value>,
    path: &FieldPath,
    pass: &mut CategoryPass,
) -> Vec<ValidationIssue> {
    let Some(v) = v else {
        return vec![ValidationIssue::new(path, "words is required")];
    };
    let Some(words) = v.as_array() else {
        return vec![ValidationIssue::new(path, "words must be an array")];
    };

    let mut issues = Vec::new();
    if words.len() != WORDS_PER_CATEGORY {
        issues.push(ValidationIssue::new(
            path,
            format!(
                "expected exactly {WORDS_PER_CATEGORY} words, found {}",
                words.len()
            ),
        ));
    }

    let mut local = BTreeSet::new();
    for (j, w) in words.iter().enumerate() {
        let word_path = path.index(j);
        let (word, word_issues) = check_word(&word_path, w);
        issues.extend(word_issues);
        let Some(word) = word else { continue };

        if !local.insert(word) {
            issues.push(ValidationIssue::new(
                &word_path,
                format!("duplicate word \"{word}\" within category"),
            ));
            continue;
        }

        match pass.word_owner.get(word) {
            Some(&owner) if owner != idx => issues.push(ValidationIssue::new(
                &word_path,
                format!("word \"{word}\" is already used by categories[{owner}]"),
            )),
            Some(_) => {}
            None => {
                pass.word_owner.insert(word.to_string(), idx);
            }
        }
    }

    issues
}

fn check_starting_order(v: Option<&Value>, pool: &BTreeSet<String>) -> Vec<ValidationIssue> {
    let path = FieldPath::field(fields::STARTING_ORDER);
    let Some(v) = v else {
        return vec![ValidationIssue::new(&path, "startingOrder is required")];
    };
    let Some(entries) = v.as_array() else {
        return vec![ValidationIssue::new(
            &path,
            "startingOrder must be an array of strings",
        )];
    };

    let mut issues = Vec::new();
    let mut seen = BTreeSet::new();
    for (j, e) in entries.iter().enumerate() {
        let entry_path = path.index(j);
        let (word, word_issues) = check_word(&entry_path, e);
        issues.extend(word_issues);
        if let Some(word) = word {
            if !seen.insert(word.to_string()) {
                issues.push(ValidationIssue::new(
                    &entry_path,
                    format!("duplicate word \"{word}\" in startingOrder"),
                ));
            }
        }
    }

    // An empty pool means the categories section is already broken; set
    // comparisons against it would only repeat that.
    if pool.is_empty() {
        return issues;
    }

    if entries.len() != pool.len() {
        issues.push(ValidationIssue::new(
            &path,
            format!(
                "startingOrder has {} entries but categories define {} words",
                entries.len(),
                pool.len()
            ),
        ));
    }

    let missing: Vec<&str> = pool.difference(&seen).map(String::as_str).collect();
    if !missing.is_empty() {
        issues.push(ValidationIssue::new(
            &path,
            format!("startingOrder is missing words: {}", missing.join(", ")),
        ));
    }

    let extra: Vec<&str> = seen.difference(pool).map(String::as_str).collect();
    if !extra.is_empty() {
        issues.push(ValidationIssue::new(
            &path,
            format!(
                "startingOrder contains words not in any category: {}",
                extra.join(", ")
            ),
        ));
    }

    issues
}

fn check_root_keys(obj: &Map<String, Value>) -> Vec<ValidationIssue> {
    obj.keys()
        .filter(|k| !fields::ALLOWED_ROOT.contains(&k.as_str()))
        .map(|k| {
            ValidationIssue::new(
                &FieldPath::field(k.as_str()),
                format!("unexpected field \"{k}\""),
            )
        })
        .collect()
}

/// Shape checks shared by category words and `startingOrder` entries.
///
/// Returns the word when it is a non-blank string, even if it carries
/// whitespace or case issues, so duplicate and membership checks still see it.
fn check_word<'a>(path: &FieldPath, v: &'a Value) -> (Option<&'a str>, Vec<ValidationIssue>) {
    let Some(word) = v.as_str() else {
        return (None, vec![ValidationIssue::new(path, "word must be a string")]);
    };
    let trimmed = word.trim();
    if trimmed.is_empty() {
        return (None, vec![ValidationIssue::new(path, "word must not be empty")]);
    }

    let mut issues = Vec::new();
    if trimmed != word {
        issues.push(ValidationIssue::new(
            path,
            format!("word \"{word}\" must not have leading or trailing whitespace"),
        ));
    }
    if word.to_uppercase() != word {
        issues.push(ValidationIssue::new(
            path,
            format!("word \"{word}\" must be uppercase"),
        ));
    }
    (Some(word), issues)
}

fn required_text<'a>(
    obj: &'a Map<String, Value>,
    key: &str,
    parent: &FieldPath,
) -> Result<&'a str, ValidationIssue> {
    let path = parent.key(key);
    match obj.get(key) {
        None => Err(ValidationIssue::new(&path, format!("{key} is required"))),
        Some(Value::String(s)) if s.trim().is_empty() => {
            Err(ValidationIssue::new(&path, format!("{key} must not be empty")))
        }
        Some(Value::String(s)) => Ok(s.as_str()),
        Some(_) => Err(ValidationIssue::new(&path, format!("{key} must be a string"))),
    }
}
