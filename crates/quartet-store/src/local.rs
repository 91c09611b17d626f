//! Local puzzle loading.
//!
//! Resolves user inputs to puzzle files, parses them, and runs the schema
//! validator on each. Inputs are tried, in order, as:
//! 1. an absolute path
//! 2. relative to the repository root
//! 3. relative to the content workspace (`content/`)
//! 4. relative to the puzzle directory (`content/puzzles/`)
//!
//! With no inputs, every `*.json` file directly inside the puzzle directory is
//! loaded in file-name order.
//!
//! Unparseable JSON is a schema issue on the file, not an error; only a missing
//! input or an unreadable file aborts loading.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value;
use tracing::debug;
use walkdir::WalkDir;

use quartet_core::date::date_from_file_name;
use quartet_core::model::Puzzle;
use quartet_core::validate::{validate_puzzle, ValidationContext, ValidationIssue};

use crate::error::{StoreError, StoreResult};

pub const CONTENT_DIR: &str = "content";
pub const PUZZLES_DIR: &str = "puzzles";

/// Where puzzle sources live on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentLayout {
    pub repo_root: PathBuf,
    pub content_dir: PathBuf,
    pub puzzles_dir: PathBuf,
}

impl ContentLayout {
    /// Conventional layout under `repo_root`: `content/` and `content/puzzles/`.
    pub fn new(repo_root: impl Into<PathBuf>) -> Self {
        let repo_root = repo_root.into();
        let content_dir = repo_root.join(CONTENT_DIR);
        let puzzles_dir = content_dir.join(PUZZLES_DIR);
        Self {
            repo_root,
            content_dir,
            puzzles_dir,
        }
    }

    /// Candidate locations for an input, in resolution order.
    pub fn candidates(&self, input: &str) -> Vec<PathBuf> {
        let p = Path::new(input);
        if p.is_absolute() {
            return vec![p.to_path_buf()];
        }
        vec![
            self.repo_root.join(p),
            self.content_dir.join(p),
            self.puzzles_dir.join(p),
        ]
    }

    /// Short identifier for messages: the path relative to the repository root
    /// when possible.
    pub fn display_name(&self, path: &Path) -> String {
        let rel = path.strip_prefix(&self.repo_root).unwrap_or(path);
        rel.components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/")
    }
}

/// A schema issue tagged with the file it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileIssue {
    pub file: String,
    pub field: String,
    pub message: String,
}

impl FileIssue {
    fn from_issue(file: &str, issue: ValidationIssue) -> Self {
        Self {
            file: file.to_string(),
            field: issue.field,
            message: issue.message,
        }
    }
}

impl fmt::Display for FileIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.field.is_empty() {
            write!(f, "{}: {}", self.file, self.message)
        } else {
            write!(f, "{}: {}: {}", self.file, self.field, self.message)
        }
    }
}

/// One loaded puzzle file.
#[derive(Debug, Clone)]
pub struct LocalPuzzle {
    pub path: PathBuf,
    pub file_name: String,
    /// Identifier used to tag issues.
    pub display: String,
    /// Exact bytes read from disk; these are what gets uploaded.
    pub raw: Vec<u8>,
    /// Typed document, present when the file validated cleanly.
    pub puzzle: Option<Puzzle>,
}

/// Loaded files plus every issue found across them.
#[derive(Debug, Clone, Default)]
pub struct LoadedBatch {
    pub files: Vec<LocalPuzzle>,
    pub issues: Vec<FileIssue>,
}

impl LoadedBatch {
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    /// Fail with every issue unless the whole batch is clean.
    pub fn require_clean(self) -> StoreResult<Vec<LocalPuzzle>> {
        if self.is_clean() {
            Ok(self.files)
        } else {
            Err(StoreError::Validation(self.issues))
        }
    }
}

/// Resolve one input to an existing file.
pub fn resolve_input(layout: &ContentLayout, input: &str) -> StoreResult<PathBuf> {
    layout
        .candidates(input)
        .into_iter()
        .find(|c| c.is_file())
        .ok_or_else(|| StoreError::InputNotFound(input.to_string()))
}

/// Every `*.json` file directly inside the puzzle directory, sorted by name.
pub fn list_puzzle_files(layout: &ContentLayout) -> StoreResult<Vec<PathBuf>> {
    if !layout.puzzles_dir.is_dir() {
        return Err(StoreError::InputNotFound(
            layout.puzzles_dir.display().to_string(),
        ));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(&layout.puzzles_dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(&layout.puzzles_dir).to_path_buf();
            StoreError::io(path, e.into())
        })?;
        let is_json = entry.path().extension().is_some_and(|ext| ext == "json");
        if entry.file_type().is_file() && is_json {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

/// Read, parse and validate a single file.
pub fn load_file(
    layout: &ContentLayout,
    path: &Path,
) -> StoreResult<(LocalPuzzle, Vec<FileIssue>)> {
    let raw = fs::read(path).map_err(|e| StoreError::io(path, e))?;
    let display = layout.display_name(path);
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| display.clone());

    let ctx = ValidationContext {
        expected_date: date_from_file_name(&file_name),
    };

    let (puzzle, issues) = match serde_json::from_slice::<Value>(&raw) {
        Ok(value) => match validate_puzzle(&value, &ctx) {
            Ok(puzzle) => (Some(puzzle), Vec::new()),
            Err(issues) => (None, issues),
        },
        Err(e) => (None, vec![ValidationIssue::root(format!("invalid JSON: {e}"))]),
    };

    let issues = issues
        .into_iter()
        .map(|i| FileIssue::from_issue(&display, i))
        .collect();

    Ok((
        LocalPuzzle {
            path: path.to_path_buf(),
            file_name,
            display,
            raw,
            puzzle,
        },
        issues,
    ))
}

/// Load and validate the requested inputs, or the whole puzzle directory when
/// `inputs` is empty.
///
/// A path named twice is loaded once. Two different files sharing a file name
/// would map to the same remote key, so the second is flagged as an issue.
pub fn load_puzzles(layout: &ContentLayout, inputs: &[String]) -> StoreResult<LoadedBatch> {
    let paths = if inputs.is_empty() {
        list_puzzle_files(layout)?
    } else {
        inputs
            .iter()
            .map(|i| resolve_input(layout, i))
            .collect::<StoreResult<Vec<_>>>()?
    };

    let mut batch = LoadedBatch::default();
    let mut seen_paths = BTreeSet::new();
    let mut names: BTreeMap<String, String> = BTreeMap::new();

    for path in paths {
        if !seen_paths.insert(path.clone()) {
            continue;
        }
        let (file, issues) = load_file(layout, &path)?;
        debug!(file = %file.display, issues = issues.len(), "loaded puzzle");

        if let Some(first) = names.get(&file.file_name) {
            batch.issues.push(FileIssue {
                file: file.display.clone(),
                field: String::new(),
                message: format!("file name {} is already used by {first}", file.file_name),
            });
        } else {
            names.insert(file.file_name.clone(), file.display.clone());
        }

        batch.issues.extend(issues);
        batch.files.push(file);
    }

    Ok(batch)
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use serde_json::json;

    use super::*;
    use crate::test_support::{puzzle_json, workspace, write};

    #[test]
    fn loads_whole_directory_in_name_order() {
        let (_tmp, layout) = workspace();
        for date in ["2024-06-02", "2024-06-01"] {
            write(
                &layout.puzzles_dir.join(format!("{date}.json")),
                &puzzle_json(date).to_string(),
            );
        }
        write(&layout.puzzles_dir.join("README.md"), "notes");

        let batch = load_puzzles(&layout, &[]).unwrap();
        assert!(batch.is_clean(), "{:?}", batch.issues);
        let names: Vec<&str> = batch.files.iter().map(|f| f.file_name.as_str()).collect();
        assert_eq!(names, vec!["2024-06-01.json", "2024-06-02.json"]);
        assert!(batch.files.iter().all(|f| f.puzzle.is_some()));
    }

    #[test]
    fn resolution_order_covers_all_bases() {
        let (_tmp, layout) = workspace();
        write(&layout.puzzles_dir.join("2024-06-01.json"), "{}");
        write(&layout.content_dir.join("drafts").join("d.json"), "{}");
        write(&layout.repo_root.join("loose.json"), "{}");

        let by_name = resolve_input(&layout, "2024-06-01.json").unwrap();
        assert_eq!(by_name, layout.puzzles_dir.join("2024-06-01.json"));

        let in_content = resolve_input(&layout, "drafts/d.json").unwrap();
        assert_eq!(in_content, layout.content_dir.join("drafts").join("d.json"));

        let at_root = resolve_input(&layout, "loose.json").unwrap();
        assert_eq!(at_root, layout.repo_root.join("loose.json"));

        let abs = layout.puzzles_dir.join("2024-06-01.json");
        assert_eq!(resolve_input(&layout, abs.to_str().unwrap()).unwrap(), abs);
    }

    #[test]
    fn missing_input_names_original() {
        let (_tmp, layout) = workspace();
        let err = load_puzzles(&layout, &["nope.json".to_string()]).unwrap_err();
        assert_matches!(err, StoreError::InputNotFound(ref s) if s == "nope.json");
    }

    #[test]
    fn missing_puzzle_directory_is_not_found() {
        let tmp = tempfile::tempdir().unwrap();
        let layout = ContentLayout::new(tmp.path());
        assert_matches!(load_puzzles(&layout, &[]), Err(StoreError::InputNotFound(_)));
    }

    #[test]
    fn bad_json_becomes_root_issue() {
        let (_tmp, layout) = workspace();
        write(&layout.puzzles_dir.join("2024-06-01.json"), "{ not json");

        let batch = load_puzzles(&layout, &[]).unwrap();
        assert_eq!(batch.issues.len(), 1);
        let issue = &batch.issues[0];
        assert_eq!(issue.file, "content/puzzles/2024-06-01.json");
        assert_eq!(issue.field, "");
        assert!(issue.message.starts_with("invalid JSON"));
        assert!(batch.files[0].puzzle.is_none());
    }

    #[test]
    fn file_name_date_must_match() {
        let (_tmp, layout) = workspace();
        write(
            &layout.puzzles_dir.join("2024-06-05.json"),
            &puzzle_json("2024-06-01").to_string(),
        );
        write(
            &layout.puzzles_dir.join("undated.json"),
            &puzzle_json("2024-06-01").to_string(),
        );

        let batch = load_puzzles(&layout, &[]).unwrap();
        assert_eq!(batch.issues.len(), 1);
        assert_eq!(batch.issues[0].file, "content/puzzles/2024-06-05.json");
        assert_eq!(batch.issues[0].field, "date");
        assert!(batch.issues[0].to_string().contains("2024-06-05"));
    }

    #[test]
    fn issues_are_tagged_per_file_and_batch_fails_closed() {
        let (_tmp, layout) = workspace();
        write(
            &layout.puzzles_dir.join("2024-06-01.json"),
            &puzzle_json("2024-06-01").to_string(),
        );
        let mut bad = puzzle_json("2024-06-02");
        bad["categories"][0]["words"][0] = json!("bass");
        write(&layout.puzzles_dir.join("2024-06-02.json"), &bad.to_string());

        let batch = load_puzzles(&layout, &[]).unwrap();
        assert_eq!(batch.files.len(), 2);
        assert!(batch
            .issues
            .iter()
            .all(|i| i.file == "content/puzzles/2024-06-02.json"));
        assert_matches!(
            batch.require_clean(),
            Err(StoreError::Validation(issues)) if !issues.is_empty()
        );
    }

    #[test]
    fn repeated_path_loaded_once_and_name_collision_flagged() {
        let (_tmp, layout) = workspace();
        let body = puzzle_json("2024-06-01").to_string();
        write(&layout.puzzles_dir.join("2024-06-01.json"), &body);
        write(&layout.content_dir.join("staging").join("2024-06-01.json"), &body);

        let inputs = vec![
            "2024-06-01.json".to_string(),
            "content/puzzles/2024-06-01.json".to_string(),
            "staging/2024-06-01.json".to_string(),
        ];
        let batch = load_puzzles(&layout, &inputs).unwrap();
        assert_eq!(batch.files.len(), 2);
        assert_eq!(batch.issues.len(), 1);
        assert!(batch.issues[0]
            .message
            .contains("already used by content/puzzles/2024-06-01.json"));
    }
}
