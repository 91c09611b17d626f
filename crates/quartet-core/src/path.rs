//! Field paths for validation issues.
//!
//! Grammar: a root field name, `.name` for nested object access and `[i]` for
//! array elements, e.g. `categories[1].words[2]`. The empty path addresses the
//! whole document.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Key(String),
    Index(usize),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldPath {
    segments: Vec<Segment>,
}

impl FieldPath {
    /// The whole-document path (renders as an empty string).
    pub fn root() -> Self {
        Self::default()
    }

    /// A path starting at a top-level field.
    pub fn field(name: impl Into<String>) -> Self {
        Self::root().key(name)
    }

    pub fn key(&self, name: impl Into<String>) -> Self {
        let mut next = self.clone();
        next.segments.push(Segment::Key(name.into()));
        next
    }

    pub fn index(&self, i: usize) -> Self {
        let mut next = self.clone();
        next.segments.push(Segment::Index(i));
        next
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (pos, seg) in self.segments.iter().enumerate() {
            match seg {
                Segment::Key(k) if pos == 0 => f.write_str(k)?,
                Segment::Key(k) => write!(f, ".{k}")?,
                Segment::Index(i) => write!(f, "[{i}]")?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_nested_paths() {
        let p = FieldPath::field("categories").index(1).key("words").index(2);
        assert_eq!(p.to_string(), "categories[1].words[2]");
    }

    #[test]
    fn root_is_empty() {
        assert_eq!(FieldPath::root().to_string(), "");
        assert_eq!(FieldPath::field("date").to_string(), "date");
    }
}
