//! Name-based category paths.
//!
//! A path is the sequence of category names from a root down to a node,
//! written joined by `/` (`"Electronics/Audio/Headphones"`). Products store
//! their category this way. The projection is lossy: renaming a category
//! silently invalidates every path computed before the rename, and sibling
//! categories sharing a name cannot be told apart.

use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

pub const PATH_SEPARATOR: char = '/';

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct CategoryPath {
    segments: Vec<String>,
}

impl CategoryPath {
    /// Parse a `/`-joined path. Segments are trimmed and empty ones dropped.
    pub fn parse(raw: &str) -> Self {
        Self::from_segments(raw.split(PATH_SEPARATOR))
    }

    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            segments: segments
                .into_iter()
                .map(|s| s.as_ref().trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
        }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn leaf(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    pub fn child(&self, name: &str) -> Self {
        let mut segments = self.segments.clone();
        segments.push(name.trim().to_string());
        Self { segments }
    }

    /// Whole-segment prefix test: `A/B` is a prefix of `A/B/C` but not of `A/Bc`.
    pub fn starts_with(&self, prefix: &CategoryPath) -> bool {
        self.segments.len() >= prefix.segments.len()
            && self.segments[..prefix.segments.len()] == prefix.segments[..]
    }

    /// Rewrite a leading `old` prefix to `new`. None when `old` is not a prefix.
    pub fn replace_prefix(&self, old: &CategoryPath, new: &CategoryPath) -> Option<Self> {
        if old.is_empty() || !self.starts_with(old) {
            return None;
        }
        let mut segments = new.segments.clone();
        segments.extend_from_slice(&self.segments[old.segments.len()..]);
        Some(Self { segments })
    }
}

impl fmt::Display for CategoryPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for segment in &self.segments {
            if !first {
                write!(f, "{}", PATH_SEPARATOR)?;
            }
            f.write_str(segment)?;
            first = false;
        }
        Ok(())
    }
}

impl FromStr for CategoryPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl From<&str> for CategoryPath {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}

impl From<String> for CategoryPath {
    fn from(raw: String) -> Self {
        Self::parse(&raw)
    }
}

impl From<CategoryPath> for String {
    fn from(path: CategoryPath) -> Self {
        path.to_string()
    }
}
