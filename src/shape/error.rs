//! Structured validation failure: every violated path, not just the first.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Key(k) => write!(f, "{}", k),
            PathSegment::Index(i) => write!(f, "{}", i),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueCode {
    InvalidType,
    Required,
    InvalidEnumValue,
    InvalidUnion,
    InvalidFormat,
    MissingUniqueKey,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Issue {
    pub path: Vec<PathSegment>,
    pub code: IssueCode,
    pub message: String,
}

impl Issue {
    /// Dotted path, `$` for the root.
    pub fn path_string(&self) -> String {
        if self.path.is_empty() {
            return "$".to_string();
        }
        self.path.iter().map(ToString::to_string).collect::<Vec<_>>().join(".")
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq, Serialize)]
#[error("{}", summarize(.issues))]
pub struct ValidationError {
    pub issues: Vec<Issue>,
}

fn summarize(issues: &[Issue]) -> String {
    issues
        .iter()
        .map(|i| format!("{}: {}", i.path_string(), i.message))
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationError {
    pub fn paths(&self) -> Vec<String> {
        self.issues.iter().map(Issue::path_string).collect()
    }

    pub fn has_path(&self, path: &str) -> bool {
        self.issues.iter().any(|i| i.path_string() == path)
    }
}
