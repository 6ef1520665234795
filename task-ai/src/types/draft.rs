//! Normalized extraction results.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Urgency of an extracted task.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

#[derive(Debug, PartialEq, Eq)]
pub struct PriorityParseError;

impl FromStr for Priority {
    type Err = PriorityParseError;

    /// Case-insensitive; surrounding whitespace is ignored.
    fn from_str(value: &str) -> Result<Priority, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "high" => Ok(Priority::High),
            "medium" => Ok(Priority::Medium),
            "low" => Ok(Priority::Low),
            _ => Err(PriorityParseError),
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Priority::High => write!(f, "High"),
            Priority::Medium => write!(f, "Medium"),
            Priority::Low => write!(f, "Low"),
        }
    }
}

/// A cleaned task ready to be persisted.
///
/// `text` is non-empty, trimmed, at most the configured length and free of
/// speaker labels, bullets and due/when/priority annotations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDraft {
    pub text: String,
    pub assignee: Option<String>,
    pub due: Option<String>,
    pub priority: Priority,
}

impl TaskDraft {
    /// Key used to collapse near-identical drafts within one extraction run.
    pub fn dedup_key(&self) -> String {
        self.text.to_lowercase()
    }
}
