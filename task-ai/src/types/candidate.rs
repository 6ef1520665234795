//! Intermediate items produced by the output normalizer.

use serde_json::{Map, Value};

/// A structured item as emitted by a model that honoured the JSON instructions.
///
/// Every field is optional: models routinely omit keys, send `null`, or use
/// `task`/`title` instead of `text`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StructuredItem {
    pub text: Option<String>,
    pub task: Option<String>,
    pub title: Option<String>,
    pub assignee: Option<String>,
    pub due: Option<String>,
    pub priority: Option<String>,
}

impl StructuredItem {
    /// Build from a JSON object, stringifying scalar values and dropping nulls.
    pub fn from_map(map: &Map<String, Value>) -> Self {
        let field = |key: &str| map.get(key).and_then(scalar_to_string);
        Self {
            text: field("text"),
            task: field("task"),
            title: field("title"),
            assignee: field("assignee"),
            due: field("due"),
            priority: field("priority"),
        }
    }

    /// First non-empty of `text`, `task`, `title`; empty when none is present.
    pub fn primary_text(&self) -> &str {
        [&self.text, &self.task, &self.title]
            .into_iter()
            .flatten()
            .map(String::as_str)
            .find(|value| !value.is_empty())
            .unwrap_or("")
    }
}

/// One raw item extracted from a model response, before cleaning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CandidateItem {
    Text(String),
    Structured(StructuredItem),
}

impl CandidateItem {
    /// Convert one JSON array element. Strings and objects are candidates; any other
    /// JSON value carries no task and yields `None`.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::String(text) => Some(CandidateItem::Text(text.clone())),
            Value::Object(map) => Some(CandidateItem::Structured(StructuredItem::from_map(map))),
            _ => None,
        }
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}
