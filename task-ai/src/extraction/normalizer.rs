//! Turns raw model output into candidate items.
//!
//! Models are told to answer with a JSON array but routinely wrap it in prose or
//! markdown fences, or ignore the instruction and answer with a bullet list. Each
//! tier below handles one of those shapes; the first tier that succeeds wins.

use crate::types::candidate::CandidateItem;
use log::*;
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

type Strategy = fn(&str) -> Option<Vec<CandidateItem>>;

/// Parsing tiers in priority order.
const STRATEGIES: [(&str, Strategy); 3] = [
    ("json", parse_whole_json),
    ("embedded_json", parse_embedded_json),
    ("lines", parse_lines),
];

static EMBEDDED_JSON: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)(\[.*\]|\{.*\})").expect("embedded JSON pattern is valid"));

/// Parse a raw model response into candidate items.
///
/// Never fails: the line tier accepts any text, so the result is empty only when
/// the response holds nothing but whitespace and bullet markers (or a JSON
/// document without a single string/object item).
pub fn parse_model_output(raw: &str) -> Vec<CandidateItem> {
    let text = raw.trim();

    for (name, strategy) in STRATEGIES {
        if let Some(items) = strategy(text) {
            trace!("Parsed {} candidate(s) with the {} tier", items.len(), name);
            return items;
        }
    }

    Vec::new()
}

/// Tier 1: the entire text is a JSON array or object.
pub fn parse_whole_json(text: &str) -> Option<Vec<CandidateItem>> {
    serde_json::from_str::<Value>(text)
        .ok()
        .and_then(candidates_from_value)
}

/// Tier 2: the text contains a JSON array or object somewhere, e.g. inside a
/// markdown fence or after a sentence of preamble.
pub fn parse_embedded_json(text: &str) -> Option<Vec<CandidateItem>> {
    let embedded = EMBEDDED_JSON.find(text)?;
    parse_whole_json(embedded.as_str())
}

/// Tier 3: one candidate per non-empty line, bullet markers removed.
pub fn parse_lines(text: &str) -> Option<Vec<CandidateItem>> {
    let items = text
        .lines()
        .map(strip_line_markers)
        .filter(|line| !line.is_empty())
        .map(|line| CandidateItem::Text(line.to_string()))
        .collect();
    Some(items)
}

fn candidates_from_value(value: Value) -> Option<Vec<CandidateItem>> {
    match value {
        Value::Array(values) => Some(values.iter().filter_map(CandidateItem::from_json).collect()),
        Value::Object(_) => CandidateItem::from_json(&value).map(|item| vec![item]),
        _ => None,
    }
}

fn strip_line_markers(line: &str) -> &str {
    line.trim_start_matches(|c: char| matches!(c, '*' | '-' | '•' | '#') || c.is_whitespace())
        .trim_end()
}
