//! Turns one candidate item into a normalized [`TaskDraft`].
//!
//! Cleaning is a fixed sequence of pure text transforms: strip the speaker label,
//! pull metadata annotations out of the text, let explicit structured fields
//! override the heuristics, shorten, default the priority.

use crate::config::boundary_threshold;
use crate::types::candidate::{CandidateItem, StructuredItem};
use crate::types::draft::{Priority, TaskDraft};
use regex::Regex;
use std::sync::LazyLock;

static SPEAKER_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:\*\*|\*|\x{2022})?\s*([A-Za-z ,'\-.\d]+)(?:\s*\([^)]*\))?\s*:\s*")
        .expect("speaker label pattern is valid")
});

static SIMPLE_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([A-Z][a-z]+):\s*").expect("simple label pattern is valid")
});

static DUE_ANNOTATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\(Due[:\s]+([^)]+)\)").expect("due annotation pattern is valid")
});

static WHEN_ANNOTATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\(When[:\s]+([^)]+)\)").expect("when annotation pattern is valid")
});

static PRIORITY_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)Priority[:\s]+(High|Medium|Low)").expect("priority tag pattern is valid")
});

static PRIORITY_ANNOTATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\(\s*Priority[:\s]+(?:High|Medium|Low)\s*\)")
        .expect("priority annotation pattern is valid")
});

static LEADING_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([A-Z][a-z]+)\b").expect("leading name pattern is valid")
});

static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

/// Longest word accepted as an assignee guess.
const MAX_ASSIGNEE_LEN: usize = 20;

const ELLIPSIS: &str = "...";

/// Fields recovered from the free text of one item.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Metadata {
    pub text: String,
    pub assignee: Option<String>,
    pub due: Option<String>,
    pub priority: Option<Priority>,
}

/// Clean one candidate. Returns `None` when nothing of the text survives.
pub fn clean(candidate: &CandidateItem, max_text_len: usize) -> Option<TaskDraft> {
    let (raw, explicit) = match candidate {
        CandidateItem::Text(text) => (text.as_str(), None),
        CandidateItem::Structured(item) => (item.primary_text(), Some(item)),
    };

    let (text, speaker) = strip_speaker_prefix(raw);
    let mut metadata = extract_metadata(&text, speaker.as_deref());
    if let Some(item) = explicit {
        merge_explicit(&mut metadata, item);
    }

    let text = shorten(&metadata.text, max_text_len);
    if text.is_empty() {
        return None;
    }

    Some(TaskDraft {
        text,
        assignee: metadata.assignee,
        due: metadata.due,
        priority: metadata.priority.unwrap_or_default(),
    })
}

/// Remove a leading speaker label such as `Alice:`, `**Bob (PM):**` or `• Carol:`.
///
/// Returns the remaining text and the removed label, if any.
pub fn strip_speaker_prefix(text: &str) -> (String, Option<String>) {
    let mut text = text.trim().to_string();
    let mut speaker = None;

    if let Some(captures) = SPEAKER_LABEL.captures(&text) {
        speaker = captures.get(1).map(|m| m.as_str().trim().to_string());
        let end = captures.get(0).map_or(0, |m| m.end());
        text = text[end..].to_string();
    }

    if let Some(captures) = SIMPLE_LABEL.captures(&text) {
        if speaker.is_none() {
            speaker = captures.get(1).map(|m| m.as_str().to_string());
        }
        let end = captures.get(0).map_or(0, |m| m.end());
        text = text[end..].to_string();
    }

    (text.trim().to_string(), speaker)
}

/// Pull due/when/priority annotations out of `text` and guess the assignee from
/// the speaker label removed before it.
pub fn extract_metadata(text: &str, speaker: Option<&str>) -> Metadata {
    let mut remaining = text.trim().to_string();

    let mut due = take_annotation(&DUE_ANNOTATION, &mut remaining);
    let when = take_annotation(&WHEN_ANNOTATION, &mut remaining);
    if due.is_none() {
        due = when;
    }

    let priority = PRIORITY_TAG
        .captures(text)
        .and_then(|captures| captures.get(1))
        .and_then(|m| m.as_str().parse::<Priority>().ok());
    remaining = PRIORITY_ANNOTATION.replace_all(&remaining, "").into_owned();

    let remaining = WHITESPACE_RUN.replace_all(&remaining, " ");
    let remaining = strip_leading_markers(&remaining).trim();

    // A label can surface only once a leading annotation is gone, e.g. "(Due: Friday) Bob: do X".
    let (remaining, late_speaker) = match SIMPLE_LABEL.captures(remaining) {
        Some(captures) => {
            let end = captures.get(0).map_or(0, |m| m.end());
            let label = captures.get(1).map(|m| m.as_str());
            (remaining[end..].trim().to_string(), label)
        }
        None => (remaining.to_string(), None),
    };

    let assignee = speaker.or(late_speaker).and_then(guess_assignee);

    Metadata {
        text: remaining,
        assignee,
        due,
        priority,
    }
}

/// Explicit, non-empty fields of a structured item win over heuristics.
pub fn merge_explicit(metadata: &mut Metadata, item: &StructuredItem) {
    if let Some(assignee) = non_empty(&item.assignee) {
        metadata.assignee = Some(assignee);
    }
    if let Some(due) = non_empty(&item.due) {
        metadata.due = Some(due);
    }
    if let Some(priority) = item
        .priority
        .as_deref()
        .and_then(|p| p.parse::<Priority>().ok())
    {
        metadata.priority = Some(priority);
    }
}

/// Shorten `text` to at most `max_len` characters.
///
/// Prefers ending at the last sentence (". ") or clause (", ") break found beyond
/// 40% of the limit; otherwise hard-cuts and appends an ellipsis.
pub fn shorten(text: &str, max_len: usize) -> String {
    let text = text.trim();
    if text.chars().count() <= max_len {
        return text.to_string();
    }

    let cut: String = text.chars().take(max_len).collect();
    let threshold = boundary_threshold(max_len);
    let char_index = |byte_index: usize| cut[..byte_index].chars().count();

    if let Some(index) = cut.rfind(". ").filter(|&i| char_index(i) > threshold) {
        return cut[..=index].trim().to_string();
    }
    if let Some(index) = cut.rfind(", ").filter(|&i| char_index(i) > threshold) {
        return cut[..=index].trim().to_string();
    }

    let hard: String = text
        .chars()
        .take(max_len.saturating_sub(ELLIPSIS.len()))
        .collect();
    format!("{}{}", hard.trim_end(), ELLIPSIS)
}

/// Remove every match of `pattern` from `text`, returning the first capture.
fn take_annotation(pattern: &Regex, text: &mut String) -> Option<String> {
    let value = pattern
        .captures(text)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str().trim().to_string())?;
    let stripped = pattern.replace_all(text, "").into_owned();
    *text = stripped;
    Some(value)
}

fn guess_assignee(speaker: &str) -> Option<String> {
    LEADING_NAME
        .captures(speaker)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str().to_string())
        .filter(|name| name.chars().count() <= MAX_ASSIGNEE_LEN)
}

fn strip_leading_markers(text: &str) -> &str {
    text.trim_start_matches(|c: char| matches!(c, '-' | '*' | '#' | '•') || c.is_whitespace())
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
