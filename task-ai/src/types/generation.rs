//! Types for model responses.

use serde::{Deserialize, Serialize};

/// One candidate completion returned by a model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub content: String,
}

/// The shapes a model service may answer with.
///
/// Services differ in where the generated text lives: some expose it directly,
/// some return a list of candidates, some return an object we don't understand.
/// [`GenerationResponse::into_text`] is the single place that decides which shape wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationResponse {
    /// Direct text accessor.
    Text(String),
    /// Candidate list; only the first candidate is ever used.
    Candidates(Vec<Candidate>),
    /// Anything else, kept verbatim so it can still be stringified.
    Opaque(serde_json::Value),
}

impl GenerationResponse {
    /// Extract the generated text.
    ///
    /// Prefers non-empty direct text, then the first candidate's non-empty content,
    /// then the stringified response.
    pub fn into_text(self) -> String {
        match self {
            GenerationResponse::Text(text) if !text.is_empty() => text,
            GenerationResponse::Candidates(candidates)
                if candidates
                    .first()
                    .is_some_and(|candidate| !candidate.content.is_empty()) =>
            {
                candidates
                    .into_iter()
                    .next()
                    .map(|candidate| candidate.content)
                    .unwrap_or_default()
            }
            GenerationResponse::Opaque(serde_json::Value::String(text)) => text,
            other => other.stringify(),
        }
    }

    fn stringify(&self) -> String {
        match self {
            GenerationResponse::Opaque(value) => value.to_string(),
            other => serde_json::to_string(other).unwrap_or_default(),
        }
    }
}
