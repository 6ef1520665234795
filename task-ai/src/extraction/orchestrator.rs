//! Composes chunking, model calls, normalization and cleaning into one extraction run.

use crate::config::Config;
use crate::extraction::{chunker, cleaner, gateway, normalizer};
use crate::traits::generation::Provider;
use crate::types::draft::TaskDraft;
use crate::Error;
use log::*;
use std::collections::HashSet;
use tokio_util::sync::CancellationToken;

/// Fixed preamble placed before every transcript chunk.
pub const INSTRUCTIONS: &str = "You are a strict JSON generator. Given a transcript chunk, \
return ONLY a JSON array of objects. Each object must have keys: text, assignee, due, priority.";

/// Build the prompt sent to the model for one chunk.
pub fn build_prompt(chunk: &str) -> String {
    format!("{INSTRUCTIONS}\n\nTranscript chunk:\n{chunk}\n\nReturn JSON array of tasks.")
}

/// Runs extractions against one model provider.
///
/// Models are tried strictly in the order given and chunks strictly in sequence;
/// the first model whose aggregate holds at least one draft wins.
pub struct Extractor<'a> {
    provider: &'a dyn Provider,
    config: &'a Config,
}

impl<'a> Extractor<'a> {
    pub fn new(provider: &'a dyn Provider, config: &'a Config) -> Self {
        Self { provider, config }
    }

    /// Extract deduplicated task drafts from `transcript`.
    ///
    /// A blank transcript yields an empty list without any model call. `cancel` is
    /// checked before every model call; an in-flight call is not interrupted.
    pub async fn extract(
        &self,
        transcript: &str,
        candidate_models: &[String],
        cancel: &CancellationToken,
    ) -> Result<Vec<TaskDraft>, Error> {
        if transcript.trim().is_empty() {
            debug!("Transcript is blank, skipping extraction");
            return Ok(Vec::new());
        }

        let chunks = chunker::chunk(transcript, self.config.chunk_max_chars);
        debug!(
            "Extracting tasks from {} chunk(s) with up to {} model(s)",
            chunks.len(),
            candidate_models.len()
        );

        let mut attempted = Vec::new();
        let mut last_error = None;

        for model_id in candidate_models {
            attempted.push(model_id.clone());

            match self.extract_with_model(model_id, &chunks, cancel).await {
                Ok(drafts) if !drafts.is_empty() => {
                    info!("{} produced {} task draft(s)", model_id, drafts.len());
                    return Ok(dedup(drafts));
                }
                Ok(_) => {
                    warn!("{} produced no usable task drafts", model_id);
                }
                Err(Error::Cancelled) => return Err(Error::Cancelled),
                Err(err) => {
                    warn!("Abandoning {}: {}", model_id, err);
                    last_error = Some(Box::new(err));
                }
            }
        }

        error!("No candidate model produced task drafts (tried {:?})", attempted);
        Err(Error::NoModelSucceeded {
            attempted,
            last_error,
        })
    }

    /// Run every chunk through one model. The first chunk failure discards the
    /// drafts already collected for this model.
    async fn extract_with_model(
        &self,
        model_id: &str,
        chunks: &[String],
        cancel: &CancellationToken,
    ) -> Result<Vec<TaskDraft>, Error> {
        let mut drafts = Vec::new();

        for (index, chunk) in chunks.iter().enumerate() {
            if cancel.is_cancelled() {
                info!("Extraction cancelled before chunk {} on {}", index + 1, model_id);
                return Err(Error::Cancelled);
            }

            let prompt = build_prompt(chunk);
            let raw = gateway::generate(self.provider, model_id, &prompt, self.config).await?;

            let candidates = normalizer::parse_model_output(&raw);
            trace!(
                "Chunk {}/{} on {}: {} candidate(s)",
                index + 1,
                chunks.len(),
                model_id,
                candidates.len()
            );
            drafts.extend(
                candidates
                    .iter()
                    .filter_map(|candidate| cleaner::clean(candidate, self.config.max_text_len)),
            );
        }

        Ok(drafts)
    }
}

/// Keep the first draft for every case-folded text, preserving order.
pub fn dedup(drafts: Vec<TaskDraft>) -> Vec<TaskDraft> {
    let mut seen = HashSet::new();
    drafts
        .into_iter()
        .filter(|draft| seen.insert(draft.dedup_key()))
        .collect()
}
