//! Transcript-to-task extraction pipeline.
//!
//! This crate turns free-form meeting transcripts into structured task drafts:
//! - Chunking long transcripts at natural text boundaries
//! - Calling a generative model with fixed-delay retries
//! - Normalizing unreliable model output (JSON, embedded JSON, bullet lists)
//! - Cleaning each item (speaker prefixes, due dates, assignees, priority)
//! - Falling back across candidate models and deduplicating the results
//!
//! The model itself is injected through [`traits::generation::Provider`], so the
//! pipeline performs no I/O of its own and can be driven by any LLM backend.

pub mod config;
pub mod error;
pub mod extraction;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use config::Config;
pub use error::Error;
pub use extraction::orchestrator::Extractor;
pub use types::draft::{Priority, TaskDraft};
