//! This module holds typed parameters for endpoint inputs and outputs.
//!
//! Request bodies are deserialized into these structs before any domain logic runs, so a
//! request with a missing or mistyped field is rejected by axum's `Json` extractor.

pub(crate) mod task;
pub(crate) mod user;
