//! Generative model provider trait.

use crate::types::generation::GenerationResponse;
use crate::Error;
use async_trait::async_trait;

/// Abstraction for a generative text model service.
///
/// Implementations send one prompt to one model and hand back whatever shape the
/// service answered with. Failures are signalled by returning `Err`; the gateway
/// decides whether to retry. Timeouts are the implementation's responsibility.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Provider: Send + Sync {
    /// Generate content for `prompt` using the model identified by `model_id`
    /// (e.g. "models/gemini-2.5-flash").
    async fn generate_content(
        &self,
        model_id: &str,
        prompt: &str,
    ) -> std::result::Result<GenerationResponse, Error>;
}
