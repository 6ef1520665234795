use serde::Deserialize;
use utoipa::ToSchema;

/// Body of `POST /generate-tasks`
#[derive(Debug, Deserialize, ToSchema)]
pub struct GenerateTasksParams {
    /// Raw meeting transcript, typically `Speaker: utterance` lines
    pub transcript: String,
}
