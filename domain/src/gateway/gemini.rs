//! Google Gemini API client used as the model provider for task extraction.
//!
//! Calls the Generative Language REST API `generateContent` method and maps its
//! responses and failures onto the extraction pipeline's provider contract.

use crate::error::{DomainErrorKind, Error, InternalErrorKind};
use async_trait::async_trait;
use log::*;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use service::config::Config;
use std::time::Duration;
use task_ai::traits::generation::Provider;
use task_ai::types::generation::{Candidate, GenerationResponse};

/// Request body for `models/{model}:generateContent`
#[derive(Debug, Serialize)]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct Content {
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// The subset of the `generateContent` response the extraction needs.
#[derive(Debug, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<ResponseCandidate>,
}

#[derive(Debug, Deserialize)]
pub struct ResponseCandidate {
    #[serde(default)]
    pub content: Content,
}

impl GenerateContentRequest {
    pub fn from_prompt(prompt: &str) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![Part {
                    text: Some(prompt.to_string()),
                }],
            }],
        }
    }
}

impl ResponseCandidate {
    /// All text parts of the candidate joined together.
    fn text(&self) -> String {
        self.content
            .parts
            .iter()
            .filter_map(|part| part.text.as_deref())
            .collect()
    }
}

/// Gemini REST API client
pub struct GeminiClient {
    client: reqwest::Client,
    base_url: String,
}

impl GeminiClient {
    /// Create a new Gemini client with the given API key, base URL and request timeout
    pub fn new(api_key: &str, base_url: &str, timeout: Duration) -> Result<Self, Error> {
        let mut headers = reqwest::header::HeaderMap::new();
        let mut header_value = reqwest::header::HeaderValue::from_str(api_key).map_err(|e| {
            warn!("Failed to create API key header: {:?}", e);
            Error {
                source: Some(Box::new(e)),
                error_kind: DomainErrorKind::Internal(InternalErrorKind::Config),
            }
        })?;
        header_value.set_sensitive(true);
        headers.insert("x-goog-api-key", header_value);

        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Build a client from the service configuration.
    ///
    /// Fails with a `Config` error when neither `GOOGLE_API_KEY` nor `GEMINI_API_KEY` is set.
    pub fn from_config(config: &Config) -> Result<Self, Error> {
        let api_key = config.gemini_api_key().ok_or_else(|| {
            error!("Google/Gemini API key not set on server");
            Error::config("Google/Gemini API key not set on server")
        })?;

        Self::new(
            &api_key,
            config.gemini_base_url(),
            config.model_request_timeout(),
        )
    }

    fn endpoint(&self, model_id: &str) -> String {
        let model = if model_id.starts_with("models/") {
            model_id.to_string()
        } else {
            format!("models/{model_id}")
        };
        format!("{}/{}:generateContent", self.base_url, model)
    }
}

#[async_trait]
impl Provider for GeminiClient {
    async fn generate_content(
        &self,
        model_id: &str,
        prompt: &str,
    ) -> Result<GenerationResponse, task_ai::Error> {
        let url = self.endpoint(model_id);
        debug!("Calling Gemini {} with a {} byte prompt", model_id, prompt.len());

        let response = self
            .client
            .post(&url)
            .json(&GenerateContentRequest::from_prompt(prompt))
            .send()
            .await
            .map_err(|e| {
                warn!("Failed to call Gemini {}: {:?}", model_id, e);
                if e.is_timeout() {
                    task_ai::Error::Timeout(e.to_string())
                } else {
                    task_ai::Error::Network(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let retry_after_seconds = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|value| value.to_str().ok())
                .and_then(|value| value.parse::<u64>().ok())
                .unwrap_or(0);
            let error_text = response.text().await.unwrap_or_default();
            error!("Gemini API {} for {}: {}", status, model_id, error_text);

            return Err(match status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                    task_ai::Error::Authentication(error_text)
                }
                StatusCode::BAD_REQUEST => task_ai::Error::Configuration(error_text),
                StatusCode::TOO_MANY_REQUESTS => task_ai::Error::RateLimited {
                    retry_after_seconds,
                },
                _ => task_ai::Error::Provider(format!("{status}: {error_text}")),
            });
        }

        let body: Value = response.json().await.map_err(|e| {
            warn!("Failed to parse Gemini response: {:?}", e);
            task_ai::Error::Deserialization(e.to_string())
        })?;

        Ok(into_generation_response(body))
    }
}

/// Candidates with their joined text when the body has any, the raw body otherwise.
fn into_generation_response(body: Value) -> GenerationResponse {
    match serde_json::from_value::<GenerateContentResponse>(body.clone()) {
        Ok(parsed) if !parsed.candidates.is_empty() => GenerationResponse::Candidates(
            parsed
                .candidates
                .iter()
                .map(|candidate| Candidate {
                    content: candidate.text(),
                })
                .collect(),
        ),
        _ => GenerationResponse::Opaque(body),
    }
}
