//! Model invocation with fixed-delay retries.

use crate::config::Config;
use crate::traits::generation::Provider;
use crate::Error;
use log::*;

/// Send `prompt` to `model_id` and return the generated text.
///
/// Makes up to `config.max_attempts` attempts, sleeping `config.retry_backoff`
/// between two of them. Fails with [`Error::ModelCallFailed`] carrying the last
/// client error once every attempt has failed.
pub async fn generate(
    provider: &dyn Provider,
    model_id: &str,
    prompt: &str,
    config: &Config,
) -> Result<String, Error> {
    let max_attempts = config.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        match provider.generate_content(model_id, prompt).await {
            Ok(response) => {
                trace!("{} answered on attempt {}", model_id, attempt);
                return Ok(response.into_text());
            }
            Err(err) if attempt < max_attempts => {
                warn!(
                    "Attempt {}/{} calling {} failed: {}; retrying in {:?}",
                    attempt, max_attempts, model_id, err, config.retry_backoff
                );
                tokio::time::sleep(config.retry_backoff).await;
                attempt += 1;
            }
            Err(err) => {
                warn!(
                    "Attempt {}/{} calling {} failed: {}; giving up",
                    attempt, max_attempts, model_id, err
                );
                return Err(Error::ModelCallFailed {
                    model_id: model_id.to_string(),
                    attempts: attempt,
                    last_error: Box::new(err),
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::generation::MockProvider;
    use crate::types::generation::{Candidate, GenerationResponse};
    use std::time::Duration;

    fn fast_config(max_attempts: u32) -> Config {
        Config::default()
            .with_max_attempts(max_attempts)
            .with_retry_backoff(Duration::ZERO)
    }

    fn mock_provider() -> MockProvider {
        MockProvider::new()
    }

    #[tokio::test]
    async fn test_returns_text_of_first_successful_attempt() {
        let mut provider = mock_provider();
        provider
            .expect_generate_content()
            .withf(|model_id, prompt| model_id.to_string() == "models/a" && prompt.to_string() == "hello")
            .times(1)
            .returning(|_, _| {
                Ok(GenerationResponse::Candidates(vec![Candidate {
                    content: "[\"Ship it\"]".to_string(),
                }]))
            });

        let text = generate(&provider, "models/a", "hello", &fast_config(2))
            .await
            .unwrap();

        assert_eq!(text, "[\"Ship it\"]");
    }

    #[tokio::test]
    async fn test_retries_transient_failure() {
        let mut provider = mock_provider();
        let mut calls = 0;
        provider
            .expect_generate_content()
            .times(2)
            .returning(move |_, _| {
                calls += 1;
                if calls == 1 {
                    Err(Error::RateLimited {
                        retry_after_seconds: 1,
                    })
                } else {
                    Ok(GenerationResponse::Text("- Call client".to_string()))
                }
            });

        let text = generate(&provider, "models/a", "hello", &fast_config(2))
            .await
            .unwrap();

        assert_eq!(text, "- Call client");
    }

    #[tokio::test]
    async fn test_fails_with_model_call_failed_after_exhausting_attempts() {
        let mut provider = mock_provider();
        provider
            .expect_generate_content()
            .times(3)
            .returning(|_, _| Err(Error::Network("connection reset".to_string())));

        let result = generate(&provider, "models/a", "hello", &fast_config(3)).await;

        match result {
            Err(Error::ModelCallFailed {
                model_id,
                attempts,
                last_error,
            }) => {
                assert_eq!(model_id, "models/a");
                assert_eq!(attempts, 3);
                assert!(matches!(*last_error, Error::Network(_)));
            }
            other => panic!("expected ModelCallFailed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_zero_attempts_still_calls_once() {
        let mut provider = mock_provider();
        provider
            .expect_generate_content()
            .times(1)
            .returning(|_, _| Err(Error::Timeout("60s elapsed".to_string())));

        let result = generate(&provider, "models/a", "hello", &fast_config(0)).await;

        assert!(matches!(
            result,
            Err(Error::ModelCallFailed { attempts: 1, .. })
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_waits_fixed_backoff_between_attempts() {
        let mut provider = mock_provider();
        provider
            .expect_generate_content()
            .times(2)
            .returning(|_, _| Err(Error::Provider("503".to_string())));
        let config = Config::default().with_retry_backoff(Duration::from_millis(500));

        let started = tokio::time::Instant::now();
        let result = generate(&provider, "models/a", "hello", &config).await;

        assert!(result.is_err());
        // One sleep between the two attempts, none after the last one.
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_millis(500));
        assert!(elapsed < Duration::from_millis(1000));
    }
}
