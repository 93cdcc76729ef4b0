use reqwest::Client;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{Duration, Instant};
use tracing::error;

use crate::config::OllamaConfig;
use crate::models::{GenerateRequest, GenerateResponse};
use crate::retry::{with_retry, RetryPolicy};

// Import logging macros
use crate::{log_backend_operation, log_performance};

/// Failures surfaced by the Ollama client
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BackendError {
    #[error("{0}")]
    Network(String),

    #[error("Ollama returned {0}")]
    ServerError(u16),

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Ollama request failed with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Invalid response body from Ollama: {message}")]
    Decode { message: String, body: String },
}

impl BackendError {
    /// Connection failures, timeouts and 5xx responses are transient
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            BackendError::Network(_) | BackendError::Timeout(_) | BackendError::ServerError(_)
        )
    }

    fn from_reqwest(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            BackendError::Timeout(timeout)
        } else if err.is_decode() {
            BackendError::Decode {
                message: err.to_string(),
                body: String::new(),
            }
        } else {
            BackendError::Network(err.to_string())
        }
    }
}

/// HTTP client for a local Ollama server
#[derive(Debug, Clone)]
pub struct OllamaClient {
    client: Client,
    base_url: String,
    model: String,
    retry_policy: RetryPolicy,
    request_timeout: Duration,
    probe_timeout: Duration,
}

impl OllamaClient {
    pub fn new(config: &OllamaConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            retry_policy: config.retry_policy(),
            request_timeout: config.request_timeout(),
            probe_timeout: config.probe_timeout(),
        }
    }

    pub fn model_name(&self) -> &str {
        &self.model
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry_policy
    }

    /// Probe `/api/tags`. Any 2xx within the probe timeout means ready; everything else is not.
    pub async fn is_ready(&self) -> bool {
        let url = format!("{}/api/tags", self.base_url);
        let started = Instant::now();

        let ready = match self
            .client
            .get(&url)
            .timeout(self.probe_timeout)
            .send()
            .await
        {
            Ok(response) if response.status().is_success() => {
                log_backend_operation!(probe, ready = true, format!("status {}", response.status()));
                true
            }
            Ok(response) => {
                log_backend_operation!(probe, ready = false, format!("status {}", response.status()));
                false
            }
            Err(e) => {
                let reason = BackendError::from_reqwest(e, self.probe_timeout);
                log_backend_operation!(probe, ready = false, reason);
                false
            }
        };

        log_performance!("readiness_probe", duration_ms = started.elapsed().as_millis() as u64);
        ready
    }

    /// Send a non-streaming generation request, retrying transient failures per the retry policy.
    /// The request timeout applies to each attempt separately.
    pub async fn generate(&self, prompt: &str) -> Result<GenerateResponse, BackendError> {
        let url = format!("{}/api/generate", self.base_url);
        let request_body = GenerateRequest {
            model: self.model.clone(),
            prompt: prompt.to_string(),
            stream: false,
        };

        log_backend_operation!(start, "generate", model = self.model, prompt_length = prompt.len());

        let started = Instant::now();
        let attempts = AtomicU32::new(0);
        let (url, body, attempts_ref) = (url.as_str(), &request_body, &attempts);

        let result = with_retry(&self.retry_policy, BackendError::is_retryable, move |attempt| {
            attempts_ref.store(attempt, Ordering::Relaxed);
            self.generate_attempt(url, body)
        })
        .await;

        let duration_ms = started.elapsed().as_millis() as u64;
        log_performance!(
            "generate",
            duration_ms = duration_ms,
            attempts = attempts.load(Ordering::Relaxed)
        );

        match result {
            Ok(response) => {
                log_backend_operation!(
                    success,
                    "generate",
                    duration_ms = duration_ms,
                    response_length = response.text().len()
                );
                Ok(response)
            }
            Err(e) => {
                log_backend_operation!(error, "generate", error = e);
                Err(e)
            }
        }
    }

    async fn generate_attempt(
        &self,
        url: &str,
        body: &GenerateRequest,
    ) -> Result<GenerateResponse, BackendError> {
        let response = self
            .client
            .post(url)
            .header("Content-Type", "application/json")
            .json(body)
            .timeout(self.request_timeout)
            .send()
            .await
            .map_err(|e| BackendError::from_reqwest(e, self.request_timeout))?;

        let status = response.status();
        if status.is_server_error() {
            return Err(BackendError::ServerError(status.as_u16()));
        }

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            error!(
                component = "ollama",
                status = %status,
                error = %error_text,
                "Ollama API request failed"
            );
            return Err(BackendError::Status {
                status: status.as_u16(),
                body: error_text,
            });
        }

        let text = response
            .text()
            .await
            .map_err(|e| BackendError::from_reqwest(e, self.request_timeout))?;

        serde_json::from_str::<GenerateResponse>(&text).map_err(|e| BackendError::Decode {
            message: e.to_string(),
            body: text,
        })
    }
}
