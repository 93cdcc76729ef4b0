use serde::{Deserialize, Serialize};

/// Body of `POST /flashcard`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FlashcardRequest {
    #[serde(default)]
    pub fact: Option<String>,
}

impl FlashcardRequest {
    /// The fact, if present and non-empty. Whitespace-only facts are kept as-is.
    pub fn fact(&self) -> Option<&str> {
        self.fact.as_deref().filter(|fact| !fact.is_empty())
    }
}

/// A validated front/back pair produced from a fact
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flashcard {
    pub front: String,
    pub back: String,
}

/// Request body for the Ollama `/api/generate` endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub model: String,
    pub prompt: String,
    pub stream: bool,
}

/// Non-streaming response from `/api/generate`. Other fields Ollama sends are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerateResponse {
    #[serde(default)]
    pub response: Option<String>,
}

impl GenerateResponse {
    /// Generated text; absent and null both read as empty
    pub fn text(&self) -> &str {
        self.response.as_deref().unwrap_or("")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub backend: String,
}

impl HealthStatus {
    pub fn from_readiness(ready: bool) -> Self {
        if ready {
            Self {
                status: "healthy".to_string(),
                backend: "ready".to_string(),
            }
        } else {
            Self {
                status: "unhealthy".to_string(),
                backend: "not ready".to_string(),
            }
        }
    }
}

/// JSON body returned for every failed request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,
}

impl ErrorBody {
    pub fn new(error: &str) -> Self {
        Self {
            error: error.to_string(),
            details: None,
            raw: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_raw(mut self, raw: impl Into<String>) -> Self {
        self.raw = Some(raw.into());
        self
    }
}
