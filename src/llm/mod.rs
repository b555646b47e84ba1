// src/llm/mod.rs

pub mod gemini;

use std::{fmt, sync::Arc};

use async_trait::async_trait;

pub use gemini::GeminiClient;

/// The remote text-generation capability.
///
/// Implementations are stateless from the caller's point of view and are
/// shared across concurrent requests.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate_text(&self, prompt: &str) -> Result<String, LlmError>;
}

pub type SharedGenerator = Arc<dyn TextGenerator>;

/// Errors raised while talking to the remote model.
#[derive(Debug, Clone)]
pub enum LlmError {
    /// No credential was supplied at startup.
    MissingApiKey,
    InvalidBaseUrl(String),
    /// Transport failure, including timeouts.
    Http(String),
    /// Non-2xx answer from the API.
    Status { code: u16, body: String },
    /// The API answered but carried no text (e.g. blocked by safety filters).
    EmptyResponse,
    Decode(String),
}

impl fmt::Display for LlmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LlmError::MissingApiKey => write!(f, "GEMINI_API_KEY not found in environment variables"),
            LlmError::InvalidBaseUrl(msg) => write!(f, "invalid Gemini base URL: {}", msg),
            LlmError::Http(msg) => write!(f, "request to Gemini failed: {}", msg),
            LlmError::Status { code, body } => write!(f, "Gemini API error {}: {}", code, body),
            LlmError::EmptyResponse => write!(f, "Gemini returned no text"),
            LlmError::Decode(msg) => write!(f, "could not decode Gemini response: {}", msg),
        }
    }
}

impl std::error::Error for LlmError {}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            LlmError::Decode(err.to_string())
        } else {
            LlmError::Http(err.to_string())
        }
    }
}
