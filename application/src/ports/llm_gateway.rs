//! LLM Gateway port
//!
//! Defines the interface for communicating with LLM providers.

use async_trait::async_trait;
use consilium_domain::Model;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur during LLM gateway operations
///
/// Producers never propagate these: every variant collapses into an error
/// opinion or a degraded projection.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GatewayError {
    #[error("Model not available: {0}")]
    ModelUnavailable(String),

    #[error("Timeout after {0}s")]
    Timeout(u64),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),
}

/// Sampling parameters for one completion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SamplingParams {
    pub temperature: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

impl SamplingParams {
    /// Initial analysis and structuring: low temperature, nucleus 0.9.
    pub fn analyze() -> Self {
        Self {
            temperature: 0.3,
            top_p: Some(0.9),
            max_tokens: None,
        }
    }

    /// Revision rounds: slightly warmer so opinions can move.
    pub fn revise() -> Self {
        Self {
            temperature: 0.4,
            top_p: None,
            max_tokens: None,
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }
}

/// One completion call.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub model: Model,
    pub system_prompt: String,
    pub user_prompt: String,
    pub sampling: SamplingParams,
}

impl CompletionRequest {
    pub fn new(
        model: Model,
        system_prompt: impl Into<String>,
        user_prompt: impl Into<String>,
        sampling: SamplingParams,
    ) -> Self {
        Self {
            model,
            system_prompt: system_prompt.into(),
            user_prompt: user_prompt.into(),
            sampling,
        }
    }
}

/// Gateway for LLM communication
///
/// This port defines how the application layer communicates with LLM providers.
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait LlmGateway: Send + Sync {
    /// Run one completion and return the raw response text.
    async fn complete(&self, request: &CompletionRequest) -> Result<String, GatewayError>;
}

#[async_trait]
impl<T: LlmGateway + ?Sized> LlmGateway for std::sync::Arc<T> {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, GatewayError> {
        (**self).complete(request).await
    }
}
