//! Shared utilities for use cases.
//!
//! The timed model call used by every producer.

use crate::ports::llm_gateway::{CompletionRequest, GatewayError, LlmGateway};
use std::time::Duration;

/// Run one completion bounded by `timeout`.
///
/// Exceeding the limit surfaces as [`GatewayError::Timeout`] like any other
/// collaborator failure.
pub(crate) async fn complete_with_timeout<G: LlmGateway + ?Sized>(
    gateway: &G,
    request: &CompletionRequest,
    timeout: Duration,
) -> Result<String, GatewayError> {
    match tokio::time::timeout(timeout, gateway.complete(request)).await {
        Ok(result) => result,
        Err(_) => Err(GatewayError::Timeout(timeout.as_secs())),
    }
}
