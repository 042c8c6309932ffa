//! OpenAI-compatible chat completion gateway.
//!
//! Works against any server exposing `POST {base_url}/chat/completions`
//! (vLLM, llama.cpp server, hosted ERNIE endpoints behind a compatible proxy).

use async_trait::async_trait;
use consilium_application::{CompletionRequest, GatewayError, LlmGateway};
use consilium_domain::util::truncate_str;
use reqwest::{Client, StatusCode};
use serde_json::{Value, json};
use std::time::Instant;
use tracing::{debug, warn};

pub struct OpenAiCompatibleGateway {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl OpenAiCompatibleGateway {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    fn body(request: &CompletionRequest) -> Value {
        let mut body = json!({
            "model": request.model.as_str(),
            "messages": [
                { "role": "system", "content": request.system_prompt },
                { "role": "user", "content": request.user_prompt },
            ],
            "temperature": request.sampling.temperature,
        });
        if let Some(top_p) = request.sampling.top_p {
            body["top_p"] = json!(top_p);
        }
        if let Some(max_tokens) = request.sampling.max_tokens {
            body["max_tokens"] = json!(max_tokens);
        }
        body
    }

    fn map_transport_error(e: reqwest::Error) -> GatewayError {
        // Call deadlines are enforced by the caller, not the HTTP client
        if e.is_connect() {
            GatewayError::ConnectionError(e.to_string())
        } else {
            GatewayError::RequestFailed(e.to_string())
        }
    }
}

/// Pull the assistant message text out of a chat completion response.
fn extract_content(raw: &Value) -> Result<String, GatewayError> {
    raw["choices"][0]["message"]["content"]
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| GatewayError::InvalidResponse("no message content in response".to_string()))
}

#[async_trait]
impl LlmGateway for OpenAiCompatibleGateway {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, GatewayError> {
        let start = Instant::now();
        debug!("Completion request: model={}", request.model);

        let mut builder = self.client.post(self.endpoint()).json(&Self::body(request));
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder.send().await.map_err(Self::map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let error_text = truncate_str(&body, 500);
            warn!("Model API error {} for {}: {}", status, request.model, error_text);
            return Err(match status {
                StatusCode::NOT_FOUND => GatewayError::ModelUnavailable(request.model.to_string()),
                _ => GatewayError::RequestFailed(format!("{}: {}", status, error_text)),
            });
        }

        let raw = response
            .json::<Value>()
            .await
            .map_err(|e| GatewayError::InvalidResponse(e.to_string()))?;
        let content = extract_content(&raw)?;

        debug!(
            "Completion from {} in {}ms ({} bytes)",
            request.model,
            start.elapsed().as_millis(),
            content.len()
        );
        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use consilium_application::SamplingParams;
    use consilium_domain::Model;

    fn request() -> CompletionRequest {
        CompletionRequest::new(
            Model::ErnieCardiology,
            "system",
            "user",
            SamplingParams::analyze().with_max_tokens(256),
        )
    }

    #[test]
    fn test_request_body_shape() {
        let body = OpenAiCompatibleGateway::body(&request());
        assert_eq!(body["model"], "ernie-cardiology");
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"], "user");
        assert!((body["temperature"].as_f64().unwrap() - 0.3).abs() < 1e-6);
        assert!((body["top_p"].as_f64().unwrap() - 0.9).abs() < 1e-6);
        assert_eq!(body["max_tokens"], 256);
    }

    #[test]
    fn test_revise_omits_top_p() {
        let mut req = request();
        req.sampling = SamplingParams::revise();
        let body = OpenAiCompatibleGateway::body(&req);
        assert!(body.get("top_p").is_none());
        assert!(body.get("max_tokens").is_none());
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let gateway = OpenAiCompatibleGateway::new("http://localhost:8000/v1/", None);
        assert_eq!(gateway.endpoint(), "http://localhost:8000/v1/chat/completions");
    }

    #[test]
    fn test_extract_content() {
        let raw = json!({"choices": [{"message": {"role": "assistant", "content": "ok"}}]});
        assert_eq!(extract_content(&raw).unwrap(), "ok");
        assert!(matches!(
            extract_content(&json!({"choices": []})),
            Err(GatewayError::InvalidResponse(_))
        ));
    }

    #[tokio::test]
    async fn test_unreachable_server_is_a_gateway_error() {
        let gateway = OpenAiCompatibleGateway::new("http://127.0.0.1:9", None);
        let result = gateway.complete(&request()).await;
        assert!(result.is_err());
    }
}
