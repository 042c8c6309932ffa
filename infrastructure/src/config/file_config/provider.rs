//! Model provider configuration from TOML (`[provider]` section)

use serde::{Deserialize, Serialize};

/// OpenAI-compatible chat completion endpoint
///
/// ```toml
/// [provider]
/// base_url = "http://localhost:8000/v1"
/// api_key_env = "CONSILIUM_API_KEY"
/// max_tokens = 1024
/// ```
///
/// The key itself never lives in the config file; only the name of the
/// environment variable holding it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProviderConfig {
    pub base_url: String,
    pub api_key_env: Option<String>,
    pub max_tokens: Option<u32>,
}

impl Default for FileProviderConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000/v1".to_string(),
            api_key_env: Some("CONSILIUM_API_KEY".to_string()),
            max_tokens: None,
        }
    }
}

impl FileProviderConfig {
    /// Read the API key from the configured environment variable, if any.
    pub fn api_key(&self) -> Option<String> {
        self.api_key_env
            .as_deref()
            .and_then(|name| std::env::var(name).ok())
            .filter(|key| !key.trim().is_empty())
    }
}
