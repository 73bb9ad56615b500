//! Environment-backed configuration for the API service

use common::store::DEFAULT_SESSION_TTL_SECS;
use std::env;

/// Configuration for the API service
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Address the HTTP server binds to
    pub bind_addr: String,
    /// Idle session lifetime in seconds
    pub session_ttl_secs: i64,
    /// API key for the header-mapping model; mapping is disabled when unset
    pub openai_api_key: Option<String>,
    /// Base URL of the OpenAI-compatible endpoint
    pub openai_base_url: String,
    /// Model used for header mapping
    pub openai_model: String,
}

impl ApiConfig {
    /// Create a new ApiConfig from environment variables
    ///
    /// # Environment Variables
    /// - `API_BIND_ADDR`: listen address (default: "0.0.0.0:5000")
    /// - `SESSION_TTL_SECS`: idle session lifetime in seconds (default: 86400)
    /// - `AI_INTEGRATIONS_OPENAI_API_KEY`: key for the mapping endpoint
    /// - `AI_INTEGRATIONS_OPENAI_BASE_URL`: endpoint base URL
    ///   (default: "https://api.openai.com/v1")
    /// - `AI_INTEGRATIONS_OPENAI_MODEL`: mapping model (default: "gpt-5")
    pub fn from_env() -> Self {
        let bind_addr =
            env::var("API_BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:5000".to_string());
        let session_ttl_secs = env::var("SESSION_TTL_SECS")
            .unwrap_or_else(|_| DEFAULT_SESSION_TTL_SECS.to_string())
            .parse()
            .unwrap_or(DEFAULT_SESSION_TTL_SECS);
        let openai_api_key = env::var("AI_INTEGRATIONS_OPENAI_API_KEY")
            .ok()
            .filter(|key| !key.is_empty());
        let openai_base_url = env::var("AI_INTEGRATIONS_OPENAI_BASE_URL")
            .unwrap_or_else(|_| "https://api.openai.com/v1".to_string());
        let openai_model =
            env::var("AI_INTEGRATIONS_OPENAI_MODEL").unwrap_or_else(|_| "gpt-5".to_string());

        ApiConfig {
            bind_addr,
            session_ttl_secs,
            openai_api_key,
            openai_base_url,
            openai_model,
        }
    }
}
