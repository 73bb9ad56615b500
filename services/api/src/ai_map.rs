//! CSV header mapping through an OpenAI-compatible chat endpoint
//!
//! The dashboard lets users import arbitrary CSV exports. Before a bulk
//! import it sends the header row plus a few sample rows here, and a
//! language model maps each internal sale field to a column index. The
//! model's JSON object is passed back to the client untouched.

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::ApiConfig;

const MAPPING_PROMPT: &str = "You are a data mapping expert. Map the given CSV headers to our internal schema: date, amount, product_category, region. Note that currency is in Indian Rupees (₹). Return a JSON object mapping each internal field to the index (0-based) of the corresponding CSV header. If a field cannot be mapped, omit it.";

/// Chat-completions request body
#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    response_format: ResponseFormat,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

/// The slice of the chat-completions response we care about
#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

/// Client for the header-mapping model
#[derive(Clone)]
pub struct AiMapper {
    client: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
    model: String,
}

impl AiMapper {
    /// Create a mapper from the service configuration
    pub fn new(config: &ApiConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: config.openai_api_key.clone(),
            base_url: config.openai_base_url.trim_end_matches('/').to_string(),
            model: config.openai_model.clone(),
        }
    }

    /// Ask the model to map CSV headers onto the sale fields
    pub async fn map_headers(
        &self,
        headers: &[String],
        sample_rows: &[Vec<String>],
    ) -> Result<Value> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| anyhow!("AI_INTEGRATIONS_OPENAI_API_KEY is not set"))?;

        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: MAPPING_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: format!(
                        "Headers: {}\nSample Data: {}",
                        headers.join(", "),
                        serde_json::to_string(sample_rows)?
                    ),
                },
            ],
            response_format: ResponseFormat {
                kind: "json_object",
            },
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "mapping model returned status {}",
                response.status()
            ));
        }

        let completion: ChatResponse = response.json().await?;
        let content = completion
            .choices
            .first()
            .and_then(|choice| choice.message.content.as_deref())
            .unwrap_or("{}");

        let mapping =
            serde_json::from_str(content).context("mapping model returned non-JSON content")?;
        Ok(mapping)
    }
}
