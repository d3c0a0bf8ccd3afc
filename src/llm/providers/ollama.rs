use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use super::base::{LlmMetadata, LlmProvider, LlmProviderError};

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    stream: bool,
    options: ChatOptions,
    /// Ollama structured outputs: a JSON schema the reply must satisfy.
    #[serde(skip_serializing_if = "Option::is_none")]
    format: Option<&'a Value>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct ChatOptions {
    temperature: f64,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    message: ChatMessage,
    #[serde(default)]
    prompt_eval_count: u32,
    #[serde(default)]
    eval_count: u32,
}


/// Local model served by Ollama, used as the fallback provider.
pub struct OllamaProvider {
    base_url: String,
    model: String,
    temperature: f64,
    client: Client,
}

impl OllamaProvider {

    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        temperature: f64,
        timeout: Duration,
    ) -> Result<Self, LlmProviderError> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let model = model.into();
        info!("Ollama provider initialized (model={}, url={})", model, base_url);
        Ok(Self {
            base_url,
            model,
            temperature,
            client: Client::builder().timeout(timeout).build()?,
        })
    }
}

#[async_trait]
impl LlmProvider for OllamaProvider {
    async fn generate(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        response_schema: Option<&Value>,
    ) -> Result<(String, LlmMetadata), LlmProviderError> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: system_prompt.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: user_prompt.to_string(),
                },
            ],
            stream: false,
            options: ChatOptions {
                temperature: self.temperature,
            },
            format: response_schema,
        };

        let started = Instant::now();
        let response = self
            .client
            .post(format!("{}/api/chat", self.base_url))
            .json(&request)
            .send()
            .await?
            .error_for_status()
            .map_err(LlmProviderError::Http)?
            .json::<ChatResponse>()
            .await?;

        if response.message.content.trim().is_empty() {
            return Err(LlmProviderError::EmptyReply);
        }

        let metadata = LlmMetadata {
            provider: "ollama".to_string(),
            model: self.model.clone(),
            base_url: Some(self.base_url.clone()),
            tokens_prompt: Some(response.prompt_eval_count),
            tokens_completion: Some(response.eval_count),
            tokens_total: Some(response.prompt_eval_count + response.eval_count),
            latency_ms: Some(started.elapsed().as_millis() as u64),
            ..Default::default()
        };

        Ok((response.message.content, metadata))
    }

    fn provider_name(&self) -> &str {
        "ollama"
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_schema_is_sent_as_format() {
        let schema = json!({"type": "object"});
        let request = ChatRequest {
            model: "llama3.2",
            messages: vec![],
            stream: false,
            options: ChatOptions { temperature: 0.0 },
            format: Some(&schema),
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["format"], schema);
        assert_eq!(value["stream"], false);
    }

    #[test]
    fn test_format_omitted_without_schema() {
        let request = ChatRequest {
            model: "llama3.2",
            messages: vec![],
            stream: false,
            options: ChatOptions { temperature: 0.0 },
            format: None,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert!(value.get("format").is_none());
    }
}
