use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use super::base::{LlmMetadata, LlmProvider, LlmProviderError};
use crate::DEFAULT_GEMINI_URL;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    system_instruction: GeminiContent,
    contents: Vec<GeminiContent>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize, Default)]
struct GeminiContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_json_schema: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    usage_metadata: Option<GeminiUsage>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    content: Option<GeminiContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiUsage {
    #[serde(default)]
    prompt_token_count: u32,
    #[serde(default)]
    candidates_token_count: u32,
    #[serde(default)]
    total_token_count: u32,
}

impl GenerateContentResponse {
    /// Text of the first candidate. A blocked prompt comes back without
    /// candidates, which reads the same as a blank reply.
    fn into_reply(self) -> Result<(String, Option<GeminiUsage>), LlmProviderError> {
        let Some(candidate) = self.candidates.into_iter().next() else {
            debug!(
                "Gemini reply had no candidates (block_reason={:?})",
                self.prompt_feedback.and_then(|f| f.block_reason)
            );
            return Err(LlmProviderError::EmptyReply);
        };

        let text: String = candidate
            .content
            .unwrap_or_default()
            .parts
            .into_iter()
            .filter_map(|p| p.text)
            .collect();

        if text.trim().is_empty() {
            debug!("Gemini reply had no text (finish_reason={:?})", candidate.finish_reason);
            return Err(LlmProviderError::EmptyReply);
        }

        Ok((text, self.usage_metadata))
    }
}

impl GeminiUsage {
    fn record(&self, metadata: &mut LlmMetadata) {
        metadata.tokens_prompt = Some(self.prompt_token_count);
        metadata.tokens_completion = Some(self.candidates_token_count);
        metadata.tokens_total = Some(self.total_token_count);
    }
}

impl GeminiContent {
    fn text(role: Option<&str>, text: &str) -> Self {
        Self {
            role: role.map(str::to_string),
            parts: vec![GeminiPart {
                text: Some(text.to_string()),
            }],
        }
    }
}


/// Google Generative Language API (`generateContent`).
pub struct GeminiProvider {
    api_key: String,
    base_url: String,
    model: String,
    temperature: f64,
    client: Client,
}

impl GeminiProvider {

    pub fn new(
        api_key: impl Into<String>,
        base_url: Option<String>,
        model: impl Into<String>,
        temperature: f64,
        timeout: Duration,
    ) -> Result<Self, LlmProviderError> {
        let model = model.into();
        let base_url = base_url
            .unwrap_or_else(|| DEFAULT_GEMINI_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        info!("Gemini provider initialized (model={}, url={})", model, base_url);
        Ok(Self {
            api_key: api_key.into(),
            base_url,
            model,
            temperature,
            client: Client::builder().timeout(timeout).build()?,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, self.model)
    }
}

#[async_trait]
impl LlmProvider for GeminiProvider {
    async fn generate(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        response_schema: Option<&Value>,
    ) -> Result<(String, LlmMetadata), LlmProviderError> {
        let request = GenerateContentRequest {
            system_instruction: GeminiContent::text(None, system_prompt),
            contents: vec![GeminiContent::text(Some("user"), user_prompt)],
            generation_config: GenerationConfig {
                temperature: self.temperature,
                response_mime_type: response_schema.map(|_| "application/json".to_string()),
                response_json_schema: response_schema.cloned(),
            },
        };

        let started = Instant::now();
        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await?
            .error_for_status()
            .map_err(LlmProviderError::Http)?
            .json::<GenerateContentResponse>()
            .await?;

        let (text, usage) = response.into_reply()?;

        let mut metadata = LlmMetadata {
            provider: "gemini".to_string(),
            model: self.model.clone(),
            base_url: Some(self.base_url.clone()),
            latency_ms: Some(started.elapsed().as_millis() as u64),
            ..Default::default()
        };
        if let Some(usage) = usage {
            usage.record(&mut metadata);
        }

        Ok((text, metadata))
    }

    fn provider_name(&self) -> &str {
        "gemini"
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
