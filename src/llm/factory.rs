

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use super::providers::base::LlmProvider;
use super::providers::fallback::LlmProviderWithFallback;
use super::providers::gemini::GeminiProvider;
use super::providers::ollama::OllamaProvider;
use crate::core::config::CatphishConfig;
use crate::core::error::{CatphishError, Result};
use crate::DEFAULT_OLLAMA_URL;


pub struct LlmProviderFactory;

impl LlmProviderFactory {
    /// Builds a single provider by name. Supported: `gemini`, `ollama`.
    pub fn create(
        provider: &str,
        model: &str,
        api_key: Option<&str>,
        base_url: Option<&str>,
        temperature: f64,
        timeout: Duration,
    ) -> Result<Arc<dyn LlmProvider>> {
        match provider {
            "gemini" => {
                let api_key = api_key.filter(|k| !k.is_empty()).ok_or_else(|| {
                    CatphishError::Config(
                        "gemini provider needs an API key (CATPHISH_LLM_API_KEY or GEMINI_API_KEY)"
                            .to_string(),
                    )
                })?;
                Ok(Arc::new(GeminiProvider::new(
                    api_key,
                    base_url.map(String::from),
                    model,
                    temperature,
                    timeout,
                )?))
            }
            "ollama" => Ok(Arc::new(OllamaProvider::new(
                base_url.unwrap_or(DEFAULT_OLLAMA_URL),
                model,
                temperature,
                timeout,
            )?)),
            other => Err(CatphishError::Config(format!(
                "Unknown provider: {other}. Supported: gemini, ollama"
            ))),
        }
    }


    pub fn from_config(config: &CatphishConfig) -> Result<Arc<dyn LlmProvider>> {
        let timeout = Duration::from_secs(config.timeout);
        let primary = Self::create(
            &config.llm_provider,
            &config.llm_model,
            config.llm_api_key.as_deref(),
            config.llm_base_url.as_deref(),
            config.llm_temperature,
            timeout,
        )?;

        if !config.llm_fallback_enabled {
            return Ok(primary);
        }

        let secondary: Arc<dyn LlmProvider> = Arc::new(OllamaProvider::new(
            config.llm_fallback_url.clone(),
            config.llm_fallback_model.clone(),
            config.llm_temperature,
            timeout,
        )?);
        info!("LLM fallback enabled");
        Ok(Arc::new(LlmProviderWithFallback::new(primary, secondary)))
    }
}
