

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

use super::base::{LlmMetadata, LlmProvider, LlmProviderError};


/// Tries `primary`, then `secondary` when the primary call fails.
pub struct LlmProviderWithFallback {
    primary: Arc<dyn LlmProvider>,
    secondary: Arc<dyn LlmProvider>,
    using_fallback: AtomicBool,
    fallback_count: AtomicUsize,
    primary_failures: AtomicUsize,
    last_primary_error: Mutex<Option<String>>,
}

impl LlmProviderWithFallback {

    pub fn new(primary: Arc<dyn LlmProvider>, secondary: Arc<dyn LlmProvider>) -> Self {
        info!(
            "LlmProviderWithFallback initialized: primary={}/{}, fallback={}/{}",
            primary.provider_name(),
            primary.model_name(),
            secondary.provider_name(),
            secondary.model_name()
        );

        Self {
            primary,
            secondary,
            using_fallback: AtomicBool::new(false),
            fallback_count: AtomicUsize::new(0),
            primary_failures: AtomicUsize::new(0),
            last_primary_error: Mutex::new(None),
        }
    }


    pub fn is_using_fallback(&self) -> bool {
        self.using_fallback.load(Ordering::SeqCst)
    }


    pub fn fallback_count(&self) -> usize {
        self.fallback_count.load(Ordering::SeqCst)
    }


    pub fn primary_failures(&self) -> usize {
        self.primary_failures.load(Ordering::SeqCst)
    }


    pub fn last_primary_error(&self) -> Option<String> {
        self.last_primary_error.lock().clone()
    }
}

#[async_trait]
impl LlmProvider for LlmProviderWithFallback {
    async fn generate(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        response_schema: Option<&Value>,
    ) -> Result<(String, LlmMetadata), LlmProviderError> {
        let original_error = match self
            .primary
            .generate(system_prompt, user_prompt, response_schema)
            .await
        {
            Ok(reply) => {
                self.using_fallback.store(false, Ordering::SeqCst);
                self.primary_failures.store(0, Ordering::SeqCst);
                return Ok(reply);
            }
            Err(e) => e,
        };

        let failures = self.primary_failures.fetch_add(1, Ordering::SeqCst) + 1;
        warn!(
            "Primary LLM provider {} failed ({}x), falling back to {}/{}: {}",
            self.primary.provider_name(),
            failures,
            self.secondary.provider_name(),
            self.secondary.model_name(),
            original_error
        );
        *self.last_primary_error.lock() = Some(original_error.to_string());

        let (content, mut metadata) = self
            .secondary
            .generate(system_prompt, user_prompt, response_schema)
            .await?;

        metadata.fallback_used = true;
        metadata.original_provider = Some(self.primary.provider_name().to_string());
        metadata.original_error = Some(original_error.to_string());

        self.using_fallback.store(true, Ordering::SeqCst);
        let total = self.fallback_count.fetch_add(1, Ordering::SeqCst) + 1;
        info!("Fallback successful, total_fallbacks={}", total);

        Ok((content, metadata))
    }

    fn provider_name(&self) -> &str {
        if self.is_using_fallback() {
            self.secondary.provider_name()
        } else {
            self.primary.provider_name()
        }
    }

    fn model_name(&self) -> &str {
        if self.is_using_fallback() {
            self.secondary.model_name()
        } else {
            self.primary.model_name()
        }
    }
}
