use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::models::{FrequencyInsight, InsightReply};
use super::prompt::{build_insight_prompt, response_schema, SYSTEM_PROMPT};
use crate::llm::providers::base::{LlmProvider, LlmProviderError};
use crate::utils::{preview, strip_code_fence};


#[derive(Error, Debug)]
pub enum InsightError {
    #[error("insight provider failed: {0}")]
    Provider(#[from] LlmProviderError),

    #[error("malformed insight reply: {0}")]
    Malformed(String),
}


pub struct FrequencyInsightGenerator {
    llm: Arc<dyn LlmProvider>,
    schema: Value,
}

impl FrequencyInsightGenerator {

    pub fn new(llm: Arc<dyn LlmProvider>) -> Self {
        info!(
            "FrequencyInsightGenerator initialized: provider={}",
            llm.provider_name()
        );
        Self {
            llm,
            schema: response_schema(),
        }
    }

    /// There is no neutral profile to fall back on, so unlike resonance
    /// ranking a reply that fails validation is an error.
    pub async fn generate(
        &self,
        day: u32,
        answers: &[String],
        core_truth: &str,
    ) -> Result<FrequencyInsight, InsightError> {
        debug!(
            "Generating frequency insight: day={}, answers={}, core_truth='{}'",
            day,
            answers.len(),
            preview(core_truth, 40)
        );

        let prompt = build_insight_prompt(answers, core_truth);
        let (reply, _metadata) = self
            .llm
            .generate(SYSTEM_PROMPT, &prompt, Some(&self.schema))
            .await?;

        let parsed: InsightReply = serde_json::from_str(strip_code_fence(&reply)).map_err(|e| {
            warn!("Failed to parse insight reply: {}", e);
            warn!("Reply was: {}", preview(&reply, 200));
            InsightError::Malformed(e.to_string())
        })?;

        if let Some(field) = parsed.first_blank_field() {
            return Err(InsightError::Malformed(format!("field '{field}' is empty")));
        }

        let insight = parsed.into_insight(day);
        info!("Frequency insight for day {}: {}", day, insight.archetype);
        Ok(insight)
    }
}
