//! In-process provider for tests: replays scripted replies, records prompts.

use std::collections::VecDeque;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;

use super::base::{LlmMetadata, LlmProvider, LlmProviderError};


#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub system_prompt: String,
    pub user_prompt: String,
    pub response_schema: Option<Value>,
}


/// Replies are consumed in order; the last one repeats once the script runs out.
/// A blank reply surfaces as [`LlmProviderError::EmptyReply`], as the HTTP providers do.
pub struct ScriptedProvider {
    name: String,
    script: Mutex<VecDeque<Result<String, String>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedProvider {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            script: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn reply(self, content: impl Into<String>) -> Self {
        self.script.lock().push_back(Ok(content.into()));
        self
    }

    pub fn fail(self, message: impl Into<String>) -> Self {
        self.script.lock().push_back(Err(message.into()));
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().clone()
    }

    fn next_step(&self) -> Result<String, String> {
        let mut script = self.script.lock();
        match script.len() {
            0 => Err("script exhausted".to_string()),
            1 => script[0].clone(),
            _ => script.pop_front().unwrap_or_else(|| Err("script exhausted".to_string())),
        }
    }
}

#[async_trait]
impl LlmProvider for ScriptedProvider {
    async fn generate(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        response_schema: Option<&Value>,
    ) -> Result<(String, LlmMetadata), LlmProviderError> {
        self.calls.lock().push(RecordedCall {
            system_prompt: system_prompt.to_string(),
            user_prompt: user_prompt.to_string(),
            response_schema: response_schema.cloned(),
        });

        let content = self.next_step().map_err(LlmProviderError::Provider)?;
        if content.trim().is_empty() {
            return Err(LlmProviderError::EmptyReply);
        }
        let metadata = LlmMetadata {
            provider: self.name.clone(),
            model: "scripted".to_string(),
            ..Default::default()
        };
        Ok((content, metadata))
    }

    fn provider_name(&self) -> &str {
        &self.name
    }

    fn model_name(&self) -> &str {
        "scripted"
    }
}
