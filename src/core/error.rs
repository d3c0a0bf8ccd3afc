use thiserror::Error;

use crate::llm::insight::InsightError;
use crate::llm::providers::LlmProviderError;
use crate::matching::MatchError;


#[derive(Error, Debug)]
pub enum CatphishError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("LLM provider error: {0}")]
    LlmProvider(#[from] LlmProviderError),

    #[error(transparent)]
    Matching(#[from] MatchError),

    #[error("Insight generation error: {0}")]
    Insight(#[from] InsightError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<::config::ConfigError> for CatphishError {
    fn from(err: ::config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}


pub type Result<T> = std::result::Result<T, CatphishError>;
