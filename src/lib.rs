pub mod core;
pub mod llm;
pub mod matching;
pub mod mcp;
pub mod utils;

pub use utils::preview;


pub use crate::core::config::CatphishConfig;
pub use crate::core::error::{CatphishError, Result};
pub use llm::{FrequencyInsight, FrequencyInsightGenerator, LlmResonanceRanker, ResonanceRanker};
pub use matching::{CandidatePair, DailyPrompt, DailyPromptSelector, Match, MatchComposer, MatchError, MatchStatus, User};


pub const DEFAULT_GEMINI_URL: &str = "https://generativelanguage.googleapis.com";


pub const DEFAULT_GEMINI_MODEL: &str = "gemini-3-flash-preview";


pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";


pub const DEFAULT_OLLAMA_MODEL: &str = "llama3.2";
