

pub mod base;
pub mod fallback;
pub mod gemini;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod ollama;

pub use base::{LlmMetadata, LlmProvider, LlmProviderError};
pub use fallback::LlmProviderWithFallback;
pub use gemini::GeminiProvider;
pub use ollama::OllamaProvider;
