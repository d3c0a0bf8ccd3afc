

pub mod factory;
pub mod insight;
pub mod providers;
pub mod resonance;

pub use factory::LlmProviderFactory;
pub use insight::{FrequencyInsight, FrequencyInsightGenerator, InsightError};
pub use resonance::{LlmResonanceRanker, RankerError, ResonanceRanker, ResonanceScores};
