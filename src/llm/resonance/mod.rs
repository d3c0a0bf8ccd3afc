

pub mod models;
pub mod prompt;
pub mod ranker;

pub use models::{RankingCandidate, ResonanceScore, ResonanceScores, NEUTRAL_SCORE};
pub use ranker::{LlmResonanceRanker, RankerError, ResonanceRanker};
