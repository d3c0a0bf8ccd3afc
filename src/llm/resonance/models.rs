use std::collections::HashMap;

use serde::{Deserialize, Serialize};


pub const NEUTRAL_SCORE: f64 = 0.5;


/// One candidate answer submitted for ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingCandidate {
    pub id: String,
    pub answer: String,
}

impl RankingCandidate {
    pub fn new(id: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            answer: answer.into(),
        }
    }
}


#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResonanceScore {
    pub id: String,
    pub score: f64,
}


/// Validated ranker output keyed by candidate id.
///
/// Every stored score is finite and within `[0.0, 1.0]`: out-of-range values
/// are clamped on the way in, non-finite ones are dropped and therefore read
/// as missing. A candidate may be absent; callers decide the default.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResonanceScores {
    scores: HashMap<String, f64>,
}

impl ResonanceScores {

    pub fn empty() -> Self {
        Self::default()
    }

    /// Uniform neutral score for every submitted candidate.
    pub fn neutral(candidates: &[RankingCandidate]) -> Self {
        candidates
            .iter()
            .map(|c| (c.id.clone(), NEUTRAL_SCORE))
            .collect()
    }

    pub fn get(&self, id: &str) -> Option<f64> {
        self.scores.get(id).copied()
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.scores.iter().map(|(id, score)| (id.as_str(), *score))
    }
}

/// Later entries for the same id win.
impl FromIterator<(String, f64)> for ResonanceScores {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        let scores = iter
            .into_iter()
            .filter(|(_, score)| score.is_finite())
            .map(|(id, score)| (id, score.clamp(0.0, 1.0)))
            .collect();
        Self { scores }
    }
}

impl From<Vec<ResonanceScore>> for ResonanceScores {
    fn from(scores: Vec<ResonanceScore>) -> Self {
        scores.into_iter().map(|s| (s.id, s.score)).collect()
    }
}
