use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::models::{RankingCandidate, ResonanceScore, ResonanceScores};
use super::prompt::{build_ranking_prompt, response_schema, SYSTEM_PROMPT};
use crate::llm::providers::base::{LlmProvider, LlmProviderError};
use crate::utils::{preview, strip_code_fence};


/// The ranker call could not complete. Malformed or empty replies are not errors.
#[derive(Error, Debug)]
pub enum RankerError {
    #[error("resonance provider failed: {0}")]
    Provider(#[from] LlmProviderError),
}


/// Scores how well each candidate answer resonates with `answer`.
///
/// The result may omit candidates. Implementations that receive a reply
/// they cannot parse, or no reply text at all, must return
/// [`ResonanceScores::neutral`] rather than an error.
#[async_trait]
pub trait ResonanceRanker: Send + Sync {
    async fn rank(
        &self,
        answer: &str,
        candidates: &[RankingCandidate],
    ) -> Result<ResonanceScores, RankerError>;
}


#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RankerReply {
    List(Vec<ResonanceScore>),
    Wrapped { scores: Vec<ResonanceScore> },
}

impl RankerReply {
    fn into_scores(self) -> Vec<ResonanceScore> {
        match self {
            Self::List(scores) | Self::Wrapped { scores } => scores,
        }
    }
}


/// Resonance ranking backed by an LLM with a JSON response schema.
pub struct LlmResonanceRanker {
    llm: Arc<dyn LlmProvider>,
    schema: Value,
}

impl LlmResonanceRanker {

    pub fn new(llm: Arc<dyn LlmProvider>) -> Self {
        info!(
            "LlmResonanceRanker initialized: provider={}/{}",
            llm.provider_name(),
            llm.model_name()
        );
        Self {
            llm,
            schema: response_schema(),
        }
    }

    fn parse_reply(reply: &str) -> Result<ResonanceScores, serde_json::Error> {
        let parsed: RankerReply = serde_json::from_str(strip_code_fence(reply))?;
        Ok(parsed.into_scores().into())
    }
}

#[async_trait]
impl ResonanceRanker for LlmResonanceRanker {
    async fn rank(
        &self,
        answer: &str,
        candidates: &[RankingCandidate],
    ) -> Result<ResonanceScores, RankerError> {
        if candidates.is_empty() {
            return Ok(ResonanceScores::empty());
        }

        debug!(
            "Ranking resonance: answer='{}', candidates={}",
            preview(answer, 50),
            candidates.len()
        );

        let prompt = build_ranking_prompt(answer, candidates);
        let (reply, metadata) = match self
            .llm
            .generate(SYSTEM_PROMPT, &prompt, Some(&self.schema))
            .await
        {
            Ok(generated) => generated,
            Err(LlmProviderError::EmptyReply) => {
                warn!("Resonance reply was empty, using neutral scores");
                return Ok(ResonanceScores::neutral(candidates));
            }
            Err(e) => return Err(e.into()),
        };

        match Self::parse_reply(&reply) {
            Ok(scores) => {
                debug!(
                    "Resonance scored {}/{} candidates via {}/{} (fallback={})",
                    scores.len(),
                    candidates.len(),
                    metadata.provider,
                    metadata.model,
                    metadata.fallback_used
                );
                Ok(scores)
            }
            Err(e) => {
                warn!("Failed to parse resonance reply, using neutral scores: {}", e);
                warn!("Reply was: {}", preview(&reply, 200));
                Ok(ResonanceScores::neutral(candidates))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::providers::mock::ScriptedProvider;
    use crate::llm::resonance::models::NEUTRAL_SCORE;
    use tokio_test::{assert_err, assert_ok};

    fn candidates() -> Vec<RankingCandidate> {
        vec![
            RankingCandidate::new("u2", "I value trust"),
            RankingCandidate::new("u3", "Chasing laser dots"),
        ]
    }

    #[tokio::test]
    async fn test_parses_scores() {
        let llm = Arc::new(
            ScriptedProvider::new("scripted").reply(r#"[{"id":"u2","score":0.8},{"id":"u3","score":0.1}]"#),
        );
        let ranker = LlmResonanceRanker::new(llm.clone());

        let scores = assert_ok!(ranker.rank("loyalty", &candidates()).await);
        assert_eq!(scores.get("u2"), Some(0.8));
        assert_eq!(scores.get("u3"), Some(0.1));

        let calls = llm.calls();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].user_prompt.contains("ID: u3 | Answer: Chasing laser dots"));
        assert_eq!(calls[0].response_schema, Some(response_schema()));
    }

    #[tokio::test]
    async fn test_partial_reply_is_kept_partial() {
        let llm = Arc::new(ScriptedProvider::new("scripted").reply(r#"[{"id":"u2","score":0.6}]"#));
        let ranker = LlmResonanceRanker::new(llm);

        let scores = assert_ok!(ranker.rank("loyalty", &candidates()).await);
        assert_eq!(scores.len(), 1);
        assert_eq!(scores.get("u3"), None);
    }

    #[tokio::test]
    async fn test_fenced_and_wrapped_reply() {
        let llm = Arc::new(
            ScriptedProvider::new("scripted").reply("```json\n{\"scores\": [{\"id\": \"u3\", \"score\": 0.4}]}\n```"),
        );
        let ranker = LlmResonanceRanker::new(llm);

        let scores = assert_ok!(ranker.rank("loyalty", &candidates()).await);
        assert_eq!(scores.get("u3"), Some(0.4));
    }

    #[tokio::test]
    async fn test_malformed_reply_degrades_to_neutral() {
        let llm = Arc::new(ScriptedProvider::new("scripted").reply("the cats are all lovely"));
        let ranker = LlmResonanceRanker::new(llm);

        let scores = assert_ok!(ranker.rank("loyalty", &candidates()).await);
        assert_eq!(scores.len(), 2);
        assert_eq!(scores.get("u2"), Some(NEUTRAL_SCORE));
        assert_eq!(scores.get("u3"), Some(NEUTRAL_SCORE));
    }

    #[tokio::test]
    async fn test_missing_required_field_degrades_to_neutral() {
        let llm = Arc::new(ScriptedProvider::new("scripted").reply(r#"[{"id":"u2"}]"#));
        let ranker = LlmResonanceRanker::new(llm);

        let scores = assert_ok!(ranker.rank("loyalty", &candidates()).await);
        assert_eq!(scores.get("u2"), Some(NEUTRAL_SCORE));
    }

    #[tokio::test]
    async fn test_out_of_range_scores_clamped() {
        let llm = Arc::new(
            ScriptedProvider::new("scripted").reply(r#"[{"id":"u2","score":4.2},{"id":"u3","score":-1}]"#),
        );
        let ranker = LlmResonanceRanker::new(llm);

        let scores = assert_ok!(ranker.rank("loyalty", &candidates()).await);
        assert_eq!(scores.get("u2"), Some(1.0));
        assert_eq!(scores.get("u3"), Some(0.0));
    }

    #[tokio::test]
    async fn test_empty_reply_degrades_to_neutral() {
        let llm = Arc::new(ScriptedProvider::new("scripted").reply("   "));
        let ranker = LlmResonanceRanker::new(llm.clone());

        let scores = assert_ok!(ranker.rank("loyalty", &candidates()).await);
        assert_eq!(scores.len(), 2);
        assert_eq!(scores.get("u2"), Some(NEUTRAL_SCORE));
        assert_eq!(scores.get("u3"), Some(NEUTRAL_SCORE));
        assert_eq!(llm.call_count(), 1);
    }

    #[tokio::test]
    async fn test_provider_failure_propagates() {
        let llm = Arc::new(ScriptedProvider::new("scripted").fail("connection reset"));
        let ranker = LlmResonanceRanker::new(llm);

        let err = assert_err!(ranker.rank("loyalty", &candidates()).await);
        assert!(err.to_string().contains("connection reset"));
    }

    #[tokio::test]
    async fn test_empty_candidates_skip_provider() {
        let llm = Arc::new(ScriptedProvider::new("scripted").reply("[]"));
        let ranker = LlmResonanceRanker::new(llm.clone());

        let scores = assert_ok!(ranker.rank("loyalty", &[]).await);
        assert!(scores.is_empty());
        assert_eq!(llm.call_count(), 0);
    }
}
