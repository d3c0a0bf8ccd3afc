use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use super::error::MatchError;
use super::models::{CandidatePair, Match, MatchStatus, User};
use super::scoring::{final_score, shared_traits, trait_bonus};
use crate::llm::resonance::{RankingCandidate, ResonanceRanker, NEUTRAL_SCORE};
use crate::utils::preview;


/// Blends resonance scores with trait bonuses into an ordered match list.
///
/// Holds no mutable state, so one composer can serve concurrent calls.
pub struct MatchComposer {
    ranker: Arc<dyn ResonanceRanker>,
}

impl MatchComposer {

    pub fn new(ranker: Arc<dyn ResonanceRanker>) -> Self {
        Self { ranker }
    }

    /// Ranks `pool` against `acting_answer` for `acting_user`.
    ///
    /// Makes at most one ranker call. The acting user is dropped from the
    /// pool, candidates the ranker leaves out get the neutral score, and the
    /// result is stably sorted by descending compatibility.
    pub async fn compose_matches(
        &self,
        acting_user: &User,
        acting_answer: &str,
        pool: &[CandidatePair],
    ) -> Result<Vec<Match>, MatchError> {
        if acting_user.id.is_empty() {
            return Err(MatchError::Validation("acting user id is empty".to_string()));
        }

        let candidates: Vec<&CandidatePair> = pool
            .iter()
            .filter(|c| c.user.id != acting_user.id)
            .collect();

        if candidates.len() < pool.len() {
            debug!(
                "Excluded {} self entries from pool of user {}",
                pool.len() - candidates.len(),
                acting_user.id
            );
        }

        if candidates.is_empty() {
            debug!("No candidates left for user {}", acting_user.id);
            return Ok(Vec::new());
        }

        let ranking_input: Vec<RankingCandidate> = candidates
            .iter()
            .map(|c| RankingCandidate::new(c.user.id.clone(), c.answer.clone()))
            .collect();

        debug!(
            "Composing matches for {}: answer='{}', candidates={}",
            acting_user.id,
            preview(acting_answer, 50),
            ranking_input.len()
        );

        let scores = self
            .ranker
            .rank(acting_answer, &ranking_input)
            .await
            .map_err(|e| {
                warn!("Resonance ranking failed for {}: {}", acting_user.id, e);
                MatchError::Unavailable(e)
            })?;

        let created_at = Utc::now();
        let mut missing = 0usize;

        let mut matches: Vec<Match> = candidates
            .into_iter()
            .map(|candidate| {
                let base = scores.get(&candidate.user.id).unwrap_or_else(|| {
                    missing += 1;
                    NEUTRAL_SCORE
                });
                let bonus = trait_bonus(acting_user, &candidate.user);

                Match {
                    id: Match::id_for(&acting_user.id, &candidate.user.id),
                    users: (acting_user.id.clone(), candidate.user.id.clone()),
                    compatibility_score: final_score(base, bonus),
                    shared_traits: shared_traits(acting_user, &candidate.user),
                    status: MatchStatus::Pending,
                    created_at,
                    target_user: candidate.user.clone(),
                }
            })
            .collect();

        matches.sort_by(|a, b| b.compatibility_score.total_cmp(&a.compatibility_score));

        if missing > 0 {
            debug!("Ranker omitted {} candidates, used neutral score", missing);
        }
        info!(
            "Composed {} matches for {} (top={:.2})",
            matches.len(),
            acting_user.id,
            matches.first().map_or(0.0, |m| m.compatibility_score)
        );

        Ok(matches)
    }
}
