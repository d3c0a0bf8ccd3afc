use std::collections::HashSet;

use super::models::User;


pub const CORE_TRUTH_BONUS: f64 = 0.05;
pub const LOCATION_BONUS: f64 = 0.05;
/// Upper bound on a final score; there is no lower clamp here.
pub const MAX_COMPATIBILITY: f64 = 0.99;
pub const MAX_SHARED_TRAITS: usize = 3;


/// Deterministic bonus from exact profile-field equality, in `[0.0, 0.10]`.
///
/// Core truths must both be non-empty. Locations only need to be present,
/// so two empty-string locations still earn the bonus.
pub fn trait_bonus(acting: &User, candidate: &User) -> f64 {
    let mut bonus = 0.0;

    match (acting.core_truth.as_deref(), candidate.core_truth.as_deref()) {
        (Some(a), Some(b)) if !a.is_empty() && a == b => bonus += CORE_TRUTH_BONUS,
        _ => {}
    }

    if let (Some(a), Some(b)) = (acting.location.as_deref(), candidate.location.as_deref()) {
        if a == b {
            bonus += LOCATION_BONUS;
        }
    }

    bonus
}


pub fn final_score(base: f64, bonus: f64) -> f64 {
    (base + bonus).min(MAX_COMPATIBILITY)
}


/// First tags of the de-duplicated union, acting user's interests first.
pub fn shared_traits(acting: &User, candidate: &User) -> Vec<String> {
    let mut seen = HashSet::new();
    acting
        .interests
        .iter()
        .chain(candidate.interests.iter())
        .filter(|tag| seen.insert(*tag))
        .take(MAX_SHARED_TRAITS)
        .cloned()
        .collect()
}
