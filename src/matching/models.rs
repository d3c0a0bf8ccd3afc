use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr};


/// A participant as supplied by the profile source. Read-only to matching.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cat_photo_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iris_color: Option<String>,
    /// Self-declared value, only ever compared for the trait bonus.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub core_truth: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default)]
    pub interests: Vec<String>,
}

impl User {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = name.into();
        self
    }

    pub fn with_core_truth(mut self, core_truth: impl Into<String>) -> Self {
        self.core_truth = Some(core_truth.into());
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_interests<I, S>(mut self, interests: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.interests = interests.into_iter().map(Into::into).collect();
        self
    }
}


/// A candidate together with their answer to the shared prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidatePair {
    pub user: User,
    pub answer: String,
}

impl CandidatePair {
    pub fn new(user: User, answer: impl Into<String>) -> Self {
        Self {
            user,
            answer: answer.into(),
        }
    }
}


#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MatchStatus {
    #[default]
    Pending,

    Connected,

    Archived,
}


#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    /// `match-{acting}-{candidate}`; direction matters, so this is not symmetric.
    pub id: String,
    /// Acting user first.
    pub users: (String, String),
    pub compatibility_score: f64,
    pub shared_traits: Vec<String>,
    pub status: MatchStatus,
    pub created_at: DateTime<Utc>,
    /// Candidate's record for display; not part of the match identity.
    pub target_user: User,
}

impl Match {
    pub fn id_for(acting_id: &str, candidate_id: &str) -> String {
        format!("match-{acting_id}-{candidate_id}")
    }

    pub fn candidate_id(&self) -> &str {
        &self.users.1
    }
}
