use serde::{Deserialize, Serialize};


/// What kind of partner a user is subconsciously seeking, for one protocol day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrequencyInsight {
    pub day: u32,
    /// Two or three word name for the current vibe, e.g. "The Stoic Architect".
    pub archetype: String,
    pub summary: String,
    pub seeking: String,
    /// A trait they are likely suppressing but need in a partner.
    pub shadow: String,
}


/// Model reply before the day is stamped on.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct InsightReply {
    pub archetype: String,
    pub summary: String,
    pub seeking: String,
    pub shadow: String,
}

impl InsightReply {
    pub(crate) fn first_blank_field(&self) -> Option<&'static str> {
        [
            ("archetype", &self.archetype),
            ("summary", &self.summary),
            ("seeking", &self.seeking),
            ("shadow", &self.shadow),
        ]
        .into_iter()
        .find(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
    }

    pub(crate) fn into_insight(self, day: u32) -> FrequencyInsight {
        FrequencyInsight {
            day,
            archetype: self.archetype.trim().to_string(),
            summary: self.summary.trim().to_string(),
            seeking: self.seeking.trim().to_string(),
            shadow: self.shadow.trim().to_string(),
        }
    }
}
