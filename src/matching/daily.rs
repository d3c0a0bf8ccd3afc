use chrono::{Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::core::config::CatphishConfig;
use crate::core::error::{CatphishError, Result};


pub const QUESTION_ID_PREFIX: &str = "anchor-today";

pub const DEFAULT_ROTATION: [&str; 4] = [
    "What part of your reflection do you trust the most?",
    "If you were a color, which one would feel like silence?",
    "What is the most honest thing you've ever said to a stranger?",
    "If gravity stopped for 10 seconds, where would you want to be?",
];


#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyPrompt {
    /// Serialized as `YYYY-MM-DD`.
    pub date: NaiveDate,
    pub question_id: String,
    pub question_text: String,
}


/// Picks `rotation[day_of_month % rotation.len()]`.
#[derive(Debug, Clone)]
pub struct DailyPromptSelector {
    rotation: Vec<String>,
}

impl DailyPromptSelector {
    pub fn new(rotation: Vec<String>) -> Result<Self> {
        if rotation.is_empty() {
            return Err(CatphishError::Config("prompt rotation is empty".to_string()));
        }
        if let Some(index) = rotation.iter().position(|p| p.trim().is_empty()) {
            return Err(CatphishError::Config(format!(
                "prompt rotation entry {index} is blank"
            )));
        }
        Ok(Self { rotation })
    }

    pub fn from_config(config: &CatphishConfig) -> Result<Self> {
        match &config.prompt_rotation {
            Some(rotation) => Self::new(rotation.clone()),
            None => Ok(Self::default()),
        }
    }

    pub fn rotation(&self) -> &[String] {
        &self.rotation
    }

    pub fn select(&self, date: NaiveDate) -> DailyPrompt {
        let index = date.day() as usize % self.rotation.len();
        DailyPrompt {
            date,
            question_id: format!("{QUESTION_ID_PREFIX}-{index}"),
            question_text: self.rotation[index].clone(),
        }
    }

    /// Uses the UTC calendar date for both the index and the reported date.
    pub fn today(&self) -> DailyPrompt {
        self.select(Utc::now().date_naive())
    }
}

impl Default for DailyPromptSelector {
    fn default() -> Self {
        Self {
            rotation: DEFAULT_ROTATION.iter().map(|p| p.to_string()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_day_ten_picks_index_two() {
        let selector = DailyPromptSelector::default();
        let prompt = selector.select(date(2026, 10, 10));
        assert_eq!(prompt.question_id, "anchor-today-2");
        assert_eq!(prompt.question_text, DEFAULT_ROTATION[2]);
        assert_eq!(prompt.date, date(2026, 10, 10));
    }

    #[test]
    fn test_rotation_wraps() {
        let selector = DailyPromptSelector::default();
        assert_eq!(selector.select(date(2026, 3, 4)).question_id, "anchor-today-0");
        assert_eq!(selector.select(date(2026, 3, 31)).question_id, "anchor-today-3");
        assert_eq!(selector.select(date(2026, 3, 1)).question_id, "anchor-today-1");
    }

    #[test]
    fn test_serializes_date_only() {
        let prompt = DailyPromptSelector::default().select(date(2026, 1, 9));
        let value = serde_json::to_value(&prompt).unwrap();
        assert_eq!(value["date"], "2026-01-09");
        assert_eq!(value["questionId"], "anchor-today-1");
        assert_eq!(value["questionText"], DEFAULT_ROTATION[1]);
    }

    #[test]
    fn test_custom_rotation() {
        let selector =
            DailyPromptSelector::new(vec!["Only question".to_string(), "Other".to_string()]).unwrap();
        let prompt = selector.select(date(2026, 5, 7));
        assert_eq!(prompt.question_id, "anchor-today-1");
        assert_eq!(prompt.question_text, "Other");
    }

    #[test]
    fn test_empty_rotation_rejected() {
        assert!(DailyPromptSelector::new(Vec::new()).is_err());
    }

    #[test]
    fn test_blank_rotation_entry_rejected() {
        let err = DailyPromptSelector::new(vec!["Loyalty?".to_string(), "  ".to_string()]).unwrap_err();
        assert!(matches!(err, CatphishError::Config(_)));
        assert!(err.to_string().contains("entry 1"));
        assert!(DailyPromptSelector::new(vec![String::new()]).is_err());
    }

    #[test]
    fn test_from_config_override() {
        let config = CatphishConfig {
            prompt_rotation: Some(vec!["Solo".to_string()]),
            ..Default::default()
        };
        let selector = DailyPromptSelector::from_config(&config).unwrap();
        assert_eq!(selector.today().question_text, "Solo");
        assert_eq!(
            DailyPromptSelector::from_config(&CatphishConfig::default()).unwrap().rotation().len(),
            4
        );
    }
}
