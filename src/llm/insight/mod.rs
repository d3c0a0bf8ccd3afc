

pub mod generator;
pub mod models;
pub mod prompt;

pub use generator::{FrequencyInsightGenerator, InsightError};
pub use models::FrequencyInsight;
