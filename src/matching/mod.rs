

pub mod composer;
pub mod daily;
pub mod error;
pub mod models;
pub mod scoring;

pub use composer::MatchComposer;
pub use daily::{DailyPrompt, DailyPromptSelector};
pub use error::MatchError;
pub use models::{CandidatePair, Match, MatchStatus, User};
