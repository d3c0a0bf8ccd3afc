use thiserror::Error;

use crate::llm::resonance::RankerError;


#[derive(Error, Debug)]
pub enum MatchError {
    #[error("invalid acting user: {0}")]
    Validation(String),

    /// All-or-nothing: no partial match list is produced.
    #[error("matching temporarily unavailable")]
    Unavailable(#[source] RankerError),
}
