

pub mod config;
pub mod error;

pub use config::CatphishConfig;
pub use error::{CatphishError, Result};
