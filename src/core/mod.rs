pub mod config;
pub mod error;
pub mod types;

pub use config::{load_thresholds, Thresholds};
pub use error::{EngineError, Result};
