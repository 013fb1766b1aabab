use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Unit not present in snapshot: {0}")]
    UnknownUnit(crate::core::types::UnitTag),

    #[error("Invalid threshold: {0}")]
    InvalidThreshold(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, EngineError>;
