use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Unknown buff: {0}")]
    UnknownBuff(String),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SimError>;
