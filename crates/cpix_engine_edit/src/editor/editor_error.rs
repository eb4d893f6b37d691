use thiserror::Error;

use cpix_engine::EngineError;

#[derive(Debug, Error)]
pub enum EditorError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("Invalid editor options: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Failed to write editor options: {0}")]
    ConfigWrite(#[from] toml::ser::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, EditorError>;
