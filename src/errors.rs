use thiserror::Error;

use crate::config::ConfigError;
use crate::model::NodeId;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error (JSON): {0}")]
    Json(#[from] serde_json::Error),

    #[error("Node with ID {0} not found")]
    NodeNotFound(NodeId),
}

pub type AppResult<T> = Result<T, AppError>;
