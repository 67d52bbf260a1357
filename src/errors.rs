use thiserror::Error;

#[derive(Error, Debug)]
pub enum AlarmError {
    #[error("Failed to spawn alarm worker thread: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("Unknown time unit '{0}'. Expected one of: us, ms, s, min")]
    InvalidUnit(String),

    #[error("Invalid interval: {0}")]
    InvalidInterval(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, AlarmError>;
