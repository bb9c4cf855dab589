use thiserror::Error;

#[derive(Error, Debug)]
pub enum WagerError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV Error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON Parsing Error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Stimulus Pattern Error: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Invalid Input: {0}")]
    InvalidInput(String),

    #[error("Missing Resource: {0}")]
    ResourceMissing(String),

    #[error("Session aborted by participant")]
    Aborted,
}

pub type WagerResult<T> = Result<T, WagerError>;

pub(crate) fn invalid<T>(msg: impl Into<String>) -> WagerResult<T> {
    Err(WagerError::InvalidInput(msg.into()))
}
