use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SmotriError {
    #[error("Upload failed for {path}: {reason}")]
    UploadFailed { path: PathBuf, reason: String },

    #[error("Video processing failed. State: {state}")]
    ProcessingFailed { state: String },

    #[error("Video processing still pending after {attempts} status checks")]
    ProcessingTimedOut { attempts: u32 },

    #[error("Summary generation failed: {reason}")]
    SummaryFailed { reason: String },

    #[error("Chat completion failed: {reason}")]
    ChatFailed { reason: String },

    #[error("No video summary available yet")]
    SummaryNotReady,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("Missing API key: {env_var} environment variable is not set")]
    MissingApiKey { env_var: String },
}

pub type Result<T> = std::result::Result<T, SmotriError>;
