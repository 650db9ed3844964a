//! Smotri Core Library
//!
//! Session lifecycle for video understanding chat: stage an uploaded video,
//! produce one structured summary per video identity via a hosted multimodal
//! API, and answer follow-up questions through a hosted chat completion API
//! grounded in that summary.

pub mod chat;
pub mod config;
pub mod error;
pub mod format;
pub mod prompt;
pub mod session;
pub mod staging;
pub mod summarizer;
pub mod types;

// Re-export commonly used items at crate root
pub use chat::{ChatComplete, GroqClient};
pub use config::{ChatConfig, SummarizerConfig, chat_api_key, summarizer_api_key};
pub use error::{Result, SmotriError};
pub use format::{format_transcript, role_label};
pub use session::{Session, SessionController, SessionState, SubmitOutcome};
pub use staging::{is_supported_container, stage_video, staging_root, summary_file_name};
pub use summarizer::{GeminiClient, Summarize};
pub use types::{ChatTurn, Role, SummaryArtifact, VideoIdentity};
