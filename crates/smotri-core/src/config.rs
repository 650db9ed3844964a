use std::time::Duration;

use crate::error::{Result, SmotriError};

/// Settings for the video summarization provider (Gemini Files API +
/// generateContent).
#[derive(Clone, Debug)]
pub struct SummarizerConfig {
    pub base_url: String,
    pub model: String,
    /// Fixed sleep between remote processing status checks.
    pub poll_interval: Duration,
    /// Upper bound on status checks before giving up on a stuck remote job.
    pub max_polls: u32,
}

impl Default for SummarizerConfig {
    fn default() -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            model: "gemini-1.5-flash".to_string(),
            poll_interval: Duration::from_secs(10),
            max_polls: 60,
        }
    }
}

/// Settings for the chat completion provider (Groq, OpenAI-compatible).
#[derive(Clone, Debug)]
pub struct ChatConfig {
    pub api_url: String,
    pub model: String,
    pub temperature: f64,
    pub max_tokens: u32,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.groq.com/openai/v1/chat/completions".to_string(),
            model: "llama-3.3-70b-versatile".to_string(),
            temperature: 0.7,
            max_tokens: 4096,
        }
    }
}

pub const SUMMARIZER_KEY_VAR: &str = "GEMINI_API_KEY";
pub const CHAT_KEY_VAR: &str = "GROQ_API_KEY";

fn require_env(env_var: &str) -> Result<String> {
    std::env::var(env_var).map_err(|_| SmotriError::MissingApiKey {
        env_var: env_var.to_string(),
    })
}

/// Read the summarization provider credential, failing with the variable name.
pub fn summarizer_api_key() -> Result<String> {
    require_env(SUMMARIZER_KEY_VAR)
}

/// Read the chat provider credential, failing with the variable name.
pub fn chat_api_key() -> Result<String> {
    require_env(CHAT_KEY_VAR)
}
