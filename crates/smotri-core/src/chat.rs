use async_trait::async_trait;
use tracing::debug;

use crate::{
    config::{ChatConfig, chat_api_key},
    error::{Result, SmotriError},
    types::ChatTurn,
};

/// Remote service producing one assistant reply from a message list.
/// Stateless: every call carries the full context explicitly.
#[async_trait]
pub trait ChatComplete: Send + Sync {
    async fn respond(&self, system: &str, history: &[ChatTurn], question: &str) -> Result<String>;
}

/// Ordered wire message list: system instruction, prior turns, then the new
/// question as the final user message.
pub fn build_messages(
    system: &str,
    history: &[ChatTurn],
    question: &str,
) -> Vec<serde_json::Value> {
    let mut messages = Vec::with_capacity(history.len() + 2);
    messages.push(serde_json::json!({"role": "system", "content": system}));
    for turn in history {
        messages.push(serde_json::json!({"role": turn.role, "content": turn.content}));
    }
    messages.push(serde_json::json!({"role": "user", "content": question}));
    messages
}

/// Client for the Groq chat completions API (OpenAI-compatible).
pub struct GroqClient {
    http: reqwest::Client,
    api_key: String,
    config: ChatConfig,
}

impl GroqClient {
    pub fn new(api_key: String, config: ChatConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key,
            config,
        }
    }

    /// Build a client from `GROQ_API_KEY`.
    pub fn from_env(config: ChatConfig) -> Result<Self> {
        Ok(Self::new(chat_api_key()?, config))
    }
}

#[async_trait]
impl ChatComplete for GroqClient {
    async fn respond(&self, system: &str, history: &[ChatTurn], question: &str) -> Result<String> {
        let messages = build_messages(system, history, question);
        debug!(model = %self.config.model, messages = messages.len(), "requesting chat completion");

        let response = self
            .http
            .post(&self.config.api_url)
            .header("Content-Type", "application/json")
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&serde_json::json!({
                "model": self.config.model,
                "messages": messages,
                "temperature": self.config.temperature,
                "max_tokens": self.config.max_tokens,
            }))
            .send()
            .await?
            .json::<serde_json::Value>()
            .await?;

        let content = response["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| SmotriError::ChatFailed {
                reason: format!("Invalid API response: {:?}", response),
            })?;

        Ok(content.to_string())
    }
}
