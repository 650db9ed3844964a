use std::path::Path;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, info};

use crate::{
    config::{SummarizerConfig, summarizer_api_key},
    error::{Result, SmotriError},
    prompt::ANALYSIS_PROMPT,
    staging::mime_for,
};

/// Remote service turning a staged video file into a structured text report.
#[async_trait]
pub trait Summarize: Send + Sync {
    async fn summarize(&self, video_path: &Path) -> Result<String>;
}

/// Handle to an uploaded file on the summarization provider.
#[derive(Debug, Deserialize)]
struct RemoteFile {
    name: String,
    uri: String,
    state: String,
}

const STATE_PROCESSING: &str = "PROCESSING";
const STATE_FAILED: &str = "FAILED";

/// Client for the Gemini Files + generateContent API: upload the video,
/// wait out remote processing, then request one analysis report.
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    config: SummarizerConfig,
}

impl GeminiClient {
    pub fn new(api_key: String, config: SummarizerConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key,
            config,
        }
    }

    /// Build a client from `GEMINI_API_KEY`.
    pub fn from_env(config: SummarizerConfig) -> Result<Self> {
        Ok(Self::new(summarizer_api_key()?, config))
    }

    async fn upload(&self, video_path: &Path) -> Result<RemoteFile> {
        let bytes = tokio::fs::read(video_path).await?;
        let mime = mime_for(video_path);
        info!(path = %video_path.display(), size = bytes.len(), "uploading video");

        let response = self
            .http
            .post(format!(
                "{}/upload/v1beta/files?uploadType=media&key={}",
                self.config.base_url, self.api_key
            ))
            .header("Content-Type", mime)
            .body(bytes)
            .send()
            .await?
            .error_for_status()
            .map_err(|e| SmotriError::UploadFailed {
                path: video_path.to_path_buf(),
                reason: e.to_string(),
            })?
            .json::<serde_json::Value>()
            .await?;

        let file: RemoteFile = serde_json::from_value(response["file"].clone())?;
        Ok(file)
    }

    async fn get_file(&self, name: &str) -> Result<RemoteFile> {
        let file = self
            .http
            .get(format!(
                "{}/v1beta/{}?key={}",
                self.config.base_url, name, self.api_key
            ))
            .send()
            .await?
            .error_for_status()?
            .json::<RemoteFile>()
            .await?;
        Ok(file)
    }

    /// Poll at a fixed interval until the remote file leaves PROCESSING.
    /// Bounded: a job still pending after `max_polls` checks is reported as
    /// timed out rather than waited on forever.
    async fn wait_until_processed(&self, mut file: RemoteFile) -> Result<RemoteFile> {
        let mut attempts = 0u32;
        while file.state == STATE_PROCESSING {
            if attempts >= self.config.max_polls {
                return Err(SmotriError::ProcessingTimedOut { attempts });
            }
            attempts += 1;
            debug!(name = %file.name, attempts, "waiting for video processing");
            tokio::time::sleep(self.config.poll_interval).await;
            file = self.get_file(&file.name).await?;
        }

        if file.state == STATE_FAILED {
            return Err(SmotriError::ProcessingFailed { state: file.state });
        }
        Ok(file)
    }

    async fn generate(&self, file: &RemoteFile, mime: &str) -> Result<String> {
        let response = self
            .http
            .post(format!(
                "{}/v1beta/models/{}:generateContent?key={}",
                self.config.base_url, self.config.model, self.api_key
            ))
            .json(&serde_json::json!({
                "contents": [{
                    "parts": [
                        {"file_data": {"file_uri": file.uri, "mime_type": mime}},
                        {"text": ANALYSIS_PROMPT},
                    ],
                }],
            }))
            .send()
            .await?
            .json::<serde_json::Value>()
            .await?;

        let text = response["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .ok_or_else(|| SmotriError::SummaryFailed {
                reason: format!("Invalid API response: {:?}", response),
            })?;

        Ok(text.to_string())
    }
}

#[async_trait]
impl Summarize for GeminiClient {
    async fn summarize(&self, video_path: &Path) -> Result<String> {
        let mime = mime_for(video_path);
        let uploaded = self.upload(video_path).await?;
        let ready = self.wait_until_processed(uploaded).await?;
        self.generate(&ready, mime).await
    }
}
