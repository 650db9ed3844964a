use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable handle distinguishing one uploaded video from another within a
/// session. Two submissions with the same identity are the same video.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VideoIdentity(String);

impl VideoIdentity {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VideoIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for VideoIdentity {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One message in the chat transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: Role,
    pub content: String,
}

impl ChatTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// The textual report derived from one video, or the reason producing it
/// failed. A failed artifact still feeds the chat system instruction the same
/// way a report does; its text stands in for the summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummaryArtifact {
    Report(String),
    Failed(String),
}

impl SummaryArtifact {
    /// The text embedded into chat context, whichever variant this is.
    pub fn text(&self) -> &str {
        match self {
            SummaryArtifact::Report(text) | SummaryArtifact::Failed(text) => text,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, SummaryArtifact::Failed(_))
    }
}
