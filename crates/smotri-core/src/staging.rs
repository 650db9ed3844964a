use std::{
    hash::{DefaultHasher, Hash, Hasher},
    path::{Path, PathBuf},
};

use crate::{error::Result, types::VideoIdentity};

/// Default root for staged video files.
pub fn staging_root() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("/tmp"))
        .join("smotri")
}

/// Staging directory for one video identity under the given root.
pub fn staging_dir(root: &Path, identity: &VideoIdentity) -> PathBuf {
    let mut hasher = DefaultHasher::new();
    identity.as_str().hash(&mut hasher);
    root.join(hasher.finish().to_string())
}

/// Whether the upload surface accepts this file. Only mp4 and mov containers
/// are allowed; duration is never verified.
pub fn is_supported_container(path: &Path) -> bool {
    match path.extension() {
        Some(ext) => {
            let ext = ext.to_string_lossy().to_lowercase();
            matches!(ext.as_str(), "mp4" | "mov")
        }
        None => false,
    }
}

fn container_extension(identity: &VideoIdentity) -> &'static str {
    match Path::new(identity.as_str())
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .as_deref()
    {
        Some("mov") => "mov",
        _ => "mp4",
    }
}

/// MIME type for a staged video file, by extension.
pub fn mime_for(path: &Path) -> &'static str {
    match path.extension().map(|ext| ext.to_string_lossy().to_lowercase()).as_deref() {
        Some("mov") => "video/quicktime",
        _ => "video/mp4",
    }
}

/// Write video bytes to the identity-addressed staging location so the
/// upload client can read them back. Ephemeral; not part of any durable
/// contract.
pub async fn stage_video(root: &Path, identity: &VideoIdentity, bytes: &[u8]) -> Result<PathBuf> {
    let dir = staging_dir(root, identity);
    tokio::fs::create_dir_all(&dir).await?;
    let path = dir.join(format!("video.{}", container_extension(identity)));
    tokio::fs::write(&path, bytes).await?;
    Ok(path)
}

/// File name used when the summary is exported as plain text.
pub fn summary_file_name() -> &'static str {
    "video_summary.txt"
}
