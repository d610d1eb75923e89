//! Video artifacts
//!
//! The single finished video a session submits, plus the upload-side file
//! selection and the accepted-type whitelist.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use uuid::Uuid;

/// File extensions accepted for upload (compared case-insensitively)
pub const ACCEPTED_EXTENSIONS: [&str; 5] = ["mp4", "mov", "avi", "mkv", "webm"];

/// Where an artifact came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactSource {
    Upload,
    Recording,
}

/// A fully materialized video, ready for submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoArtifact {
    id: Uuid,
    name: String,
    mime_type: String,
    source: ArtifactSource,
    created_at: DateTime<Utc>,
    bytes: Vec<u8>,
}

impl VideoArtifact {
    pub fn new(
        name: impl Into<String>,
        mime_type: impl Into<String>,
        source: ArtifactSource,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            mime_type: mime_type.into(),
            source,
            created_at: Utc::now(),
            bytes,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Display name, also used as the upload filename
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn source(&self) -> ArtifactSource {
        self.source
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Metadata view without the payload
    pub fn summary(&self) -> ArtifactSummary {
        ArtifactSummary {
            id: self.id,
            name: self.name.clone(),
            mime_type: self.mime_type.clone(),
            source: self.source,
            size_bytes: self.bytes.len(),
            created_at: self.created_at,
        }
    }
}

/// Artifact metadata exposed in session snapshots
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactSummary {
    pub id: Uuid,
    pub name: String,
    pub mime_type: String,
    pub source: ArtifactSource,
    pub size_bytes: usize,
    pub created_at: DateTime<Utc>,
}

/// A file picked by the user in Upload mode
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    /// File name as the user sees it
    pub name: String,

    /// MIME type reported by the picker, empty if unknown
    pub mime_type: String,

    pub bytes: Vec<u8>,
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }

    /// Read a file from disk, inferring its MIME type from the extension
    pub async fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let mime_type = mime_type_for_name(&name).unwrap_or_default().to_string();

        tracing::debug!("Read {} ({} bytes, type '{}')", name, bytes.len(), mime_type);

        Ok(Self {
            name,
            mime_type,
            bytes,
        })
    }

    /// Whether the file passes the video whitelist
    pub fn is_accepted(&self) -> bool {
        is_accepted_video(&self.name, &self.mime_type)
    }

    /// Turn the selection into an artifact, keeping the reported type or
    /// falling back to one inferred from the name
    pub fn into_artifact(self) -> VideoArtifact {
        let mime_type = if self.mime_type.is_empty() {
            mime_type_for_name(&self.name)
                .unwrap_or("application/octet-stream")
                .to_string()
        } else {
            self.mime_type
        };
        VideoArtifact::new(self.name, mime_type, ArtifactSource::Upload, self.bytes)
    }
}

/// A file is a video if its MIME type starts with `video/` or its extension
/// is on the whitelist.
pub fn is_accepted_video(name: &str, mime_type: &str) -> bool {
    if mime_type.to_ascii_lowercase().starts_with("video/") {
        return true;
    }
    extension_of(name)
        .map(|ext| ACCEPTED_EXTENSIONS.iter().any(|a| ext.eq_ignore_ascii_case(a)))
        .unwrap_or(false)
}

/// MIME type for a whitelisted extension
pub fn mime_type_for_name(name: &str) -> Option<&'static str> {
    let ext = extension_of(name)?.to_ascii_lowercase();
    match ext.as_str() {
        "mp4" => Some("video/mp4"),
        "mov" => Some("video/quicktime"),
        "avi" => Some("video/x-msvideo"),
        "mkv" => Some("video/x-matroska"),
        "webm" => Some("video/webm"),
        _ => None,
    }
}

fn extension_of(name: &str) -> Option<&str> {
    let (stem, ext) = name.rsplit_once('.')?;
    if stem.is_empty() && ext.is_empty() {
        return None;
    }
    Some(ext)
}
