//! Recording state management
//!
//! Defines the recording state machine, the negotiable output formats and
//! per-attempt bookkeeping.

use crate::capture::traits::CaptureError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Recording-related errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordingError {
    #[error("No supported recording format on this device")]
    UnsupportedFormat,

    #[error("A recording is already in progress")]
    AlreadyRecording,

    #[error("Recording produced no data")]
    EmptyArtifact,

    #[error("Encoder failed: {0}")]
    EncoderFailed(String),

    #[error(transparent)]
    Capture(#[from] CaptureError),
}

pub type RecordingResult<T> = Result<T, RecordingError>;

/// Current state of the recorder
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordingState {
    /// No recording in progress
    #[default]
    Idle,
    /// Chunks are being collected
    Recording,
    /// Stop requested, waiting for the encoder to flush
    Finalizing,
}

/// An output format the recorder can ask the encoder for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordingFormat {
    /// MIME type handed to the encoder and attached to the artifact
    pub mime_type: &'static str,

    /// File extension of the finished artifact
    pub extension: &'static str,
}

/// Formats in preference order; the first one the encoder supports wins.
pub const FORMAT_PREFERENCE: [RecordingFormat; 4] = [
    RecordingFormat {
        mime_type: "video/mp4",
        extension: "mp4",
    },
    RecordingFormat {
        mime_type: "video/webm;codecs=h264",
        extension: "webm",
    },
    RecordingFormat {
        mime_type: "video/webm;codecs=vp9",
        extension: "webm",
    },
    RecordingFormat {
        mime_type: "video/webm",
        extension: "webm",
    },
];

/// Bookkeeping for one recording attempt
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordingSession {
    /// Format negotiated for this attempt
    pub format: RecordingFormat,

    /// When recording started
    pub started_at: DateTime<Utc>,

    /// When the encoder acknowledged the stop
    pub finished_at: Option<DateTime<Utc>>,

    /// Non-empty chunks received so far
    pub chunk_count: usize,

    /// Bytes received so far
    pub byte_count: usize,
}

impl RecordingSession {
    /// Create a new session starting now
    pub fn new(format: RecordingFormat) -> Self {
        Self {
            format,
            started_at: Utc::now(),
            finished_at: None,
            chunk_count: 0,
            byte_count: 0,
        }
    }

    /// Account for one received chunk
    pub fn record_chunk(&mut self, len: usize) {
        self.chunk_count += 1;
        self.byte_count += len;
    }

    /// End the session
    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    /// Duration in milliseconds, up to now if still running
    pub fn duration_ms(&self) -> i64 {
        let end = self.finished_at.unwrap_or_else(Utc::now);
        (end - self.started_at).num_milliseconds()
    }

    /// Display name of the finished artifact, e.g. `recording_1700000000000.webm`
    pub fn artifact_name(&self) -> String {
        format!(
            "recording_{}.{}",
            self.started_at.timestamp_millis(),
            self.format.extension
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preference_order() {
        let types: Vec<&str> = FORMAT_PREFERENCE.iter().map(|f| f.mime_type).collect();
        assert_eq!(
            types,
            vec![
                "video/mp4",
                "video/webm;codecs=h264",
                "video/webm;codecs=vp9",
                "video/webm"
            ]
        );
    }

    #[test]
    fn test_session_accounting() {
        let mut session = RecordingSession::new(FORMAT_PREFERENCE[0]);
        session.record_chunk(10);
        session.record_chunk(5);
        session.finish();

        assert_eq!(session.chunk_count, 2);
        assert_eq!(session.byte_count, 15);
        assert!(session.duration_ms() >= 0);
        assert!(session.artifact_name().starts_with("recording_"));
        assert!(session.artifact_name().ends_with(".mp4"));
    }
}
