//! Error types and handling
//!
//! The session-level error taxonomy. Component errors from capture, recording
//! and submission all fold into [`SessionError`], which is what the
//! controller records as the single current error.

use crate::analysis::submitter::SubmitError;
use crate::capture::traits::CaptureError;
use crate::recorder::state::RecordingError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Session-wide error type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("Unable to access camera. Please check permissions. ({0})")]
    DeviceUnavailable(String),

    #[error("Recording is not supported on this device. Please upload a video instead.")]
    UnsupportedFormat,

    #[error("Please upload a valid video file (MP4, MOV, AVI, MKV, or WEBM): {0}")]
    InvalidFileType(String),

    #[error("An analysis is already running. Please wait.")]
    AlreadyInFlight,

    #[error("Network error: {0}")]
    Network(String),

    #[error("{message}")]
    Service { status: u16, message: String },

    #[error("Invalid analysis request: {0}")]
    Validation(String),

    #[error("The video is empty. Please record or choose it again.")]
    EmptyArtifact,

    #[error("Recording failed: {0}")]
    Recording(String),

    #[error("{0}")]
    InvalidState(String),
}

impl SessionError {
    /// Stable identifier for the error kind
    pub fn code(&self) -> &'static str {
        match self {
            SessionError::DeviceUnavailable(_) => "DEVICE_UNAVAILABLE",
            SessionError::UnsupportedFormat => "UNSUPPORTED_FORMAT",
            SessionError::InvalidFileType(_) => "INVALID_FILE_TYPE",
            SessionError::AlreadyInFlight => "ALREADY_IN_FLIGHT",
            SessionError::Network(_) => "NETWORK_ERROR",
            SessionError::Service { .. } => "SERVICE_ERROR",
            SessionError::Validation(_) => "VALIDATION_ERROR",
            SessionError::EmptyArtifact => "EMPTY_ARTIFACT",
            SessionError::Recording(_) => "RECORDING_ERROR",
            SessionError::InvalidState(_) => "INVALID_STATE",
        }
    }
}

impl From<CaptureError> for SessionError {
    fn from(error: CaptureError) -> Self {
        match error {
            CaptureError::DeviceUnavailable(reason) => SessionError::DeviceUnavailable(reason),
            CaptureError::StreamClosed => {
                SessionError::DeviceUnavailable("camera stream is not open".to_string())
            }
            CaptureError::Encoder(reason) => SessionError::Recording(reason),
        }
    }
}

impl From<RecordingError> for SessionError {
    fn from(error: RecordingError) -> Self {
        match error {
            RecordingError::UnsupportedFormat => SessionError::UnsupportedFormat,
            RecordingError::EmptyArtifact => SessionError::EmptyArtifact,
            RecordingError::AlreadyRecording => {
                SessionError::InvalidState("A recording is already in progress".to_string())
            }
            RecordingError::Capture(inner) => inner.into(),
            RecordingError::EncoderFailed(reason) => SessionError::Recording(reason),
        }
    }
}

impl From<SubmitError> for SessionError {
    fn from(error: SubmitError) -> Self {
        match error {
            SubmitError::Network(reason) => SessionError::Network(reason),
            SubmitError::Service { status, message } => SessionError::Service { status, message },
            SubmitError::Validation(reason) => SessionError::Validation(reason),
        }
    }
}

/// User-facing error notice
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorNotice {
    pub code: String,
    pub message: String,
}

impl From<&SessionError> for ErrorNotice {
    fn from(error: &SessionError) -> Self {
        ErrorNotice {
            code: error.code().to_string(),
            message: error.to_string(),
        }
    }
}

/// Result type alias using SessionError
pub type SessionResult<T> = Result<T, SessionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_error_message_is_detail() {
        let error = SessionError::Service {
            status: 400,
            message: "Unsupported sport".to_string(),
        };
        let notice = ErrorNotice::from(&error);
        assert_eq!(notice.code, "SERVICE_ERROR");
        assert_eq!(notice.message, "Unsupported sport");
    }

    #[test]
    fn test_recording_errors_map_to_taxonomy() {
        assert_eq!(
            SessionError::from(RecordingError::UnsupportedFormat),
            SessionError::UnsupportedFormat
        );
        assert_eq!(
            SessionError::from(RecordingError::EmptyArtifact),
            SessionError::EmptyArtifact
        );
        assert_eq!(
            SessionError::from(RecordingError::Capture(CaptureError::DeviceUnavailable(
                "busy".to_string()
            ))),
            SessionError::DeviceUnavailable("busy".to_string())
        );
    }
}
