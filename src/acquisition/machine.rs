//! Acquisition state machine
//!
//! Owns the camera stream and the recorder. Every transition that leaves
//! Record mode stops the encoder and drops the partial recording before the
//! stream is released, so no stream or half-written artifact outlives it.

use super::phase::{AcquisitionPhase, InputMode};
use crate::artifact::{SelectedFile, VideoArtifact};
use crate::capture::traits::{CaptureDevice, MediaEncoder, StreamHandle};
use crate::recorder::{Recorder, RecordingError, RecordingFormat, RecordingState};
use crate::utils::error::{SessionError, SessionResult};

/// Upload/record state machine
pub struct InputAcquisition {
    camera: Box<dyn CaptureDevice>,
    stream: Option<StreamHandle>,
    recorder: Recorder,
    phase: AcquisitionPhase,
    mode: InputMode,
    artifact: Option<VideoArtifact>,
}

impl InputAcquisition {
    /// Create a machine on top of a camera and its encoder
    pub fn new(camera: Box<dyn CaptureDevice>, encoder: Box<dyn MediaEncoder>) -> Self {
        Self {
            camera,
            stream: None,
            recorder: Recorder::new(encoder),
            phase: AcquisitionPhase::NoSport,
            mode: InputMode::default(),
            artifact: None,
        }
    }

    pub fn phase(&self) -> AcquisitionPhase {
        self.phase
    }

    /// Current (or last chosen) input mode
    pub fn mode(&self) -> InputMode {
        self.mode
    }

    /// The ready artifact, if any
    pub fn artifact(&self) -> Option<&VideoArtifact> {
        self.artifact.as_ref()
    }

    pub fn recording_state(&self) -> RecordingState {
        self.recorder.state()
    }

    /// Whether this machine holds an open camera stream
    pub fn camera_open(&self) -> bool {
        self.stream.is_some()
    }

    /// A sport was picked or changed; everything after it starts over
    pub fn select_sport(&mut self) {
        self.release_camera();
        self.artifact = None;
        self.phase = AcquisitionPhase::SportChosen;
    }

    /// Switch to `mode`, dropping any artifact or recording from before.
    ///
    /// Record mode opens the camera; if that fails the phase stays at
    /// `ModeChosen(Record)` and the user may retry or switch to Upload.
    pub async fn choose_mode(&mut self, mode: InputMode) -> SessionResult<()> {
        if self.phase == AcquisitionPhase::NoSport {
            return Err(SessionError::InvalidState(
                "Please select a sport first".to_string(),
            ));
        }

        self.release_camera();
        self.artifact = None;
        self.mode = mode;

        match mode {
            InputMode::Upload => {
                self.phase = AcquisitionPhase::AcquiringInput(InputMode::Upload);
                tracing::info!("Upload mode: waiting for a file");
                Ok(())
            }
            InputMode::Record => {
                self.phase = AcquisitionPhase::ModeChosen(InputMode::Record);
                let stream = self.camera.open().await.map_err(|e| {
                    tracing::warn!("Failed to open camera: {}", e);
                    SessionError::from(e)
                })?;

                tracing::info!("Camera opened ({})", stream.device());
                self.stream = Some(stream);
                self.phase = AcquisitionPhase::AcquiringInput(InputMode::Record);
                Ok(())
            }
        }
    }

    /// Accept a file picked in Upload mode
    pub fn supply_file(&mut self, file: SelectedFile) -> SessionResult<()> {
        match self.phase {
            AcquisitionPhase::AcquiringInput(InputMode::Upload)
            | AcquisitionPhase::ArtifactReady(InputMode::Upload) => {}
            _ => {
                return Err(SessionError::InvalidState(
                    "Switch to upload mode to choose a file".to_string(),
                ))
            }
        }

        // A rejected file also drops whatever was selected before
        self.artifact = None;
        self.phase = AcquisitionPhase::AcquiringInput(InputMode::Upload);

        if !file.is_accepted() {
            tracing::warn!("Rejected '{}' (type '{}')", file.name, file.mime_type);
            return Err(SessionError::InvalidFileType(file.name));
        }
        if file.bytes.is_empty() {
            tracing::warn!("Rejected '{}': file is empty", file.name);
            return Err(SessionError::EmptyArtifact);
        }

        let artifact = file.into_artifact();
        tracing::info!(
            "File ready: {} ({} bytes, {})",
            artifact.name(),
            artifact.len(),
            artifact.mime_type()
        );
        self.artifact = Some(artifact);
        self.phase = AcquisitionPhase::ArtifactReady(InputMode::Upload);
        Ok(())
    }

    /// Start recording from the open camera
    pub fn start_recording(&mut self) -> SessionResult<RecordingFormat> {
        if self.phase != AcquisitionPhase::AcquiringInput(InputMode::Record) {
            return Err(SessionError::InvalidState(
                "Open the camera in record mode first".to_string(),
            ));
        }
        let Some(stream) = self.stream.as_ref() else {
            self.phase = AcquisitionPhase::ModeChosen(InputMode::Record);
            return Err(SessionError::DeviceUnavailable(
                "camera stream is not open".to_string(),
            ));
        };

        match self.recorder.start(stream) {
            Ok(format) => Ok(format),
            Err(RecordingError::UnsupportedFormat) => {
                tracing::warn!("No recording format available; releasing camera");
                self.camera.close(self.stream.take());
                self.phase = AcquisitionPhase::ModeChosen(InputMode::Record);
                Err(SessionError::UnsupportedFormat)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Collect chunks delivered so far; returns the bytes recorded
    pub fn poll_recording(&mut self) -> usize {
        self.recorder.poll()
    }

    /// Stop recording and wait for the artifact.
    ///
    /// Returns `Ok(false)` when nothing was being recorded. An interrupted
    /// stop is picked up again. On success the camera is released; on
    /// failure it stays open for another take.
    pub async fn stop_recording(&mut self) -> SessionResult<bool> {
        if self.recorder.state() == RecordingState::Idle {
            return Ok(false);
        }

        match self.recorder.stop().await {
            Ok(Some(artifact)) => {
                self.artifact = Some(artifact);
                self.phase = AcquisitionPhase::ArtifactReady(InputMode::Record);
                self.camera.close(self.stream.take());
                tracing::info!("Recording ready; camera released");
                Ok(true)
            }
            Ok(None) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Drop the artifact and release the camera, keeping the sport
    pub fn reset(&mut self) {
        self.release_camera();
        self.artifact = None;
        if self.phase != AcquisitionPhase::NoSport {
            self.phase = AcquisitionPhase::SportChosen;
        }
    }

    fn release_camera(&mut self) {
        if self.recorder.state() != RecordingState::Idle {
            self.recorder.discard();
        }
        if let Some(stream) = self.stream.take() {
            tracing::debug!("Releasing camera {}", stream.device());
            self.camera.close(Some(stream));
        }
    }
}

impl Drop for InputAcquisition {
    fn drop(&mut self) {
        self.release_camera();
    }
}
