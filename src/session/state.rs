//! Observable session state
//!
//! Snapshots and events handed to the presentation layer. Nothing here can
//! mutate the session.

use crate::acquisition::{AcquisitionPhase, InputMode};
use crate::analysis::AnalysisResult;
use crate::artifact::ArtifactSummary;
use crate::recorder::RecordingState;
use crate::sport::Sport;
use crate::utils::error::ErrorNotice;
use serde::Serialize;

/// Read-only snapshot of a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    pub sport: Option<Sport>,
    pub phase: AcquisitionPhase,
    pub mode: InputMode,
    pub artifact: Option<ArtifactSummary>,
    pub recording_state: RecordingState,
    pub camera_open: bool,
    pub analysis: Option<AnalysisResult>,
    pub error: Option<ErrorNotice>,
    pub submission_in_flight: bool,
}

impl SessionState {
    /// Whether `submit_for_analysis` would be accepted right now
    pub fn can_submit(&self) -> bool {
        self.sport.is_some() && self.phase.is_ready() && !self.submission_in_flight
    }
}

/// Events emitted as the session changes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// Sport picked or changed
    SportChosen(Sport),
    /// Input mode switched
    ModeChanged(InputMode),
    /// Camera recording started
    RecordingStarted,
    /// A complete artifact is ready
    ArtifactReady(ArtifactSummary),
    /// Submission sent to the analysis service
    SubmissionStarted,
    /// Analysis finished (score may be absent)
    AnalysisCompleted { score: Option<u8> },
    /// Error occurred
    Error(ErrorNotice),
    /// Session reset
    Reset,
}
