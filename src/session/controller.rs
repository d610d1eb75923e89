//! Session controller
//!
//! Top-level orchestrator: sport selection, mode selection, acquisition,
//! submission and score extraction. It is the only owner of session state;
//! collaborators get data by reference and hand results back.

use super::state::{SessionEvent, SessionState};
use crate::acquisition::{InputAcquisition, InputMode};
use crate::analysis::{AnalysisResult, AnalysisSubmitter, SubmitError};
use crate::artifact::{SelectedFile, VideoArtifact};
use crate::capture::headless::{HeadlessCamera, HeadlessEncoder};
use crate::capture::traits::{CaptureDevice, MediaEncoder};
use crate::recorder::RecordingFormat;
use crate::sport::Sport;
use crate::utils::error::{ErrorNotice, SessionError, SessionResult};
use std::sync::Arc;
use tokio::sync::broadcast;

/// Collaborators a session runs against
pub struct SessionContext {
    pub camera: Box<dyn CaptureDevice>,
    pub encoder: Box<dyn MediaEncoder>,
    pub submitter: Arc<dyn AnalysisSubmitter>,
}

impl SessionContext {
    pub fn new(
        camera: Box<dyn CaptureDevice>,
        encoder: Box<dyn MediaEncoder>,
        submitter: Arc<dyn AnalysisSubmitter>,
    ) -> Self {
        Self {
            camera,
            encoder,
            submitter,
        }
    }

    /// Context without a camera; only Upload mode will work
    pub fn headless(submitter: Arc<dyn AnalysisSubmitter>) -> Self {
        Self::new(Box::new(HeadlessCamera), Box::new(HeadlessEncoder), submitter)
    }
}

/// A submission that has been accepted but not yet sent.
///
/// Owns everything it needs, so the controller is free while the request
/// is on the network.
pub struct PendingSubmission {
    ticket: u64,
    sport: Sport,
    artifact: VideoArtifact,
    submitter: Arc<dyn AnalysisSubmitter>,
}

impl PendingSubmission {
    pub fn ticket(&self) -> u64 {
        self.ticket
    }

    /// Perform the network exchange
    pub async fn run(self) -> SubmissionOutcome {
        let result = self.submitter.submit(self.sport, &self.artifact).await;
        SubmissionOutcome {
            ticket: self.ticket,
            sport: self.sport,
            result,
        }
    }
}

/// Result of a [`PendingSubmission`], to be handed back to the controller
#[derive(Debug)]
pub struct SubmissionOutcome {
    ticket: u64,
    sport: Sport,
    result: Result<String, SubmitError>,
}

/// Orchestrates one user's capture-and-analyze session
pub struct SessionController {
    sport: Option<Sport>,
    acquisition: InputAcquisition,
    submitter: Arc<dyn AnalysisSubmitter>,
    analysis: Option<AnalysisResult>,
    error: Option<SessionError>,
    in_flight: Option<u64>,
    next_ticket: u64,
    event_tx: broadcast::Sender<SessionEvent>,
}

impl SessionController {
    /// Create a new session controller
    pub fn new(context: SessionContext) -> Self {
        let (event_tx, _) = broadcast::channel(100);
        Self {
            sport: None,
            acquisition: InputAcquisition::new(context.camera, context.encoder),
            submitter: context.submitter,
            analysis: None,
            error: None,
            in_flight: None,
            next_ticket: 0,
            event_tx,
        }
    }

    /// Subscribe to session events
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.event_tx.subscribe()
    }

    /// Snapshot of the current state
    pub fn state(&self) -> SessionState {
        SessionState {
            sport: self.sport,
            phase: self.acquisition.phase(),
            mode: self.acquisition.mode(),
            artifact: self.acquisition.artifact().map(VideoArtifact::summary),
            recording_state: self.acquisition.recording_state(),
            camera_open: self.acquisition.camera_open(),
            analysis: self.analysis.clone(),
            error: self.error.as_ref().map(ErrorNotice::from),
            submission_in_flight: self.in_flight.is_some(),
        }
    }

    /// The ready artifact, if any
    pub fn artifact(&self) -> Option<&VideoArtifact> {
        self.acquisition.artifact()
    }

    /// Pick or change the sport. Anything acquired for a previous sport is
    /// discarded.
    pub fn choose_sport(&mut self, sport: Sport) {
        tracing::info!("Sport selected: {}", sport);
        self.sport = Some(sport);
        self.error = None;
        self.clear_results();
        self.acquisition.select_sport();
        self.emit(SessionEvent::SportChosen(sport));
    }

    /// Switch between Upload and Record
    pub async fn choose_mode(&mut self, mode: InputMode) -> SessionResult<()> {
        self.error = None;
        self.clear_results();

        self.acquisition
            .choose_mode(mode)
            .await
            .map_err(|e| self.fail(e))?;
        self.emit(SessionEvent::ModeChanged(mode));
        Ok(())
    }

    /// Offer a file in Upload mode. The artifact cannot be replaced while a
    /// submission of it is in flight.
    pub fn supply_file(&mut self, file: SelectedFile) -> SessionResult<()> {
        if self.in_flight.is_some() {
            return Err(self.fail(SessionError::AlreadyInFlight));
        }
        self.error = None;
        self.analysis = None;

        self.acquisition.supply_file(file).map_err(|e| self.fail(e))?;
        self.emit_artifact_ready();
        Ok(())
    }

    /// Begin recording from the camera
    pub fn start_recording(&mut self) -> SessionResult<RecordingFormat> {
        self.error = None;

        let format = self.acquisition.start_recording().map_err(|e| self.fail(e))?;
        self.emit(SessionEvent::RecordingStarted);
        Ok(format)
    }

    /// Collect recorded chunks without stopping; returns bytes recorded so far
    pub fn poll_recording(&mut self) -> usize {
        self.acquisition.poll_recording()
    }

    /// Stop recording and wait for the artifact. Returns whether an artifact
    /// became ready; stopping while not recording does nothing.
    pub async fn stop_recording(&mut self) -> SessionResult<bool> {
        self.error = None;

        let ready = self
            .acquisition
            .stop_recording()
            .await
            .map_err(|e| self.fail(e))?;
        if ready {
            self.emit_artifact_ready();
        }
        Ok(ready)
    }

    /// Accept a submission request.
    ///
    /// Only one submission may be in flight; a second request is rejected
    /// with [`SessionError::AlreadyInFlight`].
    pub fn begin_submission(&mut self) -> SessionResult<PendingSubmission> {
        if self.in_flight.is_some() {
            return Err(self.fail(SessionError::AlreadyInFlight));
        }

        let (Some(sport), Some(artifact)) = (self.sport, self.acquisition.artifact().cloned())
        else {
            return Err(self.fail(SessionError::InvalidState(
                "Please select a sport and upload a video".to_string(),
            )));
        };
        if !self.acquisition.phase().is_ready() {
            return Err(self.fail(SessionError::InvalidState(
                "The video is not ready yet".to_string(),
            )));
        }

        self.error = None;
        self.analysis = None;
        self.next_ticket += 1;
        let ticket = self.next_ticket;
        self.in_flight = Some(ticket);

        tracing::info!(
            "Submitting {} for {} analysis (ticket {})",
            artifact.name(),
            sport,
            ticket
        );
        self.emit(SessionEvent::SubmissionStarted);

        Ok(PendingSubmission {
            ticket,
            sport,
            artifact,
            submitter: Arc::clone(&self.submitter),
        })
    }

    /// Apply the outcome of a submission.
    ///
    /// Returns `Ok(None)` if the submission was superseded by a reset or a
    /// mode/sport change while it was in flight. On failure the artifact is
    /// kept so the user can retry.
    pub fn complete_submission(
        &mut self,
        outcome: SubmissionOutcome,
    ) -> SessionResult<Option<AnalysisResult>> {
        if self.in_flight != Some(outcome.ticket) {
            tracing::debug!("Ignoring outcome of superseded submission {}", outcome.ticket);
            return Ok(None);
        }
        self.in_flight = None;

        match outcome.result {
            Ok(report) => {
                let result = AnalysisResult::from_report(outcome.sport, report);
                match result.score {
                    Some(score) => tracing::info!("Analysis complete: {}% similarity", score),
                    None => tracing::info!("Analysis complete: no similarity score in report"),
                }
                self.error = None;
                self.analysis = Some(result.clone());
                self.emit(SessionEvent::AnalysisCompleted {
                    score: result.score,
                });
                Ok(Some(result))
            }
            Err(e) => Err(self.fail(e.into())),
        }
    }

    /// Submit the ready artifact and wait for the analysis
    pub async fn submit_for_analysis(&mut self) -> SessionResult<AnalysisResult> {
        let pending = self.begin_submission()?;
        let outcome = pending.run().await;

        match self.complete_submission(outcome)? {
            Some(result) => Ok(result),
            None => Err(self.fail(SessionError::InvalidState(
                "Submission was cancelled".to_string(),
            ))),
        }
    }

    /// Start over with the same sport: artifact, analysis and error are
    /// cleared and the camera is released.
    pub fn reset(&mut self) {
        tracing::info!("Resetting session");
        self.error = None;
        self.clear_results();
        self.acquisition.reset();
        self.emit(SessionEvent::Reset);
    }

    fn clear_results(&mut self) {
        self.analysis = None;
        if let Some(ticket) = self.in_flight.take() {
            tracing::debug!("Abandoning in-flight submission {}", ticket);
        }
    }

    fn emit_artifact_ready(&self) {
        if let Some(artifact) = self.acquisition.artifact() {
            self.emit(SessionEvent::ArtifactReady(artifact.summary()));
        }
    }

    fn fail(&mut self, error: SessionError) -> SessionError {
        tracing::warn!("Session error [{}]: {}", error.code(), error);
        let notice = ErrorNotice::from(&error);
        self.error = Some(error.clone());
        self.emit(SessionEvent::Error(notice));
        error
    }

    fn emit(&self, event: SessionEvent) {
        let _ = self.event_tx.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::acquisition::AcquisitionPhase;
    use crate::capture::scripted::{scripted_devices, DeviceProbe, DeviceScript};
    use crate::recorder::RecordingState;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FakeSubmitter {
        calls: AtomicUsize,
        reply: Mutex<Result<String, SubmitError>>,
    }

    impl FakeSubmitter {
        fn replying(reply: Result<String, SubmitError>) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                reply: Mutex::new(reply),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl AnalysisSubmitter for FakeSubmitter {
        async fn submit(
            &self,
            _sport: Sport,
            _artifact: &VideoArtifact,
        ) -> Result<String, SubmitError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.reply.lock().clone()
        }
    }

    fn controller(submitter: Arc<FakeSubmitter>) -> (SessionController, DeviceProbe) {
        let (camera, encoder, probe) = scripted_devices(DeviceScript::default());
        let context = SessionContext::new(Box::new(camera), Box::new(encoder), submitter);
        (SessionController::new(context), probe)
    }

    async fn ready_upload(session: &mut SessionController) {
        session.choose_sport(Sport::Basketball);
        session.choose_mode(InputMode::Upload).await.unwrap();
        session
            .supply_file(SelectedFile::new("shot.mp4", "video/mp4", b"bytes".to_vec()))
            .unwrap();
    }

    #[tokio::test]
    async fn test_initial_state() {
        let (session, _probe) = controller(FakeSubmitter::replying(Ok(String::new())));
        let state = session.state();

        assert_eq!(state.sport, None);
        assert_eq!(state.phase, AcquisitionPhase::NoSport);
        assert_eq!(state.mode, InputMode::Upload);
        assert_eq!(state.recording_state, RecordingState::Idle);
        assert!(!state.can_submit());
    }

    #[tokio::test]
    async fn test_submit_runs_extractor_and_publishes_result() {
        let submitter = FakeSubmitter::replying(Ok("Match: 91% great form".to_string()));
        let (mut session, _probe) = controller(submitter.clone());
        ready_upload(&mut session).await;
        assert!(session.state().can_submit());

        let result = session.submit_for_analysis().await.unwrap();
        assert_eq!(result.score, Some(91));
        assert_eq!(result.sport, Sport::Basketball);

        let state = session.state();
        assert_eq!(state.analysis.unwrap().report_text, "Match: 91% great form");
        assert!(!state.submission_in_flight);
        assert_eq!(submitter.calls(), 1);
    }

    #[tokio::test]
    async fn test_report_without_score() {
        let submitter = FakeSubmitter::replying(Ok("Keep your elbow in.".to_string()));
        let (mut session, _probe) = controller(submitter);
        ready_upload(&mut session).await;

        let result = session.submit_for_analysis().await.unwrap();
        assert_eq!(result.score, None);
        assert!(session.state().analysis.is_some());
    }

    #[tokio::test]
    async fn test_second_submission_rejected_while_in_flight() {
        let submitter = FakeSubmitter::replying(Ok("Similarity: 50%".to_string()));
        let (mut session, _probe) = controller(submitter.clone());
        ready_upload(&mut session).await;

        let pending = session.begin_submission().unwrap();
        assert!(session.state().submission_in_flight);

        let err = session.begin_submission().err().unwrap();
        assert_eq!(err, SessionError::AlreadyInFlight);
        assert_eq!(
            session.state().error.map(|e| e.code),
            Some("ALREADY_IN_FLIGHT".to_string())
        );

        let outcome = pending.run().await;
        let result = session.complete_submission(outcome).unwrap().unwrap();
        assert_eq!(result.score, Some(50));
        assert_eq!(submitter.calls(), 1);
        assert_eq!(session.state().error, None);
    }

    #[tokio::test]
    async fn test_failure_keeps_artifact_for_retry() {
        let submitter = FakeSubmitter::replying(Err(SubmitError::Service {
            status: 500,
            message: "File processing timeout".to_string(),
        }));
        let (mut session, _probe) = controller(submitter.clone());
        ready_upload(&mut session).await;

        let err = session.submit_for_analysis().await.unwrap_err();
        assert!(matches!(err, SessionError::Service { status: 500, .. }));

        let state = session.state();
        assert!(!state.submission_in_flight);
        assert!(state.artifact.is_some());
        assert!(state.phase.is_ready());
        assert_eq!(state.error.unwrap().message, "File processing timeout");

        *submitter.reply.lock() = Ok("Score: 77%".to_string());
        let result = session.submit_for_analysis().await.unwrap();
        assert_eq!(result.score, Some(77));
        assert_eq!(submitter.calls(), 2);
    }

    #[tokio::test]
    async fn test_network_error_surfaces() {
        let submitter = FakeSubmitter::replying(Err(SubmitError::Network(
            "connection refused".to_string(),
        )));
        let (mut session, _probe) = controller(submitter);
        ready_upload(&mut session).await;

        let err = session.submit_for_analysis().await.unwrap_err();
        assert_eq!(err, SessionError::Network("connection refused".to_string()));
        assert_eq!(session.state().error.unwrap().code, "NETWORK_ERROR");
    }

    #[tokio::test]
    async fn test_submit_requires_ready_artifact() {
        let submitter = FakeSubmitter::replying(Ok(String::new()));
        let (mut session, _probe) = controller(submitter.clone());
        session.choose_sport(Sport::Golf);
        session.choose_mode(InputMode::Upload).await.unwrap();

        assert!(matches!(
            session.submit_for_analysis().await,
            Err(SessionError::InvalidState(_))
        ));
        assert_eq!(submitter.calls(), 0);
    }

    #[tokio::test]
    async fn test_reset_discards_in_flight_outcome() {
        let submitter = FakeSubmitter::replying(Ok("Similarity: 10%".to_string()));
        let (mut session, _probe) = controller(submitter);
        ready_upload(&mut session).await;

        let pending = session.begin_submission().unwrap();
        session.reset();
        assert!(!session.state().submission_in_flight);

        let outcome = pending.run().await;
        assert_eq!(session.complete_submission(outcome).unwrap(), None);
        assert!(session.state().analysis.is_none());
    }

    #[tokio::test]
    async fn test_file_cannot_be_replaced_while_in_flight() {
        let submitter = FakeSubmitter::replying(Ok("Similarity: 50%".to_string()));
        let (mut session, _probe) = controller(submitter);
        ready_upload(&mut session).await;

        let pending = session.begin_submission().unwrap();
        let err = session
            .supply_file(SelectedFile::new("second.mp4", "video/mp4", b"other".to_vec()))
            .unwrap_err();
        assert_eq!(err, SessionError::AlreadyInFlight);
        assert_eq!(session.artifact().unwrap().name(), "shot.mp4");
        assert!(session.state().submission_in_flight);

        let outcome = pending.run().await;
        let result = session.complete_submission(outcome).unwrap().unwrap();
        assert_eq!(result.score, Some(50));

        let state = session.state();
        assert_eq!(state.artifact.unwrap().name, "shot.mp4");
        assert!(state.analysis.is_some());
    }

    #[tokio::test]
    async fn test_rejected_mode_change_is_not_broadcast() {
        let (mut session, _probe) = controller(FakeSubmitter::replying(Ok(String::new())));
        let mut events = session.subscribe();

        assert!(session.choose_mode(InputMode::Upload).await.is_err());
        assert!(matches!(
            events.recv().await.unwrap(),
            SessionEvent::Error(notice) if notice.code == "INVALID_STATE"
        ));
        assert!(events.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_reset_after_analysis() {
        let submitter = FakeSubmitter::replying(Ok("Overall 60%".to_string()));
        let (mut session, probe) = controller(submitter);
        session.choose_sport(Sport::Soccer);
        session.choose_mode(InputMode::Record).await.unwrap();
        session.start_recording().unwrap();
        assert!(session.stop_recording().await.unwrap());
        session.submit_for_analysis().await.unwrap();

        session.reset();

        let state = session.state();
        assert_eq!(state.sport, Some(Sport::Soccer));
        assert_eq!(state.phase, AcquisitionPhase::SportChosen);
        assert!(state.artifact.is_none());
        assert!(state.analysis.is_none());
        assert!(state.error.is_none());
        assert!(!state.camera_open);
        assert!(!probe.camera_open());
    }

    #[tokio::test]
    async fn test_mode_change_clears_analysis() {
        let submitter = FakeSubmitter::replying(Ok("Similarity 80%".to_string()));
        let (mut session, _probe) = controller(submitter);
        ready_upload(&mut session).await;
        session.submit_for_analysis().await.unwrap();

        session.choose_mode(InputMode::Record).await.unwrap();

        let state = session.state();
        assert!(state.analysis.is_none());
        assert!(state.artifact.is_none());
        assert!(state.camera_open);
    }

    #[tokio::test]
    async fn test_errors_are_recorded_and_cleared() {
        let (mut session, _probe) = controller(FakeSubmitter::replying(Ok(String::new())));
        session.choose_sport(Sport::Boxing);
        session.choose_mode(InputMode::Upload).await.unwrap();

        assert!(session
            .supply_file(SelectedFile::new("a.pdf", "application/pdf", vec![1]))
            .is_err());
        assert_eq!(session.state().error.unwrap().code, "INVALID_FILE_TYPE");

        session
            .supply_file(SelectedFile::new("a.avi", "", vec![1]))
            .unwrap();
        assert!(session.state().error.is_none());
    }

    #[tokio::test]
    async fn test_events_are_broadcast() {
        let submitter = FakeSubmitter::replying(Ok("Similarity score: 42%".to_string()));
        let (mut session, _probe) = controller(submitter);
        let mut events = session.subscribe();

        ready_upload(&mut session).await;
        session.submit_for_analysis().await.unwrap();

        assert_eq!(
            events.recv().await.unwrap(),
            SessionEvent::SportChosen(Sport::Basketball)
        );
        assert_eq!(
            events.recv().await.unwrap(),
            SessionEvent::ModeChanged(InputMode::Upload)
        );
        assert!(matches!(
            events.recv().await.unwrap(),
            SessionEvent::ArtifactReady(_)
        ));
        assert_eq!(events.recv().await.unwrap(), SessionEvent::SubmissionStarted);
        assert_eq!(
            events.recv().await.unwrap(),
            SessionEvent::AnalysisCompleted { score: Some(42) }
        );
    }

    #[tokio::test]
    async fn test_headless_context_rejects_record_mode() {
        let submitter = FakeSubmitter::replying(Ok(String::new()));
        let mut session = SessionController::new(SessionContext::headless(submitter));
        session.choose_sport(Sport::Golf);

        let err = session.choose_mode(InputMode::Record).await.unwrap_err();
        assert!(matches!(err, SessionError::DeviceUnavailable(_)));
        assert_eq!(
            session.state().phase,
            AcquisitionPhase::ModeChosen(InputMode::Record)
        );
    }
}
