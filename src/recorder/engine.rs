//! Chunk recorder
//!
//! Wraps a live stream in a [`MediaEncoder`] and concatenates the chunks it
//! delivers, in arrival order, into a single [`VideoArtifact`].

use super::state::{
    RecordingError, RecordingFormat, RecordingResult, RecordingSession, RecordingState,
    FORMAT_PREFERENCE,
};
use crate::artifact::{ArtifactSource, VideoArtifact};
use crate::capture::traits::{ChunkReceiver, EncoderEvent, MediaEncoder, StreamHandle};
use tokio::sync::mpsc::error::TryRecvError;

/// One in-progress recording attempt
struct ActiveRecording {
    session: RecordingSession,
    events: ChunkReceiver,
    chunks: Vec<Vec<u8>>,
    /// Terminal event seen before `stop` was called
    ended: Option<RecordingResult<()>>,
}

impl ActiveRecording {
    /// Handle one encoder event; returns the outcome once the attempt ends
    fn accept(&mut self, event: EncoderEvent) -> Option<RecordingResult<()>> {
        match event {
            EncoderEvent::Chunk(data) => {
                if !data.is_empty() {
                    self.session.record_chunk(data.len());
                    self.chunks.push(data);
                }
                None
            }
            EncoderEvent::Stopped => {
                self.session.finish();
                Some(Ok(()))
            }
            EncoderEvent::Failed(reason) => Some(Err(RecordingError::EncoderFailed(reason))),
        }
    }
}

/// Records a camera stream through a host encoder
pub struct Recorder {
    encoder: Box<dyn MediaEncoder>,
    state: RecordingState,
    active: Option<ActiveRecording>,
}

impl Recorder {
    /// Create a recorder on top of an encoder
    pub fn new(encoder: Box<dyn MediaEncoder>) -> Self {
        Self {
            encoder,
            state: RecordingState::Idle,
            active: None,
        }
    }

    /// Get the current recording state
    pub fn state(&self) -> RecordingState {
        self.state
    }

    /// Bookkeeping of the attempt in progress
    pub fn session(&self) -> Option<&RecordingSession> {
        self.active.as_ref().map(|a| &a.session)
    }

    /// Pick the first preferred format the encoder supports
    pub fn negotiate_format(&self) -> RecordingResult<RecordingFormat> {
        FORMAT_PREFERENCE
            .iter()
            .copied()
            .find(|format| self.encoder.supports(format.mime_type))
            .ok_or(RecordingError::UnsupportedFormat)
    }

    /// Start recording `stream`
    pub fn start(&mut self, stream: &StreamHandle) -> RecordingResult<RecordingFormat> {
        match self.state {
            RecordingState::Idle => {}
            RecordingState::Recording => return Err(RecordingError::AlreadyRecording),
            RecordingState::Finalizing => {
                tracing::warn!("Abandoning a recording whose stop was interrupted");
                self.discard();
            }
        }

        let format = self.negotiate_format()?;
        let events = self.encoder.begin(stream, format.mime_type)?;

        self.active = Some(ActiveRecording {
            session: RecordingSession::new(format),
            events,
            chunks: Vec::new(),
            ended: None,
        });
        self.state = RecordingState::Recording;

        tracing::info!(
            "Recording started on {} as {}",
            stream.device(),
            format.mime_type
        );
        Ok(format)
    }

    /// Take every chunk the encoder has already delivered without waiting.
    ///
    /// Returns the number of bytes collected so far.
    pub fn poll(&mut self) -> usize {
        let Some(active) = self.active.as_mut() else {
            return 0;
        };

        while active.ended.is_none() {
            match active.events.try_recv() {
                Ok(event) => active.ended = active.accept(event),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    active.ended = Some(Err(RecordingError::EncoderFailed(
                        "encoder went away while recording".to_string(),
                    )));
                }
            }
        }
        active.session.byte_count
    }

    /// Stop recording and wait for the encoder to flush.
    ///
    /// Returns `Ok(None)` when nothing is being recorded. The attempt stays
    /// owned by the recorder until the flush completes, so if this future is
    /// dropped the recorder is left `Finalizing` and a later `stop` resumes
    /// the wait.
    pub async fn stop(&mut self) -> RecordingResult<Option<VideoArtifact>> {
        match self.state {
            RecordingState::Idle => {
                tracing::debug!("Stop requested while idle; nothing to do");
                return Ok(None);
            }
            RecordingState::Recording => {
                self.state = RecordingState::Finalizing;
                self.encoder.request_stop();
            }
            RecordingState::Finalizing => tracing::debug!("Resuming interrupted stop"),
        }

        let outcome = match self.active.as_mut() {
            Some(active) => match active.ended.take() {
                Some(outcome) => outcome,
                None => Self::drain(active).await,
            },
            None => Ok(()),
        };

        self.state = RecordingState::Idle;
        let Some(active) = self.active.take() else {
            return Ok(None);
        };
        // Anything still queued after the stop acknowledgement is dropped here
        drop(active.events);

        if let Err(e) = outcome {
            tracing::warn!("Recording failed while finalizing: {}", e);
            return Err(e);
        }

        let bytes = active.chunks.concat();
        if bytes.is_empty() {
            tracing::warn!("Recording finished without any data");
            return Err(RecordingError::EmptyArtifact);
        }

        let artifact = VideoArtifact::new(
            active.session.artifact_name(),
            active.session.format.mime_type,
            ArtifactSource::Recording,
            bytes,
        );
        tracing::info!(
            "Recording stopped: {} chunks, {} bytes in {}ms",
            active.session.chunk_count,
            artifact.len(),
            active.session.duration_ms()
        );
        Ok(Some(artifact))
    }

    /// Abandon the current attempt without producing an artifact
    pub fn discard(&mut self) {
        if let Some(active) = self.active.take() {
            self.encoder.request_stop();
            tracing::info!(
                "Discarded recording after {} chunks",
                active.session.chunk_count
            );
        }
        self.state = RecordingState::Idle;
    }

    async fn drain(active: &mut ActiveRecording) -> RecordingResult<()> {
        while let Some(event) = active.events.recv().await {
            if let Some(outcome) = active.accept(event) {
                return outcome;
            }
        }
        Err(RecordingError::EncoderFailed(
            "encoder closed before finishing".to_string(),
        ))
    }
}
