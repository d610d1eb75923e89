//! Capture trait definitions
//!
//! Platform-agnostic seams for the camera and the host encoder. Real
//! backends and the scripted test devices both implement these.

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;
use uuid::Uuid;

/// Capture-related errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CaptureError {
    #[error("Camera unavailable: {0}")]
    DeviceUnavailable(String),

    #[error("Camera stream is not open")]
    StreamClosed,

    #[error("Encoder error: {0}")]
    Encoder(String),
}

pub type CaptureResult<T> = Result<T, CaptureError>;

/// Token for an open camera stream.
///
/// Not `Clone`. Closing consumes the handle.
#[derive(Debug, PartialEq, Eq)]
pub struct StreamHandle {
    id: Uuid,
    device: String,
}

impl StreamHandle {
    /// Create a handle for a freshly opened stream
    pub fn new(device: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            device: device.into(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Label of the device that produced the stream
    pub fn device(&self) -> &str {
        &self.device
    }
}

/// A live camera
#[async_trait]
pub trait CaptureDevice: Send {
    /// Acquire the camera. Suspends while the host waits on hardware or a
    /// permission grant.
    async fn open(&mut self) -> CaptureResult<StreamHandle>;

    /// Release every track behind `handle`. Safe with `None` or a handle that
    /// is already closed.
    fn close(&mut self, handle: Option<StreamHandle>);

    /// Whether a stream is currently open (camera indicator on)
    fn is_open(&self) -> bool;
}

/// Event delivered by an encoder while it records
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncoderEvent {
    /// Encoded bytes, in arrival order
    Chunk(Vec<u8>),
    /// Flush finished; no more chunks follow
    Stopped,
    /// The encoder gave up
    Failed(String),
}

/// Receiving end of one recording attempt
pub type ChunkReceiver = mpsc::UnboundedReceiver<EncoderEvent>;

/// Host encoding capability that turns a live stream into encoded chunks
pub trait MediaEncoder: Send {
    /// Whether the encoder can produce `mime_type`
    fn supports(&self, mime_type: &str) -> bool;

    /// Begin encoding `stream` as `mime_type`. All chunks of this attempt,
    /// followed by exactly one `Stopped` or `Failed`, arrive on the returned
    /// receiver.
    fn begin(&mut self, stream: &StreamHandle, mime_type: &str) -> CaptureResult<ChunkReceiver>;

    /// Ask the encoder to flush and finish the current attempt
    fn request_stop(&mut self);
}
