//! Scripted capture devices
//!
//! A deterministic camera/encoder pair with no hardware behind it. The
//! encoder replays a fixed list of chunks, and a shared [`DeviceProbe`] lets
//! callers inspect what the session did to the device.

use super::traits::{
    CaptureDevice, CaptureError, CaptureResult, ChunkReceiver, EncoderEvent, MediaEncoder,
    StreamHandle,
};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::mpsc;
use uuid::Uuid;

/// What the scripted devices should do
#[derive(Debug, Clone)]
pub struct DeviceScript {
    /// Device label reported on stream handles
    pub device: String,

    /// Fail every `open` with this reason
    pub open_failure: Option<String>,

    /// MIME types the encoder accepts
    pub supported_types: Vec<String>,

    /// Chunks emitted as soon as recording begins
    pub chunks: Vec<Vec<u8>>,

    /// Chunk emitted while flushing, before `Stopped`
    pub flush_chunk: Option<Vec<u8>>,

    /// Report this failure instead of `Stopped` when asked to stop
    pub stop_failure: Option<String>,
}

impl Default for DeviceScript {
    fn default() -> Self {
        Self {
            device: "scripted-camera".to_string(),
            open_failure: None,
            supported_types: vec!["video/webm".to_string()],
            chunks: vec![b"chunk-0".to_vec(), b"chunk-1".to_vec()],
            flush_chunk: None,
            stop_failure: None,
        }
    }
}

#[derive(Debug, Default)]
struct ProbeState {
    open_stream: Option<Uuid>,
    open_count: usize,
    close_count: usize,
    encoding: bool,
    last_mime_type: Option<String>,
}

/// Read-only view of the scripted devices' shared state
#[derive(Debug, Clone, Default)]
pub struct DeviceProbe {
    state: Arc<Mutex<ProbeState>>,
}

impl DeviceProbe {
    /// Whether the camera indicator is on
    pub fn camera_open(&self) -> bool {
        self.state.lock().open_stream.is_some()
    }

    /// Number of successful opens
    pub fn open_count(&self) -> usize {
        self.state.lock().open_count
    }

    /// Number of `close` calls that released a stream
    pub fn close_count(&self) -> usize {
        self.state.lock().close_count
    }

    pub fn encoding(&self) -> bool {
        self.state.lock().encoding
    }

    /// MIME type of the most recent recording attempt
    pub fn last_mime_type(&self) -> Option<String> {
        self.state.lock().last_mime_type.clone()
    }
}

/// Scripted camera
pub struct ScriptedCamera {
    script: DeviceScript,
    probe: DeviceProbe,
}

/// Scripted encoder
pub struct ScriptedEncoder {
    script: DeviceScript,
    probe: DeviceProbe,
    events: Option<mpsc::UnboundedSender<EncoderEvent>>,
}

/// Build a camera/encoder pair sharing one probe
pub fn scripted_devices(script: DeviceScript) -> (ScriptedCamera, ScriptedEncoder, DeviceProbe) {
    let probe = DeviceProbe::default();
    let camera = ScriptedCamera {
        script: script.clone(),
        probe: probe.clone(),
    };
    let encoder = ScriptedEncoder {
        script,
        probe: probe.clone(),
        events: None,
    };
    (camera, encoder, probe)
}

#[async_trait]
impl CaptureDevice for ScriptedCamera {
    async fn open(&mut self) -> CaptureResult<StreamHandle> {
        if let Some(reason) = &self.script.open_failure {
            return Err(CaptureError::DeviceUnavailable(reason.clone()));
        }

        let handle = StreamHandle::new(self.script.device.clone());
        let mut state = self.probe.state.lock();
        state.open_stream = Some(handle.id());
        state.open_count += 1;
        Ok(handle)
    }

    fn close(&mut self, handle: Option<StreamHandle>) {
        let Some(handle) = handle else {
            return;
        };

        let mut state = self.probe.state.lock();
        if state.open_stream == Some(handle.id()) {
            state.open_stream = None;
            state.close_count += 1;
        }
    }

    fn is_open(&self) -> bool {
        self.probe.camera_open()
    }
}

impl MediaEncoder for ScriptedEncoder {
    fn supports(&self, mime_type: &str) -> bool {
        self.script.supported_types.iter().any(|t| t == mime_type)
    }

    fn begin(&mut self, stream: &StreamHandle, mime_type: &str) -> CaptureResult<ChunkReceiver> {
        {
            let mut state = self.probe.state.lock();
            if state.open_stream != Some(stream.id()) {
                return Err(CaptureError::StreamClosed);
            }
            if state.encoding {
                return Err(CaptureError::Encoder("encoder is busy".to_string()));
            }
            state.encoding = true;
            state.last_mime_type = Some(mime_type.to_string());
        }

        let (tx, rx) = mpsc::unbounded_channel();
        for chunk in &self.script.chunks {
            let _ = tx.send(EncoderEvent::Chunk(chunk.clone()));
        }
        self.events = Some(tx);
        Ok(rx)
    }

    fn request_stop(&mut self) {
        let Some(tx) = self.events.take() else {
            return;
        };

        if let Some(chunk) = &self.script.flush_chunk {
            let _ = tx.send(EncoderEvent::Chunk(chunk.clone()));
        }
        let last = match &self.script.stop_failure {
            Some(reason) => EncoderEvent::Failed(reason.clone()),
            None => EncoderEvent::Stopped,
        };
        let _ = tx.send(last);
        self.probe.state.lock().encoding = false;
    }
}
