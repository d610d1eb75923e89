//! Headless capture backend
//!
//! Used when the process has no camera, e.g. the command-line front end.
//! Opening always fails and no recording format is offered, so only Upload
//! mode is usable.

use super::traits::{
    CaptureDevice, CaptureError, CaptureResult, ChunkReceiver, MediaEncoder, StreamHandle,
};
use async_trait::async_trait;

/// Camera that is never available
#[derive(Debug, Default)]
pub struct HeadlessCamera;

/// Encoder that supports no format
#[derive(Debug, Default)]
pub struct HeadlessEncoder;

#[async_trait]
impl CaptureDevice for HeadlessCamera {
    async fn open(&mut self) -> CaptureResult<StreamHandle> {
        tracing::warn!("Camera requested but this host has no capture backend");
        Err(CaptureError::DeviceUnavailable(
            "no camera backend on this host".to_string(),
        ))
    }

    fn close(&mut self, _handle: Option<StreamHandle>) {}

    fn is_open(&self) -> bool {
        false
    }
}

impl MediaEncoder for HeadlessEncoder {
    fn supports(&self, _mime_type: &str) -> bool {
        false
    }

    fn begin(&mut self, _stream: &StreamHandle, _mime_type: &str) -> CaptureResult<ChunkReceiver> {
        Err(CaptureError::Encoder("no encoder on this host".to_string()))
    }

    fn request_stop(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_headless_camera_never_opens() {
        let mut camera = HeadlessCamera;
        assert!(matches!(
            camera.open().await,
            Err(CaptureError::DeviceUnavailable(_))
        ));
        camera.close(None);
        assert!(!camera.is_open());
        assert!(!HeadlessEncoder.supports("video/webm"));
    }
}
