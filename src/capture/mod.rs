//! Camera capture
//!
//! Traits for the camera and host encoder, a headless backend for hosts
//! without a camera, and scripted devices that replay fixed chunks.

pub mod headless;
pub mod scripted;
pub mod traits;

// Re-export traits
pub use traits::{
    CaptureDevice, CaptureError, CaptureResult, ChunkReceiver, EncoderEvent, MediaEncoder,
    StreamHandle,
};

pub use headless::{HeadlessCamera, HeadlessEncoder};
pub use scripted::{scripted_devices, DeviceProbe, DeviceScript, ScriptedCamera, ScriptedEncoder};
