//! Recording system module
//!
//! - `Recorder` turns a live stream into ordered chunks and one artifact
//! - `state` holds the recording state machine and format preferences

pub mod engine;
pub mod state;

pub use engine::Recorder;
pub use state::{
    RecordingError, RecordingFormat, RecordingSession, RecordingState, FORMAT_PREFERENCE,
};
