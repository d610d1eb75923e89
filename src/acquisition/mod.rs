//! Input acquisition
//!
//! The upload/record state machine that ends with exactly one ready
//! [`VideoArtifact`](crate::artifact::VideoArtifact).

pub mod machine;
pub mod phase;

pub use machine::InputAcquisition;
pub use phase::{AcquisitionPhase, InputMode};
