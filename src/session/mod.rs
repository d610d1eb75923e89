//! Session orchestration
//!
//! [`SessionController`] composes acquisition, submission and score
//! extraction, and owns all session state.

pub mod controller;
pub mod state;

pub use controller::{PendingSubmission, SessionContext, SessionController, SubmissionOutcome};
pub use state::{SessionEvent, SessionState};
