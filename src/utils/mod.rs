//! Shared utilities

pub mod error;

pub use error::{ErrorNotice, SessionError, SessionResult};
