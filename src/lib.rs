//! ShadowSync - compare your sports movement with the pros.
//!
//! This is the main library crate for ShadowSync. It provides the capture
//! and analysis session core; the `shadowsync` binary is a thin command-line
//! front end over it.

pub mod acquisition;
pub mod analysis;
pub mod artifact;
pub mod capture;
pub mod commands;
pub mod config;
pub mod recorder;
pub mod session;
pub mod sport;
pub mod utils;

pub use acquisition::{AcquisitionPhase, InputMode};
pub use analysis::{AnalysisResult, HttpAnalysisClient};
pub use artifact::{SelectedFile, VideoArtifact};
pub use config::ClientConfig;
pub use session::{SessionContext, SessionController, SessionEvent, SessionState};
pub use sport::Sport;
pub use utils::error::{SessionError, SessionResult};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize tracing/logging
///
/// `RUST_LOG` wins when set. Calling this twice is harmless.
pub fn init_tracing() {
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "shadowsync=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}
