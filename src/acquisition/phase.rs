//! Acquisition phases and input modes

use serde::{Deserialize, Serialize};

/// How the video is being acquired
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputMode {
    /// Pick an existing file
    #[default]
    Upload,
    /// Record with the camera
    Record,
}

/// Where the session is on its way to a submittable video
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "mode", rename_all = "camelCase")]
pub enum AcquisitionPhase {
    /// Nothing chosen yet
    #[default]
    NoSport,
    /// Sport chosen, no mode yet (or back here after a reset)
    SportChosen,
    /// Mode chosen but its input is not available, e.g. the camera failed to open
    ModeChosen(InputMode),
    /// Waiting for a file or a recording
    AcquiringInput(InputMode),
    /// A complete artifact is held and can be submitted
    ArtifactReady(InputMode),
}

impl AcquisitionPhase {
    pub fn is_ready(&self) -> bool {
        matches!(self, AcquisitionPhase::ArtifactReady(_))
    }

    /// Mode the phase belongs to, if any
    pub fn mode(&self) -> Option<InputMode> {
        match self {
            AcquisitionPhase::ModeChosen(mode)
            | AcquisitionPhase::AcquiringInput(mode)
            | AcquisitionPhase::ArtifactReady(mode) => Some(*mode),
            AcquisitionPhase::NoSport | AcquisitionPhase::SportChosen => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_serialization() {
        let json =
            serde_json::to_value(AcquisitionPhase::ArtifactReady(InputMode::Record)).unwrap();
        assert_eq!(json, serde_json::json!({"state": "artifactReady", "mode": "record"}));

        let json = serde_json::to_value(AcquisitionPhase::SportChosen).unwrap();
        assert_eq!(json, serde_json::json!({"state": "sportChosen"}));
    }

    #[test]
    fn test_phase_mode() {
        assert_eq!(AcquisitionPhase::SportChosen.mode(), None);
        assert_eq!(
            AcquisitionPhase::ModeChosen(InputMode::Record).mode(),
            Some(InputMode::Record)
        );
        assert!(AcquisitionPhase::ArtifactReady(InputMode::Upload).is_ready());
    }
}
