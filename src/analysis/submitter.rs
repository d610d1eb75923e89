//! Analysis submission seam
//!
//! The controller talks to the analysis service only through
//! [`AnalysisSubmitter`], so sessions can run against a fake in tests.

use crate::artifact::VideoArtifact;
use crate::sport::Sport;
use async_trait::async_trait;
use thiserror::Error;

/// Submission errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubmitError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Service error ({status}): {message}")]
    Service { status: u16, message: String },

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Sends a video to the analysis service and returns its report text
#[async_trait]
pub trait AnalysisSubmitter: Send + Sync {
    async fn submit(&self, sport: Sport, artifact: &VideoArtifact) -> Result<String, SubmitError>;
}

/// Checks shared by every submitter before anything leaves the process
pub fn validate_artifact(artifact: &VideoArtifact) -> Result<(), SubmitError> {
    if artifact.is_empty() {
        return Err(SubmitError::Validation("video is empty".to_string()));
    }
    if artifact.name().trim().is_empty() {
        return Err(SubmitError::Validation("video has no file name".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifact::ArtifactSource;

    #[test]
    fn test_validate_artifact() {
        let ok = VideoArtifact::new("a.mp4", "video/mp4", ArtifactSource::Upload, vec![1]);
        assert!(validate_artifact(&ok).is_ok());

        let empty = VideoArtifact::new("a.mp4", "video/mp4", ArtifactSource::Upload, vec![]);
        assert!(matches!(
            validate_artifact(&empty),
            Err(SubmitError::Validation(_))
        ));

        let unnamed = VideoArtifact::new(" ", "video/mp4", ArtifactSource::Upload, vec![1]);
        assert!(matches!(
            validate_artifact(&unnamed),
            Err(SubmitError::Validation(_))
        ));
    }
}
