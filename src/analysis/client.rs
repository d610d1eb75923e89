//! HTTP analysis client
//!
//! Talks to the analysis service over HTTP:
//! - `POST /api/analyze-video/{sport}` with the video as multipart field
//!   `user_video`, answered by `{ "sport": .., "analysis": .. }`
//! - `GET /api/sports`, answered by `{ "sports": [..] }`
//!
//! Error responses carry a `detail` message.

use super::submitter::{validate_artifact, AnalysisSubmitter, SubmitError};
use crate::artifact::VideoArtifact;
use crate::config::ClientConfig;
use crate::sport::Sport;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use std::time::Duration;

/// Multipart field carrying the video
pub const VIDEO_FIELD: &str = "user_video";

const FALLBACK_ERROR: &str = "Analysis failed";

#[derive(Debug, Deserialize)]
struct AnalysisResponse {
    #[serde(default)]
    sport: Option<String>,
    #[serde(default)]
    analysis: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SportsResponse {
    sports: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: Option<serde_json::Value>,
}

/// reqwest-backed analysis client
pub struct HttpAnalysisClient {
    client: reqwest::Client,
    api_url: String,
    token: Option<String>,
}

impl HttpAnalysisClient {
    /// Create a client from configuration
    pub fn new(config: &ClientConfig) -> Result<Self, SubmitError> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| SubmitError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Sports the service currently accepts
    pub async fn list_sports(&self) -> Result<Vec<String>, SubmitError> {
        let url = self.endpoint("/api/sports");
        tracing::debug!("GET {}", url);

        let response = self
            .authorize(self.client.get(&url))
            .send()
            .await
            .map_err(|e| SubmitError::Network(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| SubmitError::Network(e.to_string()))?;

        if !(200..300).contains(&status) {
            return Err(service_error(status, &body));
        }
        serde_json::from_str::<SportsResponse>(&body)
            .map(|r| r.sports)
            .map_err(|e| SubmitError::Validation(format!("unexpected sports response: {e}")))
    }
}

#[async_trait]
impl AnalysisSubmitter for HttpAnalysisClient {
    async fn submit(&self, sport: Sport, artifact: &VideoArtifact) -> Result<String, SubmitError> {
        validate_artifact(artifact)?;

        let part = Part::bytes(artifact.bytes().to_vec())
            .file_name(artifact.name().to_string())
            .mime_str(artifact.mime_type())
            .map_err(|e| {
                SubmitError::Validation(format!(
                    "invalid MIME type '{}': {e}",
                    artifact.mime_type()
                ))
            })?;
        let form = Form::new().part(VIDEO_FIELD, part);

        let url = self.endpoint(&format!("/api/analyze-video/{}", sport.id()));
        tracing::info!(
            "Submitting {} ({} bytes, {}) to {}",
            artifact.name(),
            artifact.len(),
            artifact.mime_type(),
            url
        );

        let response = self
            .authorize(self.client.post(&url))
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!("Analysis request failed: {}", e);
                SubmitError::Network(e.to_string())
            })?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| SubmitError::Network(e.to_string()))?;

        interpret_response(status, &body)
    }
}

/// Turn a raw service response into report text or a submission error
pub fn interpret_response(status: u16, body: &str) -> Result<String, SubmitError> {
    if !(200..300).contains(&status) {
        let error = service_error(status, body);
        tracing::warn!("Analysis service returned {}: {}", status, error);
        return Err(error);
    }

    let parsed: AnalysisResponse = serde_json::from_str(body)
        .map_err(|e| SubmitError::Validation(format!("unexpected analysis response: {e}")))?;

    match parsed.analysis {
        Some(analysis) => {
            tracing::debug!(
                "Received {} chars of analysis for {}",
                analysis.len(),
                parsed.sport.as_deref().unwrap_or("unknown sport")
            );
            Ok(analysis)
        }
        None => Err(SubmitError::Validation(
            "analysis response has no 'analysis' text".to_string(),
        )),
    }
}

fn service_error(status: u16, body: &str) -> SubmitError {
    let message = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.detail)
        .map(|detail| match detail {
            serde_json::Value::String(text) => text,
            other => other.to_string(),
        })
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| FALLBACK_ERROR.to_string());

    SubmitError::Service { status, message }
}
