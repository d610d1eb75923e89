//! Analysis submission and result interpretation
//!
//! - `submitter`: the seam the session submits through
//! - `client`: HTTP implementation of that seam
//! - `score`: similarity score extraction from report text

pub mod client;
pub mod score;
pub mod submitter;

pub use client::HttpAnalysisClient;
pub use score::extract_similarity_score;
pub use submitter::{AnalysisSubmitter, SubmitError};

use crate::sport::Sport;
use serde::{Deserialize, Serialize};

/// Outcome of a successful analysis
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    /// Sport the video was analyzed for
    pub sport: Sport,

    /// Report text as returned by the service
    pub report_text: String,

    /// Similarity score, absent when the report has none
    pub score: Option<u8>,
}

impl AnalysisResult {
    /// Interpret a report, extracting its score
    pub fn from_report(sport: Sport, report_text: String) -> Self {
        let score = extract_similarity_score(&report_text);
        Self {
            sport,
            report_text,
            score,
        }
    }
}
