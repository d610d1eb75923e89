//! `shadowsync analyze`
//!
//! Runs the Upload flow end to end: pick the sport, supply the file, submit,
//! and print the report with its similarity score.

use crate::acquisition::InputMode;
use crate::analysis::{AnalysisResult, AnalysisSubmitter, HttpAnalysisClient};
use crate::artifact::SelectedFile;
use crate::config::ClientConfig;
use crate::session::{SessionContext, SessionController};
use crate::sport::Sport;
use anyhow::Context;
use std::path::Path;
use std::sync::Arc;

pub async fn run(
    config: &ClientConfig,
    sport: Sport,
    file: &Path,
    json: bool,
) -> anyhow::Result<()> {
    let client = HttpAnalysisClient::new(config)?;
    let result = analyze_file(Arc::new(client), sport, file).await?;
    println!("{}", render(&result, json)?);
    Ok(())
}

/// Drive a headless session through upload and submission
pub async fn analyze_file(
    submitter: Arc<dyn AnalysisSubmitter>,
    sport: Sport,
    file: &Path,
) -> anyhow::Result<AnalysisResult> {
    let selected = SelectedFile::from_path(file)
        .await
        .with_context(|| format!("failed to read {}", file.display()))?;

    let mut session = SessionController::new(SessionContext::headless(submitter));
    session.choose_sport(sport);
    session.choose_mode(InputMode::Upload).await?;
    session.supply_file(selected)?;

    tracing::info!(
        "Comparing your {} with {}",
        sport.display_name(),
        sport.reference_athlete()
    );

    Ok(session.submit_for_analysis().await?)
}

/// Format a result for the terminal
pub fn render(result: &AnalysisResult, json: bool) -> anyhow::Result<String> {
    if json {
        return Ok(serde_json::to_string_pretty(result)?);
    }

    let score = match result.score {
        Some(score) => format!("Similarity: {score}%"),
        None => "Similarity: not reported".to_string(),
    };
    Ok(format!(
        "{} vs. {}\n{}\n\n{}",
        result.sport.display_name(),
        result.sport.reference_athlete(),
        score,
        result.report_text.trim_end()
    ))
}
