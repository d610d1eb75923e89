//! `shadowsync sports`

use crate::analysis::HttpAnalysisClient;
use crate::config::ClientConfig;
use crate::sport::Sport;
use anyhow::Context;

/// Print the sport catalog, local or as reported by the service
pub async fn run(config: &ClientConfig, remote: bool) -> anyhow::Result<()> {
    if remote {
        let client = HttpAnalysisClient::new(config)?;
        let sports = client
            .list_sports()
            .await
            .with_context(|| format!("failed to list sports from {}", config.api_url))?;
        for id in sports {
            println!("{}", describe_remote(&id));
        }
    } else {
        for line in catalog_lines() {
            println!("{line}");
        }
    }
    Ok(())
}

/// One line per built-in sport
pub fn catalog_lines() -> Vec<String> {
    Sport::ALL.iter().map(describe).collect()
}

fn describe(sport: &Sport) -> String {
    format!(
        "{:<12} {} (vs. {})",
        sport.id(),
        sport.display_name(),
        sport.reference_athlete()
    )
}

fn describe_remote(id: &str) -> String {
    match id.parse::<Sport>() {
        Ok(sport) => describe(&sport),
        Err(_) => {
            tracing::debug!("Service offers a sport this build does not know: {}", id);
            format!("{id:<12} (not supported by this client)")
        }
    }
}
