use clap::{Parser, Subcommand};
use shadowsync::commands;
use shadowsync::config::ClientConfig;
use shadowsync::sport::Sport;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "shadowsync")]
#[command(about = "Compare your sports movement with the pros", long_about = None)]
struct Cli {
    /// Analysis service base URL (overrides SHADOWSYNC_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Bearer token (overrides SHADOWSYNC_TOKEN)
    #[arg(long, global = true)]
    token: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the supported sports
    Sports {
        /// Ask the analysis service instead of using the built-in catalog
        #[arg(long)]
        remote: bool,
    },

    /// Upload a video and print the similarity report
    Analyze {
        /// basketball, soccer, boxing or golf
        #[arg(short, long)]
        sport: Sport,

        /// Video file to upload
        file: PathBuf,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    shadowsync::init_tracing();

    let cli = Cli::parse();

    let mut config = ClientConfig::from_env();
    if let Some(url) = cli.api_url {
        config.api_url = url;
    }
    if let Some(token) = cli.token {
        config.token = Some(token);
    }

    tracing::debug!("Using analysis service at {}", config.api_url);

    match cli.command {
        Commands::Sports { remote } => commands::sports::run(&config, remote).await,
        Commands::Analyze { sport, file, json } => {
            commands::analyze::run(&config, sport, &file, json).await
        }
    }
}
