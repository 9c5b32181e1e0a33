//! tweetvault - incrementally archive a Twitter account
//!
//! Runs one archive pass for the selected profile: fetches the account's
//! own tweets, mentions and favorites since the last archived id, resolves
//! replied-to tweets, and stores everything in the profile's database.

use clap::Parser;
use libtweetvault::api::twitter::TwitterApi;
use libtweetvault::{archive, Config, Database, Result};
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "tweetvault")]
#[command(
    about = "Incrementally archive a Twitter account's tweets, mentions and favorites",
    long_about = None
)]
struct Cli {
    /// Profile to archive (from profiles.toml)
    #[arg(default_value = "default")]
    profile: String,

    /// Path to the profiles file (overrides the default location)
    #[arg(short, long)]
    config: Option<std::path::PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli).await {
        error!("archive run failed: {}", e);
        std::process::exit(e.exit_code());
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => Config::load_from_path(path)?,
        None => Config::load()?,
    };
    let profile = config.profile(&cli.profile)?;

    let db = Database::new(&profile.database.path).await?;

    let api = match &profile.api_base {
        Some(base) => TwitterApi::with_base_url(profile.auth.bearer_token.clone(), base.clone()),
        None => TwitterApi::new(profile.auth.bearer_token.clone()),
    };

    let report = archive::run(&api, &db).await?;
    info!(
        account = %report.account.screen_name,
        unique = report.unique_tweets,
        inserted = report.inserted,
        duplicates = report.duplicates,
        "archive finished"
    );
    Ok(())
}
