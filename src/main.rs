mod notify;
mod pipeline;
mod render;
mod source;

use std::path::PathBuf;

use anyhow::Result;
use calwatch_core::config::Config;
use clap::Parser;

#[derive(Parser)]
#[command(name = "calwatch")]
#[command(about = "Watch an iCalendar feed and post weekly schedule changes to a chat webhook")]
struct Cli {
    /// Path to the configuration file (defaults to ~/.config/calwatch/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Decide and log notifications without delivering or persisting anything
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let config_path = match cli.config {
        Some(path) => path,
        None => Config::default_path()?,
    };
    let config = Config::load(&config_path)?;

    let source = source::HttpSource::new(
        config.calendar_url.clone(),
        config.feed_cache_path.clone(),
    );
    let notifier = notify::DiscordWebhook::new(config.webhook_url.clone());

    let today = chrono::Utc::now().with_timezone(&config.timezone).date_naive();

    // Handled failures inside the run log and exit zero; cron just retries
    // on its next tick.
    if let Err(e) = pipeline::run(&config, &source, &notifier, today, cli.dry_run).await {
        tracing::error!(error = %e, "run did not complete");
    }

    Ok(())
}
