#![deny(
    clippy::expect_used,
    clippy::panic,
    clippy::print_stdout,
    clippy::todo,
    clippy::unimplemented,
    clippy::unwrap_used
)]

use std::time::Duration;

use clap::{Parser, Subcommand};
use gavelmatch_pipeline::config::Config;
use gavelmatch_pipeline::congress::HttpCongressClient;
use gavelmatch_pipeline::progress::{JsonProgressStore, ProgressStore};
use gavelmatch_pipeline::runner;
use gavelmatch_pipeline::youtube::{FeedClient, HttpYouTubeClient, YouTubeApiClient};
use gm_llm::LlmAdjudicator;
use gm_match::Adjudicator;

/// Match committee proceeding videos to official Congress.gov events.
#[derive(Parser, Debug)]
#[command(name = "gavelmatch")]
#[command(about = "Match committee proceeding videos to Congress.gov events")]
#[command(version)]
struct Cli {
    /// Path to the configuration file (default: config.yaml)
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch committee-meeting records from Congress.gov
    FetchEvents {
        /// Discard any existing checkpoint and start fresh
        #[arg(long)]
        clean: bool,
    },

    /// Fetch videos from the configured channels (Data API when keyed,
    /// channel feeds otherwise)
    FetchVideos,

    /// Match fetched videos against fetched events
    Match {
        /// Run purely algorithmically even if the adjudicator is configured
        #[arg(long)]
        no_adjudicator: bool,
    },

    /// Re-export the latest match report to CSV
    Export,
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let cli = Cli::parse();

    // Load and validate configuration first (fail-fast)
    let config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
    .map_err(|e| anyhow::anyhow!("{e}"))?;

    // Set up logging from config
    std::env::set_var("RUST_LOG", &config.logging.level);
    tracing_subscriber::fmt::init();

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "gavelmatch starting up");

    match cli.command {
        Command::FetchEvents { clean } => {
            if config.congress.api_key.is_empty() {
                anyhow::bail!(
                    "congress.api_key is required for fetch-events. \
                     Set GM_CONGRESS__API_KEY or configure in config.yaml."
                );
            }

            let store = JsonProgressStore::new(config.storage.checkpoint_path());
            if clean {
                store.clear()?;
                tracing::info!("checkpoint cleared");
            }

            let client = HttpCongressClient::new(
                config.congress.base_url.as_str(),
                config.congress.api_key.as_str(),
            );
            runner::fetch_events(&config, &client, &store).await?;
        }

        Command::FetchVideos => {
            if config.youtube.channels.is_empty() {
                anyhow::bail!(
                    "youtube.channels is empty. Configure at least one channel ID \
                     via GM_YOUTUBE__CHANNELS or config.yaml."
                );
            }

            let http = reqwest::Client::builder()
                .timeout(Duration::from_secs(10))
                .build()?;
            let feed = FeedClient::new(http, config.youtube.feed_base_url.as_str());

            let api_client;
            let api: Option<&dyn YouTubeApiClient> = if config.youtube.api_key.is_empty() {
                tracing::info!("no YouTube API key configured, using channel feeds");
                None
            } else {
                api_client = HttpYouTubeClient::new(
                    config.youtube.base_url.as_str(),
                    config.youtube.api_key.as_str(),
                );
                Some(&api_client)
            };

            runner::fetch_videos(&config, api, &feed).await?;
        }

        Command::Match { no_adjudicator } => {
            let adjudicator_impl;
            let adjudicator: Option<&dyn Adjudicator> =
                if config.adjudicator.enabled && !no_adjudicator {
                    adjudicator_impl = LlmAdjudicator::new(
                        config.adjudicator.base_url.as_str(),
                        config.adjudicator.api_key.as_str(),
                        config.adjudicator.model.as_str(),
                    )?;
                    Some(&adjudicator_impl)
                } else {
                    None
                };

            let report = runner::run_match(&config, adjudicator).await?;
            tracing::info!(
                matched = report.metadata.matched,
                unmatched = report.metadata.unmatched,
                adjudicated = report.metadata.adjudicated_matches,
                rate = %report.metadata.match_rate,
                "match run complete"
            );
        }

        Command::Export => {
            runner::export_csv(&config)?;
        }
    }

    Ok(())
}
