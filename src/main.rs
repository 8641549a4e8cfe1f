//! Horoscope Bot - Main Entry Point
//!
//! A Discord bot that answers `/horoscope` with the day's excerpt for a
//! zodiac sign, taken from a VK community wall, and posts a daily digest.

use std::sync::Arc;

use anyhow::{Context, Result, bail};
use chrono::{Local, NaiveDate};
use clap::Parser;
use serenity::Client;
use serenity::prelude::GatewayIntents;
use tokio::sync::{RwLock, broadcast, mpsc};
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

use horoscope_bot::commands::SelectorHandler;
use horoscope_bot::config::{BotSettings, DiscordConfig, VkConfig};
use horoscope_bot::discord::{ChannelSink, Handler};
use horoscope_bot::health::start_health_server;
use horoscope_bot::horoscope::{HoroscopeLookup, compile_digest};
use horoscope_bot::scheduler::{DigestScheduler, SchedulerMessage};
use horoscope_bot::session::SessionStore;
use horoscope_bot::vk::VkClient;

/// Discord bot serving horoscopes from a VK community wall.
#[derive(Parser, Debug)]
#[command(name = "horoscope_bot")]
#[command(about = "Serve daily horoscopes from a VK wall on Discord")]
#[command(version)]
struct Args {
    /// Path to the .env file for environment variables.
    #[arg(long, default_value = ".env")]
    env_file: String,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Print the digest for DATE (YYYY-MM-DD or DD.MM.YYYY, default today) and exit.
    #[arg(long, value_name = "DATE", num_args = 0..=1, default_missing_value = "today")]
    print_digest: Option<String>,

    /// Post today's digest to the auto-post channel right after startup.
    #[arg(long)]
    post_now: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    init_logging(&args.log_level);

    // Load environment variables
    if let Err(e) = dotenvy::from_filename(&args.env_file) {
        debug!("Could not load .env file ({}): {}", args.env_file, e);
    }

    let vk_config =
        VkConfig::from_env().context("Failed to load VK configuration from environment")?;
    info!(
        "Reading wall {} (last {} posts, API v{})",
        vk_config.group_id, vk_config.lookback, vk_config.api_version
    );

    let owner_id = vk_config.group_id;
    let lookback = vk_config.lookback;
    let vk = VkClient::new(vk_config).context("Failed to build VK client")?;
    let lookup = Arc::new(HoroscopeLookup::new(vk, owner_id, lookback));

    // One-shot digest preview
    if let Some(raw) = args.print_digest.as_deref() {
        let today = Local::now().date_naive();
        let date = parse_date_arg(raw, today)?;
        for chunk in compile_digest(&lookup, date, today).await {
            println!("{chunk}");
            println!();
        }
        return Ok(());
    }

    let discord_config = DiscordConfig::from_env()
        .context("Failed to load Discord configuration from environment")?;
    let bot_settings = BotSettings::from_env_with_defaults();

    let sessions = Arc::new(RwLock::new(SessionStore::default()));
    let selector = Arc::new(SelectorHandler::new(sessions, Arc::clone(&lookup)));

    // Health endpoint
    let (shutdown_tx, shutdown_rx) = broadcast::channel::<()>(1);
    let health_port = bot_settings.health_port;
    let health_handle = tokio::spawn(async move {
        if let Err(e) = start_health_server(health_port, shutdown_rx).await {
            error!("Health server failed: {:#}", e);
        }
    });

    let mut client = Client::builder(&discord_config.token, GatewayIntents::GUILDS)
        .event_handler(Handler::new(selector))
        .await
        .context("Failed to create Discord client")?;

    // Daily digest
    let (scheduler_tx, scheduler_rx) = mpsc::channel::<SchedulerMessage>(32);
    let scheduler_handle = if let Some(channel_id) = bot_settings.auto_post_channel_id {
        let sink = Arc::new(ChannelSink::new(Arc::clone(&client.http)));
        let scheduler = DigestScheduler::new(
            Arc::clone(&lookup),
            sink,
            channel_id,
            bot_settings.digest_time,
        );
        let handle = tokio::spawn(async move {
            scheduler.run(scheduler_rx).await;
        });
        if args.post_now {
            scheduler_tx
                .send(SchedulerMessage::PostNow)
                .await
                .context("Failed to queue the startup digest")?;
        }
        Some(handle)
    } else {
        info!("AUTO_POST_CHANNEL_ID not set, daily digest disabled");
        if args.post_now {
            warn!("--post-now ignored: no auto-post channel configured");
        }
        None
    };

    info!("Starting horoscope bot...");
    let shard_manager = Arc::clone(&client.shard_manager);

    let outcome = tokio::select! {
        result = client.start() => result.context("Discord client stopped"),
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down...");
            Ok(())
        }
    };

    // Cleanup
    info!("Shutting down...");
    shard_manager.shutdown_all().await;
    if let Some(handle) = scheduler_handle {
        let _ = scheduler_tx.send(SchedulerMessage::Shutdown).await;
        let _ = handle.await;
    }
    let _ = shutdown_tx.send(());
    let _ = health_handle.await;

    outcome
}

/// Initializes the logging subsystem.
fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// Parses the `--print-digest` argument.
fn parse_date_arg(raw: &str, today: NaiveDate) -> Result<NaiveDate> {
    if raw.eq_ignore_ascii_case("today") {
        return Ok(today);
    }
    for format in ["%Y-%m-%d", "%d.%m.%Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(raw, format) {
            return Ok(date);
        }
    }
    bail!("Invalid date '{raw}', expected YYYY-MM-DD or DD.MM.YYYY")
}
