//! Nudge Bot - Main Entry Point
//!
//! A Discord bot that answers one monitored user with canned phrases
//! while the configured time window allows it.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use nudge_bot::bot::{BotConfig, MessageHandler};
use nudge_bot::commands::CommandHandler;
use nudge_bot::config::{BotSettings, DiscordConfig, PhrasePool};
use nudge_bot::discord::{DiscordBot, Handler, RateLimiter};
use nudge_bot::window::WindowMode;

/// Discord bot that nudges one user with canned replies.
#[derive(Parser, Debug)]
#[command(name = "nudge_bot")]
#[command(about = "Reply to one Discord user with canned phrases inside a time window")]
#[command(version)]
struct Args {
    /// Discord id of the monitored user (falls back to USER_ID).
    #[arg(long)]
    user_id: Option<String>,

    /// Discord bot token (falls back to BOT_TOKEN).
    #[arg(long)]
    bot_token: Option<String>,

    /// Path to the secrets file [default: <executable dir>/env/secrets.env].
    #[arg(long)]
    env_file: Option<PathBuf>,

    /// Path to a JSON phrase file (falls back to PHRASES_PATH, then built-in phrases).
    #[arg(short, long)]
    phrases: Option<PathBuf>,

    /// Window semantics: active or inactive (overrides WINDOW_MODE).
    #[arg(long)]
    window_mode: Option<WindowMode>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Generate an example phrase file and exit.
    #[arg(long)]
    generate_config: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    init_logging(&args.log_level);

    // Handle example config generation
    if args.generate_config {
        return generate_example_config();
    }

    // Load secrets
    let env_file = match args.env_file {
        Some(path) => path,
        None => default_env_file().context("Failed to locate the secrets file")?,
    };
    dotenvy::from_path(&env_file)
        .with_context(|| format!("Failed to load secrets file {}", env_file.display()))?;

    // Load configurations
    let discord_config = DiscordConfig::resolve(args.bot_token, |key| std::env::var(key).ok())
        .context("Failed to load Discord configuration")?;

    let mut settings = BotSettings::from_env(args.user_id.as_deref())
        .context("Failed to load bot settings")?;
    if let Some(mode) = args.window_mode {
        settings.window_mode = mode;
    }
    if let Some(path) = args.phrases {
        settings.phrases_path = Some(path);
    }

    let phrases = load_phrases(settings.phrases_path.as_deref())?;
    phrases
        .validate()
        .context("Phrase configuration validation failed")?;

    info!(
        "Monitoring user {} ({} phrases, {} window, burst {}, {} tokens/s)",
        settings.monitored_user_id,
        phrases.len(),
        settings.window_mode,
        settings.rate_limit_burst,
        settings.rate_limit_refill_per_sec
    );

    let config = Arc::new(BotConfig::new(&settings, phrases, Utc::now()));
    let limiter = Arc::new(
        RateLimiter::new(settings.rate_limit_burst, settings.rate_limit_refill_per_sec)
            .context("Invalid rate limit settings")?,
    );

    let handler = Handler::new(
        MessageHandler::new(Arc::clone(&config), limiter),
        CommandHandler::new(Arc::clone(&config)),
    );

    let mut bot = DiscordBot::connect(&discord_config, handler)
        .await
        .context("Failed to create Discord session")?;

    let shard_manager = bot.shard_manager();
    tokio::spawn(async move {
        shutdown_signal().await;
        info!("Shutting down...");
        shard_manager.shutdown_all().await;
    });

    info!("Bot is running. Press Ctrl+C to exit.");
    bot.run().await.context("Discord connection failed")?;

    info!("Disconnected");
    Ok(())
}

/// Initializes the logging subsystem.
fn init_logging(level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// `env/secrets.env` next to the running executable.
fn default_env_file() -> Result<PathBuf> {
    let exe = std::env::current_exe().context("Cannot determine executable path")?;
    let dir = exe.parent().unwrap_or_else(|| Path::new("."));
    Ok(dir.join("env").join("secrets.env"))
}

/// Loads the phrase file if one is configured, otherwise the built-in phrases.
fn load_phrases(path: Option<&Path>) -> Result<PhrasePool> {
    match path {
        Some(path) => PhrasePool::load_from_file(path)
            .with_context(|| format!("Failed to load phrases from {}", path.display())),
        None => Ok(PhrasePool::builtin()),
    }
}

/// Generates an example phrase file.
fn generate_example_config() -> Result<()> {
    let example = PhrasePool::builtin();
    example.save_to_file("phrases.example.json")?;

    println!("✓ Example phrases written to: phrases.example.json");
    println!("\nTo use this bot:");
    println!("1. Copy phrases.example.json to phrases.json and edit it");
    println!("2. Create env/secrets.env next to the executable with BOT_TOKEN and USER_ID");
    println!("3. Run: nudge_bot --phrases phrases.json");

    Ok(())
}

/// Resolves once SIGINT or SIGTERM is received.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received Ctrl+C"),
        () = terminate => info!("Received SIGTERM"),
    }
}
