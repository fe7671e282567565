//! `modmail` binary: load configuration, connect the gateway, run until
//! externally stopped.

use std::sync::Arc;

use {
    anyhow::Context as _,
    clap::Parser,
    serenity::all::Client,
    tracing::info,
    tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt},
};

use modmail_discord::{ModmailConfig, ModmailHandler, ModmailState};

#[derive(Parser)]
#[command(name = "modmail", about = "ModMail — Discord support-ticket relay")]
struct Cli {
    /// Log level (trace, debug, info, warn, error).
    #[arg(long, env = "MODMAIL_LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Output logs as JSON instead of human-readable.
    #[arg(long, env = "MODMAIL_JSON_LOGS", default_value_t = false)]
    json_logs: bool,
}

fn init_telemetry(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    let registry = tracing_subscriber::registry().with(filter);

    if cli.json_logs {
        registry
            .with(fmt::layer().json().with_target(true).with_thread_ids(false))
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_ansi(true),
            )
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_telemetry(&cli);

    info!(version = env!("CARGO_PKG_VERSION"), "modmail starting");

    // A missing token or guild id is fatal: the process must not start.
    let config = ModmailConfig::from_env().context("invalid configuration")?;
    let token = config.expose_token().to_string();

    let state = Arc::new(ModmailState::new(config));
    let mut client = Client::builder(&token, ModmailHandler::intents())
        .event_handler(ModmailHandler::new(Arc::clone(&state)))
        .await
        .context("failed to build discord client")?;

    client.start().await.context("gateway connection failed")?;
    Ok(())
}
