mod bot;
mod config;
mod discord;
mod fetch;
mod types;

use anyhow::{Context, Result};
use bot::{build_registry, Dispatcher, Settings, Shutdown};
use config::Config;
use discord::{Handler, ShardManagerContainer};
use fetch::FetchClient;
use serenity::all::GatewayIntents;
use serenity::Client;
use std::sync::Arc;
use tokio::signal;
use tracing::{debug, error, info};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("guild_bot=info,serenity=warn"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
    debug!("Tracing subscriber initialized");

    let run_id = format!("run_{}", uuid::Uuid::new_v4());
    let version = env!("CARGO_PKG_VERSION");
    info!(run_id = %run_id, "guild-bot v{}", version);
    debug!("{}", config);

    let registry = build_registry().context("Failed to build command registry")?;
    info!(
        commands = registry.len(),
        groups = registry.groups().len(),
        "Command registry built"
    );

    let fetch = FetchClient::new(&config.endpoints, config.http_timeout)?;
    let settings = Arc::new(Settings::from_config(&config));
    let shutdown = Shutdown::new();
    let dispatcher = Arc::new(Dispatcher::new(
        registry,
        settings,
        fetch,
        shutdown.clone(),
    ));

    let mut client = Client::builder(&config.discord_token, GatewayIntents::all())
        .event_handler(Handler::new(dispatcher))
        .await
        .context("Failed to create Discord client")?;

    {
        let mut data = client.data.write().await;
        data.insert::<ShardManagerContainer>(client.shard_manager.clone());
    }
    let shard_manager = client.shard_manager.clone();

    info!("Connecting to Discord. Press Ctrl+C to stop.");

    tokio::select! {
        result = client.start() => {
            if let Err(e) = result {
                error!(error = %e, "Gateway client stopped with an error");
                return Err(e).context("Discord gateway failed");
            }
            info!("Gateway client stopped");
        }
        _ = shutdown.triggered() => {
            info!("Shutdown requested, stopping gateway shards...");
        }
        _ = signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down gracefully...");
        }
    }

    shutdown.trigger();
    shard_manager.shutdown_all().await;

    info!(
        in_flight = shutdown.in_flight(),
        grace_ms = config.shutdown_grace.as_millis() as u64,
        "Draining in-flight interactions..."
    );
    if shutdown.drain(config.shutdown_grace).await {
        debug!("All interactions finished");
    }

    info!("Shutdown complete.");
    Ok(())
}
