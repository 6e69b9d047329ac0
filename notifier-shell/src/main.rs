use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use notifier_core::config::{ConfigLoader, CoreConfig};
use notifier_core::logging::{init_logging, init_minimal_logging};
use notifier_domain::i18n::FallbackTranslator;
use notifier_domain::notifications::{
    ClientStorage, FileClientStorage, HttpNotificationApi, NotificationPoller, TickOutcome, ACCESS_TOKEN_KEY,
};
use notifier_shell::cli::Args;
use notifier_shell::renderer::TracingRenderer;
use tracing::{error, info, warn};

fn load_config(args: &Args) -> Result<CoreConfig> {
    let loaded = match &args.config {
        Some(path) => ConfigLoader::load_from_path(path),
        None => ConfigLoader::load(),
    };
    loaded.context("Failed to load notifier configuration")
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            init_minimal_logging();
            error!("{:#}", e);
            return Err(e);
        }
    };
    init_logging(&config.logging, false).context("Failed to initialize logging")?;

    let storage = Arc::new(FileClientStorage::from_config(&config.storage)?);
    info!("Client storage at {:?}", storage.path());
    if let Some(token) = &args.token {
        storage
            .set_item(ACCESS_TOKEN_KEY, token)
            .await
            .context("Failed to store access token")?;
    }

    let api = Arc::new(HttpNotificationApi::new(&config.api, storage.clone())?);
    let poller = NotificationPoller::new(api, storage, config.poller.clone());
    let renderer = tokio::spawn(TracingRenderer::new(FallbackTranslator).run(poller.subscribe()));

    if args.once {
        if poller.poll_tick().await == TickOutcome::Completed {
            poller.fetch_recent_notifications(config.poller.recent_limit).await;
        }
    } else if poller.start().await {
        info!("Polling {} every {:?}; press Ctrl-C to exit", config.api.base_url, config.poller.interval());
        tokio::signal::ctrl_c().await.context("Failed to listen for Ctrl-C")?;
    } else {
        warn!("No access token available; pass --token or sign in first");
    }

    poller.destroy().await;
    if let Err(e) = renderer.await {
        error!("Renderer task failed: {}", e);
    }
    Ok(())
}
