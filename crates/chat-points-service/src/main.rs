//! Chat-Points Service - live chat loyalty point accrual daemon.
//!
//! This is the main entry point for the chat-points service.

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use chat_points_feed::LiveFeedClient;
use chat_points_service::{admin, Poller, ServiceConfig, ServiceError};
use chat_points_store::{Ledger, RocksLedger};

#[tokio::main]
async fn main() -> Result<(), ServiceError> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,chat_points=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Chat-Points Service");

    // Load configuration from environment
    let config = ServiceConfig::from_env();

    tracing::info!(
        data_dir = %config.data_dir,
        api_base_url = %config.api_base_url,
        channel = %config.channel_handle,
        keyword = %config.stream_keyword,
        poll_interval_secs = config.poll_interval_seconds,
        error_backoff_secs = config.error_backoff_seconds,
        "Service configuration loaded"
    );

    // Initialize the ledger
    tracing::info!(path = %config.data_dir, "Opening RocksDB ledger");
    let ledger: Arc<dyn Ledger> = Arc::new(RocksLedger::open(&config.data_dir)?);

    // Operator command: `chat-points-service set-membership <user_id> <months>`
    let args: Vec<String> = std::env::args().skip(1).collect();
    if let Some(command) = args.first() {
        if command == "set-membership" {
            let (user_id, months) = admin::parse_set_membership_args(&args[1..])?;
            admin::set_membership(ledger.as_ref(), &user_id, months)?;
            return Ok(());
        }
        return Err(ServiceError::InvalidCommand(format!(
            "unknown command: {command}"
        )));
    }

    if config.channel_handle.is_empty() {
        return Err(ServiceError::Config("CHANNEL_HANDLE must be set".into()));
    }
    let api_token = config.api_token.clone().ok_or_else(|| {
        ServiceError::Config("API token not configured (token file or API_TOKEN)".into())
    })?;

    // Locate the live chat session
    let feed = LiveFeedClient::new(config.api_base_url.clone(), api_token);
    let live_chat_id = feed
        .locate_live_session(&config.channel_handle, &config.stream_keyword)
        .await?;

    // Shutdown channel: ctrl-c flips the flag, the poller exits at the
    // next suspension point
    let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Shutdown requested");
            let _ = shutdown_tx.send(true);
        }
    });

    let poller = Poller::new(Arc::new(feed), ledger, &config);
    poller.run(&live_chat_id, shutdown_rx).await;

    Ok(())
}
