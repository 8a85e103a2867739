//! TCP server hosting a single text-adventure room.

use std::sync::Arc;

use room_core::{MapDirectory, NewsLookup, NoMap, Room, RoomIdentity};
use room_server::config::Config;
use room_server::map_client::HttpMapClient;
use room_server::news_client::HttpNewsClient;
use room_server::server;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Cancel `token` on SIGINT / SIGTERM.
fn setup_shutdown_signal(token: CancellationToken) {
    tokio::spawn(async move {
        let ctrl_c = async {
            if let Err(err) = tokio::signal::ctrl_c().await {
                warn!(error = %err, "failed to listen for Ctrl+C");
                std::future::pending::<()>().await;
            }
        };

        #[cfg(unix)]
        let terminate = async {
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(mut signal) => {
                    signal.recv().await;
                }
                Err(err) => {
                    warn!(error = %err, "failed to listen for SIGTERM");
                    std::future::pending::<()>().await;
                }
            }
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = ctrl_c => info!("received Ctrl+C, shutting down"),
            _ = terminate => info!("received SIGTERM, shutting down"),
        }

        token.cancel();
    });
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("room_server=info,room_core=info")),
        )
        .init();

    let config = Config::from_env()?;

    info!(
        addr = %config.socket_addr_string(),
        max_sessions = config.max_sessions,
        map = config.map_url.as_deref().unwrap_or("<none>"),
        "starting room-server"
    );

    let map: Arc<dyn MapDirectory> = match &config.map_url {
        Some(url) => Arc::new(HttpMapClient::new(url, config.map_timeout)),
        None => Arc::new(NoMap),
    };

    let news = NewsLookup::new(
        Arc::new(HttpNewsClient::new(config.news_timeout)),
        config.news.clone(),
        config.news_timeout,
    );

    let identity = RoomIdentity::resolve(config.room_id.clone());
    let room = Arc::new(Room::start(identity, config.room_description(), map, news).await);

    let shutdown = CancellationToken::new();
    setup_shutdown_signal(shutdown.clone());

    server::run(config, Arc::clone(&room), shutdown).await?;

    match Arc::try_unwrap(room) {
        Ok(room) => room.shutdown(),
        Err(_) => warn!("room still referenced at exit"),
    }

    Ok(())
}
