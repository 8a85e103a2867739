//! TCP listener and top-level server wiring.
//!
//! This module:
//! - Listens on the configured address/port.
//! - Accepts new TCP connections.
//! - Assigns each connection a `SessionId`.
//! - Spawns:
//!   - a per-session task to handle I/O and room events,
//!   - a single central router task that fans output out to sessions.
//!
//! The per-session logic and the router live in `session` and `router`
//! respectively.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use anyhow::Context;
use room_core::Room;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{info, warn};

use crate::config::Config;
use crate::router;
use crate::session;
use crate::types::{OutboundRx, OutboundTx, RouterRx, RouterTx, SessionId, SessionRegistry};

/// Global-ish counter for assigning unique `SessionId`s.
static NEXT_SESSION_ID: AtomicU64 = AtomicU64::new(1);

fn next_session_id() -> SessionId {
    SessionId(NEXT_SESSION_ID.fetch_add(1, Ordering::Relaxed))
}

/// Bind the configured address and serve until `shutdown` is cancelled.
pub async fn run(config: Config, room: Arc<Room>, shutdown: CancellationToken) -> anyhow::Result<()> {
    let addr = config.socket_addr_string();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(%addr, room_id = room.id(), "listening");

    serve(listener, room, config.max_sessions, shutdown).await
}

/// Accept loop over an already-bound listener.
///
/// Returns once `shutdown` is cancelled and every session has finished.
pub async fn serve(
    listener: TcpListener,
    room: Arc<Room>,
    max_sessions: usize,
    shutdown: CancellationToken,
) -> anyhow::Result<()> {
    // Shared registry of sessions → outbound channels.
    let sessions: SessionRegistry = Arc::new(tokio::sync::RwLock::new(Default::default()));

    // Channel from session workers → router task.
    let (router_tx, router_rx): (RouterTx, RouterRx) = mpsc::unbounded_channel();
    let router = tokio::spawn(router::run_router(router_rx, sessions.clone()));

    let tracker = TaskTracker::new();

    loop {
        let (stream, peer_addr) = tokio::select! {
            _ = shutdown.cancelled() => break,
            accepted = listener.accept() => accepted?,
        };

        let current_sessions = {
            let guard = sessions.read().await;
            guard.len()
        };

        if current_sessions >= max_sessions {
            warn!(%peer_addr, max_sessions, "rejecting connection: session limit reached");
            // Just drop the stream; the peer sees the connection close.
            continue;
        }

        let session_id = next_session_id();
        info!(session = session_id.0, %peer_addr, "accepted connection");

        // Create outbound channel for this session.
        let (out_tx, out_rx): (OutboundTx, OutboundRx) = mpsc::unbounded_channel();

        // Register session.
        {
            let mut guard = sessions.write().await;
            guard.insert(session_id, out_tx);
        }

        let room = Arc::clone(&room);
        let router_tx = router_tx.clone();
        let sessions = sessions.clone();
        let cancel = shutdown.child_token();

        tracker.spawn(async move {
            match session::run_session(session_id, stream, room, router_tx, out_rx, sessions, cancel)
                .await
            {
                Ok(()) => info!(session = session_id.0, "session closed"),
                Err(err) => warn!(session = session_id.0, error = %err, "session error"),
            }
        });
    }

    info!("stopped accepting; draining sessions");
    tracker.close();
    tracker.wait().await;

    // Last sender gone: the router drains and exits.
    drop(router_tx);
    let _ = router.await;

    Ok(())
}
