//! Central fan-out loop.
//!
//! Session workers hand every room output to this task. It encodes each
//! message once and delivers it:
//! - `Location`, `Directed`, `ExitGranted`: **only** to the originating session.
//! - `BroadcastChat`: to **all** connected sessions.
//!
//! The router also owns the bookmark counter, so bookmarks are strictly
//! increasing across the whole room.

use std::collections::HashMap;

use room_core::Recipient;
use room_protocol::encode_outbound;
use tracing::{debug, info, warn};

use crate::types::{Delivery, OutboundTx, RouterRx, SessionId, SessionRegistry};

/// Run the router until every sender has gone away.
pub async fn run_router(mut router_rx: RouterRx, sessions: SessionRegistry) {
    let mut bookmark: u64 = 0;

    while let Some(Delivery { origin, msg }) = router_rx.recv().await {
        bookmark += 1;

        let frame = match encode_outbound(&msg, bookmark) {
            Ok(frame) => frame,
            Err(err) => {
                warn!(error = %err, ?msg, "could not encode outbound message");
                continue;
            }
        };

        // Snapshot of current sessions to minimize lock hold time.
        let current_sessions = {
            let guard = sessions.read().await;
            guard.clone()
        };

        route_frame(origin, msg.recipient(), frame, &current_sessions);
    }

    info!("router shutting down (router_rx closed)");
}

/// Send one encoded frame to the session(s) it is meant for.
fn route_frame(
    origin: SessionId,
    recipient: Recipient<'_>,
    frame: String,
    sessions: &HashMap<SessionId, OutboundTx>,
) {
    match recipient {
        Recipient::User(_) => {
            if let Some(tx) = sessions.get(&origin) {
                let _ = tx.send(frame);
            } else {
                debug!(session = origin.0, "origin session gone; dropping frame");
            }
        }
        Recipient::All => {
            for tx in sessions.values() {
                let _ = tx.send(frame.clone());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use room_core::OutboundEvent;
    use std::sync::Arc;
    use tokio::sync::{mpsc, RwLock};

    fn registry(ids: &[u64]) -> (SessionRegistry, Vec<mpsc::UnboundedReceiver<String>>) {
        let mut map = HashMap::new();
        let mut receivers = Vec::new();
        for id in ids {
            let (tx, rx) = mpsc::unbounded_channel();
            map.insert(SessionId(*id), tx);
            receivers.push(rx);
        }
        (Arc::new(RwLock::new(map)), receivers)
    }

    #[tokio::test]
    async fn directed_goes_to_origin_only() {
        let (sessions, mut rxs) = registry(&[1, 2]);
        let (tx, rx) = mpsc::unbounded_channel();
        let router = tokio::spawn(run_router(rx, sessions));

        tx.send(Delivery {
            origin: SessionId(2),
            msg: OutboundEvent::directed("u9", "only you"),
        })
        .unwrap();
        drop(tx);
        router.await.unwrap();

        assert!(rxs[0].try_recv().is_err());
        let frame = rxs[1].try_recv().unwrap();
        assert!(frame.starts_with("player,u9,"));
    }

    #[tokio::test]
    async fn broadcast_reaches_everyone_with_increasing_bookmarks() {
        let (sessions, mut rxs) = registry(&[1, 2, 3]);
        let (tx, rx) = mpsc::unbounded_channel();
        let router = tokio::spawn(run_router(rx, sessions));

        for text in ["one", "two"] {
            tx.send(Delivery {
                origin: SessionId(1),
                msg: OutboundEvent::broadcast(text),
            })
            .unwrap();
        }
        drop(tx);
        router.await.unwrap();

        for rx in rxs.iter_mut() {
            let first = rx.try_recv().unwrap();
            let second = rx.try_recv().unwrap();
            assert!(first.contains(r#""bookmark":1"#));
            assert!(second.contains(r#""bookmark":2"#));
        }
    }
}
