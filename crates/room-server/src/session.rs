//! Per-connection I/O.
//!
//! Each session runs three pieces:
//! - a reader loop splitting the TCP stream into lines and decoding frames,
//! - a worker handling this session's events one at a time, in order,
//! - a writer draining the session's outbound channel.
//!
//! When the peer closes, the reader drops its end of the event queue and the
//! worker drains whatever was already received. Only the event being handled
//! at that moment (a slow `/news` lookup) is dropped, with its result. The
//! session's cancellation token is for server shutdown and write failure,
//! and stops all three pieces at once.

use std::sync::Arc;

use bytes::BytesMut;
use room_core::Room;
use room_protocol::{decode_inbound, encode_ack};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::types::{
    Delivery, EventRx, EventTx, OutboundRx, RouterTx, SessionId, SessionRegistry,
    EVENT_QUEUE_DEPTH,
};

/// Run the I/O loop for a single connection.
pub async fn run_session(
    session_id: SessionId,
    stream: TcpStream,
    room: Arc<Room>,
    router_tx: RouterTx,
    out_rx: OutboundRx,
    sessions: SessionRegistry,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    let (read_stream, write_stream) = stream.into_split();

    let writer = tokio::spawn(run_writer(session_id, write_stream, out_rx, cancel.clone()));

    let closed = CancellationToken::new();
    let (events_tx, events_rx) = mpsc::channel(EVENT_QUEUE_DEPTH);
    let worker = tokio::spawn(run_worker(
        session_id,
        room,
        events_rx,
        router_tx,
        closed.clone(),
        cancel.clone(),
    ));

    // The reader owns `events_tx`; once it returns the worker sees the end
    // of the queue after the events already in it.
    let result = run_reader(session_id, read_stream, events_tx, &cancel).await;
    closed.cancel();

    // Dropping our outbound sender lets the writer finish once the router
    // has nothing more for us.
    {
        let mut guard = sessions.write().await;
        guard.remove(&session_id);
    }

    let _ = worker.await;
    let _ = writer.await;

    result
}

async fn run_reader(
    session_id: SessionId,
    mut read_stream: OwnedReadHalf,
    events_tx: EventTx,
    cancel: &CancellationToken,
) -> anyhow::Result<()> {
    let mut buffer = BytesMut::with_capacity(4096);

    loop {
        let n = tokio::select! {
            _ = cancel.cancelled() => return Ok(()),
            read = read_stream.read_buf(&mut buffer) => read?,
        };

        if n == 0 {
            debug!(session = session_id.0, "peer closed connection");
            return Ok(());
        }

        // Process complete lines
        while let Some(newline_pos) = buffer.iter().position(|&b| b == b'\n') {
            let line = buffer.split_to(newline_pos + 1);
            let line = String::from_utf8_lossy(&line);
            let line = line.trim();

            if line.is_empty() {
                continue;
            }

            match decode_inbound(line) {
                Ok(frame) => {
                    debug!(session = session_id.0, event = ?frame.event, "frame received");
                    // Waits while the queue is full.
                    if events_tx.send(frame.event).await.is_err() {
                        return Ok(());
                    }
                }
                Err(err) => {
                    debug!(session = session_id.0, error = %err, "discarding malformed frame");
                }
            }
        }
    }
}

async fn run_worker(
    session_id: SessionId,
    room: Arc<Room>,
    mut events_rx: EventRx,
    router_tx: RouterTx,
    closed: CancellationToken,
    cancel: CancellationToken,
) {
    loop {
        let event = tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            event = events_rx.recv() => match event {
                Some(event) => event,
                None => break,
            },
        };

        // Polled first, so an event that completes without waiting is
        // always delivered, even after the peer has gone.
        let outputs = tokio::select! {
            biased;
            outputs = room.handle(event) => outputs,
            _ = closed.cancelled() => {
                debug!(session = session_id.0, "peer left mid-event; discarding result");
                continue;
            }
            _ = cancel.cancelled() => break,
        };

        for msg in outputs {
            if router_tx
                .send(Delivery {
                    origin: session_id,
                    msg,
                })
                .is_err()
            {
                warn!("router channel closed");
                return;
            }
        }
    }
}

async fn run_writer(
    session_id: SessionId,
    mut write_stream: OwnedWriteHalf,
    mut out_rx: OutboundRx,
    cancel: CancellationToken,
) {
    match encode_ack() {
        Ok(ack) => {
            if let Err(err) = write_line(&mut write_stream, &ack).await {
                warn!(session = session_id.0, error = %err, "could not send ack");
                cancel.cancel();
                return;
            }
        }
        Err(err) => warn!(error = %err, "could not encode ack"),
    }

    loop {
        let frame = tokio::select! {
            _ = cancel.cancelled() => break,
            frame = out_rx.recv() => match frame {
                Some(frame) => frame,
                None => break,
            },
        };

        if let Err(err) = write_line(&mut write_stream, &frame).await {
            warn!(session = session_id.0, error = %err, "write error");
            cancel.cancel();
            break;
        }
    }

    let _ = write_stream.shutdown().await;
}

async fn write_line(stream: &mut OwnedWriteHalf, frame: &str) -> std::io::Result<()> {
    stream.write_all(frame.as_bytes()).await?;
    stream.write_all(b"\n").await?;
    stream.flush().await
}
