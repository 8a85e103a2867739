//! Shared types for the room TCP server.
//!
//! This module defines:
//! - `SessionId`: a lightweight handle for connected sessions
//! - channel aliases between a session's reader and worker, and between
//!   sessions and the router
//! - `Delivery`: room output flowing from a session worker to the router

use std::collections::HashMap;
use std::sync::Arc;

use room_core::{InboundEvent, OutboundEvent};
use tokio::sync::mpsc;
use tokio::sync::RwLock;

/// Identifier for a connected session.
///
/// This is intentionally opaque; we just guarantee uniqueness
/// over the lifetime of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(pub u64);

/// How many decoded events a session may queue behind the one being handled.
/// A full queue stops the reader until the worker catches up.
pub const EVENT_QUEUE_DEPTH: usize = 32;

/// Decoded events from a session's reader to its worker.
pub type EventTx = mpsc::Sender<InboundEvent>;
pub type EventRx = mpsc::Receiver<InboundEvent>;

/// Encoded frames from the router to a given session's writer.
pub type OutboundTx = mpsc::UnboundedSender<String>;
pub type OutboundRx = mpsc::UnboundedReceiver<String>;

/// Registry of connected sessions and their outbound channels.
pub type SessionRegistry = Arc<RwLock<HashMap<SessionId, OutboundTx>>>;

/// One room output, tagged with the session whose event produced it.
#[derive(Debug)]
pub struct Delivery {
    pub origin: SessionId,
    pub msg: OutboundEvent,
}

/// Channel from session workers → router task.
pub type RouterTx = mpsc::UnboundedSender<Delivery>;
pub type RouterRx = mpsc::UnboundedReceiver<Delivery>;
