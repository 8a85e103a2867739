//! Map / directory collaborator.
//!
//! The map service owns the world graph. At startup the room tells it who
//! it is and gets back the exits the map has wired to it.

use async_trait::async_trait;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::description::{Exit, RoomDescription};

/// Errors talking to the map service.
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    /// No map service is configured for this room.
    #[error("map service not configured")]
    NotConfigured,

    /// The request never completed.
    #[error("map request failed: {0}")]
    RequestFailed(String),

    /// The map answered with a non-success status.
    #[error("map rejected registration for {room_id}: status {status}")]
    Rejected { room_id: String, status: u16 },

    /// The map's reply could not be understood.
    #[error("invalid map response: {0}")]
    InvalidResponse(String),
}

/// What the map hands back after a successful registration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registration {
    #[serde(default)]
    pub exits: IndexMap<String, Exit>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MapDirectory: Send + Sync {
    /// Register this room (or refresh its registration).
    async fn register_or_update(
        &self,
        room_id: &str,
        description: &RoomDescription,
    ) -> Result<Registration, MapError>;

    /// Whether the map service is reachable and usable.
    fn ok(&self) -> bool;
}

/// Directory used when no map service is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoMap;

#[async_trait]
impl MapDirectory for NoMap {
    async fn register_or_update(
        &self,
        _room_id: &str,
        _description: &RoomDescription,
    ) -> Result<Registration, MapError> {
        Err(MapError::NotConfigured)
    }

    fn ok(&self) -> bool {
        false
    }
}
