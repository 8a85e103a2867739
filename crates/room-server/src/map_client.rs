//! HTTP client for the map service.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use room_core::{MapDirectory, MapError, Registration, RoomDescription};
use tracing::debug;

/// Registers the room with `PUT {base_url}/rooms/{room_id}`.
pub struct HttpMapClient {
    client: Client,
    base_url: String,
    healthy: AtomicBool,
}

impl HttpMapClient {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            healthy: AtomicBool::new(false),
        }
    }

    fn room_url(&self, room_id: &str) -> String {
        format!("{}/rooms/{}", self.base_url, room_id)
    }
}

#[async_trait]
impl MapDirectory for HttpMapClient {
    async fn register_or_update(
        &self,
        room_id: &str,
        description: &RoomDescription,
    ) -> Result<Registration, MapError> {
        let url = self.room_url(room_id);
        debug!(%url, "registering room");

        let response = self
            .client
            .put(&url)
            .json(description)
            .send()
            .await
            .map_err(|e| MapError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            self.healthy.store(false, Ordering::Relaxed);
            return Err(MapError::Rejected {
                room_id: room_id.to_string(),
                status: status.as_u16(),
            });
        }

        let registration: Registration = response
            .json()
            .await
            .map_err(|e| MapError::InvalidResponse(e.to_string()))?;

        self.healthy.store(true, Ordering::Relaxed);
        Ok(registration)
    }

    fn ok(&self) -> bool {
        self.healthy.load(Ordering::Relaxed)
    }
}
