//! HTTP client for the remote news search.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use room_core::{NewsError, NewsResponse, NewsSearch};
use url::Url;

/// Plain GET against a fully rendered query URL.
#[derive(Clone)]
pub struct HttpNewsClient {
    client: Client,
}

impl HttpNewsClient {
    /// `timeout` bounds the whole request; the room applies its own
    /// deadline on top of this.
    pub fn new(timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { client }
    }
}

#[async_trait]
impl NewsSearch for HttpNewsClient {
    async fn fetch(&self, url: &Url) -> Result<NewsResponse, NewsError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| NewsError::RequestFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(NewsError::Status(response.status().as_u16()));
        }

        response
            .json()
            .await
            .map_err(|e| NewsError::InvalidResponse(e.to_string()))
    }
}
