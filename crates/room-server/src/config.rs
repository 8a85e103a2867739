//! Configuration for the room server.
//!
//! Everything comes from environment variables, falling back to defaults:
//!
//! - `ROOM_BIND_ADDR`     (default: "0.0.0.0")
//! - `ROOM_PORT`          (default: "9080")
//! - `ROOM_MAX_SESSIONS`  (default: "1024")
//! - `ROOM_ID`            (unset: the room runs standalone)
//! - `ROOM_NAME`, `ROOM_FULL_NAME`, `ROOM_DESCRIPTION`
//! - `MAP_URL`            (unset: no map registration)
//! - `MAP_TIMEOUT_SECS`   (default: "10")
//! - `NEWS_URL`, `NEWS_API_KEY`
//! - `NEWS_TIMEOUT_SECS`  (default: "10")

use std::env;
use std::str::FromStr;
use std::time::Duration;

use anyhow::Context;
use room_core::description::{DEFAULT_DESCRIPTION, DEFAULT_FULL_NAME, DEFAULT_NAME};
use room_core::news::{DEFAULT_API_KEY, DEFAULT_NEWS_URL, DEFAULT_TIMEOUT};
use room_core::{NewsEndpoint, RoomDescription};

/// Server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// IP address / interface to bind to (e.g. "0.0.0.0" or "127.0.0.1").
    pub bind_addr: String,

    /// TCP port to listen on.
    pub port: u16,

    /// Maximum number of simultaneously connected sessions.
    pub max_sessions: usize,

    /// Raw room id from the environment; see `RoomIdentity::resolve`.
    pub room_id: Option<String>,

    pub room_name: String,
    pub room_full_name: String,
    pub room_description: String,

    /// Base URL of the map service.
    pub map_url: Option<String>,
    pub map_timeout: Duration,

    pub news: NewsEndpoint,
    pub news_timeout: Duration,
}

impl Config {
    /// Construct a `Config` from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        Config::from_lookup(|key| env::var(key).ok())
    }

    /// Construct a `Config` from any key lookup (the environment, a test map).
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let text = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let map_timeout_secs = read_or_default(&lookup, "MAP_TIMEOUT_SECS", 10u64)?;
        let news_timeout_secs =
            read_or_default(&lookup, "NEWS_TIMEOUT_SECS", DEFAULT_TIMEOUT.as_secs())?;

        Ok(Config {
            bind_addr: text("ROOM_BIND_ADDR", "0.0.0.0"),
            port: read_or_default(&lookup, "ROOM_PORT", 9080u16)?,
            max_sessions: read_or_default(&lookup, "ROOM_MAX_SESSIONS", 1024usize)?,
            room_id: lookup("ROOM_ID"),
            room_name: text("ROOM_NAME", DEFAULT_NAME),
            room_full_name: text("ROOM_FULL_NAME", DEFAULT_FULL_NAME),
            room_description: text("ROOM_DESCRIPTION", DEFAULT_DESCRIPTION),
            map_url: lookup("MAP_URL").filter(|url| !url.trim().is_empty()),
            map_timeout: Duration::from_secs(map_timeout_secs),
            news: NewsEndpoint {
                base_url: text("NEWS_URL", DEFAULT_NEWS_URL),
                api_key: text("NEWS_API_KEY", DEFAULT_API_KEY),
            },
            news_timeout: Duration::from_secs(news_timeout_secs),
        })
    }

    /// Convenience: `addr:port` socket string.
    pub fn socket_addr_string(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }

    /// The room description before custom commands and exits are added.
    pub fn room_description(&self) -> RoomDescription {
        RoomDescription::new(
            self.room_name.clone(),
            self.room_full_name.clone(),
            self.room_description.clone(),
        )
    }
}

fn read_or_default<F, T>(lookup: &F, key: &str, default: T) -> anyhow::Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(val) => val
            .trim()
            .parse::<T>()
            .with_context(|| format!("invalid value for {key}: {val:?}")),
        None => Ok(default),
    }
}
