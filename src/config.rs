use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Context;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://todos.db";
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    /// Artificial delay applied to every call against the remote store.
    pub remote_latency: Duration,
}

impl AppConfig {
    /// Reads `DATABASE_URL`, `BIND_ADDR` and `REMOTE_LATENCY_MS`. Call after
    /// `dotenvy::dotenv()` so `.env` values are visible.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let database_url = lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());
        let bind_addr = lookup("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse::<SocketAddr>()
            .context("BIND_ADDR must be host:port")?;
        let remote_latency = match lookup("REMOTE_LATENCY_MS") {
            Some(raw) => Duration::from_millis(raw.parse::<u64>().context("REMOTE_LATENCY_MS must be an integer")?),
            None => Duration::ZERO,
        };
        Ok(Self { database_url, bind_addr, remote_latency })
    }
}
