//! Server configuration from environment variables.

use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct ServerConfig {
    pub bind_address: String,
    pub port: u16,
}

impl ServerConfig {
    /// `TASKDECK_BIND` and `TASKDECK_PORT`, defaulting to 127.0.0.1:4000.
    pub fn from_env() -> Self {
        let bind_address =
            std::env::var("TASKDECK_BIND").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = std::env::var("TASKDECK_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(4000);
        Self { bind_address, port }
    }
}
