use std::net::SocketAddr;

use identity::config::{self, ConfigError, HttpConfig};

/// 100 years. Keeps `iat + ttl` inside the timestamp range chrono and JWT `exp` can represent.
pub const MAX_TOKEN_EXPIRATION_HOURS: u32 = 24 * 365 * 100;

#[derive(Clone, Debug)]
pub struct Config {
    /// Public HTTP listener.
    pub addr: SocketAddr,
    /// Internal RPC listener (validate-user, create-token).
    pub rpc_addr: SocketAddr,
    pub http: HttpConfig,
    // HS256 shared secret; never leaves this process.
    pub jwt_key: String,
    pub token_expiration_hours: u32,
    pub people_rpc_url: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let http = HttpConfig::from_env()?;

        let port: u16 = config::parse_or("AUTH_PORT", 8080)?;
        let rpc_port: u16 = config::parse_or("AUTH_RPC_PORT", 8084)?;

        let jwt_key = config::require("JWT_KEY")?;

        let token_expiration_hours: u32 = config::parse_or("TOKEN_EXPIRATION_HOURS", 24)?;
        if token_expiration_hours == 0 || token_expiration_hours > MAX_TOKEN_EXPIRATION_HOURS {
            return Err(ConfigError::Invalid("TOKEN_EXPIRATION_HOURS"));
        }

        let people_rpc_url = std::env::var("PEOPLE_RPC_URL")
            .unwrap_or_else(|_| "http://127.0.0.1:8083".to_string());

        Ok(Config {
            addr: SocketAddr::from(([0, 0, 0, 0], port)),
            rpc_addr: SocketAddr::from(([0, 0, 0, 0], rpc_port)),
            http,
            jwt_key,
            token_expiration_hours,
            people_rpc_url,
        })
    }
}
