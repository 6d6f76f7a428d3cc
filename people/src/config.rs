/*
 * Responsibility
 * - 環境変数の読み込み (DATABASE_URL, listener ports, auth service の RPC 先)
 * - 設定値のバリデーション (不足なら起動失敗)
 */
use std::net::SocketAddr;

use identity::config::{self, ConfigError, HttpConfig};

#[derive(Clone, Debug)]
pub struct Config {
    pub addr: SocketAddr,
    /// Internal RPC listener (account-details, validate-profile, authenticate).
    pub rpc_addr: SocketAddr,
    pub http: HttpConfig,
    pub database_url: String,
    pub auth_rpc_url: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let http = HttpConfig::from_env()?;

        let port: u16 = config::parse_or("PEOPLE_PORT", 8081)?;
        let rpc_port: u16 = config::parse_or("PEOPLE_RPC_PORT", 8083)?;

        let database_url = config::require("DATABASE_URL")?;

        let auth_rpc_url =
            std::env::var("AUTH_RPC_URL").unwrap_or_else(|_| "http://127.0.0.1:8084".to_string());

        Ok(Self {
            addr: SocketAddr::from(([0, 0, 0, 0], port)),
            rpc_addr: SocketAddr::from(([0, 0, 0, 0], rpc_port)),
            http,
            database_url,
            auth_rpc_url,
        })
    }
}
