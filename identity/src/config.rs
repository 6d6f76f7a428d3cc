/*
 * Responsibility
 * - 両サービス共通の HTTP 設定 (credential の header/cookie 名, body 上限, proxy 段数, CORS)
 * - 環境変数読み込みヘルパと ConfigError
 */
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    pub fn from_env() -> Self {
        match std::env::var("APP_ENV")
            .unwrap_or_else(|_| "development".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Required variable.
pub fn require(key: &'static str) -> Result<String, ConfigError> {
    match std::env::var(key) {
        Ok(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ConfigError::Missing(key)),
    }
}

/// Optional variable; present but unparsable is an error rather than a silent default.
pub fn parse_or<T: FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match std::env::var(key) {
        Ok(v) => v.trim().parse().map_err(|_| ConfigError::Invalid(key)),
        Err(_) => Ok(default),
    }
}

pub const DEFAULT_CREDENTIAL_NAME: &str = "session-token";

#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub app_env: AppEnv,
    /// Header name carrying the credential; a cookie of the same name is the fallback.
    pub credential_name: String,
    pub max_content_size_mb: usize,
    /// Number of trusted reverse proxies in front of the service.
    pub proxy_count: usize,
    pub cors_allowed_origins: Vec<String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            app_env: AppEnv::Development,
            credential_name: DEFAULT_CREDENTIAL_NAME.to_string(),
            max_content_size_mb: 10,
            proxy_count: 0,
            cors_allowed_origins: Vec::new(),
        }
    }
}

impl HttpConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let credential_name = std::env::var("AUTH_COOKIE_NAME")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_CREDENTIAL_NAME.to_string());

        let max_content_size_mb = parse_or("MAX_CONTENT_SIZE_MB", 10usize)?;
        if max_content_size_mb == 0 {
            return Err(ConfigError::Invalid("MAX_CONTENT_SIZE_MB"));
        }

        let cors_allowed_origins = std::env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>();

        Ok(Self {
            app_env: AppEnv::from_env(),
            credential_name,
            max_content_size_mb,
            proxy_count: parse_or("PROXY_COUNT", 0usize)?,
            cors_allowed_origins,
        })
    }

    pub fn body_limit_bytes(&self) -> usize {
        self.max_content_size_mb * 1024 * 1024
    }
}
