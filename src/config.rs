/*
 * Responsibility
 * - 環境変数の読み込み (API_BASE_URL, session 設定, CORS 許可など)
 * - 設定値のバリデーション (不足なら起動失敗)
 */
use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use url::Url;

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

/// Where browser sessions live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionBackend {
    Memory,
    Valkey { url: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,
    pub cors_allowed_origins: Vec<String>,

    pub api_base_url: Url,
    // None = no upstream timeout
    pub upstream_timeout: Option<Duration>,

    pub login_path: String,
    pub session_cookie_name: String,
    pub session_ttl: Duration,
    pub session_backend: SessionBackend,

    pub nav_menu_path: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let port: u16 = std::env::var("PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(3000);

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::from_env();

        let cors_allowed_origins = std::env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>();

        let api_base_url =
            std::env::var("API_BASE_URL").map_err(|_| ConfigError::Missing("API_BASE_URL"))?;
        let api_base_url =
            Url::parse(api_base_url.trim()).map_err(|_| ConfigError::Invalid("API_BASE_URL"))?;
        if api_base_url.cannot_be_a_base() {
            return Err(ConfigError::Invalid("API_BASE_URL"));
        }

        let upstream_timeout = match std::env::var("UPSTREAM_TIMEOUT_SECONDS") {
            Ok(v) if !v.trim().is_empty() => {
                let secs = v
                    .trim()
                    .parse::<u64>()
                    .map_err(|_| ConfigError::Invalid("UPSTREAM_TIMEOUT_SECONDS"))?;
                Some(Duration::from_secs(secs))
            }
            _ => None,
        };

        let login_path = std::env::var("LOGIN_PATH").unwrap_or_else(|_| "/login".to_string());
        if !login_path.starts_with('/') {
            return Err(ConfigError::Invalid("LOGIN_PATH"));
        }

        let session_cookie_name =
            std::env::var("SESSION_COOKIE_NAME").unwrap_or_else(|_| "cetus_sid".to_string());
        if session_cookie_name.is_empty()
            || !session_cookie_name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(ConfigError::Invalid("SESSION_COOKIE_NAME"));
        }

        let session_ttl_seconds = std::env::var("SESSION_TTL_SECONDS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(28_800); // 8 hours
        if session_ttl_seconds == 0 {
            return Err(ConfigError::Invalid("SESSION_TTL_SECONDS"));
        }

        let session_backend = match std::env::var("SESSION_STORE")
            .unwrap_or_else(|_| "memory".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "memory" => SessionBackend::Memory,
            "valkey" | "redis" => SessionBackend::Valkey {
                url: std::env::var("VALKEY_URL")
                    .map_err(|_| ConfigError::Missing("VALKEY_URL"))?,
            },
            _ => return Err(ConfigError::Invalid("SESSION_STORE")),
        };

        let nav_menu_path = std::env::var("NAV_MENU_PATH")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            addr,
            app_env,
            cors_allowed_origins,
            api_base_url,
            upstream_timeout,
            login_path,
            session_cookie_name,
            session_ttl: Duration::from_secs(session_ttl_seconds),
            session_backend,
            nav_menu_path,
        })
    }
}
