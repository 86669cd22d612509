/*
 * Responsibility
 * - Load settings from the environment (signing secret, token TTL, DATABASE_URL, CORS, ...)
 * - Validate them once at startup (missing/invalid -> refuse to start)
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// HS256 keys shorter than the digest size are rejected.
pub const MIN_SECRET_BYTES: usize = 32;

/// Upper bound for the access token lifetime (365 days).
pub const MAX_TTL_SECONDS: u64 = 365 * 24 * 60 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    pub fn from_env() -> Self {
        Self::parse(&std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()))
    }

    pub fn parse(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, PartialEq, Eq)]
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

/// Principal seeded into the in-memory directory when no database is configured.
#[derive(Clone)]
pub struct BootstrapAdmin {
    pub username: String,
    pub password_hash: String,
}

#[derive(Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,
    pub cors_allowed_origins: Vec<String>,

    pub database_url: Option<String>,
    pub bootstrap_admin: Option<BootstrapAdmin>,

    pub auth_issuer: String,
    // Raw HS256 key bytes (decoded from JWT_SECRET)
    pub jwt_secret: Vec<u8>,
    pub access_token_ttl_seconds: u64,

    pub http_body_limit_bytes: usize,
    pub http_timeout_seconds: u64,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Do not print key material or password hashes
        f.debug_struct("Config")
            .field("addr", &self.addr)
            .field("app_env", &self.app_env)
            .field("cors_allowed_origins", &self.cors_allowed_origins)
            .field("database_configured", &self.database_url.is_some())
            .field("bootstrap_admin", &self.bootstrap_admin.is_some())
            .field("auth_issuer", &self.auth_issuer)
            .field("access_token_ttl_seconds", &self.access_token_ttl_seconds)
            .field("http_body_limit_bytes", &self.http_body_limit_bytes)
            .field("http_timeout_seconds", &self.http_timeout_seconds)
            .finish()
    }
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

        let cors_allowed_origins =
            parse_origins(&std::env::var("CORS_ALLOWED_ORIGINS").unwrap_or_default());

        let database_url = std::env::var("DATABASE_URL")
            .ok()
            .filter(|s| !s.trim().is_empty());

        let bootstrap_admin = match (
            std::env::var("ADMIN_USERNAME").ok(),
            std::env::var("ADMIN_PASSWORD_HASH").ok(),
        ) {
            (Some(username), Some(password_hash)) if !username.trim().is_empty() => {
                Some(BootstrapAdmin {
                    username: username.trim().to_string(),
                    password_hash,
                })
            }
            (Some(_), None) => return Err(ConfigError::Missing("ADMIN_PASSWORD_HASH")),
            _ => None,
        };

        let auth_issuer = std::env::var("AUTH_ISSUER").unwrap_or_else(|_| "tariff-api".to_string());

        let jwt_secret = decode_secret(
            &std::env::var("JWT_SECRET").map_err(|_| ConfigError::Missing("JWT_SECRET"))?,
        )?;

        let access_token_ttl_seconds = parse_ttl(std::env::var("ACCESS_TOKEN_TTL_SECONDS").ok())?;

        let http_body_limit_bytes = parse_positive(
            std::env::var("HTTP_BODY_LIMIT_BYTES").ok(),
            1024 * 1024,
            "HTTP_BODY_LIMIT_BYTES",
        )?;

        let http_timeout_seconds = parse_positive(
            std::env::var("HTTP_TIMEOUT_SECONDS").ok(),
            30,
            "HTTP_TIMEOUT_SECONDS",
        )?;

        Ok(Self {
            addr,
            app_env,
            cors_allowed_origins,
            database_url,
            bootstrap_admin,
            auth_issuer,
            jwt_secret,
            access_token_ttl_seconds,
            http_body_limit_bytes,
            http_timeout_seconds,
        })
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Decode the base64 signing secret and enforce the minimum key size.
pub fn decode_secret(raw: &str) -> Result<Vec<u8>, ConfigError> {
    let bytes = STANDARD
        .decode(raw.trim())
        .map_err(|_| ConfigError::Invalid("JWT_SECRET"))?;

    if bytes.len() < MIN_SECRET_BYTES {
        return Err(ConfigError::Invalid("JWT_SECRET"));
    }

    Ok(bytes)
}

// 1..=MAX_TTL_SECONDS, so `iat + ttl` always fits in the i64 `exp` claim.
fn parse_ttl(raw: Option<String>) -> Result<u64, ConfigError> {
    match raw {
        None => Ok(3600), // 1 hour
        Some(s) => match s.trim().parse::<u64>() {
            Ok(v) if (1..=MAX_TTL_SECONDS).contains(&v) => Ok(v),
            _ => Err(ConfigError::Invalid("ACCESS_TOKEN_TTL_SECONDS")),
        },
    }
}

fn parse_positive<T>(raw: Option<String>, default: T, key: &'static str) -> Result<T, ConfigError>
where
    T: FromStr + PartialOrd + Default,
{
    match raw {
        None => Ok(default),
        Some(s) => match s.trim().parse::<T>() {
            Ok(v) if v > T::default() => Ok(v),
            _ => Err(ConfigError::Invalid(key)),
        },
    }
}
