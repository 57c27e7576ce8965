//! Process configuration, read once from the environment at startup.
//!
//! Nothing in the request path reads environment variables; the parsed
//! `GatewayConfig` is handed to the route table, token verifier and upstream
//! client constructors instead.

use std::time::Duration;

use crate::error::AppError;
use crate::state::security_config::SecurityConfig;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_UPSTREAM_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_MAX_BODY_BYTES: usize = 1024 * 1024;

/// Base URLs of the backend services.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceUrls {
    pub auth: String,
    pub blog: String,
    pub comment: String,
    pub profile: String,
}

impl Default for ServiceUrls {
    fn default() -> Self {
        Self {
            auth: "http://localhost:3001".to_string(),
            blog: "http://localhost:3002".to_string(),
            comment: "http://localhost:3003".to_string(),
            profile: "http://localhost:3004".to_string(),
        }
    }
}

/// Immutable gateway configuration.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub host: String,
    pub port: u16,
    pub security: SecurityConfig,
    pub services: ServiceUrls,
    /// Upper bound on a single backend exchange, connect through body
    pub upstream_timeout: Duration,
    pub max_body_bytes: usize,
    /// Empty means the localhost development origins
    pub cors_allowed_origins: Vec<String>,
}

impl GatewayConfig {
    /// Defaults for everything except the shared secret.
    pub fn new(security: SecurityConfig) -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            security,
            services: ServiceUrls::default(),
            upstream_timeout: DEFAULT_UPSTREAM_TIMEOUT,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            cors_allowed_origins: Vec::new(),
        }
    }

    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let secret = var("JWT_SECRET")
            .ok_or_else(|| AppError::config("JWT_SECRET must be set".to_string()))?;
        let mut config = Self::new(SecurityConfig::new(secret.into_bytes()));

        if let Some(host) = var("GATEWAY_HOST") {
            config.host = host;
        }
        if let Some(port) = var("PORT") {
            config.port = parse_number("PORT", &port)?;
        }

        let defaults = ServiceUrls::default();
        config.services = ServiceUrls {
            auth: var("AUTH_SERVICE_URL").unwrap_or(defaults.auth),
            blog: var("BLOG_SERVICE_URL").unwrap_or(defaults.blog),
            comment: var("COMMENT_SERVICE_URL").unwrap_or(defaults.comment),
            profile: var("PROFILE_SERVICE_URL").unwrap_or(defaults.profile),
        };

        if let Some(secs) = var("UPSTREAM_TIMEOUT_SECS") {
            let secs: u64 = parse_number("UPSTREAM_TIMEOUT_SECS", &secs)?;
            if secs == 0 {
                return Err(AppError::config(
                    "UPSTREAM_TIMEOUT_SECS must be greater than zero".to_string(),
                ));
            }
            config.upstream_timeout = Duration::from_secs(secs);
        }
        if let Some(limit) = var("MAX_BODY_BYTES") {
            config.max_body_bytes = parse_number("MAX_BODY_BYTES", &limit)?;
        }

        // Comma-separated, e.g. CORS_ALLOWED_ORIGINS=http://localhost:3000,https://blog.example.com
        if let Some(raw) = var("CORS_ALLOWED_ORIGINS") {
            config.cors_allowed_origins = raw
                .split(',')
                .map(|s| s.trim())
                .filter(|s| !s.is_empty() && *s != "null")
                .filter(|s| s.starts_with("http://") || s.starts_with("https://"))
                .map(|s| s.to_string())
                .collect();
        }

        Ok(config)
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T, AppError> {
    raw.trim()
        .parse()
        .map_err(|_| AppError::config(format!("{key} must be a valid number, got {raw:?}")))
}
