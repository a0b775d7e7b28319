use anyhow::{anyhow, Context, Result};
use common_auth::JwtConfig;
use std::env;
use std::net::{IpAddr, SocketAddr};
use tracing::warn;

pub const DEFAULT_JWT_SECRET: &str = "My_secret_key";
pub const DEFAULT_PORT: u16 = 4001;

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub host: IpAddr,
    pub port: u16,
    pub jwt: JwtConfig,
    /// Origins allowed by CORS. Empty means any origin.
    pub allowed_origins: Vec<String>,
}

impl ServiceConfig {
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::from((self.host, self.port))
    }

    /// Defaults used by tests and local runs.
    pub fn with_secret(secret: impl Into<String>) -> Self {
        Self {
            host: IpAddr::from([127, 0, 0, 1]),
            port: DEFAULT_PORT,
            jwt: JwtConfig::new(secret),
            allowed_origins: Vec::new(),
        }
    }
}

pub fn load_service_config() -> Result<ServiceConfig> {
    let host: IpAddr = env::var("HOST")
        .unwrap_or_else(|_| "0.0.0.0".to_string())
        .parse()
        .context("Failed to parse HOST")?;

    let port = match env::var("PORT") {
        Ok(value) => value
            .trim()
            .parse::<u16>()
            .map_err(|err| anyhow!("Invalid PORT '{value}': {err}"))?,
        Err(_) => DEFAULT_PORT,
    };

    let secret = match env::var("JWT_SECRET").ok().and_then(|value| normalize_optional(&value)) {
        Some(secret) => secret,
        None => {
            warn!("JWT_SECRET not set; falling back to the built-in development secret");
            DEFAULT_JWT_SECRET.to_string()
        }
    };

    let mut jwt = JwtConfig::new(secret);
    if let Some(leeway) = parse_env::<u32>("JWT_LEEWAY_SECONDS")? {
        jwt = jwt.with_leeway(leeway);
    }
    if let Some(ttl) = parse_env::<i64>("JWT_TTL_SECONDS")? {
        if ttl <= 0 {
            return Err(anyhow!("JWT_TTL_SECONDS must be positive, got {ttl}"));
        }
        jwt = jwt.with_token_ttl(ttl);
    }

    let allowed_origins = env::var("CORS_ALLOWED_ORIGINS")
        .ok()
        .map(|value| parse_list(&value))
        .unwrap_or_default();

    Ok(ServiceConfig {
        host,
        port,
        jwt,
        allowed_origins,
    })
}

fn parse_env<T>(key: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(value) => value
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|err| anyhow!("Invalid {key} '{value}': {err}")),
        Err(_) => Ok(None),
    }
}

fn parse_list(value: &str) -> Vec<String> {
    value
        .split(|c| c == ',' || c == ';' || c == ' ')
        .filter_map(normalize_optional)
        .collect()
}

fn normalize_optional(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
