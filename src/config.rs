use std::{net::SocketAddr, str::FromStr};

use hyper::header::HeaderValue;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing environment variable `{0}`")]
    Missing(&'static str),

    #[error("invalid value `{value}` for `{name}`")]
    Invalid { name: &'static str, value: String },
}

/// Runtime settings, read from the environment (and `.env`) at startup
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub database_max_connections: u32,
    pub bind_address: SocketAddr,
    /// Origin allowed by CORS, any origin when unset
    pub front_url: Option<HeaderValue>,
    /// Path every route is mounted under, empty for the root
    pub api_prefix: String,
    /// Groups are listed as numbered pages only when a page size is set
    pub groups_page_size: Option<i64>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database_url = lookup("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let front_url = match lookup("FRONT_URL") {
            Some(front_url) => Some(HeaderValue::from_str(&front_url).map_err(|_| {
                ConfigError::Invalid {
                    name: "FRONT_URL",
                    value: front_url.clone(),
                }
            })?),
            None => None,
        };

        let api_prefix = lookup("API_PREFIX").unwrap_or_else(|| "/api/v1".to_string());
        let api_prefix = match api_prefix.trim_matches('/') {
            "" => String::new(),
            prefix => format!("/{prefix}"),
        };

        let groups_page_size = match lookup("GROUPS_PAGE_SIZE") {
            Some(value) => match value.parse::<i64>() {
                Ok(size) if size >= 1 => Some(size),
                _ => {
                    return Err(ConfigError::Invalid {
                        name: "GROUPS_PAGE_SIZE",
                        value,
                    })
                }
            },
            None => None,
        };

        Ok(Self {
            database_url,
            database_max_connections: parse_var(&lookup, "DATABASE_MAX_CONNECTIONS", 5)?,
            bind_address: parse_var(&lookup, "BIND_ADDRESS", SocketAddr::from(([0, 0, 0, 0], 8000)))?,
            front_url,
            api_prefix,
            groups_page_size,
        })
    }
}

fn parse_var<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(name) {
        Some(value) => value
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
        None => Ok(default),
    }
}
