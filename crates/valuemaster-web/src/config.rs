use std::env;
use std::net::SocketAddr;

use thiserror::Error;
use valuemaster_core::{AcquirerSetBuilder, ValidationError};

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid VALUEMASTER_BIND_ADDR '{value}': {source}")]
    InvalidBindAddr {
        value: String,
        source: std::net::AddrParseError,
    },

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Server configuration read from the environment.
pub struct WebConfig {
    pub bind_addr: SocketAddr,
    pub acquirers: AcquirerSetBuilder,
}

impl WebConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let raw = env::var("VALUEMASTER_BIND_ADDR")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| String::from(DEFAULT_BIND_ADDR));

        Ok(Self {
            bind_addr: parse_bind_addr(&raw)?,
            acquirers: AcquirerSetBuilder::from_env()?,
        })
    }
}

fn parse_bind_addr(raw: &str) -> Result<SocketAddr, ConfigError> {
    raw.trim()
        .parse()
        .map_err(|source| ConfigError::InvalidBindAddr {
            value: raw.to_owned(),
            source,
        })
}
