use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value '{value}' for {var}: {reason}")]
    InvalidValue {
        var: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub addr: SocketAddr,
    pub db_path: PathBuf,
    /// JSON seed document loaded into the database at startup, if set.
    pub seed_file: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Builds the config from any variable source; unset variables fall back
    /// to their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("TABLETOP_HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port_raw = lookup("TABLETOP_PORT").unwrap_or_else(|| "9090".into());
        let port: u16 = port_raw.parse().map_err(|e: std::num::ParseIntError| {
            ConfigError::InvalidValue {
                var: "TABLETOP_PORT",
                value: port_raw.clone(),
                reason: e.to_string(),
            }
        })?;

        let addr_raw = format!("{}:{}", host, port);
        let addr: SocketAddr = addr_raw
            .parse()
            .map_err(|e: std::net::AddrParseError| ConfigError::InvalidValue {
                var: "TABLETOP_HOST",
                value: host.clone(),
                reason: e.to_string(),
            })?;

        let db_path = lookup("TABLETOP_DB_PATH")
            .unwrap_or_else(|| "tabletop.db".into())
            .into();
        let seed_file = lookup("TABLETOP_SEED_FILE")
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);

        Ok(Self {
            addr,
            db_path,
            seed_file,
        })
    }
}
