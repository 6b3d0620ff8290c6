//! Server settings from environment: `RPC_BIND_ADDR`, `RPC_BODY_LIMIT`, `SCHEMA_PATH`.

use crate::config::DEFAULT_SCHEMA_PATH;
use crate::error::ConfigError;
use std::path::PathBuf;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
/// 1 MiB
pub const DEFAULT_BODY_LIMIT: usize = 1024 * 1024;

#[derive(Clone, Debug)]
pub struct Settings {
    pub bind_addr: String,
    pub body_limit: usize,
    pub schema_path: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            body_limit: DEFAULT_BODY_LIMIT,
            schema_path: PathBuf::from(DEFAULT_SCHEMA_PATH),
        }
    }
}

impl Settings {
    /// Reads the process environment after loading `.env`, if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut settings = Self::default();
        if let Some(addr) = lookup("RPC_BIND_ADDR") {
            settings.bind_addr = addr;
        }
        if let Some(raw) = lookup("RPC_BODY_LIMIT") {
            settings.body_limit = raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::Validation(format!("RPC_BODY_LIMIT must be a byte count, got '{}'", raw)))?;
        }
        if let Some(path) = lookup("SCHEMA_PATH") {
            settings.schema_path = PathBuf::from(path);
        }
        Ok(settings)
    }
}
