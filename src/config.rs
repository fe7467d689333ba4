// SPDX-License-Identifier: MIT

//! Application configuration loaded from environment variables.
//!
//! The CSRF key belongs to the protection layer mounted in front of the
//! application, but its persistence is part of the on-disk layout contract:
//! it is generated once and stored under the data directory so it survives
//! restarts.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use ring::rand::{SecureRandom, SystemRandom};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::storage::layout;

/// Default length for the generated first-run admin password.
pub const DEFAULT_BOOTSTRAP_PASSWORD_LENGTH: usize = 16;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,
    /// Root of all durable state
    pub data_dir: PathBuf,
    /// Length of the generated first-run admin password
    pub bootstrap_password_length: usize,
    /// Persisted key for the CSRF-protection layer in front of the app
    pub csrf_key: Vec<u8>,
    /// Production mode: secure (HTTPS-only) session cookies
    pub is_prod: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to create data directory {0}: {1}")]
    DataDir(PathBuf, #[source] std::io::Error),

    #[error("CSRF_KEY is not valid base64: {0}")]
    InvalidCsrfKey(#[source] base64::DecodeError),

    #[error("failed to persist CSRF key: {0}")]
    PersistCsrfKey(#[source] std::io::Error),

    #[error("system random source unavailable")]
    Random,
}

impl Config {
    /// Load configuration from environment variables (and `.env` if present).
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let port = env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8080);

        let data_dir = PathBuf::from(env::var("DATA_DIR").unwrap_or_else(|_| "data".to_string()));

        let bootstrap_password_length = env::var("BOOTSTRAP_PASSWORD_LENGTH")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_BOOTSTRAP_PASSWORD_LENGTH);

        let is_prod = env::var("ENV").map(|v| v == "production").unwrap_or(false);

        let csrf_key = load_csrf_key(&data_dir)?;

        Ok(Self {
            port,
            data_dir,
            bootstrap_password_length,
            csrf_key,
            is_prod,
        })
    }

    /// Default config for testing only.
    pub fn test_default(data_dir: PathBuf) -> Self {
        Self {
            port: 0,
            data_dir,
            bootstrap_password_length: DEFAULT_BOOTSTRAP_PASSWORD_LENGTH,
            csrf_key: vec![0u8; 32],
            is_prod: false,
        }
    }
}

/// Resolve the CSRF key: `CSRF_KEY` env var wins, then the persisted key
/// file, then a freshly generated key written back for future restarts.
fn load_csrf_key(data_dir: &Path) -> Result<Vec<u8>, ConfigError> {
    if let Ok(key) = env::var("CSRF_KEY") {
        return STANDARD.decode(key.trim()).map_err(ConfigError::InvalidCsrfKey);
    }

    let key_file = data_dir.join(layout::CSRF_KEY_FILE);
    if let Ok(data) = fs::read_to_string(&key_file) {
        if let Ok(key) = STANDARD.decode(data.trim()) {
            if key.len() == 32 {
                return Ok(key);
            }
        }
    }

    fs::create_dir_all(data_dir)
        .map_err(|e| ConfigError::DataDir(data_dir.to_path_buf(), e))?;

    let mut key = vec![0u8; 32];
    SystemRandom::new()
        .fill(&mut key)
        .map_err(|_| ConfigError::Random)?;

    fs::write(&key_file, STANDARD.encode(&key)).map_err(ConfigError::PersistCsrfKey)?;

    Ok(key)
}
