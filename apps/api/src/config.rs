use std::path::PathBuf;

use anyhow::{Context, Result};

/// Process-level settings loaded from environment variables.
/// The prompt/model/export document lives in `ConfigStore`; this only says where to find it.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub config_path: PathBuf,
    pub env_path: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            config_path: env_path_or("CONFIG_PATH", "data/config.json"),
            env_path: env_path_or("ENV_FILE", ".env"),
        })
    }
}

fn env_path_or(key: &str, default: &str) -> PathBuf {
    std::env::var(key)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(default))
}
