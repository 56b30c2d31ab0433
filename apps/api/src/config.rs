use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{anyhow, Context, Result};

/// Where the analysis history is persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryBackend {
    Memory,
    File,
    Redis,
}

impl FromStr for HistoryBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(HistoryBackend::Memory),
            "file" => Ok(HistoryBackend::File),
            "redis" => Ok(HistoryBackend::Redis),
            other => Err(anyhow!(
                "unknown history backend '{other}' (expected memory, file or redis)"
            )),
        }
    }
}

/// Application configuration loaded from environment variables.
/// Fails at startup on malformed values.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub history_backend: HistoryBackend,
    pub history_dir: PathBuf,
    pub redis_url: Option<String>,
    pub max_upload_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let history_backend: HistoryBackend = env_or("HISTORY_BACKEND", "file")
            .parse()
            .context("HISTORY_BACKEND is invalid")?;

        let redis_url = std::env::var("REDIS_URL").ok();
        if history_backend == HistoryBackend::Redis && redis_url.is_none() {
            return Err(anyhow!(
                "Required environment variable 'REDIS_URL' is not set (HISTORY_BACKEND=redis)"
            ));
        }

        Ok(Config {
            port: env_or("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: env_or("RUST_LOG", "info"),
            history_backend,
            history_dir: PathBuf::from(env_or("HISTORY_DIR", "./data")),
            redis_url,
            max_upload_bytes: env_or("MAX_UPLOAD_BYTES", "10485760")
                .parse::<usize>()
                .context("MAX_UPLOAD_BYTES must be a byte count")?,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: 8080,
            rust_log: "info".to_string(),
            history_backend: HistoryBackend::Memory,
            history_dir: PathBuf::from("./data"),
            redis_url: None,
            max_upload_bytes: 10 * 1024 * 1024,
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
