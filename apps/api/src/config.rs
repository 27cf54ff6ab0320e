use std::path::PathBuf;

use anyhow::{Context, Result};

const DEFAULT_MODEL: &str = "gemini-2.5-flash-lite";
const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_STORE_PATH: &str = "resume_output.csv";
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;
const DEFAULT_SESSION_TTL_MINUTES: i64 = 30;

/// Application configuration loaded from environment variables.
/// Startup fails if the LLM credentials are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub google_api_key: String,
    pub llm_model: String,
    pub llm_api_base: String,
    pub store_path: PathBuf,
    pub port: u16,
    pub rust_log: String,
    pub max_upload_bytes: usize,
    pub session_ttl_minutes: i64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            google_api_key: require_env("GOOGLE_API_KEY")?,
            llm_model: env_or("LLM_MODEL", DEFAULT_MODEL),
            llm_api_base: env_or("LLM_API_BASE", DEFAULT_API_BASE),
            store_path: PathBuf::from(env_or("RESUME_STORE_PATH", DEFAULT_STORE_PATH)),
            port: parse_env("PORT", 8080).context("PORT must be a valid port number")?,
            rust_log: env_or("RUST_LOG", "info"),
            max_upload_bytes: parse_env("MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)
                .context("MAX_UPLOAD_BYTES must be a byte count")?,
            session_ttl_minutes: parse_env("SESSION_TTL_MINUTES", DEFAULT_SESSION_TTL_MINUTES)
                .context("SESSION_TTL_MINUTES must be a whole number of minutes")?,
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    let value = std::env::var(key)
        .with_context(|| format!("Required environment variable '{key}' is not set"))?;
    if value.trim().is_empty() {
        anyhow::bail!("Required environment variable '{key}' is empty");
    }
    Ok(value)
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => Ok(raw.trim().parse::<T>()?),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
impl Config {
    /// Config pointing the store at `store_path`; no environment involved.
    pub fn for_tests(store_path: PathBuf) -> Self {
        Config {
            google_api_key: "test-key".to_string(),
            llm_model: DEFAULT_MODEL.to_string(),
            llm_api_base: DEFAULT_API_BASE.to_string(),
            store_path,
            port: 0,
            rust_log: "debug".to_string(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            session_ttl_minutes: DEFAULT_SESSION_TTL_MINUTES,
        }
    }
}
