use std::str::FromStr;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Everything has a default; a missing `GOOGLE_API_KEY` only disables the
/// language-model features.
#[derive(Debug, Clone)]
pub struct Config {
    pub google_api_key: Option<String>,
    pub llm_model: String,
    pub llm_timeout_secs: u64,
    pub max_resume_size_mb: u64,
    pub max_request_body_mb: usize,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let defaults = Config::default();

        Ok(Config {
            google_api_key: optional_env("GOOGLE_API_KEY"),
            llm_model: optional_env("LLM_MODEL").unwrap_or(defaults.llm_model),
            llm_timeout_secs: parse_env("LLM_TIMEOUT_SECS", defaults.llm_timeout_secs)?,
            max_resume_size_mb: parse_env("MAX_RESUME_SIZE_MB", defaults.max_resume_size_mb)?,
            max_request_body_mb: parse_env("MAX_REQUEST_BODY_MB", defaults.max_request_body_mb)?,
            port: parse_env("PORT", defaults.port)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or(defaults.rust_log),
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            google_api_key: None,
            llm_model: "gemini-1.5-flash-latest".to_string(),
            llm_timeout_secs: 60,
            max_resume_size_mb: 200,
            max_request_body_mb: 1024,
            port: 5000,
            rust_log: "info".to_string(),
        }
    }
}

/// Blank values count as unset.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_env<T: FromStr>(key: &str, default: T) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_env(key) {
        Some(raw) => raw
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        None => Ok(default),
    }
}
