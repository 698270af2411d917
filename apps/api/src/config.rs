use anyhow::{Context, Result};

/// Default endpoint for the intelligence profiler service.
const DEFAULT_PROFILER_URL: &str = "https://docoreai.com/v1/profile";

/// Default base URL for the chat-completions provider.
const DEFAULT_COMPLETIONS_BASE_URL: &str = "https://api.openai.com/v1";

/// Application configuration loaded from environment variables.
/// Startup fails if any required variable is missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: String,
    pub model_provider: String,
    pub model_name: String,
    pub profiler_url: String,
    pub completions_base_url: String,
    pub cache_ttl_secs: u64,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            openai_api_key: require_env("OPENAI_API_KEY")?,
            model_provider: require_env("MODEL_PROVIDER")?,
            model_name: require_env("MODEL_NAME")?,
            profiler_url: std::env::var("PROFILER_URL")
                .unwrap_or_else(|_| DEFAULT_PROFILER_URL.to_string()),
            completions_base_url: std::env::var("OPENAI_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_COMPLETIONS_BASE_URL.to_string()),
            cache_ttl_secs: std::env::var("CACHE_TTL_SECS")
                .unwrap_or_else(|_| "3600".to_string())
                .parse::<u64>()
                .context("CACHE_TTL_SECS must be a number of seconds")?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}
