use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Model credential, resolved secrets-file-first, environment second.
    /// `None` is a user-visible configuration error surfaced on each fetch
    /// attempt — never a startup crash.
    pub gemini_api_key: Option<String>,
    pub port: u16,
    pub rust_log: String,
}

const DEFAULT_SECRETS_PATH: &str = "/run/secrets/gemini_api_key";

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            gemini_api_key: resolve_api_key(),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

/// Secrets store first (a mounted file, path overridable via
/// GEMINI_API_KEY_FILE), plain environment variable second.
fn resolve_api_key() -> Option<String> {
    let path = std::env::var("GEMINI_API_KEY_FILE")
        .unwrap_or_else(|_| DEFAULT_SECRETS_PATH.to_string());
    if let Ok(contents) = std::fs::read_to_string(&path) {
        let key = contents.trim();
        if !key.is_empty() {
            return Some(key.to_string());
        }
    }

    std::env::var("GEMINI_API_KEY")
        .ok()
        .map(|key| key.trim().to_string())
        .filter(|key| !key.is_empty())
}
