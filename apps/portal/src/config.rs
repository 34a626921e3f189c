use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::gateway::InvalidationPolicy;

const DEFAULT_API_BASE_URL: &str = "http://localhost:8081/api";

/// Client configuration loaded from environment variables.
/// Every variable has a default, so a bare `portal` invocation talks to a local backend.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_base_url: String,
    pub session_file: PathBuf,
    pub http_timeout_secs: u64,
    pub invalidation_policy: InvalidationPolicy,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let invalidate_on_forbidden = match std::env::var("PORTAL_INVALIDATE_ON_FORBIDDEN") {
            Ok(v) => parse_bool(&v)
                .with_context(|| format!("PORTAL_INVALIDATE_ON_FORBIDDEN must be a boolean, got '{v}'"))?,
            Err(_) => true,
        };

        Ok(Config {
            api_base_url: std::env::var("API_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string()),
            session_file: match std::env::var("PORTAL_SESSION_FILE") {
                Ok(path) => PathBuf::from(path),
                Err(_) => default_session_file()?,
            },
            http_timeout_secs: std::env::var("HTTP_TIMEOUT_SECS")
                .unwrap_or_else(|_| "30".to_string())
                .parse::<u64>()
                .context("HTTP_TIMEOUT_SECS must be a whole number of seconds")?,
            invalidation_policy: if invalidate_on_forbidden {
                InvalidationPolicy::UnauthorizedAndForbidden
            } else {
                InvalidationPolicy::UnauthorizedOnly
            },
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn default_session_file() -> Result<PathBuf> {
    let base = dirs::config_dir().context("Could not determine the user config directory")?;
    Ok(base.join("hireportal").join("session.json"))
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bool_accepts_common_spellings() {
        assert_eq!(parse_bool("TRUE"), Some(true));
        assert_eq!(parse_bool(" on "), Some(true));
        assert_eq!(parse_bool("0"), Some(false));
        assert_eq!(parse_bool("no"), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }
}
