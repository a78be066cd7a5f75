use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Startup fails if a required variable is missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub anthropic_api_key: String,
    pub port: u16,
    pub rust_log: String,
    /// Model re-issues after a whole response was rejected.
    pub chat_max_retries: u32,
    /// Trailing transcript messages forwarded to the model.
    pub chat_history_window: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            chat_max_retries: parse_env("CHAT_MAX_RETRIES", 1)?,
            chat_history_window: parse_env("CHAT_HISTORY_WINDOW", 6)?,
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_env_default_and_override() {
        std::env::remove_var("RESUME_CHAT_TEST_UNSET");
        assert_eq!(parse_env("RESUME_CHAT_TEST_UNSET", 6usize).unwrap(), 6);

        std::env::set_var("RESUME_CHAT_TEST_WINDOW", " 10 ");
        assert_eq!(parse_env("RESUME_CHAT_TEST_WINDOW", 6usize).unwrap(), 10);

        std::env::set_var("RESUME_CHAT_TEST_BAD", "lots");
        assert!(parse_env("RESUME_CHAT_TEST_BAD", 1u32).is_err());
    }
}
