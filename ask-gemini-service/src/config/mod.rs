use crate::services::providers::gemini::GEMINI_API_BASE;
use secrecy::Secret;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;
use std::time::Duration;

/// Model used when `GEMINI_MODEL` is not set.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Upstream request deadline used when `GEMINI_TIMEOUT_SECS` is not set.
const DEFAULT_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Clone)]
pub struct AskGeminiConfig {
    pub common: core_config::Config,
    pub gemini: GeminiSettings,
}

#[derive(Debug, Clone)]
pub struct GeminiSettings {
    /// `None` when the secret was not injected; requests then fail with 500.
    pub api_key: Option<Secret<String>>,
    pub model: String,
    pub api_base: String,
    pub timeout: Duration,
}

impl AskGeminiConfig {
    pub fn load() -> Result<Self, AppError> {
        let common = core_config::Config::load()?;

        let timeout_secs = get_env("GEMINI_TIMEOUT_SECS", &DEFAULT_TIMEOUT_SECS.to_string());
        let timeout_secs: u64 = timeout_secs.parse().map_err(|e| {
            AppError::ConfigError(anyhow::anyhow!(
                "GEMINI_TIMEOUT_SECS must be a whole number of seconds, got '{}': {}",
                timeout_secs,
                e
            ))
        })?;

        Ok(AskGeminiConfig {
            common,
            gemini: GeminiSettings {
                api_key: get_secret("GEMINI_API_KEY"),
                model: get_env("GEMINI_MODEL", DEFAULT_MODEL),
                api_base: get_env("GEMINI_API_BASE", GEMINI_API_BASE),
                timeout: Duration::from_secs(timeout_secs),
            },
        })
    }
}

fn get_env(key: &str, default: &str) -> String {
    env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

/// An unset or blank secret counts as missing.
fn get_secret(key: &str) -> Option<Secret<String>> {
    env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(Secret::new)
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn get_env_falls_back_on_unset_and_blank() {
        env::remove_var("ASK_GEMINI_TEST_UNSET");
        assert_eq!(get_env("ASK_GEMINI_TEST_UNSET", "fallback"), "fallback");

        env::set_var("ASK_GEMINI_TEST_BLANK", "  ");
        assert_eq!(get_env("ASK_GEMINI_TEST_BLANK", "fallback"), "fallback");

        env::set_var("ASK_GEMINI_TEST_SET", "gemini-pro");
        assert_eq!(get_env("ASK_GEMINI_TEST_SET", "fallback"), "gemini-pro");
    }

    #[test]
    fn blank_secret_is_missing() {
        env::set_var("ASK_GEMINI_TEST_EMPTY_KEY", "");
        assert!(get_secret("ASK_GEMINI_TEST_EMPTY_KEY").is_none());

        env::set_var("ASK_GEMINI_TEST_KEY", "sk-test");
        let key = get_secret("ASK_GEMINI_TEST_KEY").expect("secret present");
        assert_eq!(key.expose_secret(), "sk-test");
    }
}
