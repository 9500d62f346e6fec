use std::time::Duration;

use serde::{Deserialize, Serialize};

use aml_core::config::{active_profile, profiled_env_opt, profiled_env_or, profiled_env_u32, profiled_env_u64};

pub const DEFAULT_BASE_URL: &str = "https://api.trustin.info/api/v2/investigate";
const DEFAULT_MAX_RETRIES: u32 = 30;
const DEFAULT_POLL_INTERVAL_MS: u64 = 2000;
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_RESULT_TOKEN: &str = "usdt";

// ── ProviderConfig ──────────────────────────────────────────────────

/// Connection settings for the TrustIn investigate API.
///
/// Reads from environment variables with an optional profile prefix.
/// When `AML_PROFILE=PROD`, checks `PROD_TRUSTIN_API_KEY` before `TRUSTIN_API_KEY`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub base_url: String,
    /// Status checks before a task is declared timed out.
    pub max_retries: u32,
    /// Fixed sleep between status checks.
    pub poll_interval: Duration,
    /// Per-request HTTP timeout.
    pub request_timeout: Duration,
    /// Token the result amounts are denominated in.
    pub token: String,
}

impl ProviderConfig {
    pub fn from_env() -> Self {
        Self::for_profile(&active_profile())
    }

    pub fn for_profile(profile: &str) -> Self {
        Self {
            api_key: profiled_env_opt(profile, "TRUSTIN_API_KEY"),
            base_url: profiled_env_or(profile, "TRUSTIN_BASE_URL", DEFAULT_BASE_URL)
                .trim_end_matches('/')
                .to_string(),
            max_retries: profiled_env_u32(profile, "TRUSTIN_POLL_MAX_RETRIES", DEFAULT_MAX_RETRIES),
            poll_interval: Duration::from_millis(profiled_env_u64(
                profile,
                "TRUSTIN_POLL_INTERVAL_MS",
                DEFAULT_POLL_INTERVAL_MS,
            )),
            request_timeout: Duration::from_secs(profiled_env_u64(
                profile,
                "TRUSTIN_TIMEOUT_SECS",
                DEFAULT_TIMEOUT_SECS,
            )),
            token: DEFAULT_RESULT_TOKEN.to_string(),
        }
    }

    /// Override the API key, e.g. from a CLI flag. Empty keys are ignored.
    pub fn with_api_key(mut self, key: Option<String>) -> Self {
        if let Some(key) = key.filter(|k| !k.is_empty()) {
            self.api_key = Some(key);
        }
        self
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            max_retries: DEFAULT_MAX_RETRIES,
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            token: DEFAULT_RESULT_TOKEN.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Each test uses its own profile prefix so parallel tests never share keys.

    #[test]
    fn profile_keys_take_precedence() {
        std::env::set_var("PROVTESTA_TRUSTIN_API_KEY", "profiled-key");
        std::env::set_var("PROVTESTA_TRUSTIN_POLL_MAX_RETRIES", "4");
        std::env::set_var("PROVTESTA_TRUSTIN_BASE_URL", "http://localhost:9000/investigate/");

        let config = ProviderConfig::for_profile("PROVTESTA");
        assert_eq!(config.api_key.as_deref(), Some("profiled-key"));
        assert_eq!(config.max_retries, 4);
        assert_eq!(config.base_url, "http://localhost:9000/investigate");
        assert_eq!(config.token, "usdt");
    }

    #[test]
    fn unparseable_numbers_fall_back_to_defaults() {
        std::env::set_var("PROVTESTB_TRUSTIN_POLL_INTERVAL_MS", "soon");
        let config = ProviderConfig::for_profile("PROVTESTB");
        assert_eq!(config.poll_interval, Duration::from_millis(2000));
        assert_eq!(config.request_timeout, Duration::from_secs(30));
    }

    #[test]
    fn cli_key_overrides_env() {
        let config = ProviderConfig::default().with_api_key(Some("flag".into()));
        assert_eq!(config.api_key.as_deref(), Some("flag"));
        let config = ProviderConfig::default().with_api_key(Some(String::new()));
        assert!(!config.has_api_key());
    }
}
