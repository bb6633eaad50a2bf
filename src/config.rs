use std::time::Duration;

use tracing::{debug, instrument, warn};

/// Environment variable holding the OpenAI API key.
pub const API_KEY_ENV_VAR: &str = "OPENAI_API_KEY";

/// Default OpenAI API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Connection settings for the vision backend.
///
/// The credential is optional on purpose: a missing key is reported once when
/// the config is built and then left to the remote API to reject.
#[derive(Clone, PartialEq, Eq)]
pub struct VisionConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub timeout: Option<Duration>,
}

impl Default for VisionConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: None,
        }
    }
}

// Keeps the key out of logs and panic messages.
impl std::fmt::Debug for VisionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VisionConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl VisionConfig {
    /// Build a config with an explicit API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::default().with_api_key(api_key)
    }

    /// Read the API key from `OPENAI_API_KEY`.
    ///
    /// A missing or empty variable logs a warning and yields a config without
    /// a key; requests made with it fail with an authentication error.
    #[instrument(name = "vision_config_from_env")]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Like [`from_env`](Self::from_env), but resolves variables through
    /// `lookup` instead of the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let api_key = lookup(API_KEY_ENV_VAR).filter(|key| !key.trim().is_empty());

        match &api_key {
            Some(key) => debug!(key_len = key.len(), "Loaded API key from environment"),
            None => warn!(
                env_var = API_KEY_ENV_VAR,
                "OpenAI API key is not set; requests will fail until {} is provided",
                API_KEY_ENV_VAR
            ),
        }

        Self {
            api_key,
            ..Self::default()
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            warn!("Empty API key supplied; treating it as missing");
            self.api_key = None;
        } else {
            self.api_key = Some(api_key);
        }
        self
    }

    /// Point at an OpenAI-compatible endpoint (proxy, mock server, local model).
    /// Trailing slashes are trimmed.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_points_at_openai() {
        let config = VisionConfig::default();
        assert_eq!(config.base_url, "https://api.openai.com/v1");
        assert!(!config.has_api_key());
        assert!(config.timeout.is_none());
    }

    #[test]
    fn test_lookup_without_key_still_builds() {
        let config = VisionConfig::from_lookup(|_| None);
        assert_eq!(config.api_key, None);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_lookup_blank_key_is_missing() {
        let config = VisionConfig::from_lookup(|_| Some("  \n".to_string()));
        assert!(!config.has_api_key());
    }

    #[test]
    fn test_lookup_reads_openai_key_variable() {
        let config = VisionConfig::from_lookup(|name| {
            (name == "OPENAI_API_KEY").then(|| "sk-from-env".to_string())
        });
        assert_eq!(config.api_key.as_deref(), Some("sk-from-env"));
    }

    #[test]
    fn test_blank_key_is_missing() {
        let config = VisionConfig::new("   ");
        assert!(!config.has_api_key());
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let config = VisionConfig::new("sk-test").with_base_url("http://localhost:8080/v1/");
        assert_eq!(config.base_url, "http://localhost:8080/v1");
    }

    #[test]
    fn test_debug_redacts_key() {
        let config = VisionConfig::new("sk-secret");
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("sk-secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
