//! Client settings from the environment and flags.

use std::{env, time::Duration};

use gymdesk_shared::wire::DEFAULT_API_BASE;

const DEFAULT_TIMEOUT_SECONDS: u64 = 30;
const MIN_TIMEOUT_SECONDS: u64 = 3;

/// Connection settings for the admin API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Admin API root, without a trailing slash.
    pub api_base: String,
    /// Bearer token.
    pub token: Option<String>,
    /// Whole-request timeout.
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            token: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECONDS),
        }
    }
}

impl ClientConfig {
    /// Reads `GYMDESK_API_BASE`, `GYMDESK_TOKEN` and
    /// `GYMDESK_HTTP_TIMEOUT_SECONDS`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// [`Self::from_env`] over an arbitrary lookup. Blank values count as
    /// unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let api_base = non_empty("GYMDESK_API_BASE")
            .map(|value| normalize_base(&value))
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());
        let timeout = non_empty("GYMDESK_HTTP_TIMEOUT_SECONDS")
            .and_then(|value| value.parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECONDS)
            .max(MIN_TIMEOUT_SECONDS);

        Self {
            api_base,
            token: non_empty("GYMDESK_TOKEN"),
            timeout: Duration::from_secs(timeout),
        }
    }

    /// Command-line flags win over the environment.
    pub fn with_overrides(mut self, api_base: Option<String>, token: Option<String>) -> Self {
        if let Some(api_base) = api_base.filter(|value| !value.trim().is_empty()) {
            self.api_base = normalize_base(&api_base);
        }
        if let Some(token) = token.filter(|value| !value.trim().is_empty()) {
            self.token = Some(token.trim().to_string());
        }
        self
    }
}

fn normalize_base(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_env_is_empty() {
        let config = ClientConfig::from_lookup(lookup(&[("GYMDESK_TOKEN", "  ")]));
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn env_values_are_normalized() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("GYMDESK_API_BASE", "https://admin.example.com/api/admin/"),
            ("GYMDESK_TOKEN", "abc"),
            ("GYMDESK_HTTP_TIMEOUT_SECONDS", "1"),
        ]));
        assert_eq!(config.api_base, "https://admin.example.com/api/admin");
        assert_eq!(config.token.as_deref(), Some("abc"));
        assert_eq!(config.timeout, Duration::from_secs(3));
    }

    #[test]
    fn flags_override_env() {
        let config = ClientConfig::from_lookup(lookup(&[("GYMDESK_TOKEN", "from-env")]))
            .with_overrides(Some("http://127.0.0.1:9000/api/admin".to_string()), Some("from-flag".to_string()));
        assert_eq!(config.api_base, "http://127.0.0.1:9000/api/admin");
        assert_eq!(config.token.as_deref(), Some("from-flag"));
    }
}
