use serde::{de::Deserializer, Deserialize, Serialize};
use std::{fmt, time::Duration};

use crate::ConfigError;

/// Environment variable overriding [`Config::api_base_url`].
pub const API_URL_ENV: &str = "CONDO_WIZARD_API_URL";

/// Stores user-configurable console preferences.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub locale: String,
    pub api_base_url: String,
    /// Per-request timeout. `None` leaves the transport default in place.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,
    /// Shown when a failed request carries no server message.
    #[serde(default = "Config::default_generic_error_message")]
    pub generic_error_message: String,
    #[serde(default)]
    pub unroutable_issues: UnroutablePolicy,
    #[serde(default = "Config::default_ui_color_enabled")]
    pub ui_color_enabled: bool,
    /// Organization the console operates on; sent along with every request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: "pt-BR".into(),
            api_base_url: Self::default_api_base_url(),
            request_timeout_secs: None,
            generic_error_message: Self::default_generic_error_message(),
            unroutable_issues: UnroutablePolicy::default(),
            ui_color_enabled: Self::default_ui_color_enabled(),
            organization_id: None,
        }
    }
}

impl Config {
    pub fn default_api_base_url() -> String {
        "http://localhost:3000/api".into()
    }

    pub fn default_generic_error_message() -> String {
        "Something went wrong. Please try again.".into()
    }

    pub fn default_ui_color_enabled() -> bool {
        true
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    /// Applies environment overrides on top of the persisted values.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var(API_URL_ENV) {
            if !url.trim().is_empty() {
                self.api_base_url = url.trim().to_string();
            }
        }
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = self.api_base_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::Invalid {
                key: "api_base_url",
                message: format!("`{}` is not an http(s) URL", self.api_base_url),
            });
        }
        if self.request_timeout_secs == Some(0) {
            return Err(ConfigError::Invalid {
                key: "request_timeout_secs",
                message: "timeout must be at least one second".into(),
            });
        }
        if self.generic_error_message.trim().is_empty() {
            return Err(ConfigError::Invalid {
                key: "generic_error_message",
                message: "fallback message cannot be empty".into(),
            });
        }
        Ok(())
    }
}

/// What to do with validation issues naming a field no form step owns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UnroutablePolicy {
    /// Discard them silently.
    Drop,
    /// Report them as one aggregate warning notification.
    Warn,
}

impl UnroutablePolicy {
    fn from_value(value: Option<String>) -> Self {
        value
            .map(|v| UnroutablePolicy::from_str(v.trim()))
            .unwrap_or_default()
    }

    pub fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "drop" => UnroutablePolicy::Drop,
            _ => UnroutablePolicy::Warn,
        }
    }
}

impl Default for UnroutablePolicy {
    fn default() -> Self {
        UnroutablePolicy::Warn
    }
}

impl fmt::Display for UnroutablePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            UnroutablePolicy::Drop => "drop",
            UnroutablePolicy::Warn => "warn",
        };
        f.write_str(label)
    }
}

impl<'de> Deserialize<'de> for UnroutablePolicy {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<String>::deserialize(deserializer)?;
        Ok(UnroutablePolicy::from_value(value))
    }
}
