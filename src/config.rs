use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{Error, Result, RNC_URL};

/// Environment variable overriding [`FetchConfig::base_url`].
pub const URL_ENV: &str = "RNC_URL";

/// Fetch behaviour shared by every request of a session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FetchConfig {
    /// Search endpoint.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Pause before repeating a request answered with 429.
    #[serde(default = "default_cooldown_ms")]
    pub cooldown_ms: u64,

    /// Total timeout of one request. Defaults to the cooldown plus one second.
    #[serde(default)]
    pub timeout_ms: Option<u64>,

    /// Give up on a page after this many 429 answers. `None` retries forever.
    #[serde(default)]
    pub max_rate_limit_retries: Option<u32>,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_base_url() -> String {
    RNC_URL.to_string()
}

fn default_cooldown_ms() -> u64 {
    24_000
}

fn default_user_agent() -> String {
    format!("rnc/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            cooldown_ms: default_cooldown_ms(),
            timeout_ms: None,
            max_rate_limit_retries: None,
            user_agent: default_user_agent(),
        }
    }
}

impl FetchConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn from_json_str(contents: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(contents)?;
        config.check()?;
        Ok(config)
    }

    /// Defaults, with the base URL taken from `RNC_URL` when it is set.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(url) = std::env::var(URL_ENV) {
            if !url.trim().is_empty() {
                config.base_url = url;
            }
        }
        config
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_cooldown(mut self, cooldown: Duration) -> Self {
        self.cooldown_ms = cooldown.as_millis() as u64;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = Some(timeout.as_millis() as u64);
        self
    }

    pub fn with_max_rate_limit_retries(mut self, retries: u32) -> Self {
        self.max_rate_limit_retries = Some(retries);
        self
    }

    pub fn cooldown(&self) -> Duration {
        Duration::from_millis(self.cooldown_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms.unwrap_or(self.cooldown_ms + 1_000))
    }

    fn check(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            return Err(Error::Config("base_url is empty".into()));
        }
        if self.timeout_ms == Some(0) {
            return Err(Error::Config("timeout_ms must be > 0".into()));
        }
        Ok(())
    }
}
