use anyhow::{bail, Result};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

/// Runtime settings, read once at startup.
///
/// Variables:
/// - `OPENAI_API_KEY` (required)
/// - `OPENAI_BASE_URL` (default `https://api.openai.com/v1`)
/// - `OPENAI_MODEL` (default `gpt-4o-mini`)
/// - `BIND_ADDR` (default `0.0.0.0:3000`)
#[derive(Clone)]
pub struct Config {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub bind_addr: String,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("bind_addr", &self.bind_addr)
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| dotenvy::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let non_empty = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let Some(api_key) = non_empty("OPENAI_API_KEY") else {
            bail!("OPENAI_API_KEY is not set");
        };

        let base_url = non_empty("OPENAI_BASE_URL")
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            api_key,
            base_url,
            model: non_empty("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            bind_addr: non_empty("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
        })
    }
}
