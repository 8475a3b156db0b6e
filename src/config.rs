//! Configuration loading and management
//!
//! Settings come from an optional TOML file; credentials and the channel id are
//! then taken from the process environment when present.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

pub const DEFAULT_DATA_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";
pub const DEFAULT_ANALYTICS_BASE_URL: &str = "https://youtubeanalytics.googleapis.com/v2";
pub const DEFAULT_TRANSLATE_ENDPOINT: &str =
    "https://translation.googleapis.com/language/translate/v2";
pub const DEFAULT_EXEMPT_AUTHOR: &str = "@UniversiteitvanVlaanderen";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub channel: ChannelConfig,
    pub api: ApiConfig,
    pub translation: TranslationConfig,
    pub anonymize: AnonymizeConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ChannelConfig {
    /// Required for playlist enumeration only
    pub id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub data_base_url: String,
    pub analytics_base_url: String,
    /// OAuth bearer token, obtained outside this tool
    pub access_token: Option<String>,
    pub api_key: Option<String>,
    pub requests_per_second: u32,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            data_base_url: DEFAULT_DATA_BASE_URL.to_string(),
            analytics_base_url: DEFAULT_ANALYTICS_BASE_URL.to_string(),
            access_token: None,
            api_key: None,
            requests_per_second: 10,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct TranslationConfig {
    pub endpoint: String,
    /// Tried when the primary endpoint fails
    pub fallback_endpoint: Option<String>,
    pub api_key: Option<String>,
    pub source_lang: String,
    pub target_lang: String,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_TRANSLATE_ENDPOINT.to_string(),
            fallback_endpoint: None,
            api_key: None,
            source_lang: "nl".to_string(),
            target_lang: "en".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct AnonymizeConfig {
    /// Author kept visible (the channel's own account)
    pub exempt_author: String,
}

impl Default for AnonymizeConfig {
    fn default() -> Self {
        Self {
            exempt_author: DEFAULT_EXEMPT_AUTHOR.to_string(),
        }
    }
}

impl Config {
    /// Load configuration from TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("parsing config {}", path.display()))?;
        Ok(config)
    }

    /// Load the file if given, then apply environment overrides
    pub fn from_sources(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Override settings from environment-style lookups. Blank values are ignored.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = get("YT_CHANNEL_ID") {
            self.channel.id = Some(v);
        }
        if let Some(v) = get("YT_ACCESS_TOKEN") {
            self.api.access_token = Some(v);
        }
        if let Some(v) = get("YT_API_KEY") {
            self.api.api_key = Some(v);
        }
        if let Some(v) = get("YT_DATA_BASE_URL") {
            self.api.data_base_url = v;
        }
        if let Some(v) = get("YT_ANALYTICS_BASE_URL") {
            self.api.analytics_base_url = v;
        }
        if let Some(v) = get("TRANSLATE_API_KEY") {
            self.translation.api_key = Some(v);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_config_defaults() {
        let config = Config::default();
        assert!(config.channel.id.is_none());
        assert_eq!(config.api.data_base_url, DEFAULT_DATA_BASE_URL);
        assert_eq!(config.api.requests_per_second, 10);
        assert_eq!(config.translation.source_lang, "nl");
        assert_eq!(config.translation.target_lang, "en");
        assert_eq!(config.anonymize.exempt_author, DEFAULT_EXEMPT_AUTHOR);
    }

    #[test]
    fn test_load_partial_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[channel]
id = "UC123"

[api]
requests_per_second = 2

[anonymize]
exempt_author = "@OwnChannel"
"#
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.channel.id.as_deref(), Some("UC123"));
        assert_eq!(config.api.requests_per_second, 2);
        assert_eq!(config.api.analytics_base_url, DEFAULT_ANALYTICS_BASE_URL);
        assert_eq!(config.anonymize.exempt_author, "@OwnChannel");
    }

    #[test]
    fn test_load_invalid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[channel\nid = ").unwrap();
        assert!(Config::load(file.path()).is_err());
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("YT_CHANNEL_ID", "UCenv"),
            ("YT_ACCESS_TOKEN", "token"),
            ("YT_API_KEY", "   "),
            ("TRANSLATE_API_KEY", "tkey"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_env(|k| env.get(k).map(|v| v.to_string()));

        assert_eq!(config.channel.id.as_deref(), Some("UCenv"));
        assert_eq!(config.api.access_token.as_deref(), Some("token"));
        assert!(config.api.api_key.is_none());
        assert_eq!(config.translation.api_key.as_deref(), Some("tkey"));
    }
}
