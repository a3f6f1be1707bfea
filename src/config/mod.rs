use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::cli::OutputFormat;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP client settings
    pub http: HttpConfig,

    /// Defaults applied when the command line leaves them out
    pub defaults: DefaultsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Environment variable holding the proxy URL, read once per client
    pub proxy_env: String,

    /// Value of the Accept-Language header
    pub accept_language: String,

    /// User agent sent with every request
    pub user_agent: String,

    /// Request timeout in seconds (0 disables it)
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    /// Preferred language codes, highest priority first
    pub languages: Vec<String>,

    /// Output format
    pub format: OutputFormat,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            proxy_env: "HTTP_PROXY".to_string(),
            accept_language: "en-US".to_string(),
            user_agent: concat!("youtube-transcript/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout_secs: 30,
        }
    }
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            languages: vec!["en".to_string()],
            format: OutputFormat::Text,
        }
    }
}

impl Config {
    /// Load configuration from file, falling back to defaults when none exists
    pub fn load() -> Result<Self> {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load and validate configuration from a specific file
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        let content = fs_err::read_to_string(path).context("Failed to read config file")?;

        let config: Config =
            serde_yaml::from_str(&content).context("Failed to parse config file")?;

        config.validate()?;
        tracing::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Locate an existing configuration file
    fn config_path() -> Option<PathBuf> {
        let local_config = PathBuf::from("config.yaml");
        if local_config.exists() {
            return Some(local_config);
        }

        dirs::config_dir()
            .map(|dir| dir.join("youtube-transcript").join("config.yaml"))
            .filter(|path| path.exists())
    }

    fn validate(&self) -> Result<()> {
        if self.defaults.languages.iter().all(|l| l.trim().is_empty()) {
            anyhow::bail!("defaults.languages must name at least one language code");
        }

        Ok(())
    }

    /// Display current configuration
    pub fn display(&self) {
        println!("Current Configuration:");
        println!("  Proxy variable: {}", self.http.proxy_env);
        println!("  Accept-Language: {}", self.http.accept_language);
        println!("  User agent: {}", self.http.user_agent);
        println!("  Timeout: {}s", self.http.timeout_secs);
        println!("  Default languages: {}", self.defaults.languages.join(","));
        println!("  Default format: {}", self.defaults.format);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config: Config = serde_yaml::from_str(
            "defaults:\n  languages: [de, en]\n  format: srt\n",
        )
        .unwrap();

        assert_eq!(config.defaults.languages, vec!["de", "en"]);
        assert!(matches!(config.defaults.format, OutputFormat::Srt));
        assert_eq!(config.http.proxy_env, "HTTP_PROXY");
        assert_eq!(config.http.timeout_secs, 30);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_unknown_format_is_rejected() {
        let parsed: std::result::Result<Config, _> =
            serde_yaml::from_str("defaults:\n  format: vtt\n");
        assert!(parsed.is_err());
    }

    #[test]
    fn test_empty_language_list_is_invalid() {
        let config: Config = serde_yaml::from_str("defaults:\n  languages: []\n").unwrap();
        assert!(config.validate().is_err());
    }
}
