/*
[INPUT]:  Optional YAML configuration file and SOLIFORGE_* environment variables
[OUTPUT]: Validated console configuration
[POS]:    Configuration layer - API endpoint, poll cadence, paging, session, logging
[UPDATE]: When adding new configuration options
*/

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use soliforge_client::{ClientConfig, DEFAULT_BASE_URL, normalize_base_url};

/// Accepted range for the status poll cadence
pub const POLL_INTERVAL_RANGE_MS: std::ops::RangeInclusive<u64> = 1_000..=10_000;

/// Top-level configuration for the console
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ConsoleConfig {
    pub api: ApiConfig,
    pub poll: PollConfig,
    pub board: BoardConfig,
    pub session: SessionConfig,
    pub logging: LoggingConfig,
}

/// Backend endpoint and HTTP timeouts
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ApiConfig {
    /// API root, including the `/api` prefix
    pub base_url: String,
    pub timeout_secs: u64,
    pub connect_timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
            connect_timeout_secs: 10,
        }
    }
}

impl ApiConfig {
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            timeout: Duration::from_secs(self.timeout_secs),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
        }
    }
}

/// Execution view timers
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PollConfig {
    /// Status/log poll cadence
    pub interval_ms: u64,
    /// Elapsed clock refresh
    pub elapsed_tick_ms: u64,
    /// Wait between a successful start request and the follow-up fetch
    pub start_settle_ms: u64,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval_ms: 2_000,
            elapsed_tick_ms: 1_000,
            start_settle_ms: 500,
        }
    }
}

impl PollConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn elapsed_tick(&self) -> Duration {
        Duration::from_millis(self.elapsed_tick_ms)
    }

    pub fn start_settle(&self) -> Duration {
        Duration::from_millis(self.start_settle_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct BoardConfig {
    pub page_size: u32,
    pub search_page_size: u32,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            page_size: 20,
            search_page_size: 50,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Where the session token is persisted; platform data dir when unset
    pub token_path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, e.g. `info` or `soliforge_console=debug`
    pub level: String,
    /// Optional log file, appended in addition to the primary sink
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

impl ConsoleConfig {
    /// Load configuration: defaults, then the YAML file, then `SOLIFORGE_*`
    /// environment variables (`__` separates sections, e.g.
    /// `SOLIFORGE_API__BASE_URL`).
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(true));
        }
        builder = builder.add_source(
            config::Environment::with_prefix("SOLIFORGE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config: Self = builder
            .build()
            .context("read configuration sources")?
            .try_deserialize()
            .context("parse configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the console cannot run with
    pub fn validate(&self) -> Result<()> {
        normalize_base_url(&self.api.base_url)
            .with_context(|| format!("invalid api.base_url: {}", self.api.base_url))?;

        if self.api.timeout_secs == 0 || self.api.connect_timeout_secs == 0 {
            bail!("api timeouts must be greater than zero");
        }
        if !POLL_INTERVAL_RANGE_MS.contains(&self.poll.interval_ms) {
            bail!(
                "poll.interval_ms must be within {}..={} (got {})",
                POLL_INTERVAL_RANGE_MS.start(),
                POLL_INTERVAL_RANGE_MS.end(),
                self.poll.interval_ms
            );
        }
        if self.poll.elapsed_tick_ms == 0 {
            bail!("poll.elapsed_tick_ms must be greater than zero");
        }
        if self.poll.start_settle_ms > 10_000 {
            bail!("poll.start_settle_ms must not exceed 10000");
        }
        if self.board.page_size == 0 || self.board.search_page_size == 0 {
            bail!("board page sizes must be greater than zero");
        }
        if self.logging.level.trim().is_empty() {
            bail!("logging.level must not be empty");
        }
        Ok(())
    }

    /// Effective configuration rendered as YAML
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).context("failed to serialize config to YAML")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_temp_config(name: &str, content: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "soliforge-config-{}-{name}.yaml",
            std::process::id()
        ));
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_defaults_are_valid() {
        let config = ConsoleConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.poll.interval(), Duration::from_secs(2));
        assert_eq!(config.board.page_size, 20);
        assert_eq!(config.board.search_page_size, 50);
        assert_eq!(config.api.base_url, "http://127.0.0.1:8000/api");
    }

    #[test]
    fn test_partial_yaml_keeps_section_defaults() {
        let path = write_temp_config(
            "partial",
            "api:\n  base_url: https://audit.example.com/api\npoll:\n  interval_ms: 3000\n",
        );
        let config = ConsoleConfig::load(Some(&path)).unwrap();
        assert_eq!(config.api.base_url, "https://audit.example.com/api");
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.poll.interval_ms, 3000);
        assert_eq!(config.poll.start_settle_ms, 500);
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn test_out_of_range_interval_is_rejected() {
        let mut config = ConsoleConfig::default();
        config.poll.interval_ms = 250;
        assert!(config.validate().is_err());
        config.poll.interval_ms = 10_000;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_bad_base_url_is_rejected() {
        let mut config = ConsoleConfig::default();
        config.api.base_url = "127.0.0.1:8000".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_page_size_is_rejected() {
        let mut config = ConsoleConfig::default();
        config.board.search_page_size = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let missing = std::env::temp_dir().join("soliforge-no-such-config.yaml");
        assert!(ConsoleConfig::load(Some(&missing)).is_err());
    }

    #[test]
    fn test_yaml_roundtrip_of_effective_config() {
        let yaml = ConsoleConfig::default().to_yaml().unwrap();
        assert!(yaml.contains("interval_ms: 2000"));
    }
}
