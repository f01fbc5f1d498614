//! Panel configuration, loaded from an optional RON file.
//!
//! Every field has a default, so a file only needs the values it changes:
//!
//! ```ron
//! (
//!     server_url: "http://scraper.internal:8000",
//!     poll_interval_ms: 1000,
//!     result_not_ready: Retry(max_attempts: Some(5)),
//! )
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use panel_core::NotReadyPolicy;
use panel_engine::EngineSettings;
use panel_logging::LogDestination;
use serde::{Deserialize, Serialize};

/// Looked up in the working directory when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "scrape_panel.ron";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelConfig {
    pub server_url: String,
    pub poll_interval_ms: u64,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub max_report_bytes: u64,
    pub download_dir: PathBuf,
    pub result_not_ready: NotReadySetting,
    pub log_target: LogTarget,
    pub log_file: PathBuf,
}

impl Default for PanelConfig {
    fn default() -> Self {
        let engine = EngineSettings::default();
        Self {
            server_url: engine.base_url,
            poll_interval_ms: engine.poll_interval.as_millis() as u64,
            connect_timeout_secs: engine.connect_timeout.as_secs(),
            request_timeout_secs: engine.request_timeout.as_secs(),
            max_report_bytes: engine.max_report_bytes,
            download_dir: engine.download_dir,
            result_not_ready: NotReadySetting::default(),
            log_target: LogTarget::default(),
            log_file: PathBuf::from("scrape_panel.log"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotReadySetting {
    Retry { max_attempts: Option<u32> },
    Fail,
}

impl Default for NotReadySetting {
    fn default() -> Self {
        Self::Retry { max_attempts: None }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LogTarget {
    #[default]
    Terminal,
    File,
    Both,
}

impl From<LogTarget> for LogDestination {
    fn from(target: LogTarget) -> Self {
        match target {
            LogTarget::Terminal => LogDestination::Terminal,
            LogTarget::File => LogDestination::File,
            LogTarget::Both => LogDestination::Both,
        }
    }
}

impl PanelConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        ron::from_str(&text).with_context(|| format!("parsing config file {}", path.display()))
    }

    /// Loads `path` if given, else the default file if present, else defaults.
    pub fn load_or_default(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => {
                let fallback = Path::new(DEFAULT_CONFIG_FILE);
                if fallback.is_file() {
                    Self::load(fallback)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            base_url: self.server_url.clone(),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            poll_interval: Duration::from_millis(self.poll_interval_ms.max(1)),
            max_report_bytes: self.max_report_bytes,
            download_dir: self.download_dir.clone(),
        }
    }

    pub fn not_ready_policy(&self) -> NotReadyPolicy {
        match self.result_not_ready {
            NotReadySetting::Retry { max_attempts } => NotReadyPolicy::Retry { max_attempts },
            NotReadySetting::Fail => NotReadyPolicy::Fail,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let config: PanelConfig = ron::from_str(
            r#"(server_url: "http://scraper:9000", result_not_ready: Retry(max_attempts: Some(5)))"#,
        )
        .unwrap();

        assert_eq!(config.server_url, "http://scraper:9000");
        assert_eq!(config.poll_interval_ms, 2000);
        assert_eq!(
            config.not_ready_policy(),
            NotReadyPolicy::Retry {
                max_attempts: Some(5)
            }
        );
    }

    #[test]
    fn fail_policy_and_engine_settings() {
        let config: PanelConfig =
            ron::from_str(r#"(poll_interval_ms: 250, result_not_ready: Fail, log_target: Both)"#)
                .unwrap();

        assert_eq!(config.not_ready_policy(), NotReadyPolicy::Fail);
        assert_eq!(config.log_target, LogTarget::Both);
        let settings = config.engine_settings();
        assert_eq!(settings.poll_interval, Duration::from_millis(250));
        assert_eq!(settings.base_url, "http://localhost:8000");
    }
}
