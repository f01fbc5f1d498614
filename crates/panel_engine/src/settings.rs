use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct EngineSettings {
    /// Root of the scraping service, e.g. `http://localhost:8000`.
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    /// Fixed delay between status polls. There is no backoff.
    pub poll_interval: Duration,
    pub max_report_bytes: u64,
    pub download_dir: PathBuf,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            poll_interval: Duration::from_millis(2000),
            max_report_bytes: 50 * 1024 * 1024,
            download_dir: PathBuf::from("reports"),
        }
    }
}
