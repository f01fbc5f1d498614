//! Scrape panel engine: talks to the scraping service and executes effects.
mod client;
mod engine;
mod persist;
mod poll;
mod report;
mod settings;
mod types;

pub use client::{parse_result_payload, ReqwestScrapeClient, ScrapeApi};
pub use engine::EngineHandle;
pub use persist::{prepare_download_dir, ReportStore, StoreError};
pub use poll::{spawn_poller, EventGate, PollHandle};
pub use report::{ensure_pdf, report_filename, ReportDownloader, ReportError};
pub use settings::EngineSettings;
pub use types::{
    ApiError, ApiErrorKind, EngineEvent, HealthStatus, ReportArtifact, ResultFetch, TaskEntry,
};
