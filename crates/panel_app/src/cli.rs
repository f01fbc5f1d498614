use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};
use panel_app::config::PanelConfig;
use panel_logging::LevelFilter;

#[derive(Debug, Parser)]
#[command(
    name = "scrape-panel",
    version,
    about = "Submit scraping tasks, follow them to completion and download their reports"
)]
pub struct Cli {
    /// RON config file (defaults to ./scrape_panel.ron when present).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Base URL of the scraping service.
    #[arg(long, global = true)]
    pub server: Option<String>,

    #[arg(long, global = true)]
    pub poll_interval_ms: Option<u64>,

    /// Where downloaded reports are saved.
    #[arg(long, global = true)]
    pub download_dir: Option<PathBuf>,

    /// More log output (-v debug, -vv trace).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Submit a URL and follow the task until it resolves.
    Scrape {
        url: String,
        #[command(flatten)]
        watch: WatchArgs,
    },
    /// Follow a task that already exists.
    Track {
        task_id: String,
        #[command(flatten)]
        watch: WatchArgs,
    },
    /// List the tasks known to the service.
    Tasks,
    /// Download the report of a task.
    Download { task_id: String },
    /// Check that the service is up.
    Health,
}

#[derive(Debug, Clone, Copy, Args)]
pub struct WatchArgs {
    /// Download the PDF report once results are in.
    #[arg(long)]
    pub download: bool,

    /// Give up waiting after this many seconds.
    #[arg(long, default_value_t = 600)]
    pub timeout_secs: u64,
}

impl Cli {
    pub fn apply_overrides(&self, config: &mut PanelConfig) {
        if let Some(server) = &self.server {
            config.server_url = server.clone();
        }
        if let Some(interval) = self.poll_interval_ms {
            config.poll_interval_ms = interval;
        }
        if let Some(dir) = &self.download_dir {
            config.download_dir = dir.clone();
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}
