mod cli;

use std::process::ExitCode;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use panel_app::config::PanelConfig;
use panel_app::ui::render::{render, render_notification};
use panel_app::Dashboard;
use panel_core::TaskId;
use panel_engine::{EngineHandle, ReportDownloader};
use panel_logging::{panel_info, panel_warn};

use cli::{Cli, Command, WatchArgs};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let mut config = PanelConfig::load_or_default(cli.config.as_deref())?;
    cli.apply_overrides(&mut config);
    panel_logging::initialize(config.log_target.into(), cli.log_level(), &config.log_file);

    let engine = EngineHandle::new(config.engine_settings())
        .with_context(|| format!("configuring client for {}", config.server_url))?;

    match cli.command {
        Command::Scrape { url, watch } => {
            let mut dashboard = Dashboard::new(engine, config.not_ready_policy());
            if dashboard.submit(&url).await.is_err() {
                print_notifications(&mut dashboard);
                return Ok(ExitCode::FAILURE);
            }
            follow(dashboard, watch).await
        }
        Command::Track { task_id, watch } => {
            let mut dashboard = Dashboard::new(engine, config.not_ready_policy());
            dashboard.track(TaskId::new(task_id));
            follow(dashboard, watch).await
        }
        Command::Tasks => {
            let tasks = engine.api().list_tasks().await.context("listing tasks")?;
            if tasks.is_empty() {
                println!("No tasks.");
            }
            for task in tasks {
                println!("{}\t{}", task.id, task.status);
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Download { task_id } => {
            let downloader =
                ReportDownloader::new(engine.api().clone(), config.download_dir.clone());
            let path = downloader
                .download(&TaskId::new(task_id))
                .await
                .context("Failed to download PDF report")?;
            println!("Report saved to {}", path.display());
            Ok(ExitCode::SUCCESS)
        }
        Command::Health => {
            let health = engine.api().health().await.context("health check")?;
            println!("{}: {}", health.status, health.message);
            Ok(ExitCode::SUCCESS)
        }
    }
}

async fn follow(mut dashboard: Dashboard, watch: WatchArgs) -> anyhow::Result<ExitCode> {
    let limit = Duration::from_secs(watch.timeout_secs);

    if !wait(&mut dashboard, limit).await {
        return Ok(ExitCode::FAILURE);
    }
    print_view(&mut dashboard);

    if watch.download && dashboard.succeeded() {
        dashboard.request_download();
        if !wait(&mut dashboard, limit).await {
            return Ok(ExitCode::FAILURE);
        }
        print_notifications(&mut dashboard);
    }

    if dashboard.succeeded() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

/// Runs the dashboard until it settles, printing status changes as they come.
/// Ctrl-C or the time limit detaches it.
async fn wait(dashboard: &mut Dashboard, limit: Duration) -> bool {
    let deadline = tokio::time::Instant::now() + limit;
    loop {
        if dashboard.consume_dirty() {
            if let Some(line) = render(&dashboard.view()).first() {
                panel_info!("{}", line);
            }
        }
        print_notifications(dashboard);
        if dashboard.is_settled() {
            return true;
        }

        let step = tokio::select! {
            alive = dashboard.pump() => Some(alive),
            _ = tokio::time::sleep_until(deadline) => None,
            _ = tokio::signal::ctrl_c() => Some(false),
        };
        match step {
            Some(true) => {}
            Some(false) => {
                panel_warn!("Interrupted; polling stopped");
                dashboard.detach();
                return false;
            }
            None => {
                panel_warn!("Gave up waiting after {:?}", limit);
                dashboard.detach();
                print_view(dashboard);
                return false;
            }
        }
    }
}

fn print_view(dashboard: &mut Dashboard) {
    for line in render(&dashboard.view()) {
        println!("{line}");
    }
}

fn print_notifications(dashboard: &mut Dashboard) {
    for notification in dashboard.take_notifications() {
        println!("{}", render_notification(&notification));
    }
}
