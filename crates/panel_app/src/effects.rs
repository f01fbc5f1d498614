use panel_core::{DownloadOutcome, Effect, Msg, Notification};
use panel_engine::{EngineEvent, EngineHandle, ResultFetch};
use panel_logging::{panel_debug, panel_error, panel_info, panel_warn};

/// Executes core effects through the engine and turns engine events back into
/// messages.
pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(engine: EngineHandle) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &EngineHandle {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut EngineHandle {
        &mut self.engine
    }

    /// Runs IO effects and hands back the notifications for the host to show.
    pub fn enqueue(&mut self, effects: Vec<Effect>) -> Vec<Notification> {
        let mut notifications = Vec::new();
        for effect in effects {
            match effect {
                Effect::StartPolling { session, task_id } => {
                    self.engine.start_polling(session, task_id);
                }
                Effect::StopPolling { session } => {
                    self.engine.stop_polling(session);
                }
                Effect::FetchResult { session, task_id } => {
                    panel_info!("Fetching result of task {} (session {})", task_id, session);
                    self.engine.fetch_result(session, task_id);
                }
                Effect::DownloadReport { task_id } => {
                    panel_info!("Downloading report of task {}", task_id);
                    self.engine.download_report(task_id);
                }
                Effect::Notify(notification) => notifications.push(notification),
            }
        }
        notifications
    }

    /// Waits for the next engine event. `None` once the engine is shut down.
    pub async fn next_msg(&mut self) -> Option<Msg> {
        self.engine.next_event().await.map(map_event)
    }

    pub fn try_next_msg(&mut self) -> Option<Msg> {
        self.engine.try_recv().map(map_event)
    }
}

pub fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::StatusObserved {
            session,
            task_id,
            status,
        } => {
            panel_debug!("Task {} status {:?} (session {})", task_id, status, session);
            Msg::StatusObserved { session, status }
        }
        EngineEvent::ResultFetched {
            session,
            task_id,
            result,
        } => match result {
            Ok(ResultFetch::Ready(rows)) => {
                panel_info!("Task {} returned {} rows", task_id, rows.len());
                Msg::ResultFetched { session, rows }
            }
            Ok(ResultFetch::NotReady { reason }) => {
                panel_info!("Result of task {} not ready: {}", task_id, reason);
                Msg::ResultNotReady { session, reason }
            }
            Err(err) => {
                panel_warn!("Fetching result of task {} failed: {}", task_id, err);
                Msg::ResultNotReady {
                    session,
                    reason: err.to_string(),
                }
            }
        },
        EngineEvent::ReportDownloaded { task_id, result } => {
            let outcome = match result {
                Ok(path) => DownloadOutcome::Saved {
                    path: path.display().to_string(),
                },
                Err(err) => {
                    panel_error!("Downloading report of task {} failed: {}", task_id, err);
                    DownloadOutcome::Failed {
                        message: err.to_string(),
                    }
                }
            };
            Msg::DownloadFinished { task_id, outcome }
        }
    }
}
