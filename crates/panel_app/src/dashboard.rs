use std::time::Duration;

use panel_core::{
    update, AppState, AppViewModel, DashboardPhase, LifecycleState, Msg, NotReadyPolicy,
    Notification, ResultRow, Severity, TaskId,
};
use panel_engine::{ApiError, EngineHandle};
use panel_logging::{panel_error, panel_info};

use crate::EffectRunner;

/// Owns the tracked task and its results.
///
/// All state changes go through [`Dashboard::dispatch`]; engine tasks only
/// report observations. Dropping the dashboard detaches it, which stops the
/// poller and cancels outstanding requests.
pub struct Dashboard {
    state: AppState,
    runner: EffectRunner,
    notifications: Vec<Notification>,
    error_raised: bool,
}

impl Dashboard {
    pub fn new(engine: EngineHandle, policy: NotReadyPolicy) -> Self {
        Self {
            state: AppState::with_policy(policy),
            runner: EffectRunner::new(engine),
            notifications: Vec::new(),
            error_raised: false,
        }
    }

    pub fn dispatch(&mut self, msg: Msg) {
        if matches!(msg, Msg::TaskSubmitted { .. }) {
            self.error_raised = false;
        }
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;
        for notification in self.runner.enqueue(effects) {
            match notification.severity {
                Severity::Info => panel_info!("{}", notification.text),
                Severity::Error => {
                    self.error_raised = true;
                    panel_error!("{}", notification.text)
                }
            }
            self.notifications.push(notification);
        }
    }

    /// Submits `url` and starts tracking the new task.
    pub async fn submit(&mut self, url: &str) -> Result<TaskId, ApiError> {
        let submitted = self.runner.engine().submit(url).await;
        match submitted {
            Ok(task_id) => {
                self.dispatch(Msg::TaskSubmitted {
                    task_id: task_id.clone(),
                });
                Ok(task_id)
            }
            Err(err) => {
                panel_error!("Submitting {} failed: {}", url, err);
                self.dispatch(Msg::SubmitFailed {
                    message: err.to_string(),
                });
                Err(err)
            }
        }
    }

    /// Starts tracking a task that was submitted elsewhere.
    pub fn track(&mut self, task_id: TaskId) {
        self.dispatch(Msg::TaskSubmitted { task_id });
    }

    pub fn request_download(&mut self) {
        self.dispatch(Msg::DownloadRequested);
    }

    /// Processes the next engine event. Returns false once the engine is gone.
    pub async fn pump(&mut self) -> bool {
        match self.runner.next_msg().await {
            Some(msg) => {
                self.dispatch(msg);
                true
            }
            None => false,
        }
    }

    /// Processes every event that is already queued, without waiting.
    pub fn pump_pending(&mut self) {
        while let Some(msg) = self.runner.try_next_msg() {
            self.dispatch(msg);
        }
    }

    /// Drives events until the tracked task is resolved and no download is in
    /// flight. Returns false if `limit` elapsed first.
    pub async fn run_until_settled(&mut self, limit: Duration) -> bool {
        let deadline = tokio::time::Instant::now() + limit;
        while !self.is_settled() {
            match tokio::time::timeout_at(deadline, self.runner.next_msg()).await {
                Ok(Some(msg)) => self.dispatch(msg),
                Ok(None) => return self.is_settled(),
                Err(_) => return false,
            }
        }
        true
    }

    /// True when the tracked task completed with a result set and no error
    /// was raised for it, including a failed report download.
    pub fn succeeded(&self) -> bool {
        !self.error_raised
            && self.state.lifecycle() == Some(LifecycleState::Completed)
            && self.state.has_result_set()
    }

    pub fn is_settled(&self) -> bool {
        self.state.is_detached()
            || (self.state.phase() != DashboardPhase::Polling && !self.state.is_downloading())
    }

    /// Stops polling and cancels outstanding work. Later events are ignored.
    pub fn detach(&mut self) {
        if self.state.is_detached() {
            return;
        }
        self.dispatch(Msg::Detached);
        self.runner.engine_mut().shutdown();
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn view(&self) -> AppViewModel {
        self.state.view()
    }

    pub fn results(&self) -> &[ResultRow] {
        self.state.results()
    }

    pub fn is_busy(&self) -> bool {
        self.state.is_busy()
    }

    pub fn lifecycle(&self) -> Option<LifecycleState> {
        self.state.lifecycle()
    }

    pub fn phase(&self) -> DashboardPhase {
        self.state.phase()
    }

    pub fn engine(&self) -> &EngineHandle {
        self.runner.engine()
    }

    /// Notifications raised since the last call, oldest first.
    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    /// Returns true if the view changed since the last call.
    pub fn consume_dirty(&mut self) -> bool {
        self.state.consume_dirty()
    }
}

impl Drop for Dashboard {
    fn drop(&mut self) {
        self.detach();
    }
}
