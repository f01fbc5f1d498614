use std::fmt;

use crate::view_model::AppViewModel;
use crate::{LifecycleState, ResultRow, TaskId};

/// Identifies one polling session. Never reused within an `AppState`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(pub u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "s{}", self.0)
    }
}

/// What to do when a completed task's result payload is absent or malformed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotReadyPolicy {
    /// Open a fresh polling session so the next `completed` observation fetches
    /// again. `None` retries forever.
    Retry { max_attempts: Option<u32> },
    /// Give up at once and notify the user.
    Fail,
}

impl Default for NotReadyPolicy {
    fn default() -> Self {
        Self::Retry { max_attempts: None }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DashboardPhase {
    #[default]
    NoTask,
    /// Polling the task, or fetching the result of a completed one.
    Polling,
    Resolved,
}

/// Polling session for the tracked task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollingSession {
    id: SessionId,
    polling: bool,
    completion_handled: bool,
}

impl PollingSession {
    fn new(id: SessionId) -> Self {
        Self {
            id,
            polling: true,
            completion_handled: false,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn is_polling(&self) -> bool {
        self.polling
    }

    pub fn completion_handled(&self) -> bool {
        self.completion_handled
    }

    /// Check-and-set of the completion guard. Returns `true` exactly once per
    /// session and ends polling in the same step.
    pub(crate) fn claim_completion(&mut self) -> bool {
        if self.completion_handled {
            return false;
        }
        self.completion_handled = true;
        self.polling = false;
        true
    }

    pub(crate) fn end(&mut self) {
        self.polling = false;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TrackedTask {
    pub(crate) task_id: TaskId,
    pub(crate) lifecycle: Option<LifecycleState>,
    pub(crate) unrecognized_status: Option<String>,
    pub(crate) session: PollingSession,
    pub(crate) not_ready_attempts: u32,
    pub(crate) resolved: bool,
    pub(crate) result_received: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    task: Option<TrackedTask>,
    results: Vec<ResultRow>,
    busy: bool,
    downloading: bool,
    detached: bool,
    next_session: u64,
    policy: NotReadyPolicy,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: NotReadyPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    pub fn view(&self) -> AppViewModel {
        let task = self.task.as_ref();
        AppViewModel {
            phase: self.phase(),
            task_id: task.map(|t| t.task_id.clone()),
            lifecycle: self.lifecycle(),
            unrecognized_status: task.and_then(|t| t.unrecognized_status.clone()),
            busy: self.busy,
            downloading: self.downloading,
            can_download: task.is_some() && !self.downloading,
            results: self.results.clone(),
            dirty: self.dirty,
        }
    }

    pub fn phase(&self) -> DashboardPhase {
        match &self.task {
            None => DashboardPhase::NoTask,
            Some(task) if task.resolved => DashboardPhase::Resolved,
            Some(_) => DashboardPhase::Polling,
        }
    }

    pub fn task_id(&self) -> Option<&TaskId> {
        self.task.as_ref().map(|t| &t.task_id)
    }

    pub fn lifecycle(&self) -> Option<LifecycleState> {
        self.task.as_ref().and_then(|t| t.lifecycle)
    }

    pub fn results(&self) -> &[ResultRow] {
        &self.results
    }

    /// True once the tracked task's result set arrived, even if it was empty.
    /// A task that failed or whose result was given up on has none.
    pub fn has_result_set(&self) -> bool {
        self.task.as_ref().is_some_and(|t| t.result_received)
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn is_downloading(&self) -> bool {
        self.downloading
    }

    pub fn is_detached(&self) -> bool {
        self.detached
    }

    pub fn session(&self) -> Option<&PollingSession> {
        self.task.as_ref().map(|t| &t.session)
    }

    /// Session that is still issuing polls, if any.
    pub fn active_session(&self) -> Option<SessionId> {
        self.session().filter(|s| s.is_polling()).map(|s| s.id())
    }

    /// Returns true if the state changed since the last call.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn policy(&self) -> NotReadyPolicy {
        self.policy
    }

    fn allocate_session(&mut self) -> SessionId {
        self.next_session += 1;
        SessionId(self.next_session)
    }

    /// Replaces any tracked task; prior results are cleared.
    pub(crate) fn start_task(&mut self, task_id: TaskId) -> SessionId {
        let session = self.allocate_session();
        self.task = Some(TrackedTask {
            task_id,
            lifecycle: None,
            unrecognized_status: None,
            session: PollingSession::new(session),
            not_ready_attempts: 0,
            resolved: false,
            result_received: false,
        });
        self.results.clear();
        self.busy = true;
        self.dirty = true;
        session
    }

    /// Opens a fresh session for the current task after a not-ready result.
    pub(crate) fn reopen_session(&mut self) -> Option<(SessionId, TaskId)> {
        let session = self.allocate_session();
        let task = self.task.as_mut()?;
        task.session = PollingSession::new(session);
        self.dirty = true;
        Some((session, task.task_id.clone()))
    }

    /// Task whose session matches and is still polling.
    pub(crate) fn polling_task_mut(&mut self, session: SessionId) -> Option<&mut TrackedTask> {
        self.task
            .as_mut()
            .filter(|t| t.session.id() == session && t.session.is_polling())
    }

    /// Task waiting for the result of the given session's completion.
    pub(crate) fn fetching_task_mut(&mut self, session: SessionId) -> Option<&mut TrackedTask> {
        self.task.as_mut().filter(|t| {
            t.session.id() == session && t.session.completion_handled() && !t.resolved
        })
    }

    pub(crate) fn resolve_with_results(&mut self, rows: Vec<ResultRow>) {
        if let Some(task) = self.task.as_mut() {
            task.resolved = true;
            task.result_received = true;
        }
        self.results = rows;
        self.busy = false;
        self.dirty = true;
    }

    pub(crate) fn resolve_without_results(&mut self) {
        if let Some(task) = self.task.as_mut() {
            task.resolved = true;
            task.session.end();
        }
        self.busy = false;
        self.dirty = true;
    }

    pub(crate) fn set_downloading(&mut self, downloading: bool) {
        self.downloading = downloading;
        self.dirty = true;
    }

    pub(crate) fn detach(&mut self) {
        if let Some(task) = self.task.as_mut() {
            task.session.end();
        }
        self.detached = true;
        self.busy = false;
        self.dirty = true;
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }
}
