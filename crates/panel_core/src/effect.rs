use crate::{SessionId, TaskId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    StartPolling { session: SessionId, task_id: TaskId },
    StopPolling { session: SessionId },
    FetchResult { session: SessionId, task_id: TaskId },
    DownloadReport { task_id: TaskId },
    Notify(Notification),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Error,
}

/// User-visible message raised by a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub severity: Severity,
    pub text: String,
}

impl Notification {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            severity: Severity::Info,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            text: text.into(),
        }
    }
}
