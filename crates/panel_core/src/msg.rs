#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// The service accepted a submission and handed out a task id.
    TaskSubmitted { task_id: crate::TaskId },
    /// Submitting a URL failed before a task id was obtained.
    SubmitFailed { message: String },
    /// A poll tick found the tracked task with this raw status.
    StatusObserved {
        session: crate::SessionId,
        status: String,
    },
    /// The result payload of a completed task was retrieved.
    ResultFetched {
        session: crate::SessionId,
        rows: Vec<crate::ResultRow>,
    },
    /// The result payload was absent, malformed or unreachable.
    ResultNotReady {
        session: crate::SessionId,
        reason: String,
    },
    /// User asked for the report of the tracked task.
    DownloadRequested,
    /// A report download ended.
    DownloadFinished {
        task_id: crate::TaskId,
        outcome: DownloadOutcome,
    },
    /// The hosting view went away; nothing may mutate state afterwards.
    Detached,
    /// Fallback for placeholder wiring.
    NoOp,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    Saved { path: String },
    Failed { message: String },
}
