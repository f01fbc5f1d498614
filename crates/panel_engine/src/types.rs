use std::fmt;
use std::path::PathBuf;

use panel_core::{ResultRow, SessionId, TaskId};
use serde::Deserialize;

use crate::report::ReportError;

/// Entry of the `GET /tasks` listing. Extra fields are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TaskEntry {
    pub id: TaskId,
    #[serde(default)]
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub(crate) struct SubmitResponse {
    pub(crate) task_id: TaskId,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub message: String,
}

/// Outcome of one result retrieval for a completed task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultFetch {
    Ready(Vec<ResultRow>),
    /// The payload is absent or lacks a usable `data` field.
    NotReady { reason: String },
}

/// Raw report body as received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportArtifact {
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
}

#[derive(Debug)]
pub enum EngineEvent {
    StatusObserved {
        session: SessionId,
        task_id: TaskId,
        status: String,
    },
    ResultFetched {
        session: SessionId,
        task_id: TaskId,
        result: Result<ResultFetch, ApiError>,
    },
    ReportDownloaded {
        task_id: TaskId,
        result: Result<PathBuf, ReportError>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct ApiError {
    pub kind: ApiErrorKind,
    pub message: String,
}

impl ApiError {
    pub(crate) fn new(kind: ApiErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiErrorKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    Network,
    Decode,
    TooLarge { max_bytes: u64, actual: Option<u64> },
}

impl fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiErrorKind::InvalidUrl => write!(f, "invalid url"),
            ApiErrorKind::HttpStatus(code) => write!(f, "http status {code}"),
            ApiErrorKind::Timeout => write!(f, "timeout"),
            ApiErrorKind::Network => write!(f, "network error"),
            ApiErrorKind::Decode => write!(f, "undecodable response"),
            ApiErrorKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
        }
    }
}
