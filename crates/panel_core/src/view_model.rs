use crate::{DashboardPhase, LifecycleState, ResultRow, TaskId};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub phase: DashboardPhase,
    pub task_id: Option<TaskId>,
    /// `None` until the first recognized observation.
    pub lifecycle: Option<LifecycleState>,
    /// Last status string the service sent that the panel does not know.
    pub unrecognized_status: Option<String>,
    pub busy: bool,
    pub downloading: bool,
    pub can_download: bool,
    pub results: Vec<ResultRow>,
    pub dirty: bool,
}
