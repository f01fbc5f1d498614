//! Scrape panel core: pure task-lifecycle state machine and view-model helpers.
mod effect;
mod lifecycle;
mod model;
mod msg;
mod state;
mod update;
mod view_model;

pub use effect::{Effect, Notification, Severity};
pub use lifecycle::{transition, LifecycleState, Transition, TransitionEffect, TRANSITIONS};
pub use model::{Contacts, ResultRow, TaskId};
pub use msg::{DownloadOutcome, Msg};
pub use state::{AppState, DashboardPhase, NotReadyPolicy, PollingSession, SessionId};
pub use update::update;
pub use view_model::AppViewModel;
