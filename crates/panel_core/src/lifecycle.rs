//! Lifecycle states of a scraping task and the transition table that drives
//! the reducer.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleState {
    Queued,
    Running,
    Completed,
    Failed,
}

impl LifecycleState {
    /// Maps a raw server status string. Unrecognized values yield `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "queued" => Some(Self::Queued),
            "running" => Some(Self::Running),
            "completed" => Some(Self::Completed),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    fn table_index(self) -> usize {
        match self {
            Self::Queued => 0,
            Self::Running => 1,
            Self::Completed => 2,
            Self::Failed => 3,
        }
    }
}

/// One-shot side effect attached to a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionEffect {
    None,
    FetchResult,
    NotifyFailure,
}

/// A row of the transition table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub observed: LifecycleState,
    pub next: LifecycleState,
    pub effect: TransitionEffect,
    /// The polling session ends in the same step that applies the transition.
    pub ends_session: bool,
}

/// Transition table keyed by the observed status.
///
/// The current state is not part of the key: the client always adopts the
/// latest observation and never assumes the server is monotonic.
pub const TRANSITIONS: [Transition; 4] = [
    Transition {
        observed: LifecycleState::Queued,
        next: LifecycleState::Queued,
        effect: TransitionEffect::None,
        ends_session: false,
    },
    Transition {
        observed: LifecycleState::Running,
        next: LifecycleState::Running,
        effect: TransitionEffect::None,
        ends_session: false,
    },
    Transition {
        observed: LifecycleState::Completed,
        next: LifecycleState::Completed,
        effect: TransitionEffect::FetchResult,
        ends_session: true,
    },
    Transition {
        observed: LifecycleState::Failed,
        next: LifecycleState::Failed,
        effect: TransitionEffect::NotifyFailure,
        ends_session: true,
    },
];

pub fn transition(observed: LifecycleState) -> Transition {
    TRANSITIONS[observed.table_index()]
}
