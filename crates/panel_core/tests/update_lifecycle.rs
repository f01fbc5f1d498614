use std::sync::Once;

use panel_core::{
    update, AppState, Contacts, DashboardPhase, Effect, LifecycleState, Msg, NotReadyPolicy,
    ResultRow, SessionId, Severity, TaskId,
};
use pretty_assertions::assert_eq;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(panel_logging::initialize_for_tests);
}

fn submitted(state: AppState, id: &str) -> (AppState, SessionId) {
    let (state, effects) = update(
        state,
        Msg::TaskSubmitted {
            task_id: TaskId::new(id),
        },
    );
    let session = effects
        .iter()
        .find_map(|effect| match effect {
            Effect::StartPolling { session, .. } => Some(*session),
            _ => None,
        })
        .expect("start polling effect");
    (state, session)
}

fn observe(state: AppState, session: SessionId, status: &str) -> (AppState, Vec<Effect>) {
    update(
        state,
        Msg::StatusObserved {
            session,
            status: status.to_string(),
        },
    )
}

fn example_row() -> ResultRow {
    ResultRow {
        url: "http://example.com".to_string(),
        company: Some("Example Inc".to_string()),
        contacts: Contacts {
            emails: vec!["a@example.com".to_string()],
            phones: Vec::new(),
        },
        tagline: None,
        services: vec!["Consulting".to_string()],
        social_media: Default::default(),
        industry: Some("Tech".to_string()),
    }
}

fn error_notifications(effects: &[Effect]) -> usize {
    effects
        .iter()
        .filter(|effect| matches!(effect, Effect::Notify(n) if n.severity == Severity::Error))
        .count()
}

#[test]
fn submission_starts_polling_and_sets_busy() {
    init_logging();
    let (mut state, effects) = update(
        AppState::new(),
        Msg::TaskSubmitted {
            task_id: TaskId::new("abc123"),
        },
    );

    assert_eq!(
        effects,
        vec![Effect::StartPolling {
            session: SessionId(1),
            task_id: TaskId::new("abc123"),
        }]
    );
    let view = state.view();
    assert_eq!(view.phase, DashboardPhase::Polling);
    assert_eq!(view.task_id, Some(TaskId::new("abc123")));
    assert_eq!(view.lifecycle, None);
    assert!(view.busy);
    assert!(view.can_download);
    assert!(state.consume_dirty());
    assert!(!state.consume_dirty());
}

#[test]
fn running_then_completed_fetches_once() {
    init_logging();
    let (state, session) = submitted(AppState::new(), "abc123");

    let (state, effects) = observe(state, session, "running");
    assert!(effects.is_empty());
    assert_eq!(state.lifecycle(), Some(LifecycleState::Running));

    let (state, effects) = observe(state, session, "completed");
    assert_eq!(
        effects,
        vec![
            Effect::StopPolling { session },
            Effect::FetchResult {
                session,
                task_id: TaskId::new("abc123"),
            },
        ]
    );
    assert_eq!(state.active_session(), None);
    assert!(state.session().unwrap().completion_handled());
    assert!(state.is_busy());

    // A tick that raced past teardown must not fetch again.
    let (state, effects) = observe(state, session, "completed");
    assert!(effects.is_empty());

    let (state, effects) = update(
        state,
        Msg::ResultFetched {
            session,
            rows: vec![example_row()],
        },
    );
    assert!(effects.is_empty());
    assert_eq!(state.results(), &[example_row()]);
    assert!(!state.is_busy());
    assert!(state.has_result_set());
    assert_eq!(state.phase(), DashboardPhase::Resolved);
}

#[test]
fn duplicate_result_after_resolution_is_ignored() {
    init_logging();
    let (state, session) = submitted(AppState::new(), "abc123");
    let (state, _) = observe(state, session, "completed");
    let (state, _) = update(
        state,
        Msg::ResultFetched {
            session,
            rows: vec![example_row()],
        },
    );
    let (state, effects) = update(
        state,
        Msg::ResultFetched {
            session,
            rows: Vec::new(),
        },
    );

    assert!(effects.is_empty());
    assert_eq!(state.results().len(), 1);
}

#[test]
fn failed_notifies_once_and_leaves_results_empty() {
    init_logging();
    let (state, session) = submitted(AppState::new(), "abc123");
    let (state, _) = observe(state, session, "queued");

    let (state, effects) = observe(state, session, "failed");
    assert_eq!(effects.first(), Some(&Effect::StopPolling { session }));
    assert_eq!(error_notifications(&effects), 1);
    assert!(!effects
        .iter()
        .any(|effect| matches!(effect, Effect::FetchResult { .. })));

    let (state, effects) = observe(state, session, "failed");
    assert!(effects.is_empty());

    assert!(state.results().is_empty());
    assert!(!state.is_busy());
    assert_eq!(state.lifecycle(), Some(LifecycleState::Failed));
    assert_eq!(state.phase(), DashboardPhase::Resolved);
}

#[test]
fn unrecognized_status_keeps_lifecycle() {
    init_logging();
    let (state, session) = submitted(AppState::new(), "abc123");
    let (state, _) = observe(state, session, "running");

    let (state, effects) = observe(state, session, "paused");
    assert!(effects.is_empty());
    let view = state.view();
    assert_eq!(view.lifecycle, Some(LifecycleState::Running));
    assert_eq!(view.unrecognized_status.as_deref(), Some("paused"));
    assert_eq!(view.phase, DashboardPhase::Polling);

    let (state, _) = observe(state, session, "running");
    assert_eq!(state.view().unrecognized_status, None);
}

#[test]
fn latest_observation_wins_without_monotonic_assumption() {
    init_logging();
    let (state, session) = submitted(AppState::new(), "abc123");
    let (state, _) = observe(state, session, "running");
    let (state, effects) = observe(state, session, "queued");

    assert!(effects.is_empty());
    assert_eq!(state.lifecycle(), Some(LifecycleState::Queued));
}

#[test]
fn not_ready_result_reopens_polling_by_default() {
    init_logging();
    let (state, first) = submitted(AppState::new(), "abc123");
    let (state, _) = observe(state, first, "completed");

    let (state, effects) = update(
        state,
        Msg::ResultNotReady {
            session: first,
            reason: "missing data".to_string(),
        },
    );
    let second = SessionId(2);
    assert_eq!(
        effects,
        vec![Effect::StartPolling {
            session: second,
            task_id: TaskId::new("abc123"),
        }]
    );
    assert!(state.is_busy());
    assert_eq!(state.phase(), DashboardPhase::Polling);

    // Observations tagged with the old session are stale now.
    let (state, effects) = observe(state, first, "completed");
    assert!(effects.is_empty());

    let (_state, effects) = observe(state, second, "completed");
    assert!(effects.contains(&Effect::FetchResult {
        session: second,
        task_id: TaskId::new("abc123"),
    }));
}

#[test]
fn not_ready_result_fails_when_configured() {
    init_logging();
    let state = AppState::with_policy(NotReadyPolicy::Fail);
    let (state, session) = submitted(state, "abc123");
    let (state, _) = observe(state, session, "completed");

    let (state, effects) = update(
        state,
        Msg::ResultNotReady {
            session,
            reason: "missing data".to_string(),
        },
    );
    assert_eq!(error_notifications(&effects), 1);
    assert!(!state.is_busy());
    assert!(state.results().is_empty());
    assert!(!state.has_result_set());
    assert_eq!(state.phase(), DashboardPhase::Resolved);
}

#[test]
fn not_ready_retry_gives_up_after_limit() {
    init_logging();
    let state = AppState::with_policy(NotReadyPolicy::Retry {
        max_attempts: Some(2),
    });
    let (state, first) = submitted(state, "abc123");
    let (state, _) = observe(state, first, "completed");
    let (state, effects) = update(
        state,
        Msg::ResultNotReady {
            session: first,
            reason: "404".to_string(),
        },
    );
    let second = match effects.as_slice() {
        [Effect::StartPolling { session, .. }] => *session,
        other => panic!("unexpected effects {other:?}"),
    };

    let (state, _) = observe(state, second, "completed");
    let (state, effects) = update(
        state,
        Msg::ResultNotReady {
            session: second,
            reason: "404".to_string(),
        },
    );
    assert_eq!(error_notifications(&effects), 1);
    assert!(!state.is_busy());
    assert_eq!(state.active_session(), None);
}

#[test]
fn result_before_completion_is_ignored() {
    init_logging();
    let (state, session) = submitted(AppState::new(), "abc123");
    let (state, effects) = update(
        state,
        Msg::ResultFetched {
            session,
            rows: vec![example_row()],
        },
    );

    assert!(effects.is_empty());
    assert!(state.results().is_empty());
    assert!(state.is_busy());
}

#[test]
fn empty_result_set_still_clears_busy() {
    init_logging();
    let (state, session) = submitted(AppState::new(), "abc123");
    let (state, _) = observe(state, session, "completed");

    let (state, effects) = update(
        state,
        Msg::ResultFetched {
            session,
            rows: Vec::new(),
        },
    );
    assert!(effects.is_empty());
    assert!(state.results().is_empty());
    assert!(state.has_result_set());
    assert!(!state.is_busy());
    assert_eq!(state.phase(), DashboardPhase::Resolved);
}
