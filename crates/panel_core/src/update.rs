use crate::lifecycle::{transition, LifecycleState, TransitionEffect};
use crate::{
    AppState, DownloadOutcome, Effect, Msg, NotReadyPolicy, Notification, ResultRow, SessionId,
};

const TASK_FAILED_TEXT: &str = "Scraping task failed. Please try again.";
const SUBMIT_FAILED_TEXT: &str = "Failed to start scraping.";
const DOWNLOAD_FAILED_TEXT: &str = "Failed to download PDF report. Please try again.";
const RESULT_MISSING_TEXT: &str = "Scraping finished but no results could be retrieved.";

/// Pure update function: applies a message to state and returns any effects.
///
/// Once the state is detached every message is ignored.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    if state.is_detached() {
        return (state, Vec::new());
    }

    let effects = match msg {
        Msg::TaskSubmitted { task_id } => {
            let mut effects = Vec::with_capacity(2);
            if let Some(previous) = state.active_session() {
                effects.push(Effect::StopPolling { session: previous });
            }
            let session = state.start_task(task_id.clone());
            effects.push(Effect::StartPolling { session, task_id });
            effects
        }
        Msg::SubmitFailed { .. } => vec![Effect::Notify(Notification::error(SUBMIT_FAILED_TEXT))],
        Msg::StatusObserved { session, status } => apply_status(&mut state, session, &status),
        Msg::ResultFetched { session, rows } => apply_result(&mut state, session, rows),
        Msg::ResultNotReady { session, .. } => apply_not_ready(&mut state, session),
        Msg::DownloadRequested => {
            if state.is_downloading() {
                return (state, Vec::new());
            }
            match state.task_id().cloned() {
                Some(task_id) => {
                    state.set_downloading(true);
                    vec![Effect::DownloadReport { task_id }]
                }
                None => Vec::new(),
            }
        }
        Msg::DownloadFinished { outcome, .. } => {
            state.set_downloading(false);
            let notification = match outcome {
                DownloadOutcome::Saved { path } => Notification::info(format!("Report saved to {path}")),
                DownloadOutcome::Failed { .. } => Notification::error(DOWNLOAD_FAILED_TEXT),
            };
            vec![Effect::Notify(notification)]
        }
        Msg::Detached => {
            let active = state.active_session();
            state.detach();
            active
                .map(|session| vec![Effect::StopPolling { session }])
                .unwrap_or_default()
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn apply_status(state: &mut AppState, session: SessionId, raw: &str) -> Vec<Effect> {
    // Stale or already-ended sessions are discarded here.
    let Some(task) = state.polling_task_mut(session) else {
        return Vec::new();
    };

    let Some(observed) = LifecycleState::parse(raw) else {
        if task.unrecognized_status.as_deref() != Some(raw) {
            task.unrecognized_status = Some(raw.to_string());
            state.mark_dirty();
        }
        return Vec::new();
    };

    let rule = transition(observed);
    let changed = task.lifecycle != Some(rule.next) || task.unrecognized_status.is_some();
    task.lifecycle = Some(rule.next);
    task.unrecognized_status = None;

    if rule.ends_session && !task.session.claim_completion() {
        return Vec::new();
    }
    let task_id = task.task_id.clone();
    if changed || rule.ends_session {
        state.mark_dirty();
    }

    let mut effects = Vec::new();
    if rule.ends_session {
        effects.push(Effect::StopPolling { session });
    }
    match rule.effect {
        TransitionEffect::None => {}
        TransitionEffect::FetchResult => effects.push(Effect::FetchResult { session, task_id }),
        TransitionEffect::NotifyFailure => {
            state.resolve_without_results();
            effects.push(Effect::Notify(Notification::error(TASK_FAILED_TEXT)));
        }
    }
    effects
}

fn apply_result(state: &mut AppState, session: SessionId, rows: Vec<ResultRow>) -> Vec<Effect> {
    if state.fetching_task_mut(session).is_none() {
        return Vec::new();
    }
    state.resolve_with_results(rows);
    Vec::new()
}

fn apply_not_ready(state: &mut AppState, session: SessionId) -> Vec<Effect> {
    let policy = state.policy();
    let Some(task) = state.fetching_task_mut(session) else {
        return Vec::new();
    };
    task.not_ready_attempts += 1;

    let retry = match policy {
        NotReadyPolicy::Retry { max_attempts } => {
            max_attempts.is_none_or(|max| task.not_ready_attempts < max)
        }
        NotReadyPolicy::Fail => false,
    };

    if retry {
        return match state.reopen_session() {
            Some((session, task_id)) => vec![Effect::StartPolling { session, task_id }],
            None => Vec::new(),
        };
    }

    state.resolve_without_results();
    vec![Effect::Notify(Notification::error(RESULT_MISSING_TEXT))]
}
