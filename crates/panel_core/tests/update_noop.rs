use panel_core::{update, AppState, Msg, SessionId};

/// Messages that must not touch an idle dashboard.
#[test]
fn idle_dashboard_ignores_unrelated_messages() {
    let idle = AppState::new();
    let ignored = [
        Msg::NoOp,
        Msg::DownloadRequested,
        Msg::StatusObserved {
            session: SessionId(7),
            status: "completed".to_string(),
        },
        Msg::ResultFetched {
            session: SessionId(7),
            rows: Vec::new(),
        },
    ];

    for msg in ignored {
        let (next, effects) = update(idle.clone(), msg.clone());
        assert_eq!(next, idle, "{msg:?} changed state");
        assert!(effects.is_empty(), "{msg:?} produced effects");
    }
}
