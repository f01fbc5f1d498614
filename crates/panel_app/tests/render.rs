use panel_app::ui::render::{render, render_notification};
use indexmap::IndexMap;
use panel_core::{
    AppViewModel, Contacts, DashboardPhase, LifecycleState, Notification, ResultRow, TaskId,
};
use pretty_assertions::assert_eq;

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[test]
fn empty_dashboard_shows_placeholder() {
    let lines = render(&AppViewModel::default());
    assert_eq!(
        lines,
        strings(&["No results yet. Start a scrape to see data here."])
    );
}

#[test]
fn polling_task_shows_badge_and_busy_text() {
    let view = AppViewModel {
        phase: DashboardPhase::Polling,
        task_id: Some(TaskId::new("abc123")),
        lifecycle: Some(LifecycleState::Running),
        busy: true,
        ..AppViewModel::default()
    };
    assert_eq!(
        render(&view),
        strings(&[
            "Task abc123: Scraping...",
            "Processing data...",
            "No results yet. Start a scrape to see data here.",
        ])
    );
}

#[test]
fn unrecognized_status_is_shown_verbatim() {
    let view = AppViewModel {
        phase: DashboardPhase::Polling,
        task_id: Some(TaskId::new("abc123")),
        lifecycle: Some(LifecycleState::Queued),
        unrecognized_status: Some("paused".to_string()),
        busy: true,
        ..AppViewModel::default()
    };
    assert_eq!(render(&view)[0], "Task abc123: Unrecognized status \"paused\"");
}

#[test]
fn result_rows_are_previewed() {
    let mut social_media = IndexMap::new();
    for platform in ["facebook", "linkedin", "twitter", "youtube"] {
        social_media.insert(platform.to_string(), format!("https://{platform}.com/acme"));
    }
    let full = ResultRow {
        url: "http://a-very-long-domain-name-for-testing.example/path".to_string(),
        company: Some("Acme".to_string()),
        contacts: Contacts {
            emails: strings(&["a@acme.example", "b@acme.example", "c@acme.example"]),
            phones: strings(&["+1 555 0100"]),
        },
        tagline: Some("x".repeat(70)),
        services: strings(&["Consulting", "Design", "Support", "Training"]),
        social_media,
        industry: Some("Manufacturing".to_string()),
    };
    let bare = ResultRow {
        url: "http://bare.example".to_string(),
        ..ResultRow::default()
    };
    let view = AppViewModel {
        phase: DashboardPhase::Resolved,
        task_id: Some(TaskId::new("abc123")),
        lifecycle: Some(LifecycleState::Completed),
        can_download: true,
        results: vec![full, bare],
        ..AppViewModel::default()
    };

    let lines = render(&view);
    let tagline = format!("    Tagline:  {}...", "x".repeat(60));
    assert_eq!(
        lines,
        vec![
            "Task abc123: Done!".to_string(),
            "Scraping Results (2 sites)".to_string(),
            "- http://a-very-long-domain-name-for-testi...".to_string(),
            "    Company:  Acme".to_string(),
            "    Contacts: email a@acme.example, b@acme.example +1 more; phone +1 555 0100"
                .to_string(),
            tagline,
            "    Services: Consulting, Design, Support +1 more".to_string(),
            "    Social:   facebook, linkedin, twitter".to_string(),
            "    Industry: Manufacturing".to_string(),
            "- http://bare.example".to_string(),
            "    Company:  -".to_string(),
            "    Contacts: -".to_string(),
            "    Tagline:  -".to_string(),
            "    Services: -".to_string(),
            "    Social:   -".to_string(),
            "    Industry: -".to_string(),
        ]
    );
}

#[test]
fn notifications_are_prefixed_by_severity() {
    assert_eq!(
        render_notification(&Notification::error("Failed to start scraping.")),
        "error: Failed to start scraping."
    );
    assert_eq!(
        render_notification(&Notification::info("Report saved to reports/x.pdf")),
        "Report saved to reports/x.pdf"
    );
}

#[test]
fn social_preview_takes_first_three_in_received_order() {
    let mut social_media = IndexMap::new();
    for platform in ["twitter", "youtube", "facebook", "instagram"] {
        social_media.insert(platform.to_string(), format!("https://{platform}.com/acme"));
    }
    let view = AppViewModel {
        phase: DashboardPhase::Resolved,
        lifecycle: Some(LifecycleState::Completed),
        results: vec![ResultRow {
            url: "http://acme.example".to_string(),
            social_media,
            ..ResultRow::default()
        }],
        ..AppViewModel::default()
    };

    let lines = render(&view);
    assert!(lines.contains(&"    Social:   twitter, youtube, facebook".to_string()));
}
