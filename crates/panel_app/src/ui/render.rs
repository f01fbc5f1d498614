use panel_core::{AppViewModel, LifecycleState, Notification, ResultRow, Severity};

use super::constants::*;

pub fn render(view: &AppViewModel) -> Vec<String> {
    let mut lines = Vec::new();

    if let Some(task_id) = &view.task_id {
        lines.push(format!("Task {task_id}: {}", status_badge(view)));
    }
    if view.busy {
        lines.push(BUSY_TEXT.to_string());
    }
    if view.downloading {
        lines.push(DOWNLOADING_TEXT.to_string());
    }

    if view.results.is_empty() {
        lines.push(EMPTY_RESULTS_TEXT.to_string());
        return lines;
    }

    lines.push(format!("Scraping Results ({} sites)", view.results.len()));
    for row in &view.results {
        lines.extend(format_row(row));
    }
    lines
}

pub fn render_notification(notification: &Notification) -> String {
    match notification.severity {
        Severity::Info => notification.text.clone(),
        Severity::Error => format!("error: {}", notification.text),
    }
}

fn status_badge(view: &AppViewModel) -> String {
    if let Some(raw) = &view.unrecognized_status {
        return format!("Unrecognized status {raw:?}");
    }
    let label = match view.lifecycle {
        None | Some(LifecycleState::Queued) => "Queued",
        Some(LifecycleState::Running) => "Scraping...",
        Some(LifecycleState::Completed) => "Done!",
        Some(LifecycleState::Failed) => "Failed",
    };
    label.to_string()
}

fn format_row(row: &ResultRow) -> Vec<String> {
    let company = row.company.as_deref().filter(|c| !c.is_empty());
    let tagline = row
        .tagline
        .as_deref()
        .filter(|t| !t.is_empty())
        .map(|t| truncate_chars(t, TAGLINE_MAX_CHARS));
    let industry = row.industry.as_deref().filter(|i| !i.is_empty());
    let social: Vec<&str> = row
        .social_media
        .keys()
        .take(SOCIAL_SHOWN)
        .map(String::as_str)
        .collect();

    vec![
        format!("- {}", truncate_chars(&row.url, URL_MAX_CHARS)),
        format!("    Company:  {}", company.unwrap_or(NO_DATA)),
        format!("    Contacts: {}", format_contacts(row)),
        format!("    Tagline:  {}", tagline.as_deref().unwrap_or(NO_DATA)),
        format!(
            "    Services: {}",
            preview_list(&row.services, SERVICES_SHOWN).unwrap_or_else(|| NO_DATA.to_string())
        ),
        format!(
            "    Social:   {}",
            if social.is_empty() {
                NO_DATA.to_string()
            } else {
                social.join(", ")
            }
        ),
        format!("    Industry: {}", industry.unwrap_or(NO_DATA)),
    ]
}

fn format_contacts(row: &ResultRow) -> String {
    let emails = preview_list(&row.contacts.emails, CONTACTS_SHOWN);
    let phones = preview_list(&row.contacts.phones, CONTACTS_SHOWN);
    match (emails, phones) {
        (Some(e), Some(p)) => format!("email {e}; phone {p}"),
        (Some(e), None) => format!("email {e}"),
        (None, Some(p)) => format!("phone {p}"),
        (None, None) => NO_DATA.to_string(),
    }
}

/// First `shown` items joined by commas, with a `+N more` suffix.
fn preview_list(items: &[String], shown: usize) -> Option<String> {
    if items.is_empty() {
        return None;
    }
    let mut text = items
        .iter()
        .take(shown)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    if items.len() > shown {
        text.push_str(&format!(" +{} more", items.len() - shown));
    }
    Some(text)
}

fn truncate_chars(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max).collect();
    out.push_str("...");
    out
}
