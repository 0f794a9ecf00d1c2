//! UI-triggered operations. Each one mutates the `App`, talks to the
//! integrations where needed, and reports the outcome as a toast.

use crate::app::App;
use crate::events;
use crate::models::Page;
use crate::repository;
use crate::session::Notice;
use crate::slack;
use chrono::{Duration, Local};

pub fn set_page(app: &mut App, page: Page) {
    app.set_page(page);
    match page {
        Page::Status => refresh_status(app),
        Page::Calendar => reconcile_calendar(app),
        Page::Repository => refresh_notes(app),
        _ => {}
    }
}

/// Re-fetches the raw reminder list for the to-do view. The Status page
/// always shows live data; the session cache only backs the calendar.
pub fn refresh_status(app: &mut App) {
    let Some(token) = app.session.token().map(str::to_string) else {
        app.active.clear();
        app.completed.clear();
        app.todo_state.select(None);
        app.status_notice = Some(Notice::Prompt(
            "Add SLACK_USER_TOKEN (or press `t` to paste a token) to load your reminders."
                .to_string(),
        ));
        return;
    };

    match slack::list_reminders(&app.client, &token) {
        Ok(reminders) => {
            let (active, completed) = events::split_for_todo(&reminders);
            app.active = active;
            app.completed = completed;
            app.status_notice = None;
            app.clamp_todo_selection();
            log::info!(
                "loaded {} active / {} completed reminder(s)",
                app.active.len(),
                app.completed.len()
            );
        }
        Err(err) => {
            app.active.clear();
            app.completed.clear();
            app.todo_state.select(None);
            app.status_notice = Some(Notice::Warning(err.message()));
        }
    }
}

/// One reconciliation cycle for the calendar: cached vs live is the
/// session's call; this just wires in the real fetch and schedules the
/// next auto-refresh tick.
pub fn reconcile_calendar(app: &mut App) {
    let client = app.client.clone();
    let out = app.session.reconcile(|token| {
        slack::list_reminders(&client, token).map(|reminders| events::events_from_reminders(&reminders))
    });
    app.calendar_events = out.events;
    app.calendar_notice = out.notice;
    schedule_next_refresh(app);
}

/// Manual "Sync from Slack": always hits the network.
pub fn sync_calendar_now(app: &mut App) {
    let client = app.client.clone();
    let result = app.session.sync_now(|token| {
        slack::list_reminders(&client, token).map(|reminders| events::events_from_reminders(&reminders))
    });
    match result {
        Ok(count) => {
            app.calendar_events = app.session.cached_events().unwrap_or_default().to_vec();
            app.calendar_notice = None;
            app.toast(format!("Loaded {count} reminder(s) from Slack."));
        }
        Err(err) => app.toast_error(err.message()),
    }
    schedule_next_refresh(app);
}

pub fn toggle_auto_refresh(app: &mut App) {
    app.session.auto_refresh = !app.session.auto_refresh;
    if app.session.auto_refresh {
        app.toast(format!(
            "Auto-refresh on (every {}s).",
            app.session.refresh_interval_secs()
        ));
    } else {
        app.toast("Auto-refresh off.");
    }
    schedule_next_refresh(app);
}

pub fn cycle_refresh_interval(app: &mut App) {
    app.session.cycle_refresh_interval();
    app.toast(format!(
        "Refresh interval: {}s.",
        app.session.refresh_interval_secs()
    ));
    schedule_next_refresh(app);
}

fn schedule_next_refresh(app: &mut App) {
    app.next_refresh = if app.session.auto_refresh && app.session.token().is_some() {
        Some(Local::now() + Duration::seconds(app.session.refresh_interval_secs() as i64))
    } else {
        None
    };
}

/// Completes every checked reminder independently, then re-fetches so the
/// view reflects the authoritative remote state.
pub fn complete_selected(app: &mut App) {
    if app.session.selected_ids.is_empty() {
        app.toast("Nothing selected. Check reminders with space first.");
        return;
    }

    let client = app.client.clone();
    let outcome = app
        .session
        .complete_selected(|token, id| slack::complete_reminder(&client, token, id));

    if outcome.failures.is_empty() {
        app.toast(outcome.summary());
    } else {
        app.toast_error(outcome.summary());
    }

    refresh_status(app);
    if app.page == Page::Calendar || app.session.auto_refresh {
        reconcile_calendar(app);
    }
}

pub fn apply_token_input(app: &mut App) {
    let token = app.token_input.trim().to_string();
    app.editing_token = false;
    app.token_input.clear();
    if token.is_empty() {
        app.toast("Token unchanged.");
        return;
    }
    app.session.set_token(token);
    app.session.invalidate();
    app.toast("Token updated.");
    refresh_status(app);
}

pub fn refresh_notes(app: &mut App) {
    match repository::list_summaries(&app.config.data.repository_path) {
        Ok(notes) => {
            app.notes = notes;
            if app.notes.is_empty() {
                app.notes_state.select(None);
                app.note_preview = None;
            } else {
                let selected = app
                    .notes_state
                    .selected()
                    .map(|i| i.min(app.notes.len() - 1))
                    .unwrap_or(0);
                app.notes_state.select(Some(selected));
                app.load_note_preview();
            }
        }
        Err(err) => app.toast_error(format!("Failed to list repository: {err}")),
    }
}

pub fn save_summary(app: &mut App) {
    let title = app.title_input.trim().to_string();
    if title.is_empty() {
        app.toast_error("Give the summary a title first.");
        return;
    }
    let body = app.body_text();
    if body.trim().is_empty() {
        app.toast_error("The summary body is empty.");
        return;
    }

    let source_type = app.source_type().as_str();
    match repository::save_summary(
        &app.config.data.repository_path,
        &title,
        &body,
        source_type,
        None,
    ) {
        Ok(path) => {
            let name = path
                .file_name()
                .and_then(|s| s.to_str())
                .unwrap_or("summary")
                .to_string();
            app.clear_summarise_inputs();
            app.toast(format!("Saved {name} to the repository."));
        }
        Err(err) => app.toast_error(format!("Failed to save summary: {err}")),
    }
}

pub fn open_repository_dir(app: &mut App) {
    let dir = app.config.data.repository_path.clone();
    if let Err(err) = repository::ensure_repository_dir(&dir) {
        app.toast_error(format!("Repository unavailable: {err}"));
        return;
    }
    match open::that(&dir) {
        Ok(()) => app.toast(format!("Opened {}", dir.display())),
        Err(err) => app.toast_error(format!("Failed to open repository: {err}")),
    }
}
