//! Key dispatch. Text-entry states (token field, summary editor) win over
//! global bindings so typing `q` never quits the app mid-edit.

use crate::actions;
use crate::app::{App, SummariseFocus};
use crate::config::key_match;
use crate::models::{CalendarView, Page};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

pub fn handle_key(app: &mut App, key: KeyEvent) {
    if app.show_help_popup {
        app.show_help_popup = false;
        return;
    }

    if app.page == Page::Status && app.editing_token {
        handle_token_entry(app, key);
        return;
    }

    if app.page == Page::Summarise
        && matches!(app.summarise_focus, SummariseFocus::Title | SummariseFocus::Body)
    {
        handle_summarise_entry(app, key);
        return;
    }

    let global = app.config.keybindings.global.clone();
    if key_match(&key, &global.quit) {
        app.quit();
        return;
    }
    if key_match(&key, &global.help) {
        app.show_help_popup = true;
        return;
    }
    if key_match(&key, &global.back) {
        if app.page != Page::Home {
            actions::set_page(app, Page::Home);
        }
        return;
    }
    if key_match(&key, &global.page_home) {
        actions::set_page(app, Page::Home);
        return;
    }
    if key_match(&key, &global.page_summarise) {
        actions::set_page(app, Page::Summarise);
        return;
    }
    if key_match(&key, &global.page_status) {
        actions::set_page(app, Page::Status);
        return;
    }
    if key_match(&key, &global.page_calendar) {
        actions::set_page(app, Page::Calendar);
        return;
    }
    if key_match(&key, &global.page_repository) {
        actions::set_page(app, Page::Repository);
        return;
    }

    match app.page {
        Page::Home => handle_home(app, key),
        Page::Status => handle_status(app, key),
        Page::Calendar => handle_calendar(app, key),
        Page::Repository => handle_repository(app, key),
        Page::Summarise => handle_summarise_nav(app, key),
    }
}

fn handle_home(app: &mut App, key: KeyEvent) {
    // The three home cards, on mnemonic keys.
    match key.code {
        KeyCode::Char('s') | KeyCode::Char('S') => actions::set_page(app, Page::Summarise),
        KeyCode::Char('n') | KeyCode::Char('N') => actions::set_page(app, Page::Status),
        KeyCode::Char('c') | KeyCode::Char('C') => actions::set_page(app, Page::Calendar),
        _ => {}
    }
}

fn handle_status(app: &mut App, key: KeyEvent) {
    let list = app.config.keybindings.list.clone();
    if key_match(&key, &list.up) {
        app.todo_up();
    } else if key_match(&key, &list.down) {
        app.todo_down();
    } else if key_match(&key, &list.toggle) {
        if let Some(id) = app.selected_active_reminder().map(|r| r.id.clone()) {
            app.session.toggle_selected(&id);
        }
    } else if key_match(&key, &list.complete) {
        actions::complete_selected(app);
    } else if key_match(&key, &list.refresh) {
        actions::refresh_status(app);
        app.toast("Reminders refreshed.");
    } else if key_match(&key, &list.token) {
        app.editing_token = true;
        app.token_input.clear();
    }
}

fn handle_token_entry(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => actions::apply_token_input(app),
        KeyCode::Esc => {
            app.editing_token = false;
            app.token_input.clear();
        }
        KeyCode::Backspace => {
            app.token_input.pop();
        }
        KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.token_input.push(ch);
        }
        _ => {}
    }
}

fn handle_calendar(app: &mut App, key: KeyEvent) {
    let cal = app.config.keybindings.calendar.clone();
    if key_match(&key, &cal.prev) {
        app.focus_date = step_date(app.focus_date, app.calendar_view, -1);
    } else if key_match(&key, &cal.next) {
        app.focus_date = step_date(app.focus_date, app.calendar_view, 1);
    } else if key_match(&key, &cal.today) {
        app.focus_date = chrono::Local::now().date_naive();
    } else if key_match(&key, &cal.view_month) {
        app.calendar_view = CalendarView::Month;
    } else if key_match(&key, &cal.view_week) {
        app.calendar_view = CalendarView::Week;
    } else if key_match(&key, &cal.view_day) {
        app.calendar_view = CalendarView::Day;
    } else if key_match(&key, &cal.sync) {
        actions::sync_calendar_now(app);
    } else if key_match(&key, &cal.auto_refresh) {
        actions::toggle_auto_refresh(app);
    } else if key_match(&key, &cal.interval) {
        actions::cycle_refresh_interval(app);
    }
}

fn step_date(
    date: chrono::NaiveDate,
    view: CalendarView,
    direction: i64,
) -> chrono::NaiveDate {
    let days = match view {
        CalendarView::Month => {
            // Months are uneven; step via checked month arithmetic instead.
            let next = if direction > 0 {
                date.checked_add_months(chrono::Months::new(1))
            } else {
                date.checked_sub_months(chrono::Months::new(1))
            };
            return next.unwrap_or(date);
        }
        CalendarView::Week => 7,
        CalendarView::Day => 1,
    };
    date + chrono::Duration::days(days * direction)
}

fn handle_repository(app: &mut App, key: KeyEvent) {
    let list = app.config.keybindings.list.clone();
    if key_match(&key, &list.up) {
        app.notes_up();
    } else if key_match(&key, &list.down) {
        app.notes_down();
    } else if key_match(&key, &list.refresh) {
        actions::refresh_notes(app);
        app.toast("Repository refreshed.");
    } else if key_match(&key, &list.open) {
        actions::open_repository_dir(app);
    }
}

fn handle_summarise_nav(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Tab => app.summarise_focus = SummariseFocus::Title,
        KeyCode::Left => app.cycle_source(false),
        KeyCode::Right => app.cycle_source(true),
        KeyCode::Enter => app.summarise_focus = SummariseFocus::Title,
        _ => {}
    }
}

fn handle_summarise_entry(app: &mut App, key: KeyEvent) {
    // Ctrl+S saves from either field.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('s') {
        actions::save_summary(app);
        return;
    }

    match app.summarise_focus {
        SummariseFocus::Title => match key.code {
            KeyCode::Esc => app.summarise_focus = SummariseFocus::Source,
            KeyCode::Enter | KeyCode::Tab => app.summarise_focus = SummariseFocus::Body,
            KeyCode::Backspace => {
                app.title_input.pop();
            }
            KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                app.title_input.push(ch);
            }
            _ => {}
        },
        SummariseFocus::Body => match key.code {
            KeyCode::Esc => app.summarise_focus = SummariseFocus::Source,
            _ => {
                app.body.input(key);
            }
        },
        SummariseFocus::Source => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn month_stepping_handles_uneven_months() {
        let date = NaiveDate::from_ymd_opt(2026, 1, 31).unwrap();
        let next = step_date(date, CalendarView::Month, 1);
        assert_eq!(next, NaiveDate::from_ymd_opt(2026, 2, 28).unwrap());
    }

    #[test]
    fn week_and_day_stepping_move_by_fixed_amounts() {
        let date = NaiveDate::from_ymd_opt(2026, 8, 29).unwrap();
        assert_eq!(
            step_date(date, CalendarView::Week, 1),
            NaiveDate::from_ymd_opt(2026, 9, 5).unwrap()
        );
        assert_eq!(
            step_date(date, CalendarView::Day, -1),
            NaiveDate::from_ymd_opt(2026, 8, 28).unwrap()
        );
    }
}
