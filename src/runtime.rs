//! Per-cycle housekeeping run at the top of the event loop.

use crate::actions;
use crate::app::App;
use crate::models::Page;
use chrono::Local;

pub fn tick(app: &mut App) {
    expire_toast(app);
    handle_auto_refresh(app);
}

fn expire_toast(app: &mut App) {
    if let Some(expiry) = app.toast_expiry {
        if Local::now() >= expiry {
            app.toast_expiry = None;
            app.toast_message = None;
        }
    }
}

/// When auto-refresh is armed and due, run one reconcile cycle. Leaving the
/// Calendar page or turning auto-refresh off disarms it, so no further
/// fetches happen.
fn handle_auto_refresh(app: &mut App) {
    if !app.session.auto_refresh || app.page != Page::Calendar {
        return;
    }
    let due = match app.next_refresh {
        Some(at) => Local::now() >= at,
        // Newly armed: fetch on the next cycle and schedule from there.
        None => true,
    };
    if due {
        actions::reconcile_calendar(app);
    }
}
