//! Turns raw reminders into calendar events and orders the to-do view.

use crate::models::{CalendarEvent, Reminder};
use chrono::{Local, TimeZone};

/// Converts an epoch-seconds timestamp into a local RFC 3339 string, or
/// `None` when the value is outside chrono's representable range.
pub fn ts_to_iso_local(ts: i64) -> Option<String> {
    Local.timestamp_opt(ts, 0).single().map(|dt| dt.to_rfc3339())
}

/// Maps active, timed reminders 1:1 to calendar events, preserving input
/// order. Completed reminders and reminders without a usable integer time
/// are skipped; a malformed record never aborts the rest.
pub fn events_from_reminders(reminders: &[Reminder]) -> Vec<CalendarEvent> {
    let mut events = Vec::new();
    for reminder in reminders {
        if !reminder.is_active() {
            continue;
        }
        let Some(ts) = reminder.time else {
            continue;
        };
        let Some(start) = ts_to_iso_local(ts) else {
            log::debug!("skipping reminder {} with out-of-range time {}", reminder.id, ts);
            continue;
        };
        events.push(CalendarEvent {
            id: reminder.id.clone(),
            title: reminder.title().to_string(),
            start,
            all_day: false,
        });
    }
    events
}

/// Splits reminders into (active, completed) for the to-do view. Active
/// reminders sort soonest-first with untimed ones leading; completed
/// reminders sort most-recently-completed first. Both sorts are stable.
pub fn split_for_todo(reminders: &[Reminder]) -> (Vec<Reminder>, Vec<Reminder>) {
    let mut active: Vec<Reminder> = Vec::new();
    let mut completed: Vec<Reminder> = Vec::new();
    for reminder in reminders {
        if reminder.is_active() {
            active.push(reminder.clone());
        } else {
            completed.push(reminder.clone());
        }
    }
    active.sort_by_key(Reminder::sort_time);
    completed.sort_by_key(|r| std::cmp::Reverse(r.sort_time()));
    (active, completed)
}

/// "YYYY-MM-DD HH:MM" label for timed reminders in the to-do list.
pub fn short_local_time(ts: i64) -> Option<String> {
    Local
        .timestamp_opt(ts, 0)
        .single()
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reminder(id: &str, text: &str, time: Option<i64>, complete_ts: Option<i64>) -> Reminder {
        Reminder {
            id: id.to_string(),
            text: text.to_string(),
            time,
            complete_ts,
        }
    }

    #[test]
    fn normalizer_drops_completed_and_untimed_records() {
        let reminders = vec![
            reminder("1", "Pay rent", Some(1_700_000_000), None),
            reminder("2", "Old", Some(1_600_000_000), Some(1_600_000_100)),
            reminder("3", "No time", None, None),
        ];
        let events = events_from_reminders(&reminders);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].id, "1");
        assert_eq!(events[0].title, "Pay rent");
        assert_eq!(events[0].start, ts_to_iso_local(1_700_000_000).unwrap());
        assert!(!events[0].all_day);
    }

    #[test]
    fn normalizer_output_never_exceeds_input() {
        let reminders = vec![
            reminder("1", "a", Some(10), None),
            reminder("2", "b", None, None),
            reminder("3", "c", Some(20), Some(5)),
        ];
        assert!(events_from_reminders(&reminders).len() <= reminders.len());
    }

    #[test]
    fn normalizer_is_idempotent() {
        let reminders = vec![
            reminder("1", "a", Some(1_700_000_000), None),
            reminder("2", "", Some(1_700_000_100), None),
        ];
        assert_eq!(
            events_from_reminders(&reminders),
            events_from_reminders(&reminders)
        );
    }

    #[test]
    fn normalizer_preserves_input_order() {
        let reminders = vec![
            reminder("late", "later", Some(2_000_000_000), None),
            reminder("early", "sooner", Some(1_000_000_000), None),
        ];
        let events = events_from_reminders(&reminders);
        assert_eq!(events[0].id, "late");
        assert_eq!(events[1].id, "early");
    }

    #[test]
    fn blank_title_gets_placeholder() {
        let events = events_from_reminders(&[reminder("1", "   ", Some(1_700_000_000), None)]);
        assert_eq!(events[0].title, "Reminder");
    }

    #[test]
    fn out_of_range_time_is_skipped_not_fatal() {
        let reminders = vec![
            reminder("1", "huge", Some(i64::MAX), None),
            reminder("2", "fine", Some(1_700_000_000), None),
        ];
        let events = events_from_reminders(&reminders);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].id, "2");
    }

    #[test]
    fn todo_ordering_puts_sooner_active_first() {
        let reminders = vec![
            reminder("t2", "b", Some(200), None),
            reminder("t1", "a", Some(100), None),
            reminder("none", "c", None, None),
        ];
        let (active, completed) = split_for_todo(&reminders);
        let ids: Vec<&str> = active.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["none", "t1", "t2"]);
        assert!(completed.is_empty());
    }

    #[test]
    fn todo_ordering_puts_recently_completed_first() {
        let reminders = vec![
            reminder("old", "a", Some(100), Some(100)),
            reminder("new", "b", Some(300), Some(300)),
        ];
        let (_, completed) = split_for_todo(&reminders);
        assert_eq!(completed[0].id, "new");
        assert_eq!(completed[1].id, "old");
    }
}
