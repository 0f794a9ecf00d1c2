//! Per-session sync state: the single source of truth for "current known
//! reminders" between render cycles.
//!
//! One `Session` lives for the whole interactive run. Every render cycle
//! calls [`Session::reconcile`] exactly once; all mutation happens inside
//! that single-threaded cycle, so no locking is needed.

use crate::models::CalendarEvent;
use crate::slack::SlackError;
use chrono::{DateTime, Local};
use std::collections::HashSet;

/// Allowed auto-refresh intervals, in seconds. Bounded to keep periodic
/// re-fetching within Slack's rate limits.
pub const REFRESH_INTERVALS: [u64; 4] = [15, 30, 60, 300];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SyncState {
    /// No usable token anywhere; render an empty/prompt state.
    NoToken,
    /// Auto-refresh off: prefer the cache, fetch only when it is empty.
    Cached,
    /// Auto-refresh on: re-fetch and overwrite the cache every cycle.
    Live,
}

/// What a render cycle gets back: the events to draw plus an optional
/// notice for the user. A notice is never smuggled in as fake event data.
pub struct RenderEvents {
    pub events: Vec<CalendarEvent>,
    pub notice: Option<Notice>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Notice {
    /// No token configured; prompt, don't alarm.
    Prompt(String),
    /// A fetch failed; previously cached data (if any) is still shown.
    Warning(String),
}

impl Notice {
    pub fn text(&self) -> &str {
        match self {
            Notice::Prompt(msg) | Notice::Warning(msg) => msg,
        }
    }
}

/// Outcome of a completion pass: every attempted id either completed or
/// contributed a (id, message) failure. One failure never blocks the rest.
#[derive(Default)]
pub struct CompletionOutcome {
    pub completed: usize,
    pub failures: Vec<(String, String)>,
}

impl CompletionOutcome {
    pub fn summary(&self) -> String {
        if self.failures.is_empty() {
            format!("Completed {} reminder(s).", self.completed)
        } else {
            let errors: Vec<String> = self
                .failures
                .iter()
                .map(|(id, msg)| format!("{id}: {msg}"))
                .collect();
            format!(
                "Completed {} reminder(s); {} failed: {}",
                self.completed,
                self.failures.len(),
                errors.join("; ")
            )
        }
    }
}

pub struct Session {
    token: Option<String>,
    events: Option<Vec<CalendarEvent>>,
    pub auto_refresh: bool,
    refresh_interval_secs: u64,
    pub selected_ids: HashSet<String>,
    pub last_synced: Option<DateTime<Local>>,
}

impl Session {
    pub fn new(token: Option<String>) -> Self {
        Self {
            token: token.filter(|t| !t.trim().is_empty()),
            events: None,
            auto_refresh: false,
            refresh_interval_secs: 60,
            selected_ids: HashSet::new(),
            last_synced: None,
        }
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn set_token(&mut self, token: impl Into<String>) {
        let token = token.into();
        self.token = if token.trim().is_empty() {
            None
        } else {
            Some(token)
        };
    }

    pub fn state(&self) -> SyncState {
        if self.token.is_none() {
            SyncState::NoToken
        } else if self.auto_refresh {
            SyncState::Live
        } else {
            SyncState::Cached
        }
    }

    pub fn cached_events(&self) -> Option<&[CalendarEvent]> {
        self.events.as_deref()
    }

    /// Drops the cache so the next cycle re-fetches authoritative state.
    pub fn invalidate(&mut self) {
        self.events = None;
    }

    pub fn refresh_interval_secs(&self) -> u64 {
        self.refresh_interval_secs
    }

    /// Snaps an arbitrary configured value to the nearest allowed interval.
    pub fn set_refresh_interval(&mut self, secs: u64) {
        self.refresh_interval_secs = REFRESH_INTERVALS
            .iter()
            .copied()
            .min_by_key(|allowed| allowed.abs_diff(secs))
            .unwrap_or(60);
    }

    pub fn cycle_refresh_interval(&mut self) {
        let idx = REFRESH_INTERVALS
            .iter()
            .position(|&s| s == self.refresh_interval_secs)
            .unwrap_or(0);
        self.refresh_interval_secs = REFRESH_INTERVALS[(idx + 1) % REFRESH_INTERVALS.len()];
    }

    /// One render cycle's worth of reconciliation. `fetch` is only invoked
    /// when the state machine decides live data is needed.
    ///
    /// Fetch failures never silently destroy previously shown data: with a
    /// cache present the cache is kept and a warning is attached; without
    /// one, the empty list is returned alongside the warning.
    pub fn reconcile<F>(&mut self, fetch: F) -> RenderEvents
    where
        F: FnOnce(&str) -> Result<Vec<CalendarEvent>, SlackError>,
    {
        let token = match &self.token {
            None => {
                return RenderEvents {
                    events: Vec::new(),
                    notice: Some(Notice::Prompt(
                        "Add SLACK_USER_TOKEN (or paste a token on the Status page) to load reminders."
                            .to_string(),
                    )),
                };
            }
            Some(token) => token.clone(),
        };

        if !self.auto_refresh {
            if let Some(cached) = &self.events {
                return RenderEvents {
                    events: cached.clone(),
                    notice: None,
                };
            }
        }

        match fetch(&token) {
            Ok(events) => {
                self.events = Some(events.clone());
                self.last_synced = Some(Local::now());
                RenderEvents {
                    events,
                    notice: None,
                }
            }
            Err(err) => {
                log::warn!("reminder fetch failed: {}", err.message());
                let events = self.events.clone().unwrap_or_default();
                RenderEvents {
                    events,
                    notice: Some(Notice::Warning(err.message())),
                }
            }
        }
    }

    /// Manual escape hatch: always fetches, regardless of cache state.
    /// Returns the number of loaded events; on failure the existing cache
    /// stays intact.
    pub fn sync_now<F>(&mut self, fetch: F) -> Result<usize, SlackError>
    where
        F: FnOnce(&str) -> Result<Vec<CalendarEvent>, SlackError>,
    {
        let token = self.token.clone().ok_or(SlackError::MissingToken)?;
        let events = fetch(&token)?;
        let count = events.len();
        self.events = Some(events);
        self.last_synced = Some(Local::now());
        Ok(count)
    }

    pub fn toggle_selected(&mut self, id: &str) {
        if !self.selected_ids.remove(id) {
            self.selected_ids.insert(id.to_string());
        }
    }

    /// Completes every selected reminder independently, collecting per-id
    /// failures. The selection is cleared no matter what happened, and the
    /// event cache is invalidated so the next cycle re-fetches the
    /// authoritative remote state (a failed completion simply reappears).
    pub fn complete_selected<F>(&mut self, mut complete: F) -> CompletionOutcome
    where
        F: FnMut(&str, &str) -> Result<(), SlackError>,
    {
        let mut outcome = CompletionOutcome::default();
        let ids: Vec<String> = {
            let mut ids: Vec<String> = self.selected_ids.drain().collect();
            ids.sort();
            ids
        };

        let Some(token) = self.token.clone() else {
            for id in ids {
                outcome
                    .failures
                    .push((id, SlackError::MissingToken.message()));
            }
            return outcome;
        };

        for id in ids {
            match complete(&token, &id) {
                Ok(()) => outcome.completed += 1,
                Err(err) => outcome.failures.push((id, err.message())),
            }
        }

        self.invalidate();
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(id: &str) -> CalendarEvent {
        CalendarEvent {
            id: id.to_string(),
            title: format!("event {id}"),
            start: "2023-11-14T00:13:20+00:00".to_string(),
            all_day: false,
        }
    }

    #[test]
    fn no_token_yields_prompt_and_empty_list_without_fetching() {
        let mut session = Session::new(None);
        assert_eq!(session.state(), SyncState::NoToken);

        let out = session.reconcile(|_| panic!("must not fetch without a token"));
        assert!(out.events.is_empty());
        assert!(matches!(out.notice, Some(Notice::Prompt(_))));
    }

    #[test]
    fn cached_state_prefers_existing_cache() {
        let mut session = Session::new(Some("xoxp-test".to_string()));
        session
            .sync_now(|_| Ok(vec![event("1")]))
            .expect("seed cache");
        assert_eq!(session.state(), SyncState::Cached);

        let out = session.reconcile(|_| panic!("cache present, must not fetch"));
        assert_eq!(out.events.len(), 1);
        assert!(out.notice.is_none());
    }

    #[test]
    fn cached_state_fetches_once_when_cache_is_empty() {
        let mut session = Session::new(Some("xoxp-test".to_string()));
        let out = session.reconcile(|_| Ok(vec![event("1"), event("2")]));
        assert_eq!(out.events.len(), 2);
        assert_eq!(session.cached_events().map(<[_]>::len), Some(2));
    }

    #[test]
    fn live_state_overwrites_cache_every_cycle() {
        let mut session = Session::new(Some("xoxp-test".to_string()));
        session.auto_refresh = true;
        assert_eq!(session.state(), SyncState::Live);

        session.reconcile(|_| Ok(vec![event("old")]));
        let out = session.reconcile(|_| Ok(vec![event("new-a"), event("new-b")]));
        assert_eq!(out.events.len(), 2);
        assert_eq!(session.cached_events().map(<[_]>::len), Some(2));
    }

    #[test]
    fn failed_refresh_keeps_previous_cache() {
        let mut session = Session::new(Some("xoxp-test".to_string()));
        session.auto_refresh = true;
        session.reconcile(|_| Ok(vec![event("kept")]));

        let out = session.reconcile(|_| Err(SlackError::Transport("timeout".to_string())));
        assert_eq!(out.events.len(), 1);
        assert_eq!(out.events[0].id, "kept");
        assert!(matches!(out.notice, Some(Notice::Warning(_))));
        assert_eq!(session.cached_events().map(<[_]>::len), Some(1));
    }

    #[test]
    fn failed_first_fetch_yields_empty_list_and_warning() {
        let mut session = Session::new(Some("xoxp-test".to_string()));
        let out = session.reconcile(|_| Err(SlackError::Api("invalid_auth".to_string())));
        assert!(out.events.is_empty());
        assert!(matches!(out.notice, Some(Notice::Warning(_))));
    }

    #[test]
    fn sync_now_failure_leaves_cache_intact() {
        let mut session = Session::new(Some("xoxp-test".to_string()));
        session.sync_now(|_| Ok(vec![event("1")])).unwrap();

        let err = session
            .sync_now(|_| Err(SlackError::Transport("down".to_string())))
            .unwrap_err();
        assert!(matches!(err, SlackError::Transport(_)));
        assert_eq!(session.cached_events().map(<[_]>::len), Some(1));
    }

    #[test]
    fn sync_now_without_token_is_missing_token() {
        let mut session = Session::new(None);
        let err = session.sync_now(|_| Ok(Vec::new())).unwrap_err();
        assert!(matches!(err, SlackError::MissingToken));
    }

    #[test]
    fn completion_collects_failures_and_clears_selection() {
        let mut session = Session::new(Some("xoxp-test".to_string()));
        session.sync_now(|_| Ok(vec![event("a"), event("b")])).unwrap();
        session.toggle_selected("a");
        session.toggle_selected("b");

        let outcome = session.complete_selected(|_, id| {
            if id == "a" {
                Ok(())
            } else {
                Err(SlackError::Api("missing_scope".to_string()))
            }
        });

        assert_eq!(outcome.completed, 1);
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].0, "b");
        assert!(outcome.failures[0].1.contains("missing_scope"));
        // Selection always clears; cache is invalidated for a fresh fetch.
        assert!(session.selected_ids.is_empty());
        assert!(session.cached_events().is_none());
    }

    #[test]
    fn completion_without_token_fails_every_id() {
        let mut session = Session::new(None);
        session.toggle_selected("a");
        let outcome = session.complete_selected(|_, _| panic!("must not call the API"));
        assert_eq!(outcome.completed, 0);
        assert_eq!(outcome.failures.len(), 1);
    }

    #[test]
    fn toggle_selected_flips_membership() {
        let mut session = Session::new(None);
        session.toggle_selected("x");
        assert!(session.selected_ids.contains("x"));
        session.toggle_selected("x");
        assert!(!session.selected_ids.contains("x"));
    }

    #[test]
    fn refresh_interval_snaps_to_allowed_values() {
        let mut session = Session::new(None);
        session.set_refresh_interval(45);
        assert!(REFRESH_INTERVALS.contains(&session.refresh_interval_secs()));
        session.set_refresh_interval(1000);
        assert_eq!(session.refresh_interval_secs(), 300);
    }

    #[test]
    fn cycle_refresh_interval_wraps_around() {
        let mut session = Session::new(None);
        session.set_refresh_interval(300);
        session.cycle_refresh_interval();
        assert_eq!(session.refresh_interval_secs(), REFRESH_INTERVALS[0]);
    }

    #[test]
    fn completion_summary_reports_combined_errors() {
        let outcome = CompletionOutcome {
            completed: 1,
            failures: vec![("Rm2".to_string(), "Slack API error: missing_scope".to_string())],
        };
        let summary = outcome.summary();
        assert!(summary.contains("Completed 1"));
        assert!(summary.contains("Rm2"));
    }
}
