//! Thin client for the Slack reminders API.
//!
//! Listing needs a user token with `reminders:read`; completing also needs
//! `reminders:write`. Both calls are blocking and are never retried: a
//! failure is reported once and waits for the user to re-trigger.

use crate::models::Reminder;
use reqwest::blocking::Client;
use std::time::Duration;

const SLACK_API: &str = "https://slack.com/api";
const REQUEST_TIMEOUT_SECS: u64 = 15;

#[derive(Debug)]
pub enum SlackError {
    MissingToken,
    /// Network-level failure: Slack was unreachable or the HTTP exchange broke.
    Transport(String),
    /// Slack answered but rejected the request (bad token, missing scope, ...).
    Api(String),
}

impl SlackError {
    pub fn message(&self) -> String {
        match self {
            SlackError::MissingToken => {
                "No Slack token. Set SLACK_USER_TOKEN or paste a token on the Status page."
                    .to_string()
            }
            SlackError::Transport(msg) => format!("Failed to reach Slack: {msg}"),
            SlackError::Api(err) => format!("Slack API error: {err}"),
        }
    }
}

pub fn default_client() -> Client {
    Client::builder()
        .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
        .build()
        .unwrap_or_default()
}

/// Fetches every reminder visible to the token's identity.
pub fn list_reminders(client: &Client, token: &str) -> Result<Vec<Reminder>, SlackError> {
    if token.trim().is_empty() {
        return Err(SlackError::MissingToken);
    }

    let response = client
        .get(format!("{SLACK_API}/reminders.list"))
        .bearer_auth(token.trim())
        .send()
        .map_err(|e| SlackError::Transport(e.to_string()))?;

    let status = response.status();
    let body = response
        .text()
        .map_err(|e| SlackError::Transport(e.to_string()))?;
    if !status.is_success() {
        return Err(SlackError::Transport(format!("HTTP {status}")));
    }

    parse_reminders_response(&body)
}

/// Marks one reminder complete. Requires `reminders:write`; an under-scoped
/// token surfaces as `Api("missing_scope")`.
pub fn complete_reminder(client: &Client, token: &str, reminder_id: &str) -> Result<(), SlackError> {
    if token.trim().is_empty() {
        return Err(SlackError::MissingToken);
    }

    let response = client
        .post(format!("{SLACK_API}/reminders.complete"))
        .bearer_auth(token.trim())
        .form(&[("reminder", reminder_id)])
        .send()
        .map_err(|e| SlackError::Transport(e.to_string()))?;

    let status = response.status();
    let body = response
        .text()
        .map_err(|e| SlackError::Transport(e.to_string()))?;
    if !status.is_success() {
        return Err(SlackError::Transport(format!("HTTP {status}")));
    }

    parse_ack_response(&body)
}

/// Slack wraps every API answer in `{"ok": bool, ...}`; `ok: false` carries
/// an `error` code. Records that fail to deserialize are skipped so one
/// malformed reminder cannot poison the list.
fn parse_reminders_response(body: &str) -> Result<Vec<Reminder>, SlackError> {
    let value = envelope(body)?;

    let mut reminders = Vec::new();
    if let Some(items) = value.get("reminders").and_then(|v| v.as_array()) {
        for item in items {
            match serde_json::from_value::<Reminder>(item.clone()) {
                Ok(reminder) => reminders.push(reminder),
                Err(e) => log::debug!("skipping malformed reminder record: {e}"),
            }
        }
    }
    Ok(reminders)
}

fn parse_ack_response(body: &str) -> Result<(), SlackError> {
    envelope(body).map(|_| ())
}

fn envelope(body: &str) -> Result<serde_json::Value, SlackError> {
    let value: serde_json::Value =
        serde_json::from_str(body).map_err(|e| SlackError::Transport(format!("bad response: {e}")))?;
    if value.get("ok").and_then(|v| v.as_bool()) != Some(true) {
        let err = value
            .get("error")
            .and_then(|v| v.as_str())
            .unwrap_or("unknown_error")
            .to_string();
        return Err(SlackError::Api(err));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ok_response_parses_reminders() {
        let body = r#"{
            "ok": true,
            "reminders": [
                {"id": "Rm1", "text": "Pay rent", "time": 1700000000, "complete_ts": 0},
                {"id": "Rm2", "text": "Old", "time": 1600000000, "complete_ts": 1600000100}
            ]
        }"#;
        let reminders = parse_reminders_response(body).unwrap();
        assert_eq!(reminders.len(), 2);
        assert!(reminders[0].is_active());
        assert!(!reminders[1].is_active());
    }

    #[test]
    fn ok_false_maps_to_api_error() {
        let body = r#"{"ok": false, "error": "invalid_auth"}"#;
        match parse_reminders_response(body) {
            Err(SlackError::Api(err)) => assert_eq!(err, "invalid_auth"),
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[test]
    fn missing_scope_surfaces_from_complete() {
        let body = r#"{"ok": false, "error": "missing_scope"}"#;
        match parse_ack_response(body) {
            Err(SlackError::Api(err)) => assert_eq!(err, "missing_scope"),
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[test]
    fn malformed_records_are_skipped_not_fatal() {
        let body = r#"{
            "ok": true,
            "reminders": [
                {"text": "no id here"},
                {"id": "Rm9", "text": "kept"},
                "not even an object"
            ]
        }"#;
        let reminders = parse_reminders_response(body).unwrap();
        assert_eq!(reminders.len(), 1);
        assert_eq!(reminders[0].id, "Rm9");
    }

    #[test]
    fn garbage_body_is_a_transport_error() {
        match parse_reminders_response("<html>504</html>") {
            Err(SlackError::Transport(_)) => {}
            other => panic!("expected Transport error, got {other:?}"),
        }
    }

    #[test]
    fn error_messages_are_human_readable() {
        assert!(SlackError::Api("missing_scope".to_string())
            .message()
            .contains("missing_scope"));
        assert!(SlackError::MissingToken.message().contains("SLACK_USER_TOKEN"));
    }
}
