//! Standalone sync: fetch Slack reminders, normalize them to calendar
//! events, and write `reminders.json` to the current directory. Meant for
//! cron or a shell alias; the TUI never reads this file.

use std::fs;
use std::process::ExitCode;

use moments::events;
use moments::slack;

const OUTPUT_FILE: &str = "reminders.json";

fn main() -> ExitCode {
    let token = match std::env::var("SLACK_USER_TOKEN") {
        Ok(token) if !token.trim().is_empty() => token,
        _ => {
            eprintln!("SLACK_USER_TOKEN is not set.");
            eprintln!("Export a Slack user token (xoxp-…) with reminders:read scope and retry.");
            return ExitCode::FAILURE;
        }
    };

    let client = slack::default_client();
    let reminders = match slack::list_reminders(&client, &token) {
        Ok(reminders) => reminders,
        Err(e) => {
            // Leave any existing reminders.json untouched on failure.
            eprintln!("Failed to fetch reminders: {}", e.message());
            return ExitCode::FAILURE;
        }
    };

    let events = events::events_from_reminders(&reminders);
    let json = match serde_json::to_string_pretty(&events) {
        Ok(json) => json,
        Err(e) => {
            eprintln!("Failed to encode events: {e}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = fs::write(OUTPUT_FILE, json) {
        eprintln!("Failed to write {OUTPUT_FILE}: {e}");
        return ExitCode::FAILURE;
    }

    println!(
        "Wrote {} event(s) from {} reminder(s) to {OUTPUT_FILE}.",
        events.len(),
        reminders.len()
    );
    ExitCode::SUCCESS
}
