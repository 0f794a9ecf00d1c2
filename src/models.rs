use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

/// A reminder as returned by `reminders.list`. Slack sends `complete_ts: 0`
/// for reminders that are still open, and `time` may be absent (or junk) for
/// recurring reminders, so both fields are tolerated rather than required.
#[derive(Clone, Debug, Deserialize)]
pub struct Reminder {
    pub id: String,
    #[serde(default)]
    pub text: String,
    #[serde(default, deserialize_with = "lenient_epoch")]
    pub time: Option<i64>,
    #[serde(default, deserialize_with = "lenient_epoch")]
    pub complete_ts: Option<i64>,
}

impl Reminder {
    pub fn is_active(&self) -> bool {
        !matches!(self.complete_ts, Some(ts) if ts != 0)
    }

    /// Sort key for the to-do view: reminders without a time key as 0 so
    /// they land before everything timed.
    pub fn sort_time(&self) -> i64 {
        self.time.unwrap_or(0)
    }

    pub fn title(&self) -> &str {
        if self.text.trim().is_empty() {
            "Reminder"
        } else {
            &self.text
        }
    }
}

/// Accepts absent, null, or non-integer values as `None` instead of failing
/// the whole record.
fn lenient_epoch<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value.as_i64())
}

/// Display-only projection of an active, timed reminder. Field names follow
/// the FullCalendar event shape so `moments-sync` output can be fed straight
/// into a calendar widget.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub id: String,
    pub title: String,
    /// RFC 3339 local timestamp.
    pub start: String,
    #[serde(rename = "allDay")]
    pub all_day: bool,
}

impl CalendarEvent {
    /// Date component of `start`, for placing the event on a grid cell.
    pub fn start_date(&self) -> Option<NaiveDate> {
        chrono::DateTime::parse_from_rfc3339(&self.start)
            .ok()
            .map(|dt| dt.date_naive())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Page {
    Home,
    Summarise,
    Status,
    Calendar,
    Repository,
}

impl Page {
    pub fn title(&self) -> &'static str {
        match self {
            Page::Home => "Home",
            Page::Summarise => "Summarise",
            Page::Status => "Status",
            Page::Calendar => "Calendar",
            Page::Repository => "Repository",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CalendarView {
    Month,
    Week,
    Day,
}

impl CalendarView {
    pub fn label(&self) -> &'static str {
        match self {
            CalendarView::Month => "Month",
            CalendarView::Week => "Week",
            CalendarView::Day => "Day",
        }
    }
}

/// Display flags handed to the calendar renderer. The reminder service is
/// the source of truth, so the grid is read-only.
pub struct CalendarOptions {
    pub initial_view: CalendarView,
    pub editable: bool,
    pub selectable: bool,
    pub week_numbers: bool,
    pub now_indicator: bool,
}

impl CalendarOptions {
    pub fn read_only(&self) -> bool {
        !self.editable && !self.selectable
    }
}

impl Default for CalendarOptions {
    fn default() -> Self {
        Self {
            initial_view: CalendarView::Month,
            editable: false,
            selectable: false,
            week_numbers: true,
            now_indicator: true,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SourceType {
    Text,
    Audio,
    Video,
}

impl SourceType {
    pub fn all() -> [SourceType; 3] {
        [SourceType::Text, SourceType::Audio, SourceType::Video]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SourceType::Text => "Text file",
            SourceType::Audio => "Audio file",
            SourceType::Video => "Video file",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reminder_with_zero_complete_ts_is_active() {
        let r: Reminder =
            serde_json::from_str(r#"{"id":"Rm1","text":"x","time":1,"complete_ts":0}"#).unwrap();
        assert!(r.is_active());
    }

    #[test]
    fn reminder_with_complete_ts_is_not_active() {
        let r: Reminder =
            serde_json::from_str(r#"{"id":"Rm1","text":"x","complete_ts":1600000100}"#).unwrap();
        assert!(!r.is_active());
    }

    #[test]
    fn non_integer_time_parses_as_none() {
        let r: Reminder =
            serde_json::from_str(r#"{"id":"Rm1","text":"x","time":"every day"}"#).unwrap();
        assert_eq!(r.time, None);
        assert!(r.is_active());
    }

    #[test]
    fn blank_text_falls_back_to_placeholder_title() {
        let r: Reminder = serde_json::from_str(r#"{"id":"Rm1","text":"  "}"#).unwrap();
        assert_eq!(r.title(), "Reminder");
    }

    #[test]
    fn calendar_event_serializes_all_day_in_camel_case() {
        let event = CalendarEvent {
            id: "Rm1".to_string(),
            title: "Pay rent".to_string(),
            start: "2023-11-14T00:13:20+00:00".to_string(),
            all_day: false,
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"allDay\":false"));
    }
}
