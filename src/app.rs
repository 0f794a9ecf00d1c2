use crate::config::{resolve_token, Config};
use crate::models::{CalendarEvent, CalendarOptions, Page, Reminder, SourceType};
use crate::repository::RepositoryNote;
use crate::session::{Notice, Session};
use chrono::{DateTime, Duration, Local, NaiveDate};
use ratatui::widgets::ListState;
use reqwest::blocking::Client;
use tui_textarea::TextArea;

pub const PLACEHOLDER_BODY: &str = "Paste or type the content to summarise… (Esc to leave the editor)";

const MOTIVATIONAL_QUOTES: [&str; 10] = [
    "Small progress is still progress.",
    "Start where you are. Use what you have. Do what you can.",
    "Consistency beats intensity.",
    "Done is better than perfect.",
    "One step at a time — you've got this.",
    "Focus on the next right thing.",
    "Your future self will thank you.",
    "Keep going — momentum is everything.",
    "Make it work, then make it better.",
    "Today's effort is tomorrow's results.",
];

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum SummariseFocus {
    Source,
    Title,
    Body,
}

pub struct App<'a> {
    pub page: Page,
    pub config: Config,
    pub client: Client,
    pub session: Session,
    pub calendar_options: CalendarOptions,

    // Status page: raw reminders split for the to-do view.
    pub active: Vec<Reminder>,
    pub completed: Vec<Reminder>,
    pub todo_state: ListState,
    pub status_notice: Option<Notice>,
    pub editing_token: bool,
    pub token_input: String,

    // Calendar page: the controller's event list for the current cycle.
    pub calendar_view: crate::models::CalendarView,
    pub focus_date: NaiveDate,
    pub calendar_events: Vec<CalendarEvent>,
    pub calendar_notice: Option<Notice>,
    pub next_refresh: Option<DateTime<Local>>,

    // Repository page.
    pub notes: Vec<RepositoryNote>,
    pub notes_state: ListState,
    pub note_preview: Option<String>,

    // Summarise page.
    pub summarise_focus: SummariseFocus,
    pub source_index: usize,
    pub title_input: String,
    pub body: TextArea<'a>,

    pub quote: &'static str,
    pub show_help_popup: bool,
    pub toast_message: Option<String>,
    pub toast_expiry: Option<DateTime<Local>>,
    pub toast_is_error: bool,
    pub should_quit: bool,
}

impl<'a> App<'a> {
    pub fn new() -> App<'a> {
        let config = Config::load();

        let mut session = Session::new(resolve_token(&config));
        session.auto_refresh = config.slack.auto_refresh;
        session.set_refresh_interval(config.slack.refresh_interval_secs);

        let calendar_options = CalendarOptions::default();
        let calendar_view = calendar_options.initial_view;

        let mut body = TextArea::default();
        body.set_placeholder_text(PLACEHOLDER_BODY);

        App {
            page: Page::Home,
            client: crate::slack::default_client(),
            session,
            calendar_options,
            active: Vec::new(),
            completed: Vec::new(),
            todo_state: ListState::default(),
            status_notice: None,
            editing_token: false,
            token_input: String::new(),
            calendar_view,
            focus_date: Local::now().date_naive(),
            calendar_events: Vec::new(),
            calendar_notice: None,
            next_refresh: None,
            notes: Vec::new(),
            notes_state: ListState::default(),
            note_preview: None,
            summarise_focus: SummariseFocus::Source,
            source_index: 0,
            title_input: String::new(),
            body,
            quote: pick_quote(),
            show_help_popup: false,
            toast_message: None,
            toast_expiry: None,
            toast_is_error: false,
            should_quit: false,
            config,
        }
    }

    pub fn set_page(&mut self, page: Page) {
        self.page = page;
        self.show_help_popup = false;
        self.editing_token = false;
        self.quote = pick_quote();
    }

    pub fn source_type(&self) -> SourceType {
        SourceType::all()[self.source_index % SourceType::all().len()]
    }

    pub fn cycle_source(&mut self, forward: bool) {
        let len = SourceType::all().len();
        self.source_index = if forward {
            (self.source_index + 1) % len
        } else {
            (self.source_index + len - 1) % len
        };
    }

    pub fn toast(&mut self, message: impl Into<String>) {
        self.toast_message = Some(message.into());
        self.toast_expiry = Some(Local::now() + Duration::seconds(3));
        self.toast_is_error = false;
    }

    pub fn toast_error(&mut self, message: impl Into<String>) {
        self.toast_message = Some(message.into());
        self.toast_expiry = Some(Local::now() + Duration::seconds(5));
        self.toast_is_error = true;
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    pub fn todo_up(&mut self) {
        list_up(&mut self.todo_state, self.active.len());
    }

    pub fn todo_down(&mut self) {
        list_down(&mut self.todo_state, self.active.len());
    }

    pub fn selected_active_reminder(&self) -> Option<&Reminder> {
        self.todo_state.selected().and_then(|i| self.active.get(i))
    }

    pub fn notes_up(&mut self) {
        list_up(&mut self.notes_state, self.notes.len());
        self.load_note_preview();
    }

    pub fn notes_down(&mut self) {
        list_down(&mut self.notes_state, self.notes.len());
        self.load_note_preview();
    }

    pub fn load_note_preview(&mut self) {
        self.note_preview = self
            .notes_state
            .selected()
            .and_then(|i| self.notes.get(i))
            .and_then(|note| crate::repository::read_summary(&note.path).ok());
    }

    /// Keeps the to-do selection inside bounds after a refresh.
    pub fn clamp_todo_selection(&mut self) {
        if self.active.is_empty() {
            self.todo_state.select(None);
        } else {
            match self.todo_state.selected() {
                Some(i) => self.todo_state.select(Some(i.min(self.active.len() - 1))),
                None => self.todo_state.select(Some(0)),
            }
        }
    }

    pub fn clear_summarise_inputs(&mut self) {
        self.title_input.clear();
        self.body = TextArea::default();
        self.body.set_placeholder_text(PLACEHOLDER_BODY);
        self.summarise_focus = SummariseFocus::Source;
    }

    pub fn body_text(&self) -> String {
        self.body.lines().join("\n")
    }
}

fn list_up(state: &mut ListState, len: usize) {
    if len == 0 {
        return;
    }
    let i = match state.selected() {
        Some(0) | None => 0,
        Some(i) => i - 1,
    };
    state.select(Some(i));
}

fn list_down(state: &mut ListState, len: usize) {
    if len == 0 {
        return;
    }
    let i = match state.selected() {
        Some(i) => (i + 1).min(len - 1),
        None => 0,
    };
    state.select(Some(i));
}

fn pick_quote() -> &'static str {
    use rand::seq::SliceRandom;
    MOTIVATIONAL_QUOTES
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(MOTIVATIONAL_QUOTES[0])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Reminder;

    fn reminder(id: &str) -> Reminder {
        Reminder {
            id: id.to_string(),
            text: format!("reminder {id}"),
            time: Some(1_700_000_000),
            complete_ts: None,
        }
    }

    #[test]
    fn todo_navigation_stays_in_bounds() {
        let mut app = App::new();
        app.active = vec![reminder("1"), reminder("2")];
        app.todo_state.select(Some(0));

        app.todo_up();
        assert_eq!(app.todo_state.selected(), Some(0));
        app.todo_down();
        app.todo_down();
        assert_eq!(app.todo_state.selected(), Some(1));
    }

    #[test]
    fn clamp_todo_selection_handles_shrinking_list() {
        let mut app = App::new();
        app.active = vec![reminder("1"), reminder("2"), reminder("3")];
        app.todo_state.select(Some(2));

        app.active.truncate(1);
        app.clamp_todo_selection();
        assert_eq!(app.todo_state.selected(), Some(0));

        app.active.clear();
        app.clamp_todo_selection();
        assert_eq!(app.todo_state.selected(), None);
    }

    #[test]
    fn cycle_source_wraps_both_directions() {
        let mut app = App::new();
        assert_eq!(app.source_type(), SourceType::Text);
        app.cycle_source(true);
        assert_eq!(app.source_type(), SourceType::Audio);
        app.cycle_source(false);
        app.cycle_source(false);
        assert_eq!(app.source_type(), SourceType::Video);
    }
}
