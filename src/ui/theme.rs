use crate::config::Theme;
use crate::ui::color_parser::parse_color;
use ratatui::style::Color;

#[derive(Debug, Clone)]
pub struct ThemeTokens {
    pub border_default: Color,
    pub border_active: Color,
    pub title: Color,
    pub todo_open: Color,
    pub todo_done: Color,
    pub timestamp: Color,
    pub calendar_today: Color,
    pub calendar_event: Color,
    pub muted: Color,
    pub toast_info: Color,
    pub toast_error: Color,
}

impl ThemeTokens {
    pub fn from_theme(theme: &Theme) -> Self {
        Self {
            border_default: parse_color(&theme.border_default),
            border_active: parse_color(&theme.border_active),
            title: parse_color(&theme.title),
            todo_open: parse_color(&theme.todo_open),
            todo_done: parse_color(&theme.todo_done),
            timestamp: parse_color(&theme.timestamp),
            calendar_today: parse_color(&theme.calendar_today),
            calendar_event: parse_color(&theme.calendar_event),
            muted: parse_color(&theme.muted),
            toast_info: parse_color(&theme.toast_info),
            toast_error: parse_color(&theme.toast_error),
        }
    }
}
