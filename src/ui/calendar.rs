//! Read-only calendar grid over normalized reminder events. The grid only
//! draws what it is handed; fetching and caching live in the session layer.

use crate::app::App;
use crate::models::{CalendarEvent, CalendarView};
use crate::ui::components::truncate_to_width;
use crate::ui::theme::ThemeTokens;
use chrono::{Datelike, Days, Local, NaiveDate, Timelike, Weekday};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Rect},
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table},
};

/// Title for the calendar pane header, e.g. "November 2023" or "2023-11-14".
pub fn range_label(view: CalendarView, focus: NaiveDate) -> String {
    match view {
        CalendarView::Month => focus.format("%B %Y").to_string(),
        CalendarView::Week => {
            let (start, end) = week_bounds(focus);
            format!("{} – {}", start.format("%b %d"), end.format("%b %d, %Y"))
        }
        CalendarView::Day => focus.format("%A, %B %d, %Y").to_string(),
    }
}

pub fn render_calendar(f: &mut Frame, area: Rect, app: &App, tokens: &ThemeTokens) {
    match app.calendar_view {
        CalendarView::Month => render_month(f, area, app, tokens),
        CalendarView::Week => render_week(f, area, app, tokens),
        CalendarView::Day => render_day(f, area, app, tokens),
    }
}

fn grid_block(app: &App, tokens: &ThemeTokens) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(tokens.border_default))
        .title(format!(
            " {} · {} ",
            range_label(app.calendar_view, app.focus_date),
            app.calendar_view.label()
        ))
}

fn render_month(f: &mut Frame, area: Rect, app: &App, tokens: &ThemeTokens) {
    let today = Local::now().date_naive();
    let weeks = month_grid(app.focus_date);
    let week_numbers = app.calendar_options.week_numbers;

    let mut header_cells: Vec<Cell> = Vec::new();
    if week_numbers {
        header_cells.push(Cell::from("Wk").style(Style::default().fg(tokens.muted)));
    }
    for day in ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"] {
        header_cells.push(
            Cell::from(day).style(
                Style::default()
                    .fg(tokens.title)
                    .add_modifier(Modifier::BOLD),
            ),
        );
    }
    let header = Row::new(header_cells).height(1);

    let inner_height = area.height.saturating_sub(3); // border + header
    let cell_height = (inner_height / weeks.len().max(1) as u16).clamp(2, 4);
    let day_width = usize::from(
        (area.width.saturating_sub(if week_numbers { 6 } else { 2 })) / 7,
    )
    .saturating_sub(1)
    .max(3);

    let mut rows: Vec<Row> = Vec::new();
    for week in &weeks {
        let mut cells: Vec<Cell> = Vec::new();
        if week_numbers {
            cells.push(
                Cell::from(format!("{:>2}", week[0].iso_week().week()))
                    .style(Style::default().fg(tokens.muted)),
            );
        }
        for date in week {
            cells.push(month_cell(app, *date, today, day_width, cell_height, tokens));
        }
        rows.push(Row::new(cells).height(cell_height));
    }

    let mut widths: Vec<Constraint> = Vec::new();
    if week_numbers {
        widths.push(Constraint::Length(4));
    }
    widths.extend(std::iter::repeat(Constraint::Ratio(1, 7)).take(7));

    let table = Table::new(rows, widths)
        .header(header)
        .block(grid_block(app, tokens));
    f.render_widget(table, area);
}

fn month_cell(
    app: &App,
    date: NaiveDate,
    today: NaiveDate,
    width: usize,
    height: u16,
    tokens: &ThemeTokens,
) -> Cell<'static> {
    let in_month = date.month() == app.focus_date.month();
    let day_style = if date == today {
        Style::default()
            .fg(tokens.calendar_today)
            .add_modifier(Modifier::BOLD | Modifier::REVERSED)
    } else if in_month {
        Style::default()
    } else {
        Style::default().fg(tokens.muted)
    };

    let mut lines = vec![Line::from(Span::styled(
        format!("{:>2}", date.day()),
        day_style,
    ))];

    let events = events_on(&app.calendar_events, date);
    let slots = usize::from(height.saturating_sub(1));
    for event in events.iter().take(slots) {
        lines.push(Line::from(Span::styled(
            truncate_to_width(&event.title, width),
            Style::default().fg(tokens.calendar_event),
        )));
    }
    if events.len() > slots && slots > 0 {
        let overflow = format!("+{} more", events.len() - (slots - 1));
        lines.pop();
        lines.push(Line::from(Span::styled(
            truncate_to_width(&overflow, width),
            Style::default().fg(tokens.muted),
        )));
    }

    Cell::from(Text::from(lines))
}

fn render_week(f: &mut Frame, area: Rect, app: &App, tokens: &ThemeTokens) {
    let today = Local::now().date_naive();
    let (start, _) = week_bounds(app.focus_date);
    let day_width = usize::from(area.width.saturating_sub(2) / 7)
        .saturating_sub(1)
        .max(3);

    let mut header_cells: Vec<Cell> = Vec::new();
    let mut columns: Vec<Vec<Line>> = Vec::new();
    let mut tallest = 1usize;
    for offset in 0..7 {
        let date = start + Days::new(offset);
        let style = if date == today {
            Style::default()
                .fg(tokens.calendar_today)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(tokens.title)
        };
        header_cells.push(Cell::from(date.format("%a %d").to_string()).style(style));

        let lines: Vec<Line> = events_on(&app.calendar_events, date)
            .iter()
            .map(|event| {
                let label = match event_time(event) {
                    Some(time) => format!("{time} {}", event.title),
                    None => event.title.clone(),
                };
                Line::from(Span::styled(
                    truncate_to_width(&label, day_width),
                    Style::default().fg(tokens.calendar_event),
                ))
            })
            .collect();
        tallest = tallest.max(lines.len());
        columns.push(lines);
    }

    let row_height = (tallest as u16).clamp(1, area.height.saturating_sub(4));
    let cells: Vec<Cell> = columns
        .into_iter()
        .map(|lines| {
            if lines.is_empty() {
                Cell::from(Span::styled("·", Style::default().fg(tokens.muted)))
            } else {
                Cell::from(Text::from(lines))
            }
        })
        .collect();

    let table = Table::new(
        vec![Row::new(cells).height(row_height)],
        std::iter::repeat(Constraint::Ratio(1, 7)).take(7),
    )
    .header(Row::new(header_cells).height(1))
    .block(grid_block(app, tokens));
    f.render_widget(table, area);
}

fn render_day(f: &mut Frame, area: Rect, app: &App, tokens: &ThemeTokens) {
    let now = Local::now();
    let is_today = app.focus_date == now.date_naive();
    let now_label = format!("{:02}:{:02}", now.hour(), now.minute());

    let mut events: Vec<&CalendarEvent> = events_on(&app.calendar_events, app.focus_date);
    events.sort_by_key(|event| event_time(event));

    let mut lines: Vec<Line> = Vec::new();
    let mut indicator_drawn = false;
    for event in &events {
        let time = event_time(event);
        if is_today
            && app.calendar_options.now_indicator
            && !indicator_drawn
            && time.as_deref().map(|t| t > now_label.as_str()).unwrap_or(false)
        {
            lines.push(now_indicator_line(&now_label, area.width, tokens));
            indicator_drawn = true;
        }
        lines.push(Line::from(vec![
            Span::styled(
                format!("{:>5}  ", time.as_deref().unwrap_or("--:--")),
                Style::default().fg(tokens.timestamp),
            ),
            Span::styled(event.title.clone(), Style::default().fg(tokens.calendar_event)),
        ]));
    }
    if is_today && app.calendar_options.now_indicator && !indicator_drawn {
        lines.push(now_indicator_line(&now_label, area.width, tokens));
    }
    if events.is_empty() {
        lines.push(Line::from(Span::styled(
            "No reminders on this day.",
            Style::default().fg(tokens.muted),
        )));
    }

    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Left)
        .block(grid_block(app, tokens));
    f.render_widget(paragraph, area);
}

fn now_indicator_line(now_label: &str, width: u16, tokens: &ThemeTokens) -> Line<'static> {
    let fill = usize::from(width.saturating_sub(12));
    Line::from(Span::styled(
        format!("{} {}", now_label, "─".repeat(fill)),
        Style::default().fg(tokens.calendar_today),
    ))
}

fn events_on<'a>(events: &'a [CalendarEvent], date: NaiveDate) -> Vec<&'a CalendarEvent> {
    events
        .iter()
        .filter(|event| event.start_date() == Some(date))
        .collect()
}

/// "HH:MM" from the event start, or `None` for all-day entries.
fn event_time(event: &CalendarEvent) -> Option<String> {
    if event.all_day {
        return None;
    }
    chrono::DateTime::parse_from_rfc3339(&event.start)
        .ok()
        .map(|dt| format!("{:02}:{:02}", dt.hour(), dt.minute()))
}

fn week_bounds(focus: NaiveDate) -> (NaiveDate, NaiveDate) {
    let start = focus.week(Weekday::Mon).first_day();
    (start, start + Days::new(6))
}

/// Monday-first weeks covering the focus month, padded with the surrounding
/// days so every row has exactly seven dates.
fn month_grid(focus: NaiveDate) -> Vec<[NaiveDate; 7]> {
    let first = focus.with_day(1).unwrap_or(focus);
    let mut cursor = first.week(Weekday::Mon).first_day();
    let mut weeks = Vec::new();
    loop {
        let mut week = [cursor; 7];
        for (i, slot) in week.iter_mut().enumerate() {
            *slot = cursor + Days::new(i as u64);
        }
        weeks.push(week);
        cursor = cursor + Days::new(7);
        if cursor.month() != first.month() || cursor.year() != first.year() {
            break;
        }
    }
    weeks
}
