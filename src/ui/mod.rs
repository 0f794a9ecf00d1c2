use chrono::Local;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, List, ListItem, Paragraph, Tabs, Wrap},
};

use crate::app::{App, SummariseFocus};
use crate::events;
use crate::models::{Page, SourceType};
use crate::session::{Notice, SyncState};
use crate::ui::components::{centered_rect, markdown_line, truncate_to_width};
use crate::ui::theme::ThemeTokens;

pub mod calendar;
pub mod color_parser;
pub mod components;
pub mod theme;

const PAGES: [Page; 5] = [
    Page::Home,
    Page::Summarise,
    Page::Status,
    Page::Calendar,
    Page::Repository,
];

pub fn ui(f: &mut Frame, app: &mut App) {
    let tokens = ThemeTokens::from_theme(&app.config.theme);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(f.area());

    render_tabs(f, chunks[0], app, &tokens);

    match app.page {
        Page::Home => render_home(f, chunks[1], app, &tokens),
        Page::Summarise => render_summarise(f, chunks[1], app, &tokens),
        Page::Status => render_status(f, chunks[1], app, &tokens),
        Page::Calendar => render_calendar_page(f, chunks[1], app, &tokens),
        Page::Repository => render_repository(f, chunks[1], app, &tokens),
    }

    render_status_bar(f, chunks[2], app, &tokens);

    if app.show_help_popup {
        render_help_popup(f, app, &tokens);
    }
    if app.page == Page::Status && app.editing_token {
        render_token_popup(f, app, &tokens);
    }
}

fn render_tabs(f: &mut Frame, area: Rect, app: &App, tokens: &ThemeTokens) {
    let titles: Vec<Line> = PAGES
        .iter()
        .enumerate()
        .map(|(i, page)| Line::from(format!(" {} {} ", i + 1, page.title())))
        .collect();
    let selected = PAGES.iter().position(|p| *p == app.page).unwrap_or(0);

    let tabs = Tabs::new(titles)
        .select(selected)
        .style(Style::default().fg(tokens.muted))
        .highlight_style(
            Style::default()
                .fg(tokens.title)
                .add_modifier(Modifier::BOLD),
        )
        .divider("│");
    f.render_widget(tabs, area);
}

fn render_home(f: &mut Frame, area: Rect, app: &App, tokens: &ThemeTokens) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Length(8),
            Constraint::Min(1),
        ])
        .split(area);

    let banner = Paragraph::new(vec![
        Line::from(Span::styled(
            "MoMents",
            Style::default()
                .fg(tokens.title)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            app.quote,
            Style::default()
                .fg(tokens.muted)
                .add_modifier(Modifier::ITALIC),
        )),
    ])
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::NONE));
    f.render_widget(banner, rows[0]);

    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(rows[1]);

    render_home_card(
        f,
        cards[0],
        "Summarise [s]",
        "Turn a text, audio or video source into a Markdown note.",
        tokens,
    );
    render_home_card(
        f,
        cards[1],
        "Now & Next [n]",
        "Tick off Slack reminders without leaving the keyboard.",
        tokens,
    );
    render_home_card(
        f,
        cards[2],
        "Calendar [c]",
        "Your reminders on a month, week or day grid.",
        tokens,
    );
}

fn render_home_card(f: &mut Frame, area: Rect, title: &str, body: &str, tokens: &ThemeTokens) {
    let card = Paragraph::new(body)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(tokens.border_default))
                .title(Span::styled(
                    format!(" {title} "),
                    Style::default().fg(tokens.title),
                )),
        );
    f.render_widget(card, area);
}

fn render_summarise(f: &mut Frame, area: Rect, app: &mut App, tokens: &ThemeTokens) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(3),
        ])
        .split(area);

    let focus_border = |focused: bool| {
        if focused {
            Style::default().fg(tokens.border_active)
        } else {
            Style::default().fg(tokens.border_default)
        }
    };

    let source_line = Line::from(
        SourceType::all()
            .iter()
            .enumerate()
            .flat_map(|(i, source)| {
                let style = if i == app.source_index {
                    Style::default()
                        .fg(tokens.border_active)
                        .add_modifier(Modifier::BOLD | Modifier::REVERSED)
                } else {
                    Style::default().fg(tokens.muted)
                };
                [
                    Span::styled(format!(" {} ", source.as_str()), style),
                    Span::raw("  "),
                ]
            })
            .collect::<Vec<_>>(),
    );
    let source = Paragraph::new(source_line).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(focus_border(app.summarise_focus == SummariseFocus::Source))
            .title(" Source (◂ ▸ to change, Tab to move on) "),
    );
    f.render_widget(source, rows[0]);

    let title = Paragraph::new(app.title_input.as_str()).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(focus_border(app.summarise_focus == SummariseFocus::Title))
            .title(" Title "),
    );
    f.render_widget(title, rows[1]);
    if app.summarise_focus == SummariseFocus::Title {
        let x = rows[1].x + 1 + app.title_input.chars().count() as u16;
        f.set_cursor_position((x.min(rows[1].right().saturating_sub(2)), rows[1].y + 1));
    }

    app.body.set_block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(focus_border(app.summarise_focus == SummariseFocus::Body))
            .title(" Content (Ctrl+S to save) "),
    );
    f.render_widget(&app.body, rows[2]);
}

fn render_status(f: &mut Frame, area: Rect, app: &mut App, tokens: &ThemeTokens) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(1)])
        .split(area);

    let notice_line = match &app.status_notice {
        Some(notice) => notice_span(notice, tokens),
        None => Span::styled(
            format!(
                "{} open · {} done",
                app.active.len(),
                app.completed.len()
            ),
            Style::default().fg(tokens.muted),
        ),
    };
    f.render_widget(Paragraph::new(Line::from(notice_line)), rows[0]);

    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(rows[1]);

    let open_items: Vec<ListItem> = app
        .active
        .iter()
        .map(|reminder| {
            let mark = if app.session.selected_ids.contains(&reminder.id) {
                "[x]"
            } else {
                "[ ]"
            };
            let mut spans = vec![
                Span::styled(format!("{mark} "), Style::default().fg(tokens.todo_open)),
                Span::raw(reminder.title().to_string()),
            ];
            if let Some(label) = reminder.time.and_then(events::short_local_time) {
                spans.push(Span::styled(
                    format!("  {label}"),
                    Style::default().fg(tokens.timestamp),
                ));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    let open_list = List::new(open_items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(tokens.border_active))
                .title(format!(" To-do ({}) ", app.active.len())),
        )
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("▶ ");
    f.render_stateful_widget(open_list, panes[0], &mut app.todo_state);

    let done_items: Vec<ListItem> = app
        .completed
        .iter()
        .map(|reminder| {
            let mut spans = vec![
                Span::styled("✓ ", Style::default().fg(tokens.todo_done)),
                Span::styled(
                    reminder.title().to_string(),
                    Style::default()
                        .fg(tokens.muted)
                        .add_modifier(Modifier::CROSSED_OUT),
                ),
            ];
            if let Some(label) = reminder.time.and_then(events::short_local_time) {
                spans.push(Span::styled(
                    format!("  {label}"),
                    Style::default().fg(tokens.muted),
                ));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    let done_list = List::new(done_items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(tokens.border_default))
            .title(format!(" Completed ({}) ", app.completed.len())),
    );
    f.render_widget(done_list, panes[1]);
}

fn render_token_popup(f: &mut Frame, app: &App, tokens: &ThemeTokens) {
    let area = centered_rect(60, 20, f.area());
    f.render_widget(Clear, area);

    // The token itself never hits the screen, only a mask.
    let masked = "•".repeat(app.token_input.chars().count());
    let popup = Paragraph::new(vec![
        Line::from("Paste a Slack user token (xoxp-…), Enter to apply, Esc to cancel."),
        Line::from(Span::styled(
            masked,
            Style::default().fg(tokens.border_active),
        )),
    ])
    .wrap(Wrap { trim: true })
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(tokens.border_active))
            .title(" Slack token "),
    );
    f.render_widget(popup, area);
}

fn render_calendar_page(f: &mut Frame, area: Rect, app: &App, tokens: &ThemeTokens) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(3)])
        .split(area);

    let state_label = match app.session.state() {
        SyncState::NoToken => "no token",
        SyncState::Cached => "cached",
        SyncState::Live => "live",
    };
    let synced_label = match app.session.last_synced {
        Some(at) => format!("synced {}", at.format("%H:%M:%S")),
        None => "never synced".to_string(),
    };

    let mut spans = vec![
        Span::styled(
            format!(" {state_label} "),
            Style::default()
                .fg(tokens.calendar_today)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!("· {synced_label} "), Style::default().fg(tokens.muted)),
        Span::styled(
            format!(
                "· auto-refresh {} ({}s) ",
                if app.session.auto_refresh { "on" } else { "off" },
                app.session.refresh_interval_secs()
            ),
            Style::default().fg(tokens.muted),
        ),
    ];
    if app.calendar_options.read_only() {
        spans.push(Span::styled(
            "· read-only ",
            Style::default().fg(tokens.muted),
        ));
    }
    if let Some(notice) = &app.calendar_notice {
        spans.push(Span::raw("· "));
        spans.push(notice_span(notice, tokens));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), rows[0]);

    calendar::render_calendar(f, rows[1], app, tokens);
}

fn render_repository(f: &mut Frame, area: Rect, app: &mut App, tokens: &ThemeTokens) {
    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(area);

    let width = usize::from(panes[0].width.saturating_sub(16)).max(8);
    let items: Vec<ListItem> = app
        .notes
        .iter()
        .map(|note| {
            let stamp = chrono::DateTime::<Local>::from(note.modified)
                .format("%Y-%m-%d")
                .to_string();
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("{stamp}  "),
                    Style::default().fg(tokens.timestamp),
                ),
                Span::raw(truncate_to_width(&note.display_title, width)),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(tokens.border_active))
                .title(format!(" Notes ({}) ", app.notes.len())),
        )
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("▶ ");
    f.render_stateful_widget(list, panes[0], &mut app.notes_state);

    let preview_lines: Vec<Line> = match &app.note_preview {
        Some(body) => body.lines().map(|line| markdown_line(line, tokens)).collect(),
        None => vec![Line::from(Span::styled(
            "Select a note to preview it. `o` opens the repository folder.",
            Style::default().fg(tokens.muted),
        ))],
    };
    let preview = Paragraph::new(preview_lines)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(tokens.border_default))
                .title(" Preview "),
        );
    f.render_widget(preview, panes[1]);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App, tokens: &ThemeTokens) {
    if let Some(message) = &app.toast_message {
        let color = if app.toast_is_error {
            tokens.toast_error
        } else {
            tokens.toast_info
        };
        let toast = Paragraph::new(Span::styled(
            message.clone(),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ))
        .alignment(Alignment::Right);
        f.render_widget(toast, area);
        return;
    }

    let hint = match app.page {
        Page::Home => "s/n/c open a page · 1-5 switch · ? help · q quit",
        Page::Summarise => "Tab fields · ◂ ▸ source · Ctrl+S save · Esc back",
        Page::Status => "j/k move · space select · c complete · r refresh · t token",
        Page::Calendar => "h/l move · g today · m/w/d views · s sync · a auto · i interval",
        Page::Repository => "j/k move · r refresh · o open folder",
    };
    f.render_widget(
        Paragraph::new(Span::styled(hint, Style::default().fg(tokens.muted))),
        area,
    );
}

fn render_help_popup(f: &mut Frame, app: &App, tokens: &ThemeTokens) {
    let area = centered_rect(60, 70, f.area());
    f.render_widget(Clear, area);

    let bind = |keys: &[String]| keys.join(" / ");
    let global = &app.config.keybindings.global;
    let list = &app.config.keybindings.list;
    let cal = &app.config.keybindings.calendar;

    let mut lines = vec![
        help_heading("Global", tokens),
        help_line(&bind(&global.quit), "quit", tokens),
        help_line(&bind(&global.back), "back to Home / close popup", tokens),
        help_line("1-5", "switch pages", tokens),
        Line::default(),
        help_heading("Status", tokens),
        help_line(&bind(&list.up), "move up", tokens),
        help_line(&bind(&list.down), "move down", tokens),
        help_line(&bind(&list.toggle), "select reminder", tokens),
        help_line(&bind(&list.complete), "complete selected", tokens),
        help_line(&bind(&list.refresh), "refresh", tokens),
        help_line(&bind(&list.token), "set Slack token", tokens),
        Line::default(),
        help_heading("Calendar", tokens),
        help_line(&bind(&cal.prev), "previous period", tokens),
        help_line(&bind(&cal.next), "next period", tokens),
        help_line(&bind(&cal.today), "jump to today", tokens),
        help_line(
            &format!("{} {} {}", bind(&cal.view_month), bind(&cal.view_week), bind(&cal.view_day)),
            "month / week / day view",
            tokens,
        ),
        help_line(&bind(&cal.sync), "sync now", tokens),
        help_line(&bind(&cal.auto_refresh), "toggle auto-refresh", tokens),
        help_line(&bind(&cal.interval), "cycle refresh interval", tokens),
    ];
    lines.push(Line::default());
    lines.push(Line::from(Span::styled(
        "Press any key to close.",
        Style::default().fg(tokens.muted),
    )));

    let popup = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(tokens.border_active))
            .title(" Keys "),
    );
    f.render_widget(popup, area);
}

fn help_heading(text: &str, tokens: &ThemeTokens) -> Line<'static> {
    Line::from(Span::styled(
        text.to_string(),
        Style::default()
            .fg(tokens.title)
            .add_modifier(Modifier::BOLD),
    ))
}

fn help_line(keys: &str, action: &str, tokens: &ThemeTokens) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            format!("  {keys:<14}"),
            Style::default().fg(tokens.border_active),
        ),
        Span::raw(action.to_string()),
    ])
}

fn notice_span<'a>(notice: &'a Notice, tokens: &ThemeTokens) -> Span<'a> {
    let style = match notice {
        Notice::Prompt(_) => Style::default().fg(tokens.muted),
        Notice::Warning(_) => Style::default().fg(tokens.toast_error),
    };
    Span::styled(notice.text(), style)
}
