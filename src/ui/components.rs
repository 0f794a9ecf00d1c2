use crate::ui::theme::ThemeTokens;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
};
use unicode_width::UnicodeWidthStr;

/// Helper function to calculate centered popup position
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

/// Truncate to a display-column budget, appending an ellipsis when cut.
/// Wide glyphs count as two columns, so byte slicing is not enough here.
pub fn truncate_to_width(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }
    let budget = max_width.saturating_sub(1);
    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = ch.to_string().width();
        if used + w > budget {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push('…');
    out
}

/// Minimal markdown styling for the note preview pane: headings, horizontal
/// rules, list bullets. Everything else renders as plain text.
pub fn markdown_line<'a>(text: &'a str, tokens: &ThemeTokens) -> Line<'a> {
    let trimmed = text.trim_start();

    if let Some(stripped) = heading_text(trimmed) {
        return Line::from(Span::styled(
            stripped,
            Style::default()
                .fg(tokens.title)
                .add_modifier(Modifier::BOLD),
        ));
    }

    if trimmed == "---" || trimmed == "***" {
        return Line::from(Span::styled("─".repeat(24), Style::default().fg(tokens.muted)));
    }

    if let Some(rest) = trimmed.strip_prefix("- ") {
        return Line::from(vec![
            Span::styled("• ", Style::default().fg(tokens.border_active)),
            Span::raw(rest),
        ]);
    }

    Line::from(Span::raw(text))
}

fn heading_text(content: &str) -> Option<&str> {
    let hashes = content.chars().take_while(|c| *c == '#').count();
    if hashes == 0 || hashes > 6 {
        return None;
    }
    content[hashes..].strip_prefix(' ')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Theme;

    #[test]
    fn truncation_respects_display_width() {
        assert_eq!(truncate_to_width("hello", 10), "hello");
        assert_eq!(truncate_to_width("hello world", 6), "hello…");
        // Each CJK glyph is two columns wide.
        assert_eq!(truncate_to_width("日本語テスト", 5), "日本…");
    }

    #[test]
    fn headings_and_bullets_get_styled_lines() {
        let tokens = ThemeTokens::from_theme(&Theme::default());
        let heading = markdown_line("# Standup notes", &tokens);
        assert_eq!(heading.spans[0].content, "Standup notes");

        let bullet = markdown_line("- first item", &tokens);
        assert_eq!(bullet.spans.len(), 2);
        assert_eq!(bullet.spans[1].content, "first item");
    }

    #[test]
    fn hash_without_space_is_not_a_heading() {
        assert_eq!(heading_text("#tag"), None);
        assert_eq!(heading_text("## Title"), Some("Title"));
    }
}
