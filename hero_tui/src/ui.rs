//! UI rendering

mod abilities_view;
mod arena_view;
mod effects_view;
mod help_view;

use crate::app::{App, Tab};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
    Frame,
};

pub fn draw(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Tab bar
            Constraint::Min(0),    // Content
            Constraint::Length(3), // Keybindings footer
        ])
        .split(f.area());

    draw_tabs(f, app, chunks[0]);

    match app.current_tab {
        Tab::Arena => arena_view::draw(f, app, chunks[1]),
        Tab::Abilities => abilities_view::draw(f, app, chunks[1]),
        Tab::Effects => effects_view::draw(f, app, chunks[1]),
        Tab::Help => help_view::draw(f, app, chunks[1]),
    }

    draw_keybindings(f, app, chunks[2]);
}

fn draw_keybindings(f: &mut Frame, app: &App, area: Rect) {
    let common_keys = vec![("Space", "Pause"), ("Tab", "Next tab"), ("q", "Quit")];

    let tab_keys: Vec<(&str, &str)> = match app.current_tab {
        Tab::Arena => vec![
            ("↑/↓", "Select player"),
            ("a", "Attack"),
            ("u", "Ultimate"),
            ("c", "Class"),
            ("t", "+1 sec"),
        ],
        Tab::Abilities => vec![("↑/↓", "Select slot"), ("+", "Level up"), ("u", "Ultimate")],
        Tab::Effects => vec![("↑/↓", "Scroll log"), ("n", "New round"), ("e", "End round")],
        Tab::Help => vec![],
    };

    let mut spans: Vec<Span> = Vec::new();

    for (i, (key, desc)) in tab_keys.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled("  │  ", Style::default().fg(Color::DarkGray)));
        }
        spans.push(Span::styled(
            format!("[{}]", key),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::styled(format!(" {}", desc), Style::default().fg(Color::White)));
    }

    if !tab_keys.is_empty() {
        spans.push(Span::styled("  │  ", Style::default().fg(Color::DarkGray)));
    }

    for (i, (key, desc)) in common_keys.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled("  │  ", Style::default().fg(Color::DarkGray)));
        }
        spans.push(Span::styled(format!("[{}]", key), Style::default().fg(Color::Cyan)));
        spans.push(Span::styled(format!(" {}", desc), Style::default().fg(Color::Gray)));
    }

    let paragraph = Paragraph::new(Line::from(spans))
        .block(Block::default().borders(Borders::ALL).title(" Keys "))
        .alignment(ratatui::layout::Alignment::Center);

    f.render_widget(paragraph, area);
}

fn draw_tabs(f: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<Line> = Tab::all()
        .iter()
        .map(|t| {
            let style = if *t == app.current_tab {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };
            Line::from(Span::styled(t.name(), style))
        })
        .collect();

    let clock = if app.paused { "paused" } else { "running" };
    let title = format!(" Hero Arena  {:.1}s ({}) ", app.time_elapsed, clock);
    let tabs = Tabs::new(titles)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(Style::default().fg(Color::Yellow))
        .divider("|");

    f.render_widget(tabs, area);
}

/// Text bar for a value out of a maximum
pub fn bar(current: f64, max: f64, width: usize) -> String {
    let percent = if max > 0.0 { (current / max).clamp(0.0, 1.0) } else { 0.0 };
    let filled = (percent * width as f64) as usize;
    let empty = width.saturating_sub(filled);
    format!("{}{}", "█".repeat(filled), "░".repeat(empty))
}

/// Color for a health percentage
pub fn health_color(percent: f64) -> Color {
    if percent > 50.0 {
        Color::Green
    } else if percent > 25.0 {
        Color::Yellow
    } else {
        Color::Red
    }
}

pub fn label_line(name: &str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{:16}", name), Style::default().fg(Color::Gray)),
        Span::styled(value, Style::default().fg(Color::White)),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bar_width() {
        assert_eq!(bar(50.0, 100.0, 10).chars().count(), 10);
        assert_eq!(bar(0.0, 0.0, 4), "░░░░");
        assert_eq!(bar(150.0, 100.0, 2), "██");
    }
}
