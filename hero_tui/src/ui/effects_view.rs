//! Effects tab: live effects, pending timers and the log

use crate::app::App;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

pub fn draw(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(50), // Effects
            Constraint::Min(0),         // Log
        ])
        .split(area);

    draw_effects(f, app, chunks[0]);
    draw_log(f, app, chunks[1]);
}

fn draw_effects(f: &mut Frame, app: &App, area: Rect) {
    let summaries = app.session.effects().summaries();

    let mut lines = vec![Line::from(vec![
        Span::styled("Pending timers: ", Style::default().fg(Color::Gray)),
        Span::styled(
            app.session.scheduler().pending().to_string(),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ),
    ])];
    lines.push(Line::from(""));

    if summaries.is_empty() {
        lines.push(Line::from(Span::styled("No live effects", Style::default().fg(Color::DarkGray))));
    }

    for effect in &summaries {
        let owner = app.actor_name(effect.owner);
        let target = effect
            .victim
            .map(|v| format!(" → {}", app.actor_name(v)))
            .unwrap_or_default();
        let remaining = match effect.remaining {
            Some(seconds) => format!("{:.1}s left", seconds),
            None => "until round end".to_string(),
        };
        lines.push(Line::from(vec![
            Span::styled(
                format!("#{:<4}", effect.id.0),
                Style::default().fg(Color::DarkGray),
            ),
            Span::styled(
                format!("{:14}", effect.tag.name()),
                Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!("{}{}", owner, target), Style::default().fg(Color::White)),
            Span::styled(
                format!("  {}  ticks {}", remaining, effect.ticks),
                Style::default().fg(Color::Gray),
            ),
        ]));
    }

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!(" Live Effects ({}) ", summaries.len())),
    );
    f.render_widget(paragraph, area);
}

fn draw_log(f: &mut Frame, app: &App, area: Rect) {
    let items: Vec<ListItem> = app
        .log
        .iter()
        .skip(app.log_scroll)
        .take(area.height.saturating_sub(2) as usize)
        .map(|line| ListItem::new(line.clone()))
        .collect();

    let list = List::new(items).block(Block::default().borders(Borders::ALL).title(" Log "));
    f.render_widget(list, area);
}
