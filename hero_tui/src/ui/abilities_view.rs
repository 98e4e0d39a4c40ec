//! Abilities tab: class abilities, levels and cooldowns of the selected player

use super::bar;
use crate::app::{App, MAX_LEVEL};
use hero_core::prelude::*;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

pub fn draw(f: &mut Frame, app: &App, area: Rect) {
    let Some(actor) = app.selected_actor() else {
        return;
    };
    let name = app.actor_name(actor);

    let Some(kind) = app.session.class_of(actor) else {
        let paragraph = Paragraph::new("No class. Press [c] on the Arena tab to pick one.")
            .block(Block::default().borders(Borders::ALL).title(format!(" {} ", name)));
        f.render_widget(paragraph, area);
        return;
    };

    let mut lines = vec![
        Line::from(Span::styled(
            format!("═══ {} ═══", kind.display_name()),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];

    for (slot, info) in AbilitySlot::all().into_iter().zip(app.session.abilities(actor)) {
        let level = app.session.levels().get(actor, kind, slot);
        let selected = slot.index() == app.selected_slot;
        let marker = if selected { "▶ " } else { "  " };
        let name_style = if level == 0 {
            Style::default().fg(Color::DarkGray)
        } else if selected {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };

        lines.push(Line::from(vec![
            Span::styled(marker, Style::default().fg(Color::Yellow)),
            Span::styled(format!("{:28}", info.name), name_style),
            Span::styled(
                format!("{}{}", "●".repeat(level as usize), "○".repeat(MAX_LEVEL.saturating_sub(level) as usize)),
                Style::default().fg(Color::Green),
            ),
        ]));
        lines.push(Line::from(Span::styled(
            format!("    {}", info.description),
            Style::default().fg(Color::Gray),
        )));

        if let Some(full) = info.cooldown {
            lines.push(cooldown_line(app.session.cooldowns().remaining(actor, slot), full));
        }
        lines.push(Line::from(""));
    }

    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title(format!(" {} ", name)));
    f.render_widget(paragraph, area);
}

fn cooldown_line(remaining: f64, full: f64) -> Line<'static> {
    if remaining <= 0.0 {
        return Line::from(Span::styled(
            "    READY",
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        ));
    }
    if remaining.is_infinite() {
        return Line::from(Span::styled(
            "    Used this round",
            Style::default().fg(Color::Red),
        ));
    }
    Line::from(vec![
        Span::raw("    "),
        Span::styled(bar(full - remaining, full, 20), Style::default().fg(Color::Blue)),
        Span::styled(format!(" {:.1}s", remaining), Style::default().fg(Color::White)),
    ])
}
