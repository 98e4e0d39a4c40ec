//! Arena tab: players and the event log

use super::{bar, health_color};
use crate::app::App;
use hero_core::prelude::*;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

pub fn draw(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(48), // Players
            Constraint::Min(40),    // Log
        ])
        .split(area);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),     // Player list
            Constraint::Length(9),  // Selected player detail
        ])
        .split(chunks[0]);

    draw_players(f, app, left[0]);
    draw_detail(f, app, left[1]);
    draw_log(f, app, chunks[1]);
}

fn draw_players(f: &mut Frame, app: &App, area: Rect) {
    let mut lines: Vec<Line> = Vec::new();

    for (i, actor) in app.players.iter().enumerate() {
        let Some(player) = app.arena.player(*actor) else {
            continue;
        };
        let selected = i == app.selected_player;
        let marker = if selected { "▶ " } else { "  " };
        let team_color = match player.team {
            Team::Terrorist => Color::LightRed,
            Team::CounterTerrorist => Color::LightBlue,
        };
        let class = app
            .session
            .class_of(*actor)
            .map(|k| k.display_name())
            .unwrap_or("No class");

        let name_style = if selected {
            Style::default().fg(team_color).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(team_color)
        };
        lines.push(Line::from(vec![
            Span::styled(marker, Style::default().fg(Color::Yellow)),
            Span::styled(format!("{:12}", player.name), name_style),
            Span::styled(format!(" {}", class), Style::default().fg(Color::Gray)),
        ]));

        if app.arena.is_alive(*actor) {
            let percent = player.health as f64 / player.max_health.max(1) as f64 * 100.0;
            lines.push(Line::from(vec![
                Span::raw("    "),
                Span::styled(
                    bar(player.health as f64, player.max_health as f64, 20),
                    Style::default().fg(health_color(percent)),
                ),
                Span::styled(
                    format!(" {:>3} HP {:>3} AP", player.health, player.armor),
                    Style::default().fg(Color::White),
                ),
            ]));
        } else {
            lines.push(Line::from(Span::styled(
                "    ☠ DEAD",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )));
        }
    }

    let paragraph = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(" Players "));
    f.render_widget(paragraph, area);
}

fn draw_detail(f: &mut Frame, app: &App, area: Rect) {
    let Some(player) = app.selected_actor().and_then(|a| app.arena.player(a)) else {
        return;
    };

    let lines = vec![
        super::label_line(
            "Position",
            format!("{:.0}, {:.0}, {:.0}", player.position.x, player.position.y, player.position.z),
        ),
        super::label_line(
            "Velocity",
            format!("{:.0}, {:.0}, {:.0}", player.velocity.x, player.velocity.y, player.velocity.z),
        ),
        super::label_line(
            "Speed / gravity",
            format!("{:.2}x / {:.2}x", player.speed_modifier, player.gravity_scale),
        ),
        super::label_line("Model", player.model.rsplit('/').next().unwrap_or("").to_string()),
        super::label_line("Weapons", player.weapons.join(", ")),
        super::label_line("Respawns", player.respawn_count.to_string()),
    ];

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!(" {} ", player.name)),
    );
    f.render_widget(paragraph, area);
}

fn draw_log(f: &mut Frame, app: &App, area: Rect) {
    let items: Vec<ListItem> = app
        .log
        .iter()
        .skip(app.log_scroll)
        .take(area.height.saturating_sub(2) as usize)
        .map(|line| {
            let style = if line.contains("━━━") {
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
            } else if line.contains("═══") {
                Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD)
            } else if line.contains("DEFEATED") {
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
            } else if line.contains("Bonus damage") {
                Style::default().fg(Color::Red)
            } else if line.contains("Damage ignored") {
                Style::default().fg(Color::Green)
            } else if line.contains("[Center]") || line.contains("[Alert]") {
                Style::default().fg(Color::Yellow)
            } else if line.contains("[Chat]") {
                Style::default().fg(Color::Gray)
            } else {
                Style::default().fg(Color::White)
            };
            ListItem::new(Line::from(Span::styled(line.clone(), style)))
        })
        .collect();

    let list = List::new(items).block(Block::default().borders(Borders::ALL).title(" Event Log "));
    f.render_widget(list, area);
}
