//! Help tab view

use crate::app::App;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub fn draw(f: &mut Frame, _app: &App, area: Rect) {
    let lines = vec![
        header("═══ Navigation ═══"),
        key_line("1-4", "Jump to tab (Arena/Abilities/Effects/Help)"),
        key_line("Tab / Shift+Tab", "Next/previous tab"),
        key_line("↑/k  ↓/j", "Select player / slot, scroll log"),
        key_line("q / Ctrl+C", "Quit"),
        key_line("?", "Toggle help"),
        Line::from(""),
        header("═══ Players ═══"),
        key_line("a", "Attack the closest enemy"),
        key_line("u", "Activate ultimate"),
        key_line("c", "Switch to the next class"),
        key_line("+", "Level up the selected slot (Abilities tab)"),
        key_line("x / s", "Kill / respawn the selected player"),
        Line::from(""),
        header("═══ Time ═══"),
        key_line("Space", "Run or pause the real-time clock"),
        key_line("t", "Advance time by 1 second"),
        key_line("n / e", "Start / end a round"),
        key_line("d", "Write a JSON snapshot of the session"),
        key_line("r", "Reset the arena"),
        Line::from(""),
        header("═══ Classes ═══"),
        Line::from(Span::styled("Crypt Lord:", Style::default().fg(Color::Yellow))),
        Line::from("  Impale launches, Carapace armors and reflects, Beetles add damage"),
        Line::from("  Locust Swarm steals health and armor from a random enemy in range"),
        Line::from(Span::styled("Undead Scourge:", Style::default().fg(Color::Yellow))),
        Line::from("  Vampiric heals on hit, auras raise speed and lower gravity"),
        Line::from("  Suicide Bomber explodes on command or shortly after death"),
        Line::from(Span::styled("Warden:", Style::default().fg(Color::Yellow))),
        Line::from("  Fan of Knives disguises, Cloak reduces and reflects rear hits"),
        Line::from("  Shadow Strike poisons, Vengeance respawns once per round"),
    ];

    let paragraph = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(" Help "));

    f.render_widget(paragraph, area);
}

fn header(text: &'static str) -> Line<'static> {
    Line::from(Span::styled(
        text,
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    ))
}

fn key_line(key: &str, desc: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {:20}", key), Style::default().fg(Color::Yellow)),
        Span::styled(desc.to_string(), Style::default().fg(Color::White)),
    ])
}
