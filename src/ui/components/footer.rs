use ratatui::{
    layout::Rect,
    prelude::*,
    style::{Modifier, Style},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use crate::app::state::{App, LogLevel};
use crate::ui::theme::*;

fn key_hint(key: &'static str, label: &'static str, color: Color) -> [Span<'static>; 2] {
    [
        Span::styled(label, Style::default().fg(C_MUTED)),
        Span::styled(key, Style::default().fg(color).add_modifier(Modifier::BOLD)),
    ]
}

pub fn render_footer(frame: &mut Frame<'_>, area: Rect, app: &mut App) {
    app.expire_logs();

    let mut first_line: Vec<Span> = Vec::new();
    for (key, label, color) in [
        ("↑/↓ j/k", "Move ", C_TEXT),
        ("Tab", "  Tabs ", C_TEXT),
        ("←/→", "  Category ", C_TEXT),
        ("/", "  Search ", C_PRIMARY),
        ("Space", "  Select ", C_TEXT),
        ("C", "  Clear ", C_TEXT),
        ("R", "  Reload ", C_TEXT),
        ("Q", "  Quit ", C_TEXT),
    ] {
        first_line.extend(key_hint(key, label, color));
    }

    let mut second_line: Vec<Span> = vec![
        Span::styled("Script ", Style::default().fg(C_MUTED)),
        Span::styled(
            "G Generate",
            Style::default().fg(C_SUCCESS).add_modifier(Modifier::BOLD),
        ),
        Span::styled("  ", Style::default()),
        Span::styled(
            "S Save",
            Style::default().fg(C_PRIMARY).add_modifier(Modifier::BOLD),
        ),
        Span::styled("  ", Style::default()),
        Span::styled(
            format!("P {}", app.package_manager.label()),
            Style::default().fg(C_PRIMARY).add_modifier(Modifier::BOLD),
        ),
        Span::styled("  ", Style::default()),
        Span::styled(
            format!("U {}", app.direction.label()),
            Style::default().fg(C_WARNING).add_modifier(Modifier::BOLD),
        ),
        Span::styled("   |   ", Style::default().fg(C_PANEL)),
        Span::styled(
            format!(
                "visible:{} selected:{}  {}",
                app.visible_count(),
                app.selection.total_selected(),
                app.status
            ),
            Style::default().fg(C_MUTED),
        ),
    ];

    for l in &app.logs {
        let color = match l.level {
            LogLevel::Success => C_SUCCESS,
            LogLevel::Error => C_WARNING,
            LogLevel::Info => C_PRIMARY,
        };
        second_line.push(Span::styled("  ", Style::default()));
        second_line.push(Span::styled(l.message.clone(), Style::default().fg(color)));
    }

    let footer = Paragraph::new(vec![Line::from(first_line), Line::from(second_line)]).block(
        Block::default()
            .title(" Command Bar ")
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(C_PANEL)),
    );
    frame.render_widget(footer, area);
}
