use ratatui::{
    layout::Rect,
    prelude::*,
    style::Style,
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use crate::app::state::App;
use crate::script::SCRIPT_FILE_NAME;
use crate::ui::theme::*;

pub fn render_script_panel(frame: &mut Frame<'_>, area: Rect, app: &App) {
    let title = format!(
        " {} [{} / {}] ",
        SCRIPT_FILE_NAME,
        app.package_manager.label(),
        app.direction.label()
    );
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(C_PANEL))
        .style(Style::default().bg(C_BG));

    let paragraph = match &app.generated_script {
        Some(script) => Paragraph::new(
            script
                .lines()
                .map(|line| {
                    let color = if line.starts_with('#') { C_MUTED } else { C_TEXT };
                    Line::from(Span::styled(line.to_string(), Style::default().fg(color)))
                })
                .collect::<Vec<_>>(),
        )
        .scroll((app.script_scroll, 0)),
        None => Paragraph::new(vec![
            Line::from(Span::styled(
                format!(
                    "{} app(s) and {} tweak(s) selected.",
                    app.selection.selected_app_names.len(),
                    app.selection.selected_tweak_ids.len()
                ),
                Style::default().fg(C_TEXT),
            )),
            Line::from(""),
            Line::from(Span::styled(
                "Press G to generate the script. P switches winget/chocolatey, U switches apply/unapply.",
                Style::default().fg(C_MUTED),
            )),
        ]),
    };

    frame.render_widget(paragraph.block(block), area);
}
