use ratatui::{
    layout::Rect,
    prelude::*,
    style::{Modifier, Style},
    widgets::{Block, BorderType, Borders, Paragraph, Wrap},
    Frame,
};

use crate::app::state::App;
use crate::registry::model::{AppEntry, TweakEntry};
use crate::script::install_command;
use crate::ui::theme::*;

fn field<'a>(label: &'a str, value: impl Into<String>, color: Color) -> Line<'a> {
    Line::from(vec![
        Span::styled(label, Style::default().fg(C_MUTED)),
        Span::styled(value.into(), Style::default().fg(color)),
    ])
}

fn app_lines(entry: &AppEntry) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(vec![
            Span::styled("Name: ", Style::default().fg(C_MUTED)),
            Span::styled(
                entry.name.clone(),
                Style::default().fg(C_TEXT).add_modifier(Modifier::BOLD),
            ),
        ]),
        field("Category: ", entry.category.clone(), C_TEXT),
        field(
            "Winget: ",
            entry.winget_id().unwrap_or("N/A").to_string(),
            C_TEXT,
        ),
        field(
            "Chocolatey: ",
            entry.chocolatey_id().unwrap_or("N/A").to_string(),
            C_TEXT,
        ),
    ];
    if let Some(link) = &entry.homepage_url {
        lines.push(field("Link: ", link.clone(), C_PRIMARY));
    }
    if let Some(icon) = &entry.icon_url {
        lines.push(field("Icon: ", icon.clone(), C_MUTED));
    }
    if let Some(warning) = &entry.warning {
        lines.push(field("Warning: ", warning.clone(), C_WARNING));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        entry.description.clone(),
        Style::default().fg(C_TEXT),
    )));
    lines
}

fn tweak_lines(entry: &TweakEntry) -> Vec<Line<'static>> {
    vec![
        Line::from(vec![
            Span::styled("Title: ", Style::default().fg(C_MUTED)),
            Span::styled(
                entry.display_title().to_string(),
                Style::default().fg(C_TEXT).add_modifier(Modifier::BOLD),
            ),
        ]),
        field("ID: ", entry.id.clone(), C_TEXT),
        field("Categories: ", entry.categories.join(", "), C_TEXT),
        field(
            "Recommended: ",
            if entry.recommended { "yes" } else { "no" },
            if entry.recommended { C_SUCCESS } else { C_MUTED },
        ),
        field(
            "Reversible: ",
            if entry.reversible { "yes" } else { "no" },
            if entry.reversible { C_SUCCESS } else { C_MUTED },
        ),
        field(
            "Undo script: ",
            if entry.unapply_script().is_some() { "yes" } else { "none" },
            if entry.unapply_script().is_some() {
                C_SUCCESS
            } else {
                C_WARNING
            },
        ),
        Line::from(""),
        Line::from(Span::styled(
            entry.description.clone(),
            Style::default().fg(C_TEXT),
        )),
    ]
}

pub fn render_detail_panel(frame: &mut Frame<'_>, area: Rect, app: &App) {
    let details_block = Block::default()
        .title(" Details ")
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(C_PANEL))
        .style(Style::default().bg(C_BG));
    let details_inner = details_block.inner(area);
    frame.render_widget(details_block, area);

    let mut details_lines = if let Some(entry) = app.current_app() {
        app_lines(entry)
    } else if let Some(entry) = app.current_tweak() {
        tweak_lines(entry)
    } else {
        vec![Line::from(Span::styled(
            "Nothing matches the current filter/search.",
            Style::default().fg(C_MUTED),
        ))]
    };

    if app.current_kind() == Some(crate::registry::model::CatalogKind::Apps) {
        details_lines.push(Line::from(""));
        for line in install_command(&app.selection, &app.catalogs.apps, app.package_manager).lines()
        {
            details_lines.push(Line::from(Span::styled(
                line.to_string(),
                Style::default().fg(C_PRIMARY),
            )));
        }
    }

    let details_widget = Paragraph::new(details_lines).wrap(Wrap { trim: true });
    frame.render_widget(details_widget, details_inner);
}
