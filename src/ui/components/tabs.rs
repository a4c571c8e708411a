use ratatui::{
    layout::Rect,
    prelude::*,
    style::{Modifier, Style},
    widgets::{Block, BorderType, Borders, Tabs},
    Frame,
};

use crate::app::state::{App, TABS};
use crate::ui::theme::*;

pub fn render_main_tabs(frame: &mut Frame<'_>, area: Rect, app: &App) {
    let tab_titles = TABS
        .iter()
        .enumerate()
        .map(|(index, title)| {
            let count = match index {
                0 => app.selection.selected_app_names.len(),
                1 => app.selection.selected_tweak_ids.len(),
                _ => app.selection.total_selected(),
            };
            Line::from(format!("{title} ({count})"))
        })
        .collect::<Vec<_>>();
    let tabs = Tabs::new(tab_titles)
        .select(app.selected_tab)
        .block(
            Block::default()
                .title(" Sparkle Script Builder ")
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(C_PANEL)),
        )
        .style(Style::default().fg(C_MUTED))
        .highlight_style(
            Style::default()
                .fg(C_PRIMARY)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        )
        .divider(" | ");
    frame.render_widget(tabs, area);
}

/// Known categories of the current catalog; active filters carry a `*`.
pub fn render_category_tabs(frame: &mut Frame<'_>, area: Rect, app: &App) {
    let Some(kind) = app.current_kind() else {
        return;
    };
    let active = app.selection.active_categories(kind);
    let category_titles = kind
        .known_categories()
        .iter()
        .map(|c| {
            if active.contains(*c) {
                Line::from(Span::styled(
                    format!("*{c}"),
                    Style::default().fg(C_SUCCESS),
                ))
            } else {
                Line::from(c.to_string())
            }
        })
        .collect::<Vec<_>>();

    let title = if active.is_empty() {
        " Categories (F filter, a/A select/deselect visible) ".to_string()
    } else {
        format!(" Categories ({} filtered) ", active.len())
    };
    let cat_tabs = Tabs::new(category_titles)
        .select(app.category_cursor)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(C_PANEL)),
        )
        .style(Style::default().fg(C_MUTED))
        .highlight_style(Style::default().fg(C_PRIMARY).add_modifier(Modifier::BOLD))
        .divider(" | ");
    frame.render_widget(cat_tabs, area);
}
