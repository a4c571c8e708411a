use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    prelude::*,
    style::{Color, Modifier, Style},
    widgets::{Block, BorderType, Borders, List, ListItem, Paragraph},
    Frame,
};

use crate::app::state::App;
use crate::registry::model::{AppEntry, CatalogKind};
use crate::ui::theme::*;
use crate::utils::truncate_with_ellipsis;

struct Row<'a> {
    checked: bool,
    name: &'a str,
    category: String,
    badge: (&'static str, Color),
    description: &'a str,
}

pub fn render_catalog_list(frame: &mut Frame<'_>, area: Rect, app: &mut App) {
    let Some(kind) = app.current_kind() else {
        return;
    };

    let catalog_block = Block::default()
        .title(format!(" {} ", kind.label()))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(C_PANEL))
        .style(Style::default().bg(C_BG));
    let catalog_inner = catalog_block.inner(area);
    frame.render_widget(catalog_block, area);

    let left_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(4)])
        .split(catalog_inner);

    let header = match kind {
        CatalogKind::Apps => "Sel  Name                 Category        Source      Description",
        CatalogKind::Tweaks => "Sel  Title                Category        Flags       Description",
    };
    let header_line =
        Paragraph::new(header).style(Style::default().fg(C_MUTED).add_modifier(Modifier::BOLD));
    frame.render_widget(header_line, left_chunks[0]);

    let rows: Vec<Row> = match kind {
        CatalogKind::Apps => app
            .filtered_indices
            .iter()
            .filter_map(|idx| app.catalogs.apps.get(*idx))
            .map(|entry| Row {
                checked: app.is_checked(entry),
                name: &entry.name,
                category: entry.category.clone(),
                badge: app_badge(entry),
                description: &entry.description,
            })
            .collect(),
        CatalogKind::Tweaks => app
            .filtered_indices
            .iter()
            .filter_map(|idx| app.catalogs.tweaks.get(*idx))
            .map(|entry| Row {
                checked: app.is_checked(entry),
                name: entry.display_title(),
                category: entry.categories.join(","),
                badge: tweak_badge(entry.recommended, entry.unapply_script().is_some()),
                description: &entry.description,
            })
            .collect(),
    };

    let list_width = left_chunks[1].width as usize;
    let desc_width = if list_width > 58 { list_width - 58 } else { 12 };
    let items: Vec<ListItem> = rows
        .into_iter()
        .map(|row| {
            let checkbox = if row.checked { "[x]" } else { "[ ]" };
            let line = Line::from(vec![
                Span::styled(format!("{:<4}", checkbox), Style::default().fg(C_PRIMARY)),
                Span::styled(
                    format!("{:<21}", truncate_with_ellipsis(row.name, 20)),
                    Style::default().fg(C_TEXT),
                ),
                Span::styled(
                    format!("{:<16}", truncate_with_ellipsis(&row.category, 14)),
                    Style::default().fg(C_MUTED),
                ),
                Span::styled(format!("{:<12}", row.badge.0), Style::default().fg(row.badge.1)),
                Span::styled(
                    truncate_with_ellipsis(row.description, desc_width),
                    Style::default().fg(C_TEXT),
                ),
            ]);

            ListItem::new(line)
        })
        .collect();

    let list = List::new(items)
        .highlight_style(
            Style::default()
                .bg(C_HIGHLIGHT)
                .fg(C_TEXT)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol(">> ")
        .repeat_highlight_symbol(true);

    frame.render_stateful_widget(list, left_chunks[1], &mut app.list_state);
}

fn app_badge(entry: &AppEntry) -> (&'static str, Color) {
    match (entry.winget_id().is_some(), entry.chocolatey_id().is_some()) {
        (true, true) => ("both", C_SUCCESS),
        (true, false) => ("winget", C_PRIMARY),
        (false, true) => ("choco", C_PRIMARY),
        (false, false) => ("manual", C_WARNING),
    }
}

fn tweak_badge(recommended: bool, reversible: bool) -> (&'static str, Color) {
    match (recommended, reversible) {
        (true, true) => ("rec,undo", C_SUCCESS),
        (true, false) => ("rec", C_SUCCESS),
        (false, true) => ("undo", C_PRIMARY),
        (false, false) => ("one-way", C_WARNING),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(json: &str) -> AppEntry {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn blank_winget_id_is_not_badged_as_winget() {
        let blank = entry(r#"{"name":"A","id":"  ","chocolatey":"a"}"#);
        assert_eq!(app_badge(&blank).0, "choco");

        let neither = entry(r#"{"name":"B","id":"","chocolatey":" "}"#);
        assert_eq!(app_badge(&neither).0, "manual");

        let both = entry(r#"{"name":"C","id":"C.C","chocolatey":"c"}"#);
        assert_eq!(app_badge(&both).0, "both");
    }
}
