use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::Style,
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::app::state::App;
use crate::ui::components::{
    catalog_list::render_catalog_list, detail_panel::render_detail_panel, footer::render_footer,
    script_panel::render_script_panel, tabs::render_category_tabs, tabs::render_main_tabs,
};
use crate::ui::layout::{centered_rect, search_cursor};
use crate::ui::theme::*;

pub fn ui(frame: &mut Frame<'_>, app: &mut App) {
    frame.render_widget(
        Block::default().style(Style::default().bg(C_BG)),
        frame.area(),
    );

    let has_catalog = app.current_kind().is_some();
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(if has_catalog { 3 } else { 0 }),
            Constraint::Length(if has_catalog { 3 } else { 0 }),
            Constraint::Min(10),
            Constraint::Length(4),
        ])
        .split(frame.area());

    render_main_tabs(frame, vertical[0], app);

    if has_catalog {
        render_category_tabs(frame, vertical[1], app);
        render_search(frame, vertical[2], app);

        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(62), Constraint::Percentage(38)])
            .split(vertical[3]);

        render_catalog_list(frame, body[0], app);
        render_detail_panel(frame, body[1], app);
    } else {
        render_script_panel(frame, vertical[3], app);
    }

    render_footer(frame, vertical[4], app);

    if app.catalogs.is_empty() {
        let area = centered_rect(50, 20, frame.area());
        frame.render_widget(Clear, area);
        let notice = Paragraph::new("No catalog data loaded.\n\nPress Shift+R to retry.")
            .style(Style::default().fg(C_WARNING))
            .wrap(Wrap { trim: true })
            .alignment(ratatui::prelude::Alignment::Center)
            .block(
                Block::default()
                    .title(" Catalogs Unavailable ")
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .border_style(Style::default().fg(C_PANEL)),
            );
        frame.render_widget(notice, area);
    }

    if app.search_mode && has_catalog {
        frame.set_cursor_position(search_cursor(vertical[2], &app.selection.search_text));
    }
}

fn render_search(frame: &mut Frame<'_>, area: ratatui::layout::Rect, app: &App) {
    let search_title = if app.search_mode {
        " Search mode (/): typing... Enter apply, Esc close "
    } else {
        " Search (/ to start, Esc clear) "
    };

    let search_text = if app.selection.search_text.is_empty() {
        "Type to filter by name, description, category".to_string()
    } else {
        app.selection.search_text.clone()
    };
    let search = Paragraph::new(search_text)
        .block(
            Block::default()
                .title(search_title)
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(if app.search_mode {
                    C_PRIMARY
                } else {
                    C_PANEL
                })),
        )
        .style(if app.search_mode {
            Style::default().fg(C_TEXT)
        } else {
            Style::default().fg(C_MUTED)
        });

    frame.render_widget(search, area);
}
