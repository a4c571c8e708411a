use std::io::Stdout;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{backend::CrosstermBackend, Terminal};

use super::actions::{generate_script, reload_catalogs, save_generated_script};
use super::selection::CatalogItem;
use super::state::{App, LogLevel, TABS};
use crate::registry::model::CatalogKind;
use crate::ui::draw::ui;

/// Recompute which catalog rows are visible for the current tab.
pub fn refresh_filter(app: &mut App) {
    app.filtered_indices = match app.current_kind() {
        Some(CatalogKind::Apps) => visible_indices(&app.catalogs.apps, app),
        Some(CatalogKind::Tweaks) => visible_indices(&app.catalogs.tweaks, app),
        None => Vec::new(),
    };

    let new_idx = match app.list_state.selected() {
        Some(idx) if idx < app.filtered_indices.len() => Some(idx),
        _ if app.filtered_indices.is_empty() => None,
        _ => Some(0),
    };
    app.list_state.select(new_idx);
}

fn visible_indices<T: CatalogItem>(items: &[T], app: &App) -> Vec<usize> {
    items
        .iter()
        .enumerate()
        .filter(|(_, item)| app.selection.is_visible(*item))
        .map(|(index, _)| index)
        .collect()
}

pub fn cycle_tab_right(app: &mut App) {
    app.selected_tab = (app.selected_tab + 1) % TABS.len();
    app.category_cursor = 0;
    refresh_filter(app);
}

pub fn cycle_tab_left(app: &mut App) {
    app.selected_tab = if app.selected_tab == 0 {
        TABS.len() - 1
    } else {
        app.selected_tab - 1
    };
    app.category_cursor = 0;
    refresh_filter(app);
}

pub fn category_right(app: &mut App) {
    let Some(kind) = app.current_kind() else {
        return;
    };
    let count = kind.known_categories().len();
    app.category_cursor = (app.category_cursor + 1) % count;
}

pub fn category_left(app: &mut App) {
    let Some(kind) = app.current_kind() else {
        return;
    };
    let count = kind.known_categories().len();
    app.category_cursor = if app.category_cursor == 0 {
        count - 1
    } else {
        app.category_cursor - 1
    };
}

pub fn toggle_category_filter(app: &mut App) {
    let (Some(kind), Some(category)) = (app.current_kind(), app.current_category()) else {
        return;
    };
    app.selection.toggle_category_filter(kind, category);
    refresh_filter(app);
    let state = if app.selection.active_categories(kind).contains(category) {
        "on"
    } else {
        "off"
    };
    app.set_status(format!("Filter '{category}' {state}."));
}

/// Select or deselect every visible entry of the highlighted category.
pub fn bulk_select_category(app: &mut App, select: bool) {
    let (Some(kind), Some(category)) = (app.current_kind(), app.current_category()) else {
        return;
    };
    let App {
        selection,
        catalogs,
        ..
    } = app;
    match kind {
        CatalogKind::Apps => {
            let visible = selection.visible_apps(&catalogs.apps);
            if select {
                selection.select_all_in_category(category, &visible);
            } else {
                selection.deselect_all_in_category(category, &visible);
            }
        }
        CatalogKind::Tweaks => {
            let visible = selection.visible_tweaks(&catalogs.tweaks);
            if select {
                selection.select_all_in_category(category, &visible);
            } else {
                selection.deselect_all_in_category(category, &visible);
            }
        }
    }
    let verb = if select { "Selected" } else { "Deselected" };
    app.set_status(format!("{verb} visible {} in '{category}'.", kind.label().to_lowercase()));
}

pub fn run(app: &mut App, terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    refresh_filter(app);
    loop {
        terminal.draw(|frame| ui(frame, app))?;

        if !event::poll(Duration::from_millis(100))? {
            continue;
        }

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }

            if app.search_mode {
                handle_search_key(app, key);
                continue;
            }

            if !handle_key(app, key) {
                break;
            }
        }
    }

    Ok(())
}

fn handle_search_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.search_mode = false;
        }
        KeyCode::Enter => {
            app.search_mode = false;
            app.set_status(format!("Search applied: '{}'", app.selection.search_text));
        }
        KeyCode::Backspace => {
            app.selection.search_text.pop();
            refresh_filter(app);
        }
        KeyCode::Char(c) => {
            if !key.modifiers.contains(KeyModifiers::CONTROL) {
                app.selection.search_text.push(c);
                refresh_filter(app);
            }
        }
        _ => {}
    }
}

/// Returns `false` when the user asked to quit.
fn handle_key(app: &mut App, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Char('q') | KeyCode::Char('Q') => return false,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => return false,
        KeyCode::Tab => cycle_tab_right(app),
        KeyCode::BackTab => cycle_tab_left(app),
        KeyCode::Down | KeyCode::Char('j') => {
            if app.current_kind().is_some() {
                app.move_down();
            } else {
                app.script_scroll = app.script_scroll.saturating_add(1);
            }
        }
        KeyCode::Up | KeyCode::Char('k') => {
            if app.current_kind().is_some() {
                app.move_up();
            } else {
                app.script_scroll = app.script_scroll.saturating_sub(1);
            }
        }
        KeyCode::Right | KeyCode::Char('l') => category_right(app),
        KeyCode::Left | KeyCode::Char('h') => category_left(app),
        KeyCode::Char('/') => {
            app.search_mode = true;
            app.set_status("Search mode: type to filter, Enter apply, Esc close.");
        }
        KeyCode::Esc => {
            app.selection.set_search_text(String::new());
            refresh_filter(app);
            app.set_status("Search cleared.");
        }
        KeyCode::Char(' ') => app.toggle_selected_current(),
        KeyCode::Char('f') | KeyCode::Char('F') => toggle_category_filter(app),
        KeyCode::Char('a') => bulk_select_category(app, true),
        KeyCode::Char('A') => bulk_select_category(app, false),
        KeyCode::Char('c') | KeyCode::Char('C') => {
            if let Some(kind) = app.current_kind() {
                app.selection.clear(kind);
                app.set_status(format!("Cleared selected {}.", kind.label().to_lowercase()));
            } else {
                app.selection.clear_all();
                app.generated_script = None;
                app.set_status("Cleared all selections.");
            }
        }
        KeyCode::Char('p') | KeyCode::Char('P') => {
            app.package_manager = app.package_manager.toggled();
            app.log(
                format!("Package manager: {}", app.package_manager.label()),
                LogLevel::Info,
            );
        }
        KeyCode::Char('u') | KeyCode::Char('U') => {
            app.direction = app.direction.toggled();
            app.log(format!("Script mode: {}", app.direction.label()), LogLevel::Info);
        }
        KeyCode::Char('g') | KeyCode::Char('G') => generate_script(app),
        KeyCode::Char('s') | KeyCode::Char('S') => save_generated_script(app),
        KeyCode::Char('r') => reload_catalogs(app, false),
        KeyCode::Char('R') => reload_catalogs(app, true),
        _ => {}
    }
    true
}
