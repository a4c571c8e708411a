use std::time::{Duration, Instant};

use ratatui::widgets::ListState;
use reqwest::blocking::Client;

use super::selection::{CatalogItem, Selection};
use crate::config::Config;
use crate::registry::model::{AppEntry, CatalogKind, Catalogs, TweakEntry};
use crate::script::{Direction, PackageManager};

pub const TABS: [&str; 3] = ["Apps", "Tweaks", "Script"];
const LOG_TTL: Duration = Duration::from_secs(3);

#[derive(Clone)]
pub struct LogEntry {
    pub message: String,
    pub level: LogLevel,
    pub created_at: Instant,
}

#[derive(Clone, Copy)]
pub enum LogLevel {
    Success,
    Error,
    Info,
}

pub struct App {
    pub config: Config,
    pub client: Client,
    pub catalogs: Catalogs,
    pub selection: Selection,
    pub selected_tab: usize,
    pub category_cursor: usize,
    pub filtered_indices: Vec<usize>,
    pub list_state: ListState,
    pub search_mode: bool,
    pub package_manager: PackageManager,
    pub direction: Direction,
    pub generated_script: Option<String>,
    pub script_scroll: u16,
    pub status: String,
    pub logs: Vec<LogEntry>,
}

impl App {
    pub fn new(config: Config, client: Client, catalogs: Catalogs) -> Self {
        Self {
            config,
            client,
            catalogs,
            selection: Selection::new(),
            selected_tab: 0,
            category_cursor: 0,
            filtered_indices: Vec::new(),
            list_state: ListState::default(),
            search_mode: false,
            package_manager: PackageManager::default(),
            direction: Direction::default(),
            generated_script: None,
            script_scroll: 0,
            status: "Ready. Space select, F filter, G generate, / search.".to_string(),
            logs: Vec::new(),
        }
    }

    pub fn log(&mut self, message: String, level: LogLevel) {
        let now = Instant::now();
        self.logs
            .retain(|l| now.duration_since(l.created_at) < LOG_TTL);
        self.logs.push(LogEntry {
            message,
            level,
            created_at: now,
        });
        if self.logs.len() > 3 {
            self.logs.remove(0);
        }
    }

    pub fn expire_logs(&mut self) {
        let now = Instant::now();
        self.logs
            .retain(|l| now.duration_since(l.created_at) < LOG_TTL);
    }

    /// Catalog shown by the current tab; the script tab has none.
    pub fn current_kind(&self) -> Option<CatalogKind> {
        match self.selected_tab {
            0 => Some(CatalogKind::Apps),
            1 => Some(CatalogKind::Tweaks),
            _ => None,
        }
    }

    pub fn current_category(&self) -> Option<&'static str> {
        let kind = self.current_kind()?;
        kind.known_categories().get(self.category_cursor).copied()
    }

    pub fn current_app(&self) -> Option<&AppEntry> {
        if self.current_kind() != Some(CatalogKind::Apps) {
            return None;
        }
        let idx = self.list_state.selected()?;
        self.catalogs.apps.get(*self.filtered_indices.get(idx)?)
    }

    pub fn current_tweak(&self) -> Option<&TweakEntry> {
        if self.current_kind() != Some(CatalogKind::Tweaks) {
            return None;
        }
        let idx = self.list_state.selected()?;
        self.catalogs.tweaks.get(*self.filtered_indices.get(idx)?)
    }

    pub fn move_down(&mut self) {
        if self.filtered_indices.is_empty() {
            self.list_state.select(None);
            return;
        }

        let next = match self.list_state.selected() {
            Some(i) if i + 1 < self.filtered_indices.len() => i + 1,
            _ => 0,
        };
        self.list_state.select(Some(next));
    }

    pub fn move_up(&mut self) {
        if self.filtered_indices.is_empty() {
            self.list_state.select(None);
            return;
        }

        let prev = match self.list_state.selected() {
            Some(0) | None => self.filtered_indices.len() - 1,
            Some(i) => i.saturating_sub(1),
        };
        self.list_state.select(Some(prev));
    }

    pub fn toggle_selected_current(&mut self) {
        if let Some(name) = self.current_app().map(|app| app.name.clone()) {
            self.selection.toggle_app(&name);
        } else if let Some(id) = self.current_tweak().map(|tweak| tweak.id.clone()) {
            self.selection.toggle_tweak(&id);
        }
    }

    pub fn set_status<S: Into<String>>(&mut self, message: S) {
        self.status = message.into();
    }

    pub fn visible_count(&self) -> usize {
        self.filtered_indices.len()
    }

    pub fn is_checked<T: CatalogItem>(&self, item: &T) -> bool {
        self.selection.is_selected(item)
    }
}
