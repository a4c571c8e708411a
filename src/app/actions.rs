use chrono::Utc;
use tracing::{error, info};

use super::state::{App, LogLevel};
use super::update::refresh_filter;
use crate::registry::refresh_catalogs;
use crate::script::{compose, save_script, ComposeError};

pub fn generate_script(app: &mut App) {
    match compose(
        &app.selection,
        &app.catalogs,
        app.package_manager,
        app.direction,
    ) {
        Ok(script) => {
            app.generated_script = Some(script);
            app.script_scroll = 0;
            app.selected_tab = 2;
            refresh_filter(app);
            app.log("Script generated!".to_string(), LogLevel::Success);
            app.set_status("Script ready. S saves it, C clears everything.");
        }
        Err(ComposeError::EmptySelection) => {
            app.log("No tweaks or apps selected".to_string(), LogLevel::Error);
        }
    }
}

pub fn save_generated_script(app: &mut App) {
    let Some(script) = app.generated_script.as_deref() else {
        app.log("Generate a script first (G).".to_string(), LogLevel::Error);
        return;
    };

    match save_script(".", script) {
        Ok(path) => {
            info!(path = %path.display(), "saved script");
            app.set_status(format!("Saved {}", path.display()));
            app.log("Script downloaded!".to_string(), LogLevel::Success);
        }
        Err(e) => {
            error!(error = %e, "saving script failed");
            app.log(format!("Save failed: {e}"), LogLevel::Error);
        }
    }
}

/// Refetch both catalogs, unless the loaded copy is still fresh and `force` is off.
pub fn reload_catalogs(app: &mut App, force: bool) {
    if !force && app.catalogs.is_fresh(Utc::now(), app.config.cache_max_age()) {
        app.set_status("Catalogs are fresh. Shift+R forces a reload.");
        return;
    }

    let (catalogs, notices) = refresh_catalogs(&app.client, &app.config, &app.catalogs);
    app.catalogs = catalogs;
    if notices.is_empty() {
        app.generated_script = None;
    }
    refresh_filter(app);

    if notices.is_empty() {
        app.log(
            format!(
                "Loaded {} apps and {} tweaks",
                app.catalogs.apps.len(),
                app.catalogs.tweaks.len()
            ),
            LogLevel::Success,
        );
    } else {
        for notice in notices {
            app.log(notice, LogLevel::Error);
        }
    }
}
