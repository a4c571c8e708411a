use std::fmt::Write as _;

use chrono::{Local, NaiveDate};
use tracing::info;

use super::{ComposeError, Direction, PackageManager};
use crate::app::selection::Selection;
use crate::registry::model::{AppEntry, Catalogs, TweakEntry};

/// Render the selection as a PowerShell script stamped with today's date.
pub fn compose(
    selection: &Selection,
    catalogs: &Catalogs,
    package_manager: PackageManager,
    direction: Direction,
) -> Result<String, ComposeError> {
    compose_on(
        selection,
        catalogs,
        package_manager,
        direction,
        Local::now().date_naive(),
    )
}

pub fn compose_on(
    selection: &Selection,
    catalogs: &Catalogs,
    package_manager: PackageManager,
    direction: Direction,
    generated_on: NaiveDate,
) -> Result<String, ComposeError> {
    let apps = selection.selected_apps(&catalogs.apps);
    let tweaks = selection.selected_tweaks(&catalogs.tweaks);

    if apps.is_empty() && tweaks.is_empty() {
        return Err(ComposeError::EmptySelection);
    }

    let mut script = String::new();
    push_header(&mut script, generated_on);
    if !apps.is_empty() {
        push_apps(&mut script, &apps, package_manager);
    }
    if !tweaks.is_empty() {
        push_tweaks(&mut script, &tweaks, direction);
    }
    push_footer(&mut script);

    info!(
        apps = apps.len(),
        tweaks = tweaks.len(),
        package_manager = package_manager.label(),
        direction = direction.label(),
        "composed script"
    );
    Ok(script)
}

/// Stand-alone install command for the selected apps. Always yields text;
/// the empty cases become explanatory comments.
pub fn install_command(
    selection: &Selection,
    apps: &[AppEntry],
    package_manager: PackageManager,
) -> String {
    let selected = selection.selected_apps(apps);
    if selected.is_empty() {
        return format!(
            "# No apps selected. Select apps to generate a {} install command.",
            package_manager.label()
        );
    }

    let ids = package_ids(&selected, package_manager);
    match (package_manager, ids.is_empty()) {
        (_, true) => missing_ids_comment(package_manager).to_string(),
        (PackageManager::Winget, false) => format!(
            "# Winget Install Command\n# Run in PowerShell or CMD as Administrator\n\nwinget install {}",
            ids.join(" ")
        ),
        (PackageManager::Chocolatey, false) => format!(
            "# Chocolatey Install Command\n# Run in PowerShell or CMD as Administrator\n\nchoco install {} -y",
            ids.join(" ")
        ),
    }
}

fn package_ids<'a>(apps: &[&'a AppEntry], package_manager: PackageManager) -> Vec<&'a str> {
    apps.iter()
        .copied()
        .filter_map(|app| match package_manager {
            PackageManager::Winget => app.winget_id(),
            PackageManager::Chocolatey => app.chocolatey_id(),
        })
        .collect()
}

fn missing_ids_comment(package_manager: PackageManager) -> &'static str {
    match package_manager {
        PackageManager::Winget => {
            "# No apps with winget IDs selected. Some apps may only support chocolatey."
        }
        PackageManager::Chocolatey => "# No apps with chocolatey packages selected.",
    }
}

fn push_header(script: &mut String, generated_on: NaiveDate) {
    let _ = writeln!(
        script,
        "# Sparkle Script - Generated on {}",
        generated_on.format("%-m/%-d/%Y")
    );
    script.push_str("# Run as Administrator\n\n");
    script.push_str("Write-Host \"Starting Sparkle Script...\" -ForegroundColor Cyan\n\n");
}

fn push_apps(script: &mut String, apps: &[&AppEntry], package_manager: PackageManager) {
    script.push_str("# Install Applications\n");
    let _ = writeln!(
        script,
        "Write-Host \"Installing {} application(s)...\" -ForegroundColor Green",
        apps.len()
    );

    let ids = package_ids(apps, package_manager);
    if ids.is_empty() {
        script.push_str(missing_ids_comment(package_manager));
        script.push_str("\n\n");
        return;
    }

    let _ = match package_manager {
        PackageManager::Winget => writeln!(
            script,
            "winget install {} --accept-source-agreements --accept-package-agreements\n",
            ids.join(" ")
        ),
        PackageManager::Chocolatey => writeln!(script, "choco install {} -y\n", ids.join(" ")),
    };
}

fn push_tweaks(script: &mut String, tweaks: &[&TweakEntry], direction: Direction) {
    let fragments: Vec<(&str, &str)> = tweaks
        .iter()
        .filter_map(|tweak| {
            let body = match direction {
                Direction::Apply => Some(tweak.apply_script()),
                Direction::Unapply => tweak.unapply_script(),
            };
            body.map(|body| (tweak.display_title(), body))
        })
        .collect();

    script.push_str("# Apply System Tweaks\n");
    match direction {
        Direction::Apply => {
            let _ = writeln!(
                script,
                "Write-Host \"Applying {} tweak(s)...\" -ForegroundColor Yellow",
                fragments.len()
            );
            script.push_str("# Apply scripts\n");
        }
        Direction::Unapply => {
            let _ = writeln!(
                script,
                "Write-Host \"Reverting {} tweak(s)...\" -ForegroundColor Yellow",
                fragments.len()
            );
            script.push_str("# Unapply scripts (to undo tweaks)\n");
        }
    }

    for (title, body) in fragments {
        let _ = write!(script, "\n# --- {title} ---\n{body}\n");
    }
}

fn push_footer(script: &mut String) {
    script.push_str("\nWrite-Host \"Sparkle Script completed!\" -ForegroundColor Green\n");
    script.push_str(
        "Write-Host \"Please restart your computer for changes to take effect.\" -ForegroundColor Cyan\n",
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::model::TweakScripts;

    fn app(name: &str, winget: Option<&str>, choco: Option<&str>) -> AppEntry {
        AppEntry {
            name: name.to_string(),
            package_id: winget.map(str::to_string),
            alt_package_id: choco.map(str::to_string),
            category: "utilities".to_string(),
            description: String::new(),
            warning: None,
            icon_url: None,
            homepage_url: None,
        }
    }

    fn tweak(id: &str, title: &str, unapply: Option<&str>) -> TweakEntry {
        TweakEntry {
            id: id.to_string(),
            title: title.to_string(),
            description: String::new(),
            categories: vec!["General".to_string()],
            recommended: false,
            reversible: unapply.is_some(),
            scripts: TweakScripts {
                apply: format!("Apply-{id}"),
                unapply: unapply.map(str::to_string),
            },
        }
    }

    fn catalogs() -> Catalogs {
        Catalogs::new(
            vec![
                app("Firefox", Some("Mozilla.Firefox"), Some("firefox")),
                app("ChocoOnly", None, Some("choco-only")),
                app("Git", Some("Git.Git"), None),
            ],
            vec![
                tweak("telemetry", "Disable Telemetry", Some("Undo-telemetry")),
                tweak("cleanup", "Clean Temp Files", None),
            ],
        )
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 7).unwrap()
    }

    #[test]
    fn empty_selection_is_rejected() {
        let result = compose_on(
            &Selection::new(),
            &catalogs(),
            PackageManager::Winget,
            Direction::Apply,
            date(),
        );
        assert_eq!(result, Err(ComposeError::EmptySelection));
    }

    #[test]
    fn selection_of_unknown_names_is_still_empty() {
        let mut selection = Selection::new();
        selection.toggle_app("Not In Catalog");
        let result = compose_on(
            &selection,
            &catalogs(),
            PackageManager::Winget,
            Direction::Apply,
            date(),
        );
        assert_eq!(result, Err(ComposeError::EmptySelection));
    }

    #[test]
    fn full_script_layout() {
        let mut selection = Selection::new();
        selection.toggle_app("Git");
        selection.toggle_app("Firefox");
        selection.toggle_tweak("telemetry");

        let script = compose_on(
            &selection,
            &catalogs(),
            PackageManager::Winget,
            Direction::Apply,
            date(),
        )
        .unwrap();

        let expected = "# Sparkle Script - Generated on 3/7/2026\n\
# Run as Administrator\n\
\n\
Write-Host \"Starting Sparkle Script...\" -ForegroundColor Cyan\n\
\n\
# Install Applications\n\
Write-Host \"Installing 2 application(s)...\" -ForegroundColor Green\n\
winget install Mozilla.Firefox Git.Git --accept-source-agreements --accept-package-agreements\n\
\n\
# Apply System Tweaks\n\
Write-Host \"Applying 1 tweak(s)...\" -ForegroundColor Yellow\n\
# Apply scripts\n\
\n\
# --- Disable Telemetry ---\n\
Apply-telemetry\n\
\n\
Write-Host \"Sparkle Script completed!\" -ForegroundColor Green\n\
Write-Host \"Please restart your computer for changes to take effect.\" -ForegroundColor Cyan\n";
        assert_eq!(script, expected);
    }

    #[test]
    fn compose_is_deterministic_for_a_fixed_date() {
        let mut selection = Selection::new();
        selection.toggle_app("Firefox");
        selection.toggle_tweak("cleanup");
        let catalogs = catalogs();
        let first = compose_on(
            &selection,
            &catalogs,
            PackageManager::Chocolatey,
            Direction::Apply,
            date(),
        );
        let second = compose_on(
            &selection,
            &catalogs,
            PackageManager::Chocolatey,
            Direction::Apply,
            date(),
        );
        assert_eq!(first, second);
    }

    #[test]
    fn winget_without_primary_ids_emits_fallback_comment() {
        let mut selection = Selection::new();
        selection.toggle_app("ChocoOnly");
        let script = compose_on(
            &selection,
            &catalogs(),
            PackageManager::Winget,
            Direction::Apply,
            date(),
        )
        .unwrap();
        assert!(script.contains("# No apps with winget IDs selected"));
        assert!(!script.contains("winget install"));
    }

    #[test]
    fn chocolatey_uses_secondary_ids_and_skips_apps_without_one() {
        let mut selection = Selection::new();
        selection.toggle_app("Git");
        selection.toggle_app("ChocoOnly");
        selection.toggle_app("Firefox");
        let script = compose_on(
            &selection,
            &catalogs(),
            PackageManager::Chocolatey,
            Direction::Apply,
            date(),
        )
        .unwrap();
        assert!(script.contains("choco install firefox choco-only -y\n"));
        assert!(script.contains("Installing 3 application(s)"));
    }

    #[test]
    fn unapply_skips_tweaks_without_undo_fragment() {
        let mut selection = Selection::new();
        selection.toggle_tweak("telemetry");
        selection.toggle_tweak("cleanup");
        let script = compose_on(
            &selection,
            &catalogs(),
            PackageManager::Winget,
            Direction::Unapply,
            date(),
        )
        .unwrap();
        assert!(script.contains("# --- Disable Telemetry ---\nUndo-telemetry\n"));
        assert!(!script.contains("# --- Clean Temp Files ---"));
        assert!(!script.contains("Apply-telemetry"));
        assert!(script.contains("Write-Host \"Reverting 1 tweak(s)...\" -ForegroundColor Yellow\n"));
        assert!(script.contains("# Unapply scripts (to undo tweaks)"));
        assert!(!script.contains("# Install Applications"));
    }

    #[test]
    fn tweaks_follow_catalog_order() {
        let mut selection = Selection::new();
        selection.toggle_tweak("cleanup");
        selection.toggle_tweak("telemetry");
        let script = compose_on(
            &selection,
            &catalogs(),
            PackageManager::Winget,
            Direction::Apply,
            date(),
        )
        .unwrap();
        let telemetry = script.find("Disable Telemetry").unwrap();
        let cleanup = script.find("Clean Temp Files").unwrap();
        assert!(telemetry < cleanup);
    }

    #[test]
    fn install_command_variants() {
        let catalogs = catalogs();
        let mut selection = Selection::new();
        assert_eq!(
            install_command(&selection, &catalogs.apps, PackageManager::Chocolatey),
            "# No apps selected. Select apps to generate a chocolatey install command."
        );

        selection.toggle_app("Git");
        assert_eq!(
            install_command(&selection, &catalogs.apps, PackageManager::Chocolatey),
            "# No apps with chocolatey packages selected."
        );
        assert_eq!(
            install_command(&selection, &catalogs.apps, PackageManager::Winget),
            "# Winget Install Command\n# Run in PowerShell or CMD as Administrator\n\nwinget install Git.Git"
        );
    }
}
