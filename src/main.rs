mod app;
mod config;
mod delivery;
mod registry;
mod script;
mod ui;
mod utils;

use std::{
    collections::BTreeSet,
    fs::File,
    io,
    path::{Path, PathBuf},
    sync::Mutex,
};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use reqwest::blocking::Client;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use app::selection::{group_by_category, CatalogItem};
use app::state::LogLevel;
use app::{App, Selection};
use config::Config;
use delivery::{fetch_asset, fetch_releases, Asset};
use registry::model::AppEntry;
use registry::{load_catalogs, CatalogKind, Catalogs};
use script::{compose, install_command, save_script, Direction, PackageManager};

/// Build Sparkle PowerShell scripts from the app and tweak catalogs.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Where logs go while the interactive builder owns the terminal
    #[arg(long, global = true, default_value = "sparkle-builder.log")]
    log_file: PathBuf,

    #[command(flatten)]
    config: Config,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive builder (default)
    Tui,
    /// Print or save a script for the given apps and tweaks
    Script {
        /// App name, repeatable
        #[arg(long = "app")]
        apps: Vec<String>,
        /// Tweak id, repeatable
        #[arg(long = "tweak")]
        tweaks: Vec<String>,
        #[arg(long, value_enum, default_value_t = PackageManager::Winget)]
        package_manager: PackageManager,
        /// Emit the undo fragments instead of the apply ones
        #[arg(long)]
        unapply: bool,
        /// Directory to write sparkle-script.ps1 into; stdout when absent
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print a single install command for the given apps
    Install {
        /// App name, repeatable
        #[arg(long = "app")]
        apps: Vec<String>,
        #[arg(long, value_enum, default_value_t = PackageManager::Winget)]
        package_manager: PackageManager,
    },
    /// List catalog entries grouped by category
    List {
        #[arg(value_enum)]
        kind: CatalogKind,
        #[arg(long)]
        search: Option<String>,
        /// Only show these categories, repeatable
        #[arg(long = "category")]
        categories: Vec<String>,
    },
    /// Download get.ps1 or the debloat script
    Fetch {
        #[arg(value_enum)]
        asset: Asset,
        #[arg(short, long, default_value = ".")]
        output: PathBuf,
    },
    /// Show recent release notes
    Releases {
        #[arg(long, default_value_t = 5)]
        limit: usize,
    },
}

fn init_tracing(verbose: bool, log_file: Option<&Path>) -> Result<()> {
    if !verbose && std::env::var_os("RUST_LOG").is_none() {
        return Ok(());
    }

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create log file {}", path.display()))?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).init();
        }
        None => builder.with_writer(io::stderr).init(),
    }
    Ok(())
}

fn load_or_warn(client: &Client, config: &Config) -> Catalogs {
    let (catalogs, notices) = load_catalogs(client, config);
    for notice in notices {
        eprintln!("warning: {notice}");
    }
    catalogs
}

/// Build a selection from command-line names, reporting the ones the catalog lacks.
fn selection_from_args(catalogs: &Catalogs, apps: &[String], tweaks: &[String]) -> Selection {
    let mut selection = Selection::new();

    for name in apps.iter().collect::<BTreeSet<_>>() {
        match catalogs.apps.iter().find(|app| &app.name == name) {
            Some(app) => {
                if !app.is_installable() {
                    eprintln!("note: '{name}' has no winget or chocolatey package");
                }
                selection.toggle_app(name);
            }
            None => {
                warn!(name = %name, "unknown app");
                eprintln!("warning: no app named '{name}' in the catalog");
            }
        }
    }

    for id in tweaks.iter().collect::<BTreeSet<_>>() {
        if catalogs.tweaks.iter().any(|tweak| &tweak.id == id) {
            selection.toggle_tweak(id);
        } else {
            warn!(id = %id, "unknown tweak");
            eprintln!("warning: no tweak with id '{id}' in the catalog");
        }
    }

    selection
}

/// One line of `list apps`: the name, then the usable package ids.
fn describe_app(app: &AppEntry) -> String {
    match (app.winget_id(), app.chocolatey_id()) {
        (Some(winget), Some(choco)) => format!("{} [{winget}, choco {choco}]", app.name),
        (Some(winget), None) => format!("{} [{winget}]", app.name),
        (None, Some(choco)) => format!("{} [choco {choco}]", app.name),
        (None, None) => app.name.clone(),
    }
}

fn print_group<T: CatalogItem>(category: &str, members: &[&T], describe: impl Fn(&T) -> String) {
    if members.is_empty() {
        return;
    }
    println!("{category} ({})", members.len());
    for member in members {
        println!("  {}", describe(*member));
    }
}

fn list_entries<T: CatalogItem>(
    items: &[T],
    selection: &Selection,
    describe: impl Fn(&T) -> String,
) {
    let visible = selection.visible(items);
    let known = T::KIND.known_categories();
    for (category, members) in group_by_category(&visible, known) {
        print_group(&category, &members, &describe);
    }

    let others: Vec<&T> = visible
        .iter()
        .copied()
        .filter(|item| !known.iter().any(|category| item.in_category(category)))
        .collect();
    print_group("other", &others, &describe);
}

fn run_tui(config: Config, client: Client) -> Result<()> {
    eprintln!("Loading tweaks and apps...");
    let (catalogs, notices) = load_catalogs(&client, &config);
    let mut app = App::new(config, client, catalogs);
    for notice in notices {
        app.log(notice, LogLevel::Error);
    }

    enable_raw_mode().context("failed to enable raw mode")?;
    execute!(io::stdout(), EnterAlternateScreen).context("failed to enter alt screen")?;

    struct TerminalGuard;
    impl Drop for TerminalGuard {
        fn drop(&mut self) {
            let _ = disable_raw_mode();
            let _ = execute!(io::stdout(), LeaveAlternateScreen);
        }
    }
    let _guard = TerminalGuard;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend).context("failed to init terminal")?;

    app::run(&mut app, &mut terminal)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Tui);
    let interactive = matches!(command, Commands::Tui);
    init_tracing(cli.verbose, interactive.then_some(cli.log_file.as_path()))?;

    let config = cli.config;
    let client = config.http_client()?;

    match command {
        Commands::Tui => run_tui(config, client)?,
        Commands::Script {
            apps,
            tweaks,
            package_manager,
            unapply,
            output,
        } => {
            let catalogs = load_or_warn(&client, &config);
            let selection = selection_from_args(&catalogs, &apps, &tweaks);
            let direction = if unapply {
                Direction::Unapply
            } else {
                Direction::Apply
            };
            let script = compose(&selection, &catalogs, package_manager, direction)?;
            match output {
                Some(dir) => {
                    let path = save_script(&dir, &script)?;
                    info!(path = %path.display(), "saved script");
                    println!("Saved {}", path.display());
                }
                None => print!("{script}"),
            }
        }
        Commands::Install {
            apps,
            package_manager,
        } => {
            let catalogs = load_or_warn(&client, &config);
            let selection = selection_from_args(&catalogs, &apps, &[]);
            println!(
                "{}",
                install_command(&selection, &catalogs.apps, package_manager)
            );
        }
        Commands::List {
            kind,
            search,
            categories,
        } => {
            let catalogs = load_or_warn(&client, &config);
            let mut selection = Selection::new();
            if let Some(text) = search {
                selection.set_search_text(text);
            }
            for category in categories.iter().collect::<BTreeSet<_>>() {
                selection.toggle_category_filter(kind, category);
            }
            match kind {
                CatalogKind::Apps => list_entries(&catalogs.apps, &selection, describe_app),
                CatalogKind::Tweaks => list_entries(&catalogs.tweaks, &selection, |tweak| {
                    let undo = if tweak.unapply_script().is_some() {
                        ""
                    } else {
                        " (no undo)"
                    };
                    format!("{} - {}{undo}", tweak.id, tweak.display_title())
                }),
            }
        }
        Commands::Fetch { asset, output } => {
            let download = fetch_asset(&client, &config, asset)?;
            let path = download.save(&output)?;
            info!(
                content_type = download.content_type,
                disposition = %download.content_disposition(),
                "asset saved"
            );
            println!("Saved {}", path.display());
        }
        Commands::Releases { limit } => {
            let notes = fetch_releases(&client, &config.releases_url)?;
            for note in notes.iter().take(limit) {
                println!("v{} - {}", note.version, note.date);
                if !note.body.trim().is_empty() {
                    println!("{}", note.body.trim_end());
                }
                println!();
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_line_skips_blank_package_ids() {
        let app: AppEntry =
            serde_json::from_str(r#"{"name":"Tool","id":" ","chocolatey":"tool"}"#).unwrap();
        assert_eq!(describe_app(&app), "Tool [choco tool]");

        let app: AppEntry = serde_json::from_str(r#"{"name":"Manual","id":""}"#).unwrap();
        assert_eq!(describe_app(&app), "Manual");
    }
}
