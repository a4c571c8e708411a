use anyhow::{Context, Result};
use clap::Args;
use reqwest::blocking::Client;

pub const DEFAULT_APPS_URL: &str =
    "https://raw.githubusercontent.com/parcoil/sparkle/refs/heads/v2/src/renderer/src/assets/apps.json";
pub const DEFAULT_TWEAKS_URL: &str =
    "https://raw.githubusercontent.com/parcoil/sparkle/refs/heads/v2/tweaks/registry-scripts.json";
pub const DEFAULT_GET_URL: &str = "https://raw.githubusercontent.com/Parcoil/Sparkle/v2/get.ps1";
pub const DEFAULT_DEBLOAT_URL: &str =
    "https://raw.githubusercontent.com/parcoil/sparkle/refs/heads/v2/tweaks/debloat-windows/apply.ps1";
pub const DEFAULT_RELEASES_URL: &str =
    "https://api.github.com/repos/Parcoil/Sparkle/releases?per_page=20";
pub const DEFAULT_USER_AGENT: &str = "Sparkle-Site/1.0";

/// Upstream locations and HTTP settings, shared by every subcommand.
#[derive(Debug, Clone, Args)]
pub struct Config {
    /// Apps catalog (bare array or `{ "apps": [...] }`)
    #[arg(long, global = true, env = "SPARKLE_APPS_URL", default_value = DEFAULT_APPS_URL)]
    pub apps_url: String,

    /// Tweaks catalog (bare array or `{ "tweaks": [...] }`)
    #[arg(long, global = true, env = "SPARKLE_TWEAKS_URL", default_value = DEFAULT_TWEAKS_URL)]
    pub tweaks_url: String,

    /// Bootstrap installer script
    #[arg(long, global = true, env = "SPARKLE_GET_URL", default_value = DEFAULT_GET_URL)]
    pub get_url: String,

    /// Debloat script
    #[arg(long, global = true, env = "SPARKLE_DEBLOAT_URL", default_value = DEFAULT_DEBLOAT_URL)]
    pub debloat_url: String,

    /// GitHub releases endpoint for patch notes
    #[arg(long, global = true, env = "SPARKLE_RELEASES_URL", default_value = DEFAULT_RELEASES_URL)]
    pub releases_url: String,

    #[arg(long, global = true, env = "SPARKLE_USER_AGENT", default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// Minutes before loaded catalogs are considered stale
    #[arg(long, global = true, default_value_t = 60)]
    pub cache_minutes: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            apps_url: DEFAULT_APPS_URL.to_string(),
            tweaks_url: DEFAULT_TWEAKS_URL.to_string(),
            get_url: DEFAULT_GET_URL.to_string(),
            debloat_url: DEFAULT_DEBLOAT_URL.to_string(),
            releases_url: DEFAULT_RELEASES_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            cache_minutes: 60,
        }
    }
}

impl Config {
    pub fn http_client(&self) -> Result<Client> {
        Client::builder()
            .user_agent(self.user_agent.clone())
            .build()
            .context("failed to build http client")
    }

    pub fn cache_max_age(&self) -> chrono::Duration {
        chrono::Duration::minutes(i64::from(self.cache_minutes))
    }
}
