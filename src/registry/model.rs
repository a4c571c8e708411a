use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Deserializer};

pub const APP_CATEGORIES: [&str; 9] = [
    "browsers",
    "communication",
    "games",
    "development",
    "utilities",
    "multimedia",
    "productivity",
    "Privacy & Security",
    "peripherals",
];

pub const TWEAK_CATEGORIES: [&str; 8] = [
    "General",
    "Appearance",
    "Performance",
    "Privacy",
    "Gaming",
    "Network",
    "GPU",
    "Maintenance",
];

/// Which of the two catalogs an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum CatalogKind {
    Apps,
    Tweaks,
}

impl CatalogKind {
    pub fn label(&self) -> &'static str {
        match self {
            CatalogKind::Apps => "Apps",
            CatalogKind::Tweaks => "Tweaks",
        }
    }

    pub fn known_categories(&self) -> &'static [&'static str] {
        match self {
            CatalogKind::Apps => &APP_CATEGORIES,
            CatalogKind::Tweaks => &TWEAK_CATEGORIES,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct AppEntry {
    pub name: String,
    #[serde(rename = "id", default)]
    pub package_id: Option<String>,
    #[serde(rename = "chocolatey", default)]
    pub alt_package_id: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub category: String,
    #[serde(rename = "info", default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default)]
    pub warning: Option<String>,
    #[serde(rename = "icon", default)]
    pub icon_url: Option<String>,
    #[serde(rename = "link", default)]
    pub homepage_url: Option<String>,
}

impl AppEntry {
    /// Winget id, ignoring blank values.
    pub fn winget_id(&self) -> Option<&str> {
        non_blank(self.package_id.as_deref())
    }

    /// Chocolatey package, ignoring blank values.
    pub fn chocolatey_id(&self) -> Option<&str> {
        non_blank(self.alt_package_id.as_deref())
    }

    /// True when at least one package manager can install this app.
    pub fn is_installable(&self) -> bool {
        self.winget_id().is_some() || self.chocolatey_id().is_some()
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct TweakEntry {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(rename = "category", default, deserialize_with = "null_as_default")]
    pub categories: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub recommended: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub reversible: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub scripts: TweakScripts,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct TweakScripts {
    #[serde(default, deserialize_with = "null_as_default")]
    pub apply: String,
    #[serde(default)]
    pub unapply: Option<String>,
}

impl TweakEntry {
    pub fn apply_script(&self) -> &str {
        &self.scripts.apply
    }

    /// The undo fragment, if the catalog ships a non-empty one.
    pub fn unapply_script(&self) -> Option<&str> {
        non_blank(self.scripts.unapply.as_deref())
    }

    /// Catalog entries sometimes leave the title empty; fall back to the id.
    pub fn display_title(&self) -> &str {
        if self.title.trim().is_empty() {
            &self.id
        } else {
            &self.title
        }
    }
}

/// Both catalogs as fetched together.
#[derive(Debug, Clone)]
pub struct Catalogs {
    pub apps: Vec<AppEntry>,
    pub tweaks: Vec<TweakEntry>,
    /// When both catalogs last loaded successfully; `None` after a failed fetch.
    pub fetched_at: Option<DateTime<Utc>>,
}

impl Catalogs {
    pub fn new(apps: Vec<AppEntry>, tweaks: Vec<TweakEntry>) -> Self {
        Self {
            apps,
            tweaks,
            fetched_at: Some(Utc::now()),
        }
    }

    /// Catalogs where at least one fetch failed. Never considered fresh.
    pub fn degraded(apps: Vec<AppEntry>, tweaks: Vec<TweakEntry>) -> Self {
        Self {
            apps,
            tweaks,
            fetched_at: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.apps.is_empty() && self.tweaks.is_empty()
    }

    /// Whether the data is still inside the freshness window.
    pub fn is_fresh(&self, now: DateTime<Utc>, max_age: chrono::Duration) -> bool {
        self.fetched_at
            .is_some_and(|fetched_at| now.signed_duration_since(fetched_at) < max_age)
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Treat an explicit `null` like a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_fields_map_from_catalog_names() {
        let app: AppEntry = serde_json::from_str(
            r#"{"name":"7-Zip","id":"7zip.7zip","chocolatey":"7zip","category":"utilities","info":"Archiver","link":"https://7-zip.org"}"#,
        )
        .unwrap();
        assert_eq!(app.package_id.as_deref(), Some("7zip.7zip"));
        assert_eq!(app.alt_package_id.as_deref(), Some("7zip"));
        assert_eq!(app.description, "Archiver");
        assert_eq!(app.homepage_url.as_deref(), Some("https://7-zip.org"));
        assert!(app.is_installable());
    }

    #[test]
    fn app_without_any_package_id_is_not_installable() {
        let app: AppEntry =
            serde_json::from_str(r#"{"name":"Manual","id":"  ","category":"games"}"#).unwrap();
        assert!(!app.is_installable());
    }

    #[test]
    fn tweak_blank_unapply_counts_as_missing() {
        let tweak: TweakEntry = serde_json::from_str(
            r#"{"id":"t","title":"T","category":["General"],"scripts":{"apply":"a","unapply":""}}"#,
        )
        .unwrap();
        assert_eq!(tweak.apply_script(), "a");
        assert_eq!(tweak.unapply_script(), None);
    }

    #[test]
    fn blank_package_ids_are_ignored() {
        let app: AppEntry =
            serde_json::from_str(r#"{"name":"Blank","id":"  ","chocolatey":"blank"}"#).unwrap();
        assert_eq!(app.winget_id(), None);
        assert_eq!(app.chocolatey_id(), Some("blank"));
    }

    #[test]
    fn null_fields_fall_back_to_defaults() {
        let app: AppEntry = serde_json::from_str(
            r#"{"name":"NullInfo","id":"X.X","category":null,"info":null,"link":null}"#,
        )
        .unwrap();
        assert_eq!(app.description, "");
        assert_eq!(app.category, "");
        assert_eq!(app.homepage_url, None);

        let tweak: TweakEntry = serde_json::from_str(
            r#"{"id":"t","title":null,"description":null,"category":null,"recommended":null,"reversible":null,"scripts":null}"#,
        )
        .unwrap();
        assert_eq!(tweak.display_title(), "t");
        assert!(tweak.categories.is_empty());
        assert!(!tweak.recommended);
        assert_eq!(tweak.apply_script(), "");
        assert_eq!(tweak.unapply_script(), None);
    }

    #[test]
    fn freshness_window() {
        let catalogs = Catalogs::new(Vec::new(), Vec::new());
        let fetched_at = catalogs.fetched_at.unwrap();
        let later = fetched_at + chrono::Duration::minutes(61);
        assert!(catalogs.is_fresh(fetched_at, chrono::Duration::hours(1)));
        assert!(!catalogs.is_fresh(later, chrono::Duration::hours(1)));
    }

    #[test]
    fn degraded_catalogs_are_never_fresh() {
        let catalogs = Catalogs::degraded(Vec::new(), Vec::new());
        assert!(!catalogs.is_fresh(Utc::now(), chrono::Duration::hours(1)));
    }
}
