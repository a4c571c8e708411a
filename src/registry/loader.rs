use std::collections::HashSet;
use std::thread;

use reqwest::blocking::Client;
use reqwest::header::ACCEPT;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info, warn};

use super::model::{AppEntry, Catalogs, TweakEntry};
use super::CatalogError;
use crate::config::Config;

pub fn load_apps(client: &Client, url: &str) -> Result<Vec<AppEntry>, CatalogError> {
    let body = fetch_json_text(client, url)?;
    let apps = parse_apps(&body)?;
    info!(count = apps.len(), url, "loaded apps catalog");
    Ok(apps)
}

pub fn load_tweaks(client: &Client, url: &str) -> Result<Vec<TweakEntry>, CatalogError> {
    let body = fetch_json_text(client, url)?;
    let tweaks = parse_tweaks(&body)?;
    info!(count = tweaks.len(), url, "loaded tweaks catalog");
    Ok(tweaks)
}

/// Fetch both catalogs side by side. A catalog that fails to load is
/// replaced by an empty one and described in the returned notices.
pub fn load_catalogs(client: &Client, config: &Config) -> (Catalogs, Vec<String>) {
    let (apps, tweaks) = fetch_catalogs(client, config);
    settle_catalogs(None, apps, tweaks)
}

/// Refetch both catalogs, keeping the `previous` entries of any kind that fails.
pub fn refresh_catalogs(
    client: &Client,
    config: &Config,
    previous: &Catalogs,
) -> (Catalogs, Vec<String>) {
    let (apps, tweaks) = fetch_catalogs(client, config);
    settle_catalogs(Some(previous), apps, tweaks)
}

fn fetch_catalogs(
    client: &Client,
    config: &Config,
) -> (
    Result<Vec<AppEntry>, CatalogError>,
    Result<Vec<TweakEntry>, CatalogError>,
) {
    thread::scope(|scope| {
        let apps = scope.spawn(|| load_apps(client, &config.apps_url));
        let tweaks = scope.spawn(|| load_tweaks(client, &config.tweaks_url));
        (join_catalog(apps.join()), join_catalog(tweaks.join()))
    })
}

/// Combine two fetch results. A failed kind falls back to `previous` (or to
/// nothing) and leaves the result degraded, so it is never treated as fresh.
pub fn settle_catalogs(
    previous: Option<&Catalogs>,
    apps: Result<Vec<AppEntry>, CatalogError>,
    tweaks: Result<Vec<TweakEntry>, CatalogError>,
) -> (Catalogs, Vec<String>) {
    let mut notices = Vec::new();
    let apps = apps.unwrap_or_else(|e| {
        warn!(error = %e, "apps catalog failed to load");
        notices.push(format!("Failed to load apps: {e}"));
        previous.map(|p| p.apps.clone()).unwrap_or_default()
    });
    let tweaks = tweaks.unwrap_or_else(|e| {
        warn!(error = %e, "tweaks catalog failed to load");
        notices.push(format!("Failed to load tweaks: {e}"));
        previous.map(|p| p.tweaks.clone()).unwrap_or_default()
    });

    let catalogs = if notices.is_empty() {
        Catalogs::new(apps, tweaks)
    } else {
        Catalogs::degraded(apps, tweaks)
    };
    (catalogs, notices)
}

fn join_catalog<T>(
    joined: thread::Result<Result<Vec<T>, CatalogError>>,
) -> Result<Vec<T>, CatalogError> {
    joined.unwrap_or_else(|_| {
        Err(CatalogError::MalformedCatalog(
            "catalog loader thread panicked".to_string(),
        ))
    })
}

fn fetch_json_text(client: &Client, url: &str) -> Result<String, CatalogError> {
    debug!(url, "fetching catalog");
    let unavailable = |reason: String| CatalogError::UpstreamUnavailable {
        url: url.to_string(),
        reason,
    };

    let response = client
        .get(url)
        .header(ACCEPT, "application/json")
        .send()
        .map_err(|e| unavailable(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(unavailable(format!("status {status}")));
    }

    response.text().map_err(|e| unavailable(e.to_string()))
}

pub fn parse_apps(body: &str) -> Result<Vec<AppEntry>, CatalogError> {
    let apps: Vec<AppEntry> = parse_catalog(body, "apps")?;
    Ok(dedup_by_key(apps, |app| app.name.clone(), "app"))
}

pub fn parse_tweaks(body: &str) -> Result<Vec<TweakEntry>, CatalogError> {
    let tweaks: Vec<TweakEntry> = parse_catalog(body, "tweaks")?;
    Ok(dedup_by_key(tweaks, |tweak| tweak.id.clone(), "tweak"))
}

/// Accepts a bare array or an object carrying the array under `field`.
/// Every element must be an object; objects that do not deserialize
/// (missing identity, wrong field types) are dropped one by one.
fn parse_catalog<T: DeserializeOwned>(body: &str, field: &str) -> Result<Vec<T>, CatalogError> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| CatalogError::MalformedCatalog(format!("invalid json: {e}")))?;

    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove(field) {
            Some(Value::Array(items)) => items,
            _ => {
                return Err(CatalogError::MalformedCatalog(format!(
                    "expected an array or an object with a `{field}` array"
                )))
            }
        },
        _ => {
            return Err(CatalogError::MalformedCatalog(format!(
                "expected an array or an object with a `{field}` array"
            )))
        }
    };

    if let Some(position) = items.iter().position(|item| !item.is_object()) {
        return Err(CatalogError::MalformedCatalog(format!(
            "{field} entry {position} is not an object"
        )));
    }

    let total = items.len();
    let entries: Vec<T> = items
        .into_iter()
        .enumerate()
        .filter_map(|(position, item)| match serde_json::from_value(item) {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!(field, position, error = %e, "dropping invalid catalog entry");
                None
            }
        })
        .collect();

    if entries.len() < total {
        debug!(field, kept = entries.len(), total, "catalog entries filtered");
    }
    Ok(entries)
}

fn dedup_by_key<T>(entries: Vec<T>, key: impl Fn(&T) -> String, label: &str) -> Vec<T> {
    let mut seen = HashSet::new();
    entries
        .into_iter()
        .filter(|entry| {
            let k = key(entry);
            if seen.insert(k.clone()) {
                true
            } else {
                warn!(key = %k, label, "dropping duplicate catalog entry");
                false
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::*;

    #[test]
    fn parses_object_with_apps_field() {
        let apps = parse_apps(
            r#"{"apps":[{"name":"Foo","id":"Foo.Foo","category":"utilities","info":"x"}]}"#,
        )
        .unwrap();
        assert_eq!(apps.len(), 1);
        assert_eq!(apps[0].name, "Foo");
        assert_eq!(apps[0].package_id.as_deref(), Some("Foo.Foo"));
    }

    #[test]
    fn parses_bare_array() {
        let apps = parse_apps(r#"[{"name":"A"},{"name":"B","chocolatey":"b"}]"#).unwrap();
        let names: Vec<_> = apps.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, ["A", "B"]);
    }

    #[test]
    fn array_of_scalars_is_malformed() {
        let result = parse_apps("[1,2,3]");
        assert!(matches!(result, Err(CatalogError::MalformedCatalog(_))));
    }

    #[test]
    fn wrong_field_or_shape_is_malformed() {
        assert!(matches!(
            parse_apps(r#"{"tweaks":[]}"#),
            Err(CatalogError::MalformedCatalog(_))
        ));
        assert!(matches!(
            parse_tweaks(r#""just a string""#),
            Err(CatalogError::MalformedCatalog(_))
        ));
        assert!(matches!(
            parse_tweaks("not json"),
            Err(CatalogError::MalformedCatalog(_))
        ));
    }

    #[test]
    fn entries_missing_identity_are_dropped() {
        let apps = parse_apps(r#"{"apps":[{"id":"No.Name"},{"name":"Kept"}]}"#).unwrap();
        assert_eq!(apps.len(), 1);
        assert_eq!(apps[0].name, "Kept");

        let tweaks = parse_tweaks(
            r#"{"tweaks":[{"title":"no id"},{"id":"ok","title":"Ok","category":["General"],"scripts":{"apply":"x"}}]}"#,
        )
        .unwrap();
        assert_eq!(tweaks.len(), 1);
        assert_eq!(tweaks[0].id, "ok");
    }

    #[test]
    fn duplicate_identities_keep_the_first() {
        let apps = parse_apps(r#"[{"name":"Dup","id":"first"},{"name":"Dup","id":"second"}]"#)
            .unwrap();
        assert_eq!(apps.len(), 1);
        assert_eq!(apps[0].package_id.as_deref(), Some("first"));
    }

    #[test]
    fn null_optional_fields_keep_the_entry() {
        let apps = parse_apps(
            r#"{"apps":[{"name":"NullInfo","id":"X.X","category":"utilities","info":null}]}"#,
        )
        .unwrap();
        assert_eq!(apps.len(), 1);
        assert_eq!(apps[0].description, "");

        let tweaks = parse_tweaks(
            r#"{"tweaks":[{"id":"null-title","title":null,"category":["General"],"scripts":{"apply":"x"}}]}"#,
        )
        .unwrap();
        assert_eq!(tweaks.len(), 1);
        assert_eq!(tweaks[0].display_title(), "null-title");
    }

    fn unavailable() -> CatalogError {
        CatalogError::UpstreamUnavailable {
            url: "http://127.0.0.1:9/apps.json".to_string(),
            reason: "connection refused".to_string(),
        }
    }

    #[test]
    fn failed_first_load_degrades_to_empty_and_stale() {
        let (catalogs, notices) = settle_catalogs(None, Err(unavailable()), Err(unavailable()));
        assert_eq!(notices.len(), 2);
        assert!(catalogs.is_empty());
        assert!(!catalogs.is_fresh(Utc::now(), Duration::hours(1)));
    }

    #[test]
    fn failed_reload_keeps_previous_entries_of_that_kind() {
        let previous = Catalogs::new(
            parse_apps(r#"[{"name":"Old"}]"#).unwrap(),
            parse_tweaks(r#"[{"id":"old"}]"#).unwrap(),
        );
        let (catalogs, notices) = settle_catalogs(
            Some(&previous),
            Err(unavailable()),
            parse_tweaks(r#"[{"id":"new"}]"#),
        );
        assert_eq!(notices.len(), 1);
        assert_eq!(catalogs.apps[0].name, "Old");
        assert_eq!(catalogs.tweaks[0].id, "new");
        assert!(!catalogs.is_fresh(Utc::now(), Duration::hours(1)));
    }

    #[test]
    fn successful_load_is_fresh() {
        let (catalogs, notices) =
            settle_catalogs(None, parse_apps("[]"), parse_tweaks(r#"[{"id":"t"}]"#));
        assert!(notices.is_empty());
        assert!(catalogs.is_fresh(Utc::now(), Duration::hours(1)));
    }

    #[test]
    fn unreachable_upstream_degrades_to_empty() {
        let config = Config {
            apps_url: "http://127.0.0.1:9/apps.json".to_string(),
            tweaks_url: "http://127.0.0.1:9/tweaks.json".to_string(),
            ..Config::default()
        };
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(5))
            .build()
            .unwrap();
        let (catalogs, notices) = load_catalogs(&client, &config);
        assert_eq!(notices.len(), 2);
        assert!(catalogs.is_empty());
        assert!(!catalogs.is_fresh(Utc::now(), Duration::hours(1)));
    }

    #[test]
    fn tweak_fields_map_from_catalog_names() {
        let tweaks = parse_tweaks(
            r#"{"tweaks":[{"id":"disable-telemetry","title":"Disable Telemetry","description":"d","category":["Privacy","General"],"recommended":true,"reversible":true,"scripts":{"apply":"Set-A","unapply":"Set-B"}}]}"#,
        )
        .unwrap();
        let tweak = &tweaks[0];
        assert_eq!(tweak.categories, ["Privacy", "General"]);
        assert!(tweak.recommended && tweak.reversible);
        assert_eq!(tweak.apply_script(), "Set-A");
        assert_eq!(tweak.unapply_script(), Some("Set-B"));
    }
}
