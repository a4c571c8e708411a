//! Relays for the downloadable assets and release history hosted upstream.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::DateTime;
use clap::ValueEnum;
use reqwest::blocking::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::config::Config;
use crate::utils::{normalize_script_text, with_utf8_bom};

pub const RELEASE_LIMIT: usize = 20;

#[derive(Debug, Error)]
pub enum DeliveryError {
    /// The upstream asset could not be fetched (404-equivalent).
    #[error("file not found: {url}")]
    NotFound { url: String },
    /// The release feed failed or returned something unusable (502-equivalent).
    #[error("failed to fetch releases: {0}")]
    BadGateway(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Asset {
    /// `get.ps1`, the one-line bootstrap installer
    Bootstrap,
    /// `debloat.ps1`
    Debloat,
}

impl Asset {
    pub fn file_name(&self) -> &'static str {
        match self {
            Asset::Bootstrap => "get.ps1",
            Asset::Debloat => "debloat.ps1",
        }
    }

    pub fn url<'a>(&self, config: &'a Config) -> &'a str {
        match self {
            Asset::Bootstrap => &config.get_url,
            Asset::Debloat => &config.debloat_url,
        }
    }

    /// Bytes as they should be written to disk.
    pub fn encode(&self, text: &str) -> Vec<u8> {
        match self {
            Asset::Bootstrap => with_utf8_bom(text),
            Asset::Debloat => normalize_script_text(text).into_bytes(),
        }
    }
}

/// A file ready to hand to the user, with the headers the site sent along.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    pub file_name: &'static str,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

impl Download {
    pub fn content_disposition(&self) -> String {
        format!("attachment; filename=\"{}\"", self.file_name)
    }

    pub fn save(&self, dir: impl AsRef<Path>) -> anyhow::Result<PathBuf> {
        let path = dir.as_ref().join(self.file_name);
        fs::write(&path, &self.bytes)
            .with_context(|| format!("failed to write {}", path.display()))?;
        Ok(path)
    }
}

pub fn fetch_asset(client: &Client, config: &Config, asset: Asset) -> Result<Download, DeliveryError> {
    let url = asset.url(config);
    let not_found = || DeliveryError::NotFound {
        url: url.to_string(),
    };

    debug!(url, "fetching asset");
    let response = client.get(url).send().map_err(|e| {
        debug!(url, error = %e, "asset request failed");
        not_found()
    })?;
    if !response.status().is_success() {
        debug!(url, status = %response.status(), "asset upstream refused");
        return Err(not_found());
    }
    let text = response.text().map_err(|_| not_found())?;

    info!(file = asset.file_name(), bytes = text.len(), "fetched asset");
    Ok(Download {
        file_name: asset.file_name(),
        content_type: "text/plain; charset=utf-8",
        bytes: asset.encode(&text),
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchNote {
    pub version: String,
    pub date: String,
    pub body: String,
}

#[derive(Debug, Deserialize)]
struct Release {
    #[serde(default)]
    tag_name: Option<String>,
    #[serde(default)]
    published_at: Option<String>,
    #[serde(default)]
    body: Option<String>,
}

pub fn fetch_releases(client: &Client, url: &str) -> Result<Vec<PatchNote>, DeliveryError> {
    let response = client
        .get(url)
        .header(reqwest::header::ACCEPT, "application/vnd.github+json")
        .send()
        .map_err(|e| DeliveryError::BadGateway(e.to_string()))?;
    let status = response.status();
    if !status.is_success() {
        return Err(DeliveryError::BadGateway(format!("status {status}")));
    }
    let body = response
        .text()
        .map_err(|e| DeliveryError::BadGateway(e.to_string()))?;
    parse_releases(&body)
}

pub fn parse_releases(body: &str) -> Result<Vec<PatchNote>, DeliveryError> {
    let releases: Vec<Release> =
        serde_json::from_str(body).map_err(|e| DeliveryError::BadGateway(e.to_string()))?;

    Ok(releases
        .into_iter()
        .take(RELEASE_LIMIT)
        .map(|release| PatchNote {
            version: release
                .tag_name
                .map(|tag| tag.replacen('v', "", 1))
                .unwrap_or_else(|| "Unknown".to_string()),
            date: release
                .published_at
                .as_deref()
                .and_then(format_release_date)
                .unwrap_or_else(|| "Unknown".to_string()),
            body: release.body.unwrap_or_default(),
        })
        .collect())
}

fn format_release_date(published_at: &str) -> Option<String> {
    let parsed = DateTime::parse_from_rfc3339(published_at).ok()?;
    Some(parsed.format("%B %-d, %Y").to_string())
}
