#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Official open-data theft statistics feed.
//!
//! Fetches the national police theft dataset from the Socrata open-data
//! API using the `$order` and `$limit` query parameters, restricts it to
//! the configured municipality, and aggregates counts per date for
//! display. The feed is independent of the user-reported incident store;
//! buckets are recomputed from scratch on every fetch and never persisted.

pub mod aggregate;

use serde::Deserialize;

pub use aggregate::{ReportBucket, SeverityTier, aggregate};

/// Default Socrata resource for the national theft dataset.
pub const DEFAULT_FEED_URL: &str = "https://www.datos.gov.co/resource/4rxi-8m8d.json";

/// Municipality label used by the upstream dataset for Bogotá.
pub const BOGOTA_MUNICIPALITY: &str = "BOGOTA D.C.";

/// Errors that can occur fetching the open-data feed.
///
/// Any failure replaces the whole aggregate view; partial results are
/// never shown.
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The feed returned a non-success status code.
    #[error("feed returned HTTP {status}")]
    Status {
        /// HTTP status code returned by the feed.
        status: u16,
    },
}

/// Configuration for a feed fetch.
#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// Base resource URL (a Socrata `.json` endpoint).
    pub api_url: String,
    /// Municipality to keep; all other rows are dropped.
    pub municipality: String,
    /// Fixed row cap requested upstream; there is no pagination beyond it.
    pub row_limit: u32,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_FEED_URL.to_string(),
            municipality: BOGOTA_MUNICIPALITY.to_string(),
            row_limit: 1000,
        }
    }
}

impl FeedConfig {
    /// Full request URL: newest rows first, capped at `row_limit`.
    #[must_use]
    pub fn request_url(&self) -> String {
        format!("{}?$order=:id DESC&$limit={}", self.api_url, self.row_limit)
    }
}

/// One row of the upstream dataset, as delivered.
///
/// Socrata serves every field as a string; `cantidad` is an
/// integer-valued string parsed during aggregation. Rows missing a field
/// default to empty rather than failing the whole response.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawTheftRecord {
    /// Municipality label, e.g. `"BOGOTA D.C."`.
    #[serde(default)]
    pub municipio: String,
    /// Date of the incident, `YYYY-MM-DD` with an optional time part.
    #[serde(default)]
    pub fecha_hecho: String,
    /// Reported incident count for that row.
    #[serde(default)]
    pub cantidad: String,
}

/// Fetches the raw feed rows.
///
/// # Errors
///
/// Returns [`FeedError`] on network failure, a non-2xx response, or an
/// undecodable body.
pub async fn fetch_raw(
    client: &reqwest::Client,
    config: &FeedConfig,
) -> Result<Vec<RawTheftRecord>, FeedError> {
    let url = config.request_url();
    log::info!("Fetching open-data feed: {url}");

    let response = client.get(&url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(FeedError::Status {
            status: status.as_u16(),
        });
    }

    let records: Vec<RawTheftRecord> = response.json().await?;
    log::info!("Downloaded {} open-data rows", records.len());
    Ok(records)
}

/// Fetches the feed and aggregates it into display buckets.
///
/// # Errors
///
/// Returns [`FeedError`] if the fetch fails; no buckets are produced.
pub async fn fetch_report_buckets(
    client: &reqwest::Client,
    config: &FeedConfig,
) -> Result<Vec<ReportBucket>, FeedError> {
    let records = fetch_raw(client, config).await?;
    Ok(aggregate(&records, &config.municipality))
}
