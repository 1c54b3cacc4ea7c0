#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Incident store trait and remote document-store adapters.
//!
//! The store is the only persistence boundary in the system: a single
//! remote collection named `incidents` with create/list/delete operations.
//! [`firestore::FirestoreStore`] talks to the hosted document database over
//! its REST API; [`memory::MemoryStore`] backs tests and local runs.

pub mod firestore;
pub mod memory;

use async_trait::async_trait;
use incident_map_incident_models::{NewIncident, StoredIncident};

/// The name of the remote document collection holding incident reports.
pub const INCIDENTS_COLLECTION: &str = "incidents";

/// Errors that can occur talking to the incident store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// The store returned a non-success status code.
    #[error("store returned HTTP {status} during {operation}")]
    Response {
        /// Which store operation was in flight (`"create"`, `"list"`, `"delete"`).
        operation: &'static str,
        /// HTTP status code returned by the store.
        status: u16,
    },
}

/// Abstraction over the remote incident collection.
///
/// Every load re-fetches the entire collection; there is no local caching
/// layer and no pagination.
#[async_trait]
pub trait IncidentStore: Send + Sync {
    /// Persists a new incident and returns the store-assigned document id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the write fails. Callers surface the
    /// failure as a diagnostic and leave the user on the form.
    async fn create(&self, incident: &NewIncident) -> Result<String, StoreError>;

    /// Fetches every record currently in the collection.
    ///
    /// Records that do not conform to the expected shape are skipped with
    /// a logged warning rather than failing the whole read.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the read fails. Callers degrade to an
    /// empty result set.
    async fn list_all(&self) -> Result<Vec<StoredIncident>, StoreError>;

    /// Deletes a record by id.
    ///
    /// Idempotent: deleting an id that no longer exists is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the delete fails. Callers treat delete
    /// failures as best-effort and swallow them per record.
    async fn delete(&self, id: &str) -> Result<(), StoreError>;
}
