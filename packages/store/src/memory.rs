//! In-memory incident store for tests and local runs.
//!
//! Behaves like the remote collection: ids are generated on create,
//! deletes are idempotent, and reads return a snapshot of every record.
//! Tests use the call counters and the fail-writes switch to observe
//! controller behaviour without a network.

use std::sync::Mutex;

use incident_map_incident_models::{NewIncident, StoredIncident};
use uuid::Uuid;

use crate::{IncidentStore, StoreError};

#[derive(Default)]
struct Inner {
    records: Vec<StoredIncident>,
    create_calls: usize,
    deleted_ids: Vec<String>,
    fail_writes: bool,
}

/// Incident store backed by process memory.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a record directly, bypassing `create`. Returns its id.
    pub fn seed(&self, incident: NewIncident) -> String {
        let id = Uuid::new_v4().to_string();
        self.lock()
            .records
            .push(StoredIncident::from_new(id.clone(), incident));
        id
    }

    /// Makes every subsequent `create` fail with a simulated 503.
    pub fn set_fail_writes(&self, fail: bool) {
        self.lock().fail_writes = fail;
    }

    /// Number of times `create` has been invoked (including failures).
    #[must_use]
    pub fn create_calls(&self) -> usize {
        self.lock().create_calls
    }

    /// Ids passed to `delete`, in call order, duplicates included.
    #[must_use]
    pub fn deleted_ids(&self) -> Vec<String> {
        self.lock().deleted_ids.clone()
    }

    /// Snapshot of the records currently held.
    #[must_use]
    pub fn records(&self) -> Vec<StoredIncident> {
        self.lock().records.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[async_trait::async_trait]
impl IncidentStore for MemoryStore {
    async fn create(&self, incident: &NewIncident) -> Result<String, StoreError> {
        let mut inner = self.lock();
        inner.create_calls += 1;
        if inner.fail_writes {
            return Err(StoreError::Response {
                operation: "create",
                status: 503,
            });
        }
        let id = Uuid::new_v4().to_string();
        inner
            .records
            .push(StoredIncident::from_new(id.clone(), incident.clone()));
        Ok(id)
    }

    async fn list_all(&self) -> Result<Vec<StoredIncident>, StoreError> {
        Ok(self.lock().records.clone())
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        let mut inner = self.lock();
        inner.deleted_ids.push(id.to_string());
        inner.records.retain(|record| record.id != id);
        Ok(())
    }
}
