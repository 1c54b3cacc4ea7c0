#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Age-based incident expiry.
//!
//! Incidents reflect near-real-time risk, so reports older than the
//! freshness threshold are purged. Cleanup is coupled to read access
//! rather than a scheduled job: every load sweep partitions the
//! collection, deletes the stale records best-effort, and surfaces only
//! the fresh ones.

use chrono::{DateTime, Duration, Utc};
use incident_map_incident_models::StoredIncident;
use incident_map_store::{IncidentStore, StoreError};

/// How long an incident stays visible after it was reported.
#[must_use]
pub fn max_age() -> Duration {
    Duration::hours(8)
}

/// Result of splitting a record set by age.
///
/// Every input record lands in exactly one of the two sets.
#[derive(Debug, Clone, PartialEq)]
pub struct Partitioned {
    /// Records at or under the age threshold, in input order.
    pub fresh: Vec<StoredIncident>,
    /// Records past the threshold, eligible for deletion.
    pub stale: Vec<StoredIncident>,
}

/// Splits records into fresh and stale relative to `now`.
///
/// A record is fresh iff `now - timestamp <= max_age`; the boundary is
/// inclusive. Records timestamped in the future count as fresh.
#[must_use]
pub fn partition(
    records: Vec<StoredIncident>,
    now: DateTime<Utc>,
    max_age: Duration,
) -> Partitioned {
    let (fresh, stale) = records
        .into_iter()
        .partition(|record| now.signed_duration_since(record.timestamp) <= max_age);
    Partitioned { fresh, stale }
}

/// Loads the collection, purges stale records, and returns the fresh set.
///
/// Stale deletes are issued concurrently and are best-effort: a failed
/// delete is logged and does not abort the sweep or block the other
/// deletes. The record stays in the store and will be retried by the next
/// sweep that sees it.
///
/// # Errors
///
/// Returns [`StoreError`] only if the initial read fails; callers degrade
/// to an empty list.
pub async fn sweep(
    store: &dyn IncidentStore,
    now: DateTime<Utc>,
) -> Result<Vec<StoredIncident>, StoreError> {
    let records = store.list_all().await?;
    let Partitioned { fresh, stale } = partition(records, now, max_age());

    if !stale.is_empty() {
        log::info!("Purging {} stale incident(s)", stale.len());
        let deletes = stale.iter().map(|record| {
            let id = record.id.clone();
            async move {
                if let Err(e) = store.delete(&id).await {
                    log::warn!("Failed to delete stale incident {id}: {e}");
                }
            }
        });
        futures::future::join_all(deletes).await;
    }

    Ok(fresh)
}

#[cfg(test)]
mod tests {
    use super::*;
    use incident_map_incident_models::{IncidentType, NewIncident, Position, StoredIncident};
    use incident_map_store::memory::MemoryStore;

    fn incident_aged(id: &str, now: DateTime<Utc>, age: Duration) -> StoredIncident {
        StoredIncident {
            id: id.to_string(),
            position: Position::new(4.71, -74.07),
            incident_type: IncidentType::Theft,
            description: "test".to_string(),
            timestamp: now - age,
        }
    }

    #[test]
    fn partition_is_a_strict_cover() {
        let now = Utc::now();
        let records = vec![
            incident_aged("a", now, Duration::hours(1)),
            incident_aged("b", now, Duration::hours(9)),
            incident_aged("c", now, Duration::hours(7)),
            incident_aged("d", now, Duration::hours(24)),
        ];
        let split = partition(records.clone(), now, max_age());
        assert_eq!(split.fresh.len() + split.stale.len(), records.len());
        let fresh_ids: Vec<&str> = split.fresh.iter().map(|r| r.id.as_str()).collect();
        let stale_ids: Vec<&str> = split.stale.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(fresh_ids, ["a", "c"]);
        assert_eq!(stale_ids, ["b", "d"]);
    }

    #[test]
    fn nine_hour_old_record_is_stale() {
        let now = Utc::now();
        let split = partition(
            vec![incident_aged("old", now, Duration::hours(9))],
            now,
            max_age(),
        );
        assert!(split.fresh.is_empty());
        assert_eq!(split.stale.len(), 1);
    }

    #[test]
    fn exactly_eight_hours_is_still_fresh() {
        let now = Utc::now();
        let split = partition(
            vec![incident_aged("edge", now, Duration::hours(8))],
            now,
            max_age(),
        );
        assert_eq!(split.fresh.len(), 1);
        assert!(split.stale.is_empty());
    }

    #[test]
    fn future_timestamp_counts_as_fresh() {
        let now = Utc::now();
        let split = partition(
            vec![incident_aged("future", now, Duration::hours(-1))],
            now,
            max_age(),
        );
        assert_eq!(split.fresh.len(), 1);
    }

    #[test]
    fn empty_input_partitions_to_empty_sets() {
        let split = partition(Vec::new(), Utc::now(), max_age());
        assert!(split.fresh.is_empty());
        assert!(split.stale.is_empty());
    }

    #[tokio::test]
    async fn sweep_deletes_stale_records_once_and_returns_fresh() {
        let store = MemoryStore::new();
        let now = Utc::now();
        let fresh_id = store.seed(NewIncident {
            position: Position::new(4.71, -74.07),
            incident_type: IncidentType::Theft,
            description: "recent".to_string(),
            timestamp: now - Duration::hours(1),
        });
        let stale_id = store.seed(NewIncident {
            position: Position::new(4.71, -74.07),
            incident_type: IncidentType::Accident,
            description: "old".to_string(),
            timestamp: now - Duration::hours(9),
        });

        let visible = sweep(&store, now).await.unwrap();

        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, fresh_id);
        assert_eq!(store.deleted_ids(), vec![stale_id]);
        assert_eq!(store.records().len(), 1);
    }

    #[tokio::test]
    async fn sweep_of_empty_store_returns_empty() {
        let store = MemoryStore::new();
        let visible = sweep(&store, Utc::now()).await.unwrap();
        assert!(visible.is_empty());
        assert!(store.deleted_ids().is_empty());
    }
}
