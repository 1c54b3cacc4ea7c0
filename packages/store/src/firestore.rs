//! Cloud Firestore REST adapter for the `incidents` collection.
//!
//! Documents are exchanged in Firestore's typed-value JSON encoding
//! (`stringValue`, `doubleValue`, `timestampValue`, `mapValue`). The
//! adapter validates and defaults on read: a record missing its position
//! or timestamp is skipped with a warning, a missing description becomes
//! an empty string, and an unknown type label maps to `Otro`.

use chrono::{DateTime, Utc};
use incident_map_incident_models::{IncidentType, NewIncident, Position, StoredIncident};
use serde_json::{Value, json};

use crate::{INCIDENTS_COLLECTION, IncidentStore, StoreError};

/// Incident store backed by a hosted Firestore project.
pub struct FirestoreStore {
    client: reqwest::Client,
    /// Base URL of the collection, e.g.
    /// `https://firestore.googleapis.com/v1/projects/<id>/databases/(default)/documents/incidents`.
    collection_url: String,
    /// Web API key appended as the `key` query parameter, if configured.
    api_key: Option<String>,
}

impl FirestoreStore {
    /// Creates an adapter for the `incidents` collection of the given
    /// Firestore project.
    #[must_use]
    pub fn new(project_id: &str, api_key: Option<String>) -> Self {
        Self::with_documents_url(
            &format!(
                "https://firestore.googleapis.com/v1/projects/{project_id}/databases/(default)/documents"
            ),
            api_key,
        )
    }

    /// Creates an adapter against a custom documents endpoint, e.g. a
    /// local emulator. `documents_url` is the URL prefix up to and
    /// including `/documents`.
    #[must_use]
    pub fn with_documents_url(documents_url: &str, api_key: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            collection_url: format!("{documents_url}/{INCIDENTS_COLLECTION}"),
            api_key,
        }
    }

    fn with_key(&self, url: String) -> String {
        match &self.api_key {
            Some(key) => format!("{url}?key={key}"),
            None => url,
        }
    }

    fn document_url(&self, id: &str) -> String {
        format!("{}/{id}", self.collection_url)
    }
}

#[async_trait::async_trait]
impl IncidentStore for FirestoreStore {
    async fn create(&self, incident: &NewIncident) -> Result<String, StoreError> {
        let url = self.with_key(self.collection_url.clone());
        let body = encode_document(incident);

        let response = self.client.post(&url).json(&body).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(StoreError::Response {
                operation: "create",
                status: status.as_u16(),
            });
        }

        let document: Value = response.json().await?;
        document_id(&document).ok_or(StoreError::Response {
            operation: "create",
            status: status.as_u16(),
        })
    }

    async fn list_all(&self) -> Result<Vec<StoredIncident>, StoreError> {
        let url = self.with_key(self.collection_url.clone());

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(StoreError::Response {
                operation: "list",
                status: status.as_u16(),
            });
        }

        let body: Value = response.json().await?;
        // An empty collection comes back as `{}` with no `documents` key.
        let documents = body
            .get("documents")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();

        let mut incidents = Vec::with_capacity(documents.len());
        for document in &documents {
            match decode_document(document) {
                Some(incident) => incidents.push(incident),
                None => {
                    log::warn!(
                        "Skipping malformed incident document: {}",
                        document.get("name").and_then(Value::as_str).unwrap_or("?")
                    );
                }
            }
        }

        Ok(incidents)
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        let url = self.with_key(self.document_url(id));

        let response = self.client.delete(&url).send().await?;
        let status = response.status();
        // Firestore treats deleting a missing document as success; tolerate
        // an explicit 404 as well so repeated deletes stay idempotent.
        if status.is_success() || status.as_u16() == 404 {
            Ok(())
        } else {
            Err(StoreError::Response {
                operation: "delete",
                status: status.as_u16(),
            })
        }
    }
}

/// Encodes an incident into Firestore's typed-value document body.
fn encode_document(incident: &NewIncident) -> Value {
    json!({
        "fields": {
            "position": {
                "mapValue": {
                    "fields": {
                        "lat": { "doubleValue": incident.position.lat },
                        "lng": { "doubleValue": incident.position.lng },
                    }
                }
            },
            "type": { "stringValue": incident.incident_type.to_string() },
            "description": { "stringValue": incident.description },
            "timestamp": { "timestampValue": incident.timestamp.to_rfc3339() },
        }
    })
}

/// Extracts the document id from the trailing path segment of the
/// document's resource `name`.
fn document_id(document: &Value) -> Option<String> {
    document
        .get("name")
        .and_then(Value::as_str)
        .and_then(|name| name.rsplit('/').next())
        .map(ToString::to_string)
}

/// Decodes a Firestore document into a [`StoredIncident`].
///
/// Returns `None` when the id, position, or timestamp is missing or
/// unparsable; the other fields are defaulted.
fn decode_document(document: &Value) -> Option<StoredIncident> {
    let id = document_id(document)?;
    let fields = document.get("fields")?;

    let position_fields = fields
        .get("position")
        .and_then(|v| v.get("mapValue"))
        .and_then(|v| v.get("fields"))?;
    let lat = number_value(position_fields.get("lat")?)?;
    let lng = number_value(position_fields.get("lng")?)?;

    let timestamp = fields
        .get("timestamp")
        .and_then(|v| v.get("timestampValue"))
        .and_then(Value::as_str)
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))?;

    let description = fields
        .get("description")
        .and_then(|v| v.get("stringValue"))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    let incident_type = fields
        .get("type")
        .and_then(|v| v.get("stringValue"))
        .and_then(Value::as_str)
        .and_then(|label| label.parse::<IncidentType>().ok())
        .unwrap_or(IncidentType::Other);

    Some(StoredIncident {
        id,
        position: Position::new(lat, lng),
        incident_type,
        description,
        timestamp,
    })
}

/// Reads a Firestore numeric value, which arrives either as a JSON number
/// under `doubleValue` or as a stringified integer under `integerValue`.
fn number_value(value: &Value) -> Option<f64> {
    if let Some(v) = value.get("doubleValue") {
        return v.as_f64().or_else(|| v.as_str()?.parse().ok());
    }
    value
        .get("integerValue")
        .and_then(Value::as_str)
        .and_then(|s| s.parse().ok())
}
