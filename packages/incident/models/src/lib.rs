#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Incident record types shared across the incident-map system.
//!
//! An incident is a user-reported point-in-time, point-in-space safety
//! event. Records start life as [`NewIncident`] (no id yet), are persisted
//! through the store adapter, and come back as [`StoredIncident`] with the
//! store-assigned document id.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// A latitude/longitude pair in floating-point degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lng: f64,
}

impl Position {
    #[must_use]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// The category of a reported incident.
///
/// The remote collection stores the Spanish labels the original data was
/// recorded under; the serde/strum renames preserve wire compatibility.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum IncidentType {
    /// Theft ("Robo") — the default selection for new reports.
    #[default]
    #[serde(rename = "Robo")]
    #[strum(serialize = "Robo")]
    Theft,
    /// Traffic or other accident ("Accidente").
    #[serde(rename = "Accidente")]
    #[strum(serialize = "Accidente")]
    Accident,
    /// Anything else ("Otro").
    #[serde(rename = "Otro")]
    #[strum(serialize = "Otro")]
    Other,
}

/// A report captured from the user but not yet persisted.
///
/// The timestamp is client-assigned at submission time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewIncident {
    /// Where the incident happened.
    pub position: Position,
    /// Category of the incident.
    #[serde(rename = "type")]
    pub incident_type: IncidentType,
    /// Free-text description; validated non-empty before submission.
    pub description: String,
    /// Creation instant.
    pub timestamp: DateTime<Utc>,
}

/// A persisted incident, as read back from the remote collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredIncident {
    /// Store-assigned opaque document id.
    pub id: String,
    /// Where the incident happened.
    pub position: Position,
    /// Category of the incident.
    #[serde(rename = "type")]
    pub incident_type: IncidentType,
    /// Free-text description.
    pub description: String,
    /// Creation instant.
    pub timestamp: DateTime<Utc>,
}

impl StoredIncident {
    /// Attaches a store-assigned id to a freshly-persisted incident.
    #[must_use]
    pub fn from_new(id: String, incident: NewIncident) -> Self {
        Self {
            id,
            position: incident.position,
            incident_type: incident.incident_type,
            description: incident.description,
            timestamp: incident.timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn incident_type_defaults_to_theft() {
        assert_eq!(IncidentType::default(), IncidentType::Theft);
    }

    #[test]
    fn incident_type_uses_wire_labels() {
        assert_eq!(IncidentType::Theft.to_string(), "Robo");
        assert_eq!(IncidentType::Accident.to_string(), "Accidente");
        assert_eq!(IncidentType::Other.to_string(), "Otro");
    }

    #[test]
    fn incident_type_parses_wire_labels() {
        assert_eq!("Robo".parse::<IncidentType>().unwrap(), IncidentType::Theft);
        assert_eq!(
            "Accidente".parse::<IncidentType>().unwrap(),
            IncidentType::Accident
        );
        assert!("Burglary".parse::<IncidentType>().is_err());
    }

    #[test]
    fn incident_type_serde_round_trips() {
        let json = serde_json::to_string(&IncidentType::Accident).unwrap();
        assert_eq!(json, "\"Accidente\"");
        let back: IncidentType = serde_json::from_str(&json).unwrap();
        assert_eq!(back, IncidentType::Accident);
    }

    #[test]
    fn from_new_carries_all_fields() {
        let incident = NewIncident {
            position: Position::new(4.71, -74.07),
            incident_type: IncidentType::Other,
            description: "streetlight out".to_string(),
            timestamp: Utc::now(),
        };
        let stored = StoredIncident::from_new("abc123".to_string(), incident.clone());
        assert_eq!(stored.id, "abc123");
        assert_eq!(stored.position, incident.position);
        assert_eq!(stored.incident_type, IncidentType::Other);
        assert_eq!(stored.description, incident.description);
        assert_eq!(stored.timestamp, incident.timestamp);
    }
}
