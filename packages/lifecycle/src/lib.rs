#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Incident reporting workflow.
//!
//! [`ReportController`] drives the interaction from a map click to a
//! persisted incident: geofence gate, capture form, validation, store
//! write, and the in-memory displayed set. Loading the displayed set runs
//! the expiry sweep so stale reports disappear (and are purged) on read.

pub mod location;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use incident_map_geofence::GeoBounds;
use incident_map_incident_models::{IncidentType, NewIncident, Position, StoredIncident};
use incident_map_store::IncidentStore;

/// Shown when a map click lands outside the serviced region.
pub const OUTSIDE_REGION_MESSAGE: &str =
    "Incidents can only be reported inside the serviced region.";

/// Shown when the description is empty at submission time.
pub const EMPTY_DESCRIPTION_MESSAGE: &str = "The description cannot be empty.";

/// Shown when no position has been selected at submission time.
pub const MISSING_POSITION_MESSAGE: &str = "Select a location on the map.";

/// Where the controller is in the reporting workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    /// No report in progress.
    Idle,
    /// A position was accepted and the capture form is open.
    AwaitingFormInput,
    /// A store write is in flight.
    Submitting,
}

/// The capture form's current contents.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportForm {
    /// Selected category; resets to theft after a successful submit.
    pub incident_type: IncidentType,
    /// Free-text description.
    pub description: String,
    /// The geofence-accepted position, if one has been selected.
    pub selected_position: Option<Position>,
}

impl Default for ReportForm {
    fn default() -> Self {
        Self {
            incident_type: IncidentType::Theft,
            description: String::new(),
            selected_position: None,
        }
    }
}

/// Result of a submission attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The incident was persisted and appended to the displayed set.
    Saved,
    /// Validation failed; the form stays open with a message set.
    Rejected,
    /// The store write failed; the form stays open for a manual retry.
    StoreFailed,
}

/// Orchestrates the incident reporting workflow against a store.
pub struct ReportController {
    store: Arc<dyn IncidentStore>,
    bounds: GeoBounds,
    state: ControllerState,
    form: ReportForm,
    incidents: Vec<StoredIncident>,
    message: Option<String>,
}

impl ReportController {
    #[must_use]
    pub fn new(store: Arc<dyn IncidentStore>, bounds: GeoBounds) -> Self {
        Self {
            store,
            bounds,
            state: ControllerState::Idle,
            form: ReportForm::default(),
            incidents: Vec::new(),
            message: None,
        }
    }

    /// Loads the displayed incident set, purging stale records as a side
    /// effect. A read failure degrades to an empty list.
    pub async fn load(&mut self, now: DateTime<Utc>) {
        match incident_map_expiry::sweep(self.store.as_ref(), now).await {
            Ok(fresh) => self.incidents = fresh,
            Err(e) => {
                log::error!("Failed to load incidents: {e}");
                self.incidents = Vec::new();
            }
        }
    }

    /// Handles a map interaction producing a candidate position.
    ///
    /// Inside the geofence: the position is captured, the form opens, and
    /// any previous message is cleared. Outside: the state is unchanged
    /// and a user-visible rejection message is set.
    pub fn select_position(&mut self, position: Position) {
        if self.bounds.contains(position) {
            self.form.selected_position = Some(position);
            self.state = ControllerState::AwaitingFormInput;
            self.message = None;
        } else {
            self.message = Some(OUTSIDE_REGION_MESSAGE.to_string());
        }
    }

    /// Updates the selected incident category.
    pub fn set_incident_type(&mut self, incident_type: IncidentType) {
        self.form.incident_type = incident_type;
    }

    /// Updates the description text.
    pub fn set_description(&mut self, description: impl Into<String>) {
        self.form.description = description.into();
    }

    /// Submits the capture form.
    ///
    /// Validation order is fixed: description-emptiness first, then
    /// position-presence; each failure sets its own message and the store
    /// is never reached. On a successful write the new record joins the
    /// displayed set and the form resets to its defaults. On a failed
    /// write the form keeps its contents and nothing is retried.
    pub async fn submit(&mut self, now: DateTime<Utc>) -> SubmitOutcome {
        if self.form.description.trim().is_empty() {
            self.message = Some(EMPTY_DESCRIPTION_MESSAGE.to_string());
            return SubmitOutcome::Rejected;
        }
        let Some(position) = self.form.selected_position else {
            self.message = Some(MISSING_POSITION_MESSAGE.to_string());
            return SubmitOutcome::Rejected;
        };

        self.state = ControllerState::Submitting;
        let incident = NewIncident {
            position,
            incident_type: self.form.incident_type,
            description: self.form.description.clone(),
            timestamp: now,
        };

        match self.store.create(&incident).await {
            Ok(id) => {
                self.incidents.push(StoredIncident::from_new(id, incident));
                self.form = ReportForm::default();
                self.message = None;
                self.state = ControllerState::Idle;
                SubmitOutcome::Saved
            }
            Err(e) => {
                log::error!("Failed to save incident: {e}");
                self.state = ControllerState::AwaitingFormInput;
                SubmitOutcome::StoreFailed
            }
        }
    }

    #[must_use]
    pub const fn state(&self) -> ControllerState {
        self.state
    }

    #[must_use]
    pub const fn form(&self) -> &ReportForm {
        &self.form
    }

    /// The currently displayed (fresh) incidents.
    #[must_use]
    pub fn incidents(&self) -> &[StoredIncident] {
        &self.incidents
    }

    /// The current user-visible message, if any.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}
