#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Serviced-region geofence.
//!
//! New reports are only accepted inside a fixed axis-aligned lat/lng
//! rectangle covering the serviced city. The check is pure and inclusive
//! on all four edges.

use incident_map_incident_models::Position;

/// An axis-aligned lat/lng rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoBounds {
    /// Southern edge, degrees latitude.
    pub min_lat: f64,
    /// Northern edge, degrees latitude.
    pub max_lat: f64,
    /// Western edge, degrees longitude.
    pub min_lng: f64,
    /// Eastern edge, degrees longitude.
    pub max_lng: f64,
}

/// Geographic bounds of the Bogotá service area.
pub const BOGOTA_BOUNDS: GeoBounds = GeoBounds {
    min_lat: 4.48,
    max_lat: 4.83,
    min_lng: -74.25,
    max_lng: -73.99,
};

impl GeoBounds {
    /// Returns `true` iff the position lies inside these bounds.
    ///
    /// Boundary-exact coordinates count as inside.
    #[must_use]
    pub fn contains(&self, position: Position) -> bool {
        position.lat >= self.min_lat
            && position.lat <= self.max_lat
            && position.lng >= self.min_lng
            && position.lng <= self.max_lng
    }
}
