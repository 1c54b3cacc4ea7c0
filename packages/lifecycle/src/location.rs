//! Start-position acquisition with a fixed fallback.
//!
//! The host environment supplies the device position through
//! [`LocationProvider`]; when it cannot (permission denied, no fix, no
//! geolocation capability at all), the map starts at a fixed default
//! coordinate in the serviced city instead of failing.

use async_trait::async_trait;
use incident_map_incident_models::Position;

/// Default map center used when geolocation is unavailable (Bogotá).
pub const DEFAULT_POSITION: Position = Position::new(4.710_988_6, -74.072_092);

/// The device position could not be determined.
#[derive(Debug, thiserror::Error)]
#[error("geolocation unavailable: {reason}")]
pub struct GeolocationUnavailable {
    /// Host-supplied description of the failure.
    pub reason: String,
}

/// Supplies the device's current position.
#[async_trait]
pub trait LocationProvider: Send + Sync {
    /// Returns the current device position.
    ///
    /// # Errors
    ///
    /// Returns [`GeolocationUnavailable`] if no position can be acquired.
    async fn current_position(&self) -> Result<Position, GeolocationUnavailable>;
}

/// Resolves the initial map position, falling back to
/// [`DEFAULT_POSITION`] when the provider fails.
pub async fn resolve_start_position(provider: &dyn LocationProvider) -> Position {
    match provider.current_position().await {
        Ok(position) => position,
        Err(e) => {
            log::warn!("Falling back to default position: {e}");
            DEFAULT_POSITION
        }
    }
}
