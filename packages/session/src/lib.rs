#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Identity token decoding and the persisted session context.
//!
//! The identity provider hands over a signed credential token whose
//! payload carries the display identity. Signature verification already
//! happened in the provider's own library, so the token is treated here
//! as an opaque container with a decodable payload. The decoded identity
//! is kept in a [`Session`] backed by the host's key-value storage under
//! the `user` key, with explicit load/save/clear lifecycle operations
//! instead of ambient global state.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::{Deserialize, Serialize};

/// Storage key under which the serialized identity is persisted.
pub const USER_KEY: &str = "user";

/// Errors that can occur decoding an identity token.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The token is not a three-part compact JWS.
    #[error("malformed identity token")]
    MalformedToken,

    /// The payload segment is not valid base64url.
    #[error("invalid token payload encoding: {0}")]
    PayloadEncoding(#[from] base64::DecodeError),

    /// The payload is not the expected JSON shape.
    #[error("invalid token payload: {0}")]
    PayloadJson(#[from] serde_json::Error),
}

/// Display identity decoded from the provider's credential token.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Account email.
    #[serde(default)]
    pub email: Option<String>,
    /// Avatar URL.
    #[serde(default)]
    pub picture: Option<String>,
}

/// Decodes the display identity from a compact JWS credential token.
///
/// Only the payload segment is inspected; the signature is trusted to
/// have been verified by the identity provider's library before handoff.
///
/// # Errors
///
/// Returns [`SessionError`] if the token shape, payload encoding, or
/// payload JSON is invalid.
pub fn decode_identity(token: &str) -> Result<SessionUser, SessionError> {
    let mut segments = token.split('.');
    let (Some(_header), Some(payload), Some(_signature), None) = (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) else {
        return Err(SessionError::MalformedToken);
    };

    let bytes = URL_SAFE_NO_PAD.decode(payload)?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Abstraction over the host's persistent key-value storage.
pub trait IdentityStorage: Send + Sync {
    /// Reads the value stored under `key`, if any.
    fn read(&self, key: &str) -> Option<String>;
    /// Writes `value` under `key`, replacing any previous value.
    fn write(&self, key: &str, value: &str);
    /// Removes the value stored under `key`.
    fn remove(&self, key: &str);
}

/// In-memory [`IdentityStorage`], used in tests and hosts without
/// persistent storage.
#[derive(Default)]
pub struct MemoryStorage {
    values: std::sync::Mutex<std::collections::BTreeMap<String, String>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(
        &self,
    ) -> std::sync::MutexGuard<'_, std::collections::BTreeMap<String, String>> {
        self.values
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl IdentityStorage for MemoryStorage {
    fn read(&self, key: &str) -> Option<String> {
        self.lock().get(key).cloned()
    }

    fn write(&self, key: &str, value: &str) {
        self.lock().insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.lock().remove(key);
    }
}

/// Explicit session context over an [`IdentityStorage`].
pub struct Session<S: IdentityStorage> {
    storage: S,
}

impl<S: IdentityStorage> Session<S> {
    #[must_use]
    pub const fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Restores the persisted identity, if a valid one is stored.
    ///
    /// Absent or corrupt stored state yields `None`; corrupt state is
    /// logged but left in place.
    #[must_use]
    pub fn load(&self) -> Option<SessionUser> {
        let raw = self.storage.read(USER_KEY)?;
        match serde_json::from_str(&raw) {
            Ok(user) => Some(user),
            Err(e) => {
                log::warn!("Ignoring corrupt persisted session: {e}");
                None
            }
        }
    }

    /// Persists the identity for the next startup.
    pub fn save(&self, user: &SessionUser) {
        match serde_json::to_string(user) {
            Ok(serialized) => self.storage.write(USER_KEY, &serialized),
            Err(e) => log::error!("Failed to serialize session: {e}"),
        }
    }

    /// Clears the persisted identity at logout.
    pub fn clear(&self) {
        self.storage.remove(USER_KEY);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Builds an unsigned token with the given JSON payload.
    fn token_with_payload(payload: &str) -> String {
        let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"RS256","typ":"JWT"}"#);
        let body = URL_SAFE_NO_PAD.encode(payload);
        format!("{header}.{body}.sig")
    }

    #[test]
    fn decodes_identity_from_token_payload() {
        let token = token_with_payload(
            r#"{"name":"Ana Pérez","email":"ana@example.com","picture":"https://example.com/a.png","iss":"https://accounts.google.com"}"#,
        );
        let user = decode_identity(&token).unwrap();
        assert_eq!(user.name.as_deref(), Some("Ana Pérez"));
        assert_eq!(user.email.as_deref(), Some("ana@example.com"));
        assert_eq!(user.picture.as_deref(), Some("https://example.com/a.png"));
    }

    #[test]
    fn tolerates_missing_identity_fields() {
        let token = token_with_payload(r#"{"sub":"1234567890"}"#);
        let user = decode_identity(&token).unwrap();
        assert!(user.name.is_none());
        assert!(user.email.is_none());
    }

    #[test]
    fn rejects_token_without_three_segments() {
        assert!(matches!(
            decode_identity("not-a-token"),
            Err(SessionError::MalformedToken)
        ));
        assert!(matches!(
            decode_identity("a.b.c.d"),
            Err(SessionError::MalformedToken)
        ));
    }

    #[test]
    fn rejects_garbage_payload() {
        assert!(decode_identity("aGVhZGVy.!!!.sig").is_err());
        let token = format!("h.{}.s", URL_SAFE_NO_PAD.encode("not json"));
        assert!(decode_identity(&token).is_err());
    }

    #[test]
    fn session_round_trips_through_storage() {
        let session = Session::new(MemoryStorage::new());
        assert!(session.load().is_none());

        let user = SessionUser {
            name: Some("Ana".to_string()),
            email: Some("ana@example.com".to_string()),
            picture: None,
        };
        session.save(&user);
        assert_eq!(session.load(), Some(user));

        session.clear();
        assert!(session.load().is_none());
    }

    #[test]
    fn corrupt_persisted_state_loads_as_none() {
        let storage = MemoryStorage::new();
        storage.write(USER_KEY, "{not json");
        let session = Session::new(storage);
        assert!(session.load().is_none());
    }
}
