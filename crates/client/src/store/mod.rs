//! Persistent session storage.
//!
//! The session is mirrored as two key-value entries:
//! - `token` - the raw auth token
//! - `user` - the JSON-serialized [`UserProfile`]
//!
//! Both absent means anonymous. [`SessionStore::load`] never fails: absent,
//! corrupt or half-present data loads as the anonymous session.

mod file;
mod memory;

pub use file::FileSessionStore;
pub use memory::MemorySessionStore;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use shopfront_core::{Session, SessionToken, UserProfile};

/// Errors that can occur while persisting the session.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing the backing file failed.
    #[error("session storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The session could not be serialized.
    #[error("session serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Durable mirror of the current [`Session`].
pub trait SessionStore {
    /// Read the persisted session, falling back to anonymous.
    fn load(&self) -> Session;

    /// Persist `session`. Both entries are written together or not at all.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the session could not be written; the previous
    /// contents are then left in place.
    fn save(&mut self, session: &Session) -> Result<(), StoreError>;

    /// Remove both entries.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backing storage could not be cleared.
    fn clear(&mut self) -> Result<(), StoreError>;
}

impl<S: SessionStore + ?Sized> SessionStore for Box<S> {
    fn load(&self) -> Session {
        (**self).load()
    }

    fn save(&mut self, session: &Session) -> Result<(), StoreError> {
        (**self).save(session)
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        (**self).clear()
    }
}

/// On-disk / in-memory layout of the two entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
struct StoredEntries {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    token: Option<String>,
    /// JSON text of the user profile, stored as a string value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    user: Option<String>,
}

impl StoredEntries {
    fn encode(session: &Session) -> Result<Self, StoreError> {
        let user = session.user().map(serde_json::to_string).transpose()?;
        Ok(Self {
            token: session.token().map(|token| token.expose().to_owned()),
            user,
        })
    }

    fn decode(self) -> Session {
        let user = match self.user.as_deref().map(serde_json::from_str::<UserProfile>) {
            Some(Ok(user)) => Some(user),
            Some(Err(e)) => {
                warn!(error = %e, "Discarding unreadable stored user profile");
                None
            }
            None => None,
        };

        if self.token.is_some() != user.is_some() {
            warn!("Stored session is incomplete, treating as logged out");
        }

        Session::from_parts(self.token.map(SessionToken::new), user)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn alice() -> Session {
        Session::authenticated(SessionToken::new("t1"), UserProfile::new("alice"))
    }

    #[test]
    fn test_encode_stores_user_as_json_text() {
        let entries = StoredEntries::encode(&alice()).unwrap();
        assert_eq!(entries.token.as_deref(), Some("t1"));
        assert_eq!(entries.user.as_deref(), Some(r#"{"username":"alice"}"#));
    }

    #[test]
    fn test_encode_anonymous_is_empty() {
        let entries = StoredEntries::encode(&Session::anonymous()).unwrap();
        assert_eq!(entries, StoredEntries::default());
    }

    #[test]
    fn test_decode_round_trip() {
        let session = alice();
        assert_eq!(StoredEntries::encode(&session).unwrap().decode(), session);
    }

    #[test]
    fn test_decode_corrupt_user_is_anonymous() {
        let entries = StoredEntries {
            token: Some("t1".to_string()),
            user: Some("{not json".to_string()),
        };
        assert_eq!(entries.decode(), Session::anonymous());
    }

    #[test]
    fn test_decode_token_without_user_is_anonymous() {
        let entries = StoredEntries {
            token: Some("t1".to_string()),
            user: None,
        };
        assert_eq!(entries.decode(), Session::anonymous());
    }
}
