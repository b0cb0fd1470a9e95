//! In-process session store.

use shopfront_core::Session;

use super::{SessionStore, StoreError, StoredEntries};

/// Session store that lives only as long as the process.
///
/// Uses the same entry encoding as the file store.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    entries: StoredEntries,
}

impl MemorySessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-populated with `session`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the session cannot be encoded.
    pub fn with_session(session: &Session) -> Result<Self, StoreError> {
        Ok(Self {
            entries: StoredEntries::encode(session)?,
        })
    }

    /// Whether neither entry is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.token.is_none() && self.entries.user.is_none()
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Session {
        self.entries.clone().decode()
    }

    fn save(&mut self, session: &Session) -> Result<(), StoreError> {
        self.entries = StoredEntries::encode(session)?;
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        self.entries = StoredEntries::default();
        Ok(())
    }
}
